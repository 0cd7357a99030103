//! Wrestler roster.
//!
//! The roster owns the canonical wrestler records. The engine copies
//! wrestlers into a match and only reaches back into the roster for lookups
//! and grade edits; persisting those edits is the roster implementation's
//! business.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::wrestler::{GrudgeGrade, TvGrade, Wrestler};
use crate::error::{EngineError, EngineResult};

/// Which grade an edit targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GradeKind {
    Tv,
    Grudge,
}

impl std::fmt::Display for GradeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GradeKind::Tv => write!(f, "TV"),
            GradeKind::Grudge => write!(f, "Grudge"),
        }
    }
}

impl std::str::FromStr for GradeKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TV" => Ok(GradeKind::Tv),
            "GRUDGE" => Ok(GradeKind::Grudge),
            _ => Err(EngineError::InvalidGradeKind(s.to_string())),
        }
    }
}

/// A completed grade edit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeChange {
    pub wrestler: String,
    pub kind: GradeKind,
    pub old_value: String,
    pub new_value: String,
}

impl std::fmt::Display for GradeChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Updated {}'s {} grade from {} to {}",
            self.wrestler, self.kind, self.old_value, self.new_value
        )
    }
}

/// Apply a grade edit to a wrestler record.
///
/// Shared by roster implementations so validation is identical everywhere.
pub fn apply_grade(wrestler: &mut Wrestler, kind: GradeKind, value: &str) -> EngineResult<GradeChange> {
    let invalid = || EngineError::InvalidGrade {
        kind,
        value: value.to_string(),
    };

    let (old_value, new_value) = match kind {
        GradeKind::Tv => {
            let grade: TvGrade = value.parse().map_err(|_| invalid())?;
            let old = std::mem::replace(&mut wrestler.tv_grade, grade);
            (old.to_string(), grade.to_string())
        }
        GradeKind::Grudge => {
            let grade: i32 = value.trim().parse().map_err(|_| invalid())?;
            let old = std::mem::replace(&mut wrestler.grudge_grade, GrudgeGrade(grade));
            (old.to_string(), grade.to_string())
        }
    };

    Ok(GradeChange {
        wrestler: wrestler.name.clone(),
        kind,
        old_value,
        new_value,
    })
}

/// Source of wrestler records.
pub trait Roster {
    /// Look up a wrestler by exact name.
    fn get(&self, name: &str) -> Option<&Wrestler>;

    /// All wrestlers, in roster order.
    fn wrestlers(&self) -> Box<dyn Iterator<Item = &Wrestler> + '_>;

    /// Change a wrestler's TV or grudge grade.
    fn update_grade(&mut self, name: &str, kind: GradeKind, value: &str) -> EngineResult<GradeChange>;

    // === Convenience Methods ===

    /// Check if a wrestler exists.
    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Wrestlers with a given TV grade.
    fn by_tv_grade(&self, grade: TvGrade) -> Vec<&Wrestler> {
        self.wrestlers().filter(|w| w.tv_grade == grade).collect()
    }

    /// The `count` wrestlers with the largest grudge magnitude, skipping
    /// `excluded` names. Ties keep roster order.
    fn top_grudge(&self, count: usize, excluded: &[&str]) -> Vec<&Wrestler> {
        let mut eligible: Vec<_> = self
            .wrestlers()
            .filter(|w| !excluded.contains(&w.name.as_str()))
            .collect();
        eligible.sort_by(|a, b| b.grudge_grade.magnitude().cmp(&a.grudge_grade.magnitude()));
        eligible.truncate(count);
        eligible
    }

    /// Opponents within one TV grade of `wrestler`.
    fn available_opponents(&self, wrestler: &Wrestler) -> Vec<&Wrestler> {
        let grades = wrestler.tv_grade.neighbours();
        self.wrestlers()
            .filter(|w| w.name != wrestler.name && grades.contains(&w.tv_grade))
            .collect()
    }

    /// Roster entries listed as allies of `wrestler`.
    fn allies_of(&self, wrestler: &Wrestler) -> Vec<&Wrestler> {
        wrestler.allies.iter().filter_map(|name| self.get(name)).collect()
    }

    /// Roster entries listed as rivals of `wrestler`.
    fn rivals_of(&self, wrestler: &Wrestler) -> Vec<&Wrestler> {
        wrestler.rivals.iter().filter_map(|name| self.get(name)).collect()
    }
}

/// Roster held in memory. Grade edits change the records in place.
///
/// ## Example
///
/// ```
/// use fttm_engine::roster::{GradeKind, InMemoryRoster, Roster, TvGrade, Wrestler};
///
/// let mut roster = InMemoryRoster::new();
/// roster.add(Wrestler::new("Rex", TvGrade::B, 1));
///
/// let change = roster.update_grade("Rex", GradeKind::Tv, "A").unwrap();
/// assert_eq!(change.old_value, "B");
/// assert_eq!(roster.get("Rex").unwrap().tv_grade, TvGrade::A);
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryRoster {
    wrestlers: Vec<Wrestler>,
    index: FxHashMap<String, usize>,
}

impl InMemoryRoster {
    /// Create a new empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a wrestler.
    ///
    /// Panics if a wrestler with the same name is already on the roster.
    pub fn add(&mut self, wrestler: Wrestler) {
        if self.index.contains_key(&wrestler.name) {
            panic!("Wrestler {:?} already on the roster", wrestler.name);
        }
        self.index.insert(wrestler.name.clone(), self.wrestlers.len());
        self.wrestlers.push(wrestler);
    }

    /// Remove a wrestler by name, returning the record.
    pub fn remove(&mut self, name: &str) -> Option<Wrestler> {
        let idx = self.index.remove(name)?;
        let removed = self.wrestlers.remove(idx);
        for slot in self.index.values_mut() {
            if *slot > idx {
                *slot -= 1;
            }
        }
        Some(removed)
    }

    /// Number of wrestlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.wrestlers.len()
    }

    /// Check if the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.wrestlers.is_empty()
    }
}

impl FromIterator<Wrestler> for InMemoryRoster {
    fn from_iter<I: IntoIterator<Item = Wrestler>>(iter: I) -> Self {
        let mut roster = Self::new();
        for wrestler in iter {
            roster.add(wrestler);
        }
        roster
    }
}

impl Roster for InMemoryRoster {
    fn get(&self, name: &str) -> Option<&Wrestler> {
        self.index.get(name).map(|&idx| &self.wrestlers[idx])
    }

    fn wrestlers(&self) -> Box<dyn Iterator<Item = &Wrestler> + '_> {
        Box::new(self.wrestlers.iter())
    }

    fn update_grade(&mut self, name: &str, kind: GradeKind, value: &str) -> EngineResult<GradeChange> {
        let idx = *self
            .index
            .get(name)
            .ok_or_else(|| EngineError::UnknownWrestler(name.to_string()))?;
        apply_grade(&mut self.wrestlers[idx], kind, value)
    }
}
