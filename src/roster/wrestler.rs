//! Wrestler records.
//!
//! A `Wrestler` holds the card-facing attributes (grades, skills, specialty,
//! finisher) plus the small amount of per-match state the engine mutates:
//! track position, the "scored on last resolution" flag and the title belt.

use std::ops::RangeInclusive;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Popularity rating. `AAA` is the best grade, `F` the worst.
///
/// Ordering follows quality: `TvGrade::AAA > TvGrade::F`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TvGrade {
    F,
    E,
    D,
    C,
    B,
    A,
    AA,
    AAA,
}

impl TvGrade {
    /// All grades, best first.
    pub const ALL: [TvGrade; 8] = [
        TvGrade::AAA,
        TvGrade::AA,
        TvGrade::A,
        TvGrade::B,
        TvGrade::C,
        TvGrade::D,
        TvGrade::E,
        TvGrade::F,
    ];

    /// Grade label as printed on cards.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TvGrade::AAA => "AAA",
            TvGrade::AA => "AA",
            TvGrade::A => "A",
            TvGrade::B => "B",
            TvGrade::C => "C",
            TvGrade::D => "D",
            TvGrade::E => "E",
            TvGrade::F => "F",
        }
    }

    /// d66 rolls that let a defender of this grade kick out of a pin.
    ///
    /// The window always opens at 11; better grades reach higher.
    #[must_use]
    pub const fn kick_out_window(self) -> RangeInclusive<u8> {
        let high = match self {
            TvGrade::AAA => 43,
            TvGrade::AA => 36,
            TvGrade::A => 33,
            TvGrade::B => 26,
            TvGrade::C => 23,
            TvGrade::D => 16,
            TvGrade::E => 13,
            TvGrade::F => 11,
        };
        11..=high
    }

    /// One grade better and one grade worse, where they exist.
    #[must_use]
    pub fn neighbours(self) -> Vec<TvGrade> {
        let grades = TvGrade::ALL;
        let idx = grades.iter().position(|&g| g == self).unwrap_or(0);
        let low = idx.saturating_sub(1);
        let high = (idx + 1).min(grades.len() - 1);
        grades[low..=high].to_vec()
    }
}

impl std::fmt::Display for TvGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TvGrade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        TvGrade::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("unknown TV grade '{trimmed}'"))
    }
}

impl TryFrom<String> for TvGrade {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TvGrade> for String {
    fn from(grade: TvGrade) -> Self {
        grade.as_str().to_string()
    }
}

/// Grudge intensity. The sign records which way the feud runs; only the
/// magnitude matters when two grudges are compared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GrudgeGrade(pub i32);

impl GrudgeGrade {
    #[must_use]
    pub const fn magnitude(self) -> u32 {
        self.0.unsigned_abs()
    }
}

impl std::fmt::Display for GrudgeGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where on the track a skill may be used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SkillZone {
    /// Usable anywhere.
    Star,
    /// Usable on circle spaces.
    Circle,
    /// Usable on square spaces (pin spaces are squares).
    Square,
}

impl SkillZone {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SkillZone::Star => "star",
            SkillZone::Circle => "circle",
            SkillZone::Square => "square",
        }
    }
}

impl FromStr for SkillZone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "star" => Ok(SkillZone::Star),
            "circle" => Ok(SkillZone::Circle),
            "square" => Ok(SkillZone::Square),
            other => Err(format!("unknown skill zone '{other}'")),
        }
    }
}

impl TryFrom<String> for SkillZone {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SkillZone> for String {
    fn from(zone: SkillZone) -> Self {
        zone.as_str().to_string()
    }
}

/// Signature specialty move. Scores its own points on Specialty cards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specialty {
    pub name: String,
    pub points: i32,
}

/// Finisher move with the inclusive d66 range that makes it stick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finisher {
    pub name: String,
    /// Inclusive (low, high) d66 bounds.
    pub range: (u8, u8),
}

impl Finisher {
    pub fn new(name: impl Into<String>, low: u8, high: u8) -> Self {
        Self {
            name: name.into(),
            range: (low.min(high), low.max(high)),
        }
    }

    /// Does this d66 roll land the finisher?
    #[must_use]
    pub fn hits(&self, roll: u8) -> bool {
        (self.range.0..=self.range.1).contains(&roll)
    }
}

fn lowercase_skills<'de, D>(deserializer: D) -> Result<FxHashMap<String, SkillZone>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = FxHashMap::<String, SkillZone>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|(k, v)| (k.to_lowercase(), v)).collect())
}

/// A wrestler as seen by the match engine.
///
/// ## Example
///
/// ```
/// use fttm_engine::roster::{SkillZone, TvGrade, Wrestler};
///
/// let w = Wrestler::new("Iron Mike", TvGrade::A, 2)
///     .with_skill("Strong", SkillZone::Circle);
///
/// assert!(w.has_skill("strong"));
/// assert!(w.can_use_skill("STRONG"));      // position 0 is a circle
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wrestler {
    pub name: String,
    pub tv_grade: TvGrade,
    #[serde(default)]
    pub grudge_grade: GrudgeGrade,
    /// Lower-cased skill name → zone.
    #[serde(default, deserialize_with = "lowercase_skills")]
    pub skills: FxHashMap<String, SkillZone>,
    #[serde(default)]
    pub specialty: Option<Specialty>,
    #[serde(default)]
    pub finisher: Option<Finisher>,
    #[serde(default)]
    pub title_holder: bool,
    #[serde(default)]
    pub allies: Vec<String>,
    #[serde(default)]
    pub rivals: Vec<String>,

    // === Match state ===
    /// Track position, 0..=15.
    #[serde(default)]
    pub position: u8,
    /// Set when this wrestler made the most recent movement.
    #[serde(default)]
    pub scored_last: bool,
}

impl Wrestler {
    /// Create a wrestler with no skills, specialty or finisher.
    pub fn new(name: impl Into<String>, tv_grade: TvGrade, grudge_grade: i32) -> Self {
        Self {
            name: name.into(),
            tv_grade,
            grudge_grade: GrudgeGrade(grudge_grade),
            skills: FxHashMap::default(),
            specialty: None,
            finisher: None,
            title_holder: false,
            allies: Vec::new(),
            rivals: Vec::new(),
            position: 0,
            scored_last: false,
        }
    }

    /// Add a skill (builder pattern). Names are case-insensitive.
    #[must_use]
    pub fn with_skill(mut self, skill: &str, zone: SkillZone) -> Self {
        self.skills.insert(skill.to_lowercase(), zone);
        self
    }

    /// Set the specialty move (builder pattern).
    #[must_use]
    pub fn with_specialty(mut self, name: impl Into<String>, points: i32) -> Self {
        self.specialty = Some(Specialty { name: name.into(), points });
        self
    }

    /// Set the finisher (builder pattern).
    #[must_use]
    pub fn with_finisher(mut self, name: impl Into<String>, low: u8, high: u8) -> Self {
        self.finisher = Some(Finisher::new(name, low, high));
        self
    }

    /// Mark as a title holder (builder pattern).
    #[must_use]
    pub fn with_title(mut self) -> Self {
        self.title_holder = true;
        self
    }

    #[must_use]
    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.contains_key(&skill.to_lowercase())
    }

    #[must_use]
    pub fn skill_zone(&self, skill: &str) -> Option<SkillZone> {
        self.skills.get(&skill.to_lowercase()).copied()
    }

    /// Strong or powerful wrestlers resist submissions and can lock up in a
    /// Test of Strength.
    #[must_use]
    pub fn is_powerhouse(&self) -> bool {
        self.has_skill("strong") || self.has_skill("powerful")
    }

    /// Can this skill be used from the wrestler's current position?
    #[must_use]
    pub fn can_use_skill(&self, skill: &str) -> bool {
        self.skill_zone(skill)
            .is_some_and(|zone| crate::rules::track::zone_allows(zone, self.position))
    }

    /// A usable specialty has a name.
    #[must_use]
    pub fn has_specialty(&self) -> bool {
        self.specialty.as_ref().is_some_and(|s| !s.name.trim().is_empty())
    }

    /// Points scored by the specialty move (0 without one).
    #[must_use]
    pub fn specialty_points(&self) -> i32 {
        self.specialty.as_ref().map_or(0, |s| s.points)
    }

    /// Clear per-match state.
    pub fn reset_match_state(&mut self) {
        self.position = 0;
        self.scored_last = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tv_grade_ordering() {
        assert!(TvGrade::AAA > TvGrade::AA);
        assert!(TvGrade::A > TvGrade::C);
        assert!(TvGrade::E > TvGrade::F);
        assert_eq!(TvGrade::ALL.iter().max(), Some(&TvGrade::AAA));
    }

    #[test]
    fn test_tv_grade_parse() {
        assert_eq!("aa".parse::<TvGrade>(), Ok(TvGrade::AA));
        assert_eq!(" AAA ".parse::<TvGrade>(), Ok(TvGrade::AAA));
        assert!("G".parse::<TvGrade>().is_err());
    }

    #[test]
    fn test_kick_out_windows() {
        let expected = [
            (TvGrade::AAA, 43),
            (TvGrade::AA, 36),
            (TvGrade::A, 33),
            (TvGrade::B, 26),
            (TvGrade::C, 23),
            (TvGrade::D, 16),
            (TvGrade::E, 13),
            (TvGrade::F, 11),
        ];
        for (grade, high) in expected {
            assert_eq!(grade.kick_out_window(), 11..=high, "{grade}");
        }
        assert!(TvGrade::F.kick_out_window().contains(&11));
        assert!(!TvGrade::F.kick_out_window().contains(&12));
    }

    #[test]
    fn test_neighbours() {
        assert_eq!(TvGrade::A.neighbours(), vec![TvGrade::AA, TvGrade::A, TvGrade::B]);
        assert_eq!(TvGrade::AAA.neighbours(), vec![TvGrade::AAA, TvGrade::AA]);
        assert_eq!(TvGrade::F.neighbours(), vec![TvGrade::E, TvGrade::F]);
    }

    #[test]
    fn test_grudge_magnitude() {
        assert_eq!(GrudgeGrade(-4).magnitude(), 4);
        assert_eq!(GrudgeGrade(3).magnitude(), 3);
    }

    #[test]
    fn test_finisher_range_inclusive() {
        let f = Finisher::new("Piledriver", 33, 11);
        assert_eq!(f.range, (11, 33));
        assert!(f.hits(11));
        assert!(f.hits(33));
        assert!(!f.hits(34));
    }

    #[test]
    fn test_specialty() {
        let plain = Wrestler::new("A", TvGrade::B, 0);
        assert!(!plain.has_specialty());
        assert_eq!(plain.specialty_points(), 0);

        let special = plain.with_specialty("Moonsault", 4);
        assert!(special.has_specialty());
        assert_eq!(special.specialty_points(), 4);
    }

    #[test]
    fn test_powerhouse() {
        let w = Wrestler::new("A", TvGrade::B, 0);
        assert!(!w.is_powerhouse());
        assert!(w.clone().with_skill("Powerful", SkillZone::Star).is_powerhouse());
        assert!(w.with_skill("strong", SkillZone::Square).is_powerhouse());
    }

    #[test]
    fn test_deserialize_record() {
        let json = r#"{
            "name": "Rex",
            "tv_grade": "aa",
            "grudge_grade": -3,
            "skills": {"Agile": "STAR", "Mean": "circle"},
            "specialty": {"name": "Dropkick", "points": 3},
            "finisher": {"name": "Rex Bomb", "range": [11, 36]}
        }"#;

        let w: Wrestler = serde_json::from_str(json).unwrap();

        assert_eq!(w.tv_grade, TvGrade::AA);
        assert_eq!(w.grudge_grade.magnitude(), 3);
        assert_eq!(w.skill_zone("agile"), Some(SkillZone::Star));
        assert_eq!(w.skill_zone("MEAN"), Some(SkillZone::Circle));
        assert!(w.finisher.as_ref().unwrap().hits(36));
        assert_eq!(w.position, 0);
        assert!(!w.title_holder);
    }
}
