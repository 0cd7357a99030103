//! Fast Action Card records.
//!
//! A `Card` is immutable once loaded. The point payload is normalised into
//! [`CardPoints`] when the record is read, so resolution never has to guess
//! what shape a raw value had.
//!
//! ## Record Format
//!
//! Cards deserialize from the deck file's record shape:
//!
//! ```json
//! {"id": 7, "control": false, "type": "TV", "points": {"A": 3, "C": 1}}
//! {"id": 8, "control": true, "type": "Signature", "points": "d6"}
//! {"id": 9, "control": false, "type": "Agile", "points": 2, "text": "Submission!"}
//! ```

use std::str::FromStr;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::rng::DiceSource;
use crate::roster::TvGrade;

/// Text marker that turns a skill card into a submission hold.
pub const SUBMISSION_MARKER: &str = "Submission!";

/// Text marker for cards that point at a highlight reel table.
pub const HIGHLIGHT_REEL_MARKER: &str = "HIGHLIGHT REEL";

/// Unique identifier for a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card {}", self.0)
    }
}

/// What a card asks the resolver to compare.
///
/// Labels are matched case-insensitively. Anything that is not one of the
/// fixed labels names a skill (`"Agile"`, `"Mean"`, ...).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CardCategory {
    Tv,
    Grudge,
    Specialty,
    Trailing,
    Signature,
    TestOfStrength,
    Helped,
    TitleHolder,
    WildCard,
    HighlightReel,
    RefBump,
    /// Named skill card.
    Skill(String),
}

impl CardCategory {
    /// Label as printed on the card.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            CardCategory::Tv => "TV",
            CardCategory::Grudge => "Grudge",
            CardCategory::Specialty => "Specialty",
            CardCategory::Trailing => "Trailing",
            CardCategory::Signature => "Signature",
            CardCategory::TestOfStrength => "Test of Strength",
            CardCategory::Helped => "Helped",
            CardCategory::TitleHolder => "Title Holder",
            CardCategory::WildCard => "Wild Card",
            CardCategory::HighlightReel => "Highlight Reel",
            CardCategory::RefBump => "Ref Bump",
            CardCategory::Skill(name) => name,
        }
    }

    /// Skill named by a skill card.
    #[must_use]
    pub fn skill(&self) -> Option<&str> {
        match self {
            CardCategory::Skill(name) => Some(name),
            _ => None,
        }
    }

    /// Cards that only ever surface their text.
    #[must_use]
    pub fn is_narrative(&self) -> bool {
        matches!(
            self,
            CardCategory::WildCard | CardCategory::HighlightReel | CardCategory::RefBump
        )
    }

    /// Case-insensitive label comparison.
    #[must_use]
    pub fn matches_label(&self, label: &str) -> bool {
        self.label().eq_ignore_ascii_case(label.trim())
    }

    /// Parse a printed label. Never fails: unknown labels are skill cards.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "tv" => CardCategory::Tv,
            "grudge" => CardCategory::Grudge,
            "specialty" => CardCategory::Specialty,
            "trailing" => CardCategory::Trailing,
            "signature" => CardCategory::Signature,
            "test of strength" => CardCategory::TestOfStrength,
            "helped" => CardCategory::Helped,
            "title holder" => CardCategory::TitleHolder,
            "wild card" => CardCategory::WildCard,
            "highlight reel" => CardCategory::HighlightReel,
            "ref bump" => CardCategory::RefBump,
            _ => CardCategory::Skill(trimmed.to_string()),
        }
    }
}

impl FromStr for CardCategory {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(CardCategory::from_label(s))
    }
}

impl std::fmt::Display for CardCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for CardCategory {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for CardCategory {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(CardCategory::from_label(&label))
    }
}

/// Numeric payload of a card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CardPoints {
    /// Same value for everyone.
    Fixed(i32),
    /// Value depends on the scorer's TV grade. Missing grades score 0.
    ByGrade(FxHashMap<TvGrade, i32>),
    /// Roll one die.
    RollDie,
}

impl CardPoints {
    /// Build a per-grade schedule.
    pub fn by_grade(entries: impl IntoIterator<Item = (TvGrade, i32)>) -> Self {
        CardPoints::ByGrade(entries.into_iter().collect())
    }

    /// Points this payload is worth to a wrestler of `grade`.
    ///
    /// Only `RollDie` touches the dice.
    pub fn resolve(&self, grade: TvGrade, dice: &mut dyn DiceSource) -> i32 {
        match self {
            CardPoints::Fixed(points) => *points,
            CardPoints::ByGrade(schedule) => schedule.get(&grade).copied().unwrap_or(0),
            CardPoints::RollDie => i32::from(dice.roll_d6()),
        }
    }

    /// Does this payload say anything for `grade`? A per-grade schedule
    /// without an entry for it does not.
    #[must_use]
    pub fn covers(&self, grade: TvGrade) -> bool {
        match self {
            CardPoints::ByGrade(schedule) => schedule.contains_key(&grade),
            CardPoints::Fixed(_) | CardPoints::RollDie => true,
        }
    }
}

/// Raw point payload as it appears in deck files.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPoints {
    Int(i64),
    Float(f64),
    Text(String),
    Table(FxHashMap<String, i64>),
}

/// Rejected point payloads.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum PointsError {
    #[error("unknown TV grade '{0}' in point schedule")]
    UnknownGrade(String),

    #[error("unrecognised point marker '{0}' (expected \"d6\")")]
    UnknownMarker(String),

    #[error("point value {0} out of range")]
    OutOfRange(f64),
}

fn narrow(value: f64) -> Result<i32, PointsError> {
    if value.is_finite() && value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX) {
        Ok(value as i32)
    } else {
        Err(PointsError::OutOfRange(value))
    }
}

impl TryFrom<RawPoints> for CardPoints {
    type Error = PointsError;

    fn try_from(raw: RawPoints) -> Result<Self, Self::Error> {
        match raw {
            RawPoints::Int(value) => i32::try_from(value)
                .map(CardPoints::Fixed)
                .map_err(|_| PointsError::OutOfRange(value as f64)),
            RawPoints::Float(value) => narrow(value.trunc()).map(CardPoints::Fixed),
            RawPoints::Text(marker) => {
                let marker = marker.trim();
                if marker.eq_ignore_ascii_case("d6") {
                    Ok(CardPoints::RollDie)
                } else if let Ok(value) = marker.parse::<i32>() {
                    Ok(CardPoints::Fixed(value))
                } else {
                    Err(PointsError::UnknownMarker(marker.to_string()))
                }
            }
            RawPoints::Table(table) => {
                let mut schedule = FxHashMap::default();
                for (label, value) in table {
                    let grade = label
                        .parse::<TvGrade>()
                        .map_err(|_| PointsError::UnknownGrade(label.clone()))?;
                    let value = i32::try_from(value).map_err(|_| PointsError::OutOfRange(value as f64))?;
                    schedule.insert(grade, value);
                }
                Ok(CardPoints::ByGrade(schedule))
            }
        }
    }
}

impl From<CardPoints> for RawPoints {
    fn from(points: CardPoints) -> Self {
        match points {
            CardPoints::Fixed(value) => RawPoints::Int(i64::from(value)),
            CardPoints::RollDie => RawPoints::Text("d6".to_string()),
            CardPoints::ByGrade(schedule) => RawPoints::Table(
                schedule
                    .into_iter()
                    .map(|(grade, value)| (grade.to_string(), i64::from(value)))
                    .collect(),
            ),
        }
    }
}

/// Card record in deck-file shape.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CardRecord {
    pub id: u32,
    #[serde(default, alias = "requires_control")]
    pub control: bool,
    #[serde(rename = "type", alias = "category")]
    pub category: CardCategory,
    #[serde(default)]
    pub points: Option<RawPoints>,
    #[serde(default)]
    pub text: Option<String>,
}

/// A Fast Action Card.
///
/// ## Example
///
/// ```
/// use fttm_engine::cards::{Card, CardCategory, CardId, CardPoints};
/// use fttm_engine::roster::TvGrade;
///
/// let card = Card::new(CardId::new(1), CardCategory::Tv)
///     .with_points(CardPoints::by_grade([(TvGrade::A, 3), (TvGrade::C, 1)]));
///
/// assert!(!card.requires_control);
/// assert!(!card.is_submission());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CardRecord", into = "CardRecord")]
pub struct Card {
    pub id: CardId,
    /// Resolved straight away for whoever is in control, if anyone is.
    pub requires_control: bool,
    pub category: CardCategory,
    /// `None` for cards with no numeric payload.
    pub points: Option<CardPoints>,
    pub text: Option<String>,
}

impl Card {
    /// Create a card with no points and no text.
    pub fn new(id: CardId, category: CardCategory) -> Self {
        Self {
            id,
            requires_control: false,
            category,
            points: None,
            text: None,
        }
    }

    /// Mark as a control card (builder pattern).
    #[must_use]
    pub fn with_control(mut self) -> Self {
        self.requires_control = true;
        self
    }

    /// Set the point payload (builder pattern).
    #[must_use]
    pub fn with_points(mut self, points: CardPoints) -> Self {
        self.points = Some(points);
        self
    }

    /// Set fixed points (builder pattern).
    #[must_use]
    pub fn with_fixed(self, points: i32) -> Self {
        self.with_points(CardPoints::Fixed(points))
    }

    /// Set the card text (builder pattern).
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    fn text_contains(&self, marker: &str) -> bool {
        self.text.as_deref().is_some_and(|t| t.contains(marker))
    }

    #[must_use]
    pub fn is_submission(&self) -> bool {
        self.text_contains(SUBMISSION_MARKER)
    }

    #[must_use]
    pub fn is_wild_card(&self) -> bool {
        self.category == CardCategory::WildCard
    }

    #[must_use]
    pub fn references_highlight_reel(&self) -> bool {
        self.text_contains(HIGHLIGHT_REEL_MARKER)
    }

    /// Points for a wrestler of `grade` (0 with no payload).
    pub fn points_for(&self, grade: TvGrade, dice: &mut dyn DiceSource) -> i32 {
        self.points.as_ref().map_or(0, |p| p.resolve(grade, dice))
    }

    /// One-line summary for turn reports.
    #[must_use]
    pub fn summary(&self) -> String {
        let control = if self.requires_control { "Control" } else { "No Control" };
        format!("{}: {} ({})", self.id, self.category, control)
    }
}

impl TryFrom<CardRecord> for Card {
    type Error = PointsError;

    fn try_from(record: CardRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CardId::new(record.id),
            requires_control: record.control,
            category: record.category,
            points: record.points.map(CardPoints::try_from).transpose()?,
            text: record.text,
        })
    }
}

impl From<Card> for CardRecord {
    fn from(card: Card) -> Self {
        Self {
            id: card.id.raw(),
            control: card.requires_control,
            category: card.category,
            points: card.points.map(RawPoints::from),
            text: card.text,
        }
    }
}
