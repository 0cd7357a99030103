//! The 16-space track.
//!
//! Spaces 0..=14 alternate between circle and square zones (with a run of
//! squares on the pin spaces); space 15 is the Finisher space, where any
//! skill may be used.

use serde::{Deserialize, Serialize};

use crate::roster::SkillZone;

/// Starting space.
pub const START_SPACE: u8 = 0;

/// Last space on the track. Reaching it triggers a finisher attempt.
pub const FINISHER_SPACE: u8 = 15;

/// Spaces that trigger a pin attempt.
pub const PIN_SPACES: [u8; 3] = [12, 13, 14];

/// Square-zone spaces.
pub const SQUARE_SPACES: [u8; 7] = [5, 7, 9, 11, 12, 13, 14];

/// Circle-zone spaces.
pub const CIRCLE_SPACES: [u8; 8] = [0, 1, 2, 3, 4, 6, 8, 10];

/// Classification of a single space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpaceKind {
    Circle,
    Square,
    /// Square space that also triggers a pin attempt.
    Pin,
    Finisher,
}

impl SpaceKind {
    /// Classify a position. Anything past the end counts as the Finisher
    /// space.
    #[must_use]
    pub fn of(position: u8) -> Self {
        if position >= FINISHER_SPACE {
            SpaceKind::Finisher
        } else if PIN_SPACES.contains(&position) {
            SpaceKind::Pin
        } else if SQUARE_SPACES.contains(&position) {
            SpaceKind::Square
        } else {
            SpaceKind::Circle
        }
    }

    #[must_use]
    pub const fn is_square(self) -> bool {
        matches!(self, SpaceKind::Square | SpaceKind::Pin)
    }
}

/// Sub-game a resulting position sets off, if any.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trigger {
    Pin,
    Finisher,
}

impl Trigger {
    #[must_use]
    pub fn for_position(position: u8) -> Option<Self> {
        match SpaceKind::of(position) {
            SpaceKind::Pin => Some(Trigger::Pin),
            SpaceKind::Finisher => Some(Trigger::Finisher),
            _ => None,
        }
    }
}

/// Can a skill of this zone be used from `position`?
#[must_use]
pub fn zone_allows(zone: SkillZone, position: u8) -> bool {
    if zone == SkillZone::Star {
        return true;
    }
    match SpaceKind::of(position) {
        SpaceKind::Finisher => true,
        kind if kind.is_square() => zone == SkillZone::Square,
        _ => zone == SkillZone::Circle,
    }
}

/// Add `points` to `position`, staying on the track. Any `i32` is accepted.
#[must_use]
pub fn advance(position: u8, points: i32) -> u8 {
    i32::from(position).saturating_add(points).clamp(i32::from(START_SPACE), i32::from(FINISHER_SPACE)) as u8
}
