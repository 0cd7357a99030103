//! Pre- and post-match flavor rolls.
//!
//! A flavor roll is one die plus one d66. The die picks which highlight reel
//! to read from; the d66 picks the entry. The reel tables themselves live
//! outside the engine, so [`highlight_reel_event`] and [`wild_card_event`]
//! know only a handful of entries and describe the rest as placeholders.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::rng::DiceSource;
use crate::core::side::Side;

/// Highest die face that sends a roll to the storyline reels (`O` / `X`).
const STORYLINE_MAX: u8 = 4;

/// When the roll was made.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlavorPhase {
    PreMatch,
    PostMatch,
}

impl std::fmt::Display for FlavorPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlavorPhase::PreMatch => write!(f, "Pre-Match"),
            FlavorPhase::PostMatch => write!(f, "Post-Match"),
        }
    }
}

/// Result of a flavor roll.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlavorRoll {
    pub phase: FlavorPhase,
    pub die: u8,
    pub d66: u8,
    /// Highlight reel to consult.
    pub reel: char,
    /// Winning corner, for post-match rolls that depend on it.
    pub winner: Option<Side>,
    /// Reel entry for `d66`.
    pub event: String,
}

impl FlavorRoll {
    fn new(phase: FlavorPhase, die: u8, d66: u8, reel: char, winner: Option<Side>) -> Self {
        Self {
            phase,
            die,
            d66,
            reel,
            winner,
            event: highlight_reel_event(reel, d66),
        }
    }

    /// Human-readable summary.
    #[must_use]
    pub fn message(&self) -> String {
        let winner = match self.winner {
            Some(side) => format!(" {} won.", side.alignment()),
            None => String::new(),
        };
        format!(
            "{}: Rolled d6: {}, d66: {}.{} Use Highlight Reel '{}'",
            self.phase, self.die, self.d66, winner, self.reel
        )
    }
}

/// Roll before the bell: `O` on 1-4, `R` on 5-6.
pub fn pre_match(dice: &mut dyn DiceSource) -> FlavorRoll {
    let die = dice.roll_d6();
    let d66 = dice.roll_d66();
    let reel = if die <= STORYLINE_MAX { 'O' } else { 'R' };
    debug!(die, d66, %reel, "Pre-match roll");
    FlavorRoll::new(FlavorPhase::PreMatch, die, d66, reel, None)
}

/// Roll after the match: `X` on 1-4; otherwise `T` when the favored (face)
/// wrestler won and `U` when the underdog (heel) did.
pub fn post_match(dice: &mut dyn DiceSource, winner: Side) -> FlavorRoll {
    let die = dice.roll_d6();
    let d66 = dice.roll_d66();
    if die <= STORYLINE_MAX {
        debug!(die, d66, "Post-match roll");
        return FlavorRoll::new(FlavorPhase::PostMatch, die, d66, 'X', None);
    }
    let reel = match winner {
        Side::Favored => 'T',
        Side::Underdog => 'U',
    };
    debug!(die, d66, %reel, %winner, "Post-match roll");
    FlavorRoll::new(FlavorPhase::PostMatch, die, d66, reel, Some(winner))
}

/// Highlight reel entry. Only the gang (`G`), manager (`M`) and valet (`V`)
/// reels have entries, for 11 and 12.
#[must_use]
pub fn highlight_reel_event(reel: char, roll: u8) -> String {
    let who = match reel.to_ascii_uppercase() {
        'G' => Some("Gang/group"),
        'M' => Some("Manager"),
        'V' => Some("Valet"),
        _ => None,
    };
    match (who, roll) {
        (Some(who), 11) => format!("{who} turns on wrestler. Gain +2 Grudge."),
        (Some(who), 12) => format!("{who} helps wrestler get the win."),
        _ => format!("Highlight Reel {reel} event (roll: {roll}). Not in the built-in tables."),
    }
}

/// Wild card chart entry for the `Physical` and `Mental` charts.
#[must_use]
pub fn wild_card_event(kind: &str, roll: u8) -> String {
    let entry = match (kind.trim().to_ascii_lowercase().as_str(), roll) {
        ("physical", 11) => Some("Wrestler injures their opponent. -1 TV for opponent."),
        ("physical", 12) => Some("Wrestler performs an amazing move. +1 TV."),
        ("mental", 11) => Some("Wrestler outwits their opponent. Score 2 points."),
        ("mental", 12) => Some("Wrestler applies a technical hold. Opponent must roll to escape."),
        _ => None,
    };
    entry.map_or_else(
        || format!("Wild Card {kind} event (roll: {roll}). Not in the built-in tables."),
        str::to_string,
    )
}
