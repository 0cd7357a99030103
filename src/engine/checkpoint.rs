//! Saved engine positions.
//!
//! A checkpoint holds everything that decides how the rest of a match plays
//! out: the match state, the order of both card piles and the position in
//! the dice stream. Restoring one replays the same turns from that point.

use serde::{Deserialize, Serialize};

use crate::cards::Deck;
use crate::core::rng::GameRngState;
use crate::core::state::MatchState;

/// Snapshot of a match in progress, taken with seeded dice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCheckpoint {
    /// `None` when taken before `setup`.
    pub state: Option<MatchState>,
    pub deck: Deck,
    pub dice: GameRngState,
}

impl MatchCheckpoint {
    /// Turns played when the checkpoint was taken.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.state.as_ref().map_or(0, |state| state.turn_number)
    }
}
