//! Choosing a mover when both wrestlers qualify.

use crate::core::side::Side;
use crate::core::state::MatchState;

/// Pick the mover when both wrestlers are eligible for the same card.
///
/// The wrestler further back moves. On level positions the favored
/// wrestler wins the tie.
#[must_use]
pub fn tie_break(state: &MatchState) -> Side {
    if state.position(Side::Underdog) < state.position(Side::Favored) {
        Side::Underdog
    } else {
        Side::Favored
    }
}

/// The trailing wrestler. Level positions count the underdog as trailing.
#[must_use]
pub fn trailing(state: &MatchState) -> Side {
    if state.position(Side::Favored) < state.position(Side::Underdog) {
        Side::Favored
    } else {
        Side::Underdog
    }
}
