//! Match state.
//!
//! ## MatchState
//!
//! Everything one match mutates:
//! - The two principals (copies taken from the roster at setup)
//! - Who is in control, if anyone
//! - The Hot Box
//! - The card being resolved
//! - Whether the match is still running, and who won if not
//! - The turn history
//!
//! The history is an `im::Vector`, so cloning a state to roll back a failed
//! turn is cheap.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::side::{Side, SideMap};
use crate::cards::{Card, CardId};
use crate::error::{EngineError, EngineResult};
use crate::roster::Wrestler;
use crate::rules::hotbox::HotBox;
use crate::rules::track::FINISHER_SPACE;

/// How a match was won.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WinMethod {
    Pinfall,
    Finisher,
}

impl std::fmt::Display for WinMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WinMethod::Pinfall => write!(f, "pinfall"),
            WinMethod::Finisher => write!(f, "finisher"),
        }
    }
}

/// Result of a completed match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub winner: Side,
    pub winner_name: String,
    pub method: WinMethod,
}

impl MatchResult {
    #[must_use]
    pub fn is_winner(&self, side: Side) -> bool {
        self.winner == side
    }
}

/// Whether the match is still running.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    #[default]
    InProgress,
    Finished(MatchResult),
}

/// One resolved turn, as kept in the history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub turn: u32,
    pub card: CardId,
    pub category: String,
    pub control_before: Option<Side>,
    pub control_after: Option<Side>,
    pub positions: SideMap<u8>,
    pub narrative: Vec<String>,
    /// Headline of the sub-game played this turn, if any.
    pub outcome: Option<String>,
}

/// State of one match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    pub wrestlers: SideMap<Wrestler>,
    pub in_control: Option<Side>,
    pub hot_box: HotBox,
    pub current_card: Option<Card>,
    pub status: MatchStatus,
    pub turn_number: u32,
    pub history: Vector<TurnRecord>,
}

impl MatchState {
    /// Start a match. Both wrestlers begin on the start space with no
    /// momentum.
    pub fn new(mut favored: Wrestler, mut underdog: Wrestler) -> Self {
        favored.reset_match_state();
        underdog.reset_match_state();
        Self {
            wrestlers: SideMap::new(favored, underdog),
            in_control: None,
            hot_box: HotBox::default(),
            current_card: None,
            status: MatchStatus::InProgress,
            turn_number: 0,
            history: Vector::new(),
        }
    }

    // === Participants ===

    #[must_use]
    pub fn wrestler(&self, side: Side) -> &Wrestler {
        &self.wrestlers[side]
    }

    pub fn wrestler_mut(&mut self, side: Side) -> &mut Wrestler {
        &mut self.wrestlers[side]
    }

    /// Which corner a wrestler is in, by name.
    #[must_use]
    pub fn side_of(&self, name: &str) -> Option<Side> {
        self.wrestlers.find(|w| w.name == name)
    }

    /// Like [`side_of`](Self::side_of) but an error for non-participants.
    pub fn require_side(&self, name: &str) -> EngineResult<Side> {
        self.side_of(name)
            .ok_or_else(|| EngineError::NotInMatch(name.to_string()))
    }

    #[must_use]
    pub fn position(&self, side: Side) -> u8 {
        self.wrestlers[side].position
    }

    #[must_use]
    pub fn positions(&self) -> SideMap<u8> {
        self.wrestlers.map(|w| w.position)
    }

    // === Control ===

    /// The wrestler in control, if anyone is.
    #[must_use]
    pub fn controller(&self) -> Option<&Wrestler> {
        self.in_control.map(|side| &self.wrestlers[side])
    }

    #[must_use]
    pub fn controller_name(&self) -> Option<&str> {
        self.controller().map(|w| w.name.as_str())
    }

    /// Set the wrestler in control. Returns the previous holder.
    pub fn set_in_control(&mut self, side: Option<Side>) -> Option<Side> {
        std::mem::replace(&mut self.in_control, side)
    }

    // === Status ===

    #[must_use]
    pub fn is_over(&self) -> bool {
        matches!(self.status, MatchStatus::Finished(_))
    }

    #[must_use]
    pub fn result(&self) -> Option<&MatchResult> {
        match &self.status {
            MatchStatus::Finished(result) => Some(result),
            MatchStatus::InProgress => None,
        }
    }

    /// Fails once the match has a winner.
    pub fn ensure_in_progress(&self) -> EngineResult<()> {
        if self.is_over() {
            Err(EngineError::MatchOver)
        } else {
            Ok(())
        }
    }

    /// End the match.
    pub fn finish(&mut self, winner: Side, method: WinMethod) -> MatchResult {
        let result = MatchResult {
            winner,
            winner_name: self.wrestlers[winner].name.clone(),
            method,
        };
        self.status = MatchStatus::Finished(result.clone());
        result
    }

    // === Manual overrides ===

    /// Place a wrestler anywhere on the track. Returns the old position.
    pub fn place(&mut self, side: Side, position: i32) -> EngineResult<u8> {
        let position = u8::try_from(position)
            .ok()
            .filter(|&p| p <= FINISHER_SPACE)
            .ok_or(EngineError::PositionOutOfRange(position))?;
        Ok(std::mem::replace(&mut self.wrestlers[side].position, position))
    }

    // === History ===

    /// Append a turn record, dropping the oldest beyond `limit`.
    pub fn record_turn(&mut self, record: TurnRecord, limit: Option<usize>) {
        self.history.push_back(record);
        if let Some(limit) = limit {
            while self.history.len() > limit {
                self.history.pop_front();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::TvGrade;

    fn state() -> MatchState {
        let mut face = Wrestler::new("Face", TvGrade::A, 2);
        face.position = 9;
        MatchState::new(face, Wrestler::new("Heel", TvGrade::C, -3))
    }

    fn record(turn: u32) -> TurnRecord {
        TurnRecord {
            turn,
            card: CardId::new(turn),
            category: "TV".into(),
            control_before: None,
            control_after: Some(Side::Favored),
            positions: SideMap::with_value(0),
            narrative: Vec::new(),
            outcome: None,
        }
    }

    #[test]
    fn test_new_resets_positions() {
        let state = state();
        assert_eq!(state.positions(), SideMap::new(0, 0));
        assert_eq!(state.in_control, None);
        assert!(!state.is_over());
    }

    #[test]
    fn test_side_lookup() {
        let state = state();
        assert_eq!(state.side_of("Heel"), Some(Side::Underdog));
        assert_eq!(
            state.require_side("Ghost"),
            Err(EngineError::NotInMatch("Ghost".into()))
        );
    }

    #[test]
    fn test_control() {
        let mut state = state();
        assert_eq!(state.set_in_control(Some(Side::Underdog)), None);
        assert_eq!(state.controller_name(), Some("Heel"));
        assert_eq!(state.set_in_control(None), Some(Side::Underdog));
    }

    #[test]
    fn test_place_validates_range() {
        let mut state = state();
        assert_eq!(state.place(Side::Favored, 15), Ok(0));
        assert_eq!(state.position(Side::Favored), 15);
        assert_eq!(state.place(Side::Favored, 16), Err(EngineError::PositionOutOfRange(16)));
        assert_eq!(state.place(Side::Favored, -1), Err(EngineError::PositionOutOfRange(-1)));
        assert_eq!(state.position(Side::Favored), 15);
    }

    #[test]
    fn test_finish_blocks_further_play() {
        let mut state = state();
        let result = state.finish(Side::Underdog, WinMethod::Pinfall);
        assert_eq!(result.winner_name, "Heel");
        assert!(state.is_over());
        assert_eq!(state.ensure_in_progress(), Err(EngineError::MatchOver));
        assert!(state.result().unwrap().is_winner(Side::Underdog));
    }

    #[test]
    fn test_history_limit() {
        let mut state = state();
        for turn in 1..=5 {
            state.record_turn(record(turn), Some(3));
        }
        let turns: Vec<_> = state.history.iter().map(|r| r.turn).collect();
        assert_eq!(turns, vec![3, 4, 5]);

        let snapshot = state.clone();
        state.record_turn(record(6), None);
        assert_eq!(snapshot.history.len(), 3);
        assert_eq!(state.history.len(), 4);
    }
}
