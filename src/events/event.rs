//! Match events.
//!
//! The engine publishes a `MatchEvent` for every observable state change.
//! Events carry owned copies of what changed so a listener never needs to
//! look back into the engine.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardId};
use crate::core::side::Side;
use crate::core::state::MatchResult;
use crate::rules::hotbox::HotBox;
use crate::rules::movement::Movement;
use crate::rules::subgames::{FinisherReport, PinReport, SubmissionReport, TestOfStrengthReport};

/// Event discriminant, used to subscribe to one kind of event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    CardDrawn,
    CardResolved,
    WrestlerMoved,
    PinAttempted,
    FinisherAttempted,
    SubmissionApplied,
    TestOfStrength,
    MatchEnded,
    InControlChanged,
    HotBoxUpdated,
    DeckReshuffled,
    ErrorOccurred,
}

/// Something that happened in a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchEvent {
    CardDrawn {
        turn: u32,
        card: Card,
    },
    CardResolved {
        turn: u32,
        card: CardId,
        narrative: Vec<String>,
    },
    WrestlerMoved(Movement),
    PinAttempted(PinReport),
    FinisherAttempted(FinisherReport),
    SubmissionApplied(SubmissionReport),
    TestOfStrength(TestOfStrengthReport),
    MatchEnded(MatchResult),
    InControlChanged {
        from: Option<Side>,
        to: Option<Side>,
        wrestler: Option<String>,
    },
    HotBoxUpdated(HotBox),
    DeckReshuffled {
        cards: usize,
    },
    ErrorOccurred {
        operation: String,
        message: String,
    },
}

impl MatchEvent {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            MatchEvent::CardDrawn { .. } => EventKind::CardDrawn,
            MatchEvent::CardResolved { .. } => EventKind::CardResolved,
            MatchEvent::WrestlerMoved(_) => EventKind::WrestlerMoved,
            MatchEvent::PinAttempted(_) => EventKind::PinAttempted,
            MatchEvent::FinisherAttempted(_) => EventKind::FinisherAttempted,
            MatchEvent::SubmissionApplied(_) => EventKind::SubmissionApplied,
            MatchEvent::TestOfStrength(_) => EventKind::TestOfStrength,
            MatchEvent::MatchEnded(_) => EventKind::MatchEnded,
            MatchEvent::InControlChanged { .. } => EventKind::InControlChanged,
            MatchEvent::HotBoxUpdated(_) => EventKind::HotBoxUpdated,
            MatchEvent::DeckReshuffled { .. } => EventKind::DeckReshuffled,
            MatchEvent::ErrorOccurred { .. } => EventKind::ErrorOccurred,
        }
    }
}
