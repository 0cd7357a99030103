//! Uniform result shape for engine operations.
//!
//! Every `MatchEngine` operation answers with a [`Response`]: whether it
//! worked, a human-readable message, and structured data for the host.
//! Failures keep the underlying [`EngineError`] for programmatic checks.

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::core::side::SideMap;
use crate::error::EngineError;
use crate::roster::GradeChange;
use crate::rules::{FlavorRoll, HotBox, Movement, Resolution};

/// Everything the host needs to show for one turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    pub turn: u32,
    pub card: Card,
    /// The discard pile was reshuffled to make this draw.
    pub reshuffled: bool,
    pub control_before: Option<String>,
    pub control_after: Option<String>,
    pub positions: SideMap<u8>,
    pub resolution: Resolution,
}

impl TurnReport {
    /// Did this turn end the match?
    #[must_use]
    pub fn ended_match(&self) -> bool {
        self.resolution.result.is_some()
    }
}

/// Structured payload of a response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseData {
    #[default]
    Empty,
    Setup {
        favored: String,
        underdog: String,
    },
    Turn(Box<TurnReport>),
    Control {
        wrestler: Option<String>,
    },
    Position(Movement),
    HotBox(HotBox),
    Flavor(FlavorRoll),
    Grade(GradeChange),
}

/// Result of an engine operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub succeeded: bool,
    pub message: String,
    pub data: ResponseData,
    /// Set on failure.
    #[serde(skip)]
    pub error: Option<EngineError>,
}

impl Response {
    /// Successful response.
    pub fn success(message: impl Into<String>, data: ResponseData) -> Self {
        Self {
            succeeded: true,
            message: message.into(),
            data,
            error: None,
        }
    }

    /// Failed response carrying the error's message.
    #[must_use]
    pub fn failure(error: EngineError) -> Self {
        Self {
            succeeded: false,
            message: error.to_string(),
            data: ResponseData::Empty,
            error: Some(error),
        }
    }

    /// Turn report, for `play_turn` responses.
    #[must_use]
    pub fn turn(&self) -> Option<&TurnReport> {
        match &self.data {
            ResponseData::Turn(report) => Some(report),
            _ => None,
        }
    }

    /// Flavor roll, for pre/post-match responses.
    #[must_use]
    pub fn flavor(&self) -> Option<&FlavorRoll> {
        match &self.data {
            ResponseData::Flavor(roll) => Some(roll),
            _ => None,
        }
    }
}
