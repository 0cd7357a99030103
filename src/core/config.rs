//! Match configuration.
//!
//! The rule set is fixed; `MatchConfig` only carries the knobs that vary
//! between tables (and between historical rule variants).

use serde::{Deserialize, Serialize};

use crate::rules::track::{FINISHER_SPACE, START_SPACE};

/// Match configuration parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Seed for the engine's dice when no dice source is injected.
    pub seed: u64,

    /// Maximum exchanges in a Test of Strength (`None` = until the referee
    /// breaks it on a 3-4).
    pub test_of_strength_exchanges: Option<u32>,

    /// Space a wrestler falls back to after a failed finisher.
    pub finisher_reset_space: u8,

    /// Grudge spectators seated automatically when none are named.
    pub grudge_spectators: usize,

    /// Turn records kept in the match history (`None` = all).
    pub history_limit: Option<usize>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            test_of_strength_exchanges: Some(3),
            finisher_reset_space: 9,
            grudge_spectators: 2,
            history_limit: None,
        }
    }
}

impl MatchConfig {
    /// Set the dice seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the Test of Strength exchange cap.
    pub fn with_test_of_strength_exchanges(mut self, cap: Option<u32>) -> Self {
        self.test_of_strength_exchanges = cap;
        self
    }

    /// Set the failed-finisher fallback space (clamped onto the track).
    pub fn with_finisher_reset_space(mut self, space: u8) -> Self {
        self.finisher_reset_space = space.clamp(START_SPACE, FINISHER_SPACE);
        self
    }

    /// Set how many turn records the history keeps.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }
}
