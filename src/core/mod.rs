//! Core match types: sides, dice, configuration, state.
//!
//! These are the building blocks every other module works with. Nothing in
//! here knows how a card is resolved.

pub mod config;
pub mod rng;
pub mod side;
pub mod state;

pub use config::MatchConfig;
pub use rng::{shuffle, DiceSource, GameRng, GameRngState, ScriptedDice};
pub use side::{Side, SideMap};
pub use state::{MatchResult, MatchState, MatchStatus, TurnRecord, WinMethod};
