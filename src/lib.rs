//! # fttm-engine
//!
//! Match resolution engine for the Face to the Mat wrestling card game.
//!
//! ## Design Principles
//!
//! 1. **One Source of Chance**: every die roll and shuffle goes through a
//!    single `DiceSource`. Swap in `ScriptedDice` and a match replays
//!    exactly.
//!
//! 2. **Two Corners**: the favored (face) and underdog (heel) wrestlers are
//!    addressed by `Side`, and anything kept per wrestler lives in a
//!    `SideMap`.
//!
//! 3. **Data In, Reports Out**: cards and wrestlers are plain `serde`
//!    records; every operation answers with a `Response` and publishes
//!    `MatchEvent`s. The engine never renders or prints.
//!
//! ## Architecture
//!
//! - **Tagged Card Points**: raw card data (`3`, `{"A": 3}`, `"d6"`) is
//!   converted once at load time into `CardPoints`.
//!
//! - **Sticky Control**: the wrestler in control keeps it until the other
//!   wrestler scores.
//!
//! - **Persistent History**: turn records live in an `im::Vector`, so match
//!   snapshots are cheap to clone.
//!
//! ## Modules
//!
//! - `core`: sides, dice, configuration, match state
//! - `cards`: card records, registry and deck
//! - `roster`: wrestler records and the `Roster` trait
//! - `rules`: track, card resolution, movement, sub-games, Hot Box, flavor rolls
//! - `events`: match events and the notifier
//! - `engine`: the `MatchEngine` facade

pub mod cards;
pub mod core;
pub mod engine;
pub mod error;
pub mod events;
pub mod roster;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{
    DiceSource, GameRng, GameRngState, MatchConfig, MatchResult, MatchState, MatchStatus,
    ScriptedDice, Side, SideMap, TurnRecord, WinMethod,
};

pub use crate::cards::{Card, CardCategory, CardId, CardPoints, CardRegistry, Deck};

pub use crate::roster::{
    Finisher, GradeKind, GrudgeGrade, InMemoryRoster, Roster, SkillZone, Specialty, TvGrade,
    Wrestler,
};

pub use crate::rules::{HotBox, HotBoxRequest, Movement, Resolution, SubGameReport};

pub use crate::events::{EventKind, EventNotifier, ListenerId, MatchEvent};

pub use crate::engine::{MatchCheckpoint, MatchEngine, Response, ResponseData, TurnReport};

pub use crate::error::{EngineError, EngineResult};
