//! Match rules.
//!
//! Everything that decides who moves and what happens next:
//! - `track`: space classification and skill zones
//! - `resolver`: card dispatch and the per-turn `ResolverContext`
//! - `movement`: scoring, the "scored last" flag, control hand-over
//! - `tiebreak`: choosing between two eligible wrestlers
//! - `subgames`: pin, finisher, submission, test of strength
//! - `hotbox`: ringside allies and Helped cards
//! - `flavor`: pre/post-match rolls and the stub reel tables
//!
//! The engine calls into these modules; none of them hold state between
//! turns.

pub mod flavor;
pub mod hotbox;
pub mod movement;
pub mod resolver;
pub mod subgames;
pub mod tiebreak;
pub mod track;

pub use flavor::{highlight_reel_event, wild_card_event, FlavorPhase, FlavorRoll};
pub use hotbox::{build_hot_box, HotBox, HotBoxRequest, MAX_GRUDGE_SPECTATORS};
pub use movement::{move_wrestler, relocate, set_control, Movement};
pub use resolver::{resolve_card, resolve_triggers, Resolution, ResolverContext};
pub use subgames::{
    Exchange, FinisherReport, PinReport, SubGameReport, SubmissionReport, TestOfStrengthReport,
};
pub use tiebreak::{tie_break, trailing};
pub use track::{SpaceKind, Trigger, FINISHER_SPACE, PIN_SPACES, START_SPACE};
