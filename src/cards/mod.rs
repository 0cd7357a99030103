//! Card system: card records, registry, and deck.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for a card
//! - `CardCategory`: What the resolver compares (TV, Grudge, skills, ...)
//! - `CardPoints`: Fixed, per-grade or roll-a-die payload
//! - `Card`: Immutable card record
//! - `CardRegistry`: Catalog lookup and queries
//! - `Deck`: Draw pile and discard pile

pub mod deck;
pub mod definition;
pub mod registry;

pub use deck::{Deck, Draw};
pub use definition::{
    Card, CardCategory, CardId, CardPoints, CardRecord, PointsError, RawPoints, HIGHLIGHT_REEL_MARKER,
    SUBMISSION_MARKER,
};
pub use registry::CardRegistry;
