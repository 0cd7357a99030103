//! Event publishing.
//!
//! The engine emits a [`MatchEvent`] whenever match state changes. Hosts
//! subscribe closures to the [`EventNotifier`] to drive a display, a log, or
//! anything else; the engine never depends on what a listener does.

pub mod event;
pub mod notifier;

pub use event::{EventKind, MatchEvent};
pub use notifier::{EventNotifier, Listener, ListenerId};
