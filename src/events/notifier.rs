//! Listener registry.
//!
//! Listeners are plain closures. They run synchronously, in registration
//! order, on the call stack of the engine operation that published the
//! event. A listener only ever sees `&MatchEvent`; it has no path back into
//! the engine.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::event::{EventKind, MatchEvent};

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenerId(pub u32);

impl ListenerId {
    /// Create a new listener ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Listener({})", self.0)
    }
}

/// Boxed listener callback.
pub type Listener = Box<dyn FnMut(&MatchEvent)>;

struct Subscription {
    id: ListenerId,
    /// `None` = every event.
    kind: Option<EventKind>,
    listener: Listener,
}

/// Synchronous publish/subscribe hub.
///
/// ## Example
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use fttm_engine::events::{EventKind, EventNotifier, MatchEvent};
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let mut notifier = EventNotifier::new();
///
/// let sink = Rc::clone(&seen);
/// notifier.subscribe_to(EventKind::DeckReshuffled, move |e| sink.borrow_mut().push(e.kind()));
///
/// notifier.publish(&MatchEvent::DeckReshuffled { cards: 12 });
/// assert_eq!(*seen.borrow(), vec![EventKind::DeckReshuffled]);
/// ```
#[derive(Default)]
pub struct EventNotifier {
    subscriptions: Vec<Subscription>,
    next_id: u32,
}

impl EventNotifier {
    /// Create a notifier with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen to every event.
    pub fn subscribe(&mut self, listener: impl FnMut(&MatchEvent) + 'static) -> ListenerId {
        self.add(None, Box::new(listener))
    }

    /// Listen to one kind of event.
    pub fn subscribe_to(
        &mut self,
        kind: EventKind,
        listener: impl FnMut(&MatchEvent) + 'static,
    ) -> ListenerId {
        self.add(Some(kind), Box::new(listener))
    }

    fn add(&mut self, kind: Option<EventKind>, listener: Listener) -> ListenerId {
        let id = ListenerId::new(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription { id, kind, listener });
        id
    }

    /// Remove a listener. Returns false if the ID was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    /// Deliver an event to every interested listener, in registration order.
    pub fn publish(&mut self, event: &MatchEvent) {
        let kind = event.kind();
        trace!(?kind, listeners = self.subscriptions.len(), "Publishing event");
        for sub in &mut self.subscriptions {
            if sub.kind.map_or(true, |k| k == kind) {
                (sub.listener)(event);
            }
        }
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Check if no listeners are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

impl std::fmt::Debug for EventNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventNotifier")
            .field("listeners", &self.subscriptions.len())
            .finish()
    }
}
