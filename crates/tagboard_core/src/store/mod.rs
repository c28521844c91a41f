//! Mutable taxonomy and item stores with change subscription.
//!
//! # Responsibility
//! - Own the canonical taxonomy and item document of one session.
//! - Gate every mutation through validated operations.
//! - Publish a `StoreEvent` and bump a version counter on every write.
//!
//! # Invariants
//! - A no-op write publishes nothing and keeps the version unchanged.
//! - Listeners run synchronously, after the mutation completed.

pub mod item_store;
pub mod pending;
pub mod taxonomy_store;

pub use item_store::{ItemStore, ToggleOutcome};
pub use pending::PendingToggles;
pub use taxonomy_store::TaxonomyStore;

use std::fmt::{Debug, Formatter};

/// Handle returned by `subscribe`, used to unsubscribe.
pub type SubscriptionId = u64;

/// Change notification published by the stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// Whole taxonomy replaced (text re-parse, category add).
    TaxonomyReplaced,
    /// One tag appended to `category`; item-derived views are stale.
    TagAdded { category: String },
    /// Whole item document replaced.
    ItemsReplaced,
    /// One empty item created.
    ItemAdded { item: String },
    /// Tag list of `item` changed.
    ItemTagsChanged { item: String },
}

type Listener = Box<dyn FnMut(&StoreEvent)>;

/// Version counter plus listener list shared by both stores.
#[derive(Default)]
pub struct ChangeFeed {
    version: u64,
    next_id: SubscriptionId,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl ChangeFeed {
    /// Monotonic counter bumped once per published event.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&StoreEvent) + 'static) -> SubscriptionId {
        self.next_id += 1;
        let id = self.next_id;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes one listener. Returns `false` for unknown ids.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(current, _)| *current != id);
        self.listeners.len() != before
    }

    pub(crate) fn publish(&mut self, event: StoreEvent) {
        self.version += 1;
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }
}

impl Debug for ChangeFeed {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeFeed")
            .field("version", &self.version)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{ChangeFeed, StoreEvent};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn publish_bumps_version_and_notifies_listeners() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut feed = ChangeFeed::default();
        let id = feed.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        feed.publish(StoreEvent::ItemsReplaced);
        assert_eq!(feed.version(), 1);
        assert_eq!(*seen.borrow(), vec![StoreEvent::ItemsReplaced]);

        assert!(feed.unsubscribe(id));
        assert!(!feed.unsubscribe(id));
        feed.publish(StoreEvent::TaxonomyReplaced);
        assert_eq!(feed.version(), 2);
        assert_eq!(seen.borrow().len(), 1);
    }
}
