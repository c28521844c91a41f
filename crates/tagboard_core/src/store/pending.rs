//! Batched toggles for one item, committed through `ItemStore::set_tags`.
//!
//! # Invariants
//! - The working list is derived from the list captured at `begin` plus the
//!   set of toggled tags, so toggling a tag twice always restores the
//!   captured list exactly, position included.
//! - Nothing reaches the store until `commit`.

use super::item_store::{ItemStore, ToggleOutcome};
use crate::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingToggles {
    item: String,
    original: Vec<String>,
    flipped: Vec<String>,
}

impl PendingToggles {
    /// Captures the current tags of `item`.
    pub fn begin(store: &ItemStore, item: &str) -> Result<Self, ValidationError> {
        let original = store
            .tags_of(item)
            .ok_or_else(|| ValidationError::UnknownItem(item.to_string()))?
            .to_vec();
        Ok(Self {
            item: item.to_string(),
            original,
            flipped: Vec::new(),
        })
    }

    pub fn item(&self) -> &str {
        &self.item
    }

    /// Flips `tag` in the working list.
    pub fn toggle(&mut self, tag: &str) -> ToggleOutcome {
        match self.flipped.iter().position(|current| current == tag) {
            Some(index) => {
                self.flipped.remove(index);
            }
            None => self.flipped.push(tag.to_string()),
        }
        if self.contains(tag) {
            ToggleOutcome::Added
        } else {
            ToggleOutcome::Removed
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        let originally = self.original.iter().any(|current| current == tag);
        let flipped = self.flipped.iter().any(|current| current == tag);
        originally != flipped
    }

    pub fn is_dirty(&self) -> bool {
        !self.flipped.is_empty()
    }

    /// Working tag list: captured tags minus removals, then additions in toggle order.
    pub fn tags(&self) -> Vec<String> {
        let mut tags = self
            .original
            .iter()
            .filter(|tag| !self.flipped.contains(tag))
            .cloned()
            .collect::<Vec<_>>();
        tags.extend(
            self.flipped
                .iter()
                .filter(|tag| !self.original.contains(tag))
                .cloned(),
        );
        tags
    }

    /// Writes the working list. Returns whether the store changed.
    pub fn commit(self, store: &mut ItemStore) -> Result<bool, ValidationError> {
        let tags = self.tags();
        store.set_tags(&self.item, tags)
    }
}

#[cfg(test)]
mod tests {
    use super::PendingToggles;
    use crate::store::{ItemStore, ToggleOutcome};

    fn store() -> ItemStore {
        let mut store = ItemStore::new();
        store.replace([("apple", vec!["red", "sweet", "round"])].into_iter().collect());
        store
    }

    #[test]
    fn double_toggle_restores_position() {
        let store = store();
        let mut pending = PendingToggles::begin(&store, "apple").expect("item should exist");
        assert_eq!(pending.toggle("red"), ToggleOutcome::Removed);
        assert_eq!(pending.toggle("red"), ToggleOutcome::Added);
        assert!(!pending.is_dirty());
        assert_eq!(pending.tags(), vec!["red", "sweet", "round"]);
    }

    #[test]
    fn commit_applies_batch_once() {
        let mut store = store();
        let version = store.version();
        let mut pending = PendingToggles::begin(&store, "apple").expect("item should exist");
        pending.toggle("sweet");
        pending.toggle("crisp");
        pending.toggle("tart");
        pending.toggle("crisp");
        assert!(pending.commit(&mut store).expect("commit should succeed"));
        assert_eq!(store.tags_of("apple").expect("entry should exist"), ["red", "round", "tart"]);
        assert_eq!(store.version(), version + 1);
    }

    #[test]
    fn clean_commit_does_not_write() {
        let mut store = store();
        let version = store.version();
        let pending = PendingToggles::begin(&store, "apple").expect("item should exist");
        assert!(!pending.commit(&mut store).expect("commit should succeed"));
        assert_eq!(store.version(), version);
    }
}
