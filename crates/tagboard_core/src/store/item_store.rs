//! Item store.
//!
//! # Invariants
//! - A tag appears at most once in one item's list.
//! - Toggling never reorders the other tags of the item.
//! - `set_tags` with an identical list is a silent no-op.

use super::{ChangeFeed, StoreEvent, SubscriptionId};
use crate::model::{ItemDocument, ItemRecord};
use crate::validation::{validate_new_name, NameKind, ValidationError};
use log::debug;

/// Effect of one toggle on a tag list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
}

/// Removes the first occurrence of `tag`, or appends it when absent.
///
/// Toggling twice restores the list only when `tag` was absent or last; a
/// removed inner tag comes back at the end. Use `PendingToggles` when the
/// original position must survive a double toggle.
pub fn toggle_in(tags: &mut Vec<String>, tag: &str) -> ToggleOutcome {
    match tags.iter().position(|current| current == tag) {
        Some(index) => {
            tags.remove(index);
            ToggleOutcome::Removed
        }
        None => {
            tags.push(tag.to_string());
            ToggleOutcome::Added
        }
    }
}

#[derive(Debug, Default)]
pub struct ItemStore {
    items: ItemDocument,
    feed: ChangeFeed,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &ItemDocument {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.feed.version()
    }

    pub fn tags_of(&self, item: &str) -> Option<&[String]> {
        self.items.tags_of(item)
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&StoreEvent) + 'static,
    ) -> SubscriptionId {
        self.feed.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.feed.unsubscribe(id)
    }

    /// Creates an item with an empty tag list.
    ///
    /// # Errors
    /// - `Blank` for empty or whitespace-only names.
    /// - `Duplicate` when the name already exists (compared ignoring case).
    pub fn add_item(&mut self, name: &str) -> Result<(), ValidationError> {
        validate_new_name(NameKind::Item, name, self.items.item_names())?;
        let name = name.trim().to_string();
        self.items.insert(name.clone(), ItemRecord::default());
        debug!(
            "event=item_add module=store status=ok items={}",
            self.items.len()
        );
        self.feed.publish(StoreEvent::ItemAdded { item: name });
        Ok(())
    }

    /// Flips membership of `tag` on `item`. Same ordering caveat as `toggle_in`.
    pub fn toggle_tag(&mut self, item: &str, tag: &str) -> Result<ToggleOutcome, ValidationError> {
        let record = self
            .items
            .get_mut(item)
            .ok_or_else(|| ValidationError::UnknownItem(item.to_string()))?;
        let outcome = toggle_in(&mut record.tags, tag);
        self.feed.publish(StoreEvent::ItemTagsChanged {
            item: item.to_string(),
        });
        Ok(outcome)
    }

    /// Replaces the tag list of `item` wholesale.
    ///
    /// Exact duplicates in `tags` are collapsed first. Returns `false` when the
    /// resulting list equals the current one, in which case nothing is written.
    pub fn set_tags(&mut self, item: &str, tags: Vec<String>) -> Result<bool, ValidationError> {
        let record = self
            .items
            .get_mut(item)
            .ok_or_else(|| ValidationError::UnknownItem(item.to_string()))?;
        let mut tags = tags;
        crate::model::dedup_in_order(&mut tags);
        if record.tags == tags {
            return Ok(false);
        }
        record.tags = tags;
        self.feed.publish(StoreEvent::ItemTagsChanged {
            item: item.to_string(),
        });
        Ok(true)
    }

    /// Replaces the whole item document, e.g. after a successful re-parse.
    pub fn replace(&mut self, items: ItemDocument) {
        if self.items == items {
            return;
        }
        self.items = items;
        debug!(
            "event=items_replace module=store status=ok items={}",
            self.items.len()
        );
        self.feed.publish(StoreEvent::ItemsReplaced);
    }
}

#[cfg(test)]
mod tests {
    use super::{toggle_in, ItemStore, ToggleOutcome};
    use crate::store::PendingToggles;
    use crate::validation::ValidationError;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    fn store_with_apple() -> ItemStore {
        let mut store = ItemStore::new();
        store.replace([("apple", vec!["red"])].into_iter().collect());
        store
    }

    #[test]
    fn toggle_twice_cancels_for_absent_and_trailing_tags() {
        let original = strings(&["a", "b", "c"]);
        for tag in ["z", "c"] {
            let mut tags = original.clone();
            toggle_in(&mut tags, tag);
            toggle_in(&mut tags, tag);
            assert_eq!(tags, original, "tag {tag}");
        }
    }

    /// Known limitation of the stateless primitive: an inner tag loses its
    /// position. Batched edits restore it exactly.
    #[test]
    fn stateless_double_toggle_moves_inner_tag_but_batched_edit_restores_it() {
        let mut tags = strings(&["a", "b", "c"]);
        toggle_in(&mut tags, "a");
        toggle_in(&mut tags, "a");
        assert_eq!(tags, strings(&["b", "c", "a"]));

        let mut store = ItemStore::new();
        store.replace([("apple", vec!["a", "b", "c"])].into_iter().collect());
        let mut pending = PendingToggles::begin(&store, "apple").expect("apple exists");
        pending.toggle("a");
        pending.toggle("a");
        assert!(!pending.commit(&mut store).expect("apple exists"));
        assert_eq!(store.tags_of("apple").expect("entry should exist"), ["a", "b", "c"]);
    }

    #[test]
    fn toggle_removes_without_reordering_others() {
        let mut tags = strings(&["a", "b", "c"]);
        assert_eq!(toggle_in(&mut tags, "b"), ToggleOutcome::Removed);
        assert_eq!(tags, strings(&["a", "c"]));
        assert_eq!(toggle_in(&mut tags, "d"), ToggleOutcome::Added);
        assert_eq!(tags, strings(&["a", "c", "d"]));
    }

    #[test]
    fn add_item_rejects_existing_name() {
        let mut store = store_with_apple();
        let err = store.add_item("apple").expect_err("duplicate item should be rejected");
        assert!(matches!(err, ValidationError::Duplicate { .. }));
        let err = store.add_item("  Apple ").expect_err("duplicate item should be rejected");
        assert!(matches!(err, ValidationError::Duplicate { .. }));
        store.add_item("pear").expect("new item name should be accepted");
        assert_eq!(store.tags_of("pear").expect("entry should exist").len(), 0);
    }

    #[test]
    fn toggle_on_unknown_item_fails() {
        let mut store = store_with_apple();
        assert_eq!(
            store.toggle_tag("kiwi", "red"),
            Err(ValidationError::UnknownItem("kiwi".to_string()))
        );
    }

    #[test]
    fn store_toggle_appends_then_removes() {
        let mut store = store_with_apple();
        store.toggle_tag("apple", "blue").expect("toggle should succeed");
        assert_eq!(store.tags_of("apple").expect("entry should exist"), ["red", "blue"]);
        store.toggle_tag("apple", "blue").expect("toggle should succeed");
        assert_eq!(store.tags_of("apple").expect("entry should exist"), ["red"]);
    }

    #[test]
    fn set_tags_skips_identical_list() {
        let mut store = store_with_apple();
        let version = store.version();
        assert!(!store.set_tags("apple", strings(&["red"])).expect("tags should be set"));
        assert_eq!(store.version(), version);

        assert!(store.set_tags("apple", strings(&["green", "red", "green"])).expect("tags should be set"));
        assert_eq!(store.tags_of("apple").expect("entry should exist"), ["green", "red"]);
        assert_eq!(store.version(), version + 1);
    }
}
