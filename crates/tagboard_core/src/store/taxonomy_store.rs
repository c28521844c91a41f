//! Taxonomy store.
//!
//! # Invariants
//! - Tags are only ever appended; existing order is never rewritten.
//! - No category primitive: categories come from taxonomy content.

use super::{ChangeFeed, StoreEvent, SubscriptionId};
use crate::model::Taxonomy;
use crate::validation::{validate_new_name, NameKind, ValidationError};
use log::debug;

#[derive(Debug, Default)]
pub struct TaxonomyStore {
    taxonomy: Taxonomy,
    feed: ChangeFeed,
}

impl TaxonomyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn is_empty(&self) -> bool {
        self.taxonomy.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.feed.version()
    }

    /// Read-only tag list of `category`.
    pub fn tags_of(&self, category: &str) -> Option<&[String]> {
        self.taxonomy.tags_of(category)
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

    /// Appends a new tag to an existing category.
    ///
    /// The stored name is the trimmed input.
    ///
    /// # Errors
    /// - `UnknownCategory` when `category` does not exist (case-sensitive).
    /// - `Blank`/`Duplicate` from `validate_new_name` within that category.
    pub fn add_tag(&mut self, category: &str, name: &str) -> Result<(), ValidationError> {
        let tags = self
            .taxonomy
            .tags_of(category)
            .ok_or_else(|| ValidationError::UnknownCategory(category.to_string()))?;
        validate_new_name(NameKind::Tag, name, tags.iter().map(String::as_str))?;

        if !self.taxonomy.push_tag(category, name.trim().to_string()) {
            return Err(ValidationError::UnknownCategory(category.to_string()));
        }
        debug!("event=tag_add module=store status=ok");
        self.feed.publish(StoreEvent::TagAdded {
            category: category.to_string(),
        });
        Ok(())
    }

    /// Replaces the whole taxonomy, e.g. after a successful re-parse.
    pub fn replace(&mut self, taxonomy: Taxonomy) {
        if self.taxonomy == taxonomy {
            return;
        }
        self.taxonomy = taxonomy;
        debug!(
            "event=taxonomy_replace module=store status=ok categories={}",
            self.taxonomy.len()
        );
        self.feed.publish(StoreEvent::TaxonomyReplaced);
    }
}
