//! Version-keyed memo for derived views.
//!
//! Entries are stamped with the store versions they were computed from and
//! recomputed on the first read after either store publishes a change.

use super::{emphasized_categories, partition_tags, TagPartition};
use crate::store::{ItemStore, TaxonomyStore};
use std::collections::HashMap;

/// One category as shown for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryView {
    pub category: String,
    pub emphasized: bool,
    pub partition: TagPartition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct EmphasisEntry {
    taxonomy_version: u64,
    top_n: usize,
    categories: Vec<String>,
}

#[derive(Debug, Default)]
pub struct DerivedViews {
    emphasis: Option<EmphasisEntry>,
    item_stamp: Option<(u64, u64, usize)>,
    item_views: HashMap<String, Vec<CategoryView>>,
}

impl DerivedViews {
    pub fn new() -> Self {
        Self::default()
    }

    /// Memoized `emphasized_categories` for the current taxonomy version.
    pub fn emphasized(&mut self, taxonomy: &TaxonomyStore, top_n: usize) -> &[String] {
        let fresh = self.emphasis.as_ref().is_some_and(|entry| {
            entry.taxonomy_version == taxonomy.version() && entry.top_n == top_n
        });
        if !fresh {
            self.emphasis = Some(EmphasisEntry {
                taxonomy_version: taxonomy.version(),
                top_n,
                categories: emphasized_categories(taxonomy.snapshot(), top_n),
            });
        }
        self.emphasis
            .as_ref()
            .map(|entry| entry.categories.as_slice())
            .unwrap_or_default()
    }

    /// Per-category partitions for `item`, or `None` when the item is unknown.
    pub fn item_view(
        &mut self,
        taxonomy: &TaxonomyStore,
        items: &ItemStore,
        top_n: usize,
        item: &str,
    ) -> Option<&[CategoryView]> {
        let item_tags = items.tags_of(item)?;
        let stamp = (taxonomy.version(), items.version(), top_n);
        if self.item_stamp != Some(stamp) {
            self.item_views.clear();
            self.item_stamp = Some(stamp);
        }
        if !self.item_views.contains_key(item) {
            let emphasized = self.emphasized(taxonomy, top_n).to_vec();
            let views = taxonomy
                .snapshot()
                .iter()
                .map(|(category, tags)| CategoryView {
                    category: category.to_string(),
                    emphasized: emphasized.iter().any(|name| name == category),
                    partition: partition_tags(tags, item_tags),
                })
                .collect();
            self.item_views.insert(item.to_string(), views);
        }
        self.item_views.get(item).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::DerivedViews;
    use crate::store::{ItemStore, TaxonomyStore};

    fn stores() -> (TaxonomyStore, ItemStore) {
        let mut taxonomy = TaxonomyStore::new();
        taxonomy.replace(
            [("colors", vec!["red", "blue"]), ("size", vec!["enormous"])]
                .into_iter()
                .collect(),
        );
        let mut items = ItemStore::new();
        items.replace([("apple", vec!["red"])].into_iter().collect());
        (taxonomy, items)
    }

    #[test]
    fn item_view_partitions_each_category() {
        let (taxonomy, items) = stores();
        let mut views = DerivedViews::new();
        let view = views.item_view(&taxonomy, &items, 1, "apple").expect("item view should exist");
        assert_eq!(view.len(), 2);
        assert_eq!(view[0].category, "colors");
        assert!(!view[0].emphasized);
        assert_eq!(view[0].partition.checked, vec!["red"]);
        assert_eq!(view[0].partition.unchecked, vec!["blue"]);
        assert!(view[1].emphasized);
        assert!(views.item_view(&taxonomy, &items, 1, "kiwi").is_none());
    }

    #[test]
    fn views_recompute_after_store_changes() {
        let (mut taxonomy, mut items) = stores();
        let mut views = DerivedViews::new();
        assert_eq!(views.emphasized(&taxonomy, 1), ["size"]);

        taxonomy.add_tag("colors", "ultramarine").expect("new tag should be accepted");
        assert_eq!(views.emphasized(&taxonomy, 1), ["colors"]);

        items.toggle_tag("apple", "blue").expect("toggle should succeed");
        let view = views.item_view(&taxonomy, &items, 1, "apple").expect("item view should exist");
        assert_eq!(view[0].partition.checked, vec!["red", "blue"]);
        assert!(view[0].emphasized);
    }
}
