//! Taxonomy value: ordered categories, each with an ordered tag list.
//!
//! # Invariants
//! - Category iteration order is insertion order.
//! - Tag order inside a category is insertion order; it anchors tag ranks.
//! - Equality is order-sensitive, unlike `IndexMap`'s own `PartialEq`.

use super::{deserialize_tag_list, deserialize_unique_map};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Ordered mapping of category name to ordered tag names.
#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    categories: IndexMap<String, Vec<String>>,
}

impl Taxonomy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Returns whether `category` exists (case-sensitive).
    pub fn contains_category(&self, category: &str) -> bool {
        self.categories.contains_key(category)
    }

    /// Returns the tags of `category` in insertion order.
    pub fn tags_of(&self, category: &str) -> Option<&[String]> {
        self.categories.get(category).map(Vec::as_slice)
    }

    /// Category names in insertion order.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// `(category, tags)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.categories
            .iter()
            .map(|(name, tags)| (name.as_str(), tags.as_slice()))
    }

    /// Inserts or replaces one category, keeping its original position on replace.
    ///
    /// Exact duplicate tags in `tags` are collapsed. This builds values; store
    /// level uniqueness rules are enforced by `TaxonomyStore`.
    pub fn insert_category(&mut self, category: impl Into<String>, tags: Vec<String>) {
        let mut tags = tags;
        super::dedup_in_order(&mut tags);
        self.categories.insert(category.into(), tags);
    }

    /// Appends `tag` to `category`. Returns `false` when the category is missing.
    pub(crate) fn push_tag(&mut self, category: &str, tag: String) -> bool {
        match self.categories.get_mut(category) {
            Some(tags) => {
                tags.push(tag);
                true
            }
            None => false,
        }
    }

    /// Returns a copy with categories and tags sorted by name.
    pub fn sorted(&self) -> Self {
        let mut categories = self.categories.clone();
        categories.sort_keys();
        for tags in categories.values_mut() {
            tags.sort();
        }
        Self { categories }
    }
}

impl PartialEq for Taxonomy {
    fn eq(&self, other: &Self) -> bool {
        self.categories.len() == other.categories.len()
            && self.categories.iter().eq(other.categories.iter())
    }
}

impl Eq for Taxonomy {}

impl<C, T> FromIterator<(C, Vec<T>)> for Taxonomy
where
    C: Into<String>,
    T: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (C, Vec<T>)>>(iter: I) -> Self {
        let mut taxonomy = Self::new();
        for (category, tags) in iter {
            taxonomy.insert_category(category, tags.into_iter().map(Into::into).collect());
        }
        taxonomy
    }
}

impl Serialize for Taxonomy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.categories.iter())
    }
}

#[derive(Deserialize)]
#[serde(transparent)]
struct TagList(#[serde(deserialize_with = "deserialize_tag_list")] Vec<String>);

impl<'de> Deserialize<'de> for Taxonomy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = deserialize_unique_map::<_, TagList>(deserializer, "category")?;
        let categories = raw.into_iter().map(|(name, tags)| (name, tags.0)).collect();
        Ok(Self { categories })
    }
}

#[cfg(test)]
mod tests {
    use super::Taxonomy;

    #[test]
    fn equality_is_order_sensitive() {
        let first: Taxonomy = [("a", vec!["x"]), ("b", vec!["y"])].into_iter().collect();
        let second: Taxonomy = [("b", vec!["y"]), ("a", vec!["x"])].into_iter().collect();
        assert_ne!(first, second);
        assert_eq!(first, first.clone());
    }

    #[test]
    fn sorted_orders_categories_and_tags() {
        let taxonomy: Taxonomy = [("size", vec!["small", "large"]), ("color", vec!["red"])]
            .into_iter()
            .collect();
        let sorted = taxonomy.sorted();
        let names = sorted.category_names().collect::<Vec<_>>();
        assert_eq!(names, vec!["color", "size"]);
        assert_eq!(sorted.tags_of("size").expect("entry should exist"), ["large", "small"]);
    }

    #[test]
    fn push_tag_requires_existing_category() {
        let mut taxonomy: Taxonomy = [("color", vec!["red"])].into_iter().collect();
        assert!(taxonomy.push_tag("color", "blue".to_string()));
        assert!(!taxonomy.push_tag("shape", "round".to_string()));
        assert_eq!(taxonomy.tags_of("color").expect("entry should exist"), ["red", "blue"]);
    }
}
