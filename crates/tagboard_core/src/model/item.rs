//! Item document value: ordered items, each owning an ordered tag list.
//!
//! # Invariants
//! - Item iteration order is insertion order.
//! - Assigned tags are not checked against the taxonomy; dangling tags stay.
//! - Equality is order-sensitive for items and for each tag list.

use super::{deserialize_tag_list, deserialize_unique_map};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One item record as written in the item document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    /// Assigned tags, serialized as `Tags`.
    #[serde(rename = "Tags", default, deserialize_with = "deserialize_tag_list")]
    pub tags: Vec<String>,
    /// Fields other than `Tags`, kept so hand-written documents survive a rewrite.
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl ItemRecord {
    pub fn with_tags<T: Into<String>>(tags: impl IntoIterator<Item = T>) -> Self {
        let mut tags = tags.into_iter().map(Into::into).collect::<Vec<_>>();
        super::dedup_in_order(&mut tags);
        Self {
            tags,
            extra: IndexMap::new(),
        }
    }
}

/// Ordered mapping of item name to its record.
#[derive(Debug, Clone, Default)]
pub struct ItemDocument {
    items: IndexMap<String, ItemRecord>,
}

impl ItemDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn contains_item(&self, name: &str) -> bool {
        self.items.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ItemRecord> {
        self.items.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut ItemRecord> {
        self.items.get_mut(name)
    }

    /// Returns the tags of `name` in stored order.
    pub fn tags_of(&self, name: &str) -> Option<&[String]> {
        self.items.get(name).map(|record| record.tags.as_slice())
    }

    /// Item names in insertion order.
    pub fn item_names(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ItemRecord)> {
        self.items.iter().map(|(name, record)| (name.as_str(), record))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut ItemRecord)> {
        self.items
            .iter_mut()
            .map(|(name, record)| (name.as_str(), record))
    }

    /// Inserts or replaces one item, keeping its original position on replace.
    pub fn insert(&mut self, name: impl Into<String>, record: ItemRecord) {
        self.items.insert(name.into(), record);
    }
}

impl PartialEq for ItemDocument {
    fn eq(&self, other: &Self) -> bool {
        self.items.len() == other.items.len() && self.items.iter().eq(other.items.iter())
    }
}

impl<N, T> FromIterator<(N, Vec<T>)> for ItemDocument
where
    N: Into<String>,
    T: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, Vec<T>)>>(iter: I) -> Self {
        let mut document = Self::new();
        for (name, tags) in iter {
            document.insert(name, ItemRecord::with_tags(tags));
        }
        document
    }
}

impl Serialize for ItemDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.items.iter())
    }
}

impl<'de> Deserialize<'de> for ItemDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = deserialize_unique_map::<_, Option<ItemRecord>>(deserializer, "item")?;
        let items = raw
            .into_iter()
            .map(|(name, record)| (name, record.unwrap_or_default()))
            .collect();
        Ok(Self { items })
    }
}
