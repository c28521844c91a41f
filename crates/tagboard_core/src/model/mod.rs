//! Canonical in-memory shapes for taxonomy, items and configuration.
//!
//! # Responsibility
//! - Define the value types every other core module reads and writes.
//! - Keep insertion order first-class for categories, tags and items.
//!
//! # Invariants
//! - Category names are unique; tag names are unique within a category.
//! - Within one item, a tag name appears at most once.
//! - Items may carry tags that no category declares.

pub mod config;
pub mod item;
pub mod taxonomy;

pub use config::Configuration;
pub use item::{ItemDocument, ItemRecord};
pub use taxonomy::Taxonomy;

use indexmap::IndexMap;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// Collapses exact duplicates, keeping the first occurrence in place.
pub(crate) fn dedup_in_order(values: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::with_capacity(values.len());
    values.retain(|value| seen.insert(value.clone()));
}

/// Scalar text value accepted wherever a tag name is expected.
///
/// YAML authors write `- 2024` or `- true` as tags; those scalars are kept
/// as their textual form instead of failing the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct ScalarText(pub(crate) String);

impl Serialize for ScalarText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ScalarText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScalarVisitor;

        impl Visitor<'_> for ScalarVisitor {
            type Value = ScalarText;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a tag name (string, number or boolean)")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                Ok(ScalarText(value.to_string()))
            }

            fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
                Ok(ScalarText(value))
            }

            fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
                Ok(ScalarText(value.to_string()))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
                Ok(ScalarText(value.to_string()))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
                Ok(ScalarText(value.to_string()))
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
                Ok(ScalarText(value.to_string()))
            }
        }

        deserializer.deserialize_any(ScalarVisitor)
    }
}

/// Deserializes an optional tag sequence; `null` or a missing value is empty.
pub(crate) fn deserialize_tag_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<ScalarText>>::deserialize(deserializer)?;
    let mut tags = raw
        .unwrap_or_default()
        .into_iter()
        .map(|value| value.0)
        .collect::<Vec<_>>();
    dedup_in_order(&mut tags);
    Ok(tags)
}

/// Deserializes a name-keyed map, rejecting names that repeat.
///
/// Keys are compared after scalar coercion, so `1` and `'1'` collide.
pub(crate) fn deserialize_unique_map<'de, D, V>(
    deserializer: D,
    entry: &'static str,
) -> Result<IndexMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct UniqueMapVisitor<V> {
        entry: &'static str,
        marker: PhantomData<V>,
    }

    impl<'de, V: Deserialize<'de>> Visitor<'de> for UniqueMapVisitor<V> {
        type Value = IndexMap<String, V>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "a map of {} names", self.entry)
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut entries = IndexMap::with_capacity(access.size_hint().unwrap_or(0));
            while let Some(ScalarText(name)) = access.next_key()? {
                if entries.contains_key(&name) {
                    return Err(de::Error::custom(format!(
                        "duplicate {} `{name}`",
                        self.entry
                    )));
                }
                let value = access.next_value()?;
                entries.insert(name, value);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(UniqueMapVisitor {
        entry,
        marker: PhantomData,
    })
}

#[cfg(test)]
mod tests {
    use super::dedup_in_order;

    #[test]
    fn dedup_in_order_keeps_first_occurrence() {
        let mut values = vec![
            "red".to_string(),
            "blue".to_string(),
            "red".to_string(),
            "Red".to_string(),
        ];
        dedup_in_order(&mut values);
        assert_eq!(values, vec!["red", "blue", "Red"]);
    }
}
