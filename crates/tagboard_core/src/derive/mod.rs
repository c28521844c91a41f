//! Pure derivations over taxonomy and item state.
//!
//! # Responsibility
//! - Partition a category's tags into checked/unchecked for one item.
//! - Rank categories by their widest tag to choose emphasized ones.
//! - Provide taxonomy-order tag ranks for export sorting.
//!
//! # Invariants
//! - No function here mutates its inputs.
//! - Every ordering is stable with respect to taxonomy order.

mod memo;

pub use memo::{CategoryView, DerivedViews};

use crate::model::Taxonomy;
use std::collections::HashMap;

/// Stable split of one category's tags against an item's tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagPartition {
    /// Category tags assigned to the item, in category order.
    pub checked: Vec<String>,
    /// Remaining category tags, in category order.
    pub unchecked: Vec<String>,
}

/// Splits `category_tags` by membership in `item_tags` (case-sensitive).
pub fn partition_tags(category_tags: &[String], item_tags: &[String]) -> TagPartition {
    let (checked, unchecked): (Vec<String>, Vec<String>) = category_tags
        .iter()
        .cloned()
        .partition(|tag| item_tags.contains(tag));
    TagPartition { checked, unchecked }
}

/// Character length of the longest tag in a category; 0 for an empty one.
pub fn widest_tag_length(tags: &[String]) -> usize {
    tags.iter()
        .map(|tag| tag.chars().count())
        .max()
        .unwrap_or(0)
}

/// Categories ordered by widest tag, descending, truncated to `top_n`.
///
/// Ties keep taxonomy order. `top_n == 0` yields no emphasis.
pub fn emphasized_categories(taxonomy: &Taxonomy, top_n: usize) -> Vec<String> {
    if top_n == 0 {
        return Vec::new();
    }
    let mut ranked = taxonomy
        .iter()
        .map(|(category, tags)| (category, widest_tag_length(tags)))
        .collect::<Vec<_>>();
    ranked.sort_by(|left, right| right.1.cmp(&left.1));
    ranked
        .into_iter()
        .take(top_n)
        .map(|(category, _)| category.to_string())
        .collect()
}

/// Rank of every tag by taxonomy position (category order, then tag order).
///
/// A tag declared in several categories keeps its first rank.
pub fn tag_ranks(taxonomy: &Taxonomy) -> HashMap<&str, usize> {
    let mut ranks = HashMap::new();
    for tag in taxonomy.iter().flat_map(|(_, tags)| tags.iter()) {
        let next = ranks.len();
        ranks.entry(tag.as_str()).or_insert(next);
    }
    ranks
}

/// Stable sort by tag rank; tags missing from `ranks` go last in their
/// current relative order.
pub fn sort_by_rank(tags: &mut [String], ranks: &HashMap<&str, usize>) {
    tags.sort_by_key(|tag| ranks.get(tag.as_str()).copied().unwrap_or(usize::MAX));
}

/// Maps each tag to the first category declaring it.
pub fn category_of_tag(taxonomy: &Taxonomy) -> HashMap<&str, &str> {
    let mut lookup = HashMap::new();
    for (category, tags) in taxonomy.iter() {
        for tag in tags {
            lookup.entry(tag.as_str()).or_insert(category);
        }
    }
    lookup
}

/// Item tags that no category declares, in item order.
pub fn dangling_tags<'a>(item_tags: &'a [String], taxonomy: &Taxonomy) -> Vec<&'a str> {
    let known = category_of_tag(taxonomy);
    item_tags
        .iter()
        .map(String::as_str)
        .filter(|tag| !known.contains_key(tag))
        .collect()
}
