//! Text codec for taxonomy, item and configuration documents.
//!
//! # Responsibility
//! - Parse YAML documents into canonical model values.
//! - Format model values back to text without losing order.
//! - Map parser failures to position-aware `ParseError` values.
//!
//! # Invariants
//! - Empty or whitespace-only input parses to `Ok(None)`, never an error.
//! - `parse(format(x, FormatOrder::Preserve))` reproduces `x`.

mod error;

pub use error::{DocumentKind, FormatError, ParseError};

use crate::model::{Configuration, ItemDocument, Taxonomy};
use serde::de::DeserializeOwned;

/// Ordering directive for taxonomy formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatOrder {
    /// Keep category and tag order exactly as stored.
    #[default]
    Preserve,
    /// Sort categories and tags by name.
    Alphabetical,
}

/// Parses a taxonomy document (`category: [tag, ...]`).
pub fn parse_taxonomy(text: &str) -> Result<Option<Taxonomy>, ParseError> {
    parse_yaml(text, DocumentKind::Taxonomy)
}

/// Parses an item document (`item: { Tags: [tag, ...] }`).
pub fn parse_items(text: &str) -> Result<Option<ItemDocument>, ParseError> {
    parse_yaml(text, DocumentKind::Items)
}

/// Parses the JSON configuration record.
pub fn parse_configuration(text: &str) -> Result<Option<Configuration>, ParseError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str::<Option<Configuration>>(text)
        .map_err(|err| ParseError::from_json(DocumentKind::Configuration, text, &err))
}

pub fn format_taxonomy(taxonomy: &Taxonomy, order: FormatOrder) -> Result<String, FormatError> {
    let text = match order {
        FormatOrder::Preserve => serde_yaml::to_string(taxonomy)?,
        FormatOrder::Alphabetical => serde_yaml::to_string(&taxonomy.sorted())?,
    };
    Ok(text)
}

pub fn format_items(items: &ItemDocument) -> Result<String, FormatError> {
    Ok(serde_yaml::to_string(items)?)
}

pub fn format_configuration(config: &Configuration) -> Result<String, FormatError> {
    Ok(serde_json::to_string(config)?)
}

fn parse_yaml<T: DeserializeOwned>(text: &str, document: DocumentKind) -> Result<Option<T>, ParseError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    serde_yaml::from_str::<Option<T>>(text)
        .map_err(|err| ParseError::from_yaml(document, text, &err))
}
