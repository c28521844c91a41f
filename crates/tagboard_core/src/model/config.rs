//! User configuration record persisted next to the documents.
//!
//! # Invariants
//! - Keys not recognized here are preserved verbatim on write.
//! - Accessors never fail; malformed values fall back to defaults.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Key of the boolean-as-string layout toggle.
pub const VERTICAL_LAYOUT_KEY: &str = "vertical_layout";
/// Key of the numeric-as-string emphasis count.
pub const EMPHASIS_COUNT_KEY: &str = "emphasis_count";
/// Emphasis count used when the option is missing or malformed.
pub const DEFAULT_EMPHASIS_COUNT: usize = 3;

/// Flat string-to-string option mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration {
    options: IndexMap<String, String>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration holding every recognized option at its default value.
    pub fn with_defaults() -> Self {
        let mut config = Self::new();
        config.set(VERTICAL_LAYOUT_KEY, "false");
        config.set(EMPHASIS_COUNT_KEY, DEFAULT_EMPHASIS_COUNT.to_string());
        config
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    /// Sets one option, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.options.insert(key.into(), value.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.options
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Layout toggle; anything other than a case-insensitive `true` is `false`.
    pub fn vertical_layout(&self) -> bool {
        self.get(VERTICAL_LAYOUT_KEY)
            .is_some_and(|value| value.trim().eq_ignore_ascii_case("true"))
    }

    /// How many categories receive emphasis.
    pub fn emphasis_count(&self) -> usize {
        self.get(EMPHASIS_COUNT_KEY)
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_EMPHASIS_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::{Configuration, DEFAULT_EMPHASIS_COUNT, EMPHASIS_COUNT_KEY, VERTICAL_LAYOUT_KEY};

    #[test]
    fn accessors_fall_back_on_malformed_values() {
        let mut config = Configuration::new();
        config.set(EMPHASIS_COUNT_KEY, "many");
        config.set(VERTICAL_LAYOUT_KEY, "yes");
        assert_eq!(config.emphasis_count(), DEFAULT_EMPHASIS_COUNT);
        assert!(!config.vertical_layout());
    }

    #[test]
    fn accessors_read_string_encoded_values() {
        let mut config = Configuration::with_defaults();
        config.set(EMPHASIS_COUNT_KEY, " 0 ");
        config.set(VERTICAL_LAYOUT_KEY, "TRUE");
        assert_eq!(config.emphasis_count(), 0);
        assert!(config.vertical_layout());
    }

    #[test]
    fn unknown_keys_are_kept() {
        let mut config = Configuration::with_defaults();
        config.set("theme", "dark");
        let keys = config.iter().map(|(key, _)| key).collect::<Vec<_>>();
        assert_eq!(keys, vec![VERTICAL_LAYOUT_KEY, EMPHASIS_COUNT_KEY, "theme"]);
    }
}
