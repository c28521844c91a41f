//! Consistency rules applied before a new name enters the model.
//!
//! # Responsibility
//! - Gate category/tag/item adds on blank and duplicate checks.
//! - Produce inline, user-facing messages for rejected input.
//!
//! # Invariants
//! - Validation never mutates state.
//! - Duplicate detection for new names is case-insensitive against the
//!   current snapshot; existing entries keep case-sensitive membership.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Kind of name being introduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Category,
    Tag,
    Item,
}

impl NameKind {
    fn label(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Tag => "tag",
            Self::Item => "item",
        }
    }
}

/// Rejected add/toggle input. Never fatal; blocks only the failed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Proposed name is empty or whitespace-only.
    Blank(NameKind),
    /// Proposed name collides with `existing`.
    Duplicate {
        kind: NameKind,
        proposed: String,
        existing: String,
    },
    /// Referenced category does not exist.
    UnknownCategory(String),
    /// Referenced item does not exist.
    UnknownItem(String),
}

impl ValidationError {
    /// Message shown inline at the point of the failed input.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank(kind) => write!(f, "{} name must not be blank", kind.label()),
            Self::Duplicate {
                kind,
                proposed,
                existing,
            } => {
                if proposed == existing {
                    write!(f, "{} `{proposed}` already exists", kind.label())
                } else {
                    write!(
                        f,
                        "{} `{proposed}` collides with existing `{existing}`",
                        kind.label()
                    )
                }
            }
            Self::UnknownCategory(name) => write!(f, "category not found: `{name}`"),
            Self::UnknownItem(name) => write!(f, "item not found: `{name}`"),
        }
    }
}

impl Error for ValidationError {}

/// Returns whether `value` is empty after trimming.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Validates one proposed new name against the current names of its scope.
///
/// The proposed value is compared trimmed and case-insensitively.
///
/// # Errors
/// - `Blank` when `proposed` is empty or whitespace-only.
/// - `Duplicate` when any existing name matches ignoring case.
pub fn validate_new_name<'a>(
    kind: NameKind,
    proposed: &str,
    existing: impl IntoIterator<Item = &'a str>,
) -> Result<(), ValidationError> {
    let trimmed = proposed.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Blank(kind));
    }

    let folded = trimmed.to_lowercase();
    match existing
        .into_iter()
        .find(|name| name.trim().to_lowercase() == folded)
    {
        Some(collision) => Err(ValidationError::Duplicate {
            kind,
            proposed: trimmed.to_string(),
            existing: collision.to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::{is_blank, validate_new_name, NameKind, ValidationError};

    #[test]
    fn rejects_case_insensitive_collision() {
        let err = validate_new_name(NameKind::Tag, "Red", ["red", "green"])
            .expect_err("duplicate name should be rejected");
        assert_eq!(
            err,
            ValidationError::Duplicate {
                kind: NameKind::Tag,
                proposed: "Red".to_string(),
                existing: "red".to_string(),
            }
        );
        assert!(err.message().contains("collides"));
    }

    #[test]
    fn accepts_distinct_name() {
        assert!(validate_new_name(NameKind::Tag, "Blue", ["red", "green"]).is_ok());
    }

    #[test]
    fn rejects_blank_values() {
        for value in ["", "   ", "\t\n"] {
            assert!(is_blank(value));
            assert_eq!(
                validate_new_name(NameKind::Category, value, []),
                Err(ValidationError::Blank(NameKind::Category))
            );
        }
    }

    #[test]
    fn trims_before_comparing() {
        let err = validate_new_name(NameKind::Item, "  apple ", ["Apple"])
            .expect_err("duplicate name should be rejected");
        assert!(matches!(err, ValidationError::Duplicate { .. }));
    }

    #[test]
    fn exact_duplicate_message_names_value_once() {
        let err = validate_new_name(NameKind::Item, "apple", ["apple"])
            .expect_err("duplicate name should be rejected");
        assert_eq!(err.message(), "item `apple` already exists");
    }
}
