use std::error::Error;
use std::fmt::{Display, Formatter};

const SNIPPET_RADIUS_BYTES: usize = 24;

/// Which serialized document a codec error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Taxonomy,
    Items,
    Configuration,
}

impl DocumentKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Taxonomy => "taxonomy",
            Self::Items => "items",
            Self::Configuration => "configuration",
        }
    }
}

impl Display for DocumentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Malformed source text.
///
/// Recoverable: callers keep their last successfully parsed state and show
/// this as a dismissible condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Document the text was meant to be.
    pub document: DocumentKind,
    /// Source window around `position`.
    pub snippet: String,
    /// Absolute byte offset into the source text.
    pub position: usize,
    /// 1-based line; 0 when the parser did not report a location.
    pub line: usize,
    /// 1-based column; 0 when the parser did not report a location.
    pub column: usize,
    /// Parser message.
    pub message: String,
}

impl ParseError {
    pub(crate) fn from_yaml(document: DocumentKind, source: &str, err: &serde_yaml::Error) -> Self {
        let (position, line, column) = match err.location() {
            Some(location) => (location.index(), location.line(), location.column()),
            None => (0, 0, 0),
        };
        Self::at(document, source, position, line, column, err.to_string())
    }

    pub(crate) fn from_json(document: DocumentKind, source: &str, err: &serde_json::Error) -> Self {
        let (line, column) = (err.line(), err.column());
        let position = offset_of(source, line, column);
        Self::at(document, source, position, line, column, err.to_string())
    }

    fn at(
        document: DocumentKind,
        source: &str,
        position: usize,
        line: usize,
        column: usize,
        message: String,
    ) -> Self {
        let position = position.min(source.len());
        Self {
            document,
            snippet: snippet_around(source, position),
            position,
            line,
            column,
            message,
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "failed to parse {} document at line {} column {}: {}",
            self.document, self.line, self.column, self.message
        )
    }
}

impl Error for ParseError {}

/// Serialization failure while formatting a model value.
#[derive(Debug)]
pub enum FormatError {
    Yaml(serde_yaml::Error),
    Json(serde_json::Error),
}

impl Display for FormatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Yaml(err) => write!(f, "yaml format failed: {err}"),
            Self::Json(err) => write!(f, "json format failed: {err}"),
        }
    }
}

impl Error for FormatError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Yaml(err) => Some(err),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<serde_yaml::Error> for FormatError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Yaml(value)
    }
}

impl From<serde_json::Error> for FormatError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Byte offset of a 1-based `(line, column)` pair, clamped to the source.
fn offset_of(source: &str, line: usize, column: usize) -> usize {
    if line == 0 {
        return 0;
    }
    let mut offset = 0;
    for (index, text) in source.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            let within = column.saturating_sub(1).min(text.len());
            return floor_boundary(source, offset + within);
        }
        offset += text.len();
    }
    source.len()
}

fn snippet_around(source: &str, position: usize) -> String {
    let start = floor_boundary(source, position.saturating_sub(SNIPPET_RADIUS_BYTES));
    let end = ceil_boundary(source, position.saturating_add(SNIPPET_RADIUS_BYTES));
    source[start..end].to_string()
}

fn floor_boundary(source: &str, index: usize) -> usize {
    let mut index = index.min(source.len());
    while !source.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_boundary(source: &str, index: usize) -> usize {
    let mut index = index.min(source.len());
    while !source.is_char_boundary(index) {
        index += 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::{offset_of, snippet_around};

    #[test]
    fn offset_of_counts_previous_lines() {
        let source = "ab\ncdef\ng";
        assert_eq!(offset_of(source, 1, 1), 0);
        assert_eq!(offset_of(source, 2, 3), 5);
        assert_eq!(offset_of(source, 3, 1), 8);
        assert_eq!(offset_of(source, 9, 1), source.len());
    }

    #[test]
    fn snippet_respects_char_boundaries() {
        let source = "é".repeat(40);
        let snippet = snippet_around(&source, 41);
        assert!(!snippet.is_empty());
        assert!(snippet.chars().all(|c| c == 'é'));
    }
}
