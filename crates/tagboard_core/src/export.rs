//! Export artifacts and clipboard copy.
//!
//! # Responsibility
//! - Produce the timestamped taxonomy/item artifact pair on demand.
//! - Copy serialized document text verbatim to a clipboard sink.
//!
//! # Invariants
//! - Export sorts item tags by taxonomy rank in the exported copy only;
//!   session state is never reordered by an export.
//! - Every export flushes the session first.

use crate::codec::{format_items, format_taxonomy, DocumentKind, FormatError, FormatOrder};
use crate::derive::{sort_by_rank, tag_ranks};
use crate::persist::{PersistError, PersistenceBridge, SlotRepository};
use crate::session::Session;
use chrono::{DateTime, TimeZone};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const FILE_STAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

#[derive(Debug)]
pub enum ExportError {
    Format(FormatError),
    Persist(PersistError),
    Io(std::io::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Format(err) => write!(f, "{err}"),
            Self::Persist(err) => write!(f, "export flush failed: {err}"),
            Self::Io(err) => write!(f, "export write failed: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Format(err) => Some(err),
            Self::Persist(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<FormatError> for ExportError {
    fn from(value: FormatError) -> Self {
        Self::Format(value)
    }
}

impl From<PersistError> for ExportError {
    fn from(value: PersistError) -> Self {
        Self::Persist(value)
    }
}

impl From<std::io::Error> for ExportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// One downloadable text file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub contents: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBundle {
    pub taxonomy: ExportArtifact,
    pub items: ExportArtifact,
}

impl ExportBundle {
    /// Writes both artifacts into `dir`, returning their paths.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<[PathBuf; 2], ExportError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let taxonomy_path = dir.join(&self.taxonomy.file_name);
        let items_path = dir.join(&self.items.file_name);
        std::fs::write(&taxonomy_path, &self.taxonomy.contents)?;
        std::fs::write(&items_path, &self.items.contents)?;
        Ok([taxonomy_path, items_path])
    }
}

/// Builds the artifact pair stamped with `at`.
pub fn export_bundle<Tz>(session: &Session, at: &DateTime<Tz>) -> Result<ExportBundle, ExportError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let stamp = at.format(FILE_STAMP_FORMAT).to_string();
    let taxonomy = session.taxonomy().snapshot();
    let ranks = tag_ranks(taxonomy);

    let mut items = session.items().snapshot().clone();
    for (_, record) in items.iter_mut() {
        sort_by_rank(&mut record.tags, &ranks);
    }

    Ok(ExportBundle {
        taxonomy: ExportArtifact {
            file_name: format!("tags-{stamp}.yaml"),
            contents: format_taxonomy(taxonomy, FormatOrder::Preserve)?,
        },
        items: ExportArtifact {
            file_name: format!("items-{stamp}.yaml"),
            contents: format_items(&items)?,
        },
    })
}

/// Flushes the session, then builds the export bundle.
pub fn export_and_flush<R, Tz>(
    bridge: &mut PersistenceBridge<R>,
    session: &Session,
    at: &DateTime<Tz>,
) -> Result<ExportBundle, ExportError>
where
    R: SlotRepository,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let flushed = bridge.flush(session)?;
    let bundle = export_bundle(session, at)?;
    info!(
        "event=export module=export status=ok flushed={} taxonomy_bytes={} items_bytes={}",
        flushed.written.len(),
        bundle.taxonomy.contents.len(),
        bundle.items.contents.len()
    );
    Ok(bundle)
}

/// Destination for copied document text.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> std::io::Result<()>;
}

/// Copies the current serialized taxonomy or item document verbatim.
pub fn copy_document(
    session: &Session,
    document: DocumentKind,
    clipboard: &mut impl Clipboard,
) -> Result<(), ExportError> {
    let text = match document {
        DocumentKind::Taxonomy => session.taxonomy_text(FormatOrder::Preserve)?,
        DocumentKind::Items => session.items_text()?,
        DocumentKind::Configuration => session.config_text()?,
    };
    clipboard.write_text(&text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{copy_document, export_bundle, Clipboard};
    use crate::codec::{parse_items, DocumentKind};
    use crate::session::Session;
    use chrono::{TimeZone, Utc};

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl Clipboard for Recorder {
        fn write_text(&mut self, text: &str) -> std::io::Result<()> {
            self.0.push(text.to_string());
            Ok(())
        }
    }

    fn session() -> Session {
        let mut session = Session::new();
        session
            .apply_taxonomy_text("colors:\n  - red\n  - blue\nsize:\n  - big\n")
            .expect("taxonomy should parse");
        session
            .apply_items_text("apple:\n  Tags: [mystery, big, blue, red]\n")
            .expect("items should parse");
        session
    }

    #[test]
    fn bundle_is_stamped_and_sorted_by_rank() {
        let session = session();
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).single()
            .expect("timestamp should be valid");
        let bundle = export_bundle(&session, &at).expect("export should succeed");
        assert_eq!(bundle.taxonomy.file_name, "tags-20240309-140507.yaml");
        assert_eq!(bundle.items.file_name, "items-20240309-140507.yaml");

        let exported = parse_items(&bundle.items.contents)
            .expect("items should parse")
            .expect("items should not be empty");
        assert_eq!(
            exported.tags_of("apple").expect("entry should exist"),
            ["red", "blue", "big", "mystery"]
        );
        assert_eq!(
            session.items().tags_of("apple").expect("entry should exist"),
            ["mystery", "big", "blue", "red"]
        );
    }

    #[test]
    fn write_to_creates_both_files() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single()
            .expect("timestamp should be valid");
        let bundle = export_bundle(&session(), &at).expect("export should succeed");
        let [taxonomy_path, items_path] = bundle.write_to(dir.path().join("out"))
            .expect("bundle should be written");
        assert_eq!(
            std::fs::read_to_string(taxonomy_path).expect("file should be readable"),
            bundle.taxonomy.contents
        );
        assert_eq!(
            std::fs::read_to_string(items_path).expect("file should be readable"),
            bundle.items.contents
        );
    }

    #[test]
    fn copy_document_writes_serialized_text() {
        let session = session();
        let mut clipboard = Recorder::default();
        copy_document(&session, DocumentKind::Items, &mut clipboard).expect("copy should succeed");
        copy_document(&session, DocumentKind::Taxonomy, &mut clipboard)
            .expect("copy should succeed");
        assert_eq!(clipboard.0[0], session.items_text().expect("items should format"));
        assert!(clipboard.0[1].starts_with("colors:"));
    }
}
