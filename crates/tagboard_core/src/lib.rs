//! Core domain logic for tagboard.
//! This crate is the single source of truth for taxonomy/item invariants.

pub mod codec;
pub mod db;
pub mod derive;
pub mod export;
pub mod logging;
pub mod model;
pub mod persist;
pub mod schedule;
pub mod session;
pub mod store;
pub mod validation;

pub use codec::{DocumentKind, FormatError, FormatOrder, ParseError};
pub use derive::{emphasized_categories, partition_tags, CategoryView, TagPartition};
pub use export::{copy_document, export_and_flush, export_bundle, Clipboard, ExportBundle, ExportError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::{Configuration, ItemDocument, ItemRecord, Taxonomy};
pub use persist::{
    DocumentState, FlushReport, LoadReport, LoadSource, PersistError, PersistResult,
    PersistenceBridge, SlotName, SlotRepository, SqliteSlotRepository,
};
pub use schedule::{FlushSchedule, DEFAULT_FLUSH_INTERVAL};
pub use session::Session;
pub use store::{ItemStore, PendingToggles, StoreEvent, TaxonomyStore, ToggleOutcome};
pub use validation::{NameKind, ValidationError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
