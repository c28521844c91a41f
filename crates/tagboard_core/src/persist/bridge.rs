//! Load-once / flush reconciliation for one session.

use super::slot_repo::SlotRepository;
use super::{seed, PersistResult, SlotName};
use crate::codec::{
    format_configuration, format_items, format_taxonomy, parse_configuration, parse_items,
    parse_taxonomy, FormatError, FormatOrder, ParseError,
};
use crate::session::Session;
use log::{debug, info, warn};
use std::time::Instant;

/// Lifecycle of one persisted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentState {
    #[default]
    Unloaded,
    Loading,
    Loaded,
    /// Stored text failed to parse and the seed is shown instead. The slot
    /// stays untouched until the session's text revision for this document
    /// moves past `revision`.
    Rejected { revision: u64 },
}

impl DocumentState {
    /// Whether the document is present in the session.
    pub fn is_loaded(self) -> bool {
        matches!(self, Self::Loaded | Self::Rejected { .. })
    }
}

/// Where a loaded document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Storage,
    Seed,
}

/// Outcome of the single startup load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// `None` when the document was already loaded by an earlier attempt.
    pub taxonomy: Option<LoadSource>,
    pub items: Option<LoadSource>,
    pub config: Option<LoadSource>,
    /// Stored documents that failed to parse. The seed is shown in their place
    /// and their slots are protected from flushing.
    pub rejected: Vec<ParseError>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub written: Vec<SlotName>,
    /// Slots left untouched because the in-memory document is empty or the
    /// stored text was rejected at load.
    pub skipped: Vec<SlotName>,
}

pub struct PersistenceBridge<R: SlotRepository> {
    repo: R,
    taxonomy: DocumentState,
    items: DocumentState,
    config: DocumentState,
}

impl<R: SlotRepository> PersistenceBridge<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            taxonomy: DocumentState::Unloaded,
            items: DocumentState::Unloaded,
            config: DocumentState::Unloaded,
        }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn state(&self, slot: SlotName) -> DocumentState {
        match slot {
            SlotName::Taxonomy => self.taxonomy,
            SlotName::Items => self.items,
            SlotName::Config => self.config,
        }
    }

    pub fn is_loaded(&self) -> bool {
        SlotName::ALL
            .iter()
            .all(|slot| self.state(*slot).is_loaded())
    }

    /// Populates `session` from storage, falling back to the seed per document.
    ///
    /// Returns `Ok(None)` on every call after a complete load. A storage read
    /// failure returns the error and leaves the failed document `Unloaded`, so
    /// a later call retries only documents that did not load.
    pub fn load_once(&mut self, session: &mut Session) -> PersistResult<Option<LoadReport>> {
        if self.is_loaded() {
            debug!("event=session_load module=persist status=skipped reason=already_loaded");
            return Ok(None);
        }

        let started_at = Instant::now();
        let mut rejected = Vec::new();

        let taxonomy = match self.state(SlotName::Taxonomy) {
            state if state.is_loaded() => None,
            _ => {
                let (value, source) = self.load_document(
                    SlotName::Taxonomy,
                    parse_taxonomy,
                    seed::taxonomy,
                    session,
                    &mut rejected,
                )?;
                session.replace_taxonomy(value);
                Some(source)
            }
        };

        let items = match self.state(SlotName::Items) {
            state if state.is_loaded() => None,
            _ => {
                let (value, source) = self.load_document(
                    SlotName::Items,
                    parse_items,
                    seed::items,
                    session,
                    &mut rejected,
                )?;
                session.replace_items(value);
                Some(source)
            }
        };

        let config = match self.state(SlotName::Config) {
            state if state.is_loaded() => None,
            _ => {
                let (value, source) = self.load_document(
                    SlotName::Config,
                    parse_configuration,
                    seed::config,
                    session,
                    &mut rejected,
                )?;
                session.replace_config(value);
                Some(source)
            }
        };

        info!(
            "event=session_load module=persist status=ok taxonomy={:?} items={:?} config={:?} rejected={} duration_ms={}",
            taxonomy,
            items,
            config,
            rejected.len(),
            started_at.elapsed().as_millis()
        );

        Ok(Some(LoadReport {
            taxonomy,
            items,
            config,
            rejected,
        }))
    }

    /// Writes every non-empty document of `session` to its slot.
    ///
    /// Empty documents are skipped so an early flush cannot overwrite data
    /// that has not been loaded yet. Rejected slots are skipped until new
    /// text for the document has been applied.
    pub fn flush(&mut self, session: &Session) -> PersistResult<FlushReport> {
        let mut report = FlushReport::default();
        self.flush_slot(
            SlotName::Taxonomy,
            session,
            session.taxonomy().is_empty(),
            || format_taxonomy(session.taxonomy().snapshot(), FormatOrder::Preserve),
            &mut report,
        )?;
        self.flush_slot(
            SlotName::Items,
            session,
            session.items().is_empty(),
            || format_items(session.items().snapshot()),
            &mut report,
        )?;
        self.flush_slot(
            SlotName::Config,
            session,
            session.config().is_empty(),
            || format_configuration(session.config()),
            &mut report,
        )?;

        debug!(
            "event=flush module=persist status=ok written={} skipped={}",
            report.written.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    fn flush_slot(
        &mut self,
        slot: SlotName,
        session: &Session,
        empty: bool,
        format: impl FnOnce() -> Result<String, FormatError>,
        report: &mut FlushReport,
    ) -> PersistResult<()> {
        let rejected = match self.state(slot) {
            DocumentState::Rejected { revision } => Some(revision),
            _ => None,
        };
        let protected =
            rejected.is_some_and(|revision| session.text_revision(slot.document()) <= revision);
        if empty || protected {
            report.skipped.push(slot);
            return Ok(());
        }

        let text = format()?;
        self.repo.write_slot(slot, &text)?;
        if rejected.is_some() {
            info!("event=slot_release module=persist status=ok slot={slot}");
            self.set_state(slot, DocumentState::Loaded);
        }
        report.written.push(slot);
        Ok(())
    }

    fn load_document<T>(
        &mut self,
        slot: SlotName,
        parse: fn(&str) -> Result<Option<T>, ParseError>,
        fallback: fn() -> PersistResult<T>,
        session: &Session,
        rejected: &mut Vec<ParseError>,
    ) -> PersistResult<(T, LoadSource)> {
        self.set_state(slot, DocumentState::Loading);
        let stored = match self.repo.read_slot(slot) {
            Ok(stored) => stored,
            Err(err) => {
                self.set_state(slot, DocumentState::Unloaded);
                return Err(err);
            }
        };

        let mut loaded_state = DocumentState::Loaded;
        let parsed = match stored.as_deref().map(parse) {
            Some(Ok(Some(value))) => Some(value),
            Some(Ok(None)) | None => None,
            Some(Err(err)) => {
                warn!(
                    "event=slot_load module=persist status=rejected slot={} line={} column={}",
                    slot, err.line, err.column
                );
                rejected.push(err);
                loaded_state = DocumentState::Rejected {
                    revision: session.text_revision(slot.document()),
                };
                None
            }
        };

        let loaded = match parsed {
            Some(value) => (value, LoadSource::Storage),
            None => match fallback() {
                Ok(value) => (value, LoadSource::Seed),
                Err(err) => {
                    self.set_state(slot, DocumentState::Unloaded);
                    return Err(err);
                }
            },
        };
        self.set_state(slot, loaded_state);
        Ok(loaded)
    }

    fn set_state(&mut self, slot: SlotName, state: DocumentState) {
        match slot {
            SlotName::Taxonomy => self.taxonomy = state,
            SlotName::Items => self.items = state,
            SlotName::Config => self.config = state,
        }
    }
}
