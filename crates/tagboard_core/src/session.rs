//! Session context owning all mutable model state.
//!
//! # Responsibility
//! - Hold the taxonomy store, item store, configuration and the last
//!   dismissible parse error for one editing session.
//! - Route every user action through validated store operations.
//!
//! # Invariants
//! - A failed parse never changes stores; the last good state stays active.
//! - Validation failures block only the failed operation.
//! - Derived views are recomputed lazily on read.

use crate::codec::{
    format_configuration, format_items, format_taxonomy, parse_configuration, parse_items,
    parse_taxonomy, DocumentKind, FormatError, FormatOrder, ParseError,
};
use crate::derive::{CategoryView, DerivedViews};
use crate::model::{Configuration, ItemDocument, Taxonomy};
use crate::store::{
    ItemStore, PendingToggles, StoreEvent, SubscriptionId, TaxonomyStore, ToggleOutcome,
};
use crate::validation::{validate_new_name, NameKind, ValidationError};
use log::{debug, warn};

#[derive(Debug, Default)]
pub struct Session {
    taxonomy: TaxonomyStore,
    items: ItemStore,
    config: Configuration,
    views: DerivedViews,
    last_error: Option<ParseError>,
    /// Successful text applications per document, indexed by `revision_slot`.
    text_revisions: [u64; 3],
}

impl Session {
    /// Creates an empty session; populate it through `PersistenceBridge::load_once`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn taxonomy(&self) -> &TaxonomyStore {
        &self.taxonomy
    }

    pub fn items(&self) -> &ItemStore {
        &self.items
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn subscribe_taxonomy(
        &mut self,
        listener: impl FnMut(&StoreEvent) + 'static,
    ) -> SubscriptionId {
        self.taxonomy.subscribe(listener)
    }

    pub fn subscribe_items(
        &mut self,
        listener: impl FnMut(&StoreEvent) + 'static,
    ) -> SubscriptionId {
        self.items.subscribe(listener)
    }

    pub fn replace_taxonomy(&mut self, taxonomy: Taxonomy) {
        self.taxonomy.replace(taxonomy);
    }

    pub fn replace_items(&mut self, items: ItemDocument) {
        self.items.replace(items);
    }

    pub fn replace_config(&mut self, config: Configuration) {
        self.config = config;
    }

    /// Sets one configuration option, returning the previous value.
    pub fn set_config(&mut self, key: &str, value: &str) -> Option<String> {
        self.config.set(key.trim(), value.trim())
    }

    /// Re-parses raw taxonomy text.
    ///
    /// Returns `Ok(true)` when the taxonomy was replaced and `Ok(false)` for
    /// empty input. On error the error is also kept as `last_error`.
    pub fn apply_taxonomy_text(&mut self, text: &str) -> Result<bool, ParseError> {
        let parsed = self.track(parse_taxonomy(text))?;
        Ok(match parsed {
            Some(taxonomy) => {
                self.taxonomy.replace(taxonomy);
                self.text_applied(DocumentKind::Taxonomy);
                true
            }
            None => false,
        })
    }

    /// Re-parses raw item-document text. Same contract as `apply_taxonomy_text`.
    pub fn apply_items_text(&mut self, text: &str) -> Result<bool, ParseError> {
        let parsed = self.track(parse_items(text))?;
        Ok(match parsed {
            Some(items) => {
                self.items.replace(items);
                self.text_applied(DocumentKind::Items);
                true
            }
            None => false,
        })
    }

    /// Re-parses raw configuration JSON. Same contract as `apply_taxonomy_text`.
    pub fn apply_configuration_text(&mut self, text: &str) -> Result<bool, ParseError> {
        let parsed = self.track(parse_configuration(text))?;
        Ok(match parsed {
            Some(config) => {
                self.config = config;
                self.text_applied(DocumentKind::Configuration);
                true
            }
            None => false,
        })
    }

    /// Number of times text for `document` was parsed and applied.
    ///
    /// Edits through store operations do not count.
    pub fn text_revision(&self, document: DocumentKind) -> u64 {
        self.text_revisions[revision_slot(document)]
    }

    pub fn last_error(&self) -> Option<&ParseError> {
        self.last_error.as_ref()
    }

    /// Dismisses the current parse error.
    pub fn dismiss_error(&mut self) -> Option<ParseError> {
        self.last_error.take()
    }

    pub fn add_tag(&mut self, category: &str, name: &str) -> Result<(), ValidationError> {
        self.taxonomy.add_tag(category, name)
    }

    /// Appends an empty category by rewriting taxonomy content.
    pub fn add_category(&mut self, name: &str) -> Result<(), ValidationError> {
        validate_new_name(
            NameKind::Category,
            name,
            self.taxonomy.snapshot().category_names(),
        )?;
        let mut next = self.taxonomy.snapshot().clone();
        next.insert_category(name.trim(), Vec::new());
        self.taxonomy.replace(next);
        Ok(())
    }

    pub fn add_item(&mut self, name: &str) -> Result<(), ValidationError> {
        self.items.add_item(name)
    }

    pub fn toggle_tag(&mut self, item: &str, tag: &str) -> Result<ToggleOutcome, ValidationError> {
        self.items.toggle_tag(item, tag)
    }

    pub fn set_tags(&mut self, item: &str, tags: Vec<String>) -> Result<bool, ValidationError> {
        self.items.set_tags(item, tags)
    }

    /// Starts a batch of toggles on `item`.
    pub fn begin_edit(&self, item: &str) -> Result<PendingToggles, ValidationError> {
        PendingToggles::begin(&self.items, item)
    }

    /// Commits a batch started with `begin_edit`.
    pub fn commit_edit(&mut self, pending: PendingToggles) -> Result<bool, ValidationError> {
        pending.commit(&mut self.items)
    }

    /// Emphasized categories for the configured emphasis count.
    pub fn emphasized_categories(&mut self) -> Vec<String> {
        let top_n = self.config.emphasis_count();
        self.views.emphasized(&self.taxonomy, top_n).to_vec()
    }

    /// Category-by-category partition of `item`'s tags.
    pub fn item_view(&mut self, item: &str) -> Option<Vec<CategoryView>> {
        let top_n = self.config.emphasis_count();
        self.views
            .item_view(&self.taxonomy, &self.items, top_n, item)
            .map(<[CategoryView]>::to_vec)
    }

    pub fn taxonomy_text(&self, order: FormatOrder) -> Result<String, FormatError> {
        format_taxonomy(self.taxonomy.snapshot(), order)
    }

    pub fn items_text(&self) -> Result<String, FormatError> {
        format_items(self.items.snapshot())
    }

    pub fn config_text(&self) -> Result<String, FormatError> {
        format_configuration(&self.config)
    }

    fn track<T>(&mut self, result: Result<T, ParseError>) -> Result<T, ParseError> {
        result.map_err(|err| {
            warn!(
                "event=document_parse module=session status=error document={} line={} column={}",
                err.document, err.line, err.column
            );
            self.last_error = Some(err.clone());
            err
        })
    }

    fn text_applied(&mut self, document: DocumentKind) {
        self.text_revisions[revision_slot(document)] += 1;
        self.clear_error_for(document);
    }

    fn clear_error_for(&mut self, document: DocumentKind) {
        if self
            .last_error
            .as_ref()
            .is_some_and(|err| err.document == document)
        {
            debug!("event=document_parse module=session status=recovered document={document}");
            self.last_error = None;
        }
    }
}

fn revision_slot(document: DocumentKind) -> usize {
    match document {
        DocumentKind::Taxonomy => 0,
        DocumentKind::Items => 1,
        DocumentKind::Configuration => 2,
    }
}
