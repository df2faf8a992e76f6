//! Import entry point.
//!
//! The [`Importer`] owns the record store together with the audit and event
//! collaborators for the duration of an import session. Reconciliation of
//! tabular documents lives in the `reconcile` module, contest descriptors in
//! the `contest` module.

use crate::ImportConfig;
use contest_core::{
    AuditEntry, AuditLog, ChangeEvent, EventLog, ImportContext, ImportSummary, RecordStore, Result,
};
use contest_parser::TsvKind;
use tracing::info;

/// Imports contest data into a record store.
///
/// # Example
///
/// ```rust
/// use contest_core::{AuditEntry, ChangeEvent, MemoryStore, RecordStore};
/// use contest_importer::Importer;
///
/// let audit: Vec<AuditEntry> = Vec::new();
/// let events: Vec<ChangeEvent> = Vec::new();
/// let mut importer = Importer::new(MemoryStore::new(), audit, events);
///
/// let summary = importer
///     .import_tsv("groups", "File_Version\t1\n14\tParticipants\n")
///     .unwrap();
///
/// assert_eq!(summary.processed, 1);
/// assert_eq!(importer.store().find_category(14).unwrap().unwrap().name, "Participants");
/// ```
#[derive(Debug)]
pub struct Importer<S, A = Vec<AuditEntry>, E = Vec<ChangeEvent>> {
    pub(crate) store: S,
    pub(crate) audit: A,
    pub(crate) events: E,
    pub(crate) context: ImportContext,
    pub(crate) config: ImportConfig,
}

impl<S, A, E> Importer<S, A, E>
where
    S: RecordStore,
    A: AuditLog,
    E: EventLog,
{
    /// Creates an importer with a default context and configuration.
    pub fn new(store: S, audit: A, events: E) -> Self {
        Self {
            store,
            audit,
            events,
            context: ImportContext::default(),
            config: ImportConfig::default(),
        }
    }

    /// Sets the import context.
    pub fn with_context(mut self, context: ImportContext) -> Self {
        self.context = context;
        self
    }

    /// Sets the import configuration.
    pub fn with_config(mut self, config: ImportConfig) -> Self {
        self.config = config;
        self
    }

    /// The record store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The record store, mutably.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// The audit log.
    pub fn audit(&self) -> &A {
        &self.audit
    }

    /// The event log.
    pub fn events(&self) -> &E {
        &self.events
    }

    /// The import context.
    pub fn context(&self) -> &ImportContext {
        &self.context
    }

    /// Takes the importer apart.
    pub fn into_parts(self) -> (S, A, E) {
        (self.store, self.audit, self.events)
    }

    /// Imports a tab-separated document of the named kind.
    ///
    /// `kind` is one of `groups`, `teams` or `accounts`. The header line is
    /// checked before anything else is read.
    pub fn import_tsv(&mut self, kind: &str, content: &str) -> Result<ImportSummary> {
        let kind: TsvKind = kind.parse()?;
        info!(kind = %kind, "Importing TSV document");

        let summary = match kind {
            TsvKind::Groups => self.import_groups(content)?,
            TsvKind::Teams => self.import_teams(content)?,
            TsvKind::Accounts => self.import_accounts(content)?,
        };

        info!(
            kind = %kind,
            processed = summary.processed,
            created = summary.created.len(),
            updated = summary.updated.len(),
            "TSV import finished"
        );
        Ok(summary)
    }
}
