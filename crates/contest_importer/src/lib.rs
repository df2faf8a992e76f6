//! # Contest Importer
//!
//! Reconciles imported contest data against a [`RecordStore`] and maps
//! contest descriptors to and from stored contests.
//!
//! - Tabular imports (groups, teams, accounts) are upserts keyed by the
//!   identifiers in the document
//! - Contest descriptors are validated before anything is written
//! - Every change is reported to an [`AuditLog`]; groups and teams also
//!   announce changes on an [`EventLog`] when a current contest is set
//!
//! ## Example
//!
//! ```rust
//! use contest_core::{ImportContext, MemoryStore, RecordStore};
//! use contest_importer::{team_rows, Importer};
//!
//! let mut importer = Importer::new(MemoryStore::new(), Vec::new(), Vec::new())
//!     .with_context(ImportContext::new().with_current_contest(1));
//!
//! importer.import_tsv("groups", "groups\t1\n14\tParticipants\n").unwrap();
//! importer
//!     .import_tsv("teams", "teams\t2\nnull\t42\t14\tNull Pointers\n")
//!     .unwrap();
//!
//! assert_eq!(importer.store().find_team(42).unwrap().unwrap().name, "Null Pointers");
//! assert_eq!(team_rows(importer.store()).unwrap().len(), 1);
//! assert_eq!(importer.events().len(), 2);
//! ```
//!
//! [`RecordStore`]: contest_core::RecordStore
//! [`AuditLog`]: contest_core::AuditLog
//! [`EventLog`]: contest_core::EventLog

mod color;
mod config;
mod contest;
mod export;
mod importer;
mod reconcile;

pub use color::*;
pub use config::ImportConfig;
pub use contest::*;
pub use export::*;
pub use importer::*;
