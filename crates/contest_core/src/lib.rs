//! # Contest Core
//!
//! Core data structures and types for importing contest data.
//!
//! This crate provides the records the import engine reconciles (categories,
//! affiliations, teams, users, contests and problems), the error taxonomy
//! shared by every stage of an import, and the seams through which the
//! engine reaches persistence, the audit trail and change notifications.
//!
//! ## Key Concepts
//!
//! - **Record store**: persistence owned by the embedding application, reached through [`RecordStore`]
//! - **Reconciliation**: create-or-update of imported records, keyed by caller-supplied identifiers
//! - **Audit log / event log**: collaborators told about every change an import makes
//!
//! ## Example
//!
//! ```rust
//! use contest_core::{MemoryStore, RecordStore, TeamBuilder};
//!
//! let mut store = MemoryStore::new();
//! let team = TeamBuilder::new(42, "Null Pointers").category(3).build();
//! store.insert_team_with_id(team).unwrap();
//!
//! assert_eq!(store.find_team(42).unwrap().unwrap().name, "Null Pointers");
//! ```

pub mod builder;
pub mod error;
pub mod journal;
pub mod memory;
pub mod model;
pub mod store;

pub use builder::*;
pub use error::*;
pub use journal::*;
pub use memory::*;
pub use model::*;
pub use store::*;
