//! Error types for contest data imports.
//!
//! This module defines the error taxonomy shared by the parser, the
//! reconciler and the descriptor mapper: format errors, unresolved
//! references, validation failures, unsupported account roles and record
//! store failures.

use thiserror::Error;

/// Result type for import operations.
pub type Result<T> = std::result::Result<T, ImportError>;

/// Main error type for import operations.
#[derive(Error, Debug)]
pub enum ImportError {
    /// Header, version or line structure is malformed
    #[error(transparent)]
    Format(#[from] FormatError),

    /// A related record the import depends on does not exist
    #[error(transparent)]
    Reference(#[from] ReferenceError),

    /// The contest descriptor violates model constraints
    #[error("Contest has errors:\n\n{0}")]
    Validation(String),

    /// An account row names a role that has no mapping
    #[error("unknown role on line {line}: {role}")]
    UnsupportedRole {
        /// 1-indexed line number, counting the header
        line: usize,
        /// Role keyword as found in the document
        role: String,
    },

    /// A structured document could not be read or deserialized
    #[error("{0}")]
    Document(String),

    /// The record store rejected an operation
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ImportError {
    /// Creates a new validation error from `field: message` pairs.
    pub fn validation<I, F, M>(violations: I) -> Self
    where
        I: IntoIterator<Item = (F, M)>,
        F: std::fmt::Display,
        M: std::fmt::Display,
    {
        Self::Validation(
            violations
                .into_iter()
                .map(|(field, message)| format!("{}: {}", field, message))
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }

    /// Creates a new unsupported role error.
    pub fn unsupported_role(line: usize, role: impl Into<String>) -> Self {
        Self::UnsupportedRole {
            line,
            role: role.into(),
        }
    }
}

/// Structural errors in tabular documents.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Header line does not match the expected type and version
    #[error("Unknown format or version: {actual} != {expected}")]
    VersionMismatch {
        /// Accepted version pattern, e.g. "1" or "[12]"
        expected: String,
        /// Header line as found in the document
        actual: String,
    },

    /// A numeric identifier column holds something else
    #[error("Invalid {column} format on line {line}")]
    InvalidId {
        /// 1-indexed line number
        line: usize,
        /// Column name
        column: &'static str,
    },

    /// No numeric team identifier can be extracted from a username
    #[error("cannot parse team id on line {line} from \"{username}\"")]
    UnparseableTeamId { line: usize, username: String },

    /// Import kind is not one of groups, teams or accounts
    #[error("Invalid TSV type {0}")]
    UnknownKind(String),
}

impl FormatError {
    /// Creates a new invalid identifier error.
    pub fn invalid_id(line: usize, column: &'static str) -> Self {
        Self::InvalidId { line, column }
    }

    /// Line the error was found on, if it is line-scoped.
    pub fn line(&self) -> Option<usize> {
        match self {
            FormatError::InvalidId { line, .. } | FormatError::UnparseableTeamId { line, .. } => {
                Some(*line)
            }
            FormatError::VersionMismatch { .. } | FormatError::UnknownKind(_) => None,
        }
    }
}

/// A required related record was not found.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    /// Account row refers to a team that does not exist
    #[error("unknown team id {team_id} on line {line}")]
    UnknownTeam { team_id: i64, line: usize },

    /// Export requested for a contest that does not exist
    #[error("unknown contest id {0}")]
    UnknownContest(i64),

    /// Contest problem refers to a problem that does not exist
    #[error("unknown problem id {0}")]
    UnknownProblem(i64),
}

/// Errors raised by record store implementations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Insert with an assigned key hit an existing record
    #[error("{entity} with id {id} already exists")]
    DuplicateKey { entity: &'static str, id: String },

    /// Update of a record that is not stored
    #[error("{entity} with id {id} does not exist")]
    NotFound { entity: &'static str, id: String },

    /// Backend failure
    #[error("Record store error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Creates a new duplicate key error.
    pub fn duplicate(entity: &'static str, id: impl ToString) -> Self {
        Self::DuplicateKey {
            entity,
            id: id.to_string(),
        }
    }

    /// Creates a new not found error.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
