//! Header validation for tabular documents.
//!
//! The first line of every TSV document names its type and format version,
//! either as `<kind>\t<version>` or as `File_Version\t<version>`.

use contest_core::{FormatError, Result};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static GROUPS_HEADER: LazyLock<Regex> = LazyLock::new(|| header_regex("groups", "1"));
static TEAMS_HEADER: LazyLock<Regex> = LazyLock::new(|| header_regex("teams", "[12]"));
static ACCOUNTS_HEADER: LazyLock<Regex> = LazyLock::new(|| header_regex("accounts", "1"));

fn header_regex(kind: &str, version: &str) -> Regex {
    Regex::new(&format!(r"(?i)^(File_Version|{})\t{}$", kind, version))
        .expect("header pattern is valid")
}

/// Kinds of tabular documents that can be imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TsvKind {
    /// Team categories
    Groups,
    /// Teams together with their affiliations
    Teams,
    /// User accounts
    Accounts,
}

impl TsvKind {
    /// Keyword used for this kind in headers and import requests.
    pub fn keyword(self) -> &'static str {
        match self {
            TsvKind::Groups => "groups",
            TsvKind::Teams => "teams",
            TsvKind::Accounts => "accounts",
        }
    }

    /// Accepted format versions, as shown in error messages.
    pub fn expected_version(self) -> &'static str {
        match self {
            TsvKind::Teams => "[12]",
            TsvKind::Groups | TsvKind::Accounts => "1",
        }
    }

    fn header(self) -> &'static Regex {
        match self {
            TsvKind::Groups => &*GROUPS_HEADER,
            TsvKind::Teams => &*TEAMS_HEADER,
            TsvKind::Accounts => &*ACCOUNTS_HEADER,
        }
    }
}

impl fmt::Display for TsvKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for TsvKind {
    type Err = FormatError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "groups" => Ok(TsvKind::Groups),
            "teams" => Ok(TsvKind::Teams),
            "accounts" => Ok(TsvKind::Accounts),
            other => Err(FormatError::UnknownKind(other.to_string())),
        }
    }
}

/// Checks the header line of a document of the given kind.
///
/// Trailing whitespace (including the line terminator) is ignored; the
/// keyword match is case-insensitive.
///
/// # Example
///
/// ```rust
/// use contest_parser::{check_header, TsvKind};
///
/// assert!(check_header(TsvKind::Teams, "teams\t2\n").is_ok());
/// assert!(check_header(TsvKind::Accounts, "accounts\t2").is_err());
/// ```
pub fn check_header(kind: TsvKind, line: &str) -> Result<()> {
    let line = line.trim_end();
    if kind.header().is_match(line) {
        Ok(())
    } else {
        Err(FormatError::VersionMismatch {
            expected: kind.expected_version().to_string(),
            actual: line.to_string(),
        }
        .into())
    }
}
