//! Persisted contest entities.
//!
//! This module contains the records the import engine reconciles against:
//! team categories (groups), affiliations, teams, users, contests, problems
//! and the contest/problem association.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A team category, called a "group" in the tabular formats.
///
/// The identifier is assigned by the caller when imported from a groups
/// document and must be preserved exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamCategory {
    /// Category identifier
    pub id: i64,

    /// Display name
    pub name: String,

    /// Whether the category shows up on public listings and exports
    pub visible: bool,

    /// Sort order used to select categories for results exports
    pub sort_order: i32,
}

impl TeamCategory {
    /// Creates a visible category with sort order 0.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            visible: true,
            sort_order: 0,
        }
    }
}

/// A category that has not been stored yet and gets a generated key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTeamCategory {
    pub name: String,
    pub visible: bool,
    pub sort_order: i32,
}

/// The institution a team belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamAffiliation {
    /// Generated identifier
    pub id: i64,

    /// Short display name
    pub short_name: String,

    /// Full institution name
    pub name: String,

    /// Country code (ISO 3166-1 alpha-3 in practice)
    pub country: String,

    /// External identifier derived from the institution code
    pub external_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTeamAffiliation {
    pub short_name: String,
    pub name: String,
    pub country: String,
    pub external_id: Option<String>,
}

/// A contest team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Team identifier, caller-assigned during imports
    pub id: i64,

    /// Optional external identifier
    pub external_id: Option<String>,

    /// Category the team competes in
    pub category_id: Option<i64>,

    /// Display name
    pub name: String,

    /// Institution the team belongs to
    pub affiliation_id: Option<i64>,

    /// Free-text member list
    pub members: Option<String>,
}

impl Team {
    /// Creates a team with only an identifier and a name.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            external_id: None,
            category_id: None,
            name: name.into(),
            affiliation_id: None,
            members: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTeam {
    pub name: String,
    pub category_id: Option<i64>,
    pub members: Option<String>,
}

/// Role labels granted to user accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrative access
    Admin,
    /// Jury access
    Jury,
    /// Contestant access
    Team,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::Admin => "admin",
            Role::Jury => "jury",
            Role::Team => "team",
        };
        f.write_str(label)
    }
}

/// A user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Display name
    pub name: String,

    /// Unique login name
    pub username: String,

    /// Password material as delivered by the import; hashing belongs to the store
    pub plain_password: Option<String>,

    pub roles: BTreeSet<Role>,

    /// Team the account logs in as
    pub team_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub plain_password: Option<String>,
    pub roles: BTreeSet<Role>,
    pub team_id: Option<i64>,
}

/// A persisted contest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contest {
    pub id: i64,

    /// External identifier, equal to the short name for imported contests
    pub external_id: String,

    pub name: String,

    /// Identifier-safe short name
    pub short_name: String,

    /// Moment the contest becomes visible
    pub activate_time: DateTime<FixedOffset>,

    pub start_time: DateTime<FixedOffset>,

    pub end_time: DateTime<FixedOffset>,

    /// Moment the scoreboard freezes, if it does
    pub freeze_time: Option<DateTime<FixedOffset>>,

    /// Number of extra bronze medals awarded beyond the fixed twelve medal places
    pub bronze_extension: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewContest {
    pub external_id: String,
    pub name: String,
    pub short_name: String,
    pub activate_time: DateTime<FixedOffset>,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    pub freeze_time: Option<DateTime<FixedOffset>>,
    pub bronze_extension: u32,
}

/// A problem, independent of any contest once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub id: i64,
    pub name: String,

    /// Time limit in seconds
    pub time_limit: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProblem {
    pub name: String,
    pub time_limit: u32,
}

/// Association of a problem with a contest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestProblem {
    pub contest_id: i64,
    pub problem_id: i64,

    /// Contest-unique label, e.g. "A"
    pub short_name: String,

    /// HTML color name or `#rrggbb` value
    pub color: Option<String>,
}

/// A submission language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub id: String,
    pub name: String,
}
