//! Record store seam and import bookkeeping types.
//!
//! Persistence is owned by the embedding application. The import engine only
//! talks to it through [`RecordStore`], which distinguishes inserts with a
//! generated key from inserts with a caller-assigned key and always hands back
//! the stored record.

use crate::error::StoreError;
use crate::model::{
    Contest, ContestProblem, Language, NewContest, NewProblem, NewTeam, NewTeamAffiliation,
    NewTeamCategory, NewUser, Problem, Team, TeamAffiliation, TeamCategory, User,
};
use serde_json::Value;

/// Result type for record store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Access to persisted contest records.
///
/// Implementations are expected to apply each write immediately; the import
/// engine treats every record as its own commit.
///
/// # Example
///
/// ```rust
/// use contest_core::{MemoryStore, RecordStore, TeamCategory};
///
/// let mut store = MemoryStore::new();
/// let stored = store
///     .insert_category_with_id(TeamCategory::new(14, "Participants"))
///     .unwrap();
/// assert_eq!(stored.id, 14);
/// assert!(store.find_category(14).unwrap().is_some());
/// ```
pub trait RecordStore {
    /// Looks up a category by identifier.
    fn find_category(&self, id: i64) -> StoreResult<Option<TeamCategory>>;

    /// Looks up the first category with the given name.
    fn find_category_by_name(&self, name: &str) -> StoreResult<Option<TeamCategory>>;

    /// All categories, ordered by identifier.
    fn categories(&self) -> StoreResult<Vec<TeamCategory>>;

    /// Stores a category under a generated key.
    fn insert_category(&mut self, category: NewTeamCategory) -> StoreResult<TeamCategory>;

    /// Stores a category under the key it carries.
    fn insert_category_with_id(&mut self, category: TeamCategory) -> StoreResult<TeamCategory>;

    /// Replaces a stored category.
    fn update_category(&mut self, category: TeamCategory) -> StoreResult<TeamCategory>;

    /// Looks up an affiliation by identifier.
    fn find_affiliation(&self, id: i64) -> StoreResult<Option<TeamAffiliation>>;

    /// Looks up an affiliation by external identifier.
    fn find_affiliation_by_external_id(
        &self,
        external_id: &str,
    ) -> StoreResult<Option<TeamAffiliation>>;

    /// Stores an affiliation under a generated key.
    fn insert_affiliation(
        &mut self,
        affiliation: NewTeamAffiliation,
    ) -> StoreResult<TeamAffiliation>;

    /// Looks up a team by identifier.
    fn find_team(&self, id: i64) -> StoreResult<Option<Team>>;

    /// Looks up a team by exact name within a category.
    fn find_team_by_name_and_category(
        &self,
        name: &str,
        category_id: i64,
    ) -> StoreResult<Option<Team>>;

    /// All teams, ordered by identifier.
    fn teams(&self) -> StoreResult<Vec<Team>>;

    /// Stores a team under a generated key.
    fn insert_team(&mut self, team: NewTeam) -> StoreResult<Team>;

    /// Stores a team under the key it carries.
    fn insert_team_with_id(&mut self, team: Team) -> StoreResult<Team>;

    /// Replaces a stored team.
    fn update_team(&mut self, team: Team) -> StoreResult<Team>;

    /// Looks up a user by login name.
    fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Stores a user under a generated key.
    fn insert_user(&mut self, user: NewUser) -> StoreResult<User>;

    /// Replaces a stored user.
    fn update_user(&mut self, user: User) -> StoreResult<User>;

    /// Looks up a contest by identifier.
    fn find_contest(&self, id: i64) -> StoreResult<Option<Contest>>;

    /// Stores a contest under a generated key.
    fn insert_contest(&mut self, contest: NewContest) -> StoreResult<Contest>;

    /// Looks up a problem by identifier.
    fn find_problem(&self, id: i64) -> StoreResult<Option<Problem>>;

    /// Stores a problem under a generated key.
    fn insert_problem(&mut self, problem: NewProblem) -> StoreResult<Problem>;

    /// Associates a problem with a contest.
    fn insert_contest_problem(
        &mut self,
        contest_problem: ContestProblem,
    ) -> StoreResult<ContestProblem>;

    /// Problems of a contest in insertion order.
    fn contest_problems(&self, contest_id: i64) -> StoreResult<Vec<ContestProblem>>;

    /// All submission languages.
    fn languages(&self) -> StoreResult<Vec<Language>>;

    /// Reads a configuration record.
    fn config(&self, name: &str) -> StoreResult<Option<Value>>;

    /// Writes a configuration record.
    fn set_config(&mut self, name: &str, value: Value) -> StoreResult<()>;
}

/// Context for import operations.
#[derive(Debug, Default, Clone)]
pub struct ImportContext {
    /// Contest change notifications are attached to; none are emitted for
    /// groups and teams without one
    pub current_contest: Option<i64>,
}

impl ImportContext {
    /// Creates a new import context with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the current contest.
    pub fn with_current_contest(mut self, contest_id: i64) -> Self {
        self.current_contest = Some(contest_id);
        self
    }
}

/// Outcome of a reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Number of records processed
    pub processed: usize,

    /// Identifiers of records created by this run
    pub created: Vec<i64>,

    /// Identifiers of records that existed and were updated
    pub updated: Vec<i64>,

    /// Identifiers of affiliations created along the way
    pub created_affiliations: Vec<i64>,
}

impl ImportSummary {
    /// Records a created identifier.
    pub fn add_created(&mut self, id: i64) {
        self.created.push(id);
        self.processed += 1;
    }

    /// Records an updated identifier.
    pub fn add_updated(&mut self, id: i64) {
        self.updated.push(id);
        self.processed += 1;
    }
}
