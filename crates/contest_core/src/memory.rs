//! In-memory record store.
//!
//! Backs tests and embedders that keep contest data in process. Generated
//! keys always continue above the highest key stored so far, so they never
//! collide with keys assigned by an import.

use crate::error::StoreError;
use crate::model::{
    Contest, ContestProblem, Language, NewContest, NewProblem, NewTeam, NewTeamAffiliation,
    NewTeamCategory, NewUser, Problem, Team, TeamAffiliation, TeamCategory, User,
};
use crate::store::{RecordStore, StoreResult};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Record store keeping everything in ordered maps.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    categories: BTreeMap<i64, TeamCategory>,
    affiliations: BTreeMap<i64, TeamAffiliation>,
    teams: BTreeMap<i64, Team>,
    users: BTreeMap<i64, User>,
    contests: BTreeMap<i64, Contest>,
    problems: BTreeMap<i64, Problem>,
    contest_problems: Vec<ContestProblem>,
    languages: Vec<Language>,
    config: HashMap<String, Value>,
}

fn next_key<V>(entity: &str, map: &BTreeMap<i64, V>) -> StoreResult<i64> {
    match map.keys().next_back() {
        None => Ok(1),
        Some(last) => last
            .checked_add(1)
            .ok_or_else(|| StoreError::Backend(format!("{entity} key space exhausted"))),
    }
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a submission language.
    pub fn with_language(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.languages.push(Language {
            id: id.into(),
            name: name.into(),
        });
        self
    }

    /// Seeds a configuration record.
    pub fn with_config(mut self, name: impl Into<String>, value: Value) -> Self {
        self.config.insert(name.into(), value);
        self
    }

    /// All stored affiliations.
    pub fn affiliations(&self) -> Vec<TeamAffiliation> {
        self.affiliations.values().cloned().collect()
    }

    /// All stored users.
    pub fn users(&self) -> Vec<User> {
        self.users.values().cloned().collect()
    }

    /// All stored contests.
    pub fn contests(&self) -> Vec<Contest> {
        self.contests.values().cloned().collect()
    }
}

impl RecordStore for MemoryStore {
    fn find_category(&self, id: i64) -> StoreResult<Option<TeamCategory>> {
        Ok(self.categories.get(&id).cloned())
    }

    fn find_category_by_name(&self, name: &str) -> StoreResult<Option<TeamCategory>> {
        Ok(self.categories.values().find(|c| c.name == name).cloned())
    }

    fn categories(&self) -> StoreResult<Vec<TeamCategory>> {
        Ok(self.categories.values().cloned().collect())
    }

    fn insert_category(&mut self, category: NewTeamCategory) -> StoreResult<TeamCategory> {
        let stored = TeamCategory {
            id: next_key("category", &self.categories)?,
            name: category.name,
            visible: category.visible,
            sort_order: category.sort_order,
        };
        self.categories.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn insert_category_with_id(&mut self, category: TeamCategory) -> StoreResult<TeamCategory> {
        if self.categories.contains_key(&category.id) {
            return Err(StoreError::duplicate("team_category", category.id));
        }
        self.categories.insert(category.id, category.clone());
        Ok(category)
    }

    fn update_category(&mut self, category: TeamCategory) -> StoreResult<TeamCategory> {
        match self.categories.get_mut(&category.id) {
            Some(slot) => {
                *slot = category.clone();
                Ok(category)
            }
            None => Err(StoreError::not_found("team_category", category.id)),
        }
    }

    fn find_affiliation(&self, id: i64) -> StoreResult<Option<TeamAffiliation>> {
        Ok(self.affiliations.get(&id).cloned())
    }

    fn find_affiliation_by_external_id(
        &self,
        external_id: &str,
    ) -> StoreResult<Option<TeamAffiliation>> {
        Ok(self
            .affiliations
            .values()
            .find(|a| a.external_id.as_deref() == Some(external_id))
            .cloned())
    }

    fn insert_affiliation(
        &mut self,
        affiliation: NewTeamAffiliation,
    ) -> StoreResult<TeamAffiliation> {
        let stored = TeamAffiliation {
            id: next_key("affiliation", &self.affiliations)?,
            short_name: affiliation.short_name,
            name: affiliation.name,
            country: affiliation.country,
            external_id: affiliation.external_id,
        };
        self.affiliations.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn find_team(&self, id: i64) -> StoreResult<Option<Team>> {
        Ok(self.teams.get(&id).cloned())
    }

    fn find_team_by_name_and_category(
        &self,
        name: &str,
        category_id: i64,
    ) -> StoreResult<Option<Team>> {
        Ok(self
            .teams
            .values()
            .find(|t| t.name == name && t.category_id == Some(category_id))
            .cloned())
    }

    fn teams(&self) -> StoreResult<Vec<Team>> {
        Ok(self.teams.values().cloned().collect())
    }

    fn insert_team(&mut self, team: NewTeam) -> StoreResult<Team> {
        let stored = Team {
            id: next_key("team", &self.teams)?,
            external_id: None,
            category_id: team.category_id,
            name: team.name,
            affiliation_id: None,
            members: team.members,
        };
        self.teams.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn insert_team_with_id(&mut self, team: Team) -> StoreResult<Team> {
        if self.teams.contains_key(&team.id) {
            return Err(StoreError::duplicate("team", team.id));
        }
        self.teams.insert(team.id, team.clone());
        Ok(team)
    }

    fn update_team(&mut self, team: Team) -> StoreResult<Team> {
        match self.teams.get_mut(&team.id) {
            Some(slot) => {
                *slot = team.clone();
                Ok(team)
            }
            None => Err(StoreError::not_found("team", team.id)),
        }
    }

    fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    fn insert_user(&mut self, user: NewUser) -> StoreResult<User> {
        if self.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::duplicate("user", &user.username));
        }
        let stored = User {
            id: next_key("user", &self.users)?,
            name: user.name,
            username: user.username,
            plain_password: user.plain_password,
            roles: user.roles,
            team_id: user.team_id,
        };
        self.users.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn update_user(&mut self, user: User) -> StoreResult<User> {
        match self.users.get_mut(&user.id) {
            Some(slot) => {
                *slot = user.clone();
                Ok(user)
            }
            None => Err(StoreError::not_found("user", user.id)),
        }
    }

    fn find_contest(&self, id: i64) -> StoreResult<Option<Contest>> {
        Ok(self.contests.get(&id).cloned())
    }

    fn insert_contest(&mut self, contest: NewContest) -> StoreResult<Contest> {
        let stored = Contest {
            id: next_key("contest", &self.contests)?,
            external_id: contest.external_id,
            name: contest.name,
            short_name: contest.short_name,
            activate_time: contest.activate_time,
            start_time: contest.start_time,
            end_time: contest.end_time,
            freeze_time: contest.freeze_time,
            bronze_extension: contest.bronze_extension,
        };
        self.contests.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn find_problem(&self, id: i64) -> StoreResult<Option<Problem>> {
        Ok(self.problems.get(&id).cloned())
    }

    fn insert_problem(&mut self, problem: NewProblem) -> StoreResult<Problem> {
        let stored = Problem {
            id: next_key("problem", &self.problems)?,
            name: problem.name,
            time_limit: problem.time_limit,
        };
        self.problems.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn insert_contest_problem(
        &mut self,
        contest_problem: ContestProblem,
    ) -> StoreResult<ContestProblem> {
        if !self.contests.contains_key(&contest_problem.contest_id) {
            return Err(StoreError::not_found("contest", contest_problem.contest_id));
        }
        if !self.problems.contains_key(&contest_problem.problem_id) {
            return Err(StoreError::not_found("problem", contest_problem.problem_id));
        }
        if self.contest_problems.iter().any(|cp| {
            cp.contest_id == contest_problem.contest_id
                && cp.problem_id == contest_problem.problem_id
        }) {
            return Err(StoreError::duplicate(
                "contest_problem",
                format!(
                    "{}/{}",
                    contest_problem.contest_id, contest_problem.problem_id
                ),
            ));
        }
        self.contest_problems.push(contest_problem.clone());
        Ok(contest_problem)
    }

    fn contest_problems(&self, contest_id: i64) -> StoreResult<Vec<ContestProblem>> {
        Ok(self
            .contest_problems
            .iter()
            .filter(|cp| cp.contest_id == contest_id)
            .cloned()
            .collect())
    }

    fn languages(&self) -> StoreResult<Vec<Language>> {
        Ok(self.languages.clone())
    }

    fn config(&self, name: &str) -> StoreResult<Option<Value>> {
        Ok(self.config.get(name).cloned())
    }

    fn set_config(&mut self, name: &str, value: Value) -> StoreResult<()> {
        self.config.insert(name.to_string(), value);
        Ok(())
    }
}
