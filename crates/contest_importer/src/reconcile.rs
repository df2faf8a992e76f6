//! Reconciliation of tabular records against the record store.
//!
//! Every path is an upsert keyed by caller-supplied identifiers: groups and
//! teams keep the identifier from the document, users are matched by
//! username. Nothing is ever deleted. Documents are parsed in full before
//! the first write; after that each record is committed on its own.

use crate::Importer;
use contest_core::{
    AuditAction, AuditEntry, AuditLog, ChangeEvent, EntityKind, EventAction, EventLog,
    ImportSummary, NewTeam, NewTeamAffiliation, NewTeamCategory, NewUser, RecordStore,
    ReferenceError, Result, Role, Team, TeamCategory, User, REASON_TSV, REASON_TSV_JURY_TEAM,
};
use contest_parser::{
    parse_accounts, parse_groups, parse_teams, AccountRecord, AccountRole, AffiliationRecord,
    TeamRecord,
};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Copies the columns of a teams row onto a team.
fn apply_team_record(team: &mut Team, record: TeamRecord, affiliation_id: Option<i64>) {
    team.external_id = record.external_id;
    team.category_id = record.category_id;
    team.name = record.name;
    team.affiliation_id = affiliation_id;
}

/// Copies the columns of an accounts row onto a user.
///
/// An empty password column keeps the stored password.
fn apply_account_record(
    user: &mut User,
    record: AccountRecord,
    roles: BTreeSet<Role>,
    team_id: Option<i64>,
) {
    user.name = record.name;
    user.roles = roles;
    user.team_id = team_id;
    if !record.password.is_empty() {
        user.plain_password = Some(record.password);
    }
}

impl<S, A, E> Importer<S, A, E>
where
    S: RecordStore,
    A: AuditLog,
    E: EventLog,
{
    /// Imports a groups document.
    ///
    /// Each row creates the category under its own identifier or renames the
    /// existing one. A change event per row is emitted when a current
    /// contest is set; an audit entry is written for every row.
    pub fn import_groups(&mut self, content: &str) -> Result<ImportSummary> {
        let records = parse_groups(content)?;
        let mut summary = ImportSummary::default();

        for record in records {
            let (category, action) = match self.store.find_category(record.id)? {
                Some(mut existing) => {
                    existing.name = record.name;
                    (self.store.update_category(existing)?, EventAction::Update)
                }
                None => (
                    self.store
                        .insert_category_with_id(TeamCategory::new(record.id, record.name))?,
                    EventAction::Create,
                ),
            };
            debug!(id = category.id, line = record.line, ?action, "Reconciled group");

            match action {
                EventAction::Create => summary.add_created(category.id),
                EventAction::Update => summary.add_updated(category.id),
            }

            if let Some(contest_id) = self.context.current_contest {
                self.events.log(ChangeEvent::new(
                    EntityKind::TeamCategory,
                    vec![category.id],
                    action,
                    Some(contest_id),
                ));
            }
            self.audit.record(AuditEntry::new(
                EntityKind::TeamCategory,
                category.id,
                AuditAction::Replaced,
                REASON_TSV,
            ));
        }

        Ok(summary)
    }

    /// Imports a teams document.
    ///
    /// Affiliations are matched by external identifier and created when
    /// missing; unknown categories get a placeholder. Change events are
    /// batched per kind and only emitted when a current contest is set.
    pub fn import_teams(&mut self, content: &str) -> Result<ImportSummary> {
        let records = parse_teams(content)?;
        let mut summary = ImportSummary::default();

        for record in records {
            let affiliation_id = match &record.affiliation {
                Some(affiliation) => Some(self.resolve_affiliation(affiliation, &mut summary)?),
                None => None,
            };

            if let Some(category_id) = record.category_id {
                self.ensure_category(category_id)?;
            }

            let line = record.line;
            let team = match self.store.find_team(record.team_id)? {
                Some(mut existing) => {
                    apply_team_record(&mut existing, record, affiliation_id);
                    let team = self.store.update_team(existing)?;
                    summary.add_updated(team.id);
                    team
                }
                None => {
                    let mut team = Team::new(record.team_id, String::new());
                    apply_team_record(&mut team, record, affiliation_id);
                    let team = self.store.insert_team_with_id(team)?;
                    summary.add_created(team.id);
                    team
                }
            };
            debug!(id = team.id, line, "Reconciled team");

            self.audit.record(AuditEntry::new(
                EntityKind::Team,
                team.id,
                AuditAction::Replaced,
                REASON_TSV,
            ));
        }

        if let Some(contest_id) = self.context.current_contest {
            let batches = [
                (
                    EntityKind::TeamAffiliation,
                    &summary.created_affiliations,
                    EventAction::Create,
                ),
                (EntityKind::Team, &summary.created, EventAction::Create),
                (EntityKind::Team, &summary.updated, EventAction::Update),
            ];
            for (entity, ids, action) in batches {
                if !ids.is_empty() {
                    self.events
                        .log(ChangeEvent::new(entity, ids.clone(), action, Some(contest_id)));
                }
            }
        }

        Ok(summary)
    }

    /// Imports an accounts document.
    ///
    /// Team references are all checked before the first user is written.
    /// Judges get a jury team in the hidden jury category, created on first
    /// use. The summary lists user identifiers.
    pub fn import_accounts(&mut self, content: &str) -> Result<ImportSummary> {
        let records = parse_accounts(content)?;

        for record in &records {
            if let AccountRole::Team { team_id } = record.role {
                if self.store.find_team(team_id)?.is_none() {
                    return Err(ReferenceError::UnknownTeam {
                        team_id,
                        line: record.line,
                    }
                    .into());
                }
            }
        }

        let mut summary = ImportSummary::default();
        let mut jury_category: Option<i64> = None;

        for record in records {
            let (roles, team_id) = match record.role {
                AccountRole::Admin => (BTreeSet::from([Role::Admin]), None),
                AccountRole::Judge => {
                    let category_id = match jury_category {
                        Some(id) => id,
                        None => {
                            let id = self.jury_category()?;
                            jury_category = Some(id);
                            id
                        }
                    };
                    let team = self.jury_team(&record.name, category_id)?;
                    (BTreeSet::from([Role::Jury, Role::Team]), Some(team.id))
                }
                AccountRole::Team { team_id } => (BTreeSet::from([Role::Team]), Some(team_id)),
            };

            let line = record.line;
            let user = match self.store.find_user_by_username(&record.username)? {
                Some(mut existing) => {
                    apply_account_record(&mut existing, record, roles, team_id);
                    let user = self.store.update_user(existing)?;
                    summary.add_updated(user.id);
                    user
                }
                None => {
                    let user = self.store.insert_user(NewUser {
                        name: record.name,
                        username: record.username,
                        plain_password: Some(record.password).filter(|p| !p.is_empty()),
                        roles,
                        team_id,
                    })?;
                    summary.add_created(user.id);
                    user
                }
            };
            debug!(id = user.id, username = %user.username, line, "Reconciled account");

            self.audit.record(AuditEntry::new(
                EntityKind::User,
                user.id,
                AuditAction::Replaced,
                REASON_TSV,
            ));
        }

        Ok(summary)
    }

    fn resolve_affiliation(
        &mut self,
        affiliation: &AffiliationRecord,
        summary: &mut ImportSummary,
    ) -> Result<i64> {
        let existing = match &affiliation.external_id {
            Some(external_id) => self.store.find_affiliation_by_external_id(external_id)?,
            None => {
                warn!(
                    short_name = %affiliation.short_name,
                    "Affiliation has no external id, creating a new one"
                );
                None
            }
        };

        if let Some(existing) = existing {
            return Ok(existing.id);
        }

        let created = self.store.insert_affiliation(NewTeamAffiliation {
            short_name: affiliation.short_name.clone(),
            name: affiliation.name.clone(),
            country: affiliation.country.clone(),
            external_id: affiliation.external_id.clone(),
        })?;
        debug!(id = created.id, short_name = %created.short_name, "Created affiliation");

        summary.created_affiliations.push(created.id);
        self.audit.record(AuditEntry::new(
            EntityKind::TeamAffiliation,
            created.id,
            AuditAction::Added,
            REASON_TSV,
        ));
        Ok(created.id)
    }

    fn ensure_category(&mut self, category_id: i64) -> Result<()> {
        if self.store.find_category(category_id)?.is_some() {
            return Ok(());
        }

        let placeholder = TeamCategory::new(
            category_id,
            format!("{} - auto-create during import", category_id),
        );
        self.store.insert_category_with_id(placeholder)?;
        debug!(id = category_id, "Created placeholder category");

        self.audit.record(AuditEntry::new(
            EntityKind::TeamCategory,
            category_id,
            AuditAction::Added,
            REASON_TSV,
        ));
        Ok(())
    }

    /// Finds or creates the hidden jury category.
    fn jury_category(&mut self) -> Result<i64> {
        let name = self.config.jury_category_name.clone();
        if let Some(category) = self.store.find_category_by_name(&name)? {
            return Ok(category.id);
        }

        let category = self.store.insert_category(NewTeamCategory {
            name,
            visible: false,
            sort_order: self.config.jury_sort_order,
        })?;
        debug!(id = category.id, "Created jury category");
        Ok(category.id)
    }

    /// Finds or creates the team a judge account logs in as.
    fn jury_team(&mut self, name: &str, category_id: i64) -> Result<Team> {
        let (team, action) = match self.store.find_team_by_name_and_category(name, category_id)? {
            Some(team) => (team, EventAction::Update),
            None => {
                let team = self.store.insert_team(NewTeam {
                    name: name.to_string(),
                    category_id: Some(category_id),
                    members: Some(name.to_string()),
                })?;
                (team, EventAction::Create)
            }
        };

        self.events
            .log(ChangeEvent::new(EntityKind::Team, vec![team.id], action, None));
        self.audit.record(AuditEntry::new(
            EntityKind::Team,
            team.id,
            AuditAction::Replaced,
            REASON_TSV_JURY_TEAM,
        ));
        Ok(team)
    }
}
