//! Audit trail and change notifications.

use serde::Serialize;
use std::fmt;

/// Kind of record an audit entry or change event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    TeamCategory,
    TeamAffiliation,
    Team,
    User,
    Contest,
    Problem,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::TeamCategory => "team_category",
            EntityKind::TeamAffiliation => "team_affiliation",
            EntityKind::Team => "team",
            EntityKind::User => "user",
            EntityKind::Contest => "contest",
            EntityKind::Problem => "problem",
        };
        f.write_str(name)
    }
}

/// What happened to an audited record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Added,
    Replaced,
}

/// Reason attached to rows written by a tabular import.
pub const REASON_TSV: &str = "imported from tsv";

/// Reason attached to jury teams synthesized for judge accounts.
pub const REASON_TSV_JURY_TEAM: &str = "imported from tsv, autocreated for judge";

/// Reason attached to contests and problems created from a descriptor.
pub const REASON_DESCRIPTOR: &str = "imported from contest descriptor";

/// One audit trail entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEntry {
    pub entity: EntityKind,
    pub id: i64,
    pub action: AuditAction,
    pub reason: &'static str,
}

impl AuditEntry {
    /// Creates a new audit entry.
    pub fn new(entity: EntityKind, id: i64, action: AuditAction, reason: &'static str) -> Self {
        Self {
            entity,
            id,
            action,
            reason,
        }
    }
}

/// Writes audit entries.
pub trait AuditLog {
    /// Records one entry.
    fn record(&mut self, entry: AuditEntry);
}

impl AuditLog for Vec<AuditEntry> {
    fn record(&mut self, entry: AuditEntry) {
        self.push(entry);
    }
}

/// Kind of change announced to event consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventAction {
    Create,
    Update,
}

/// Change notification for one or more records of the same kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    pub entity: EntityKind,
    pub ids: Vec<i64>,
    pub action: EventAction,

    /// Contest the change is announced in; `None` announces it globally
    pub contest_id: Option<i64>,
}

impl ChangeEvent {
    /// Creates a change event.
    pub fn new(
        entity: EntityKind,
        ids: Vec<i64>,
        action: EventAction,
        contest_id: Option<i64>,
    ) -> Self {
        Self {
            entity,
            ids,
            action,
            contest_id,
        }
    }
}

/// Emits change notifications.
pub trait EventLog {
    /// Emits one event.
    fn log(&mut self, event: ChangeEvent);
}

impl EventLog for Vec<ChangeEvent> {
    fn log(&mut self, event: ChangeEvent) {
        self.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_names() {
        assert_eq!(EntityKind::TeamCategory.to_string(), "team_category");
        assert_eq!(EntityKind::TeamAffiliation.to_string(), "team_affiliation");
    }

    #[test]
    fn test_vec_collects_entries() {
        let mut audit: Vec<AuditEntry> = Vec::new();
        audit.record(AuditEntry::new(
            EntityKind::Team,
            3,
            AuditAction::Replaced,
            REASON_TSV,
        ));
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].reason, "imported from tsv");
    }
}
