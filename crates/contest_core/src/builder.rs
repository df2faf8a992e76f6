//! Builder pattern for creating contest records.
//!
//! This module provides ergonomic builders for constructing teams and
//! contests with a fluent API.

use crate::{ImportError, NewContest, Result, Team};
use chrono::{DateTime, Duration, FixedOffset};

/// Builder for creating a `Team`.
///
/// # Example
///
/// ```rust
/// use contest_core::TeamBuilder;
///
/// let team = TeamBuilder::new(42, "Null Pointers")
///     .external_id("ext-42")
///     .category(3)
///     .build();
/// assert_eq!(team.category_id, Some(3));
/// ```
#[derive(Debug, Default)]
pub struct TeamBuilder {
    id: i64,
    name: String,
    external_id: Option<String>,
    category_id: Option<i64>,
    affiliation_id: Option<i64>,
    members: Option<String>,
}

impl TeamBuilder {
    /// Creates a new team builder with required fields.
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets the external identifier.
    pub fn external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    /// Sets the category.
    pub fn category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Sets the affiliation.
    pub fn affiliation(mut self, affiliation_id: i64) -> Self {
        self.affiliation_id = Some(affiliation_id);
        self
    }

    /// Sets the member list.
    pub fn members(mut self, members: impl Into<String>) -> Self {
        self.members = Some(members.into());
        self
    }

    /// Builds the team.
    pub fn build(self) -> Team {
        Team {
            id: self.id,
            external_id: self.external_id,
            category_id: self.category_id,
            name: self.name,
            affiliation_id: self.affiliation_id,
            members: self.members,
        }
    }
}

/// Builder for creating a `NewContest`.
///
/// Activation defaults to one hour before the start and the end to five
/// hours after it. Times are computed in [`ContestBuilder::build`], which
/// fails when one of them falls outside the representable range.
///
/// # Example
///
/// ```rust
/// use chrono::{DateTime, Duration};
/// use contest_core::ContestBuilder;
///
/// let start = DateTime::parse_from_rfc3339("2024-04-20T10:00:00+02:00").unwrap();
/// let contest = ContestBuilder::new("World Finals", "wf", start)
///     .duration(Duration::hours(5))
///     .freeze_before_end(Duration::hours(1))
///     .build()
///     .unwrap();
/// assert_eq!(contest.freeze_time, Some(start + Duration::hours(4)));
/// ```
#[derive(Debug)]
pub struct ContestBuilder {
    name: String,
    short_name: String,
    start_time: DateTime<FixedOffset>,
    activation: Activation,
    duration: Duration,
    freeze: Option<Freeze>,
    bronze_extension: u32,
}

#[derive(Debug, Clone, Copy)]
enum Activation {
    At(DateTime<FixedOffset>),
    Before(Duration),
}

#[derive(Debug, Clone, Copy)]
enum Freeze {
    BeforeEnd(Duration),
    AfterStart(Duration),
}

impl ContestBuilder {
    /// Creates a new contest builder with required fields.
    pub fn new(
        name: impl Into<String>,
        short_name: impl Into<String>,
        start_time: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            name: name.into(),
            short_name: short_name.into(),
            start_time,
            activation: Activation::Before(Duration::hours(1)),
            duration: Duration::hours(5),
            freeze: None,
            bronze_extension: 0,
        }
    }

    /// Sets the activation time.
    pub fn activate_time(mut self, activate_time: DateTime<FixedOffset>) -> Self {
        self.activation = Activation::At(activate_time);
        self
    }

    /// Activates the contest the given amount of time before the start.
    pub fn activation_lead(mut self, lead: Duration) -> Self {
        self.activation = Activation::Before(lead);
        self
    }

    /// Sets the contest length.
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Freezes the scoreboard the given amount of time before the end.
    pub fn freeze_before_end(mut self, length: Duration) -> Self {
        self.freeze = Some(Freeze::BeforeEnd(length));
        self
    }

    /// Freezes the scoreboard the given amount of time after the start.
    pub fn freeze_after_start(mut self, offset: Duration) -> Self {
        self.freeze = Some(Freeze::AfterStart(offset));
        self
    }

    /// Sets the number of extra bronze medals.
    pub fn bronze_extension(mut self, extra: u32) -> Self {
        self.bronze_extension = extra;
        self
    }

    /// Builds the contest; the external identifier equals the short name.
    ///
    /// Fails with a validation error naming every time that is out of range.
    pub fn build(self) -> Result<NewContest> {
        let start = self.start_time;
        let mut violations = Vec::new();

        let activate_time = match self.activation {
            Activation::At(time) => Some(time),
            Activation::Before(lead) => start.checked_sub_signed(lead),
        };
        if activate_time.is_none() {
            violations.push(("activate_time", OUT_OF_RANGE));
        }

        let end_time = start.checked_add_signed(self.duration);
        if end_time.is_none() {
            violations.push(("end_time", OUT_OF_RANGE));
        }

        let freeze_time = match self.freeze {
            None => Ok(None),
            Some(Freeze::AfterStart(offset)) => {
                start.checked_add_signed(offset).ok_or(()).map(Some)
            }
            Some(Freeze::BeforeEnd(length)) => end_time
                .and_then(|end| end.checked_sub_signed(length))
                .ok_or(())
                .map(Some),
        };
        if freeze_time.is_err() {
            violations.push(("freeze_time", OUT_OF_RANGE));
        }

        match (activate_time, end_time, freeze_time) {
            (Some(activate_time), Some(end_time), Ok(freeze_time)) => Ok(NewContest {
                external_id: self.short_name.clone(),
                name: self.name,
                short_name: self.short_name,
                activate_time,
                start_time: start,
                end_time,
                freeze_time,
                bronze_extension: self.bronze_extension,
            }),
            _ => Err(ImportError::validation(violations)),
        }
    }
}

const OUT_OF_RANGE: &str = "is out of the supported time range";

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_team_builder_defaults() {
        let team = TeamBuilder::new(1, "Solo").build();
        assert_eq!(team, Team::new(1, "Solo"));
    }

    #[test]
    fn test_contest_builder_timeline() {
        let start = DateTime::parse_from_rfc3339("2024-04-20T10:00:00+00:00").unwrap();
        let contest = ContestBuilder::new("Regional", "nwerc", start)
            .duration(Duration::hours(5))
            .build()
            .unwrap();

        assert_eq!(contest.external_id, "nwerc");
        assert_eq!(contest.activate_time, start - Duration::hours(1));
        assert_eq!(contest.end_time, start + Duration::hours(5));
        assert_eq!(contest.freeze_time, None);
    }

    #[test]
    fn test_contest_builder_freeze_forms_agree() {
        let start = DateTime::parse_from_rfc3339("2024-04-20T10:00:00+00:00").unwrap();
        let before_end = ContestBuilder::new("Regional", "nwerc", start)
            .freeze_before_end(Duration::hours(1))
            .build()
            .unwrap();
        let after_start = ContestBuilder::new("Regional", "nwerc", start)
            .freeze_after_start(Duration::hours(4))
            .build()
            .unwrap();

        assert_eq!(before_end.freeze_time, after_start.freeze_time);
    }

    #[test]
    fn test_contest_builder_activation_lead() {
        let start = DateTime::parse_from_rfc3339("2024-04-20T10:00:00+00:00").unwrap();
        let contest = ContestBuilder::new("Regional", "nwerc", start)
            .activation_lead(Duration::minutes(30))
            .build()
            .unwrap();

        assert_eq!(contest.activate_time, start - Duration::minutes(30));
    }

    #[test]
    fn test_contest_builder_rejects_out_of_range_times() {
        let start = DateTime::parse_from_rfc3339("2024-04-20T10:00:00+00:00").unwrap();
        let huge = Duration::days(100_000_000);

        let err = ContestBuilder::new("Regional", "nwerc", start)
            .duration(huge)
            .freeze_before_end(Duration::hours(1))
            .build()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Contest has errors:\n\n\
             end_time: is out of the supported time range\n\
             freeze_time: is out of the supported time range"
        );

        let err = ContestBuilder::new("Regional", "nwerc", start)
            .activation_lead(huge)
            .freeze_after_start(huge)
            .build()
            .unwrap_err();
        assert!(matches!(err, ImportError::Validation(_)));
        assert!(err.to_string().contains("activate_time: "));
        assert!(err.to_string().contains("freeze_time: "));
    }
}
