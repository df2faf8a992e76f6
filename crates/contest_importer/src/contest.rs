//! Contest descriptor import and export.
//!
//! Import builds a contest from a descriptor, validates it, stores it and
//! then writes the configuration records and problems the descriptor
//! carries. Export goes the other way, starting from a stored contest.

use crate::color::{convert_to_color, convert_to_hex};
use crate::config::violations;
use crate::{ImportConfig, Importer};
use chrono::Local;
use contest_core::{
    AuditAction, AuditEntry, AuditLog, Contest, ContestBuilder, ContestProblem, EntityKind,
    EventLog, ImportError, NewContest, NewProblem, RecordStore, ReferenceError, REASON_DESCRIPTOR,
};
use contest_parser::{
    descriptor_to_yaml, format_abstime, format_reltime, parse_descriptor_file,
    parse_descriptor_yaml, parse_reltime, ContestDescriptor, LanguageEntry, PenaltyTime,
    ProblemEntry, StartTime,
};
use regex::Regex;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info};
use validator::{Validate, ValidationError, ValidationErrors};

static NON_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9_-]").expect("identifier pattern is valid"));

/// Configuration record holding the penalty time in minutes.
pub const CONFIG_PENALTY_TIME: &str = "penalty_time";

/// Configuration record holding the canned clarification answers.
pub const CONFIG_CLAR_ANSWERS: &str = "clar_answers";

/// Configuration record mapping clarification category keys to names.
pub const CONFIG_CLAR_CATEGORIES: &str = "clar_categories";

const CLAR_CATEGORY_KEY_LENGTH: usize = 9;

/// Replaces every character outside `[A-Za-z0-9_-]` with `_`.
///
/// ```rust
/// use contest_importer::sanitize_short_name;
///
/// assert_eq!(sanitize_short_name("My Contest!"), "My_Contest_");
/// ```
pub fn sanitize_short_name(short_name: &str) -> String {
    NON_IDENTIFIER.replace_all(short_name, "_").into_owned()
}

/// Derives the configuration key of a clarification category.
///
/// The name is lowercased, spaces, commas and periods become hyphens and
/// the result is cut to nine characters.
///
/// ```rust
/// use contest_importer::clar_category_key;
///
/// assert_eq!(clar_category_key("Too Easy, Really"), "too-easy-");
/// ```
pub fn clar_category_key(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if matches!(c, ' ' | ',' | '.') { '-' } else { c })
        .take(CLAR_CATEGORY_KEY_LENGTH)
        .collect()
}

#[derive(Debug, Validate)]
struct ContestFields {
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters long"))]
    name: String,

    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters long"))]
    short_name: String,
}

fn timeline_error(message: &'static str) -> ValidationError {
    ValidationError::new("timeline").with_message(message.into())
}

/// Checks a contest before it is stored.
///
/// Violations are collected and reported together, one `field: message`
/// line each, sorted by field.
pub fn validate_contest(contest: &NewContest) -> contest_core::Result<()> {
    let fields = ContestFields {
        name: contest.name.clone(),
        short_name: contest.short_name.clone(),
    };
    let mut errors = fields.validate().err().unwrap_or_else(ValidationErrors::new);

    if contest.activate_time > contest.start_time {
        errors.add(
            "activate_time",
            timeline_error("must not be after the start time"),
        );
    }
    if contest.end_time <= contest.start_time {
        errors.add("end_time", timeline_error("must be after the start time"));
    }
    if let Some(freeze_time) = contest.freeze_time {
        if freeze_time < contest.start_time || freeze_time > contest.end_time {
            errors.add(
                "freeze_time",
                timeline_error("must be between the start and the end time"),
            );
        }
    }

    let violations = violations(&errors);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ImportError::validation(violations))
    }
}

/// Builds the contest a descriptor describes, without storing it.
///
/// The start time is moved to the local timezone. A freeze duration takes
/// precedence over a freeze start when both are given.
pub fn build_contest(
    descriptor: &ContestDescriptor,
    config: &ImportConfig,
) -> contest_core::Result<NewContest> {
    let start_time = descriptor
        .start_time
        .resolve()?
        .with_timezone(&Local)
        .fixed_offset();
    let duration = parse_reltime(&descriptor.duration)?;

    let builder = ContestBuilder::new(
        descriptor.name.clone(),
        sanitize_short_name(&descriptor.short_name),
        start_time,
    )
    .activation_lead(config.activation_lead()?)
    .duration(duration);

    let builder = match (
        &descriptor.scoreboard_freeze_duration,
        &descriptor.scoreboard_freeze,
    ) {
        (Some(length), _) => builder.freeze_before_end(parse_reltime(length)?),
        (None, Some(offset)) => builder.freeze_after_start(parse_reltime(offset)?),
        (None, None) => builder,
    };

    builder.build()
}

fn penalty_from_value(value: Value) -> Option<PenaltyTime> {
    match value {
        Value::Number(number) => number.as_i64().map(PenaltyTime::Minutes),
        Value::String(text) => Some(PenaltyTime::Text(text)),
        _ => None,
    }
}

fn strings_from_value(value: Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(text) => Some(text),
                    _ => None,
                })
                .collect(),
        ),
        Value::Object(map) => {
            strings_from_value(Value::Array(map.into_iter().map(|(_, v)| v).collect()))
        }
        _ => None,
    }
}

impl<S, A, E> Importer<S, A, E>
where
    S: RecordStore,
    A: AuditLog,
    E: EventLog,
{
    /// Imports a contest descriptor.
    ///
    /// Nothing is written when validation fails. Otherwise the contest is
    /// stored first, then the penalty time, clarification answers and
    /// clarification categories when present, then one problem per entry.
    pub fn import_contest(&mut self, descriptor: &ContestDescriptor) -> contest_core::Result<Contest> {
        let contest = build_contest(descriptor, &self.config)?;
        validate_contest(&contest)?;

        let contest = self.store.insert_contest(contest)?;
        info!(id = contest.id, short_name = %contest.short_name, "Imported contest");
        self.audit.record(AuditEntry::new(
            EntityKind::Contest,
            contest.id,
            AuditAction::Added,
            REASON_DESCRIPTOR,
        ));

        if let Some(penalty) = &descriptor.penalty_time {
            self.store
                .set_config(CONFIG_PENALTY_TIME, Value::from(penalty.minutes()))?;
        }

        if let Some(answers) = &descriptor.default_clars {
            self.store
                .set_config(CONFIG_CLAR_ANSWERS, Value::from(answers.clone()))?;
        }

        if let Some(categories) = &descriptor.clar_categories {
            let mut map = Map::new();
            for category in categories {
                map.insert(clar_category_key(category), Value::from(category.clone()));
            }
            self.store
                .set_config(CONFIG_CLAR_CATEGORIES, Value::Object(map))?;
        }

        for entry in &descriptor.problems {
            self.import_problem(&contest, entry)?;
        }
        info!(
            id = contest.id,
            problems = descriptor.problems.len(),
            "Contest import finished"
        );

        Ok(contest)
    }

    fn import_problem(&mut self, contest: &Contest, entry: &ProblemEntry) -> contest_core::Result<()> {
        let problem = self.store.insert_problem(NewProblem {
            name: entry.name.clone(),
            time_limit: self.config.problem_time_limit,
        })?;
        self.store.insert_contest_problem(ContestProblem {
            contest_id: contest.id,
            problem_id: problem.id,
            short_name: entry.label.clone(),
            color: entry.rgb.clone().or_else(|| entry.color.clone()),
        })?;
        debug!(id = problem.id, label = %entry.label, "Imported problem");

        self.audit.record(AuditEntry::new(
            EntityKind::Problem,
            problem.id,
            AuditAction::Added,
            REASON_DESCRIPTOR,
        ));
        Ok(())
    }

    /// Imports a contest descriptor given as YAML text.
    pub fn import_contest_yaml(&mut self, content: &str) -> contest_core::Result<Contest> {
        let descriptor = parse_descriptor_yaml(content)?;
        self.import_contest(&descriptor)
    }

    /// Imports a contest descriptor file, YAML or TOML by extension.
    pub fn import_contest_file(&mut self, path: &Path) -> contest_core::Result<Contest> {
        let descriptor = parse_descriptor_file(path)?;
        self.import_contest(&descriptor)
    }

    /// Builds the descriptor of a stored contest.
    ///
    /// The freeze duration is only present when the contest freezes.
    /// Problem colors are given both as a name (or the stored value when
    /// no name matches) and as a hex value.
    pub fn export_contest(&self, contest_id: i64) -> contest_core::Result<ContestDescriptor> {
        let contest = self
            .store
            .find_contest(contest_id)?
            .ok_or(ReferenceError::UnknownContest(contest_id))?;

        let scoreboard_freeze_duration = contest
            .freeze_time
            .map(|freeze_time| format_reltime(contest.end_time - freeze_time, true));

        let languages = self
            .store
            .languages()?
            .into_iter()
            .map(|language| LanguageEntry {
                name: language.name,
            })
            .collect();

        let mut problems = Vec::new();
        for contest_problem in self.store.contest_problems(contest_id)? {
            let problem = self
                .store
                .find_problem(contest_problem.problem_id)?
                .ok_or(ReferenceError::UnknownProblem(contest_problem.problem_id))?;

            let color = contest_problem.color.as_deref();
            problems.push(ProblemEntry {
                label: contest_problem.short_name,
                name: problem.name,
                color: color.map(|c| convert_to_color(c).unwrap_or_else(|| c.to_string())),
                rgb: color.and_then(convert_to_hex),
            });
        }

        Ok(ContestDescriptor {
            name: contest.name,
            short_name: contest.short_name,
            start_time: StartTime::Text(format_abstime(&contest.start_time)),
            duration: format_reltime(contest.end_time - contest.start_time, false),
            scoreboard_freeze_duration,
            scoreboard_freeze: None,
            penalty_time: self
                .store
                .config(CONFIG_PENALTY_TIME)?
                .and_then(penalty_from_value),
            default_clars: self
                .store
                .config(CONFIG_CLAR_ANSWERS)?
                .and_then(strings_from_value),
            clar_categories: self
                .store
                .config(CONFIG_CLAR_CATEGORIES)?
                .and_then(strings_from_value),
            languages,
            problems,
        })
    }

    /// Builds the descriptor of a stored contest as YAML text.
    pub fn export_contest_yaml(&self, contest_id: i64) -> contest_core::Result<String> {
        let descriptor = self.export_contest(contest_id)?;
        Ok(descriptor_to_yaml(&descriptor)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration};
    use contest_core::MemoryStore;
    use pretty_assertions::assert_eq;

    const DESCRIPTOR: &str = r##"
name: World Finals
short-name: My Contest!
start-time: "2024-04-20T10:00:00+02:00"
duration: "5:00:00"
scoreboard-freeze-duration: "1:00:00"
penalty-time: 20
default-clars:
  - No comment
  - Read the problem statement
clar-categories:
  - General
  - Too Easy, Really
problems:
  - label: A
    name: Apples
    rgb: "#ff0000"
  - letter: B
    short-name: Bananas
    color: yellow
"##;

    fn importer() -> Importer<MemoryStore> {
        Importer::new(
            MemoryStore::new().with_language("cpp", "C++").with_language("py3", "Python 3"),
            Vec::new(),
            Vec::new(),
        )
    }

    fn start() -> DateTime<chrono::FixedOffset> {
        DateTime::parse_from_rfc3339("2024-04-20T10:00:00+02:00").unwrap()
    }

    #[test]
    fn test_sanitize_short_name() {
        assert_eq!(sanitize_short_name("wf-2024_final"), "wf-2024_final");
        assert_eq!(sanitize_short_name("ünï côde"), "_n__c_de");
    }

    #[test]
    fn test_clar_category_keys() {
        assert_eq!(clar_category_key("General"), "general");
        assert_eq!(clar_category_key("Technical issue"), "technical");
        assert_eq!(clar_category_key("A.B,C D"), "a-b-c-d");
    }

    #[test]
    fn test_import_builds_timeline() {
        let mut importer = importer();
        let contest = importer.import_contest_yaml(DESCRIPTOR).unwrap();

        assert_eq!(contest.short_name, "My_Contest_");
        assert_eq!(contest.external_id, "My_Contest_");
        assert_eq!(contest.start_time, start());
        assert_eq!(contest.activate_time, start() - Duration::hours(1));
        assert_eq!(contest.end_time, start() + Duration::hours(5));
        assert_eq!(contest.freeze_time, Some(start() + Duration::hours(4)));
        assert_eq!(
            contest.start_time.offset(),
            start().with_timezone(&Local).fixed_offset().offset()
        );
    }

    #[test]
    fn test_import_writes_configuration_and_problems() {
        let mut importer = importer();
        let contest = importer.import_contest_yaml(DESCRIPTOR).unwrap();
        let store = importer.store();

        assert_eq!(store.config(CONFIG_PENALTY_TIME).unwrap(), Some(Value::from(20)));
        assert_eq!(
            store.config(CONFIG_CLAR_CATEGORIES).unwrap(),
            Some(serde_json::json!({"general": "General", "too-easy-": "Too Easy, Really"}))
        );

        let problems = store.contest_problems(contest.id).unwrap();
        assert_eq!(problems.len(), 2);
        assert_eq!(problems[0].short_name, "A");
        assert_eq!(problems[0].color, Some("#ff0000".to_string()));
        assert_eq!(problems[1].color, Some("yellow".to_string()));

        let bananas = store.find_problem(problems[1].problem_id).unwrap().unwrap();
        assert_eq!(bananas.name, "Bananas");
        assert_eq!(bananas.time_limit, 10);
    }

    #[test]
    fn test_freeze_duration_wins_over_freeze_start() {
        let yaml = r##"
name: Both
short-name: both
start-time: "2024-04-20T10:00:00+02:00"
duration: "5:00:00"
scoreboard-freeze-duration: "1:00:00"
scoreboard-freeze: "2:00:00"
"##;
        let contest = importer().import_contest_yaml(yaml).unwrap();
        assert_eq!(contest.freeze_time, Some(start() + Duration::hours(4)));
    }

    #[test]
    fn test_freeze_start_alone() {
        let yaml = r##"
name: Start
short-name: start
start-time: "2024-04-20T10:00:00+02:00"
duration: "5:00:00"
freeze: "3:30:00"
"##;
        let contest = importer().import_contest_yaml(yaml).unwrap();
        assert_eq!(
            contest.freeze_time,
            Some(start() + Duration::hours(3) + Duration::minutes(30))
        );
    }

    #[test]
    fn test_validation_failure_writes_nothing() {
        let yaml = r##"
name: ""
short-name: ""
start-time: "2024-04-20T10:00:00+02:00"
duration: "-1:00:00"
scoreboard-freeze-duration: "1:00:00"
"##;
        let mut importer = importer();
        let err = importer.import_contest_yaml(yaml).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Contest has errors:\n\n\
             end_time: must be after the start time\n\
             freeze_time: must be between the start and the end time\n\
             name: must be between 1 and 255 characters long\n\
             short_name: must be between 1 and 255 characters long"
        );
        assert!(importer.store().contests().is_empty());
        assert!(importer.audit().is_empty());
    }

    #[test]
    fn test_out_of_range_duration_is_rejected() {
        let yaml = r##"
name: Forever
short-name: forever
start-time: "2024-04-20T10:00:00+02:00"
duration: "3000000000:00:00"
scoreboard-freeze-duration: "1:00:00"
"##;
        let mut importer = importer();
        let err = importer.import_contest_yaml(yaml).unwrap_err();

        assert!(matches!(err, ImportError::Validation(_)));
        assert!(err.to_string().contains("end_time: is out of the supported time range"));
        assert!(importer.store().contests().is_empty());
    }

    #[test]
    fn test_unparseable_freeze_is_rejected() {
        let yaml = r##"
name: Frozen
short-name: frozen
start-time: "2024-04-20T10:00:00+02:00"
duration: "5:00:00"
scoreboard-freeze: "99999999999999:00"
"##;
        let mut importer = importer();
        let err = importer.import_contest_yaml(yaml).unwrap_err();

        assert!(matches!(err, ImportError::Document(_)));
        assert!(importer.store().contests().is_empty());
    }

    #[test]
    fn test_empty_descriptor() {
        let err = importer().import_contest_yaml("").unwrap_err();
        assert_eq!(err.to_string(), "Error parsing YAML file.");
    }

    #[test]
    fn test_export_round_trips_timeline() {
        let mut importer = importer();
        let contest = importer.import_contest_yaml(DESCRIPTOR).unwrap();
        let exported = importer.export_contest(contest.id).unwrap();

        assert_eq!(exported.name, "World Finals");
        assert_eq!(exported.duration, "5:00:00.000");
        assert_eq!(exported.scoreboard_freeze_duration, Some("1:00:00".to_string()));
        assert_eq!(exported.start_time.resolve().unwrap(), start());
        assert_eq!(exported.penalty_time, Some(PenaltyTime::Minutes(20)));
        assert_eq!(
            exported.clar_categories,
            Some(vec!["General".to_string(), "Too Easy, Really".to_string()])
        );
        assert_eq!(
            exported.languages,
            vec![
                LanguageEntry { name: "C++".to_string() },
                LanguageEntry { name: "Python 3".to_string() },
            ]
        );
    }

    #[test]
    fn test_export_problem_colors() {
        let mut importer = importer();
        let contest = importer.import_contest_yaml(DESCRIPTOR).unwrap();
        let exported = importer.export_contest(contest.id).unwrap();

        assert_eq!(
            exported.problems,
            vec![
                ProblemEntry {
                    label: "A".to_string(),
                    name: "Apples".to_string(),
                    color: Some("red".to_string()),
                    rgb: Some("#ff0000".to_string()),
                },
                ProblemEntry {
                    label: "B".to_string(),
                    name: "Bananas".to_string(),
                    color: Some("yellow".to_string()),
                    rgb: Some("#FFFF00".to_string()),
                },
            ]
        );
    }

    #[test]
    fn test_export_without_freeze_omits_key() {
        let mut importer = importer();
        let yaml = r##"
name: Open
short-name: open
start-time: "2024-04-20T10:00:00+02:00"
duration: "2:30:00"
"##;
        let contest = importer.import_contest_yaml(yaml).unwrap();
        let exported = importer.export_contest_yaml(contest.id).unwrap();

        assert!(!exported.contains("scoreboard-freeze-duration"));
        assert_eq!(parse_descriptor_yaml(&exported).unwrap().duration, "2:30:00.000");
    }

    #[test]
    fn test_export_unknown_contest() {
        let err = importer().export_contest(99).unwrap_err();
        assert!(matches!(
            err,
            ImportError::Reference(ReferenceError::UnknownContest(99))
        ));
    }
}
