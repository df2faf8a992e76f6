//! Import defaults.

use contest_core::ImportError;
use contest_parser::{parse_reltime, ParserError};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

/// Tunables applied while importing.
///
/// Every field has a default, so an empty document is a valid configuration.
///
/// # Example
///
/// ```rust
/// use contest_importer::ImportConfig;
///
/// let config = ImportConfig::from_toml_str("problem-time-limit = 5").unwrap();
/// assert_eq!(config.problem_time_limit, 5);
/// assert_eq!(config.jury_category_name, "Jury");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "kebab-case")]
pub struct ImportConfig {
    /// Time limit in seconds given to every imported problem
    #[validate(range(min = 1, message = "must be at least one second"))]
    pub problem_time_limit: u32,

    /// Name of the hidden category holding jury teams
    #[validate(length(min = 1, max = 255, message = "must be between 1 and 255 characters long"))]
    pub jury_category_name: String,

    /// Sort order of the jury category when it has to be created
    pub jury_sort_order: i32,

    /// How long before the start a contest becomes active, as a relative time
    pub activation_lead: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            problem_time_limit: 10,
            jury_category_name: "Jury".to_string(),
            jury_sort_order: 100,
            activation_lead: "1:00".to_string(),
        }
    }
}

impl ImportConfig {
    /// Reads a configuration from TOML.
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, ParserError> {
        toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))
    }

    /// Reads a configuration from YAML; an empty document yields the defaults.
    pub fn from_yaml_str(content: &str) -> std::result::Result<Self, ParserError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml_ng::from_str(content)?)
    }

    /// Activation lead time as a duration.
    pub fn activation_lead(&self) -> contest_core::Result<chrono::Duration> {
        Ok(parse_reltime(&self.activation_lead)?)
    }

    /// Checks every field, reporting all violations at once.
    pub fn validate(&self) -> contest_core::Result<()> {
        let mut errors = match Validate::validate(self) {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if parse_reltime(&self.activation_lead).is_err() {
            errors.add(
                "activation_lead",
                ValidationError::new("reltime").with_message("must look like H:MM[:SS]".into()),
            );
        }

        let violations = violations(&errors);
        if violations.is_empty() {
            return Ok(());
        }

        let lines: Vec<String> = violations
            .into_iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        Err(ImportError::Document(format!(
            "Invalid import configuration:\n\n{}",
            lines.join("\n")
        )))
    }
}

/// Flattens collected violations into `(field, message)` pairs sorted by field.
pub(crate) fn violations(errors: &ValidationErrors) -> Vec<(String, String)> {
    let mut violations: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            let field = field.to_string();
            field_errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                (field.clone(), message)
            })
        })
        .collect();
    violations.sort();
    violations
}
