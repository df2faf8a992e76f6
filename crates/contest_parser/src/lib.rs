//! Parsers for contest data documents.
//!
//! Two families of documents are handled here:
//!
//! - tab-separated record files (groups, teams, accounts), checked against
//!   their header line and split into typed records
//! - contest descriptors in YAML or TOML, deserialized into a
//!   [`ContestDescriptor`]
//!
//! # Example
//!
//! ```rust
//! use contest_parser::parse_descriptor_yaml;
//!
//! let yaml = r##"
//! name: World Finals
//! short-name: wf2024
//! start-time: "2024-04-20T10:00:00+02:00"
//! duration: "5:00:00"
//! scoreboard-freeze-length: "1:00:00"
//! penalty-time: 20
//! problems:
//!   - letter: A
//!     short-name: Apples
//!     rgb: "#ff0000"
//! "##;
//!
//! let descriptor = parse_descriptor_yaml(yaml).expect("Failed to parse descriptor");
//! assert_eq!(descriptor.short_name, "wf2024");
//! assert_eq!(descriptor.problems[0].label, "A");
//! ```

pub mod descriptor;
pub mod format;
pub mod reltime;
pub mod tsv;

pub use descriptor::*;
pub use format::*;
pub use reltime::*;
pub use tsv::*;

use contest_core::ImportError;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while reading descriptor documents.
#[derive(Debug, Error)]
pub enum ParserError {
    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,

    /// A relative or absolute time string is malformed
    #[error("Invalid time: {0}")]
    InvalidTime(String),

    /// The document holds no data at all
    #[error("Error parsing YAML file.")]
    EmptyDocument,
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

impl From<ParserError> for ImportError {
    fn from(err: ParserError) -> Self {
        ImportError::Document(err.to_string())
    }
}

/// Supported descriptor file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
}

/// Parse a contest descriptor from a YAML string.
pub fn parse_descriptor_yaml(content: &str) -> Result<ContestDescriptor> {
    if content.trim().is_empty() {
        return Err(ParserError::EmptyDocument);
    }
    let descriptor: ContestDescriptor = serde_yaml_ng::from_str(content)?;
    Ok(descriptor)
}

/// Parse a contest descriptor from a TOML string.
///
/// # Example
///
/// ```rust
/// use contest_parser::parse_descriptor_toml;
///
/// let toml = r##"
/// name = "Regional"
/// short-name = "nwerc"
/// start-time = 2024-11-24T11:00:00+01:00
/// duration = "5:00:00"
///
/// [[problems]]
/// label = "A"
/// name = "Arranging Adapters"
/// "##;
///
/// let descriptor = parse_descriptor_toml(toml).unwrap();
/// assert_eq!(descriptor.problems.len(), 1);
/// ```
pub fn parse_descriptor_toml(content: &str) -> Result<ContestDescriptor> {
    if content.trim().is_empty() {
        return Err(ParserError::EmptyDocument);
    }
    let descriptor: ContestDescriptor =
        toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))?;
    Ok(descriptor)
}

/// Detect the descriptor format from a file path based on its extension.
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<DocumentFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(DocumentFormat::Yaml),
        "toml" => Ok(DocumentFormat::Toml),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse a contest descriptor from a file, picking the format by extension.
///
/// ```no_run
/// use contest_parser::parse_descriptor_file;
/// use std::path::Path;
///
/// let descriptor = parse_descriptor_file(Path::new("contest.yaml")).unwrap();
/// println!("Loaded contest: {}", descriptor.name);
/// ```
pub fn parse_descriptor_file(path: &Path) -> Result<ContestDescriptor> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        DocumentFormat::Yaml => parse_descriptor_yaml(&content),
        DocumentFormat::Toml => parse_descriptor_toml(&content),
    }
}

/// Serialize a descriptor as YAML.
pub fn descriptor_to_yaml(descriptor: &ContestDescriptor) -> Result<String> {
    Ok(serde_yaml_ng::to_string(descriptor)?)
}
