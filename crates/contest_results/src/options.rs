//! Export settings shared by the results and scoreboard exports.

use crate::error::Result;
use contest_core::RecordStore;

/// Configuration record holding the score time unit.
pub const CONFIG_SCORE_IN_SECONDS: &str = "score_in_seconds";

/// How result and scoreboard rows are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Identify teams by external id instead of internal id
    pub use_external_ids: bool,

    /// Report times in seconds instead of whole minutes
    pub score_in_seconds: bool,
}

impl ExportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_external_ids(mut self, enabled: bool) -> Self {
        self.use_external_ids = enabled;
        self
    }

    pub fn with_score_in_seconds(mut self, enabled: bool) -> Self {
        self.score_in_seconds = enabled;
        self
    }

    /// Reads the score time unit from the store's configuration.
    ///
    /// A missing or non-boolean record means minutes.
    pub fn from_store<S: RecordStore>(store: &S) -> Result<Self> {
        let score_in_seconds = store
            .config(CONFIG_SCORE_IN_SECONDS)?
            .and_then(|value| value.as_bool())
            .unwrap_or(false);

        Ok(Self::new().with_score_in_seconds(score_in_seconds))
    }

    /// Converts a contest time in seconds to a score time.
    pub fn scoretime(&self, seconds: f64) -> i64 {
        scoretime(seconds, self.score_in_seconds)
    }
}

/// Converts a contest time in seconds to whole seconds or whole minutes,
/// rounding down.
pub fn scoretime(seconds: f64, in_seconds: bool) -> i64 {
    if in_seconds {
        seconds.floor() as i64
    } else {
        (seconds / 60.0).floor() as i64
    }
}
