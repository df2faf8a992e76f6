//! # Contest Results
//!
//! Turns a precomputed scoreboard snapshot into the positional rows of the
//! results and scoreboard exports.
//!
//! Results rows carry a medal or award label per team: the first four ranks
//! get gold, the next four silver, then bronze up to rank twelve plus the
//! contest's bronze extension. Remaining teams at or above the median
//! points are ranked, with equal points sharing one rank; the rest are
//! honorable mentions without a rank.
//!
//! ## Example
//!
//! ```rust
//! use contest_core::{Team, TeamCategory};
//! use contest_results::{Award, ExportOptions, MatrixItem, ResultsRanker, ScoreboardSnapshot, TeamScore};
//!
//! let mut snapshot = ScoreboardSnapshot::new();
//! snapshot.push(
//!     TeamScore {
//!         team: Team::new(1, "Null Pointers"),
//!         category: TeamCategory::new(14, "Participants"),
//!         affiliation: None,
//!         rank: 1,
//!         points: 1,
//!         total_time: 20,
//!     },
//!     vec![MatrixItem::solved(1, 1200.0)],
//! );
//!
//! let ranker = ResultsRanker::new(ExportOptions::new()).unwrap();
//! let rows = ranker.results(&snapshot, 0);
//!
//! assert_eq!(rows[0].award, Award::Gold);
//! assert_eq!(rows[0].group_winner.as_deref(), Some("Participants"));
//! ```

mod collate;
mod error;
mod options;
mod ranking;
mod scoreboard;
mod snapshot;

pub use collate::NameCollator;
pub use error::{Result, ResultsError};
pub use options::{scoretime, ExportOptions, CONFIG_SCORE_IN_SECONDS};
pub use ranking::{Award, ResultRow, ResultsRanker};
pub use scoreboard::scoreboard_rows;
pub use snapshot::{MatrixItem, ScoreboardSnapshot, TeamScore};
