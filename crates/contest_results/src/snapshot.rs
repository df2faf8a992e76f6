//! Scoreboard snapshots.
//!
//! A snapshot is computed elsewhere and handed in ready-made: teams in
//! score order with their rank, points and total time, plus a per-problem
//! matrix for every team.

use contest_core::{Contest, Team, TeamAffiliation, TeamCategory};
use std::collections::HashMap;

/// One cell of the scoreboard matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixItem {
    /// Whether the problem is solved
    pub correct: bool,

    /// Number of submissions counted for the problem
    pub submissions: u32,

    /// Contest time of the deciding submission, in seconds
    pub time: f64,
}

impl MatrixItem {
    /// A solved cell.
    pub fn solved(submissions: u32, time: f64) -> Self {
        Self {
            correct: true,
            submissions,
            time,
        }
    }

    /// An unsolved cell.
    pub fn unsolved(submissions: u32) -> Self {
        Self {
            correct: false,
            submissions,
            time: 0.0,
        }
    }
}

/// A team's line on the scoreboard.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamScore {
    pub team: Team,
    pub category: TeamCategory,
    pub affiliation: Option<TeamAffiliation>,

    /// Position on the scoreboard, starting at 1
    pub rank: u32,

    /// Number of solved problems
    pub points: u32,

    /// Total time including penalties, in score units
    pub total_time: i64,
}

/// A scoreboard, teams in score order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreboardSnapshot {
    /// Scores in scoreboard order
    pub scores: Vec<TeamScore>,

    /// Problem cells per team identifier, in problem order
    pub matrix: HashMap<i64, Vec<MatrixItem>>,

    /// Extra bronze medals beyond the twelfth place
    pub bronze_extension: u32,
}

impl ScoreboardSnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty snapshot carrying the contest's medal settings.
    pub fn for_contest(contest: &Contest) -> Self {
        Self {
            bronze_extension: contest.bronze_extension,
            ..Self::default()
        }
    }

    /// Appends a team's score and its matrix row.
    pub fn push(&mut self, score: TeamScore, row: Vec<MatrixItem>) {
        self.matrix.insert(score.team.id, row);
        self.scores.push(score);
    }

    /// Matrix row of a team; empty when the team has none.
    pub fn row(&self, team_id: i64) -> &[MatrixItem] {
        self.matrix.get(&team_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Points of the team at position `ceil(n / 2)`, or 0 without teams.
    pub fn median_points(&self) -> u32 {
        let count = self.scores.len();
        if count == 0 {
            return 0;
        }
        self.scores[count.div_ceil(2) - 1].points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn score(id: i64, points: u32) -> TeamScore {
        TeamScore {
            team: Team::new(id, format!("Team {id}")),
            category: TeamCategory::new(1, "Participants"),
            affiliation: None,
            rank: id as u32,
            points,
            total_time: 0,
        }
    }

    #[test]
    fn test_median_positions() {
        let mut snapshot = ScoreboardSnapshot::new();
        assert_eq!(snapshot.median_points(), 0);

        snapshot.push(score(1, 9), vec![]);
        assert_eq!(snapshot.median_points(), 9);

        snapshot.push(score(2, 7), vec![]);
        assert_eq!(snapshot.median_points(), 9);

        snapshot.push(score(3, 5), vec![]);
        assert_eq!(snapshot.median_points(), 7);

        snapshot.push(score(4, 3), vec![]);
        assert_eq!(snapshot.median_points(), 7);
    }

    #[test]
    fn test_missing_row_is_empty() {
        let snapshot = ScoreboardSnapshot::new();
        assert!(snapshot.row(42).is_empty());
    }
}
