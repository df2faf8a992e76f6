//! Scoreboard export rows.

use crate::options::ExportOptions;
use crate::ranking::last_score_time;
use crate::snapshot::ScoreboardSnapshot;
use tracing::debug;

/// One row per team in scoreboard order:
/// `[affiliation_name, external_id, rank, points, total_time, last_time]`
/// followed by `submissions, solve_time` for every problem, where an
/// unsolved problem has solve time -1.
pub fn scoreboard_rows(snapshot: &ScoreboardSnapshot, options: &ExportOptions) -> Vec<Vec<String>> {
    let rows: Vec<Vec<String>> = snapshot
        .scores
        .iter()
        .map(|score| {
            let matrix = snapshot.row(score.team.id);

            let mut row = vec![
                score
                    .affiliation
                    .as_ref()
                    .map(|affiliation| affiliation.name.clone())
                    .unwrap_or_default(),
                score.team.external_id.clone().unwrap_or_default(),
                score.rank.to_string(),
                score.points.to_string(),
                score.total_time.to_string(),
                last_score_time(matrix, options).to_string(),
            ];

            for item in matrix {
                let time = if item.correct {
                    options.scoretime(item.time)
                } else {
                    -1
                };
                row.push(item.submissions.to_string());
                row.push(time.to_string());
            }

            row
        })
        .collect();

    debug!(rows = rows.len(), "Built scoreboard export");
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{MatrixItem, TeamScore};
    use contest_core::{TeamAffiliation, TeamBuilder, TeamCategory};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scoreboard_rows() {
        let mut snapshot = ScoreboardSnapshot::new();
        snapshot.push(
            TeamScore {
                team: TeamBuilder::new(1, "Alpha").external_id("1001").build(),
                category: TeamCategory::new(14, "Participants"),
                affiliation: Some(TeamAffiliation {
                    id: 1,
                    short_name: "UvA".to_string(),
                    name: "University of Amsterdam".to_string(),
                    country: "NLD".to_string(),
                    external_id: None,
                }),
                rank: 1,
                points: 1,
                total_time: 34,
            },
            vec![MatrixItem::solved(2, 840.0), MatrixItem::unsolved(1)],
        );

        let minutes = scoreboard_rows(&snapshot, &ExportOptions::new());
        assert_eq!(
            minutes,
            vec![vec![
                "University of Amsterdam",
                "1001",
                "1",
                "1",
                "34",
                "14",
                "2",
                "14",
                "1",
                "-1"
            ]]
        );

        let seconds = scoreboard_rows(&snapshot, &ExportOptions::new().with_score_in_seconds(true));
        assert_eq!(seconds[0][5], "840");
        assert_eq!(seconds[0][7], "840");
    }

    #[test]
    fn test_team_without_affiliation_or_matrix() {
        let mut snapshot = ScoreboardSnapshot::new();
        snapshot.push(
            TeamScore {
                team: TeamBuilder::new(2, "Beta").build(),
                category: TeamCategory::new(14, "Participants"),
                affiliation: None,
                rank: 1,
                points: 0,
                total_time: 0,
            },
            vec![],
        );

        let rows = scoreboard_rows(&snapshot, &ExportOptions::new());
        assert_eq!(rows, vec![vec!["", "", "1", "0", "0", "-1"]]);
    }
}
