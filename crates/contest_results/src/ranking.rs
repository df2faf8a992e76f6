//! Award assignment and ordering for results exports.

use crate::collate::NameCollator;
use crate::error::Result;
use crate::options::ExportOptions;
use crate::snapshot::{MatrixItem, ScoreboardSnapshot};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{debug, info};

const GOLD_RANKS: u32 = 4;
const SILVER_RANKS: u32 = 8;
const BRONZE_RANKS: u32 = 12;

/// Award label of a result row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Award {
    Gold,
    Silver,
    Bronze,
    /// At or above the median points
    Ranked,
    /// Below the median points; carries no rank
    Honorable,
}

impl fmt::Display for Award {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Award::Gold => "Gold Medal",
            Award::Silver => "Silver Medal",
            Award::Bronze => "Bronze Medal",
            Award::Ranked => "Ranked",
            Award::Honorable => "Honorable",
        };
        f.write_str(label)
    }
}

/// One line of a results export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    /// External or internal team id, depending on [`ExportOptions`]
    pub identifier: String,

    /// `None` for honorable mentions
    pub rank: Option<u32>,

    pub award: Award,
    pub points: u32,
    pub total_time: i64,

    /// Latest score time in the team's matrix row, -1 without problems
    pub last_time: i64,

    /// Category name for the first team of each category
    pub group_winner: Option<String>,

    /// Display name, used to order rows with equal rank
    pub team_name: String,
}

impl ResultRow {
    /// Fields in export order:
    /// `[identifier, rank, award, points, total_time, last_time, group_winner]`.
    pub fn to_record(&self) -> Vec<String> {
        vec![
            self.identifier.clone(),
            self.rank.map(|rank| rank.to_string()).unwrap_or_default(),
            self.award.to_string(),
            self.points.to_string(),
            self.total_time.to_string(),
            self.last_time.to_string(),
            self.group_winner.clone().unwrap_or_default(),
        ]
    }
}

/// Largest score time over a matrix row, starting from -1.
pub(crate) fn last_score_time(row: &[MatrixItem], options: &ExportOptions) -> i64 {
    row.iter()
        .map(|item| options.scoretime(item.time))
        .fold(-1, i64::max)
}

/// Computes results exports from scoreboard snapshots.
#[derive(Debug)]
pub struct ResultsRanker {
    options: ExportOptions,
    collator: NameCollator,
}

impl ResultsRanker {
    pub fn new(options: ExportOptions) -> Result<Self> {
        Ok(Self {
            options,
            collator: NameCollator::english()?,
        })
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Result rows for the teams whose category has `sort_order`, ordered
    /// by rank with honorable mentions last and equal ranks by team name.
    pub fn results(&self, snapshot: &ScoreboardSnapshot, sort_order: i32) -> Vec<ResultRow> {
        let median = snapshot.median_points();
        let bronze_limit = BRONZE_RANKS + snapshot.bronze_extension;
        debug!(median, bronze_limit, sort_order, "Computing results");

        let mut collapsed_ranks: HashMap<u32, u32> = HashMap::new();
        let mut seen_categories: HashSet<i64> = HashSet::new();
        let mut rows = Vec::new();

        for score in &snapshot.scores {
            if score.category.sort_order != sort_order {
                continue;
            }

            let (award, rank) = if score.rank <= GOLD_RANKS {
                (Award::Gold, Some(score.rank))
            } else if score.rank <= SILVER_RANKS {
                (Award::Silver, Some(score.rank))
            } else if score.rank <= bronze_limit {
                (Award::Bronze, Some(score.rank))
            } else if score.points >= median {
                let rank = *collapsed_ranks.entry(score.points).or_insert(score.rank);
                (Award::Ranked, Some(rank))
            } else {
                (Award::Honorable, None)
            };

            let group_winner = seen_categories
                .insert(score.category.id)
                .then(|| score.category.name.clone());

            let team = &score.team;
            let identifier = match (&team.external_id, self.options.use_external_ids) {
                (Some(external_id), true) => external_id.clone(),
                _ => team.id.to_string(),
            };

            rows.push(ResultRow {
                identifier,
                rank,
                award,
                points: score.points,
                total_time: score.total_time,
                last_time: last_score_time(snapshot.row(team.id), &self.options),
                group_winner,
                team_name: team.name.clone(),
            });
        }

        rows.sort_by(|a, b| self.compare_rows(a, b));
        info!(rows = rows.len(), sort_order, "Computed results");
        rows
    }

    /// Results as export records, see [`ResultRow::to_record`].
    pub fn results_rows(&self, snapshot: &ScoreboardSnapshot, sort_order: i32) -> Vec<Vec<String>> {
        self.results(snapshot, sort_order)
            .iter()
            .map(ResultRow::to_record)
            .collect()
    }

    fn compare_rows(&self, a: &ResultRow, b: &ResultRow) -> Ordering {
        let by_rank = match (a.rank, b.rank) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };

        by_rank
            .then_with(|| self.collator.compare(&a.team_name, &b.team_name))
            .then_with(|| a.identifier.cmp(&b.identifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::TeamScore;
    use contest_core::{Team, TeamCategory};
    use pretty_assertions::assert_eq;

    fn participants() -> TeamCategory {
        TeamCategory::new(14, "Participants")
    }

    fn score(id: i64, name: &str, rank: u32, points: u32) -> TeamScore {
        TeamScore {
            team: Team::new(id, name),
            category: participants(),
            affiliation: None,
            rank,
            points,
            total_time: 100 * id,
        }
    }

    fn ranker() -> ResultsRanker {
        ResultsRanker::new(ExportOptions::new()).unwrap()
    }

    /// 16 teams ranked 1 to 16; the median team and ranks 13 and 14 share
    /// the same points.
    fn sixteen_teams() -> ScoreboardSnapshot {
        let points = [10, 9, 8, 7, 6, 5, 4, 3, 3, 3, 3, 3, 3, 3, 1, 0];
        let mut snapshot = ScoreboardSnapshot::new();
        for (index, points) in points.into_iter().enumerate() {
            let id = index as i64 + 1;
            snapshot.push(
                score(id, &format!("Team {id:02}"), id as u32, points),
                vec![MatrixItem::solved(1, 60.0 * id as f64)],
            );
        }
        snapshot
    }

    #[test]
    fn test_award_tiers() {
        let rows = ranker().results(&sixteen_teams(), 0);
        let awards: Vec<(Option<u32>, Award)> =
            rows.iter().map(|row| (row.rank, row.award)).collect();

        let mut expected = Vec::new();
        expected.extend((1..=4).map(|rank| (Some(rank), Award::Gold)));
        expected.extend((5..=8).map(|rank| (Some(rank), Award::Silver)));
        expected.extend((9..=12).map(|rank| (Some(rank), Award::Bronze)));
        expected.push((Some(13), Award::Ranked));
        expected.push((Some(13), Award::Ranked));
        expected.push((None, Award::Honorable));
        expected.push((None, Award::Honorable));

        assert_eq!(awards, expected);
    }

    #[test]
    fn test_bronze_extension() {
        let mut snapshot = sixteen_teams();
        snapshot.bronze_extension = 2;

        let rows = ranker().results(&snapshot, 0);
        assert_eq!(rows[12].award, Award::Bronze);
        assert_eq!(rows[13].award, Award::Bronze);
        assert_eq!(rows[13].rank, Some(14));
        assert_eq!(rows[14].award, Award::Honorable);
    }

    #[test]
    fn test_group_winner_first_per_category() {
        let mut snapshot = ScoreboardSnapshot::new();
        let observers = TeamCategory::new(15, "Observers");

        snapshot.push(score(1, "Alpha", 1, 3), vec![]);
        let mut observer = score(2, "Beta", 2, 2);
        observer.category = observers;
        snapshot.push(observer, vec![]);
        snapshot.push(score(3, "Gamma", 3, 1), vec![]);

        let rows = ranker().results(&snapshot, 0);
        let winners: Vec<Option<&str>> = rows
            .iter()
            .map(|row| row.group_winner.as_deref())
            .collect();

        assert_eq!(winners, vec![Some("Participants"), Some("Observers"), None]);
    }

    #[test]
    fn test_sort_order_filter() {
        let mut snapshot = ScoreboardSnapshot::new();
        snapshot.push(score(1, "Alpha", 1, 3), vec![]);
        let mut jury = score(2, "Jury", 2, 2);
        jury.category.sort_order = 100;
        snapshot.push(jury, vec![]);

        let rows = ranker().results(&snapshot, 100);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].team_name, "Jury");
    }

    #[test]
    fn test_equal_ranks_sorted_by_collated_name() {
        let mut snapshot = ScoreboardSnapshot::new();
        for (id, name) in [(1, "beta"), (2, "Álvarez"), (3, "Alvarez"), (4, "Zulu")] {
            snapshot.push(score(id, name, 1, 5), vec![]);
        }

        let rows = ranker().results(&snapshot, 0);
        let names: Vec<&str> = rows.iter().map(|row| row.team_name.as_str()).collect();

        assert_eq!(names, vec!["Alvarez", "Álvarez", "beta", "Zulu"]);
    }

    #[test]
    fn test_identifier_prefers_external_id() {
        let mut snapshot = ScoreboardSnapshot::new();
        let mut with_external = score(1, "Alpha", 1, 3);
        with_external.team.external_id = Some("1001".to_string());
        snapshot.push(with_external, vec![]);
        snapshot.push(score(2, "Beta", 2, 2), vec![]);

        let external = ResultsRanker::new(ExportOptions::new().with_external_ids(true)).unwrap();
        let rows = external.results(&snapshot, 0);
        assert_eq!(rows[0].identifier, "1001");
        assert_eq!(rows[1].identifier, "2");

        let rows = ranker().results(&snapshot, 0);
        assert_eq!(rows[0].identifier, "1");
    }

    #[test]
    fn test_record_layout() {
        let mut snapshot = ScoreboardSnapshot::new();
        snapshot.push(
            score(1, "Alpha", 1, 2),
            vec![MatrixItem::solved(2, 600.0), MatrixItem::solved(1, 1890.5)],
        );
        snapshot.push(score(2, "Beta", 2, 0), vec![MatrixItem::unsolved(3)]);
        snapshot.push(score(3, "Gamma", 3, 0), vec![]);

        let records = ranker().results_rows(&snapshot, 0);
        assert_eq!(
            records,
            vec![
                vec!["1", "1", "Gold Medal", "2", "100", "31", "Participants"],
                vec!["2", "2", "Gold Medal", "0", "200", "0", ""],
                vec!["3", "3", "Gold Medal", "0", "300", "-1", ""],
            ]
        );
    }

    #[test]
    fn test_last_time_in_seconds() {
        let options = ExportOptions::new().with_score_in_seconds(true);
        let row = [MatrixItem::solved(1, 75.9), MatrixItem::unsolved(2)];
        assert_eq!(last_score_time(&row, &options), 75);
        assert_eq!(last_score_time(&[], &options), -1);
    }
}
