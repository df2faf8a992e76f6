use chrono::DateTime;
use contest_core::{ContestBuilder, MemoryStore, RecordStore, TeamBuilder, TeamCategory};
use contest_results::{
    scoreboard_rows, ExportOptions, MatrixItem, ResultsRanker, ScoreboardSnapshot, TeamScore,
    CONFIG_SCORE_IN_SECONDS,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn snapshot() -> ScoreboardSnapshot {
    let start = DateTime::parse_from_rfc3339("2024-11-24T11:00:00+01:00").unwrap();
    let contest = MemoryStore::new()
        .insert_contest(
            ContestBuilder::new("NWERC 2024", "nwerc2024", start)
                .bronze_extension(1)
                .build()
                .unwrap(),
        )
        .unwrap();
    let mut snapshot = ScoreboardSnapshot::for_contest(&contest);

    let participants = TeamCategory::new(14, "Participants");
    let teams = [
        ("Zebra", 5, 300),
        ("alpha", 5, 300),
        ("Beta", 4, 250),
        ("Delta", 3, 200),
        ("Epsilon", 0, 0),
    ];

    for (index, (name, points, total_time)) in teams.into_iter().enumerate() {
        let id = index as i64 + 1;
        snapshot.push(
            TeamScore {
                team: TeamBuilder::new(id, name)
                    .external_id(format!("{}", 1000 + id))
                    .category(participants.id)
                    .build(),
                category: participants.clone(),
                affiliation: None,
                rank: if index < 2 { 1 } else { id as u32 },
                points,
                total_time,
            },
            vec![MatrixItem::solved(1, 125.0), MatrixItem::unsolved(4)],
        );
    }

    snapshot
}

#[test]
fn test_results_export() {
    let ranker = ResultsRanker::new(ExportOptions::new().with_external_ids(true)).unwrap();
    let rows = ranker.results_rows(&snapshot(), 0);

    assert_eq!(
        rows,
        vec![
            vec!["1002", "1", "Gold Medal", "5", "300", "2", ""],
            vec!["1001", "1", "Gold Medal", "5", "300", "2", "Participants"],
            vec!["1003", "3", "Gold Medal", "4", "250", "2", ""],
            vec!["1004", "4", "Gold Medal", "3", "200", "2", ""],
            vec!["1005", "5", "Silver Medal", "0", "0", "2", ""],
        ]
    );
}

#[test]
fn test_scoreboard_export_uses_store_settings() {
    let store = MemoryStore::new().with_config(CONFIG_SCORE_IN_SECONDS, json!(true));
    let options = ExportOptions::from_store(&store).unwrap();

    let rows = scoreboard_rows(&snapshot(), &options);

    assert_eq!(rows.len(), 5);
    assert_eq!(
        rows[0],
        vec!["", "1001", "1", "5", "300", "125", "1", "125", "4", "-1"]
    );
}
