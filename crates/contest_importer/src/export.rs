//! Group and team listings in the tabular column layout.

use contest_core::{RecordStore, Result};
use std::collections::{HashMap, HashSet};
use tracing::info;

/// Rows `[id, name]` for every visible category.
pub fn group_rows<S: RecordStore>(store: &S) -> Result<Vec<Vec<String>>> {
    let rows: Vec<Vec<String>> = store
        .categories()?
        .into_iter()
        .filter(|category| category.visible)
        .map(|category| vec![category.id.to_string(), category.name])
        .collect();

    info!(rows = rows.len(), "Exported groups");
    Ok(rows)
}

/// Rows for every team whose category is visible:
/// `[team_id, external_id, category_id, name, affiliation_name,
/// affiliation_shortname, affiliation_country, affiliation_external_id]`.
///
/// Missing values are written as empty strings.
pub fn team_rows<S: RecordStore>(store: &S) -> Result<Vec<Vec<String>>> {
    let visible: HashSet<i64> = store
        .categories()?
        .into_iter()
        .filter(|category| category.visible)
        .map(|category| category.id)
        .collect();

    let mut affiliations = HashMap::new();
    let mut rows = Vec::new();

    for team in store.teams()? {
        let Some(category_id) = team.category_id.filter(|id| visible.contains(id)) else {
            continue;
        };

        let affiliation = match team.affiliation_id {
            Some(id) => {
                if !affiliations.contains_key(&id) {
                    affiliations.insert(id, store.find_affiliation(id)?);
                }
                affiliations.get(&id).cloned().flatten()
            }
            None => None,
        };

        let (name, short_name, country, external_id) = match affiliation {
            Some(affiliation) => (
                affiliation.name,
                affiliation.short_name,
                affiliation.country,
                affiliation.external_id.unwrap_or_default(),
            ),
            None => Default::default(),
        };

        rows.push(vec![
            team.id.to_string(),
            team.external_id.unwrap_or_default(),
            category_id.to_string(),
            team.name,
            name,
            short_name,
            country,
            external_id,
        ]);
    }

    info!(rows = rows.len(), "Exported teams");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contest_core::{MemoryStore, NewTeamAffiliation, TeamBuilder, TeamCategory};
    use pretty_assertions::assert_eq;

    fn store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store
            .insert_category_with_id(TeamCategory::new(14, "Participants"))
            .unwrap();
        let mut hidden = TeamCategory::new(15, "Jury");
        hidden.visible = false;
        store.insert_category_with_id(hidden).unwrap();

        let affiliation = store
            .insert_affiliation(NewTeamAffiliation {
                short_name: "UvA".to_string(),
                name: "University of Amsterdam".to_string(),
                country: "NLD".to_string(),
                external_id: Some("100".to_string()),
            })
            .unwrap();

        store
            .insert_team_with_id(
                TeamBuilder::new(1, "Alpha")
                    .external_id("1001")
                    .category(14)
                    .affiliation(affiliation.id)
                    .build(),
            )
            .unwrap();
        store
            .insert_team_with_id(TeamBuilder::new(2, "Beta").category(14).build())
            .unwrap();
        store
            .insert_team_with_id(TeamBuilder::new(3, "Judges").category(15).build())
            .unwrap();
        store
            .insert_team_with_id(TeamBuilder::new(4, "Loose").build())
            .unwrap();
        store
    }

    #[test]
    fn test_group_rows_skip_hidden_categories() {
        assert_eq!(
            group_rows(&store()).unwrap(),
            vec![vec!["14".to_string(), "Participants".to_string()]]
        );
    }

    #[test]
    fn test_team_rows() {
        let rows = team_rows(&store()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            vec![
                "1",
                "1001",
                "14",
                "Alpha",
                "University of Amsterdam",
                "UvA",
                "NLD",
                "100"
            ]
        );
        assert_eq!(rows[1], vec!["2", "", "14", "Beta", "", "", "", ""]);
    }
}
