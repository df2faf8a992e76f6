//! Tab-separated record parsing.
//!
//! Each document kind has a fixed column layout:
//!
//! - groups: `id, name`
//! - teams: `team_id, external_id, category_id, name, affiliation_name,
//!   affiliation_shortname, affiliation_country, institution_code`
//! - accounts: `role, name, username, password`
//!
//! Missing trailing columns read as empty strings. Records keep the order
//! of the document.

use crate::format::{check_header, TsvKind};
use contest_core::{FormatError, ImportError, Result};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static INSTITUTION_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^INST-(U-)?").expect("institution prefix pattern is valid"));

static TEAM_NUMBER_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^0-9]*0*([0-9]+)$").expect("team suffix pattern is valid"));

/// Literal used in the team id column when the external id doubles as team id.
pub const NULL_TEAM_ID: &str = "null";

/// One data line split into fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLine<'a> {
    /// 1-indexed line number in the document, the header being line 1
    pub number: usize,
    fields: Vec<&'a str>,
}

impl<'a> DataLine<'a> {
    fn new(number: usize, line: &'a str) -> Self {
        Self {
            number,
            fields: line.split('\t').map(str::trim).collect(),
        }
    }

    /// Field at the given column, or the empty string past the end of a ragged row.
    pub fn field(&self, column: usize) -> &'a str {
        self.fields.get(column).copied().unwrap_or("")
    }

    /// Field at the given column, `None` when empty.
    pub fn optional(&self, column: usize) -> Option<&'a str> {
        Some(self.field(column)).filter(|value| !value.is_empty())
    }
}

/// Checks the header and splits the remaining lines into fields.
///
/// Lines holding only whitespace are skipped.
pub fn data_lines(kind: TsvKind, content: &str) -> Result<Vec<DataLine<'_>>> {
    let mut lines = content.lines();
    check_header(kind, lines.next().unwrap_or(""))?;

    let mut data = Vec::new();
    for (index, line) in lines.enumerate() {
        let number = index + 2;
        if line.trim().is_empty() {
            debug!(kind = %kind, line = number, "Skipping blank line");
            continue;
        }
        data.push(DataLine::new(number, line));
    }
    Ok(data)
}

/// A row of a groups document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRecord {
    pub line: usize,
    pub id: i64,
    pub name: String,
}

/// Affiliation columns of a teams row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffiliationRecord {
    /// Short name, falling back to the external id when the column is empty
    pub short_name: String,
    pub name: String,
    pub country: String,

    /// Institution code without its `INST-` / `INST-U-` prefix
    pub external_id: Option<String>,
}

/// A row of a teams document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRecord {
    pub line: usize,
    pub team_id: i64,
    pub external_id: Option<String>,
    pub category_id: Option<i64>,
    pub name: String,

    /// `None` when the row carries no affiliation data
    pub affiliation: Option<AffiliationRecord>,
}

/// Role column of an accounts row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountRole {
    Admin,
    Judge,

    /// Team account, logging in as the team numbered by the username suffix
    Team { team_id: i64 },
}

/// A row of an accounts document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    pub line: usize,
    pub role: AccountRole,

    /// Display name; doubles as jury team name for judges
    pub name: String,
    pub username: String,
    pub password: String,
}

/// Records of one parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TsvRecords {
    Groups(Vec<GroupRecord>),
    Teams(Vec<TeamRecord>),
    Accounts(Vec<AccountRecord>),
}

impl TsvRecords {
    /// Number of records.
    pub fn len(&self) -> usize {
        match self {
            TsvRecords::Groups(records) => records.len(),
            TsvRecords::Teams(records) => records.len(),
            TsvRecords::Accounts(records) => records.len(),
        }
    }

    /// Returns true if there are no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parses a document of the given kind, header included.
pub fn parse_document(kind: TsvKind, content: &str) -> Result<TsvRecords> {
    match kind {
        TsvKind::Groups => parse_groups(content).map(TsvRecords::Groups),
        TsvKind::Teams => parse_teams(content).map(TsvRecords::Teams),
        TsvKind::Accounts => parse_accounts(content).map(TsvRecords::Accounts),
    }
}

/// Parses a groups document.
///
/// # Example
///
/// ```rust
/// use contest_parser::parse_groups;
///
/// let groups = parse_groups("groups\t1\n14\tParticipants\n15\tObservers\n").unwrap();
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[0].id, 14);
/// ```
pub fn parse_groups(content: &str) -> Result<Vec<GroupRecord>> {
    data_lines(TsvKind::Groups, content)?
        .into_iter()
        .map(|line| {
            let id = parse_id(&line, 0, "id")?;
            Ok(GroupRecord {
                line: line.number,
                id,
                name: line.field(1).to_string(),
            })
        })
        .collect()
}

/// Parses a teams document.
pub fn parse_teams(content: &str) -> Result<Vec<TeamRecord>> {
    data_lines(TsvKind::Teams, content)?
        .into_iter()
        .map(|line| parse_team_line(&line))
        .collect()
}

fn parse_team_line(line: &DataLine<'_>) -> Result<TeamRecord> {
    let external_id = line.optional(1).map(str::to_string);

    let team_id = match (line.field(0), external_id.as_deref()) {
        (NULL_TEAM_ID, Some(external)) if external.parse::<i64>().is_ok() => external
            .parse::<i64>()
            .map_err(|_| FormatError::invalid_id(line.number, "team id"))?,
        _ => parse_id(line, 0, "team id")?,
    };

    let category_id = match line.optional(2) {
        Some(_) => Some(parse_id(line, 2, "category id")?),
        None => None,
    };

    let affiliation_external_id = Some(
        INSTITUTION_PREFIX
            .replace(line.field(7), "")
            .into_owned(),
    )
    .filter(|id| !id.is_empty());

    let short_name = line
        .optional(5)
        .map(str::to_string)
        .or_else(|| affiliation_external_id.clone())
        .unwrap_or_default();

    let affiliation = if short_name.is_empty() {
        None
    } else {
        Some(AffiliationRecord {
            short_name,
            name: line.field(4).to_string(),
            country: line.field(6).to_string(),
            external_id: affiliation_external_id,
        })
    };

    Ok(TeamRecord {
        line: line.number,
        team_id,
        external_id,
        category_id,
        name: line.field(3).to_string(),
        affiliation,
    })
}

/// Parses an accounts document.
///
/// Analyst rows are dropped. An unknown role or a team username without a
/// numeric suffix fails the whole document.
pub fn parse_accounts(content: &str) -> Result<Vec<AccountRecord>> {
    let mut records = Vec::new();

    for line in data_lines(TsvKind::Accounts, content)? {
        let role = match line.field(0) {
            "admin" => AccountRole::Admin,
            "judge" => AccountRole::Judge,
            "team" => AccountRole::Team {
                team_id: team_id_from_username(line.field(2))
                    .ok_or_else(|| FormatError::UnparseableTeamId {
                        line: line.number,
                        username: line.field(2).to_string(),
                    })?,
            },
            "analyst" => {
                debug!(line = line.number, "Ignoring analyst account");
                continue;
            }
            other => return Err(ImportError::unsupported_role(line.number, other)),
        };

        records.push(AccountRecord {
            line: line.number,
            role,
            name: line.field(1).to_string(),
            username: line.field(2).to_string(),
            password: line.field(3).to_string(),
        });
    }

    Ok(records)
}

/// Extracts the team number from a username such as `team-007`.
///
/// Leading zeros are dropped; the username must end in digits.
pub fn team_id_from_username(username: &str) -> Option<i64> {
    TEAM_NUMBER_SUFFIX
        .captures(username)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse().ok())
}

fn parse_id(line: &DataLine<'_>, column: usize, name: &'static str) -> Result<i64> {
    line.field(column)
        .parse()
        .map_err(|_| FormatError::invalid_id(line.number, name).into())
}

/// Joins rows into a tab-separated document body.
pub fn write_tsv<R, F>(rows: R) -> String
where
    R: IntoIterator<Item = Vec<F>>,
    F: AsRef<str>,
{
    let mut out = String::new();
    for row in rows {
        let fields: Vec<&str> = row.iter().map(AsRef::as_ref).collect();
        out.push_str(&fields.join("\t"));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_groups_keep_document_order() {
        let groups = parse_groups("File_Version\t1\n15\tObservers\n14\tParticipants\n").unwrap();
        assert_eq!(
            groups,
            vec![
                GroupRecord {
                    line: 2,
                    id: 15,
                    name: "Observers".to_string()
                },
                GroupRecord {
                    line: 3,
                    id: 14,
                    name: "Participants".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_group_with_non_numeric_id_names_line() {
        let err = parse_groups("groups\t1\n14\tParticipants\nabc\tBroken\n").unwrap_err();
        assert_eq!(err.to_string(), "Invalid id format on line 3");
    }

    #[test]
    fn test_ragged_group_row_has_empty_name() {
        let groups = parse_groups("groups\t1\n14\n").unwrap();
        assert_eq!(groups[0].name, "");
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let groups = parse_groups("groups\t1\n\n14\tParticipants\n   \n").unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].line, 3);
    }

    #[test]
    fn test_team_null_id_takes_numeric_external_id() {
        let teams = parse_teams("teams\t2\nnull\t42\t3\tNull Pointers\n").unwrap();
        assert_eq!(teams[0].team_id, 42);
        assert_eq!(teams[0].external_id, Some("42".to_string()));
    }

    #[test]
    fn test_team_null_id_with_text_external_id_fails() {
        let err = parse_teams("teams\t1\nnull\tabc\t3\tNull Pointers\n").unwrap_err();
        assert_eq!(err.to_string(), "Invalid team id format on line 2");
    }

    #[test]
    fn test_team_affiliation_columns() {
        let content = "teams\t1\n\
            7\t7001\t3\tThe Lambdas\tUniversity of Amsterdam\tUvA\tNLD\tINST-U-1234\n";
        let teams = parse_teams(content).unwrap();

        assert_eq!(
            teams[0],
            TeamRecord {
                line: 2,
                team_id: 7,
                external_id: Some("7001".to_string()),
                category_id: Some(3),
                name: "The Lambdas".to_string(),
                affiliation: Some(AffiliationRecord {
                    short_name: "UvA".to_string(),
                    name: "University of Amsterdam".to_string(),
                    country: "NLD".to_string(),
                    external_id: Some("1234".to_string()),
                }),
            }
        );
    }

    #[test]
    fn test_team_short_name_falls_back_to_external_id() {
        let content = "teams\t1\n7\t\t3\tThe Lambdas\tSome University\t\tNLD\tINST-987\n";
        let teams = parse_teams(content).unwrap();
        let affiliation = teams[0].affiliation.as_ref().unwrap();

        assert_eq!(affiliation.short_name, "987");
        assert_eq!(affiliation.external_id, Some("987".to_string()));
        assert_eq!(teams[0].external_id, None);
    }

    #[test]
    fn test_team_without_affiliation_data() {
        let teams = parse_teams("teams\t1\n7\t\t\tLone Wolves\n").unwrap();
        assert_eq!(teams[0].affiliation, None);
        assert_eq!(teams[0].category_id, None);
    }

    #[test]
    fn test_accounts_roles() {
        let content = "accounts\t1\n\
            admin\tAdministrator\tadmin\tsecret\n\
            judge\tJane Judge\tjudge1\tpw\n\
            analyst\tAnna\tanalyst1\tpw\n\
            team\tTeam 7\tteam-007\tpw\n";
        let accounts = parse_accounts(content).unwrap();

        assert_eq!(accounts.len(), 3);
        assert_eq!(accounts[0].role, AccountRole::Admin);
        assert_eq!(accounts[1].role, AccountRole::Judge);
        assert_eq!(accounts[2].role, AccountRole::Team { team_id: 7 });
        assert_eq!(accounts[2].line, 5);
    }

    #[test]
    fn test_unknown_role_aborts_with_line() {
        let content = "accounts\t1\nadmin\tA\ta\tp\nballoon\tB\tb\tp\ncoach\tC\tc\tp\n";
        let err = parse_accounts(content).unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedRole { line: 3, .. }));
        assert_eq!(err.to_string(), "unknown role on line 3: balloon");
    }

    #[test]
    fn test_team_username_without_number() {
        let err = parse_accounts("accounts\t1\nteam\tT\tteam-abc\tpw\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot parse team id on line 2 from \"team-abc\""
        );
    }

    #[test]
    fn test_team_id_from_username() {
        assert_eq!(team_id_from_username("team-007"), Some(7));
        assert_eq!(team_id_from_username("team42"), Some(42));
        assert_eq!(team_id_from_username("0"), Some(0));
        assert_eq!(team_id_from_username("team-1a"), None);
        assert_eq!(team_id_from_username("team"), None);
    }

    #[test]
    fn test_write_tsv() {
        let out = write_tsv(vec![vec!["14", "Participants"], vec!["15", "Observers"]]);
        assert_eq!(out, "14\tParticipants\n15\tObservers\n");
    }
}
