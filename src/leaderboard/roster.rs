//! Roster CSV loading

use lazy_static::lazy_static;
use regex::Regex;
use std::io::Read;
use std::path::Path;

use crate::leaderboard::types::{LeaderboardError, LeaderboardResult, RosterEntry};

const NAME_COLUMNS: &[&str] = &["name"];
const REPO_COLUMNS: &[&str] = &["github url", "github", "repo url", "repository url", "repo"];
const APP_COLUMNS: &[&str] = &["app url"];

lazy_static! {
    static ref SEPARATOR_RUN: Result<Regex, regex::Error> = Regex::new(r"[\s_]+");
}

/// Lower-case, trimmed header with trailing commas dropped and runs of
/// whitespace/underscores collapsed: `" GitHub_URL,"` becomes `"github url"`.
#[must_use]
pub fn normalize_header(header: &str) -> String {
    let cleaned = header.trim().trim_matches(',').trim().to_lowercase();
    match SEPARATOR_RUN.as_ref() {
        Ok(re) => re.replace_all(&cleaned, " ").into_owned(),
        Err(_) => cleaned,
    }
}

/// Read roster rows from a CSV file.
pub fn load_roster(path: &Path) -> LeaderboardResult<Vec<RosterEntry>> {
    let file = std::fs::File::open(path).map_err(|e| LeaderboardError::Roster {
        path: path.to_path_buf(),
        source: csv::Error::from(e),
    })?;
    parse_roster(file).map_err(|source| LeaderboardError::Roster {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse roster rows. Rows without a repository reference are dropped.
pub fn parse_roster<R: Read>(input: R) -> Result<Vec<RosterEntry>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();
    let find = |candidates: &[&str]| -> Vec<usize> {
        candidates
            .iter()
            .filter_map(|c| headers.iter().position(|h| h == c))
            .collect()
    };
    let name_cols = find(NAME_COLUMNS);
    let repo_cols = find(REPO_COLUMNS);
    let app_cols = find(APP_COLUMNS);

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record?;
        let first = |cols: &[usize]| -> Option<String> {
            cols.iter()
                .filter_map(|i| record.get(*i))
                .map(str::trim)
                .find(|v| !v.is_empty())
                .map(str::to_string)
        };

        let Some(repo) = first(&repo_cols) else {
            continue;
        };
        entries.push(RosterEntry {
            name: first(&name_cols).unwrap_or_default(),
            repo,
            app_url: first(&app_cols),
        });
    }

    Ok(entries)
}
