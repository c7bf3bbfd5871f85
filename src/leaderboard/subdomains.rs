//! Subdomain table loading

use serde::Deserialize;
use std::path::Path;

use crate::leaderboard::targets::SubdomainTable;

#[derive(Debug, Default, Deserialize)]
struct SubdomainsFile {
    #[serde(default)]
    subdomains: SubdomainTable,
}

/// Parse `{"subdomains": {"name": "target", ...}}`.
pub fn parse_subdomain_table(text: &str) -> Result<SubdomainTable, serde_json::Error> {
    let file: SubdomainsFile = serde_json::from_str(text)?;
    Ok(file.subdomains)
}

/// Load the subdomain table.
///
/// An unreadable or malformed file is an error for the caller to report;
/// the engine then runs with an empty table.
pub fn load_subdomain_table(path: &Path) -> Result<SubdomainTable, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    parse_subdomain_table(&text).map_err(|e| format!("malformed {}: {e}", path.display()))
}
