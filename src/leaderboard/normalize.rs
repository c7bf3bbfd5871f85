//! Repository reference normalization

use lazy_static::lazy_static;
use regex::Regex;

use crate::leaderboard::types::RepoId;

lazy_static! {
    static ref GITHUB_URL: Result<Regex, regex::Error> =
        Regex::new(r"(?i)^(?:[a-z][a-z0-9+.-]*://)?(?:www\.)?github\.com/([^/?#\s]+)/([^/?#\s]+)");
}

/// Parse a repository reference into its canonical `(owner, repo)` pair.
///
/// Accepts `https://github.com/owner/repo[.git][/...]`, the same without a
/// scheme, and bare `owner/repo` (an owner with a dot is a host, not a
/// login). Anything else yields `None`.
#[must_use]
pub fn normalize_repo(input: &str) -> Option<RepoId> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let url_re = GITHUB_URL.as_ref().ok()?;

    let (owner, repo) = if let Some(caps) = url_re.captures(trimmed) {
        let owner = caps.get(1)?.as_str();
        let repo = caps.get(2)?.as_str();
        (owner, repo)
    } else if trimmed.contains("://") {
        return None;
    } else {
        let mut parts = trimmed.trim_end_matches('/').split('/');
        match (parts.next(), parts.next(), parts.next()) {
            // Logins never contain dots; a dotted owner is a host.
            (Some(owner), Some(repo), None) if !owner.contains('.') => (owner, repo),
            _ => return None,
        }
    };

    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    if owner.is_empty() || repo.is_empty() || owner.contains(char::is_whitespace) {
        return None;
    }

    Some(RepoId::new(owner, repo))
}
