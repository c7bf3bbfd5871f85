//! Application URL and public proxy URL resolution

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;

use crate::leaderboard::types::StudentUrls;

/// Externally owned `subdomain -> target` table. Targets are project ids or
/// full URLs. Iteration is in subdomain order, so lookups are deterministic.
pub type SubdomainTable = BTreeMap<String, String>;

lazy_static! {
    static ref PROJECT_LABEL: Result<Regex, regex::Error> = Regex::new(r"^[A-Za-z0-9-]+$");
}

/// Resolves declared app URLs against one hosting platform.
#[derive(Clone, Debug)]
pub struct TargetResolver {
    host_suffix: String,
    public_domain: String,
}

impl TargetResolver {
    pub fn new(host_suffix: impl Into<String>, public_domain: impl Into<String>) -> Self {
        Self {
            host_suffix: host_suffix.into().trim_matches('.').to_lowercase(),
            public_domain: public_domain.into().trim_matches('.').to_string(),
        }
    }

    /// Project id from a URL such as `https://my-app.bolt.host/` (`my-app`).
    #[must_use]
    pub fn extract_project_id(&self, app_url: &str) -> Option<String> {
        let label_re = PROJECT_LABEL.as_ref().ok()?;
        let host = host_of(app_url)?;
        // Match the suffix case-insensitively but keep the id's own case.
        if !host.to_ascii_lowercase().ends_with(&self.host_suffix) {
            return None;
        }
        let label = host
            .get(..host.len() - self.host_suffix.len())?
            .strip_suffix('.')?;
        // The project id is the label right before the platform suffix.
        let label = label.rsplit('.').next()?;
        label_re.is_match(label).then(|| label.to_string())
    }

    /// Canonical app URL: platform URLs gain a scheme, other absolute URLs
    /// pass through, anything else is dropped.
    #[must_use]
    pub fn canonical_app_url(&self, app_url: &str) -> Option<String> {
        let trimmed = app_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return None;
        }
        let has_scheme = trimmed.starts_with("http://") || trimmed.starts_with("https://");
        if trimmed.to_lowercase().contains(&self.host_suffix) {
            if has_scheme {
                Some(trimmed.to_string())
            } else {
                Some(format!("https://{trimmed}"))
            }
        } else if has_scheme {
            Some(trimmed.to_string())
        } else {
            None
        }
    }

    /// Subdomain whose target is `project_id`.
    ///
    /// Exact matches win. Failing that, the first subdomain whose target
    /// merely contains the id is used; this is loose and can pick the wrong
    /// entry when one id is a substring of another. Both passes walk the
    /// table in sorted subdomain order, not file order, so an exact match
    /// anywhere wins over an earlier containing entry.
    #[must_use]
    pub fn find_subdomain<'a>(&self, project_id: &str, table: &'a SubdomainTable) -> Option<&'a str> {
        table
            .iter()
            .find(|(_, target)| target.as_str() == project_id)
            .or_else(|| table.iter().find(|(_, target)| target.contains(project_id)))
            .map(|(subdomain, _)| subdomain.as_str())
    }

    #[must_use]
    pub fn public_url(&self, subdomain: &str) -> String {
        format!("https://{subdomain}.{}", self.public_domain)
    }

    /// Both URL fields for a student. A miss leaves the field unset.
    #[must_use]
    pub fn resolve(&self, app_url: Option<&str>, table: &SubdomainTable) -> StudentUrls {
        let Some(app_url) = app_url.map(str::trim).filter(|u| !u.is_empty()) else {
            return StudentUrls::default();
        };
        let public_url = self
            .extract_project_id(app_url)
            .and_then(|id| self.find_subdomain(&id, table))
            .map(|subdomain| self.public_url(subdomain));

        StudentUrls {
            app_url: self.canonical_app_url(app_url),
            public_url,
        }
    }
}

fn host_of(url: &str) -> Option<&str> {
    let trimmed = url.trim();
    let rest = trimmed.split_once("://").map_or(trimmed, |(_, rest)| rest);
    let host = rest.split(['/', '?', '#']).next()?;
    let host = host.rsplit_once('@').map_or(host, |(_, h)| h);
    let host = host.split(':').next()?;
    (!host.is_empty()).then_some(host)
}
