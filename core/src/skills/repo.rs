use std::fmt;
use std::str::FromStr;

use crate::error::RepoRefError;

const GITHUB_HOSTS: &[&str] = &["github.com", "www.github.com"];

/// A GitHub repository as an `(owner, name)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryRef {
    owner: String,
    name: String,
}

impl RepositoryRef {
    /// Parses `owner/name` shorthand or a `https://github.com/owner/name` URL.
    ///
    /// URLs may carry extra path segments (`/tree/main`) and a `.git` suffix on
    /// the name. Shorthand must be exactly two non-empty segments.
    pub fn normalize(raw: &str) -> Result<Self, RepoRefError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(RepoRefError::Empty);
        }

        match strip_scheme(raw) {
            Some(rest) => parse_url_path(raw, rest),
            None => parse_shorthand(raw),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn github_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.name)
    }

    /// Contents API location for `path` inside this repository.
    pub fn contents_url(&self, api_base: &str, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            api_base.trim_end_matches('/'),
            self.owner,
            self.name,
            path.trim_start_matches('/')
        )
    }

    /// Drops a trailing `.git` from the name, as installers expect.
    pub fn without_git_suffix(mut self) -> Self {
        if let Some(stripped) = self.name.strip_suffix(".git")
            && !stripped.is_empty()
        {
            self.name = stripped.to_string();
        }
        self
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepositoryRef {
    type Err = RepoRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::normalize(s)
    }
}

fn strip_scheme(raw: &str) -> Option<&str> {
    raw.strip_prefix("https://")
        .or_else(|| raw.strip_prefix("http://"))
}

fn parse_url_path(raw: &str, rest: &str) -> Result<RepositoryRef, RepoRefError> {
    let rest = rest.split(['?', '#']).next().unwrap_or_default();
    let mut parts = rest.split('/');

    let host = parts.next().unwrap_or_default();
    if !GITHUB_HOSTS.contains(&host.to_ascii_lowercase().as_str()) {
        return Err(RepoRefError::UnsupportedUrl(raw.to_string()));
    }

    let owner = parts.next().unwrap_or_default();
    let name = parts.next().unwrap_or_default();
    let name = name.strip_suffix(".git").unwrap_or(name);

    if owner.is_empty() || name.is_empty() {
        return Err(RepoRefError::UnsupportedUrl(raw.to_string()));
    }

    Ok(RepositoryRef {
        owner: owner.to_string(),
        name: name.to_string(),
    })
}

fn parse_shorthand(raw: &str) -> Result<RepositoryRef, RepoRefError> {
    let parts: Vec<&str> = raw.split('/').collect();

    match parts.as_slice() {
        [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(RepositoryRef {
            owner: owner.to_string(),
            name: name.to_string(),
        }),
        _ => Err(RepoRefError::SegmentCount {
            raw: raw.to_string(),
            count: parts.len(),
        }),
    }
}
