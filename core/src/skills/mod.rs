pub mod catalog;
pub mod manifest;
pub mod repo;

pub use catalog::skill_name_for;
pub use manifest::{MANIFEST_FILE, README_FILE, extract_description, fetch_description};
pub use repo::RepositoryRef;

/// Search order used when neither the caller nor `SKILL_REPOS` names one.
pub const DEFAULT_REPOS: &[&str] = &[
    "yldgio/codereview-skills",
    "github/awesome-copilot",
    "vercel/agent-skills",
    "anthropics/skills",
];

pub fn default_repos() -> Vec<String> {
    DEFAULT_REPOS.iter().map(|r| r.to_string()).collect()
}
