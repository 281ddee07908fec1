use std::time::Duration;

use futures_util::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::probe::Prober;
use crate::error::DiscoveryError;
use crate::skills::{RepositoryRef, skill_name_for};

const DEFAULT_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillMatch {
    pub identifier: String,
    pub skill_name: String,
    pub repo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Every requested identifier lands in exactly one of `found` or `not_found`.
/// `errors` is advisory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryResult {
    pub found: Vec<SkillMatch>,
    pub not_found: Vec<String>,
    pub errors: Vec<String>,
}

struct IdentifierReport {
    found: Option<SkillMatch>,
    errors: Vec<String>,
}

pub struct Discoverer {
    prober: Prober,
    concurrency: usize,
    deadline: Option<Duration>,
}

impl Discoverer {
    pub fn new(prober: Prober) -> Self {
        Self {
            prober,
            concurrency: DEFAULT_CONCURRENCY,
            deadline: None,
        }
    }

    /// Number of identifiers probed at once. `1` is strictly sequential.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Cancels outstanding requests and backoff waits once `deadline` elapses.
    /// Identifiers still pending at that point are reported as not found.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub async fn discover(
        &self,
        identifiers: &[String],
        repos: &[String],
    ) -> Result<DiscoveryResult, DiscoveryError> {
        if repos.is_empty() {
            return Err(DiscoveryError::NoRepositories);
        }

        let deadline = self
            .deadline
            .map(|d| self.prober.cancel_token().cancel_after(d));

        let pending: Vec<_> = identifiers
            .iter()
            .map(|identifier| self.discover_one(identifier, repos))
            .collect();
        let reports: Vec<IdentifierReport> = stream::iter(pending)
            .buffered(self.concurrency)
            .collect()
            .await;

        if let Some(handle) = deadline {
            handle.abort();
        }

        let mut result = DiscoveryResult::default();
        for (identifier, report) in identifiers.iter().zip(reports) {
            match report.found {
                Some(skill) => result.found.push(skill),
                None => result.not_found.push(identifier.clone()),
            }
            result.errors.extend(report.errors);
        }

        info!(
            found = result.found.len(),
            not_found = result.not_found.len(),
            errors = result.errors.len(),
            "Skill discovery finished"
        );

        Ok(result)
    }

    /// Searches `repos` in order. Matches and errors name each repository
    /// exactly as the caller wrote it.
    async fn discover_one(&self, identifier: &str, repos: &[String]) -> IdentifierReport {
        let skill = skill_name_for(identifier);
        let mut errors = Vec::new();

        for raw in repos {
            let repo = match RepositoryRef::normalize(raw) {
                Ok(repo) => repo,
                Err(e) => {
                    warn!(repo = %raw, error = %e, "Skipping repository");
                    errors.push(format!("Invalid repo format: {raw}"));
                    continue;
                }
            };

            match self.prober.probe(&repo, &skill).await {
                Ok(outcome) if outcome.is_found() => {
                    info!(identifier, %skill, %repo, "Skill found");
                    return IdentifierReport {
                        found: Some(SkillMatch {
                            identifier: identifier.to_string(),
                            skill_name: skill,
                            repo: raw.clone(),
                            description: outcome.into_description(),
                        }),
                        errors,
                    };
                }
                Ok(_) => {}
                Err(e) => errors.push(format!("Error checking {raw} for {skill}: {e}")),
            }
        }

        IdentifierReport {
            found: None,
            errors,
        }
    }
}
