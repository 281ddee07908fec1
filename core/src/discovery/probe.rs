use serde::Deserialize;
use tracing::debug;

use crate::error::FetchError;
use crate::http::{CancelToken, Fetcher};
use crate::skills::{MANIFEST_FILE, README_FILE, RepositoryRef, fetch_description};
use crate::traits::HttpResponse;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    NotFound,
    FoundBare,
    FoundWithDescription(String),
}

impl ProbeOutcome {
    pub fn is_found(&self) -> bool {
        !matches!(self, Self::NotFound)
    }

    pub fn into_description(self) -> Option<String> {
        match self {
            Self::FoundWithDescription(description) => Some(description),
            _ => None,
        }
    }
}

/// One item of a GitHub contents API response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub download_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContentsBody {
    Listing(Vec<ContentEntry>),
    Single(ContentEntry),
}

/// What a contents request says about one candidate path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentsLookup {
    Directory(Vec<ContentEntry>),
    /// A single file, with its raw download location when GitHub provides one.
    File(Option<String>),
    Absent,
    Error(String),
}

impl ContentsLookup {
    pub fn from_response(response: &HttpResponse) -> Self {
        if response.is_success() {
            return match serde_json::from_str::<ContentsBody>(&response.body) {
                Ok(ContentsBody::Listing(entries)) => Self::Directory(entries),
                Ok(ContentsBody::Single(entry)) => Self::File(entry.download_url),
                Err(e) => Self::Error(format!("unexpected contents body: {e}")),
            };
        }

        if response.is_not_found() {
            Self::Absent
        } else {
            Self::Error(format!("HTTP {}", response.status))
        }
    }
}

/// Candidate locations for a skill, in the order they are tried.
pub fn candidate_paths(skill: &str) -> [String; 4] {
    [
        format!("skills/{skill}"),
        format!("skills/{skill}/{MANIFEST_FILE}"),
        skill.to_string(),
        format!("{skill}/{MANIFEST_FILE}"),
    ]
}

/// `SKILL.md` if the listing has one, else `README.md`, both case-insensitive.
pub fn find_manifest(entries: &[ContentEntry]) -> Option<&ContentEntry> {
    let named = |file: &str| entries.iter().find(|e| e.name.eq_ignore_ascii_case(file));
    named(MANIFEST_FILE).or_else(|| named(README_FILE))
}

#[derive(Clone)]
pub struct Prober {
    fetcher: Fetcher,
    api_base: String,
}

impl Prober {
    pub fn new(fetcher: Fetcher) -> Self {
        Self {
            fetcher,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn cancel_token(&self) -> &CancelToken {
        self.fetcher.cancel_token()
    }

    /// Checks whether `skill` exists in `repo`, stopping at the first candidate
    /// path that resolves.
    ///
    /// Per-path failures count as "not here" and move on to the next path.
    /// Only cancellation is reported as an error.
    pub async fn probe(
        &self,
        repo: &RepositoryRef,
        skill: &str,
    ) -> Result<ProbeOutcome, FetchError> {
        for path in candidate_paths(skill) {
            let url = repo.contents_url(&self.api_base, &path);

            let lookup = match self.fetcher.get(&url).await {
                Ok(response) => ContentsLookup::from_response(&response),
                Err(FetchError::Cancelled) => return Err(FetchError::Cancelled),
                Err(e) => ContentsLookup::Error(e.to_string()),
            };

            match lookup {
                ContentsLookup::Directory(entries) => {
                    debug!(%repo, %path, entries = entries.len(), "Found skill directory");
                    let raw_url =
                        find_manifest(&entries).and_then(|e| e.download_url.as_deref());
                    return Ok(match raw_url {
                        Some(raw_url) => self.describe(raw_url).await,
                        None => ProbeOutcome::FoundBare,
                    });
                }
                ContentsLookup::File(Some(raw_url)) => {
                    debug!(%repo, %path, "Found skill file");
                    return Ok(self.describe(&raw_url).await);
                }
                ContentsLookup::File(None) => return Ok(ProbeOutcome::FoundBare),
                ContentsLookup::Absent => {
                    debug!(%repo, %path, "Not present");
                }
                ContentsLookup::Error(reason) => {
                    debug!(%repo, %path, %reason, "Probe failed, trying next path");
                }
            }
        }

        Ok(ProbeOutcome::NotFound)
    }

    async fn describe(&self, raw_url: &str) -> ProbeOutcome {
        match fetch_description(&self.fetcher, raw_url).await {
            Some(description) => ProbeOutcome::FoundWithDescription(description),
            None => ProbeOutcome::FoundBare,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingSleeper, ScriptedClient};
    use serde_json::json;
    use std::sync::Arc;

    const API: &str = "https://api.test";

    fn prober(client: &Arc<ScriptedClient>) -> Prober {
        let fetcher =
            Fetcher::new(client.clone()).with_sleeper(Arc::new(RecordingSleeper::default()));
        Prober::new(fetcher).with_api_base(API)
    }

    fn repo() -> RepositoryRef {
        RepositoryRef::normalize("acme/skills").unwrap()
    }

    fn contents(path: &str) -> String {
        format!("{API}/repos/acme/skills/contents/{path}")
    }

    #[test]
    fn candidate_order() {
        assert_eq!(
            candidate_paths("nextjs"),
            [
                "skills/nextjs".to_string(),
                "skills/nextjs/SKILL.md".to_string(),
                "nextjs".to_string(),
                "nextjs/SKILL.md".to_string(),
            ]
        );
    }

    #[test]
    fn manifest_preferred_over_readme() {
        let entries: Vec<ContentEntry> = serde_json::from_value(json!([
            {"name": "README.md", "download_url": "https://raw/readme"},
            {"name": "skill.md", "download_url": "https://raw/skill"}
        ]))
        .unwrap();
        assert_eq!(find_manifest(&entries).unwrap().name, "skill.md");
    }

    #[test]
    fn readme_used_when_no_manifest() {
        let entries: Vec<ContentEntry> = serde_json::from_value(json!([
            {"name": "assets", "type": "dir"},
            {"name": "Readme.MD", "download_url": "https://raw/readme"}
        ]))
        .unwrap();
        assert_eq!(find_manifest(&entries).unwrap().name, "Readme.MD");
    }

    #[test]
    fn lookup_classification() {
        let dir = HttpResponse::new(200, r#"[{"name":"SKILL.md","type":"file"}]"#);
        assert!(matches!(
            ContentsLookup::from_response(&dir),
            ContentsLookup::Directory(e) if e.len() == 1
        ));

        let file =
            HttpResponse::new(200, r#"{"name":"SKILL.md","download_url":"https://raw/x"}"#);
        assert_eq!(
            ContentsLookup::from_response(&file),
            ContentsLookup::File(Some("https://raw/x".to_string()))
        );

        assert_eq!(
            ContentsLookup::from_response(&HttpResponse::new(404, "")),
            ContentsLookup::Absent
        );
        assert!(matches!(
            ContentsLookup::from_response(&HttpResponse::new(200, "not json")),
            ContentsLookup::Error(_)
        ));
        assert_eq!(
            ContentsLookup::from_response(&HttpResponse::new(403, "")),
            ContentsLookup::Error("HTTP 403".to_string())
        );
    }

    #[tokio::test]
    async fn directory_with_manifest_yields_description() {
        let client = Arc::new(ScriptedClient::new());
        client.respond_json(
            &contents("skills/nextjs"),
            json!([{"name": "SKILL.md", "type": "file", "download_url": "https://raw/nextjs/SKILL.md"}]),
        );
        client.respond(
            "https://raw/nextjs/SKILL.md",
            HttpResponse::new(200, "---\ndescription: Next.js review rules\n---\n"),
        );

        let outcome = prober(&client).probe(&repo(), "nextjs").await.unwrap();

        assert_eq!(
            outcome,
            ProbeOutcome::FoundWithDescription("Next.js review rules".to_string())
        );
        assert_eq!(client.requests().len(), 2);
    }

    #[tokio::test]
    async fn directory_without_manifest_is_bare() {
        let client = Arc::new(ScriptedClient::new());
        client.respond_json(
            &contents("skills/docker"),
            json!([{"name": "compose.yml", "type": "file", "download_url": "https://raw/compose"}]),
        );

        let outcome = prober(&client).probe(&repo(), "docker").await.unwrap();

        assert_eq!(outcome, ProbeOutcome::FoundBare);
    }

    #[tokio::test]
    async fn readme_only_directory_is_described() {
        let client = Arc::new(ScriptedClient::new());
        client.respond_json(
            &contents("skills/angular"),
            json!([
                {"name": "examples", "type": "dir", "download_url": null},
                {"name": "README.md", "type": "file", "download_url": "https://raw/angular/README.md"}
            ]),
        );
        client.respond(
            "https://raw/angular/README.md",
            HttpResponse::new(200, "# Angular\n\nStandalone components and signals.\n"),
        );

        let outcome = prober(&client).probe(&repo(), "angular").await.unwrap();

        assert_eq!(
            outcome,
            ProbeOutcome::FoundWithDescription("Standalone components and signals.".to_string())
        );
        assert_eq!(client.request_count("https://raw/angular/README.md"), 1);
    }

    #[tokio::test]
    async fn manifest_without_download_url_is_bare() {
        let client = Arc::new(ScriptedClient::new());
        client.respond_json(
            &contents("skills/nestjs"),
            json!([{"name": "SKILL.md", "type": "file", "download_url": null}]),
        );

        let outcome = prober(&client).probe(&repo(), "nestjs").await.unwrap();

        assert_eq!(outcome, ProbeOutcome::FoundBare);
        assert_eq!(client.requests(), vec![contents("skills/nestjs")]);
    }

    #[tokio::test]
    async fn unreadable_manifest_is_bare() {
        let client = Arc::new(ScriptedClient::new());
        client.respond_json(
            &contents("skills/react"),
            json!([{"name": "SKILL.md", "download_url": "https://raw/react"}]),
        );
        client.respond("https://raw/react", HttpResponse::new(500, ""));

        let outcome = prober(&client).probe(&repo(), "react").await.unwrap();

        assert_eq!(outcome, ProbeOutcome::FoundBare);
    }

    #[tokio::test]
    async fn falls_through_to_top_level_manifest() {
        let client = Arc::new(ScriptedClient::new());
        client.respond_json(
            &contents("bicep/SKILL.md"),
            json!({"name": "SKILL.md", "type": "file", "download_url": "https://raw/bicep"}),
        );
        client.respond("https://raw/bicep", HttpResponse::new(200, "# Bicep\nInfra as code.\n"));

        let outcome = prober(&client).probe(&repo(), "bicep").await.unwrap();

        assert_eq!(
            outcome,
            ProbeOutcome::FoundWithDescription("Infra as code.".to_string())
        );
        assert_eq!(
            client.requests(),
            vec![
                contents("skills/bicep"),
                contents("skills/bicep/SKILL.md"),
                contents("bicep"),
                contents("bicep/SKILL.md"),
                "https://raw/bicep".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn transport_failure_moves_to_next_path() {
        let client = Arc::new(ScriptedClient::new());
        client.fail(&contents("skills/fastapi"), "connection refused");
        client.respond_json(
            &contents("skills/fastapi/SKILL.md"),
            json!({"name": "SKILL.md"}),
        );

        let outcome = prober(&client).probe(&repo(), "fastapi").await.unwrap();

        assert_eq!(outcome, ProbeOutcome::FoundBare);
        assert_eq!(client.request_count(&contents("skills/fastapi")), 3);
    }

    #[tokio::test]
    async fn nothing_found_after_four_paths() {
        let client = Arc::new(ScriptedClient::new());

        let outcome = prober(&client).probe(&repo(), "nope").await.unwrap();

        assert_eq!(outcome, ProbeOutcome::NotFound);
        assert_eq!(client.requests().len(), 4);
    }

    #[tokio::test]
    async fn cancellation_is_reported() {
        let client = Arc::new(ScriptedClient::new());
        let cancel = CancelToken::new();
        cancel.cancel();
        let prober =
            Prober::new(Fetcher::new(client.clone()).with_cancel(cancel)).with_api_base(API);

        let result = prober.probe(&repo(), "nextjs").await;

        assert_eq!(result, Err(FetchError::Cancelled));
        assert!(client.requests().is_empty());
    }
}
