use serde::Deserialize;
use tracing::debug;

use crate::http::Fetcher;

pub const MANIFEST_FILE: &str = "SKILL.md";
pub const README_FILE: &str = "README.md";

const SUMMARY_MAX_CHARS: usize = 100;
const ELLIPSIS: &str = "...";

#[derive(Debug, Deserialize)]
struct FrontMatter {
    #[serde(default)]
    description: Option<String>,
}

/// Downloads a manifest and pulls a one-line summary out of it.
///
/// Any failure (transport, non-2xx status, nothing usable in the text)
/// yields `None`.
pub async fn fetch_description(fetcher: &Fetcher, raw_url: &str) -> Option<String> {
    match fetcher.get(raw_url).await {
        Ok(response) if response.is_success() => extract_description(&response.body),
        Ok(response) => {
            debug!(url = raw_url, status = response.status, "Manifest not readable");
            None
        }
        Err(e) => {
            debug!(url = raw_url, error = %e, "Manifest download failed");
            None
        }
    }
}

/// Summary of a skill document: the front matter `description` when there
/// is one, otherwise the first plain line of the whole text (front matter
/// lines included), capped at 100 chars.
pub fn extract_description(content: &str) -> Option<String> {
    let lines: Vec<&str> = content.lines().collect();

    if lines.first().is_some_and(|l| l.trim() == "---")
        && let Some(pos) = lines[1..].iter().position(|l| l.trim() == "---")
        && let Some(description) = front_matter_description(&lines[1..=pos].join("\n"))
    {
        return Some(description);
    }

    lines
        .iter()
        .map(|l| l.trim())
        .find(|l| !l.is_empty() && !l.starts_with('#') && !l.starts_with("---"))
        .map(truncate_summary)
}

fn front_matter_description(block: &str) -> Option<String> {
    if let Ok(frontmatter) = serde_yaml::from_str::<FrontMatter>(block)
        && let Some(description) = frontmatter.description
    {
        let joined = description
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !joined.is_empty() {
            return Some(joined);
        }
    }

    // Front matter that is not valid YAML, e.g. an unquoted value with a colon.
    block
        .lines()
        .filter_map(|l| l.trim_start().strip_prefix("description:"))
        .map(strip_quotes)
        .find(|value| !value.is_empty())
}

fn strip_quotes(value: &str) -> String {
    let value = value.trim();
    let value = value
        .strip_prefix(['"', '\''])
        .unwrap_or(value);
    let value = value.strip_suffix(['"', '\'']).unwrap_or(value);
    value.trim().to_string()
}

fn truncate_summary(line: &str) -> String {
    if line.chars().count() > SUMMARY_MAX_CHARS {
        let mut summary: String = line.chars().take(SUMMARY_MAX_CHARS).collect();
        summary.push_str(ELLIPSIS);
        summary
    } else {
        line.to_string()
    }
}
