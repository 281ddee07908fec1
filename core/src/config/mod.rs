use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::discovery::DEFAULT_API_BASE;
use crate::http::RetryPolicy;
use crate::skills::default_repos;

const SKILLSCOUT_DIR: &str = ".skillscout";

/// Comma-separated repository list overriding the configured search order.
pub const REPOS_ENV: &str = "SKILL_REPOS";
pub const TOKEN_ENVS: &[&str] = &["GITHUB_TOKEN", "GH_TOKEN"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct InstallConfig {
    pub allowed_repos: Vec<String>,
    pub agent: String,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            allowed_repos: default_repos(),
            agent: "opencode".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub repos: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub api_base_url: String,
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub request_timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_secs: Option<u64>,
    pub concurrency: usize,
    pub install: InstallConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            repos: default_repos(),
            token: None,
            api_base_url: DEFAULT_API_BASE.to_string(),
            max_attempts: 3,
            base_delay_ms: 1000,
            request_timeout_secs: 30,
            deadline_secs: None,
            concurrency: 4,
            install: InstallConfig::default(),
        }
    }
}

impl Config {
    pub fn load_or_init() -> Result<Self> {
        if config_exists() {
            load_config()
        } else {
            Ok(Config::default())
        }
    }

    /// Repository search order: the caller's list, then `SKILL_REPOS`, then
    /// the configured list.
    pub fn search_repos(&self, explicit: &[String]) -> Vec<String> {
        let env = std::env::var(REPOS_ENV).ok();
        resolve_search_repos(explicit, env.as_deref(), &self.repos)
    }

    /// Bearer credential from the environment, falling back to the config file.
    pub fn resolve_token(&self) -> Option<String> {
        resolve_token_with(|name| std::env::var(name).ok(), self.token.as_deref())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.base_delay_ms))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }
}

pub fn resolve_search_repos(
    explicit: &[String],
    env_value: Option<&str>,
    configured: &[String],
) -> Vec<String> {
    let explicit: Vec<String> = explicit
        .iter()
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .collect();
    if !explicit.is_empty() {
        return explicit;
    }

    if let Some(env_value) = env_value {
        let from_env: Vec<String> = env_value
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(String::from)
            .collect();
        if !from_env.is_empty() {
            return from_env;
        }
    }

    configured.to_vec()
}

fn resolve_token_with(
    lookup: impl Fn(&str) -> Option<String>,
    config_token: Option<&str>,
) -> Option<String> {
    TOKEN_ENVS
        .iter()
        .filter_map(|name| lookup(name))
        .map(|token| token.trim().to_string())
        .find(|token| !token.is_empty())
        .or_else(|| {
            config_token
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
        })
}

pub fn get_skillscout_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(SKILLSCOUT_DIR)
}

pub fn get_config_path() -> PathBuf {
    get_skillscout_dir().join("config.toml")
}

pub fn config_exists() -> bool {
    get_config_path().exists()
}

pub fn load_config() -> Result<Config> {
    load_config_from(&get_config_path())
}

pub fn load_config_from(config_path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(config_path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            anyhow::anyhow!(
                "Config file not found at {}. Run 'skillscout config init' to create one.",
                config_path.display()
            )
        } else {
            anyhow::anyhow!("Failed to read config from {}: {}", config_path.display(), e)
        }
    })?;

    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", config_path.display()))
}

pub fn save_config(config: &Config) -> Result<PathBuf> {
    let config_path = get_config_path();
    save_config_to(config, &config_path)?;
    Ok(config_path)
}

pub fn save_config_to(config: &Config, config_path: &Path) -> Result<()> {
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create config directory at {}", parent.display())
        })?;
    }

    let content =
        toml::to_string_pretty(config).with_context(|| "Failed to serialize config to TOML")?;

    std::fs::write(config_path, content)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    Ok(())
}

/// TOML for display, with any stored token masked.
pub fn render_config(config: &Config) -> Result<String> {
    let masked = Config {
        token: config.token.as_ref().map(|_| "********".to_string()),
        ..config.clone()
    };
    toml::to_string_pretty(&masked).with_context(|| "Failed to serialize config to TOML")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn explicit_repos_take_precedence() {
        let repos = resolve_search_repos(
            &strings(&["mine/skills"]),
            Some("env/one,env/two"),
            &default_repos(),
        );
        assert_eq!(repos, strings(&["mine/skills"]));
    }

    #[test]
    fn env_repos_are_trimmed_and_filtered() {
        let repos = resolve_search_repos(&[], Some(" env/one , ,env/two,"), &default_repos());
        assert_eq!(repos, strings(&["env/one", "env/two"]));
    }

    #[test]
    fn blank_env_falls_back_to_configured() {
        let repos = resolve_search_repos(&strings(&[" "]), Some(" , "), &default_repos());
        assert_eq!(repos, default_repos());
        assert_eq!(repos[0], "yldgio/codereview-skills");
    }

    #[test]
    fn env_token_beats_config() {
        let token = resolve_token_with(
            |name| (name == "GH_TOKEN").then(|| "from-env".to_string()),
            Some("from-config"),
        );
        assert_eq!(token.as_deref(), Some("from-env"));
    }

    #[test]
    fn config_token_used_without_env() {
        assert_eq!(
            resolve_token_with(|_| None, Some(" cfg ")).as_deref(),
            Some("cfg")
        );
        assert_eq!(resolve_token_with(|_| None, Some("")), None);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(
            &path,
            "repos = [\"acme/skills\"]\nmax_attempts = 5\n\n[install]\nagent = \"claude\"\n",
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.repos, strings(&["acme/skills"]));
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.base_delay_ms, 1000);
        assert_eq!(config.install.agent, "claude");
        assert_eq!(config.install.allowed_repos, default_repos());
        assert_eq!(config.retry_policy().base_delay, Duration::from_secs(1));
    }

    #[test]
    fn save_then_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("config.toml");
        let config = Config {
            deadline_secs: Some(20),
            ..Config::default()
        };

        save_config_to(&config, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();

        assert_eq!(loaded, config);
        assert_eq!(loaded.deadline(), Some(Duration::from_secs(20)));
    }

    #[test]
    fn rendered_config_masks_token() {
        let config = Config {
            token: Some("ghp_secret".to_string()),
            ..Config::default()
        };
        let rendered = render_config(&config).unwrap();
        assert!(!rendered.contains("ghp_secret"));
        assert!(rendered.contains("token = \"********\""));
        assert!(rendered.contains("[install]"));
    }

    #[test]
    fn missing_file_error_mentions_init() {
        let tmp = TempDir::new().unwrap();
        let err = load_config_from(&tmp.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("skillscout config init"));
    }
}
