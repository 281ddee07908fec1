use crate::config::Config;
use crate::discovery::{Discoverer, DiscoveryResult, create_discoverer};
use crate::skills::skill_name_for;
use crate::tools::{extract_string_list_arg, extract_string_list_arg_opt};
use crate::traits::{Tool, ToolResult};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

type DiscovererFactory = Arc<dyn Fn(&Config) -> Discoverer + Send + Sync>;

pub struct DiscoverSkillsTool {
    config: Config,
    factory: DiscovererFactory,
}

impl DiscoverSkillsTool {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            factory: Arc::new(create_discoverer),
        }
    }

    pub fn with_factory(
        mut self,
        factory: impl Fn(&Config) -> Discoverer + Send + Sync + 'static,
    ) -> Self {
        self.factory = Arc::new(factory);
        self
    }
}

#[async_trait]
impl Tool for DiscoverSkillsTool {
    fn name(&self) -> &str {
        "discover_skills"
    }

    fn description(&self) -> &str {
        "Discover which skills are available for detected tech stacks in remote GitHub repositories"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "stacks": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Detected stack names (e.g., ['Next.js', 'React', 'Docker'])"
                },
                "repos": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Override repository list (default: SKILL_REPOS env or the configured list)"
                }
            },
            "required": ["stacks"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let stacks = extract_string_list_arg(&args, "stacks")?;
        let repos = extract_string_list_arg_opt(&args, "repos")?;

        let search = self.config.search_repos(&repos);
        let discoverer = (self.factory)(&self.config);

        match discoverer.discover(&stacks, &search).await {
            Ok(result) => Ok(ToolResult::success(render_report(&result, &search))),
            Err(e) => Ok(ToolResult::error(format!("Skill discovery failed: {}", e))),
        }
    }
}

/// Markdown summary of a discovery run followed by the raw result as JSON.
pub fn render_report(result: &DiscoveryResult, searched: &[String]) -> String {
    let mut output: Vec<String> = vec!["## Skill Discovery Results\n".to_string()];

    if !result.found.is_empty() {
        output.push("**Found:**".to_string());
        for skill in &result.found {
            let desc = skill
                .description
                .as_ref()
                .map(|d| format!(" - \"{}\"", d))
                .unwrap_or_default();
            output.push(format!("- {}: found in {}{}", skill.skill_name, skill.repo, desc));
        }
        output.push(String::new());
    }

    if !result.not_found.is_empty() {
        output.push("**Not Found:**".to_string());
        for identifier in &result.not_found {
            output.push(format!(
                "- {} ({}): NOT FOUND (checked: {})",
                skill_name_for(identifier),
                identifier,
                searched.join(", ")
            ));
        }
        output.push(String::new());
    }

    if !result.errors.is_empty() {
        output.push("**Errors:**".to_string());
        for error in &result.errors {
            output.push(format!("- {}", error));
        }
        output.push(String::new());
    }

    output.push(format!(
        "**Summary:** {} found, {} not found, {} errors",
        result.found.len(),
        result.not_found.len(),
        result.errors.len()
    ));

    output.push("\n```json".to_string());
    output.push(serde_json::to_string_pretty(result).unwrap_or_default());
    output.push("```".to_string());

    output.join("\n")
}
