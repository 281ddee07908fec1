use crate::config::InstallConfig;
use crate::skills::RepositoryRef;
use crate::tools::{extract_bool_arg_opt, extract_string_arg, extract_string_list_arg};
use crate::traits::{Tool, ToolResult};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Runs external programs. Spawn failures (program missing) are errors.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String]) -> anyhow::Result<CommandOutput>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[String]) -> anyhow::Result<CommandOutput> {
        let output = tokio::process::Command::new(program)
            .args(args)
            .output()
            .await?;

        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: if output.status.success() || !output.stderr.is_empty() {
                String::from_utf8_lossy(&output.stderr).to_string()
            } else {
                format!("Command failed with status: {}", output.status)
            },
        })
    }
}

/// A validated `npx skills add` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPlan {
    pub repo: RepositoryRef,
    pub skills: Vec<String>,
    pub project_level: bool,
    pub agent: String,
}

impl InstallPlan {
    pub fn scope(&self) -> &'static str {
        if self.project_level { "project" } else { "global" }
    }

    /// Arguments for `npx`. `-y` stays last.
    pub fn npx_args(&self) -> Vec<String> {
        let mut args = vec![
            "skills".to_string(),
            "add".to_string(),
            self.repo.github_url(),
        ];
        if !self.project_level {
            args.push("-g".to_string());
        }
        args.push("-a".to_string());
        args.push(self.agent.clone());
        for skill in &self.skills {
            args.push("--skill".to_string());
            args.push(skill.clone());
        }
        args.push("-y".to_string());
        args
    }
}

pub struct InstallSkillTool {
    install: InstallConfig,
    runner: Arc<dyn CommandRunner>,
}

impl InstallSkillTool {
    pub fn new(install: InstallConfig) -> Self {
        Self {
            install,
            runner: Arc::new(SystemRunner),
        }
    }

    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Normalizes `repo` and checks it against the allow-list.
    pub fn plan(
        &self,
        repo: &str,
        skills: Vec<String>,
        project_level: bool,
    ) -> Result<InstallPlan, String> {
        let normalized = RepositoryRef::normalize(repo)
            .map(RepositoryRef::without_git_suffix)
            .map_err(|_| format!("Invalid repo format: {}", repo))?;

        if !self.is_allowed(&normalized) {
            return Err(format!(
                "Repository not allowlisted: {}. Only allowlisted repositories can be used.",
                normalized
            ));
        }

        let skills: Vec<String> = skills
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if skills.is_empty() {
            return Err("No skills specified".to_string());
        }

        Ok(InstallPlan {
            repo: normalized,
            skills,
            project_level,
            agent: self.install.agent.clone(),
        })
    }

    fn is_allowed(&self, repo: &RepositoryRef) -> bool {
        let wanted = repo.to_string();
        self.install.allowed_repos.iter().any(|allowed| {
            RepositoryRef::normalize(allowed)
                .map(RepositoryRef::without_git_suffix)
                .is_ok_and(|a| a.to_string().eq_ignore_ascii_case(&wanted))
        })
    }

    async fn require(&self, program: &str, missing: &str) -> Result<(), String> {
        match self.runner.run(program, &["--version".to_string()]).await {
            Ok(output) if output.success => Ok(()),
            _ => Err(missing.to_string()),
        }
    }
}

#[async_trait]
impl Tool for InstallSkillTool {
    fn name(&self) -> &str {
        "install_skill"
    }

    fn description(&self) -> &str {
        "Install skills from a GitHub repository. Default: global installation (shared across projects). Use projectLevel=true for project-specific installation."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "repo": {
                    "type": "string",
                    "description": "GitHub repo - shorthand 'owner/repo' or full URL 'https://github.com/owner/repo'"
                },
                "skills": {
                    "anyOf": [
                        { "type": "string" },
                        { "type": "array", "items": { "type": "string" } }
                    ],
                    "description": "Skill name(s) to install (e.g., 'nextjs' or ['nextjs', 'react'])"
                },
                "projectLevel": {
                    "type": "boolean",
                    "description": "Install into the current project instead of globally (default: false)"
                }
            },
            "required": ["repo", "skills"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let repo = extract_string_arg(&args, "repo")?;
        let skills = extract_string_list_arg(&args, "skills")?;
        let project_level = extract_bool_arg_opt(&args, "projectLevel", false);

        let plan = match self.plan(&repo, skills, project_level) {
            Ok(plan) => plan,
            Err(e) => return Ok(ToolResult::error(e)),
        };

        if let Err(e) = self
            .require("node", "Node.js is not installed. Please install Node.js first.")
            .await
        {
            return Ok(ToolResult::error(e));
        }
        if let Err(e) = self
            .require("npm", "npm is not installed. Please install npm first.")
            .await
        {
            return Ok(ToolResult::error(e));
        }

        info!(repo = %plan.repo, skills = ?plan.skills, scope = plan.scope(), "Installing skills");

        let failure = match self.runner.run("npx", &plan.npx_args()).await {
            Ok(output) if output.success => None,
            Ok(output) => Some(output.stderr.trim().to_string()),
            Err(e) => Some(e.to_string()),
        };

        let lines: Vec<String> = plan
            .skills
            .iter()
            .map(|skill| match &failure {
                None => format!("- {}: OK", skill),
                Some(reason) => format!("- {}: FAILED ({})", skill, reason),
            })
            .collect();
        let report = format!(
            "Installed {} skill(s) from {} ({}):\n{}",
            plan.skills.len(),
            repo,
            plan.scope(),
            lines.join("\n")
        );

        Ok(match failure {
            None => ToolResult::success(report),
            Some(reason) => ToolResult::failure_with_output(report, reason),
        })
    }
}
