use anyhow::Result;
use console::style;
use serde_json::json;
use skillscout_core::traits::Tool;
use skillscout_core::{config::Config, discovery, tools};

pub async fn handle_command(command: SkillsCommands, config: &Config) -> Result<()> {
    match command {
        SkillsCommands::Discover { stacks, repos, json } => {
            discover(stacks, repos, json, config).await
        }
        SkillsCommands::Install {
            repo,
            skills,
            project,
        } => install(repo, skills, project, config).await,
    }
}

async fn discover(
    stacks: Vec<String>,
    repos: Vec<String>,
    json: bool,
    config: &Config,
) -> Result<()> {
    let search = config.search_repos(&repos);
    let result = discovery::create_discoverer(config)
        .discover(&stacks, &search)
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if !result.found.is_empty() {
        println!(
            "{} Found ({})",
            style("✓").green().bold(),
            result.found.len()
        );
        for skill in &result.found {
            match &skill.description {
                Some(desc) => println!(
                    "  {} {} {} {}",
                    style(&skill.skill_name).white().bold(),
                    style("in").dim(),
                    skill.repo,
                    style(format!("- {}", desc)).dim()
                ),
                None => println!(
                    "  {} {} {}",
                    style(&skill.skill_name).white().bold(),
                    style("in").dim(),
                    skill.repo
                ),
            }
        }
        println!();
    }

    if !result.not_found.is_empty() {
        println!(
            "{} Not found ({})",
            style("!").yellow(),
            result.not_found.len()
        );
        for identifier in &result.not_found {
            println!("  {}", identifier);
        }
        println!("  {} {}", style("checked:").dim(), search.join(", "));
        println!();
    }

    if !result.errors.is_empty() {
        println!("{} Errors ({})", style("❌").red(), result.errors.len());
        for error in &result.errors {
            println!("  {}", error);
        }
        println!();
    }

    println!(
        "{} found, {} not found, {} errors",
        result.found.len(),
        result.not_found.len(),
        result.errors.len()
    );

    Ok(())
}

async fn install(
    repo: String,
    skills: Vec<String>,
    project: bool,
    config: &Config,
) -> Result<()> {
    println!("{} Installing from: {}", style("→").cyan(), repo);

    let tool = tools::InstallSkillTool::new(config.install.clone());
    let result = tool
        .execute(json!({ "repo": repo, "skills": skills, "projectLevel": project }))
        .await?;

    if !result.output.is_empty() {
        println!("{}", result.output);
    }
    if !result.success {
        anyhow::bail!(
            "Install failed: {}",
            result.error.unwrap_or_else(|| "unknown error".to_string())
        );
    }

    println!("{} Skills installed", style("✓").green().bold());
    Ok(())
}

#[derive(clap::Subcommand, Clone, Debug)]
pub enum SkillsCommands {
    /// Find which repositories provide a skill for each stack
    Discover {
        #[arg(required = true)]
        stacks: Vec<String>,
        /// Repository to search, in priority order (repeatable)
        #[arg(short, long = "repo")]
        repos: Vec<String>,
        /// Print the raw result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Install skills from an allow-listed repository via `npx skills add`
    Install {
        repo: String,
        #[arg(required = true)]
        skills: Vec<String>,
        /// Install into the current project instead of globally
        #[arg(long)]
        project: bool,
    },
}
