use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use skillscout_core::{config, tools};
use tracing_subscriber::EnvFilter;
mod skills;

#[derive(Parser)]
#[command(name = "skillscout")]
#[command(about = "skillscout - Discover and install agent skills from GitHub", long_about = None)]
struct Cli {
    /// Log debug output to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Skills(skills::SkillsCommands),
    /// List the available tools and their parameter schemas
    Tools,
    /// Run a tool with JSON arguments
    Call {
        tool: String,
        #[arg(default_value = "{}")]
        args: String,
    },
    /// Manage ~/.skillscout/config.toml
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Write the default configuration
    Init {
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Skills(command) => {
            let config = config::Config::load_or_init()?;
            skills::handle_command(command, &config).await?;
        }
        Commands::Tools => {
            let config = config::Config::load_or_init()?;
            let specs = tools::default_registry(&config).get_specs();
            println!("{}", serde_json::to_string_pretty(&specs)?);
        }
        Commands::Call { tool, args } => {
            let config = config::Config::load_or_init()?;
            let args: serde_json::Value = serde_json::from_str(&args)
                .map_err(|e| anyhow::anyhow!("Invalid JSON arguments: {}", e))?;

            let result = tools::default_registry(&config).execute(&tool, args).await;
            if !result.output.is_empty() {
                println!("{}", result.output);
            }
            if !result.success {
                let error = result.error.unwrap_or_else(|| "unknown error".to_string());
                eprintln!("❌ Error: {}", error);
                anyhow::bail!("Tool '{}' failed", tool);
            }
        }
        Commands::Config(ConfigCommands::Init { force }) => {
            if config::config_exists() && !force {
                println!(
                    "{} Config already exists at {} (use --force to overwrite)",
                    style("!").yellow(),
                    config::get_config_path().display()
                );
                return Ok(());
            }
            let path = config::save_config(&config::Config::default())?;
            println!(
                "{} Config written to {}",
                style("✓").green().bold(),
                path.display()
            );
        }
        Commands::Config(ConfigCommands::Show) => {
            let config = config::Config::load_or_init()?;
            tracing::debug!(path = %config::get_config_path().display(), "Loaded config");
            println!("# {}", config::get_config_path().display());
            println!("{}", config::render_config(&config)?);
        }
    }

    Ok(())
}
