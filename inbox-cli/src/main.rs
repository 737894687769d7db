//! Main entry point for the Inbox CLI.

use clap::{Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use inbox::config::Config;
use std::path::PathBuf;

mod commands;
mod logging;

/// Inbox CLI
#[derive(Parser)]
#[command(name = "Inbox CLI")]
#[command(about = "Command-line interface for the inbox event reducer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// How the conversation view is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Subcommands for the Inbox CLI
#[derive(Subcommand)]
enum Commands {
    /// Fold an event log and print the resulting conversations
    Replay {
        /// JSON-lines event log, or `-` for stdin
        #[arg(
            long,
            short,
            help = "Path to a JSON-lines event log (one {\"kind\", \"data\"} object per line), or '-' for stdin"
        )]
        events: PathBuf,

        /// Path to the configuration file (optional)
        #[arg(
            long,
            short,
            help = "Path to the configuration file (e.g., inbox.toml, inbox.yaml or inbox.json). If not provided, defaults will be used."
        )]
        config: Option<PathBuf>,

        /// Extra assignees to hide, on top of the configured block-list
        #[arg(long, short, help = "Hide conversations assigned to this user (repeatable)")]
        block: Vec<String>,

        /// Output format for the conversation view
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,

        /// Print Prometheus metrics to stderr once the replay finishes
        #[arg(long)]
        metrics: bool,
    },

    /// Print a default configuration file
    Config {
        /// Format of the configuration file to generate (toml, yaml or json). Defaults to toml.
        #[arg(
            long,
            short,
            help = "Format of the configuration file to generate (toml, yaml or json). Defaults to toml."
        )]
        format: Option<String>,
    },

    /// Generate shell completion scripts for the CLI
    Completion {
        /// The shell type for which to generate the completion script (e.g., bash, zsh, fish, powershell)
        #[arg(
            long,
            short,
            help = "The shell type for which to generate the completion script (e.g., bash, zsh, fish, powershell)"
        )]
        shell: clap_complete::Shell,
    },
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Replay {
            events,
            config,
            block,
            output,
            metrics,
        } => {
            let resolved_config = Config::load_config(config.as_deref())?;
            logging::initialize_tracing(&resolved_config.logging);
            commands::replay::run(
                &resolved_config,
                &commands::replay::ReplayOptions {
                    events,
                    block,
                    output,
                    metrics,
                },
            )?;
        }
        Commands::Config { format } => {
            let format = format.unwrap_or_else(|| "toml".to_string());
            commands::config::generate_config(&format)?;
        }
        Commands::Completion { shell } => {
            commands::completion::generate_completion(shell);
        }
    }

    Ok(())
}
