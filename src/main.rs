//! nexus-ctx - relevance-ranked, token-budgeted codebase context
//!
//! Analyzes a repository and assembles the context a prompt builder needs
//! for a natural-language request.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use nexus_context::config;

mod cli;

/// nexus-ctx - Codebase context for AI prompts
#[derive(Parser)]
#[command(name = "nexus-ctx")]
#[command(author = "Mustafa Saraç <mustafa@mustafasarac.com>")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Relevance-ranked, token-budgeted codebase context", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "NEXUS_CTX_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a repository and summarize what was found
    Analyze {
        /// Repository root (defaults to current directory)
        path: Option<String>,

        /// Print the full analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Assemble context for a request and print it as JSON
    Context(cli::context::ContextArgs),

    /// Report project health
    Health {
        /// Repository root (defaults to current directory)
        path: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Initialize configuration file
        #[arg(long)]
        init: bool,
    },

    /// Show version and system info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = config::load_config(cli.config.as_deref())?;
    config.verbose = cli.verbose;

    info!("nexus-ctx v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Analyze { path, json } => {
            cli::analyze::run(&config, path.as_deref(), json).await?;
        }
        Commands::Context(args) => {
            cli::context::run(&config, args).await?;
        }
        Commands::Health { path, json } => {
            cli::health::run(&config, path.as_deref(), json).await?;
        }
        Commands::Config { show, init } => {
            if init {
                config::init_config()?;
            } else if show {
                config::show_config(&config)?;
            }
        }
        Commands::Info => {
            cli::info::run(&config)?;
        }
    }

    Ok(())
}
