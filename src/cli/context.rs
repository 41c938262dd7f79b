//! Context command - assemble context for one request
//!
//! Only the context JSON is written to stdout; progress and logs go to
//! stderr.

use anyhow::{Context as _, Result};
use clap::Args;
use std::path::Path;
use tracing::info;

use nexus_context::config::Config;
use nexus_context::context::memory::Interaction;
use nexus_context::ContextOptions;

#[derive(Args, Debug)]
pub struct ContextArgs {
    /// The request to build context for
    pub query: String,

    /// Repository root (defaults to current directory)
    #[arg(short, long)]
    pub path: Option<String>,

    /// Token budget for the assembled context
    #[arg(short, long)]
    pub max_tokens: Option<usize>,

    /// Leave out the intent-specific analysis block
    #[arg(long)]
    pub no_analysis: bool,

    /// Leave out session memory
    #[arg(long)]
    pub no_memory: bool,

    /// Focus area echoed into the context
    #[arg(short, long)]
    pub focus: Option<String>,

    /// JSON file with earlier interactions to replay into memory
    #[arg(long)]
    pub history: Option<String>,

    /// Print compact JSON instead of pretty JSON
    #[arg(long)]
    pub compact: bool,
}

impl ContextArgs {
    fn options(&self, config: &Config) -> ContextOptions {
        let mut options = ContextOptions::from(&config.context);
        if let Some(max_tokens) = self.max_tokens {
            options.max_tokens = max_tokens;
        }
        options.include_analysis &= !self.no_analysis;
        options.include_memory &= !self.no_memory;
        options.focus_area = self.focus.clone();
        options
    }
}

fn read_history(path: &Path) -> Result<Vec<Interaction>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read history from {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse history from {:?}", path))
}

pub async fn run(config: &Config, args: ContextArgs) -> Result<()> {
    let options = args.options(config);
    let history = match &args.history {
        Some(path) => read_history(Path::new(path))?,
        None => Vec::new(),
    };

    let root = Path::new(args.path.as_deref().unwrap_or("."));
    let (manager, stats) = super::load_project(config, root, config.verbose).await?;
    info!("Loaded {} files", stats.files);

    for interaction in &history {
        manager.update_memory(interaction);
    }

    let context = manager.build_context(&args.query, &options);
    let out = if args.compact {
        serde_json::to_string(&context)
    } else {
        serde_json::to_string_pretty(&context)
    }
    .context("Failed to serialize context")?;
    println!("{}", out);

    Ok(())
}
