//! CLI command implementations

pub mod analyze;
pub mod context;
pub mod health;
pub mod info;
mod ui;

use anyhow::{Context as _, Result};
use indicatif::ProgressBar;
use std::path::Path;
use std::sync::Arc;

use nexus_context::config::Config;
use nexus_context::core::loader::{FileLoader, FsLoader};
use nexus_context::error::LoadError;
use nexus_context::index::scanner::scan_directory;
use nexus_context::index::IndexStats;
use nexus_context::ContextManager;

/// Advances a progress bar as files finish loading
struct ProgressLoader<L> {
    inner: L,
    bar: ProgressBar,
}

impl<L: FileLoader> FileLoader for ProgressLoader<L> {
    async fn load(&self, path: &str) -> Result<String, LoadError> {
        let result = self.inner.load(path).await;
        self.bar.set_message(path.to_string());
        self.bar.inc(1);
        result
    }
}

/// Scan and analyze the repository at `path`
pub async fn load_project(
    config: &Config,
    path: &Path,
    show_progress: bool,
) -> Result<(ContextManager, IndexStats)> {
    let root = path
        .canonicalize()
        .with_context(|| format!("Invalid path: {}", path.display()))?;

    let listing = scan_directory(&root, &config.index)?;
    let file_count = listing.iter().filter(|e| e.is_file()).count() as u64;

    let bar = if show_progress {
        ui::create_progress_bar(file_count)
    } else {
        ProgressBar::hidden()
    };
    let loader = ProgressLoader {
        inner: FsLoader::new(&root, config.index.max_file_bytes()),
        bar: bar.clone(),
    };

    let manager = ContextManager::new(config.index.max_concurrent_loads);
    let stats = manager.analyze_repository(&listing, Arc::new(loader)).await;
    bar.finish_and_clear();

    Ok((manager, stats))
}
