//! Info command - show system information

use anyhow::Result;

use nexus_context::config::{self, Config};

pub fn run(config: &Config) -> Result<()> {
    println!("nexus-ctx v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("System Information:");
    println!("  OS: {} {}", std::env::consts::OS, std::env::consts::ARCH);

    println!();
    println!("Configuration:");
    println!("  Config file: {}", config_file());
    println!("  Max tokens: {}", config.context.max_tokens);
    println!("  Max file size: {} MB", config.index.max_file_size_mb);
    println!("  Concurrent loads: {}", config.index.max_concurrent_loads);
    println!("  Respect .gitignore: {}", config.index.respect_gitignore);

    Ok(())
}

fn config_file() -> String {
    config::config_path()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}
