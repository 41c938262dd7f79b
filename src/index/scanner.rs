//! Local directory listing
//!
//! Produces the repository tree listing the analyzer consumes, skipping
//! hidden entries, configured exclude patterns and (optionally) anything
//! matched by the root `.gitignore`.

use anyhow::{Context, Result};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::IndexConfig;
use crate::core::loader::RepoEntry;

/// List every file and directory below `root`, relative to it
pub fn scan_directory(root: &Path, config: &IndexConfig) -> Result<Vec<RepoEntry>> {
    let root = root
        .canonicalize()
        .with_context(|| format!("Invalid path: {}", root.display()))?;

    let excludes = build_excludes(&root, &config.exclude_patterns);
    let gitignore = if config.respect_gitignore {
        load_gitignore(&root)
    } else {
        Gitignore::empty()
    };

    let mut entries = Vec::new();

    for entry in WalkDir::new(&root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 {
                return true;
            }

            let path = e.path();
            let is_dir = e.file_type().is_dir();

            // Skip hidden files and directories
            if e.file_name().to_string_lossy().starts_with('.') {
                return false;
            }
            if excludes.matched(path, is_dir).is_ignore() {
                return false;
            }
            !gitignore.matched(path, is_dir).is_ignore()
        })
    {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if entry.depth() == 0 {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(&root) else {
            continue;
        };
        let relative = relative.to_string_lossy().replace('\\', "/");

        if entry.file_type().is_dir() {
            entries.push(RepoEntry::directory(relative));
        } else if entry.file_type().is_file() {
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            entries.push(RepoEntry::file(relative, size));
        }
    }

    debug!("Scanned {} entries under {}", entries.len(), root.display());
    Ok(entries)
}

fn build_excludes(root: &Path, patterns: &[String]) -> Gitignore {
    let mut builder = GitignoreBuilder::new(root);
    for pattern in patterns {
        if let Err(e) = builder.add_line(None, pattern) {
            warn!("Ignoring invalid exclude pattern {:?}: {}", pattern, e);
        }
    }
    builder.build().unwrap_or_else(|e| {
        warn!("Failed to build exclude matcher: {}", e);
        Gitignore::empty()
    })
}

fn load_gitignore(root: &Path) -> Gitignore {
    let gitignore_path = root.join(".gitignore");
    if !gitignore_path.exists() {
        return Gitignore::empty();
    }

    let (gitignore, error) = Gitignore::new(&gitignore_path);
    if let Some(e) = error {
        warn!("Partially invalid .gitignore: {}", e);
    }
    gitignore
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::loader::EntryKind;

    fn write(root: &Path, path: &str, content: &str) {
        let full = root.join(path);
        std::fs::create_dir_all(full.parent().unwrap()).unwrap();
        std::fs::write(full, content).unwrap();
    }

    #[test]
    fn test_scan_lists_relative_entries() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/app.js", "app");
        write(dir.path(), "package.json", "{}");

        let entries = scan_directory(dir.path(), &IndexConfig::default()).unwrap();
        let paths: Vec<_> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["package.json", "src", "src/app.js"]);
        assert_eq!(entries[1].kind, EntryKind::Directory);
        assert_eq!(entries[2].size, 3);
    }

    #[test]
    fn test_scan_skips_hidden_excluded_and_gitignored() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/app.js", "app");
        write(dir.path(), "node_modules/react/index.js", "react");
        write(dir.path(), ".git/HEAD", "ref");
        write(dir.path(), "generated/out.js", "out");
        write(dir.path(), "yarn.lock", "lock");
        write(dir.path(), ".gitignore", "generated/\n");

        let entries = scan_directory(dir.path(), &IndexConfig::default()).unwrap();
        let paths: Vec<_> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["src", "src/app.js"]);

        let config = IndexConfig {
            respect_gitignore: false,
            ..IndexConfig::default()
        };
        let entries = scan_directory(dir.path(), &config).unwrap();
        assert!(entries.iter().any(|e| e.path == "generated/out.js"));
    }
}
