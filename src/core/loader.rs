//! Repository listing entries and the file content loader seam

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::LoadError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// One entry of a repository tree listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoEntry {
    /// Repository-relative path with `/` separators
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub size: u64,
}

impl RepoEntry {
    pub fn file(path: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
            size,
        }
    }

    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Directory,
            size: 0,
        }
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// Loads file text by repository-relative path
pub trait FileLoader: Send + Sync {
    fn load(&self, path: &str) -> impl Future<Output = Result<String, LoadError>> + Send;
}

/// Reads files below a root directory
#[derive(Debug, Clone)]
pub struct FsLoader {
    root: PathBuf,
    max_bytes: u64,
}

impl FsLoader {
    pub fn new(root: impl Into<PathBuf>, max_bytes: u64) -> Self {
        Self {
            root: root.into(),
            max_bytes,
        }
    }
}

impl FileLoader for FsLoader {
    async fn load(&self, path: &str) -> Result<String, LoadError> {
        let full_path = self.root.join(path);
        let io_error = |source: std::io::Error| {
            if source.kind() == ErrorKind::NotFound {
                LoadError::NotFound(path.to_string())
            } else {
                LoadError::Io {
                    path: path.to_string(),
                    source,
                }
            }
        };

        let metadata = tokio::fs::metadata(&full_path).await.map_err(io_error)?;
        if metadata.len() > self.max_bytes {
            return Err(LoadError::TooLarge {
                path: path.to_string(),
                limit: self.max_bytes,
            });
        }

        tokio::fs::read_to_string(&full_path).await.map_err(io_error)
    }
}

/// In-memory file source, keyed by repository-relative path
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    files: HashMap<String, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    /// Listing entries for every held file, sorted by path
    pub fn listing(&self) -> Vec<RepoEntry> {
        let mut entries: Vec<RepoEntry> = self
            .files
            .iter()
            .map(|(path, content)| RepoEntry::file(path.clone(), content.len() as u64))
            .collect();
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        entries
    }
}

impl FileLoader for MemoryLoader {
    async fn load(&self, path: &str) -> Result<String, LoadError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fs_loader_reads_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src/app.js"), "console.log(1);").unwrap();

        let loader = FsLoader::new(dir.path(), 1024);
        assert_eq!(loader.load("src/app.js").await.unwrap(), "console.log(1);");
        assert!(loader.load("src/missing.js").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_fs_loader_enforces_size_limit() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("big.js"), "x".repeat(64)).unwrap();

        let loader = FsLoader::new(dir.path(), 16);
        assert!(matches!(
            loader.load("big.js").await,
            Err(LoadError::TooLarge { limit: 16, .. })
        ));
    }

    #[tokio::test]
    async fn test_memory_loader() {
        let loader = MemoryLoader::new().with_file("b.js", "b").with_file("a.js", "a");
        let paths: Vec<_> = loader.listing().into_iter().map(|e| e.path).collect();
        assert_eq!(paths, vec!["a.js", "b.js"]);
        assert_eq!(loader.load("a.js").await.unwrap(), "a");
        assert!(loader.load("c.js").await.is_err());
    }
}
