//! CV document discovery.
//!
//! Resolves a load target (a single file or a directory tree) into
//! the list of documents to chunk. Directories are filtered with
//! glob patterns and a size limit; unreadable entries are logged
//! and skipped.

use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::core::error::{CvragError, Result};

/// Walks a load target and yields matching documents
#[derive(Debug, Clone)]
pub struct DocumentWalker {
    /// Patterns to include (e.g., "*.txt")
    include_patterns: Vec<Pattern>,

    /// Patterns to exclude (e.g., "**/.git/**")
    exclude_patterns: Vec<Pattern>,

    /// Maximum document size in bytes
    max_file_size_bytes: u64,
}

fn compile(patterns: Vec<String>, kind: &str) -> Result<Vec<Pattern>> {
    patterns
        .into_iter()
        .map(|p| {
            Pattern::new(&p)
                .map_err(|e| CvragError::ConfigError(format!("Invalid {kind} pattern '{p}': {e}")))
        })
        .collect()
}

impl DocumentWalker {
    /// Create a new walker.
    ///
    /// Fails with a `ConfigError` if any pattern is not valid glob
    /// syntax.
    pub fn new(
        include_patterns: Vec<String>,
        exclude_patterns: Vec<String>,
        max_file_size_mb: usize,
    ) -> Result<Self> {
        Ok(Self {
            include_patterns: compile(include_patterns, "include")?,
            exclude_patterns: compile(exclude_patterns, "exclude")?,
            max_file_size_bytes: (max_file_size_mb as u64).saturating_mul(1024 * 1024),
        })
    }

    /// Collect documents under `target`, sorted by path.
    ///
    /// A file target is returned as-is (patterns are not applied,
    /// the size limit is). A missing target is an `InvalidPath`.
    pub fn collect(&self, target: &Path) -> Result<Vec<PathBuf>> {
        let metadata = target.metadata().map_err(|e| {
            CvragError::InvalidPath(format!("{}: {e}", target.display()))
        })?;

        if metadata.is_file() {
            if metadata.len() > self.max_file_size_bytes {
                return Err(CvragError::InvalidPath(format!(
                    "{} is larger than the {} byte limit",
                    target.display(),
                    self.max_file_size_bytes
                )));
            }
            return Ok(vec![target.to_path_buf()]);
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(target)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| self.should_descend(e, target))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Walk error: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            if let Ok(metadata) = entry.metadata() {
                if metadata.len() > self.max_file_size_bytes {
                    tracing::debug!(
                        "Skipping large document: {:?} ({} bytes)",
                        entry.path(),
                        metadata.len()
                    );
                    continue;
                }
            }

            let relative = entry.path().strip_prefix(target).unwrap_or(entry.path());
            if self.matches(relative) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        Ok(files)
    }

    /// Skip hidden and excluded directories, never the root.
    fn should_descend(&self, entry: &DirEntry, root: &Path) -> bool {
        let path = entry.path();
        if path == root || !entry.file_type().is_dir() {
            return true;
        }

        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.starts_with('.'));
        if hidden {
            return false;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        let excluded = self
            .exclude_patterns
            .iter()
            .any(|p| p.matches_path(relative) || p.matches_path(path));
        if excluded {
            tracing::debug!("Skipping excluded directory: {:?}", path);
        }
        !excluded
    }

    /// Match a root-relative path against include/exclude patterns.
    fn matches(&self, relative: &Path) -> bool {
        let file_name = relative.file_name().and_then(|f| f.to_str());

        let included = self.include_patterns.is_empty()
            || self.include_patterns.iter().any(|p| {
                p.matches_path(relative) || file_name.is_some_and(|f| p.matches(f))
            });

        included && !self.exclude_patterns.iter().any(|p| p.matches_path(relative))
    }
}
