//! Document loading pipeline orchestration.
//!
//! Coordinates the end-to-end loading workflow:
//! 1. Ensure the target index exists and is ready
//! 2. Walk the document tree
//! 3. Read and chunk each document
//! 4. Upsert records in batches
//! 5. Optionally wait for the records to become searchable

use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::core::config::Config;
use crate::core::error::{CvragError, Result};
use crate::core::indexer::{Chunker, DocumentWalker};
use crate::core::providers::{IndexCatalog, VectorIndex};
use crate::core::types::{IndexRecord, IndexSpec, LoadStats};

/// Orchestrates the loading pipeline
pub struct LoadingPipeline {
    walker: DocumentWalker,
    chunker: Chunker,
    spec: IndexSpec,
    namespace: String,
    category: String,
    batch_size: usize,
    settle: Duration,
}

impl LoadingPipeline {
    /// Create a new loading pipeline.
    ///
    /// The chunk configuration and glob patterns are validated here,
    /// before any I/O happens.
    pub fn new(config: &Config) -> Result<Self> {
        let chunker = Chunker::new(config.chunking.chunk_size, config.chunking.overlap)?;
        let walker = DocumentWalker::new(
            config.loading.include_patterns.clone(),
            config.loading.exclude_patterns.clone(),
            config.loading.max_file_size_mb,
        )?;

        if config.loading.batch_size == 0 {
            return Err(CvragError::ConfigError(
                "batch_size must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            walker,
            chunker,
            spec: config.index.spec(),
            namespace: config.index.namespace.clone(),
            category: config.index.category.clone(),
            batch_size: config.loading.batch_size,
            settle: Duration::from_secs(config.loading.settle_secs),
        })
    }

    pub fn chunker(&self) -> &Chunker {
        &self.chunker
    }

    /// Load every document under `target` into the configured index.
    ///
    /// Documents that cannot be read as UTF-8 are logged and counted
    /// as skipped. Errors from the index service abort the load.
    pub async fn load(&self, catalog: &dyn IndexCatalog, target: &Path) -> Result<LoadStats> {
        let started_at = Utc::now();
        let start = Instant::now();

        // Step 1: Make sure the index is there
        let index = catalog.ensure_index(&self.spec).await?;

        // Step 2: Collect documents
        tracing::info!("Collecting documents from {:?}", target);
        let files = self.walker.collect(target)?;
        tracing::info!("Found {} documents to load", files.len());
        let root = if target.is_file() {
            target.parent().unwrap_or(target)
        } else {
            target
        };
        let names = document_names(root, &files);

        // Step 3: Read, chunk and upsert
        let mut documents_loaded = 0;
        let mut documents_skipped = 0;
        let mut chunks_upserted = 0;
        let mut batch: Vec<IndexRecord> = Vec::with_capacity(self.batch_size);

        for (path, document) in files.iter().zip(&names) {
            let records = match self.process_document(path, document) {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!("Skipping {:?}: {}", path, e);
                    documents_skipped += 1;
                    continue;
                }
            };

            tracing::debug!("Chunked {:?} into {} records", path, records.len());
            documents_loaded += 1;

            for record in records {
                batch.push(record);
                if batch.len() == self.batch_size {
                    chunks_upserted += self.flush(index.as_ref(), &mut batch).await?;
                }
            }
        }
        chunks_upserted += self.flush(index.as_ref(), &mut batch).await?;

        // Step 4: Let the service catch up
        if chunks_upserted > 0 && !self.settle.is_zero() {
            tracing::info!(
                "Waiting {}s for records to become searchable",
                self.settle.as_secs()
            );
            tokio::time::sleep(self.settle).await;
        }

        let duration_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            "Loading complete: {} documents loaded, {} skipped, \
             {} chunks upserted in {}ms",
            documents_loaded,
            documents_skipped,
            chunks_upserted,
            duration_ms
        );

        Ok(LoadStats {
            documents_loaded,
            documents_skipped,
            chunks_upserted,
            duration_ms,
            index: self.spec.name.clone(),
            namespace: self.namespace.clone(),
            started_at,
        })
    }

    /// Read one document and turn its chunks into records
    fn process_document(&self, path: &Path, document: &str) -> Result<Vec<IndexRecord>> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::InvalidData {
                CvragError::LoadFailed(format!("not valid UTF-8: {path:?}"))
            } else {
                CvragError::LoadFailed(format!("failed to read {path:?}: {e}"))
            }
        })?;

        Ok(self
            .chunker
            .chunks(&contents)
            .map(|chunk| IndexRecord::from_chunk(document, &chunk, &self.category))
            .collect())
    }

    /// Upsert and clear the pending batch, returning how many went out
    async fn flush(&self, index: &dyn VectorIndex, batch: &mut Vec<IndexRecord>) -> Result<usize> {
        if batch.is_empty() {
            return Ok(0);
        }

        index.upsert(&self.namespace, batch).await?;
        let count = batch.len();
        tracing::info!(
            "Upserted {} records into {}/{} (last: {})",
            count,
            index.name(),
            self.namespace,
            batch.last().map(|r| r.id.as_str()).unwrap_or_default()
        );
        batch.clear();
        Ok(count)
    }
}

/// Name each document for its record ids.
///
/// A document is named by its file stem. Stems shared by several files
/// fall back to the path relative to `root`, extension included, so
/// `a/cv.txt` and `b/cv.txt` never overwrite each other's records.
fn document_names(root: &Path, files: &[PathBuf]) -> Vec<String> {
    let relative = |path: &PathBuf| {
        path.strip_prefix(root)
            .unwrap_or(path.as_path())
            .to_string_lossy()
            .replace('\\', "/")
    };

    let stems: Vec<String> = files
        .iter()
        .map(|path| {
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| relative(path))
        })
        .collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for stem in &stems {
        *counts.entry(stem.as_str()).or_default() += 1;
    }

    let names: Vec<String> = files
        .iter()
        .zip(&stems)
        .map(|(path, stem)| {
            if counts[stem.as_str()] > 1 {
                relative(path)
            } else {
                stem.clone()
            }
        })
        .collect();

    // A stem can still equal another file's relative path
    let unique: HashSet<&str> = names.iter().map(String::as_str).collect();
    if unique.len() == names.len() {
        names
    } else {
        files.iter().map(relative).collect()
    }
}
