//! Batch conversion of a directory tree.
//!
//! The [`BatchScheduler`] walks a directory recursively, collects files whose
//! extension belongs to a supported format, and converts them either
//! sequentially or through a semaphore-bounded worker pool. One file's
//! failure never aborts the others; the result vector always holds exactly
//! one entry per discovered file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};

use crate::engine::{ConversionEngine, ConversionResult};

/// Runs [`ConversionEngine::convert`] over every convertible file under a
/// directory.
#[derive(Debug, Clone)]
pub struct BatchScheduler {
    engine: Arc<ConversionEngine>,
}

impl BatchScheduler {
    pub fn new(engine: Arc<ConversionEngine>) -> Self {
        Self { engine }
    }

    /// Convert every convertible file under `root` to `target_format`.
    ///
    /// - A missing or non-directory `root` yields a single synthetic failed
    ///   result naming it.
    /// - Zero qualifying files yields an empty vector, not an error.
    /// - In parallel mode results arrive in completion order; callers must
    ///   not assume correspondence with discovery order.
    pub async fn convert_folder(
        &self,
        root: &Path,
        target_format: &str,
        parallel: bool,
    ) -> Vec<ConversionResult> {
        if !root.is_dir() {
            let message = format!("directory not found: {}", root.display());
            tracing::error!("{message}");
            return vec![ConversionResult::failed(root, message)];
        }

        let files = self.discover(root);
        if files.is_empty() {
            tracing::warn!("no convertible files found in {}", root.display());
            return Vec::new();
        }

        let total = files.len();
        tracing::info!("found {total} convertible files in {}", root.display());

        if parallel && total > 1 {
            self.convert_parallel(files, target_format).await
        } else {
            self.convert_sequential(files, target_format).await
        }
    }

    /// Recursively collect files whose extension belongs to a supported
    /// format, in walk order.
    fn discover(&self, root: &Path) -> Vec<PathBuf> {
        let catalog = self.engine.catalog();
        walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(|e| match e {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::warn!(error = %err, "error walking directory");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| catalog.matches_extension(path))
            .collect()
    }

    async fn convert_sequential(
        &self,
        files: Vec<PathBuf>,
        target_format: &str,
    ) -> Vec<ConversionResult> {
        let total = files.len();
        let mut results = Vec::with_capacity(total);

        for (done, file) in files.into_iter().enumerate() {
            tracing::info!(
                file = %file.display(),
                current = done + 1,
                total,
                "converting"
            );
            let result = self.engine.convert(&file, target_format).await;
            results.push(result);
        }

        results
    }

    async fn convert_parallel(
        &self,
        files: Vec<PathBuf>,
        target_format: &str,
    ) -> Vec<ConversionResult> {
        let total = files.len();
        let max_workers = self.engine.config().max_workers.max(1);
        let semaphore = Arc::new(Semaphore::new(max_workers));
        let (tx, mut rx) = mpsc::channel::<ConversionResult>(total);

        for file in files {
            let engine = self.engine.clone();
            let sem = semaphore.clone();
            let tx = tx.clone();
            let format = target_format.to_string();

            tokio::spawn(async move {
                let _permit = sem.acquire().await.expect("semaphore closed");
                let result = engine.convert(&file, &format).await;
                // The receiver only goes away if the caller was dropped.
                let _ = tx.send(result).await;
            });
        }
        drop(tx);

        // Collect in completion order.
        let mut results = Vec::with_capacity(total);
        while let Some(result) = rx.recv().await {
            tracing::info!(
                file = %result.input_path.display(),
                completed = results.len() + 1,
                total,
                success = result.success,
                "conversion finished"
            );
            results.push(result);
        }

        results
    }
}
