use super::classifier::PageClassifier;
use super::fetcher::{FetchError, PageSource};
use crate::metrics::Metrics;
use crate::models::{CatalogRoot, DetailPageResult, DirtyModSet};
use indexmap::IndexSet;
use regex::Regex;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Builds the set of dirty plugin filenames from a mod list.
///
/// The index page is fetched first; every `"/mods/..."` link on it is then
/// fetched and classified on its own task, at most `max_workers` at a time.
/// Workers return their [`DetailPageResult`] and the coordinating task does
/// the union, so nothing is shared mutably between workers.
///
/// The first failed fetch aborts the remaining workers and fails the scan.
pub struct CatalogScanner<S> {
    source: Arc<S>,
    classifier: Arc<PageClassifier>,
    metrics: Arc<Metrics>,
    max_workers: usize,
    link_pattern: Regex,
}

impl<S: PageSource> CatalogScanner<S> {
    pub fn new(source: S, classifier: PageClassifier, max_workers: usize) -> Self {
        Self {
            source: Arc::new(source),
            classifier: Arc::new(classifier),
            metrics: Arc::new(Metrics::new()),
            max_workers: max_workers.max(1),
            link_pattern: Regex::new(r#""/mods/[^"]+"#).expect("Invalid mod link regex"),
        }
    }

    /// Record page counters into a shared [`Metrics`]
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Relative paths of the mod detail pages linked from the index page,
    /// deduplicated in the order they first appear.
    pub fn detail_paths(&self, index_body: &str) -> Vec<String> {
        self.link_pattern
            .find_iter(index_body)
            .map(|m| m.as_str()[1..].to_string())
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    /// Fetch and classify every mod page linked from the catalog index.
    ///
    /// Waits for all workers; no partial set is returned on failure.
    pub async fn scan(&self, root: &CatalogRoot) -> Result<DirtyModSet, FetchError> {
        let index_body = self.source.fetch(&root.host, &root.path).await?;
        self.metrics.record_page_fetched();

        let paths = self.detail_paths(&index_body);
        tracing::info!(
            "Found {} mod pages on {}{}, scanning with up to {} workers",
            paths.len(),
            root.host,
            root.path,
            self.max_workers
        );

        let permits = Arc::new(Semaphore::new(self.max_workers));
        let mut workers = JoinSet::new();

        for path in paths {
            let source = Arc::clone(&self.source);
            let classifier = Arc::clone(&self.classifier);
            let metrics = Arc::clone(&self.metrics);
            let permits = Arc::clone(&permits);
            let host = root.host.clone();

            workers.spawn(async move {
                // Held until the page is classified; the semaphore is never closed
                let _permit = permits.acquire_owned().await;
                let body = source.fetch(&host, &path).await?;
                metrics.record_page_fetched();

                let result = classifier.classify(&body);
                metrics.record_page_status(result.status);
                tracing::debug!(
                    "Classified {} as {:?} ({} plugins)",
                    path,
                    result.status,
                    result.plugins.len()
                );
                Ok::<DetailPageResult, FetchError>(result)
            });
        }

        let mut dirty = DirtyModSet::new();
        while let Some(joined) = workers.join_next().await {
            let outcome = joined.map_err(FetchError::from).and_then(|result| result);
            match outcome {
                Ok(result) => dirty.merge(result),
                Err(e) => {
                    tracing::error!("Catalog scan failed: {}", e);
                    workers.abort_all();
                    return Err(e);
                }
            }
        }

        tracing::info!("Catalog lists {} dirty plugins", dirty.len());
        Ok(dirty)
    }
}
