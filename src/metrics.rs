// Run metrics
//
// Counters shared between the catalog scan workers and the cleaning phase.

use crate::models::CatalogStatus;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Counters for one run.
///
/// Uses atomic operations so scan workers can record without locks.
/// Logged once at the end of the run.
#[derive(Debug)]
pub struct Metrics {
    /// Catalog pages retrieved, index page included
    pub pages_fetched: AtomicUsize,

    /// Detail pages marked as needing cleaning
    pub pages_dirty: AtomicUsize,

    /// Detail pages marked as already clean
    pub pages_clean: AtomicUsize,

    /// Detail pages without a recognizable verdict
    pub pages_unknown: AtomicUsize,

    /// Plugin files cleaned successfully
    pub plugins_cleaned: AtomicUsize,

    /// Plugin files the cleaner failed on
    pub plugins_failed: AtomicUsize,

    /// Total cleaner run time in milliseconds
    pub total_cleaning_time_ms: AtomicU64,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            pages_fetched: AtomicUsize::new(0),
            pages_dirty: AtomicUsize::new(0),
            pages_clean: AtomicUsize::new(0),
            pages_unknown: AtomicUsize::new(0),
            plugins_cleaned: AtomicUsize::new(0),
            plugins_failed: AtomicUsize::new(0),
            total_cleaning_time_ms: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_page_fetched(&self) {
        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the verdict of a classified detail page
    pub fn record_page_status(&self, status: CatalogStatus) {
        let counter = match status {
            CatalogStatus::Dirty => &self.pages_dirty,
            CatalogStatus::Clean => &self.pages_clean,
            CatalogStatus::Unknown => &self.pages_unknown,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_plugin_cleaned(&self) {
        self.plugins_cleaned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_plugin_failed(&self) {
        self.plugins_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cleaning_time(&self, duration: Duration) {
        self.total_cleaning_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Average cleaner run time per invocation in milliseconds
    pub fn avg_cleaning_time_ms(&self) -> f64 {
        let total = self.total_cleaning_time_ms.load(Ordering::Relaxed);
        let count = self.plugins_cleaned.load(Ordering::Relaxed)
            + self.plugins_failed.load(Ordering::Relaxed);
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }

    pub fn log_summary(&self) {
        tracing::info!(
            "Catalog: {} pages fetched ({} dirty, {} clean, {} without verdict)",
            self.pages_fetched.load(Ordering::Relaxed),
            self.pages_dirty.load(Ordering::Relaxed),
            self.pages_clean.load(Ordering::Relaxed),
            self.pages_unknown.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Plugins: {} cleaned, {} failed, {:.2}s cleaning (avg {:.0}ms), run time {:.2}s",
            self.plugins_cleaned.load(Ordering::Relaxed),
            self.plugins_failed.load(Ordering::Relaxed),
            self.total_cleaning_time_ms.load(Ordering::Relaxed) as f64 / 1000.0,
            self.avg_cleaning_time_ms(),
            self.uptime().as_secs_f64()
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
