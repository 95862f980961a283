use super::cleaning::{CleanStatus, PluginCleaner};
use crate::metrics::Metrics;
use crate::models::{DirtyModSet, LocalModIndex};
use camino::Utf8PathBuf;

/// What the cleaning phase did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleaningReport {
    /// Cleaner invocations, one per matched plugin file
    pub invoked: usize,
    pub cleaned: usize,
    pub failed: Vec<(Utf8PathBuf, CleanStatus)>,
}

impl CleaningReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Run the cleaner once for every installed copy of every dirty plugin.
///
/// Filenames that are installed but not dirty are skipped silently.
/// Invocations run one after another and each outcome is reported as soon
/// as it is known. A failing invocation is recorded and the loop moves on.
pub async fn clean_dirty_plugins<C: PluginCleaner>(
    local_index: &LocalModIndex,
    dirty: &DirtyModSet,
    cleaner: &C,
    metrics: &Metrics,
) -> CleaningReport {
    let mut report = CleaningReport::default();

    for (filename, paths) in local_index.iter() {
        if !dirty.contains(filename) {
            continue;
        }

        for path in paths {
            let outcome = cleaner.clean(path).await;
            outcome.emit();

            report.invoked += 1;
            metrics.record_cleaning_time(outcome.duration);
            if outcome.success() {
                metrics.record_plugin_cleaned();
                report.cleaned += 1;
            } else {
                metrics.record_plugin_failed();
                report.failed.push((outcome.path, outcome.status));
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::cleaning::CleanOutcome;
    use camino::Utf8Path;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records every path; fails the ones listed in `failing`
    #[derive(Default)]
    struct RecordingCleaner {
        calls: Mutex<Vec<Utf8PathBuf>>,
        failing: HashSet<Utf8PathBuf>,
    }

    impl PluginCleaner for RecordingCleaner {
        async fn clean(&self, esp_path: &Utf8Path) -> CleanOutcome {
            self.calls.lock().unwrap().push(esp_path.to_path_buf());
            let status = if self.failing.contains(esp_path) {
                CleanStatus::Failed { exit_code: 1 }
            } else {
                CleanStatus::Cleaned
            };
            CleanOutcome {
                path: esp_path.to_path_buf(),
                status,
                stdout_lines: vec![format!("Cleaning {}", esp_path)],
                stderr_lines: Vec::new(),
                duration: Duration::from_millis(1),
            }
        }
    }

    fn index(entries: &[(&str, &str)]) -> LocalModIndex {
        let mut index = LocalModIndex::new();
        for (name, path) in entries {
            index.insert(*name, *path);
        }
        index
    }

    #[tokio::test]
    async fn test_only_dirty_plugins_are_cleaned() {
        let local = index(&[("Foo.esp", "/data/Foo.esp"), ("Bar.esp", "/data/Bar.esp")]);
        let dirty = DirtyModSet::from_iter(["Foo.esp"]);
        let cleaner = RecordingCleaner::default();

        let report = clean_dirty_plugins(&local, &dirty, &cleaner, &Metrics::new()).await;

        assert_eq!(*cleaner.calls.lock().unwrap(), vec![Utf8PathBuf::from("/data/Foo.esp")]);
        assert_eq!(report.invoked, 1);
        assert_eq!(report.cleaned, 1);
        assert!(report.all_succeeded());
    }

    #[tokio::test]
    async fn test_every_duplicate_install_is_cleaned() {
        let local = index(&[
            ("Foo.esp", "/data/a/Foo.esp"),
            ("Foo.esp", "/data/b/Foo.esp"),
            ("Foo.esp", "/data/c/Foo.esp"),
        ]);
        let dirty = DirtyModSet::from_iter(["Foo.esp", "NotInstalled.esp"]);
        let cleaner = RecordingCleaner::default();

        let report = clean_dirty_plugins(&local, &dirty, &cleaner, &Metrics::new()).await;

        let calls: HashSet<_> = cleaner.calls.lock().unwrap().iter().cloned().collect();
        assert_eq!(calls.len(), 3);
        assert_eq!(report.invoked, 3);
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_remaining_plugins() {
        let local = index(&[
            ("A.esp", "/data/A.esp"),
            ("B.esp", "/data/B.esp"),
            ("C.esp", "/data/C.esp"),
        ]);
        let dirty = DirtyModSet::from_iter(["A.esp", "B.esp", "C.esp"]);
        let cleaner = RecordingCleaner {
            failing: HashSet::from([Utf8PathBuf::from("/data/A.esp")]),
            ..RecordingCleaner::default()
        };
        let metrics = Metrics::new();

        let report = clean_dirty_plugins(&local, &dirty, &cleaner, &metrics).await;

        assert_eq!(cleaner.calls.lock().unwrap().len(), 3);
        assert_eq!(report.cleaned, 2);
        assert_eq!(
            report.failed,
            vec![(Utf8PathBuf::from("/data/A.esp"), CleanStatus::Failed { exit_code: 1 })]
        );
        assert_eq!(metrics.plugins_failed.load(std::sync::atomic::Ordering::Relaxed), 1);
    }

    #[test]
    fn test_empty_dirty_set_invokes_nothing() {
        let local = index(&[("Foo.esp", "/data/Foo.esp")]);
        let cleaner = RecordingCleaner::default();

        let report = tokio_test::block_on(clean_dirty_plugins(
            &local,
            &DirtyModSet::new(),
            &cleaner,
            &Metrics::new(),
        ));

        assert_eq!(report, CleaningReport::default());
        assert!(cleaner.calls.lock().unwrap().is_empty());
    }
}
