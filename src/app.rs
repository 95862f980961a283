//! One cleaning pass, end to end.
//!
//! [`RunPlan::from_settings`] validates the merged settings, then [`run`]
//! indexes the local install, scans the catalog and cleans every match.
//! [`exit_code_for`] maps a failed run onto the process exit status.

use crate::metrics::Metrics;
use crate::models::{CatalogRoot, CleanerSettings};
use crate::services::openmw::{build_local_index, load_data_dirs};
use crate::services::{
    CatalogScanner, CleaningReport, FetchError, PageClassifier, PageSource, PluginCleaner,
    clean_dirty_plugins,
};
use anyhow::{Result, bail};
use camino::Utf8PathBuf;
use std::sync::Arc;

/// Exit status when the settings are unusable
pub const EXIT_INVALID_SETTINGS: u8 = 1;

/// Exit status when any catalog page could not be retrieved
pub const EXIT_FETCH_FAILED: u8 = 5;

/// Validated inputs for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    pub openmw_cfg: Utf8PathBuf,
    pub catalog: CatalogRoot,
    pub tes3cmd: String,
    pub status_link: String,
    pub max_workers: usize,
}

impl RunPlan {
    /// Check that openmw.cfg exists and the mod list URL is usable
    pub fn from_settings(settings: &CleanerSettings) -> Result<Self> {
        let Some(openmw_cfg) = settings.openmw_cfg.clone() else {
            bail!("No openmw.cfg given (use --openmwcfg)");
        };
        if !openmw_cfg.is_file() {
            bail!("{} does not exist", openmw_cfg);
        }

        let Some(url) = settings.mod_list_url.as_deref() else {
            bail!("No mod list URL given (use --mod-list-url)");
        };
        let catalog = CatalogRoot::parse(url)?;

        Ok(Self {
            openmw_cfg,
            catalog,
            tes3cmd: settings.tes3cmd.clone(),
            status_link: settings.catalog.status_link.clone(),
            max_workers: settings.catalog.worker_limit(),
        })
    }
}

/// Index the local plugins, find the dirty ones in the catalog and clean them.
///
/// Returns an error carrying a [`FetchError`] if any catalog page fails, in
/// which case nothing is cleaned. Cleaner failures are part of the report.
pub async fn run<S, C>(
    plan: &RunPlan,
    source: S,
    cleaner: &C,
    metrics: Arc<Metrics>,
) -> Result<CleaningReport>
where
    S: PageSource,
    C: PluginCleaner,
{
    let data_dirs = load_data_dirs(&plan.openmw_cfg)?;
    let local_index = build_local_index(&data_dirs);

    let scanner = CatalogScanner::new(
        source,
        PageClassifier::with_status_link(&plan.status_link),
        plan.max_workers,
    )
    .with_metrics(Arc::clone(&metrics));
    let dirty = scanner.scan(&plan.catalog).await?;
    tracing::debug!("Dirty plugins: {:?}", dirty.sorted());

    let report = clean_dirty_plugins(&local_index, &dirty, cleaner, &metrics).await;
    tracing::info!(
        "Cleaning finished: {} invoked, {} cleaned, {} failed",
        report.invoked,
        report.cleaned,
        report.failed.len()
    );
    Ok(report)
}

/// Exit status for a run that ended in `error`
pub fn exit_code_for(error: &anyhow::Error) -> u8 {
    if error.chain().any(|cause| cause.is::<FetchError>()) {
        EXIT_FETCH_FAILED
    } else {
        EXIT_INVALID_SETTINGS
    }
}
