//! omw-cleaner - clean dirty OpenMW plugins with tes3cmd
//!
//! # Execution Flow
//!
//! 1. Parse the command line and layer it over `omw-cleaner.yaml` and `OMW_CLEANER_*`
//! 2. Initialize logging → console + logs/omw-cleaner.<date>
//! 3. Validate settings (openmw.cfg must exist, mod list URL must parse)
//! 4. Create the tokio runtime; catalog pages are fetched on its worker pool
//! 5. Index local plugins, scan the mod list, clean every installed dirty plugin
//! 6. Exit 0 once cleaning has been attempted, 5 if the catalog could not be read,
//!    1 for unusable settings

use anyhow::{Context, Result};
use clap::Parser;
use omw_cleaner::app::{self, EXIT_INVALID_SETTINGS, RunPlan};
use omw_cleaner::cli::Cli;
use omw_cleaner::metrics::Metrics;
use omw_cleaner::services::{CatalogFetcher, Tes3cmdCleaner};
use omw_cleaner::{APP_NAME, ConfigManager, VERSION};
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_manager = ConfigManager::new(&cli.config);
    let mut settings = match config_manager.load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{:#}", e);
            return ExitCode::from(EXIT_INVALID_SETTINGS);
        }
    };
    cli.apply_to(&mut settings);

    let _guard = match omw_cleaner::logging::setup_logging(
        &settings.log_dir,
        APP_NAME,
        settings.debug_mode,
        true,
    ) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{:#}", e);
            return ExitCode::from(EXIT_INVALID_SETTINGS);
        }
    };

    tracing::debug!("Starting {} v{}", APP_NAME, VERSION);

    if cli.save_config {
        if let Err(e) = config_manager.save_settings(&settings) {
            tracing::error!("{:#}", e);
            return ExitCode::from(EXIT_INVALID_SETTINGS);
        }
    }

    match run(&settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::from(app::exit_code_for(&e))
        }
    }
}

fn run(settings: &omw_cleaner::models::CleanerSettings) -> Result<()> {
    let plan = RunPlan::from_settings(settings)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("omw-cleaner-worker")
        .build()
        .context("Failed to create tokio runtime")?;

    let metrics = Arc::new(Metrics::new());
    let fetcher = CatalogFetcher::with_scheme(&plan.catalog.scheme)?;
    let cleaner = Tes3cmdCleaner::new(plan.tes3cmd.clone());

    let report = runtime.block_on(app::run(&plan, fetcher, &cleaner, Arc::clone(&metrics)))?;

    for (path, status) in &report.failed {
        tracing::warn!("Not cleaned: {} ({:?})", path, status);
    }
    metrics.log_summary();

    Ok(())
}
