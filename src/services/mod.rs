//! Services module - the catalog scan and the cleaning pass.
//!
//! # Components
//!
//! - [`PageClassifier`]: reads the Yes/No cleaning verdict and the plugin names
//!   from one catalog detail page. Pure, no I/O.
//! - [`CatalogFetcher`]: single HTTPS GET per page, behind the [`PageSource`] trait.
//! - [`CatalogScanner`]: fetches the mod list index, then every linked mod page
//!   on a bounded pool of tokio tasks, and unions the dirty plugins into a
//!   [`DirtyModSet`](crate::models::DirtyModSet).
//! - [`Tes3cmdCleaner`]: runs `tes3cmd clean <plugin>` behind the [`PluginCleaner`] trait.
//! - [`clean_dirty_plugins`]: matches the dirty set against the
//!   [`LocalModIndex`](crate::models::LocalModIndex) and cleans every installed copy.
//! - [`openmw`]: builds the local index from the `data=` entries of `openmw.cfg`.
//!
//! # Failure policy
//!
//! A failed page fetch ([`FetchError`]) aborts the whole scan and the run.
//! A failed cleaner invocation is reported and the pass continues.
//!
//! # Usage Example
//!
//! ```ignore
//! use omw_cleaner::models::CatalogRoot;
//! use omw_cleaner::services::{CatalogFetcher, CatalogScanner, PageClassifier};
//!
//! let root = CatalogRoot::parse("https://modding-openmw.com/lists/total-overhaul/")?;
//! let scanner = CatalogScanner::new(CatalogFetcher::new()?, PageClassifier::new(), 8);
//! let dirty = scanner.scan(&root).await?;
//! ```

pub mod classifier;
pub mod cleaning;
pub mod fetcher;
pub mod openmw;
pub mod orchestrator;
pub mod scanner;

pub use classifier::PageClassifier;
pub use cleaning::{CleanOutcome, CleanStatus, PluginCleaner, ReportLine, Tes3cmdCleaner};
pub use fetcher::{CatalogFetcher, FetchError, PageSource};
pub use orchestrator::{CleaningReport, clean_dirty_plugins};
pub use scanner::CatalogScanner;
