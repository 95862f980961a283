//! Data models for omw-cleaner.
//!
//! - [`CleanerSettings`]: runtime settings loaded from `omw-cleaner.yaml`, the environment and the CLI
//! - [`CatalogRoot`]: where the mod list index page lives
//! - [`DetailPageResult`] / [`CatalogStatus`]: classification of one catalog detail page
//! - [`DirtyModSet`]: union of every plugin filename the catalog marks dirty
//! - [`LocalModIndex`]: installed plugin filenames mapped to every path they occur at
//!
//! All of these are in-memory only and live for a single run.

pub mod catalog;
pub mod config;
pub mod local_index;

pub use catalog::{CatalogRoot, CatalogStatus, CatalogUrlError, DetailPageResult, DirtyModSet};
pub use config::{CatalogSettings, CleanerSettings, DEFAULT_STATUS_LINK};
pub use local_index::LocalModIndex;
