// omw-cleaner - clean OpenMW plugins flagged as dirty by a published mod list
//
// This is the library crate containing the catalog scan, the cleaning pass
// and their data structures. The binary crate (main.rs) wires them to the CLI.

pub mod app;
pub mod cli;
pub mod config;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;

// Re-export commonly used types for convenience
pub use config::ConfigManager;
pub use models::{CatalogRoot, CleanerSettings, DirtyModSet, LocalModIndex};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
