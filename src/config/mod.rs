use crate::models::CleanerSettings;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, Environment, File, FileFormat};
use std::fs;

/// Default settings file, looked up relative to the working directory
pub const DEFAULT_SETTINGS_FILE: &str = "omw-cleaner.yaml";

/// Prefix for environment overrides, e.g. `OMW_CLEANER_TES3CMD` or
/// `OMW_CLEANER_CATALOG__MAX_WORKERS`
pub const ENV_PREFIX: &str = "OMW_CLEANER";

/// Configuration manager for loading and saving the settings file.
///
/// Settings are layered, lowest priority first:
/// - built-in defaults ([`CleanerSettings::default`])
/// - the YAML settings file, when it exists
/// - `OMW_CLEANER_*` environment variables
#[derive(Debug, Clone)]
pub struct ConfigManager {
    settings_path: Utf8PathBuf,
    env_override: Option<config::Map<String, String>>,
}

impl ConfigManager {
    /// Create a new ConfigManager for the given settings file.
    ///
    /// The file does not need to exist; missing files fall back to defaults.
    pub fn new<P: AsRef<Utf8Path>>(settings_path: P) -> Self {
        Self {
            settings_path: settings_path.as_ref().to_path_buf(),
            env_override: None,
        }
    }

    /// Read environment overrides from `vars` instead of the process environment.
    pub fn with_environment(mut self, vars: config::Map<String, String>) -> Self {
        self.env_override = Some(vars);
        self
    }

    /// Load the layered settings.
    pub fn load_settings(&self) -> Result<CleanerSettings> {
        if self.settings_path.exists() {
            tracing::debug!("Reading settings from {}", self.settings_path);
        } else {
            tracing::debug!(
                "Settings file not found at {}, using defaults",
                self.settings_path
            );
        }

        let environment = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(self.env_override.clone());

        let layered = Config::builder()
            .add_source(File::new(self.settings_path.as_str(), FileFormat::Yaml).required(false))
            .add_source(environment)
            .build()
            .with_context(|| format!("Failed to read settings: {}", self.settings_path))?;

        let settings: CleanerSettings = layered
            .try_deserialize()
            .with_context(|| format!("Failed to parse settings: {}", self.settings_path))?;

        Ok(settings)
    }

    /// Save settings as YAML, creating the parent directory if needed.
    pub fn save_settings(&self, settings: &CleanerSettings) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(settings).context("Failed to serialize settings to YAML")?;

        if let Some(parent) = self.settings_path.parent() {
            if !parent.as_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create settings directory: {}", parent))?;
            }
        }

        fs::write(&self.settings_path, yaml_string)
            .with_context(|| format!("Failed to write settings: {}", self.settings_path))?;

        tracing::info!("Saved settings to {}", self.settings_path);
        Ok(())
    }

    /// Get the settings file path.
    pub fn settings_path(&self) -> &Utf8Path {
        &self.settings_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new(DEFAULT_SETTINGS_FILE)
    }
}
