use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// Href of the catalog link whose text carries the Yes/No cleaning verdict
pub const DEFAULT_STATUS_LINK: &str = "/tips/cleaning-with-tes3cmd/";

/// Runtime settings, loaded from `omw-cleaner.yaml` and the environment
/// and then overridden by command-line flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanerSettings {
    /// Path to openmw.cfg; its `data=` lines define where plugins are searched
    #[serde(default)]
    pub openmw_cfg: Option<Utf8PathBuf>,

    /// Mod list page, e.g. `https://modding-openmw.com/lists/<list>/`
    #[serde(default)]
    pub mod_list_url: Option<String>,

    #[serde(default = "default_tes3cmd")]
    pub tes3cmd: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: Utf8PathBuf,

    #[serde(default)]
    pub debug_mode: bool,

    #[serde(default)]
    pub catalog: CatalogSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_status_link")]
    pub status_link: String,

    /// Upper bound on concurrent page fetches; unset means one per CPU
    #[serde(default)]
    pub max_workers: Option<usize>,
}

impl Default for CleanerSettings {
    fn default() -> Self {
        Self {
            openmw_cfg: None,
            mod_list_url: None,
            tes3cmd: default_tes3cmd(),
            log_dir: default_log_dir(),
            debug_mode: false,
            catalog: CatalogSettings::default(),
        }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            status_link: default_status_link(),
            max_workers: None,
        }
    }
}

impl CatalogSettings {
    /// Worker bound for the catalog scan, never below one
    pub fn worker_limit(&self) -> usize {
        self.max_workers
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            })
            .max(1)
    }
}

fn default_tes3cmd() -> String {
    "tes3cmd".to_string()
}

fn default_log_dir() -> Utf8PathBuf {
    Utf8PathBuf::from("logs")
}

fn default_status_link() -> String {
    DEFAULT_STATUS_LINK.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = CleanerSettings::default();
        assert_eq!(settings.tes3cmd, "tes3cmd");
        assert_eq!(settings.log_dir, Utf8PathBuf::from("logs"));
        assert_eq!(settings.catalog.status_link, DEFAULT_STATUS_LINK);
        assert!(settings.openmw_cfg.is_none());
        assert!(!settings.debug_mode);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let settings: CleanerSettings =
            serde_yaml_ng::from_str("tes3cmd: /opt/tes3cmd\ncatalog:\n  max_workers: 3\n").unwrap();
        assert_eq!(settings.tes3cmd, "/opt/tes3cmd");
        assert_eq!(settings.catalog.max_workers, Some(3));
        assert_eq!(settings.catalog.status_link, DEFAULT_STATUS_LINK);
        assert_eq!(settings.log_dir, Utf8PathBuf::from("logs"));
    }

    #[test]
    fn test_worker_limit_never_zero() {
        let catalog = CatalogSettings {
            max_workers: Some(0),
            ..CatalogSettings::default()
        };
        assert_eq!(catalog.worker_limit(), 1);
        assert!(CatalogSettings::default().worker_limit() >= 1);
    }
}
