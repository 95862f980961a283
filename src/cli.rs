use crate::config::DEFAULT_SETTINGS_FILE;
use crate::models::CleanerSettings;
use camino::Utf8PathBuf;
use clap::Parser;

/// Clean the plugins of an OpenMW installation that a mod list marks as dirty.
#[derive(Parser, Debug, Clone)]
#[command(name = "omw-cleaner", version, about, long_about = None)]
pub struct Cli {
    /// Path to the openmw.cfg file
    #[arg(short = 'c', long = "openmwcfg")]
    pub openmw_cfg: Option<Utf8PathBuf>,

    /// Where the list of mods can be found (hint: https://modding-openmw.com/lists/<your_version>/)
    #[arg(short = 'u', long)]
    pub mod_list_url: Option<String>,

    /// Location of tes3cmd
    #[arg(short = 't', long)]
    pub tes3cmd: Option<String>,

    /// Settings file, layered under these flags and over built-in defaults
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    pub config: Utf8PathBuf,

    /// Directory for rotating log files
    #[arg(long)]
    pub log_dir: Option<Utf8PathBuf>,

    /// Verbose logging
    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// Write the effective settings back to the settings file
    #[arg(long, default_value_t = false)]
    pub save_config: bool,
}

impl Cli {
    /// Override loaded settings with whatever was given on the command line
    pub fn apply_to(&self, settings: &mut CleanerSettings) {
        if let Some(cfg) = &self.openmw_cfg {
            settings.openmw_cfg = Some(cfg.clone());
        }
        if let Some(url) = &self.mod_list_url {
            settings.mod_list_url = Some(url.clone());
        }
        if let Some(tool) = &self.tes3cmd {
            settings.tes3cmd = tool.clone();
        }
        if let Some(log_dir) = &self.log_dir {
            settings.log_dir = log_dir.clone();
        }
        if self.debug {
            settings.debug_mode = true;
        }
    }
}
