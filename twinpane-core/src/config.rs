//! src/config.rs
//! ============================================================================
//! # Config: Application Configuration Loader and Saver
//!
//! Loads and saves settings as TOML from the platform config path using the
//! [`directories`](https://docs.rs/directories) crate.
//!
//! ## Example
//! ```rust,ignore
//! let config = Config::load().await?;
//! config.save().await?;
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use tokio::fs as TokioFs;

/// External fuzzy filter invocation. The query is appended as last argument.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FilterConfig {
    pub program: String,

    pub args: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            program: "fzf".to_string(),
            args: vec!["-f".to_string()],
        }
    }
}

/// Log file settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset
    pub level: String,

    /// Directory for the daily log files; platform data dir when unset
    pub directory: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

/// Main configuration struct for the application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Extra `"<chord>:<action>[+<action>...]"` bindings on top of the built-ins
    pub keybindings: Vec<String>,

    /// How long a warning banner stays in the status line
    #[serde(with = "humantime_serde")]
    pub warning_timeout: Duration,

    pub filter: FilterConfig,

    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keybindings: Vec::new(),
            warning_timeout: Duration::from_secs(3),
            filter: FilterConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Config {
    /// Loads config from the TOML file in the app config dir, or returns defaults.
    ///
    /// The config is expected at `$XDG_CONFIG_HOME/twinpane/config.toml`
    /// (Linux), or equivalent on Windows/macOS.
    pub async fn load() -> anyhow::Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            info!("Loading config from {}", path.display());
            let text = TokioFs::read_to_string(&path).await?;
            let cfg: Self = toml::from_str(&text)?;

            Ok(cfg)
        } else {
            info!(
                "No config file found at {}, using default configuration. Creating it now.",
                path.display()
            );

            let default_config = Self::default();
            default_config.save().await?;

            Ok(default_config)
        }
    }

    /// Saves config to the TOML file in the app config dir.
    pub async fn save(&self) -> anyhow::Result<()> {
        let path = Self::config_path()?;

        info!("Saving config to {}", path.display());

        if let Some(parent) = path.parent() {
            TokioFs::create_dir_all(parent).await?;
        }

        let toml_str = toml::to_string_pretty(self)?;
        TokioFs::write(&path, toml_str).await?;

        Ok(())
    }

    /// Returns the canonical config file path using `directories::ProjectDirs`.
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Directory that receives the daily log files.
    pub fn log_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.log.directory {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::project_dirs()?.data_local_dir().join("logs")),
        }
    }

    fn project_dirs() -> anyhow::Result<ProjectDirs> {
        ProjectDirs::from("org", "twinpane", "twinpane")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            warning_timeout = "5s"

            [filter]
            program = "sk"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.warning_timeout, Duration::from_secs(5));
        assert_eq!(cfg.filter.program, "sk");
        assert_eq!(cfg.filter.args, vec!["-f".to_string()]);
        assert_eq!(cfg.log, LogConfig::default());
        assert!(cfg.keybindings.is_empty());
    }

    #[test]
    fn default_config_survives_toml() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let back: Config = toml::from_str(&text).unwrap();

        assert_eq!(back.filter, FilterConfig::default());
        assert_eq!(back.warning_timeout, Duration::from_secs(3));
    }
}
