mod file_config;

pub use file_config::FileConfig;

use anyhow::{bail, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_BUSINESS_NAME: &str = "CellClinic";
pub const DEFAULT_TOKEN_PATH: &str = ".cellclinic_token";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub base_url: Option<String>,
    pub business_name: Option<String>,
    pub request_timeout_sec: u64,
    pub restore_timeout_sec: u64,
    pub token_path: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            business_name: None,
            request_timeout_sec: 30,
            restore_timeout_sec: 60,
            token_path: None,
            output_dir: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub business_name: String,
    pub request_timeout_sec: u64,
    /// Timeout for the restore upload only.
    pub restore_timeout_sec: u64,
    pub token_path: PathBuf,
    pub output_dir: PathBuf,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let base_url = file
            .base_url
            .or_else(|| cli.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            bail!("base_url must be an http(s) URL, got {:?}", base_url);
        }

        let business_name = file
            .business_name
            .or_else(|| cli.business_name.clone())
            .unwrap_or_else(|| DEFAULT_BUSINESS_NAME.to_string());
        if business_name.trim().is_empty() {
            bail!("business_name must not be empty");
        }

        let request_timeout_sec = file.request_timeout_sec.unwrap_or(cli.request_timeout_sec);
        let restore_timeout_sec = file.restore_timeout_sec.unwrap_or(cli.restore_timeout_sec);
        if request_timeout_sec == 0 || restore_timeout_sec == 0 {
            bail!("Timeouts must be greater than zero");
        }

        let token_path = file
            .token_path
            .map(PathBuf::from)
            .or_else(|| cli.token_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_PATH));

        let output_dir = file
            .output_dir
            .map(PathBuf::from)
            .or_else(|| cli.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            base_url,
            business_name,
            request_timeout_sec,
            restore_timeout_sec,
            token_path,
            output_dir,
        })
    }

    pub fn restore_timeout(&self) -> Duration {
        Duration::from_secs(self.restore_timeout_sec)
    }
}
