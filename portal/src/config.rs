//! Portal configuration.
//!
//! Environment variables cover everything; a TOML file can be supplied
//! with `--config` for deployments that prefer one. Defaults are usable
//! for local bring-up out of the box.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Mail gateway settings. Absent means ticket-update emails are dropped
/// (with a debug log) rather than sent.
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    /// JSON endpoint the portal POSTs outbound messages to.
    pub gateway_url: String,
    /// From header, e.g. "Support Portal <support@example.com>".
    pub from: String,
}

/// Top-level portal configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    /// Directory holding the store JSON files.
    pub data_dir: PathBuf,
    /// When set, `serve` also runs a sweep every this many seconds.
    pub sweep_interval_secs: Option<u64>,
    pub mail: Option<MailConfig>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            bind_addr: std::env::var("PORTAL_BIND").unwrap_or_else(|_| "127.0.0.1:7810".into()),
            data_dir: std::env::var("PORTAL_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            sweep_interval_secs: std::env::var("PORTAL_SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok()),
            mail: Self::mail_from_env(),
        }
    }
}

impl PortalConfig {
    fn mail_from_env() -> Option<MailConfig> {
        let gateway_url = std::env::var("PORTAL_MAIL_GATEWAY_URL").ok()?;
        let from = std::env::var("PORTAL_MAIL_FROM")
            .unwrap_or_else(|_| "Support Portal <support@example.com>".into());
        Some(MailConfig { gateway_url, from })
    }

    /// Load from a TOML file; fields not present fall back to the
    /// environment-derived defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Path of one store file inside the data directory.
    pub fn store_path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }
}
