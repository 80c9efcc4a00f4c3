// src/config.rs

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::info;

/// Published sheet holding the WISE_ID → Shelf_QR_ID mapping.
pub const DEFAULT_CSV_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vQLl77CDbnnQONiL4kM051ftURDtCISZKys8HPrdeF9t_MgOiggWcMkC6Y8pWb1ZM6AlQj_C4ygTAgo/pub?gid=0&single=true&output=csv";

/// Everything the translator needs to know about the sheet and the links.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub csv_url: String,
    /// Query parameter carried by the sticker link.
    pub query_param: String,
    pub lookup_column: String,
    pub target_column: String,
    pub url_prefix: String,
    pub printed_column: String,
    /// Base of the link printed on each sticker.
    pub translator_url: String,
    pub fetch_timeout_secs: Option<u64>,
    /// Where rendered sticker QR codes are written.
    pub qr_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            csv_url: DEFAULT_CSV_URL.to_string(),
            query_param: "wise_id".to_string(),
            lookup_column: "WISE_ID".to_string(),
            target_column: "Shelf_QR_ID".to_string(),
            url_prefix: "https://eam.sh/".to_string(),
            printed_column: "QR Code Printed".to_string(),
            translator_url: "https://wisecircuitslab.github.io/shelf_url_translator".to_string(),
            fetch_timeout_secs: None,
            qr_dir: PathBuf::from("qr_codes"),
        }
    }
}

impl Config {
    /// Defaults, then the YAML file named by `SHELF_CONFIG`, then the
    /// `SHELF_CSV_URL` / `SHELF_URL_PREFIX` overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(|key| env::var(key).ok())
    }

    /// [`Config::load`] with the environment lookup supplied by the caller.
    pub fn load_from(vars: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = match vars("SHELF_CONFIG") {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        if let Some(url) = vars("SHELF_CSV_URL") {
            cfg.csv_url = url;
        }
        if let Some(prefix) = vars("SHELF_URL_PREFIX") {
            cfg.url_prefix = prefix;
        }
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg = Self::from_yaml_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        info!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        // an empty document deserializes as unit, not as an empty map
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_secs.map(Duration::from_secs)
    }
}
