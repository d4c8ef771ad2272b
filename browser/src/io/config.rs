//! Browser configuration stored in `browser.toml`.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::pagination::{
    DEFAULT_REPORT_TEMPLATE, DEFAULT_ROWS_PER_PAGE, ROWS_PER_PAGE_OPTIONS, ReportTemplate,
    is_offered_page_size,
};

/// Default location of the config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "browser.toml";

/// Catalog endpoint queried when no override is configured.
pub const DEFAULT_API_BASE: &str = "https://api.artic.edu/api/v1/artworks";

/// Browser configuration (TOML).
///
/// Intended to be edited by humans. Missing fields fall back to defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BrowserConfig {
    /// Artworks collection endpoint of the catalog API.
    pub api_base: String,

    /// Page size used when a session starts.
    pub rows_per_page: u32,

    /// Page sizes the paginator offers.
    pub rows_per_page_options: Vec<u32>,

    /// Per-request timeout for catalog fetches, in seconds.
    pub request_timeout_secs: u64,

    /// `User-Agent` header sent to the catalog API.
    pub user_agent: String,

    /// minijinja template for the row range line (`first`, `last`, `total`).
    pub page_report_template: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            rows_per_page_options: ROWS_PER_PAGE_OPTIONS.to_vec(),
            request_timeout_secs: 30,
            user_agent: concat!("browser/", env!("CARGO_PKG_VERSION")).to_string(),
            page_report_template: DEFAULT_REPORT_TEMPLATE.to_string(),
        }
    }
}

impl BrowserConfig {
    pub fn validate(&self) -> Result<()> {
        reqwest::Url::parse(&self.api_base)
            .with_context(|| format!("api_base is not a valid url: {:?}", self.api_base))?;
        if self.rows_per_page_options.is_empty() {
            return Err(anyhow!("rows_per_page_options must not be empty"));
        }
        if self.rows_per_page_options.contains(&0) {
            return Err(anyhow!("rows_per_page_options must be > 0"));
        }
        if !is_offered_page_size(self.rows_per_page, &self.rows_per_page_options) {
            return Err(anyhow!(
                "rows_per_page {} must be one of {:?}",
                self.rows_per_page,
                self.rows_per_page_options
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(anyhow!("request_timeout_secs must be > 0"));
        }
        if self.user_agent.trim().is_empty() {
            return Err(anyhow!("user_agent must not be empty"));
        }
        self.report_template()?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parsed `page_report_template`.
    pub fn report_template(&self) -> Result<ReportTemplate> {
        ReportTemplate::parse(&self.page_report_template).context("parse page_report_template")
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `BrowserConfig::default()`.
pub fn load_config(path: &Path) -> Result<BrowserConfig> {
    if !path.exists() {
        let cfg = BrowserConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: BrowserConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &BrowserConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
