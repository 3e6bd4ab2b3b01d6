use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::domain::entities::table::{QueryContext, DEFAULT_PAGE_SIZE};

pub const ENV_DB_PATH: &str = "MARKETPLACE_DB_PATH";
pub const ENV_LOG: &str = "MARKETPLACE_LOG";
pub const ENV_PAGE_SIZE: &str = "MARKETPLACE_PAGE_SIZE";
pub const ENV_CONTEXT: &str = "MARKETPLACE_CONTEXT";

const CONFIG_FILE: &str = "config.toml";
const DB_FILE: &str = "catalog.sqlite";

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("com", "marketplace", "marketplace-admin")
        .ok_or_else(|| anyhow!("unable to resolve data directory"))
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().join(CONFIG_FILE))
}

pub fn default_db_path() -> Result<PathBuf> {
    Ok(project_dirs()?.data_local_dir().join(DB_FILE))
}

pub fn default_data_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_local_dir().to_path_buf())
}

/// Settings read from `config.toml`, then overridden by `MARKETPLACE_*`
/// environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub db_path: Option<PathBuf>,
    pub log_filter: String,
    pub default_page_size: usize,
    pub search_debounce_ms: u64,
    pub context: QueryContext,
    pub seed_demo_data: bool,
    pub export_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_filter: "info".to_string(),
            default_page_size: DEFAULT_PAGE_SIZE,
            search_debounce_ms: 250,
            context: QueryContext::Admin,
            seed_demo_data: true,
            export_dir: None,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(raw).context("failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    /// Missing file means defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("invalid config: {}", path.display()))
    }

    pub fn load() -> Result<Self> {
        let mut config = Self::from_file(&default_config_path()?)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Applies overrides from any key lookup; blank values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(path) = get(ENV_DB_PATH) {
            self.db_path = Some(PathBuf::from(path.trim()));
        }
        if let Some(filter) = get(ENV_LOG) {
            self.log_filter = filter.trim().to_string();
        }
        if let Some(size) = get(ENV_PAGE_SIZE) {
            self.default_page_size = size
                .trim()
                .parse::<usize>()
                .with_context(|| format!("{ENV_PAGE_SIZE} must be a positive integer, got `{size}`"))?;
        }
        if let Some(context) = get(ENV_CONTEXT) {
            self.context = context
                .parse::<QueryContext>()
                .with_context(|| format!("invalid {ENV_CONTEXT}"))?;
        }
        self.validate()
    }

    fn validate(&self) -> Result<()> {
        if self.default_page_size == 0 {
            bail!("default_page_size must be greater than zero");
        }
        Ok(())
    }

    pub fn resolved_db_path(&self) -> Result<PathBuf> {
        match &self.db_path {
            Some(path) => Ok(path.clone()),
            None => default_db_path(),
        }
    }

    pub fn resolved_export_dir(&self) -> Result<PathBuf> {
        match &self.export_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(default_data_dir()?.join("exports")),
        }
    }
}
