//! Configuration file support for reportgrid
//!
//! Reads from .reportgrid/config.toml (or the file named by `REPORTGRID_CONFIG`)

use crate::error::{Error, Result};
use crate::grid::DEFAULT_PAGE_SIZE;
use crate::selection::SelectionScope;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "REPORTGRID_CONFIG";

/// Configuration structure
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Record grid settings
    #[serde(default)]
    pub grid: GridConfig,

    /// Chart selection settings
    #[serde(default)]
    pub chart: ChartConfig,

    /// Per-report metadata keyed by report stem (file name without extension)
    #[serde(default)]
    pub reports: BTreeMap<String, ReportConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GridConfig {
    /// Rows per page. Default: 5
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct ChartConfig {
    /// "category" prunes label selections on category change, "global" keeps them
    #[serde(default)]
    pub selection_scope: SelectionScope,
}

/// Report metadata, e.g. `[reports.top_regras_por_app]`
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct ReportConfig {
    /// Chart title
    #[serde(default)]
    pub title: Option<String>,

    /// Field used to group records in the category dropdown
    #[serde(default)]
    pub category_field: Option<String>,
}

/// Report stem: `E1_top_regras.json` -> `E1_top_regras`
pub fn report_stem(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
}

impl Config {
    /// Load config, returning defaults if no file is found or it doesn't parse
    pub fn load() -> Self {
        match Self::find_config_path() {
            Some(path) => Self::from_path(&path).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| Error::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `REPORTGRID_CONFIG`, else .reportgrid/config.toml walking up the directory tree
    fn find_config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }

        let current_dir = std::env::current_dir().ok()?;
        let mut dir = current_dir.as_path();

        loop {
            let config_path = dir.join(".reportgrid").join("config.toml");
            if config_path.exists() {
                return Some(config_path);
            }

            match dir.parent() {
                Some(parent) => dir = parent,
                None => break,
            }
        }
        None
    }

    pub fn page_size(&self) -> usize {
        self.grid.page_size.max(1)
    }

    pub fn report(&self, name: &str) -> Option<&ReportConfig> {
        self.reports.get(report_stem(name))
    }

    /// Category field hint for a report, if configured
    pub fn category_field(&self, name: &str) -> Option<&str> {
        self.report(name).and_then(|r| r.category_field.as_deref())
    }

    /// Configured title, else the report stem
    pub fn title<'a>(&'a self, name: &'a str) -> &'a str {
        self.report(name)
            .and_then(|r| r.title.as_deref())
            .unwrap_or_else(|| report_stem(name))
    }
}
