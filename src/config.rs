//! Dashboard settings, read from `climate-debt.toml` when present.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::filter::YearRange;

/// Looked up in the working directory at startup.
pub const CONFIG_FILE_NAME: &str = "climate-debt.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DashboardConfig {
    /// Table loaded at startup.
    pub data_path: PathBuf,
    /// Suggested file name for the CSV download.
    pub export_file_name: String,
    pub default_start_year: i32,
    pub default_end_year: i32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("climate_debt_analyzer_top100_10yrs.xlsx"),
            export_file_name: "climate_debt_analyzer_10yrs.csv".to_string(),
            default_start_year: 2015,
            default_end_year: 2024,
        }
    }
}

impl DashboardConfig {
    /// Load from a TOML file. Missing keys keep their defaults.
    pub fn load(config_path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("reading {}", config_path.display()))?;
        Self::parse(&content).with_context(|| format!("parsing {}", config_path.display()))
    }

    fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// `climate-debt.toml` from the working directory, or defaults when the
    /// file does not exist. A file that exists but fails to parse is an error.
    pub fn load_or_default() -> Result<Self> {
        let path = Path::new(CONFIG_FILE_NAME);
        if path.exists() {
            log::info!("Reading settings from {}", path.display());
            Self::load(path)
        } else {
            log::debug!("No {CONFIG_FILE_NAME}; using built-in settings");
            Ok(Self::default())
        }
    }

    pub fn default_window(&self) -> YearRange {
        YearRange::new(self.default_start_year, self.default_end_year)
    }
}
