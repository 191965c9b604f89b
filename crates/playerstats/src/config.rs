//! Configuration
//!
//! Defaults, then an optional YAML file, then `PLAYERSTATS_DB`. The
//! command line applies its own overrides on top.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::session::DEFAULT_TABLE;
use crate::{Error, Result};

/// Environment variable naming the database file
pub const DATABASE_ENV_VAR: &str = "PLAYERSTATS_DB";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// DuckDB database file
    pub database: PathBuf,
    /// Base table name
    pub table: String,
    /// Where normalized `.csv` files are written
    pub workdir: PathBuf,
    /// Width of terminal bar charts, in cells
    pub chart_width: usize,
    /// Write Vega-Lite chart documents here when set
    pub chart_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: PathBuf::from("player_data.db"),
            table: DEFAULT_TABLE.to_string(),
            workdir: PathBuf::from("."),
            chart_width: 40,
            chart_dir: None,
        }
    }
}

impl Config {
    /// Parse a YAML document; missing keys keep their defaults
    pub fn from_yaml(path: &Path, text: &str) -> Result<Self> {
        serde_yaml_ng::from_str(text).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_yaml(path, &text)
    }

    /// Defaults, overlaid by `file` when given, then by the environment
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Ok(db) = std::env::var(DATABASE_ENV_VAR) {
            if !db.is_empty() {
                config.database = PathBuf::from(db);
            }
        }
        Ok(config)
    }
}
