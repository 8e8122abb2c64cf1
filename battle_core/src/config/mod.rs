//! Battle configuration - constants, difficulty table and catalog overrides
//!
//! Each file is a set of TOML sections (`[caps]`, `[combat]`, `[medium]`,
//! `[[tools]]`...). Missing sections and keys fall back to the coded
//! defaults, so a file only needs the values it changes.

mod catalog;
mod constants;
mod difficulty;

pub use catalog::{load_catalog_overrides, parse_catalog_overrides, CatalogEntry, CatalogOverrides};
pub use constants::{
    BattleConstants, CapConstants, CombatConstants, DefendConstants, MomentumConstants,
    SpellConstants, StatusConstants,
};
pub use difficulty::{DifficultySettings, DifficultyTable};

use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a battle config file was refused
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read battle config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Bad TOML, or a section whose keys have the wrong type
    #[error("malformed battle config: {0}")]
    Malformed(#[from] toml::de::Error),
    /// A value parsed but is outside what the engine can run with
    #[error("[{section}] {message}")]
    OutOfRange {
        section: &'static str,
        message: String,
    },
}

impl ConfigError {
    pub(crate) fn out_of_range(section: &'static str, message: impl Into<String>) -> Self {
        ConfigError::OutOfRange {
            section,
            message: message.into(),
        }
    }
}

/// Read a battle config file into its section struct
pub fn read_sections<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_sections(&content)
}

/// Parse battle config sections from a TOML string
pub fn parse_sections<T: DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    Ok(toml::from_str(content)?)
}
