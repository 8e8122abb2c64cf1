//! Effect catalog overrides loaded from TOML

use super::ConfigError;
use crate::effect::{EffectCatalog, EffectTemplate};
use crate::types::{ItemEffect, ItemType};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One catalog entry; an absent `effect` replaces the type's base template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub item_type: ItemType,
    #[serde(default)]
    pub effect: Option<ItemEffect>,
    #[serde(flatten)]
    pub template: EffectTemplate,
}

/// Container for catalog overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogOverrides {
    #[serde(default)]
    pub tools: Vec<CatalogEntry>,
    #[serde(default)]
    pub spells: Vec<CatalogEntry>,
}

impl CatalogOverrides {
    /// Register every entry on top of an existing catalog
    pub fn apply(self, catalog: &mut EffectCatalog) {
        for entry in self.tools {
            catalog.register_tool(entry.item_type, entry.effect, entry.template);
        }
        for entry in self.spells {
            catalog.register_spell(entry.item_type, entry.effect, entry.template);
        }
    }
}

/// Load overrides from a TOML file and layer them on the default catalog
pub fn load_catalog_overrides(path: &Path) -> Result<EffectCatalog, ConfigError> {
    let overrides: CatalogOverrides = super::read_sections(path)?;

    let mut catalog = EffectCatalog::with_defaults();
    overrides.apply(&mut catalog);

    Ok(catalog)
}

/// Parse overrides from a TOML string and layer them on the default catalog
pub fn parse_catalog_overrides(content: &str) -> Result<EffectCatalog, ConfigError> {
    let overrides: CatalogOverrides = super::parse_sections(content)?;

    let mut catalog = EffectCatalog::with_defaults();
    overrides.apply(&mut catalog);

    Ok(catalog)
}
