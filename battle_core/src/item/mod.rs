//! Tools and spells - templates, the pipeline that applies them and item synergy

mod pipeline;
mod power;
mod synergy;

pub use pipeline::{apply_spell, apply_spell_with_rng, apply_tool, SpellApplication, ToolApplication};
pub use power::{magic_power, power_multiplier, spell_crit_chance};
pub use synergy::{is_synergy, item_synergy, SynergyBonus, UsedEffect, SYNERGY_PAIRS};

use crate::types::{ItemEffect, ItemType};
use serde::{Deserialize, Serialize};

/// A tool as supplied by content generation
///
/// Tools are used on one of the user's own creatures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolTemplate {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tool_type: Option<ItemType>,
    #[serde(default)]
    pub tool_effect: Option<ItemEffect>,
}

impl ToolTemplate {
    pub fn new(name: impl Into<String>, tool_type: ItemType, tool_effect: ItemEffect) -> Self {
        let name = name.into();
        ToolTemplate {
            id: name.to_lowercase().replace(' ', "_"),
            name,
            tool_type: Some(tool_type),
            tool_effect: Some(tool_effect),
        }
    }
}

/// A spell as supplied by content generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellTemplate {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub spell_type: Option<ItemType>,
    #[serde(default)]
    pub spell_effect: Option<ItemEffect>,
}

impl SpellTemplate {
    pub fn new(name: impl Into<String>, spell_type: ItemType, spell_effect: ItemEffect) -> Self {
        let name = name.into();
        SpellTemplate {
            id: name.to_lowercase().replace(' ', "_"),
            name,
            spell_type: Some(spell_type),
            spell_effect: Some(spell_effect),
        }
    }
}
