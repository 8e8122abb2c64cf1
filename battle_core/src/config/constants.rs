//! Battle constants configuration

use super::ConfigError;
use serde::{Deserialize, Serialize};

/// Tunable battle constants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BattleConstants {
    #[serde(default)]
    pub caps: CapConstants,
    #[serde(default)]
    pub spell: SpellConstants,
    #[serde(default)]
    pub status: StatusConstants,
    #[serde(default)]
    pub combat: CombatConstants,
    #[serde(default)]
    pub defend: DefendConstants,
    #[serde(default)]
    pub momentum: MomentumConstants,
}

impl BattleConstants {
    /// Constants shipped with the crate, or the coded defaults if the
    /// embedded file does not parse
    pub fn embedded() -> Self {
        let toml = include_str!("../../config/constants.toml");
        Self::parse(toml).unwrap_or_default()
    }

    /// Parse and validate constants from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let constants: BattleConstants = super::parse_sections(content)?;
        constants.validate()?;
        Ok(constants)
    }

    /// Reject values the engine cannot run with
    ///
    /// Stat caps must be non-negative and power bounds finite, with
    /// `max_power` at least the 0.1 power floor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.caps.validate()?;

        let chances = [
            ("trauma_chance", self.status.trauma_chance),
            ("weakness_chance", self.status.weakness_chance),
        ];
        for (name, value) in chances {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::out_of_range(
                    "status",
                    format!("{} must be within [0, 1], got {}", name, value),
                ));
            }
        }
        if self.momentum.points_per_bonus <= 0 {
            return Err(ConfigError::out_of_range(
                "momentum",
                "points_per_bonus must be positive",
            ));
        }
        if !(self.combat.combo_decay > 0.0 && self.combat.combo_decay < 1.0) {
            return Err(ConfigError::out_of_range(
                "combat",
                format!(
                    "combo_decay must be within (0, 1), got {}",
                    self.combat.combo_decay
                ),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapConstants {
    /// Largest stat delta a tool may grant before power scaling
    #[serde(default = "default_tool_stat_cap")]
    pub tool_stat: i32,
    #[serde(default = "default_spell_stat_cap")]
    pub spell_stat: i32,
    /// Stat deltas are scaled by at most this much power
    #[serde(default = "default_stat_power")]
    pub stat_power: f64,
    #[serde(default = "default_tool_heal_cap")]
    pub tool_heal: f64,
    #[serde(default = "default_spell_heal_cap")]
    pub spell_heal: f64,
    #[serde(default = "default_spell_damage_cap")]
    pub spell_damage: f64,
    /// Upper bound on the combined power multiplier
    #[serde(default = "default_max_power")]
    pub max_power: f64,
}

impl Default for CapConstants {
    fn default() -> Self {
        CapConstants {
            tool_stat: 10,
            spell_stat: 12,
            stat_power: 1.5,
            tool_heal: 50.0,
            spell_heal: 80.0,
            spell_damage: 100.0,
            max_power: 2.0,
        }
    }
}

impl CapConstants {
    /// Lowest power multiplier an item can have
    pub const MIN_POWER: f64 = 0.1;

    fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("tool_stat", self.tool_stat), ("spell_stat", self.spell_stat)] {
            if value < 0 {
                return Err(ConfigError::out_of_range(
                    "caps",
                    format!("{} must not be negative, got {}", name, value),
                ));
            }
        }
        for (name, value) in [
            ("tool_heal", self.tool_heal),
            ("spell_heal", self.spell_heal),
            ("spell_damage", self.spell_damage),
            ("stat_power", self.stat_power),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::out_of_range(
                    "caps",
                    format!("{} must be a finite non-negative number, got {}", name, value),
                ));
            }
        }
        if !self.max_power.is_finite() || self.max_power < Self::MIN_POWER {
            return Err(ConfigError::out_of_range(
                "caps",
                format!(
                    "max_power must be finite and at least {}, got {}",
                    Self::MIN_POWER,
                    self.max_power
                ),
            ));
        }
        Ok(())
    }
}

fn default_tool_stat_cap() -> i32 {
    10
}
fn default_spell_stat_cap() -> i32 {
    12
}
fn default_stat_power() -> f64 {
    1.5
}
fn default_tool_heal_cap() -> f64 {
    50.0
}
fn default_spell_heal_cap() -> f64 {
    80.0
}
fn default_spell_damage_cap() -> f64 {
    100.0
}
fn default_max_power() -> f64 {
    2.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellConstants {
    /// Magic power = 1 + magic * this
    #[serde(default = "default_magic_power_per_point")]
    pub magic_power_per_point: f64,
    /// Power factor per point of the spell's attribute above 5
    #[serde(default = "default_attribute_power_per_point")]
    pub attribute_power_per_point: f64,
    #[serde(default = "default_crit_base")]
    pub crit_base_percent: i32,
    #[serde(default = "default_crit_per_magic")]
    pub crit_per_magic: f64,
    #[serde(default = "default_crit_max")]
    pub crit_max_percent: i32,
    #[serde(default = "default_crit_multiplier")]
    pub crit_multiplier: f64,
    /// Extra damage fraction for armor-piercing spells
    #[serde(default = "default_armor_piercing_bonus")]
    pub armor_piercing_bonus: f64,
    /// Power at which any damaging spell pierces armor
    #[serde(default = "default_armor_piercing_power")]
    pub armor_piercing_power: f64,
}

impl Default for SpellConstants {
    fn default() -> Self {
        SpellConstants {
            magic_power_per_point: 0.15,
            attribute_power_per_point: 0.05,
            crit_base_percent: 3,
            crit_per_magic: 0.3,
            crit_max_percent: 15,
            crit_multiplier: 1.5,
            armor_piercing_bonus: 0.2,
            armor_piercing_power: 1.3,
        }
    }
}

fn default_magic_power_per_point() -> f64 {
    0.15
}
fn default_attribute_power_per_point() -> f64 {
    0.05
}
fn default_crit_base() -> i32 {
    3
}
fn default_crit_per_magic() -> f64 {
    0.3
}
fn default_crit_max() -> i32 {
    15
}
fn default_crit_multiplier() -> f64 {
    1.5
}
fn default_armor_piercing_bonus() -> f64 {
    0.2
}
fn default_armor_piercing_power() -> f64 {
    1.3
}

/// On-hit status debuff chances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusConstants {
    #[serde(default = "default_trauma_chance")]
    pub trauma_chance: f64,
    #[serde(default = "default_weakness_chance")]
    pub weakness_chance: f64,
}

impl Default for StatusConstants {
    fn default() -> Self {
        StatusConstants {
            trauma_chance: 0.2,
            weakness_chance: 0.25,
        }
    }
}

fn default_trauma_chance() -> f64 {
    0.2
}
fn default_weakness_chance() -> f64 {
    0.25
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatConstants {
    /// Mitigation constant: reduction = defense / (defense + constant * attack)
    #[serde(default = "default_mitigation_constant")]
    pub mitigation_constant: f64,
    #[serde(default = "default_crit_multiplier")]
    pub crit_multiplier: f64,
    #[serde(default = "default_min_damage")]
    pub min_damage: i32,
    /// Largest extra multiplier a combo can reach
    #[serde(default = "default_combo_max_bonus")]
    pub combo_max_bonus: f64,
    /// Fraction of the remaining combo bonus withheld per level
    #[serde(default = "default_combo_decay")]
    pub combo_decay: f64,
}

impl Default for CombatConstants {
    fn default() -> Self {
        CombatConstants {
            mitigation_constant: 5.0,
            crit_multiplier: 1.5,
            min_damage: 1,
            combo_max_bonus: 0.5,
            combo_decay: 0.8,
        }
    }
}

fn default_mitigation_constant() -> f64 {
    5.0
}
fn default_min_damage() -> i32 {
    1
}
fn default_combo_max_bonus() -> f64 {
    0.5
}
fn default_combo_decay() -> f64 {
    0.8
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefendConstants {
    /// Fraction of anchor defense added while defending
    #[serde(default = "default_defense_ratio")]
    pub defense_ratio: f64,
    #[serde(default = "default_defend_duration")]
    pub duration: u32,
}

impl Default for DefendConstants {
    fn default() -> Self {
        DefendConstants {
            defense_ratio: 0.5,
            duration: 2,
        }
    }
}

fn default_defense_ratio() -> f64 {
    0.5
}
fn default_defend_duration() -> u32 {
    2
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumConstants {
    /// Momentum points per point of bonus regen
    #[serde(default = "default_points_per_bonus")]
    pub points_per_bonus: i32,
}

impl Default for MomentumConstants {
    fn default() -> Self {
        MomentumConstants {
            points_per_bonus: 10,
        }
    }
}

fn default_points_per_bonus() -> i32 {
    10
}
