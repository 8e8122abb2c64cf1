//! Per-difficulty tuning table

use super::ConfigError;
use crate::types::Difficulty;
use serde::{Deserialize, Serialize};

/// Numbers that vary with the selected difficulty
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultySettings {
    /// Flat energy regen per turn
    pub base_regen: i32,
    /// Energy cap before the per-creature bonus
    pub base_energy: i32,
    /// Multiplier on tool and spell power
    pub power_factor: f64,
    /// Multiplier on per-turn effect healing and damage
    #[serde(default = "default_scaling")]
    pub effect_health_scaling: f64,
    /// Damage reduction granted by the defend action
    pub defense_damage_reduction: f64,
}

fn default_scaling() -> f64 {
    1.0
}

/// Settings for every difficulty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTable {
    pub easy: DifficultySettings,
    pub medium: DifficultySettings,
    pub hard: DifficultySettings,
    pub expert: DifficultySettings,
}

impl Default for DifficultyTable {
    fn default() -> Self {
        DifficultyTable {
            easy: DifficultySettings {
                base_regen: 2,
                base_energy: 10,
                power_factor: 0.9,
                effect_health_scaling: 1.0,
                defense_damage_reduction: 0.2,
            },
            medium: DifficultySettings {
                base_regen: 3,
                base_energy: 12,
                power_factor: 1.0,
                effect_health_scaling: 1.0,
                defense_damage_reduction: 0.2,
            },
            hard: DifficultySettings {
                base_regen: 4,
                base_energy: 15,
                power_factor: 1.1,
                effect_health_scaling: 1.15,
                defense_damage_reduction: 0.4,
            },
            expert: DifficultySettings {
                base_regen: 5,
                base_energy: 18,
                power_factor: 1.2,
                effect_health_scaling: 1.25,
                defense_damage_reduction: 0.4,
            },
        }
    }
}

impl DifficultyTable {
    /// Table shipped with the crate, or the coded defaults if the embedded
    /// file does not parse
    pub fn embedded() -> Self {
        let toml = include_str!("../../config/difficulty.toml");
        Self::parse(toml).unwrap_or_default()
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let table: DifficultyTable = super::parse_sections(content)?;
        table.validate()?;
        Ok(table)
    }

    pub fn get(&self, difficulty: Difficulty) -> &DifficultySettings {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
            Difficulty::Expert => &self.expert,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, settings) in [
            ("easy", &self.easy),
            ("medium", &self.medium),
            ("hard", &self.hard),
            ("expert", &self.expert),
        ] {
            if settings.base_energy <= 0 || settings.base_regen < 0 {
                return Err(ConfigError::out_of_range(
                    name,
                    "energy settings must be non-negative with a positive cap",
                ));
            }
            if !(0.0..=1.0).contains(&settings.defense_damage_reduction) {
                return Err(ConfigError::out_of_range(
                    name,
                    "defense_damage_reduction must be within [0, 1]",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_matches_defaults() {
        assert_eq!(DifficultyTable::embedded(), DifficultyTable::default());
    }

    #[test]
    fn test_lookup() {
        let table = DifficultyTable::default();
        assert_eq!(table.get(Difficulty::Hard).base_regen, 4);
        assert_eq!(table.get(Difficulty::Expert).base_energy, 18);
        assert!((table.get(Difficulty::Easy).power_factor - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_zero_cap() {
        let mut table = DifficultyTable::default();
        table.medium.base_energy = 0;
        assert!(table.validate().is_err());
    }
}
