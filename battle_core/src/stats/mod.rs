//! Base and derived creature stats

mod modifiers;
mod recalculate;

pub use modifiers::StatModifiers;
pub use recalculate::{derive_anchor, recompute, refresh};

use crate::types::Attribute;
use serde::{Deserialize, Serialize};

/// Derived battle stat identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    PhysicalAttack,
    MagicalAttack,
    PhysicalDefense,
    MagicalDefense,
    MaxHealth,
    Initiative,
    CriticalChance,
    DodgeChance,
    EnergyCost,
}

impl Stat {
    /// All battle stats in declaration order
    pub fn all() -> &'static [Stat] {
        &[
            Stat::PhysicalAttack,
            Stat::MagicalAttack,
            Stat::PhysicalDefense,
            Stat::MagicalDefense,
            Stat::MaxHealth,
            Stat::Initiative,
            Stat::CriticalChance,
            Stat::DodgeChance,
            Stat::EnergyCost,
        ]
    }

    /// Percentage-style stats (excluded from combination scaling)
    pub fn is_chance(self) -> bool {
        matches!(self, Stat::CriticalChance | Stat::DodgeChance)
    }

    /// Lowest value this stat may take after effects are folded in
    pub fn floor(self) -> i32 {
        match self {
            Stat::PhysicalAttack
            | Stat::MagicalAttack
            | Stat::PhysicalDefense
            | Stat::MagicalDefense => 1,
            Stat::MaxHealth => 10,
            Stat::Initiative | Stat::CriticalChance | Stat::DodgeChance | Stat::EnergyCost => 0,
        }
    }
}

/// Immutable per-species attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    #[serde(default = "default_attribute")]
    pub energy: i32,
    #[serde(default = "default_attribute")]
    pub strength: i32,
    #[serde(default = "default_attribute")]
    pub magic: i32,
    #[serde(default = "default_attribute")]
    pub stamina: i32,
    #[serde(default = "default_attribute")]
    pub speed: i32,
}

fn default_attribute() -> i32 {
    5
}

impl Default for BaseStats {
    fn default() -> Self {
        BaseStats {
            energy: 5,
            strength: 5,
            magic: 5,
            stamina: 5,
            speed: 5,
        }
    }
}

impl BaseStats {
    pub fn new(energy: i32, strength: i32, magic: i32, stamina: i32, speed: i32) -> Self {
        BaseStats {
            energy,
            strength,
            magic,
            stamina,
            speed,
        }
    }

    pub fn get(&self, attribute: Attribute) -> i32 {
        match attribute {
            Attribute::Energy => self.energy,
            Attribute::Strength => self.strength,
            Attribute::Magic => self.magic,
            Attribute::Stamina => self.stamina,
            Attribute::Speed => self.speed,
        }
    }
}

/// Derived battle stats, recomputed every turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BattleStats {
    pub physical_attack: i32,
    pub magical_attack: i32,
    pub physical_defense: i32,
    pub magical_defense: i32,
    pub max_health: i32,
    pub initiative: i32,
    pub critical_chance: i32,
    pub dodge_chance: i32,
    pub energy_cost: i32,
}

impl BattleStats {
    pub fn get(&self, stat: Stat) -> i32 {
        match stat {
            Stat::PhysicalAttack => self.physical_attack,
            Stat::MagicalAttack => self.magical_attack,
            Stat::PhysicalDefense => self.physical_defense,
            Stat::MagicalDefense => self.magical_defense,
            Stat::MaxHealth => self.max_health,
            Stat::Initiative => self.initiative,
            Stat::CriticalChance => self.critical_chance,
            Stat::DodgeChance => self.dodge_chance,
            Stat::EnergyCost => self.energy_cost,
        }
    }

    pub fn set(&mut self, stat: Stat, value: i32) {
        let slot = match stat {
            Stat::PhysicalAttack => &mut self.physical_attack,
            Stat::MagicalAttack => &mut self.magical_attack,
            Stat::PhysicalDefense => &mut self.physical_defense,
            Stat::MagicalDefense => &mut self.magical_defense,
            Stat::MaxHealth => &mut self.max_health,
            Stat::Initiative => &mut self.initiative,
            Stat::CriticalChance => &mut self.critical_chance,
            Stat::DodgeChance => &mut self.dodge_chance,
            Stat::EnergyCost => &mut self.energy_cost,
        };
        *slot = value;
    }
}
