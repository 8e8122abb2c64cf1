//! Core enums shared across the engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Creature rarity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rarity {
    #[default]
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Stat multiplier applied when deriving battle stats
    pub fn stat_multiplier(self) -> f64 {
        match self {
            Rarity::Common => 1.0,
            Rarity::Rare => 1.03,
            Rarity::Epic => 1.06,
            Rarity::Legendary => 1.1,
        }
    }

    /// Multiplier on a creature's energy contribution to regen
    pub fn energy_multiplier(self) -> f64 {
        match self {
            Rarity::Common => 1.0,
            Rarity::Rare => 1.1,
            Rarity::Epic => 1.2,
            Rarity::Legendary => 1.3,
        }
    }

    /// Multiplier on per-turn effect healing and damage taken by this creature
    pub fn effect_health_multiplier(self) -> f64 {
        match self {
            Rarity::Common => 1.0,
            Rarity::Rare => 1.1,
            Rarity::Epic => 1.15,
            Rarity::Legendary => 1.2,
        }
    }

    /// Tier rank, Common = 1 up to Legendary = 4
    pub fn rank(self) -> i32 {
        match self {
            Rarity::Common => 1,
            Rarity::Rare => 2,
            Rarity::Epic => 3,
            Rarity::Legendary => 4,
        }
    }
}

/// Creature attribute (base stat) identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Energy,
    Strength,
    Magic,
    Stamina,
    Speed,
}

/// Elemental affinity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Fire,
    Water,
    Earth,
    Air,
    Light,
    Dark,
    #[default]
    Neutral,
}

/// Elemental matchup outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effectiveness {
    VeryEffective,
    Effective,
    Normal,
    NotVeryEffective,
}

impl Effectiveness {
    /// Whether this matchup can trigger the elemental weakness debuff
    pub fn is_effective(self) -> bool {
        matches!(self, Effectiveness::VeryEffective | Effectiveness::Effective)
    }
}

impl fmt::Display for Effectiveness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Effectiveness::VeryEffective => "very effective",
            Effectiveness::Effective => "effective",
            Effectiveness::Normal => "normal",
            Effectiveness::NotVeryEffective => "not very effective",
        };
        f.write_str(label)
    }
}

/// Requested attack type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackType {
    Physical,
    Magical,
    #[default]
    Auto,
}

impl fmt::Display for AttackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AttackType::Physical => "physical",
            AttackType::Magical => "magical",
            AttackType::Auto => "auto",
        };
        f.write_str(label)
    }
}

/// Game difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Expert,
}

/// Tool/spell type, keyed to the attribute it draws on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Energy,
    Strength,
    Magic,
    Stamina,
    Speed,
}

impl ItemType {
    /// The caster attribute that scales spells of this type
    pub fn attribute(self) -> Attribute {
        match self {
            ItemType::Energy => Attribute::Energy,
            ItemType::Strength => Attribute::Strength,
            ItemType::Magic => Attribute::Magic,
            ItemType::Stamina => Attribute::Stamina,
            ItemType::Speed => Attribute::Speed,
        }
    }
}

/// Tool/spell effect family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemEffect {
    Surge,
    Shield,
    Echo,
    Drain,
    Charge,
}

impl ItemEffect {
    /// Lookup key handed to presentation collaborators
    pub fn as_str(self) -> &'static str {
        match self {
            ItemEffect::Surge => "Surge",
            ItemEffect::Shield => "Shield",
            ItemEffect::Echo => "Echo",
            ItemEffect::Drain => "Drain",
            ItemEffect::Charge => "Charge",
        }
    }
}

/// Coarse power bucket for presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerLevel {
    Weak,
    #[default]
    Normal,
    Strong,
    Maximum,
}

impl PowerLevel {
    /// Bucket a power multiplier
    pub fn from_multiplier(power: f64) -> Self {
        if power >= 1.5 {
            PowerLevel::Maximum
        } else if power >= 1.3 {
            PowerLevel::Strong
        } else if power >= 1.1 {
            PowerLevel::Normal
        } else {
            PowerLevel::Weak
        }
    }
}
