//! Damage formula - attack stat vs defense, element, crit, combo

pub mod elements;
mod formula;

pub use formula::StandardFormula;

use crate::creature::Creature;
use crate::types::{AttackType, Effectiveness};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inputs the resolver fixes before the formula rolls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackContext {
    /// Resolved attack type (never `Auto`)
    pub attack_type: AttackType,
    /// Attacking stat including any pending charged bonus
    pub attack_stat: i32,
    pub combo_multiplier: f64,
}

/// Flavour of a landed hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageKind {
    #[default]
    Normal,
    /// Attack far outweighs defense
    Crushing,
    /// Defense far outweighs attack
    Glancing,
}

impl fmt::Display for DamageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DamageKind::Normal => "normal",
            DamageKind::Crushing => "crushing",
            DamageKind::Glancing => "glancing",
        };
        f.write_str(label)
    }
}

/// Outcome of a damage roll
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageRoll {
    pub damage: i32,
    pub is_critical: bool,
    pub is_dodged: bool,
    pub effectiveness: Effectiveness,
    pub kind: DamageKind,
}

impl DamageRoll {
    pub fn dodged(effectiveness: Effectiveness) -> Self {
        DamageRoll {
            damage: 0,
            is_critical: false,
            is_dodged: true,
            effectiveness,
            kind: DamageKind::Normal,
        }
    }
}

/// Pluggable damage calculation
pub trait DamageFormula {
    /// Multiplier for the given combo level; 1.0 at level 1 or below and
    /// never decreasing as the level grows
    fn combo_multiplier(&self, combo_level: u32) -> f64;

    /// Roll dodge and critical and compute the damage of one attack
    fn calculate_damage<R: Rng + ?Sized>(
        &self,
        attacker: &Creature,
        defender: &Creature,
        attack: &AttackContext,
        rng: &mut R,
    ) -> DamageRoll;
}
