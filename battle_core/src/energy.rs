//! Energy economy - per-turn regeneration, field energy cap and momentum

use crate::config::{DifficultySettings, MomentumConstants};
use crate::creature::Creature;
use crate::types::Attribute;
use serde::{Deserialize, Serialize};

/// Regeneration constants
pub mod constants {
    /// Regen contributed per point of a creature's energy attribute
    pub const REGEN_PER_ENERGY: f64 = 0.1;

    /// Extra regen multiplier per form tier
    pub const REGEN_FORM_BONUS: f64 = 0.05;

    /// Flat regen per energy specialist on the field
    pub const SPECIALIST_BONUS: f64 = 0.5;

    /// Energy cap gained per creature on the field
    pub const CAP_PER_CREATURE: f64 = 0.25;
}

/// Energy cap for a field
///
/// `base_energy + floor(count * 0.25)`
pub fn max_energy(creatures: &[Creature], difficulty: &DifficultySettings) -> i32 {
    let bonus = (creatures.len() as f64 * constants::CAP_PER_CREATURE).floor() as i32;
    difficulty.base_energy + bonus
}

/// Energy regenerated by a field this turn
///
/// Base regen for the difficulty, plus each creature's energy attribute
/// scaled by rarity and form, plus a flat bonus per energy specialist.
/// Rounded, then capped at the field's max energy.
pub fn regen(creatures: &[Creature], difficulty: &DifficultySettings) -> i32 {
    let contribution: f64 = creatures
        .iter()
        .map(|c| {
            c.base_stats.energy.max(0) as f64
                * constants::REGEN_PER_ENERGY
                * c.rarity.energy_multiplier()
                * (1.0 + c.form as f64 * constants::REGEN_FORM_BONUS)
        })
        .sum();

    let specialists = creatures
        .iter()
        .filter(|c| c.has_specialty(Attribute::Energy))
        .count();
    let specialty = specialists as f64 * constants::SPECIALIST_BONUS;

    let total = (difficulty.base_regen as f64 + contribution + specialty).round() as i32;
    total.min(max_energy(creatures, difficulty))
}

/// Momentum converted into bonus regen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MomentumBonus {
    pub bonus_regen: i32,
    /// Momentum still needed for the next point of bonus regen
    pub next_threshold: i32,
}

/// Convert accumulated momentum into bonus regen
pub fn momentum(total: i32, constants: &MomentumConstants) -> MomentumBonus {
    let step = constants.points_per_bonus.max(1);
    let total = total.max(0);
    MomentumBonus {
        bonus_regen: total / step,
        next_threshold: step - total % step,
    }
}

/// Action whose energy value is being weighed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlannedAction {
    Attack,
    Defend,
    Deploy,
    /// Anything else, valued at a flat 10
    Other,
}

/// Value per energy point of an action, rounded to one decimal
///
/// Attack is worth the creature's best attack, defend twice its best
/// defense, deploy a tenth of its power rating. A cost of 0 or less gives 0.
pub fn efficiency(action: PlannedAction, creature: &Creature, energy_cost: i32) -> f64 {
    if energy_cost <= 0 {
        return 0.0;
    }
    let stats = creature.battle_stats.unwrap_or_default();
    let value = match action {
        PlannedAction::Attack => stats.physical_attack.max(stats.magical_attack) as f64,
        PlannedAction::Defend => stats.physical_defense.max(stats.magical_defense) as f64 * 2.0,
        PlannedAction::Deploy => creature.power() as f64 / 10.0,
        PlannedAction::Other => 10.0,
    };
    (value / energy_cost as f64 * 10.0).round() / 10.0
}
