//! Stat recalculation - base stats + this turn's effect deltas
//!
//! Battle stats are always rebuilt from the anchor (base stats scaled by
//! rarity and form). They are never updated by adding a delta to their own
//! previous value, so recalculating any number of times in a turn gives the
//! same answer.

use super::{BaseStats, BattleStats, Stat, StatModifiers};
use crate::creature::Creature;
use crate::types::Rarity;

/// Recalculation constants
pub mod constants {
    /// Multiplicative bonus per combination level
    pub const COMBINATION_BONUS_PER_LEVEL: f64 = 0.08;

    /// Stat multiplier gained per form (evolution tier)
    pub const FORM_BONUS_PER_TIER: f64 = 0.15;

    /// Highest form tier
    pub const MAX_FORM: u8 = 3;
}

/// Stat multiplier for a form tier
pub fn form_multiplier(form: u8) -> f64 {
    1.0 + constants::FORM_BONUS_PER_TIER * form.min(constants::MAX_FORM) as f64
}

/// Derive battle stats from base attributes alone (no effects, no modifiers)
pub fn derive_anchor(base: &BaseStats, rarity: Rarity, form: u8) -> BattleStats {
    let mult = rarity.stat_multiplier() * form_multiplier(form);
    let scaled = |value: f64| (value * mult).round() as i32;

    BattleStats {
        physical_attack: scaled(5.0 + 2.0 * base.strength as f64),
        magical_attack: scaled(5.0 + 2.0 * base.magic as f64),
        physical_defense: scaled(3.0 + 1.5 * base.stamina as f64),
        magical_defense: scaled(3.0 + 0.75 * (base.magic + base.stamina) as f64),
        max_health: scaled(40.0 + 6.0 * base.stamina as f64),
        initiative: scaled(5.0 + 2.0 * base.speed as f64),
        // Chance stats are percentages and do not scale with rarity/form
        critical_chance: 5 + base.speed.max(0) / 4,
        dodge_chance: 3 + base.speed.max(0) / 5,
        energy_cost: 3 + form.min(constants::MAX_FORM) as i32,
    }
}

/// Rebuild a creature's battle stats
///
/// 1. Anchor from base stats, rarity and form
/// 2. Add the summed `stat_modifications` of every active effect, then floor
/// 3. Add permanent modifications, then apply the combination multiplier
pub fn recompute(creature: &Creature) -> BattleStats {
    let mut stats = derive_anchor(&creature.base_stats, creature.rarity, creature.form);

    let mut effect_totals = StatModifiers::new();
    for effect in &creature.active_effects {
        effect_totals.merge(&effect.stat_modifications);
    }

    for &stat in Stat::all() {
        let value = stats.get(stat) + effect_totals.get(stat);
        stats.set(stat, value.max(stat.floor()));
    }

    for (stat, value) in creature.permanent_modifications.iter() {
        stats.set(stat, stats.get(stat) + value);
    }

    if creature.combination_level > 0 {
        let multiplier =
            1.0 + creature.combination_level as f64 * constants::COMBINATION_BONUS_PER_LEVEL;
        for &stat in Stat::all() {
            if stat.is_chance() || stat == Stat::EnergyCost {
                continue;
            }
            let value = (stats.get(stat) as f64 * multiplier).round() as i32;
            stats.set(stat, value);
        }
    }

    stats
}

/// Return the creature with freshly computed battle stats and health clamped
/// to the new maximum
pub fn refresh(mut creature: Creature) -> Creature {
    let stats = recompute(&creature);
    creature.current_health = creature.current_health.clamp(0, stats.max_health);
    creature.battle_stats = Some(stats);
    creature
}
