//! Item synergy - bonus for using complementary effects together

use crate::stats::StatModifiers;
use crate::types::ItemEffect;
use serde::{Deserialize, Serialize};

/// Effect families that reinforce each other, matched in either order
pub const SYNERGY_PAIRS: [(ItemEffect, ItemEffect); 5] = [
    (ItemEffect::Surge, ItemEffect::Drain),
    (ItemEffect::Shield, ItemEffect::Echo),
    (ItemEffect::Charge, ItemEffect::Surge),
    (ItemEffect::Drain, ItemEffect::Echo),
    (ItemEffect::Shield, ItemEffect::Charge),
];

/// Bonus granted per synergistic pair
pub mod constants {
    pub const DAMAGE_PER_PAIR: i32 = 5;
    pub const HEALING_PER_PAIR: i32 = 3;
    pub const DURATION_PER_PAIR: u32 = 1;
    /// Added to each stat the first item of a pair changes
    pub const STAT_PER_PAIR: i32 = 1;
}

/// An item effect as used this turn
#[derive(Debug, Clone, PartialEq)]
pub struct UsedEffect {
    pub effect: ItemEffect,
    pub stat_changes: StatModifiers,
}

impl UsedEffect {
    pub fn new(effect: ItemEffect, stat_changes: StatModifiers) -> Self {
        UsedEffect {
            effect,
            stat_changes,
        }
    }
}

/// Extra damage, healing, duration and stats from combining items
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynergyBonus {
    pub stat_changes: StatModifiers,
    pub damage: i32,
    pub healing: i32,
    pub duration: u32,
    /// Number of synergistic pairs found
    pub pairs: u32,
}

pub fn is_synergy(a: ItemEffect, b: ItemEffect) -> bool {
    SYNERGY_PAIRS
        .iter()
        .any(|&(x, y)| (x == a && y == b) || (x == b && y == a))
}

/// Combined bonus for every synergistic pair among `used`
///
/// Each unordered pair is checked once. A match adds a fixed amount of
/// damage, healing and duration, plus one point to every stat the earlier
/// item of the pair changes. `None` when fewer than two items were used or
/// no pair matched.
pub fn item_synergy(used: &[UsedEffect]) -> Option<SynergyBonus> {
    if used.len() < 2 {
        return None;
    }

    let mut bonus = SynergyBonus::default();
    for (i, first) in used.iter().enumerate() {
        for second in &used[i + 1..] {
            if !is_synergy(first.effect, second.effect) {
                continue;
            }
            bonus.pairs += 1;
            bonus.damage += constants::DAMAGE_PER_PAIR;
            bonus.healing += constants::HEALING_PER_PAIR;
            bonus.duration += constants::DURATION_PER_PAIR;
            for stat in first.stat_changes.stats() {
                bonus.stat_changes.add(stat, constants::STAT_PER_PAIR);
            }
        }
    }

    if bonus.pairs == 0 {
        None
    } else {
        Some(bonus)
    }
}
