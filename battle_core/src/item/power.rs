//! Power scaling for tools and spells

use crate::config::{BattleConstants, CapConstants, DifficultySettings};
use crate::stats::BaseStats;
use crate::types::ItemType;

/// Power multiplier for an item
///
/// Difficulty factor, times (for spells) `1 + (attribute - 5) * per_point`
/// on the attribute matching the spell type. Kept within
/// `[0.1, max_power]`; the floor wins if the caps are inverted.
pub fn power_multiplier(
    difficulty: &DifficultySettings,
    constants: &BattleConstants,
    caster: &BaseStats,
    spell_type: Option<ItemType>,
) -> f64 {
    let mut power = difficulty.power_factor;
    if let Some(spell_type) = spell_type {
        let attribute = caster.get(spell_type.attribute());
        power *= 1.0 + (attribute - 5) as f64 * constants.spell.attribute_power_per_point;
    }
    power
        .min(constants.caps.max_power)
        .max(CapConstants::MIN_POWER)
}

/// Caster magic power used to size spell damage and healing
pub fn magic_power(caster: &BaseStats, constants: &BattleConstants) -> f64 {
    1.0 + caster.magic.max(0) as f64 * constants.spell.magic_power_per_point
}

/// Percent chance for an instant spell to critically hit
pub fn spell_crit_chance(caster: &BaseStats, constants: &BattleConstants) -> i32 {
    let spell = &constants.spell;
    let from_magic = (caster.magic.max(0) as f64 * spell.crit_per_magic).floor() as i32;
    (spell.crit_base_percent + from_magic).min(spell.crit_max_percent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DifficultyTable;

    #[test]
    fn test_tool_power_is_difficulty_only() {
        let table = DifficultyTable::default();
        let constants = BattleConstants::default();
        let strong = BaseStats::new(5, 20, 20, 20, 20);
        let power = power_multiplier(&table.hard, &constants, &strong, None);
        assert!((power - 1.1).abs() < 0.001);
    }

    #[test]
    fn test_spell_power_uses_matching_attribute() {
        let table = DifficultyTable::default();
        let constants = BattleConstants::default();
        let caster = BaseStats::new(5, 5, 11, 5, 5);
        let power = power_multiplier(&table.medium, &constants, &caster, Some(ItemType::Magic));
        assert!((power - 1.3).abs() < 0.001);

        let power = power_multiplier(&table.medium, &constants, &caster, Some(ItemType::Speed));
        assert!((power - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_power_capped() {
        let table = DifficultyTable::default();
        let constants = BattleConstants::default();
        let caster = BaseStats::new(5, 5, 60, 5, 5);
        let power = power_multiplier(&table.expert, &constants, &caster, Some(ItemType::Magic));
        assert!((power - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_power_floor_wins_over_low_cap() {
        let table = DifficultyTable::default();
        let mut constants = BattleConstants::default();
        constants.caps.max_power = 0.0;
        let power = power_multiplier(&table.medium, &constants, &BaseStats::default(), None);
        assert!((power - 0.1).abs() < 0.001);
    }

    #[test]
    fn test_spell_crit_chance() {
        let constants = BattleConstants::default();
        assert_eq!(spell_crit_chance(&BaseStats::new(5, 5, 10, 5, 5), &constants), 6);
        assert_eq!(spell_crit_chance(&BaseStats::new(5, 5, 100, 5, 5), &constants), 15);
    }

    #[test]
    fn test_magic_power() {
        let constants = BattleConstants::default();
        let power = magic_power(&BaseStats::new(5, 5, 10, 5, 5), &constants);
        assert!((power - 2.5).abs() < 0.001);
    }
}
