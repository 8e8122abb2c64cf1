//! Settlement - turn a creature's processed effects into health changes

use super::{BurstTarget, EffectInstance, Progression};
use crate::creature::Creature;
use crate::types::Rarity;

/// Health and attack-bonus totals for one turn of effects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settlement {
    /// Scaled healing
    pub healing: i32,
    /// Scaled damage
    pub damage: i32,
    /// Charge bursts banked for the next attack
    pub attack_bonus: i32,
}

/// Scale an effect amount by difficulty, then by the holder's rarity
pub fn scale_effect_health(amount: i32, difficulty_scaling: f64, rarity: Rarity) -> i32 {
    let by_difficulty = (amount as f64 * difficulty_scaling).round();
    (by_difficulty * rarity.effect_health_multiplier()).round() as i32
}

impl Settlement {
    /// Sum the contributions of already-processed effects
    pub fn tally(effects: &[EffectInstance], difficulty_scaling: f64, rarity: Rarity) -> Self {
        let mut healing = 0;
        let mut damage = 0;
        let mut attack_bonus = 0;

        for effect in effects {
            let banked = effect.is_final_burst
                && matches!(
                    &effect.progression,
                    Progression::Charge(params) if params.burst_target == BurstTarget::NextAttack
                );
            if banked {
                attack_bonus = effect.damage_this_turn.max(0).saturating_add(attack_bonus);
                continue;
            }
            damage = effect.damage_this_turn.max(0).saturating_add(damage);
            healing = effect.healing_this_turn.max(0).saturating_add(healing);
        }

        Settlement {
            healing: scale_effect_health(healing, difficulty_scaling, rarity),
            damage: scale_effect_health(damage, difficulty_scaling, rarity),
            attack_bonus,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.healing == 0 && self.damage == 0 && self.attack_bonus == 0
    }

    /// Apply to a creature, clamping health to `[0, max_health]`
    ///
    /// Returns the actual change in health.
    pub fn apply_to(&self, creature: &mut Creature) -> i32 {
        creature.next_attack_bonus = creature.next_attack_bonus.saturating_add(self.attack_bonus);
        let before = creature.current_health;
        creature.current_health = before
            .saturating_add(self.healing)
            .saturating_sub(self.damage)
            .clamp(0, creature.max_health());
        creature.current_health - before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{ChargeParams, Ramp};
    use crate::stats::StatModifiers;

    fn tick(damage: i32, healing: i32) -> EffectInstance {
        let mut effect =
            EffectInstance::standard("t", "Tick", 3, 0, StatModifiers::new(), damage, healing);
        effect.damage_this_turn = damage;
        effect.healing_this_turn = healing;
        effect
    }

    #[test]
    fn test_scaling_rounds_each_step() {
        assert_eq!(scale_effect_health(10, 1.0, Rarity::Common), 10);
        assert_eq!(scale_effect_health(20, 1.15, Rarity::Common), 23);
        // 10 * 1.25 = 12.5 -> 13, 13 * 1.2 = 15.6 -> 16
        assert_eq!(scale_effect_health(10, 1.25, Rarity::Legendary), 16);
    }

    #[test]
    fn test_net_change_clamped() {
        let mut creature = Creature::new("c", "Mossback").deploy();
        let max = creature.max_health();
        creature.current_health = max - 5;

        let settlement = Settlement::tally(&[tick(0, 20)], 1.0, Rarity::Common);
        assert_eq!(settlement.apply_to(&mut creature), 5);
        assert_eq!(creature.current_health, max);

        let settlement = Settlement::tally(&[tick(500, 3)], 1.0, Rarity::Common);
        settlement.apply_to(&mut creature);
        assert_eq!(creature.current_health, 0);
    }

    #[test]
    fn test_banked_burst_skips_health() {
        let mut burst = EffectInstance::new(
            "b",
            "Charge",
            4,
            0,
            Progression::Charge(ChargeParams {
                target_stats: Vec::new(),
                stat_ramp: Ramp::new(5, 5),
                damage_ramp: Ramp::default(),
                healing_ramp: Ramp::default(),
                max_turns: 3,
                final_burst: 20,
                burst_target: BurstTarget::NextAttack,
            }),
        );
        burst.is_final_burst = true;
        burst.damage_this_turn = 20;

        let settlement = Settlement::tally(&[burst], 1.0, Rarity::Common);
        assert_eq!(settlement.damage, 0);
        assert_eq!(settlement.attack_bonus, 20);
    }
}
