//! Standard damage formula

use super::elements;
use super::{AttackContext, DamageFormula, DamageKind, DamageRoll};
use crate::config::CombatConstants;
use crate::creature::Creature;
use crate::types::AttackType;
use rand::Rng;

/// Default formula
///
/// 1. Dodge roll against the defender's dodge chance
/// 2. Mitigation with diminishing returns:
///    `reduction = defense / (defense + constant * attack)`
/// 3. Element multiplier
/// 4. Critical roll against the attacker's critical chance
/// 5. Combo multiplier, then the defending stance's reduction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StandardFormula {
    pub constants: CombatConstants,
}

impl StandardFormula {
    pub fn new(constants: CombatConstants) -> Self {
        StandardFormula { constants }
    }

    /// Damage left after the defense stat mitigates an attack
    pub fn mitigate(&self, attack: f64, defense: f64) -> f64 {
        if attack <= 0.0 {
            return 0.0;
        }
        if defense <= 0.0 {
            return attack;
        }
        let reduction = defense / (defense + self.constants.mitigation_constant * attack);
        (attack * (1.0 - reduction)).max(0.0)
    }
}

fn classify(attack: f64, defense: f64) -> DamageKind {
    if attack >= defense * 2.0 {
        DamageKind::Crushing
    } else if attack * 2.0 <= defense {
        DamageKind::Glancing
    } else {
        DamageKind::Normal
    }
}

impl DamageFormula for StandardFormula {
    fn combo_multiplier(&self, combo_level: u32) -> f64 {
        if combo_level <= 1 {
            return 1.0;
        }
        let steps = i32::try_from(combo_level - 1).unwrap_or(i32::MAX);
        let withheld = self.constants.combo_decay.powi(steps);
        1.0 + self.constants.combo_max_bonus * (1.0 - withheld)
    }

    fn calculate_damage<R: Rng + ?Sized>(
        &self,
        attacker: &Creature,
        defender: &Creature,
        attack: &AttackContext,
        rng: &mut R,
    ) -> DamageRoll {
        let attacker_stats = attacker.battle_stats.unwrap_or_default();
        let defender_stats = defender.battle_stats.unwrap_or_default();
        let effectiveness = elements::effectiveness(attacker.element, defender.element);

        if rng.gen::<f64>() * 100.0 < defender_stats.dodge_chance as f64 {
            return DamageRoll::dodged(effectiveness);
        }

        let attack_value = attack.attack_stat as f64;
        let defense_value = match attack.attack_type {
            AttackType::Magical => defender_stats.magical_defense,
            AttackType::Physical | AttackType::Auto => defender_stats.physical_defense,
        } as f64;

        let mut damage = self.mitigate(attack_value, defense_value);
        damage *= elements::multiplier(effectiveness);

        let is_critical = rng.gen::<f64>() * 100.0 < attacker_stats.critical_chance as f64;
        if is_critical {
            damage *= self.constants.crit_multiplier;
        }

        damage *= attack.combo_multiplier.max(1.0);

        if defender.is_defending {
            damage *= 1.0 - defender.defense_damage_reduction();
        }

        DamageRoll {
            damage: (damage.round() as i32).max(self.constants.min_damage),
            is_critical,
            is_dodged: false,
            effectiveness,
            kind: classify(attack_value, defense_value),
        }
    }
}
