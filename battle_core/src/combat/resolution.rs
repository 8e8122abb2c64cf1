//! Attack resolution - Apply one attack between two creature snapshots

use super::result::{ActionResult, DamageFigures, DefendResult};
use crate::config::{BattleConstants, DifficultySettings, StatusConstants};
use crate::creature::Creature;
use crate::damage::{AttackContext, DamageFormula, DamageKind, DamageRoll};
use crate::effect::{EffectInstance, Progression};
use crate::error::BattleError;
use crate::stats::{self, Stat, StatModifiers};
use crate::types::{AttackType, Effectiveness, ItemEffect, Rarity};
use rand::Rng;
use tracing::{debug, warn};

/// Resolve an attack (immutable API)
///
/// Uses the thread RNG. See [`resolve_attack_with_rng`].
pub fn resolve_attack<F: DamageFormula>(
    formula: &F,
    status: &StatusConstants,
    attacker: &Creature,
    defender: &Creature,
    attack_type: AttackType,
    combo_level: u32,
) -> ActionResult {
    let mut rng = rand::thread_rng();
    resolve_attack_with_rng(formula, status, attacker, defender, attack_type, combo_level, &mut rng)
}

/// Resolve an attack with a provided RNG (for deterministic testing)
///
/// 1. Pick the attack type (`Auto` takes the higher attack stat, physical on ties)
/// 2. Add and consume the attacker's pending charged bonus
/// 3. Let the formula roll dodge, critical and damage
/// 4. Apply damage, then roll the on-hit status debuffs
/// 5. Build the log line
pub fn resolve_attack_with_rng<F: DamageFormula>(
    formula: &F,
    status: &StatusConstants,
    attacker: &Creature,
    defender: &Creature,
    attack_type: AttackType,
    combo_level: u32,
    rng: &mut impl Rng,
) -> ActionResult {
    let (Some(attacker_stats), Some(_)) = (attacker.battle_stats, defender.battle_stats) else {
        let missing = if attacker.battle_stats.is_none() {
            &attacker.id
        } else {
            &defender.id
        };
        let error = BattleError::InvalidCombatant(format!("{} has no battle stats", missing));
        warn!(attacker = %attacker.id, defender = %defender.id, %error, "attack rejected");
        return ActionResult::rejected(attacker, defender, attack_type, error);
    };

    let mut new_attacker = attacker.clone();
    let mut new_defender = defender.clone();

    let attack_type = match attack_type {
        AttackType::Auto if attacker_stats.physical_attack >= attacker_stats.magical_attack => {
            AttackType::Physical
        }
        AttackType::Auto => AttackType::Magical,
        chosen => chosen,
    };

    let mut attack_stat = match attack_type {
        AttackType::Magical => attacker_stats.magical_attack,
        _ => attacker_stats.physical_attack,
    };
    if new_attacker.next_attack_bonus != 0 {
        debug!(attacker = %attacker.id, bonus = new_attacker.next_attack_bonus, "charged attack released");
        attack_stat += new_attacker.next_attack_bonus;
        new_attacker.next_attack_bonus = 0;
    }

    let combo_multiplier = formula.combo_multiplier(combo_level);
    let context = AttackContext {
        attack_type,
        attack_stat,
        combo_multiplier,
    };
    let roll = formula.calculate_damage(&new_attacker, &new_defender, &context, rng);

    let mut actual_damage = 0;
    let mut statuses_applied = Vec::new();
    if !roll.is_dodged {
        actual_damage = new_defender.take_damage(roll.damage);

        if roll.is_critical && rng.gen::<f64>() < status.trauma_chance {
            statuses_applied.push(apply_status(&mut new_defender, critical_trauma(defender.current_turn)));
        }
        if roll.effectiveness.is_effective() && rng.gen::<f64>() < status.weakness_chance {
            statuses_applied.push(apply_status(&mut new_defender, elemental_weakness(defender.current_turn)));
        }
        if !statuses_applied.is_empty() {
            new_defender = stats::refresh(new_defender);
        }
    }

    let log = attack_log(
        &new_attacker,
        &new_defender,
        attack_type,
        combo_level,
        &roll,
        actual_damage,
    );
    debug!(%log, "attack resolved");

    ActionResult {
        attacker: new_attacker,
        defender: new_defender,
        damage: DamageFigures::uniform(actual_damage),
        combo_level,
        combo_multiplier,
        attack_type,
        is_critical: roll.is_critical,
        is_dodged: roll.is_dodged,
        effectiveness: roll.effectiveness,
        damage_kind: roll.kind,
        statuses_applied,
        log,
        error: None,
    }
}

fn apply_status(defender: &mut Creature, effect: EffectInstance) -> String {
    let name = effect.name.clone();
    defender.push_effect(effect);
    name
}

/// Defense debuff that may follow a critical hit
///
/// In force from the hit until the next turn advance retires it.
pub fn critical_trauma(start_turn: u32) -> EffectInstance {
    EffectInstance::standard(
        "",
        "Critical Strike Trauma",
        1,
        start_turn,
        StatModifiers::new()
            .with(Stat::PhysicalDefense, -2)
            .with(Stat::MagicalDefense, -2),
        0,
        0,
    )
    .in_force()
}

/// Defense debuff that may follow an effective elemental hit
pub fn elemental_weakness(start_turn: u32) -> EffectInstance {
    EffectInstance::standard(
        "",
        "Elemental Weakness",
        2,
        start_turn,
        StatModifiers::new()
            .with(Stat::PhysicalDefense, -1)
            .with(Stat::MagicalDefense, -1),
        0,
        0,
    )
    .in_force()
}

fn attack_log(
    attacker: &Creature,
    defender: &Creature,
    attack_type: AttackType,
    combo_level: u32,
    roll: &DamageRoll,
    actual_damage: i32,
) -> String {
    if roll.is_dodged {
        return format!(
            "{}'s {} attack was dodged by {}!",
            attacker.species, attack_type, defender.species
        );
    }

    let mut log = format!(
        "{} used {} attack on {}",
        attacker.species, attack_type, defender.species
    );
    if roll.is_critical {
        log.push_str(" (Critical Hit!)");
    }
    if combo_level > 1 {
        log.push_str(&format!(" [Combo x{}!]", combo_level));
    }
    if roll.effectiveness != Effectiveness::Normal {
        log.push_str(&format!(" - {}!", roll.effectiveness));
    }
    if roll.kind != DamageKind::Normal {
        log.push_str(&format!(" [{}]", roll.kind));
    }
    log.push_str(&format!(" dealing {} damage.", actual_damage));

    let max_health = defender.max_health() as f64;
    let health = defender.current_health as f64;
    if !defender.is_alive() {
        let wording = match defender.rarity {
            Rarity::Legendary => "falls in battle!",
            Rarity::Epic => "has been defeated!",
            Rarity::Rare | Rarity::Common => "was defeated!",
        };
        log.push_str(&format!(" {} {}", defender.species, wording));
    } else if health < max_health * 0.2 {
        log.push_str(&format!(" {} is critically wounded!", defender.species));
    } else if health < max_health * 0.5 {
        log.push_str(&format!(" {} is wounded!", defender.species));
    }

    log
}

/// Put a creature into a defensive stance (immutable API)
///
/// Adds a "Defensive Stance" effect raising both defenses by a share of the
/// anchor value plus a rarity bonus, and refreshes stats at once.
pub fn defend(
    creature: &Creature,
    constants: &BattleConstants,
    difficulty: &DifficultySettings,
) -> DefendResult {
    if creature.battle_stats.is_none() {
        let error = BattleError::InvalidCombatant(format!("{} has no battle stats", creature.id));
        warn!(creature = %creature.id, %error, "defend rejected");
        return DefendResult {
            creature: creature.clone(),
            log: format!("Defend failed: {}", error),
            error: Some(error),
        };
    }

    let anchor = stats::derive_anchor(&creature.base_stats, creature.rarity, creature.form);
    let rarity_bonus = creature.rarity.stat_multiplier() - 1.0;
    let ratio = constants.defend.defense_ratio;
    let boost = |defense: i32| {
        let share = (defense as f64 * ratio).round();
        (share + (share * rarity_bonus).round()) as i32
    };

    let stat_changes = StatModifiers::new()
        .with(Stat::PhysicalDefense, boost(anchor.physical_defense))
        .with(Stat::MagicalDefense, boost(anchor.magical_defense));

    // A fresh stance replaces any earlier one
    let mut new_creature = creature.clone();
    new_creature
        .active_effects
        .retain(|e| !matches!(e.progression, Progression::PersistentDefense { .. }));
    let stance = EffectInstance::new(
        "",
        "Defensive Stance",
        constants.defend.duration,
        creature.current_turn,
        Progression::PersistentDefense {
            stat_changes,
            damage_reduction: difficulty.defense_damage_reduction,
        },
    )
    .with_effect_type(ItemEffect::Shield);
    new_creature.push_effect(stance);
    new_creature.is_defending = true;
    let new_creature = stats::refresh(new_creature);

    let log = format!("{} takes a defensive stance!", creature.species);
    debug!(creature = %creature.id, "defending");
    DefendResult {
        creature: new_creature,
        log,
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::damage::StandardFormula;
    use crate::stats::{BaseStats, BattleStats};
    use crate::types::Element;
    use rand::rngs::mock::StepRng;

    fn never() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    fn always() -> StepRng {
        StepRng::new(0, 0)
    }

    fn with_stats(mut creature: Creature, stats: BattleStats) -> Creature {
        creature.battle_stats = Some(stats);
        creature.current_health = stats.max_health;
        creature
    }

    fn block(attack: i32, magic: i32, defense: i32, dodge: i32) -> BattleStats {
        BattleStats {
            physical_attack: attack,
            magical_attack: magic,
            physical_defense: defense,
            magical_defense: defense,
            max_health: 100,
            initiative: 10,
            critical_chance: 5,
            dodge_chance: dodge,
            energy_cost: 3,
        }
    }

    #[test]
    fn test_basic_attack() {
        let attacker = with_stats(Creature::new("a", "Emberpup"), block(20, 5, 5, 3));
        let defender = with_stats(Creature::new("d", "Mossback"), block(5, 5, 10, 3));

        let result = resolve_attack_with_rng(
            &StandardFormula::default(),
            &StatusConstants::default(),
            &attacker,
            &defender,
            AttackType::Physical,
            1,
            &mut never(),
        );

        assert!(result.error.is_none());
        assert_eq!(result.damage.actual_damage, 18);
        assert_eq!(result.damage.damage_dealt, 18);
        assert_eq!(result.defender.current_health, 82);
        assert_eq!(defender.current_health, 100);
        assert!(result.log.contains("dealing 18 damage."));
        assert!(result.log.starts_with("Emberpup used physical attack on Mossback"));
    }

    #[test]
    fn test_auto_picks_higher_attack() {
        let attacker = with_stats(Creature::new("a", "Sparkwing"), block(5, 20, 5, 3));
        let defender = with_stats(Creature::new("d", "Mossback"), block(5, 5, 10, 3));
        let result = resolve_attack_with_rng(
            &StandardFormula::default(),
            &StatusConstants::default(),
            &attacker,
            &defender,
            AttackType::Auto,
            1,
            &mut never(),
        );
        assert_eq!(result.attack_type, AttackType::Magical);
        assert!(result.log.contains("magical attack"));
    }

    #[test]
    fn test_charged_bonus_consumed() {
        let mut attacker = with_stats(Creature::new("a", "Emberpup"), block(20, 5, 5, 3));
        attacker.next_attack_bonus = 20;
        let defender = with_stats(Creature::new("d", "Mossback"), block(5, 5, 10, 3));
        let result = resolve_attack_with_rng(
            &StandardFormula::default(),
            &StatusConstants::default(),
            &attacker,
            &defender,
            AttackType::Physical,
            1,
            &mut never(),
        );
        assert!(result.damage.actual_damage > 18);
        assert_eq!(result.attacker.next_attack_bonus, 0);
    }

    #[test]
    fn test_dodged_attack() {
        let attacker = with_stats(Creature::new("a", "Emberpup"), block(20, 5, 5, 3));
        let defender = with_stats(Creature::new("d", "Mossback"), block(5, 5, 10, 3));
        let result = resolve_attack_with_rng(
            &StandardFormula::default(),
            &StatusConstants::default(),
            &attacker,
            &defender,
            AttackType::Physical,
            1,
            &mut always(),
        );
        assert!(result.is_dodged);
        assert_eq!(result.damage, DamageFigures::default());
        assert_eq!(
            result.log,
            "Emberpup's physical attack was dodged by Mossback!"
        );
    }

    #[test]
    fn test_critical_and_effective_hit_apply_statuses() {
        let attacker = with_stats(
            Creature::new("a", "Emberpup").with_element(Element::Fire),
            block(20, 5, 5, 3),
        );
        let defender = with_stats(
            Creature::new("d", "Mossback").with_element(Element::Earth),
            block(5, 5, 10, 0),
        );
        let result = resolve_attack_with_rng(
            &StandardFormula::default(),
            &StatusConstants::default(),
            &attacker,
            &defender,
            AttackType::Physical,
            3,
            &mut always(),
        );

        assert!(result.is_critical);
        assert_eq!(
            result.statuses_applied,
            vec!["Critical Strike Trauma", "Elemental Weakness"]
        );
        assert_eq!(result.defender.active_effects.len(), 2);
        assert!(result.log.contains("(Critical Hit!)"));
        assert!(result.log.contains("[Combo x3!]"));
        assert!(result.log.contains("- effective!"));
    }

    #[test]
    fn test_trauma_retired_on_next_turn_weakness_lasts_two() {
        use crate::config::{BattleConstants, DifficultyTable};
        use crate::turn::{advance_turn, FieldState, Side};

        let attacker = Creature::new("a", "Emberpup")
            .with_element(Element::Fire)
            .deploy();
        let mut defender = Creature::new("d", "Mossback")
            .with_base_stats(BaseStats::new(5, 5, 5, 20, 5))
            .with_element(Element::Earth)
            .deploy();
        defender.current_turn = 3;
        let anchor = defender.battle_stats.unwrap();
        if let Some(stats) = defender.battle_stats.as_mut() {
            stats.dodge_chance = 0;
        }

        let result = resolve_attack_with_rng(
            &StandardFormula::default(),
            &StatusConstants::default(),
            &attacker,
            &defender,
            AttackType::Physical,
            1,
            &mut always(),
        );
        assert_eq!(result.statuses_applied.len(), 2);
        // Both statuses count for the rest of the turn they were inflicted
        let hit = result.defender.battle_stats.unwrap();
        assert_eq!(hit.physical_defense, anchor.physical_defense - 3);

        let constants = BattleConstants::default();
        let medium = DifficultyTable::default().medium;
        let field = FieldState::new(Side::new(vec![result.defender]), Side::default());

        let report = advance_turn(&field, 4, &constants, &medium);
        let d = &report.field.player.creatures[0];
        let names: Vec<&str> = d.active_effects.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Elemental Weakness"]);
        assert_eq!(
            d.battle_stats.unwrap().physical_defense,
            anchor.physical_defense - 1
        );

        let report = advance_turn(&report.field, 5, &constants, &medium);
        let d = &report.field.player.creatures[0];
        assert!(d.active_effects.is_empty());
        assert_eq!(d.battle_stats.unwrap(), anchor);
    }

    #[test]
    fn test_missing_stats_rejected() {
        let attacker = Creature::new("a", "Emberpup");
        let defender = with_stats(Creature::new("d", "Mossback"), block(5, 5, 10, 3));
        let result = resolve_attack_with_rng(
            &StandardFormula::default(),
            &StatusConstants::default(),
            &attacker,
            &defender,
            AttackType::Physical,
            1,
            &mut never(),
        );
        assert!(matches!(result.error, Some(BattleError::InvalidCombatant(_))));
        assert_eq!(result.damage.actual_damage, 0);
        assert_eq!(result.defender, defender);
    }

    #[test]
    fn test_defeat_wording_by_rarity() {
        let attacker = with_stats(Creature::new("a", "Emberpup"), block(200, 5, 5, 3));
        let mut defender = with_stats(
            Creature::new("d", "Dracolich").with_rarity(Rarity::Legendary),
            block(5, 5, 1, 0),
        );
        defender.current_health = 5;
        let result = resolve_attack_with_rng(
            &StandardFormula::default(),
            &StatusConstants::default(),
            &attacker,
            &defender,
            AttackType::Physical,
            1,
            &mut never(),
        );
        assert_eq!(result.damage.actual_damage, 5);
        assert!(result.log.ends_with("Dracolich falls in battle!"));
        assert!(result.is_killing_blow());
    }

    #[test]
    fn test_defend_boosts_from_anchor() {
        let creature = Creature::new("c", "Shellback")
            .with_base_stats(BaseStats::new(5, 5, 5, 10, 5))
            .deploy();
        let anchor = stats::derive_anchor(&creature.base_stats, creature.rarity, creature.form);
        let medium = crate::config::DifficultyTable::default().medium;

        let result = defend(&creature, &BattleConstants::default(), &medium);
        let defending = result.creature;
        let stats = defending.battle_stats.unwrap();
        let expected = anchor.physical_defense + (anchor.physical_defense as f64 * 0.5).round() as i32;
        assert_eq!(stats.physical_defense, expected);
        assert!(defending.is_defending);
        assert!((defending.defense_damage_reduction() - 0.2).abs() < f64::EPSILON);
        assert_eq!(result.log, "Shellback takes a defensive stance!");
        assert!(result.error.is_none());
    }

    #[test]
    fn test_defend_requires_stats() {
        let creature = Creature::new("c", "Shellback");
        let medium = crate::config::DifficultyTable::default().medium;
        let result = defend(&creature, &BattleConstants::default(), &medium);
        assert_eq!(result.creature, creature);
        assert!(matches!(result.error, Some(BattleError::InvalidCombatant(_))));
    }
}
