//! Turn advance - regen, effect progression, stat refresh and death cascade

use crate::cascade::resolve_deaths;
use crate::config::{BattleConstants, DifficultySettings};
use crate::creature::{Creature, CreatureId};
use crate::effect::{self, Settlement};
use crate::energy;
use crate::error::BattleError;
use crate::stats;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One side of the battle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Side {
    #[serde(default)]
    pub creatures: Vec<Creature>,
    #[serde(default)]
    pub energy: i32,
    #[serde(default)]
    pub momentum: i32,
}

impl Side {
    pub fn new(creatures: Vec<Creature>) -> Self {
        Side {
            creatures,
            energy: 0,
            momentum: 0,
        }
    }

    pub fn with_energy(mut self, energy: i32) -> Self {
        self.energy = energy;
        self
    }

    pub fn find(&self, id: &CreatureId) -> Option<&Creature> {
        self.creatures.iter().find(|c| &c.id == id)
    }

    /// Replace the creature with the same id, if present
    pub fn replace(&mut self, creature: Creature) -> bool {
        match self.creatures.iter_mut().find(|c| c.id == creature.id) {
            Some(slot) => {
                *slot = creature;
                true
            }
            None => false,
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.creatures.iter().all(|c| !c.is_alive())
    }
}

/// Both fields of a battle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldState {
    pub player: Side,
    pub enemy: Side,
}

impl FieldState {
    pub fn new(player: Side, enemy: Side) -> Self {
        FieldState { player, enemy }
    }
}

/// Result of advancing a turn
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub field: FieldState,
    pub turn: u32,
    /// Creatures removed from either field this turn
    pub defeated: Vec<CreatureId>,
    pub log: Vec<String>,
    /// Malformed effects that were skipped
    pub errors: Vec<BattleError>,
}

/// A creature after its effects have run for the turn
struct Ticked {
    creature: Creature,
    log: Vec<String>,
    errors: Vec<BattleError>,
}

/// Advance every effect on a creature and settle the turn's health change
fn tick_creature(creature: &Creature, turn: u32, difficulty: &DifficultySettings) -> Ticked {
    let mut log = Vec::new();
    let mut errors = Vec::new();

    if !creature.is_deployed() {
        return Ticked {
            creature: creature.clone(),
            log,
            errors,
        };
    }

    let mut next = creature.clone();
    next.current_turn = turn;

    let mut processed = Vec::with_capacity(creature.active_effects.len());
    for instance in &creature.active_effects {
        // Used this turn, first runs on the next advance
        if instance.is_pending(turn) {
            processed.push(instance.clone());
            continue;
        }
        if effect::is_retired(instance, turn) {
            log.push(format!("{}'s {} wore off.", creature.species, instance.name));
            continue;
        }
        let result = effect::advance(instance, turn);
        if let Some(error) = result.error {
            log.push(format!(
                "{}'s {} fizzled: {}",
                creature.species, instance.name, error
            ));
            errors.push(error);
        }
        if result.effect.is_final_burst {
            log.push(format!(
                "{}'s {} reaches final burst!",
                creature.species, instance.name
            ));
        }
        processed.push(result.effect);
    }
    next.active_effects = processed;

    let mut next = stats::refresh(next);
    let settlement = Settlement::tally(
        &next.active_effects,
        difficulty.effect_health_scaling,
        next.rarity,
    );
    let change = settlement.apply_to(&mut next);
    if change != 0 {
        let line = match (settlement.damage > 0, settlement.healing > 0) {
            (true, true) => format!(
                "{} took {} damage and healed {} (net: {:+})",
                creature.species, settlement.damage, settlement.healing, change
            ),
            (true, false) => format!(
                "{} took {} damage from effects",
                creature.species, settlement.damage
            ),
            _ => format!("{} healed {} from effects", creature.species, settlement.healing),
        };
        log.push(line);
    }
    if settlement.attack_bonus > 0 {
        log.push(format!(
            "{}'s next attack is charged with +{} power!",
            creature.species, settlement.attack_bonus
        ));
    }
    next.is_defending = next.has_defense_effect();

    debug!(creature = %creature.id, turn, effects = next.active_effects.len(), change, "creature ticked");

    Ticked {
        creature: next,
        log,
        errors,
    }
}

fn tick_side(
    side: &Side,
    turn: u32,
    difficulty: &DifficultySettings,
    log: &mut Vec<String>,
    errors: &mut Vec<BattleError>,
) -> Vec<Creature> {
    side.creatures
        .iter()
        .map(|creature| {
            let ticked = tick_creature(creature, turn, difficulty);
            log.extend(ticked.log);
            errors.extend(ticked.errors);
            ticked.creature
        })
        .collect()
}

/// Energy after this turn's regen and momentum bonus, capped at the field max
fn regenerate(side: &Side, constants: &BattleConstants, difficulty: &DifficultySettings) -> i32 {
    let regen = energy::regen(&side.creatures, difficulty);
    let bonus = energy::momentum(side.momentum, &constants.momentum).bonus_regen;
    let cap = energy::max_energy(&side.creatures, difficulty);
    (side.energy + regen + bonus).min(cap)
}

/// Advance the battle to `turn`
///
/// Call once per turn with the new turn number. Runs in a fixed order:
/// 1. Regenerate energy for both sides
/// 2. Drop retired effects and advance the rest on every creature
/// 3. Refresh stats and settle effect healing and damage
/// 4. Resolve deaths on the player field, then the enemy field
///
/// Effects whose start turn is still ahead are carried over untouched.
/// Cascade bonuses created here count for the rest of the turn and are
/// first advanced on the next one.
pub fn advance_turn(
    field: &FieldState,
    turn: u32,
    constants: &BattleConstants,
    difficulty: &DifficultySettings,
) -> TurnReport {
    let mut log = Vec::new();
    let mut errors = Vec::new();

    let mut player = field.player.clone();
    let mut enemy = field.enemy.clone();

    player.energy = regenerate(&field.player, constants, difficulty);
    enemy.energy = regenerate(&field.enemy, constants, difficulty);
    log.push(format!(
        "Turn {}: player energy {} -> {}, enemy energy {} -> {}",
        turn, field.player.energy, player.energy, field.enemy.energy, enemy.energy
    ));

    player.creatures = tick_side(&field.player, turn, difficulty, &mut log, &mut errors);
    enemy.creatures = tick_side(&field.enemy, turn, difficulty, &mut log, &mut errors);

    let mut defeated = Vec::new();

    let outcome = resolve_deaths(&player.creatures, &enemy.creatures);
    player.creatures = outcome.survivors;
    enemy.creatures = outcome.opposing;
    defeated.extend(outcome.defeated.into_iter().map(|c| c.id));
    log.extend(outcome.log);

    let outcome = resolve_deaths(&enemy.creatures, &player.creatures);
    enemy.creatures = outcome.survivors;
    player.creatures = outcome.opposing;
    defeated.extend(outcome.defeated.into_iter().map(|c| c.id));
    log.extend(outcome.log);

    if !errors.is_empty() {
        warn!(turn, skipped = errors.len(), "malformed effects skipped");
    }

    TurnReport {
        field: FieldState { player, enemy },
        turn,
        defeated,
        log,
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DifficultyTable;
    use crate::effect::{EchoParams, EffectInstance, Progression};
    use crate::stats::{Stat, StatModifiers};
    use crate::types::Rarity;

    fn fielded(id: &str) -> Creature {
        Creature::new(id, id).deploy()
    }

    fn poisoned(id: &str, damage: i32, duration: u32) -> Creature {
        let mut c = fielded(id);
        c.push_effect(EffectInstance::standard(
            "",
            "Poison",
            duration,
            0,
            StatModifiers::new(),
            damage,
            0,
        ));
        c
    }

    #[test]
    fn test_regen_then_cap() {
        let table = DifficultyTable::default();
        let constants = BattleConstants::default();
        let field = FieldState::new(
            Side::new(vec![fielded("a")]).with_energy(11),
            Side::new(vec![fielded("e")]),
        );
        let report = advance_turn(&field, 1, &constants, &table.medium);
        assert_eq!(report.field.player.energy, 12);
        // 3 base + 0.5 from energy 5 = 3.5 -> 4
        assert_eq!(report.field.enemy.energy, 4);
    }

    #[test]
    fn test_momentum_adds_bonus_regen() {
        let table = DifficultyTable::default();
        let constants = BattleConstants::default();
        let mut player = Side::new(vec![fielded("a")]);
        player.momentum = 25;
        let field = FieldState::new(player, Side::new(vec![fielded("e")]));
        let report = advance_turn(&field, 1, &constants, &table.medium);
        assert_eq!(report.field.player.energy, 6);
    }

    #[test]
    fn test_effect_damage_applied_and_expired() {
        let table = DifficultyTable::default();
        let constants = BattleConstants::default();
        let c = poisoned("a", 7, 2);
        let start = c.current_health;
        let field = FieldState::new(Side::new(vec![c]), Side::new(vec![fielded("e")]));

        let report = advance_turn(&field, 1, &constants, &table.medium);
        let a = &report.field.player.creatures[0];
        assert_eq!(a.current_health, start - 7);
        assert!(report.log.iter().any(|l| l.contains("took 7 damage")));

        let report = advance_turn(&report.field, 2, &constants, &table.medium);
        assert!(report.field.player.creatures[0].active_effects.is_empty());
        assert!(report.log.iter().any(|l| l.contains("wore off")));
    }

    #[test]
    fn test_effect_damage_scaled_by_difficulty_and_rarity() {
        let table = DifficultyTable::default();
        let constants = BattleConstants::default();
        let mut c = Creature::new("a", "Drakon")
            .with_rarity(Rarity::Legendary)
            .deploy();
        c.push_effect(EffectInstance::standard(
            "",
            "Poison",
            3,
            0,
            StatModifiers::new(),
            10,
            0,
        ));
        let start = c.current_health;
        let field = FieldState::new(Side::new(vec![c]), Side::default());
        let report = advance_turn(&field, 1, &constants, &table.expert);
        // 10 * 1.25 = 12.5 -> 13, 13 * 1.2 = 15.6 -> 16
        assert_eq!(report.field.player.creatures[0].current_health, start - 16);
    }

    #[test]
    fn test_malformed_effect_skipped_others_advance() {
        let table = DifficultyTable::default();
        let constants = BattleConstants::default();
        let mut broken = fielded("a");
        broken.active_effects.push(EffectInstance::new(
            "bad",
            "Broken Echo",
            3,
            0,
            Progression::Echo(EchoParams {
                stat_base: StatModifiers::new().with(Stat::PhysicalAttack, 5),
                damage_base: 0,
                healing_base: 0,
                decay_rate: 0.0,
            }),
        ));
        let other = poisoned("b", 4, 3);
        let other_start = other.current_health;

        let field = FieldState::new(Side::new(vec![broken, other]), Side::default());
        let report = advance_turn(&field, 1, &constants, &table.medium);

        assert_eq!(report.errors.len(), 1);
        assert!(report.log.iter().any(|l| l.contains("fizzled")));
        let a = &report.field.player.creatures[0];
        assert_eq!(
            a.battle_stats.unwrap(),
            stats::derive_anchor(&a.base_stats, a.rarity, a.form)
        );
        assert_eq!(report.field.player.creatures[1].current_health, other_start - 4);
    }

    #[test]
    fn test_defeated_removed_after_cascade() {
        let table = DifficultyTable::default();
        let constants = BattleConstants::default();
        let mut doomed = poisoned("a", 500, 3);
        doomed.rarity = Rarity::Epic;
        let field = FieldState::new(
            Side::new(vec![doomed, fielded("b")]),
            Side::new(vec![fielded("e")]),
        );
        let report = advance_turn(&field, 1, &constants, &table.medium);
        assert_eq!(report.defeated, vec![CreatureId::from("a")]);
        assert_eq!(report.field.player.creatures.len(), 1);
        assert_eq!(
            report.field.player.creatures[0].active_effects[0].name,
            "Epic Essence"
        );
        assert_eq!(
            report.field.enemy.creatures[0].active_effects[0].name,
            "Guilty Conscience"
        );
    }

    #[test]
    fn test_pending_effect_waits_for_its_start_turn() {
        let table = DifficultyTable::default();
        let constants = BattleConstants::default();
        let mut c = fielded("a");
        c.push_effect(EffectInstance::standard(
            "",
            "Regrowth",
            2,
            2,
            StatModifiers::new().with(Stat::PhysicalDefense, 4),
            0,
            0,
        ));
        let anchor = c.battle_stats.unwrap();
        let field = FieldState::new(Side::new(vec![c]), Side::default());

        let report = advance_turn(&field, 1, &constants, &table.medium);
        let a = &report.field.player.creatures[0];
        assert_eq!(a.battle_stats.unwrap(), anchor);
        assert!(a.active_effects[0].stat_modifications.is_empty());

        let report = advance_turn(&report.field, 2, &constants, &table.medium);
        let a = &report.field.player.creatures[0];
        assert_eq!(
            a.battle_stats.unwrap().physical_defense,
            anchor.physical_defense + 4
        );
    }

    #[test]
    fn test_input_field_untouched() {
        let table = DifficultyTable::default();
        let constants = BattleConstants::default();
        let field = FieldState::new(
            Side::new(vec![poisoned("a", 5, 3)]),
            Side::new(vec![fielded("e")]),
        );
        let snapshot = field.clone();
        let _ = advance_turn(&field, 1, &constants, &table.medium);
        assert_eq!(field, snapshot);
    }
}
