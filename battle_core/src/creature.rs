//! Creature - A battle instance deployed on a field

use crate::effect::{ChargeStatus, EffectId, EffectInstance, Progression};
use crate::stats::{self, BaseStats, BattleStats, StatModifiers};
use crate::types::{Attribute, Element, Rarity};
use serde::{Deserialize, Serialize};

/// Identifier for a deployed creature
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreatureId(pub String);

impl From<&str> for CreatureId {
    fn from(s: &str) -> Self {
        CreatureId(s.to_string())
    }
}

impl From<String> for CreatureId {
    fn from(s: String) -> Self {
        CreatureId(s)
    }
}

impl std::fmt::Display for CreatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A creature on a battle field
///
/// Engine operations never mutate a creature they were handed; they clone it
/// and return the updated copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    // === Identity ===
    pub id: CreatureId,
    pub species: String,
    #[serde(default)]
    pub rarity: Rarity,
    /// Evolution tier (0-3)
    #[serde(default)]
    pub form: u8,
    #[serde(default)]
    pub element: Element,
    #[serde(default)]
    pub specialty_stats: Vec<Attribute>,

    // === Stats ===
    #[serde(default)]
    pub base_stats: BaseStats,
    /// Derived stats; `None` until the creature is deployed
    #[serde(default)]
    pub battle_stats: Option<BattleStats>,
    #[serde(default)]
    pub current_health: i32,

    // === Effects and modifiers ===
    #[serde(default)]
    pub active_effects: Vec<EffectInstance>,
    #[serde(default)]
    pub permanent_modifications: StatModifiers,
    #[serde(default)]
    pub combination_level: u32,

    // === Transient state ===
    #[serde(default)]
    pub is_defending: bool,
    /// Bonus added to the next attack's stat, then consumed
    #[serde(default)]
    pub next_attack_bonus: i32,
    /// Turn stamp used as `start_turn` for effects created on this creature
    #[serde(default)]
    pub current_turn: u32,
    #[serde(default)]
    effect_seq: u32,
}

impl Creature {
    /// Create an undeployed common creature with default attributes
    pub fn new(id: impl Into<CreatureId>, species: impl Into<String>) -> Self {
        Creature {
            id: id.into(),
            species: species.into(),
            rarity: Rarity::Common,
            form: 0,
            element: Element::Neutral,
            specialty_stats: Vec::new(),
            base_stats: BaseStats::default(),
            battle_stats: None,
            current_health: 0,
            active_effects: Vec::new(),
            permanent_modifications: StatModifiers::new(),
            combination_level: 0,
            is_defending: false,
            next_attack_bonus: 0,
            current_turn: 0,
            effect_seq: 0,
        }
    }

    pub fn with_base_stats(mut self, base_stats: BaseStats) -> Self {
        self.base_stats = base_stats;
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn with_form(mut self, form: u8) -> Self {
        self.form = form;
        self
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = element;
        self
    }

    pub fn with_specialty(mut self, attribute: Attribute) -> Self {
        if !self.specialty_stats.contains(&attribute) {
            self.specialty_stats.push(attribute);
        }
        self
    }

    /// Compute battle stats and start at full health
    pub fn deploy(self) -> Self {
        let mut creature = stats::refresh(self);
        creature.current_health = creature.max_health();
        creature
    }

    /// Check if the creature is still standing
    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }

    pub fn is_deployed(&self) -> bool {
        self.battle_stats.is_some()
    }

    /// Max health from battle stats (0 if undeployed)
    pub fn max_health(&self) -> i32 {
        self.battle_stats.map(|s| s.max_health).unwrap_or(0)
    }

    /// Health as a fraction of max health
    pub fn health_fraction(&self) -> f64 {
        let max = self.max_health();
        if max <= 0 {
            return 0.0;
        }
        (self.current_health as f64 / max as f64).clamp(0.0, 1.0)
    }

    pub fn has_specialty(&self, attribute: Attribute) -> bool {
        self.specialty_stats.contains(&attribute)
    }

    /// Heal by amount, capped at max health. Returns the amount actually healed.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.current_health;
        self.current_health = (self.current_health + amount.max(0)).min(self.max_health());
        self.current_health - before
    }

    /// Take damage, floored at zero. Returns the amount actually lost.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let before = self.current_health;
        self.current_health = (self.current_health - amount.max(0)).max(0);
        before - self.current_health
    }

    /// Mint a deterministic id for a new effect owned by this creature
    pub fn next_effect_id(&mut self, turn: u32) -> EffectId {
        self.effect_seq += 1;
        EffectId(format!("{}-t{}-{}", self.id, turn, self.effect_seq))
    }

    /// Attach an effect as given, stamping its id from this creature's sequence
    ///
    /// The effect is not processed here; `advance_turn` runs it from its
    /// `start_turn` on. Battle stats are not refreshed either.
    pub fn push_effect(&mut self, mut instance: EffectInstance) -> EffectId {
        instance.id = self.next_effect_id(instance.start_turn);
        let id = instance.id.clone();
        self.active_effects.push(instance);
        id
    }

    /// Overall strength rating used to compare creatures
    ///
    /// `2 * best attack + best defense + max_health / 10`, plus half the
    /// initiative, critical and dodge chances, 5 per form and 10 per rarity
    /// rank. 0 while undeployed.
    pub fn power(&self) -> i32 {
        let Some(stats) = &self.battle_stats else {
            return 0;
        };
        let attack = stats.physical_attack.max(stats.magical_attack) as f64;
        let defense = stats.physical_defense.max(stats.magical_defense) as f64;
        let utility = (stats.initiative + stats.critical_chance + stats.dodge_chance) as f64;
        (attack * 2.0
            + defense
            + stats.max_health as f64 * 0.1
            + utility * 0.5
            + self.form as f64 * 5.0
            + self.rarity.rank() as f64 * 10.0)
            .round() as i32
    }

    /// Build-up of every charge effect on this creature, by effect name
    pub fn charge_statuses(&self) -> Vec<(&str, ChargeStatus)> {
        self.active_effects
            .iter()
            .filter_map(|e| e.charge_status.map(|status| (e.name.as_str(), status)))
            .collect()
    }

    /// Whether any defensive stance is still in place
    pub fn has_defense_effect(&self) -> bool {
        self.active_effects
            .iter()
            .any(|e| matches!(e.progression, Progression::PersistentDefense { .. }))
    }

    /// Strongest damage reduction granted by an active defensive stance
    pub fn defense_damage_reduction(&self) -> f64 {
        self.active_effects
            .iter()
            .filter_map(|e| match &e.progression {
                Progression::PersistentDefense { damage_reduction, .. } => Some(*damage_reduction),
                _ => None,
            })
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deploy_sets_full_health() {
        let c = Creature::new("a", "Emberpup").deploy();
        assert!(c.is_deployed());
        assert_eq!(c.current_health, c.max_health());
        assert!(c.is_alive());
    }

    #[test]
    fn test_heal_and_damage_clamp() {
        let mut c = Creature::new("a", "Emberpup").deploy();
        let max = c.max_health();
        assert_eq!(c.heal(50), 0);
        assert_eq!(c.take_damage(max + 100), max);
        assert_eq!(c.current_health, 0);
        assert!(!c.is_alive());
    }

    #[test]
    fn test_effect_ids_are_deterministic() {
        let mut a = Creature::new("a", "Emberpup");
        let mut b = Creature::new("a", "Emberpup");
        assert_eq!(a.next_effect_id(3), b.next_effect_id(3));
        assert_eq!(a.next_effect_id(3).0, "a-t3-2");
    }

    #[test]
    fn test_pushed_effect_is_stored_unprocessed() {
        use crate::stats::Stat;

        let mut c = Creature::new("a", "Emberpup").deploy();
        c.current_turn = 4;
        let id = c.push_effect(EffectInstance::standard(
            "",
            "Regrowth",
            2,
            5,
            StatModifiers::new().with(Stat::MaxHealth, 5),
            0,
            4,
        ));
        assert_eq!(id.0, "a-t5-1");
        assert_eq!(c.active_effects.len(), 1);
        assert_eq!(c.active_effects[0].id, id);
        assert!(c.active_effects[0].stat_modifications.is_empty());
        assert_eq!(c.active_effects[0].healing_this_turn, 0);
    }

    #[test]
    fn test_power_rating() {
        assert_eq!(Creature::new("a", "Emberpup").power(), 0);

        let mut c = Creature::new("a", "Emberpup")
            .with_rarity(Rarity::Rare)
            .with_form(1);
        c.battle_stats = Some(BattleStats {
            physical_attack: 20,
            magical_attack: 12,
            physical_defense: 10,
            magical_defense: 14,
            max_health: 100,
            initiative: 15,
            critical_chance: 10,
            dodge_chance: 5,
            energy_cost: 3,
        });
        // 40 + 14 + 10 + 15 + 5 + 20
        assert_eq!(c.power(), 104);
    }

    #[test]
    fn test_charge_statuses_listed_by_name() {
        use crate::effect::{BurstTarget, ChargeParams, Ramp};
        use crate::stats::Stat;

        let mut c = Creature::new("a", "Emberpup").deploy();
        c.push_effect(EffectInstance::new(
            "",
            "Power Coil",
            4,
            1,
            Progression::Charge(ChargeParams {
                target_stats: vec![Stat::PhysicalAttack],
                stat_ramp: Ramp::new(5, 5),
                damage_ramp: Ramp::default(),
                healing_ramp: Ramp::default(),
                max_turns: 3,
                final_burst: 20,
                burst_target: BurstTarget::NextAttack,
            }),
        ));
        let statuses = c.charge_statuses();
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].0, "Power Coil");
        assert_eq!(statuses[0].1.turns_remaining, 3);
        assert!(!statuses[0].1.is_ready);
    }

    #[test]
    fn test_deserialize_template_with_missing_fields() {
        let json = r#"{"id": "x", "species": "Mossback", "rarity": "Epic"}"#;
        let c: Creature = serde_json::from_str(json).unwrap();
        assert_eq!(c.rarity, Rarity::Epic);
        assert!(c.battle_stats.is_none());
        assert_eq!(c.base_stats, BaseStats::default());
    }
}
