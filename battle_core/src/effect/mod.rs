//! Effect system - temporary buffs/debuffs and their per-turn progression

mod catalog;
pub mod processor;
mod settle;

pub use catalog::{
    safe_spell_template, safe_tool_template, ChargeTemplate, EchoTemplate, EffectCatalog,
    EffectTemplate,
};
pub use processor::{advance, is_retired, turns_active, ProcessedEffect};
pub use settle::{scale_effect_health, Settlement};

use crate::creature::CreatureId;
use crate::error::BattleError;
use crate::stats::{Stat, StatModifiers};
use crate::types::{ItemEffect, PowerLevel};
use serde::{Deserialize, Serialize};

/// Identifier for an effect instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectId(pub String);

/// Linear per-turn ramp: `base + per_turn * (turn - 1)`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ramp {
    pub base: i32,
    pub per_turn: i32,
}

impl Ramp {
    pub fn new(base: i32, per_turn: i32) -> Self {
        Ramp { base, per_turn }
    }

    /// Value on the given 1-indexed turn, saturating at the `i32` bounds
    pub fn at(&self, turns_active: u32) -> i32 {
        let steps = i64::from(turns_active.saturating_sub(1));
        let value = i64::from(self.base) + i64::from(self.per_turn) * steps;
        value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }
}

/// What a charge's final burst hits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BurstTarget {
    /// Burst lands as damage on the creature holding the effect
    #[default]
    Holder,
    /// Burst is banked as the holder's next attack bonus
    NextAttack,
}

/// Ramping effect parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeParams {
    #[serde(default)]
    pub target_stats: Vec<Stat>,
    #[serde(default)]
    pub stat_ramp: Ramp,
    #[serde(default)]
    pub damage_ramp: Ramp,
    #[serde(default)]
    pub healing_ramp: Ramp,
    /// Turn (1-indexed) on which the burst fires
    pub max_turns: u32,
    pub final_burst: i32,
    #[serde(default)]
    pub burst_target: BurstTarget,
}

/// How far a charge has built up
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChargeStatus {
    /// Percent of the build-up completed, in [0, 100]
    pub progress: f64,
    pub turns_remaining: u32,
    /// The burst fires this turn
    pub is_ready: bool,
}

impl ChargeStatus {
    /// Status after `elapsed` processed turns of a charge bursting on `max_turns`
    pub fn new(elapsed: u32, max_turns: u32) -> Self {
        if max_turns == 0 {
            return ChargeStatus::default();
        }
        let progress = (elapsed as f64 / max_turns as f64).min(1.0) * 100.0;
        ChargeStatus {
            progress,
            turns_remaining: max_turns.saturating_sub(elapsed),
            is_ready: elapsed >= max_turns,
        }
    }
}

/// Decaying effect parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EchoParams {
    #[serde(default)]
    pub stat_base: StatModifiers,
    #[serde(default)]
    pub damage_base: i32,
    #[serde(default)]
    pub healing_base: i32,
    /// Per-turn multiplier, in (0, 1]
    pub decay_rate: f64,
}

/// Temporal shape of an effect's contribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Progression {
    /// Same contribution every turn
    Standard {
        #[serde(default)]
        stat_changes: StatModifiers,
        #[serde(default)]
        damage_per_turn: i32,
        #[serde(default)]
        healing_per_turn: i32,
    },
    /// Ramps up, then fires a single burst
    Charge(ChargeParams),
    /// Starts strong and decays geometrically
    Echo(EchoParams),
    /// Defensive stance; constant, retired only by duration expiry
    PersistentDefense {
        stat_changes: StatModifiers,
        #[serde(default)]
        damage_reduction: f64,
    },
}

impl Progression {
    /// Check the parameters this kind needs are usable
    pub fn validate(&self) -> Result<(), BattleError> {
        match self {
            Progression::Standard { .. } => Ok(()),
            Progression::Charge(params) => {
                if params.max_turns == 0 {
                    return Err(BattleError::InvalidEffectParams(
                        "charge effect has max_turns of 0".to_string(),
                    ));
                }
                Ok(())
            }
            Progression::Echo(params) => {
                let rate = params.decay_rate;
                if !rate.is_finite() || rate <= 0.0 || rate > 1.0 {
                    return Err(BattleError::InvalidEffectParams(format!(
                        "echo decay rate {} outside (0, 1]",
                        rate
                    )));
                }
                Ok(())
            }
            Progression::PersistentDefense { damage_reduction, .. } => {
                if !(0.0..=1.0).contains(damage_reduction) {
                    return Err(BattleError::InvalidEffectParams(format!(
                        "defense damage reduction {} outside [0, 1]",
                        damage_reduction
                    )));
                }
                Ok(())
            }
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Progression::Standard { .. } => "standard",
            Progression::Charge(_) => "charge",
            Progression::Echo(_) => "echo",
            Progression::PersistentDefense { .. } => "persistent_defense",
        }
    }
}

/// An effect attached to a creature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectInstance {
    #[serde(default)]
    pub id: EffectId,
    pub name: String,
    pub progression: Progression,
    /// Number of turns the effect is active, counted from `start_turn`
    pub duration: u32,
    pub start_turn: u32,

    // === This turn's contribution (rewritten by the processor) ===
    #[serde(default)]
    pub stat_modifications: StatModifiers,
    #[serde(default)]
    pub damage_this_turn: i32,
    #[serde(default)]
    pub healing_this_turn: i32,
    #[serde(default)]
    pub is_final_burst: bool,
    /// Build-up of a charge as of its last processed turn
    #[serde(default)]
    pub charge_status: Option<ChargeStatus>,

    // === Origin ===
    #[serde(default)]
    pub caster_id: Option<CreatureId>,
    /// Marks the caster-side mirror of a spell
    #[serde(default)]
    pub is_caster: bool,

    // === Presentation keys ===
    #[serde(default)]
    pub effect_type: Option<ItemEffect>,
    #[serde(default)]
    pub power_level: PowerLevel,
}

impl EffectInstance {
    /// Create an effect with the given progression and no contribution yet
    ///
    /// Only a defensive stance holds from creation. Everything else waits
    /// for the processor to run it on its first turn.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        duration: u32,
        start_turn: u32,
        progression: Progression,
    ) -> Self {
        // A defensive stance holds from the moment it is raised
        let stat_modifications = match &progression {
            Progression::PersistentDefense { stat_changes, .. } => stat_changes.clone(),
            _ => StatModifiers::new(),
        };
        let charge_status = match &progression {
            Progression::Charge(params) => Some(ChargeStatus::new(0, params.max_turns)),
            _ => None,
        };

        EffectInstance {
            id: EffectId(id.into()),
            name: name.into(),
            progression,
            duration,
            start_turn,
            stat_modifications,
            damage_this_turn: 0,
            healing_this_turn: 0,
            is_final_burst: false,
            charge_status,
            caster_id: None,
            is_caster: false,
            effect_type: None,
            power_level: PowerLevel::Normal,
        }
    }

    /// Create a constant effect
    pub fn standard(
        id: impl Into<String>,
        name: impl Into<String>,
        duration: u32,
        start_turn: u32,
        stat_changes: StatModifiers,
        damage_per_turn: i32,
        healing_per_turn: i32,
    ) -> Self {
        Self::new(
            id,
            name,
            duration,
            start_turn,
            Progression::Standard {
                stat_changes,
                damage_per_turn,
                healing_per_turn,
            },
        )
    }

    /// Put a constant effect's stat changes in force at once
    ///
    /// Used for flat modifiers (statuses, cascade bonuses). Per-turn damage
    /// and healing still wait for the next tick.
    pub fn in_force(mut self) -> Self {
        if let Progression::Standard { stat_changes, .. } = &self.progression {
            self.stat_modifications = stat_changes.clone();
        }
        self
    }

    /// Whether the effect has not reached its first turn yet
    pub fn is_pending(&self, current_turn: u32) -> bool {
        current_turn < self.start_turn
    }

    pub fn with_effect_type(mut self, effect_type: ItemEffect) -> Self {
        self.effect_type = Some(effect_type);
        self
    }

    pub fn with_power_level(mut self, power_level: PowerLevel) -> Self {
        self.power_level = power_level;
        self
    }

    pub fn with_caster(mut self, caster_id: CreatureId) -> Self {
        self.caster_id = Some(caster_id);
        self
    }

    /// Key for visual lookups by a presentation layer
    pub fn visual_key(&self) -> &'static str {
        match self.effect_type {
            Some(effect) => effect.as_str(),
            None => match self.progression {
                Progression::PersistentDefense { .. } => "Shield",
                _ => "default",
            },
        }
    }

    /// Whether this effect lowers the holder's stats or health
    pub fn is_debuff(&self) -> bool {
        match &self.progression {
            Progression::Standard {
                stat_changes,
                damage_per_turn,
                ..
            } => *damage_per_turn > 0 || stat_changes.iter().any(|(_, v)| v < 0),
            Progression::Charge(params) => params.burst_target == BurstTarget::Holder,
            Progression::Echo(params) => {
                params.damage_base > 0 || params.stat_base.iter().any(|(_, v)| v < 0)
            }
            Progression::PersistentDefense { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp() {
        let ramp = Ramp::new(5, 5);
        assert_eq!(ramp.at(1), 5);
        assert_eq!(ramp.at(2), 10);
        assert_eq!(ramp.at(3), 15);
    }

    #[test]
    fn test_validate_rejects_bad_params() {
        let bad_echo = Progression::Echo(EchoParams {
            stat_base: StatModifiers::new(),
            damage_base: 0,
            healing_base: 10,
            decay_rate: 1.5,
        });
        assert!(matches!(
            bad_echo.validate(),
            Err(BattleError::InvalidEffectParams(_))
        ));

        let bad_charge = Progression::Charge(ChargeParams {
            target_stats: vec![Stat::PhysicalAttack],
            stat_ramp: Ramp::new(5, 5),
            damage_ramp: Ramp::default(),
            healing_ramp: Ramp::default(),
            max_turns: 0,
            final_burst: 20,
            burst_target: BurstTarget::NextAttack,
        });
        assert!(bad_charge.validate().is_err());
    }

    #[test]
    fn test_defense_contributes_immediately() {
        let effect = EffectInstance::new(
            "d",
            "Defensive Stance",
            2,
            0,
            Progression::PersistentDefense {
                stat_changes: StatModifiers::new().with(Stat::PhysicalDefense, 6),
                damage_reduction: 0.2,
            },
        );
        assert_eq!(effect.stat_modifications.get(Stat::PhysicalDefense), 6);
        assert_eq!(effect.visual_key(), "Shield");
    }

    #[test]
    fn test_new_effects_wait_unless_in_force() {
        let changes = StatModifiers::new().with(Stat::Initiative, -2);
        let pending = EffectInstance::standard("g", "Guilty Conscience", 2, 3, changes.clone(), 4, 0);
        assert!(pending.stat_modifications.is_empty());
        assert!(pending.is_pending(2));
        assert!(!pending.is_pending(3));

        let flat = pending.clone().in_force();
        assert_eq!(flat.stat_modifications, changes);
        assert_eq!(flat.damage_this_turn, 0);
    }

    #[test]
    fn test_ramp_saturates() {
        let ramp = Ramp::new(5, 1_000_000);
        assert_eq!(ramp.at(u32::MAX), i32::MAX);
        assert_eq!(Ramp::new(0, -3).at(u32::MAX), i32::MIN);
    }

    #[test]
    fn test_charge_status_progress() {
        let fresh = ChargeStatus::new(0, 3);
        assert_eq!(fresh.progress, 0.0);
        assert_eq!(fresh.turns_remaining, 3);
        assert!(!fresh.is_ready);

        let ready = ChargeStatus::new(3, 3);
        assert_eq!(ready.progress, 100.0);
        assert_eq!(ready.turns_remaining, 0);
        assert!(ready.is_ready);

        assert_eq!(ChargeStatus::new(9, 3).progress, 100.0);
    }

    #[test]
    fn test_progression_tagged_serialization() {
        let progression = Progression::Standard {
            stat_changes: StatModifiers::new(),
            damage_per_turn: 3,
            healing_per_turn: 0,
        };
        let json = serde_json::to_string(&progression).unwrap();
        assert!(json.contains(r#""kind":"standard""#));
        let back: Progression = serde_json::from_str(&json).unwrap();
        assert_eq!(back, progression);
    }
}
