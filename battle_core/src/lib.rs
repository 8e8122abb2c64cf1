//! battle_core - Turn resolution engine for creature battles
//!
//! This library provides:
//! - Effects: Standard, Charge, Echo and Persistent-Defense progressions
//! - Stat recalculation from base stats plus this turn's effect deltas
//! - Attack resolution with combo, critical and on-hit statuses
//! - Tool and spell application with power scaling, and item synergy
//! - The death cascade, the energy economy and action efficiency
//!
//! Every operation takes snapshots and returns new ones. Randomness comes
//! only from an RNG the caller passes in (or the thread RNG for the
//! convenience variants).

pub mod cascade;
pub mod combat;
pub mod config;
pub mod creature;
pub mod damage;
pub mod effect;
pub mod energy;
pub mod engine;
pub mod error;
pub mod item;
pub mod prelude;
pub mod stats;
pub mod turn;
pub mod types;

// Re-export core types for convenience
pub use cascade::{resolve_deaths, CascadeOutcome};
pub use combat::{defend, resolve_attack, resolve_attack_with_rng, ActionResult, DefendResult};
pub use config::{BattleConstants, ConfigError, DifficultySettings, DifficultyTable};
pub use creature::{Creature, CreatureId};
pub use damage::{DamageFormula, StandardFormula};
pub use effect::{ChargeStatus, EffectCatalog, EffectInstance, Progression};
pub use energy::{efficiency, max_energy, momentum, regen, MomentumBonus, PlannedAction};
pub use engine::BattleEngine;
pub use error::BattleError;
pub use item::{
    apply_spell, apply_spell_with_rng, apply_tool, item_synergy, SpellTemplate, SynergyBonus,
    ToolTemplate, UsedEffect,
};
pub use stats::{BaseStats, BattleStats, Stat, StatModifiers};
pub use turn::{advance_turn, FieldState, Side, TurnReport};
pub use types::{
    AttackType, Attribute, Difficulty, Effectiveness, Element, ItemEffect, ItemType, PowerLevel,
    Rarity,
};
