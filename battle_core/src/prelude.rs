//! Prelude module for convenient imports
//!
//! ```rust
//! use battle_core::prelude::*;
//! ```

// Engine
pub use crate::engine::BattleEngine;
pub use crate::turn::{FieldState, Side, TurnReport};

// Creatures and stats
pub use crate::creature::{Creature, CreatureId};
pub use crate::stats::{BaseStats, BattleStats, Stat, StatModifiers};

// Effects
pub use crate::effect::{ChargeStatus, EffectInstance, Progression};

// Actions
pub use crate::combat::{ActionResult, DefendResult};
pub use crate::energy::PlannedAction;
pub use crate::item::{
    SpellApplication, SpellTemplate, SynergyBonus, ToolApplication, ToolTemplate, UsedEffect,
};

// Config
pub use crate::config::{BattleConstants, DifficultyTable};

pub use crate::error::BattleError;
pub use crate::types::{AttackType, Attribute, Difficulty, Element, ItemEffect, ItemType, Rarity};
