//! Engine error conditions
//!
//! Every variant is local and recoverable: the operation that raised it hands
//! back the unmodified input state alongside the error.

use thiserror::Error;

/// Recoverable engine condition
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BattleError {
    #[error("Invalid combatant: {0}")]
    InvalidCombatant(String),
    #[error("Invalid item application: {0}")]
    InvalidItemApplication(String),
    #[error("Invalid effect parameters: {0}")]
    InvalidEffectParams(String),
}
