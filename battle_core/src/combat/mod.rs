//! Combat resolution - Attacks and the defend action

mod resolution;
mod result;

pub use resolution::{
    critical_trauma, defend, elemental_weakness, resolve_attack, resolve_attack_with_rng,
};
pub use result::{ActionResult, DamageFigures, DefendResult};
