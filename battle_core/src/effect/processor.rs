//! Effect processor - advances one effect instance by one turn

use super::{ChargeStatus, EffectInstance, Progression};
use crate::error::BattleError;
use crate::stats::StatModifiers;
use tracing::{debug, warn};

/// Result of advancing an effect
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedEffect {
    /// New copy carrying this turn's contribution
    pub effect: EffectInstance,
    pub turns_active: u32,
    /// Set when the parameters were unusable and the effect did nothing
    pub error: Option<BattleError>,
}

/// Turns the effect has been active, counting its first turn as 1
pub fn turns_active(effect: &EffectInstance, current_turn: u32) -> u32 {
    current_turn.saturating_sub(effect.start_turn).saturating_add(1)
}

/// Exponent for a value on the given 1-indexed turn
fn decay_steps(turns_active: u32) -> i32 {
    i32::try_from(turns_active.saturating_sub(1)).unwrap_or(i32::MAX)
}

/// Whether the effect should be dropped before processing this turn
pub fn is_retired(effect: &EffectInstance, current_turn: u32) -> bool {
    let active = turns_active(effect, current_turn);
    if active > effect.duration {
        return true;
    }
    match &effect.progression {
        // A charge retires after the turn its burst fired
        Progression::Charge(params) => params.max_turns > 0 && active > params.max_turns,
        _ => false,
    }
}

/// Advance an effect to `current_turn`
///
/// The input is left untouched. The returned copy holds the stat deltas,
/// damage and healing this effect contributes for the turn.
pub fn advance(effect: &EffectInstance, current_turn: u32) -> ProcessedEffect {
    let active = turns_active(effect, current_turn);

    let mut next = effect.clone();
    next.stat_modifications = StatModifiers::new();
    next.damage_this_turn = 0;
    next.healing_this_turn = 0;
    next.is_final_burst = false;

    if let Err(err) = effect.progression.validate() {
        warn!(effect = %effect.id.0, name = %effect.name, %err, "skipping malformed effect");
        return ProcessedEffect {
            effect: next,
            turns_active: active,
            error: Some(err),
        };
    }

    match &effect.progression {
        Progression::Standard {
            stat_changes,
            damage_per_turn,
            healing_per_turn,
        } => {
            next.stat_modifications = stat_changes.clone();
            next.damage_this_turn = *damage_per_turn;
            next.healing_this_turn = *healing_per_turn;
        }
        Progression::PersistentDefense { stat_changes, .. } => {
            next.stat_modifications = stat_changes.clone();
        }
        Progression::Charge(params) => {
            next.charge_status = Some(ChargeStatus::new(active, params.max_turns));
            if active < params.max_turns {
                let value = params.stat_ramp.at(active);
                for &stat in &params.target_stats {
                    next.stat_modifications.set(stat, value);
                }
                next.damage_this_turn = params.damage_ramp.at(active);
                next.healing_this_turn = params.healing_ramp.at(active);
            } else {
                next.damage_this_turn = params.final_burst;
                next.is_final_burst = true;
            }
        }
        Progression::Echo(params) => {
            let factor = params.decay_rate.powi(decay_steps(active));
            let decay = |value: i32| (value as f64 * factor).round() as i32;
            next.stat_modifications = params.stat_base.map(decay);
            next.damage_this_turn = decay(params.damage_base);
            next.healing_this_turn = decay(params.healing_base);
        }
    }

    debug!(
        effect = %effect.id.0,
        kind = effect.progression.kind_name(),
        turns_active = active,
        damage = next.damage_this_turn,
        healing = next.healing_this_turn,
        final_burst = next.is_final_burst,
        "advanced effect"
    );

    ProcessedEffect {
        effect: next,
        turns_active: active,
        error: None,
    }
}
