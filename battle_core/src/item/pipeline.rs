//! Effect application pipeline - tool/spell template to effect instances

use super::power::{magic_power, power_multiplier, spell_crit_chance};
use super::{SpellTemplate, ToolTemplate};
use crate::config::{BattleConstants, DifficultySettings};
use crate::creature::Creature;
use crate::effect::{
    BurstTarget, ChargeParams, EchoParams, EffectCatalog, EffectInstance, EffectTemplate,
    Progression, Ramp,
};
use crate::error::BattleError;
use crate::stats::{self, Stat, StatModifiers};
use crate::types::PowerLevel;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Result of using a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolApplication {
    pub creature: Creature,
    /// Template after power scaling; `None` when the tool was rejected
    pub applied: Option<EffectTemplate>,
    pub power: f64,
    pub log: String,
    #[serde(skip)]
    pub error: Option<BattleError>,
}

/// Result of casting a spell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellApplication {
    pub caster: Creature,
    pub target: Creature,
    /// Template after power scaling; `None` when the spell was rejected
    pub applied: Option<EffectTemplate>,
    pub power: f64,
    /// Instant damage dealt
    pub damage: i32,
    /// Instant healing done
    pub healing: i32,
    pub was_critical: bool,
    pub log: String,
    #[serde(skip)]
    pub error: Option<BattleError>,
}

fn round(value: f64) -> i32 {
    value.round() as i32
}

/// Cap each delta to `±cap`, then scale by power
fn scale_stats(changes: &StatModifiers, cap: i32, power: f64) -> StatModifiers {
    let cap = cap.max(0);
    changes.map(|v| round(v.clamp(-cap, cap) as f64 * power))
}

fn check_ready(creature: &Creature) -> Result<(), BattleError> {
    if !creature.is_deployed() {
        return Err(BattleError::InvalidItemApplication(format!(
            "{} has no battle stats",
            creature.id
        )));
    }
    if !creature.is_alive() {
        return Err(BattleError::InvalidItemApplication(format!(
            "{} has been defeated",
            creature.id
        )));
    }
    Ok(())
}

/// Apply a tool to one of the user's creatures
///
/// Stat deltas are capped and scaled by `min(power, stat_power)`. Only a
/// positive `health_change` lands at once: the rest of the template becomes
/// an effect instance that starts on `current_turn + 1`, so the next turn
/// advance runs its first turn.
pub fn apply_tool(
    catalog: &EffectCatalog,
    constants: &BattleConstants,
    difficulty: &DifficultySettings,
    creature: &Creature,
    tool: &ToolTemplate,
    current_turn: u32,
) -> ToolApplication {
    if let Err(error) = check_ready(creature) {
        warn!(creature = %creature.id, tool = %tool.name, %error, "tool rejected");
        return ToolApplication {
            creature: creature.clone(),
            applied: None,
            power: 0.0,
            log: format!("{} could not be used: {}", display_name(&tool.name, "Tool"), error),
            error: Some(error),
        };
    }

    let caps = &constants.caps;
    let power = power_multiplier(difficulty, constants, &creature.base_stats, None);
    let stat_power = power.min(caps.stat_power);
    let template = catalog.tool_effect(tool.tool_type, tool.tool_effect);

    let mut applied = template.clone();
    applied.stat_changes = scale_stats(&template.stat_changes, caps.tool_stat, stat_power);
    applied.health_change = (template.health_change * power).min(caps.tool_heal).round();
    applied.healing_over_time = (template.healing_over_time * power).round();

    let mut new_creature = creature.clone();
    let tool_name = display_name(&tool.name, "Tool");
    let mut log = format!("{} used {} on {}", creature.species, tool_name, creature.species);

    if applied.health_change > 0.0 {
        let healed = new_creature.heal(applied.health_change as i32);
        if healed > 0 {
            log.push_str(&format!(", restoring {} health", healed));
        }
    }

    if applied.duration > 0 {
        let progression = if let Some(charge) = &applied.charge {
            let mut target_stats = charge.target_stats.clone();
            if target_stats.is_empty() {
                target_stats.push(Stat::PhysicalDefense);
            }
            Progression::Charge(ChargeParams {
                target_stats,
                stat_ramp: Ramp::new(
                    round(charge.base_value * power),
                    round(charge.per_turn_increase * power),
                ),
                damage_ramp: Ramp::default(),
                healing_ramp: Ramp::new(
                    round(charge.healing_base * power),
                    round(charge.healing_increase * power),
                ),
                max_turns: charge.max_turns,
                final_burst: round(charge.final_burst * power),
                burst_target: BurstTarget::NextAttack,
            })
        } else if let Some(echo) = &applied.echo {
            Progression::Echo(EchoParams {
                stat_base: scale_stats(&echo.stat_base, caps.tool_stat, stat_power),
                damage_base: 0,
                healing_base: round(echo.healing_base * power),
                decay_rate: echo.decay_rate,
            })
        } else {
            Progression::Standard {
                stat_changes: applied.stat_changes.clone(),
                damage_per_turn: 0,
                healing_per_turn: applied.healing_over_time as i32,
            }
        };

        let mut instance = EffectInstance::new(
            "",
            format!("{} Effect", tool_name),
            applied.duration,
            current_turn.saturating_add(1),
            progression,
        )
        .with_power_level(PowerLevel::from_multiplier(power))
        .with_caster(creature.id.clone());
        if let Some(effect) = tool.tool_effect {
            instance = instance.with_effect_type(effect);
        }

        new_creature.push_effect(instance);
        log.push_str(&format!(" for {} turns", applied.duration));
    }
    let new_creature = stats::refresh(new_creature);
    log.push('.');

    debug!(creature = %creature.id, tool = %tool_name, power, "tool applied");

    ToolApplication {
        creature: new_creature,
        applied: Some(applied),
        power,
        log,
        error: None,
    }
}

/// Cast a spell (immutable API)
///
/// Uses the thread RNG. See [`apply_spell_with_rng`].
pub fn apply_spell(
    catalog: &EffectCatalog,
    constants: &BattleConstants,
    difficulty: &DifficultySettings,
    caster: &Creature,
    target: &Creature,
    spell: &SpellTemplate,
    current_turn: u32,
) -> SpellApplication {
    let mut rng = rand::thread_rng();
    apply_spell_with_rng(
        catalog,
        constants,
        difficulty,
        caster,
        target,
        spell,
        current_turn,
        &mut rng,
    )
}

/// Cast a spell with a provided RNG (for deterministic testing)
///
/// Instant spells (duration 0) deal damage with their own critical roll and
/// armor piercing, and heal only when the caster targets itself. Over-time
/// spells put an effect on the target and, when the template has self
/// effects, a mirrored effect on the caster. Both start on the next turn.
#[allow(clippy::too_many_arguments)]
pub fn apply_spell_with_rng(
    catalog: &EffectCatalog,
    constants: &BattleConstants,
    difficulty: &DifficultySettings,
    caster: &Creature,
    target: &Creature,
    spell: &SpellTemplate,
    current_turn: u32,
    rng: &mut impl Rng,
) -> SpellApplication {
    let spell_name = display_name(&spell.name, "Spell");
    if let Err(error) = check_ready(caster).and_then(|_| check_ready(target)) {
        warn!(caster = %caster.id, target = %target.id, spell = %spell_name, %error, "spell rejected");
        return SpellApplication {
            caster: caster.clone(),
            target: target.clone(),
            applied: None,
            power: 0.0,
            damage: 0,
            healing: 0,
            was_critical: false,
            log: format!("{} could not be cast: {}", spell_name, error),
            error: Some(error),
        };
    }

    let caps = &constants.caps;
    let power = power_multiplier(difficulty, constants, &caster.base_stats, spell.spell_type);
    let stat_power = power.min(caps.stat_power);
    let template = catalog.spell_effect(
        spell.spell_type,
        spell.spell_effect,
        magic_power(&caster.base_stats, constants),
    );

    let mut applied = template.clone();
    applied.stat_changes = scale_stats(&template.stat_changes, caps.spell_stat, stat_power);
    applied.self_stat_changes =
        scale_stats(&template.self_stat_changes, caps.spell_stat, stat_power);
    applied.damage = (template.damage * power).min(caps.spell_damage).round();
    applied.healing = (template.healing * power).min(caps.spell_heal).round();
    applied.damage_over_time = (template.damage_over_time * power).round();
    applied.healing_over_time = (template.healing_over_time * power).round();
    applied.self_healing_over_time = (template.self_healing_over_time * power).round();

    let targets_self = caster.id == target.id;
    let mut new_target = target.clone();
    let mut new_caster = if targets_self {
        None
    } else {
        Some(caster.clone())
    };

    let mut log = format!("{} cast {} on {}", caster.species, spell_name, target.species);
    let mut damage = 0;
    let mut healing = 0;
    let mut was_critical = false;

    if applied.is_instant() {
        if applied.damage > 0.0 {
            let mut amount = applied.damage;
            let crit_chance = spell_crit_chance(&caster.base_stats, constants);
            if rng.gen::<f64>() * 100.0 < crit_chance as f64 {
                was_critical = true;
                amount *= constants.spell.crit_multiplier;
            }
            let mut amount = amount.round();
            if applied.armor_piercing || power >= constants.spell.armor_piercing_power {
                amount += (amount * constants.spell.armor_piercing_bonus).round();
            }
            damage = new_target.take_damage(amount as i32);
            if was_critical {
                log.push_str(" (Critical!)");
            }
            log.push_str(&format!(", dealing {} damage", damage));
        }
        if applied.healing > 0.0 && targets_self {
            healing = new_target.heal(applied.healing as i32);
            log.push_str(&format!(", restoring {} health", healing));
        }
    } else {
        let progression = spell_progression(&applied, caps.spell_stat, stat_power, power);
        let start_turn = current_turn.saturating_add(1);
        let mut instance =
            EffectInstance::new("", spell_name.clone(), applied.duration, start_turn, progression)
                .with_power_level(PowerLevel::from_multiplier(power))
                .with_caster(caster.id.clone());
        if let Some(effect) = spell.spell_effect {
            instance = instance.with_effect_type(effect);
        }
        new_target.push_effect(instance);

        if applied.has_self_effects() {
            let mut mirror = EffectInstance::standard(
                "",
                format!("{} (Self)", spell_name),
                applied.duration,
                start_turn,
                applied.self_stat_changes.clone(),
                0,
                applied.self_healing_over_time as i32,
            )
            .with_power_level(PowerLevel::from_multiplier(power))
            .with_caster(caster.id.clone());
            mirror.is_caster = true;
            if let Some(effect) = spell.spell_effect {
                mirror = mirror.with_effect_type(effect);
            }
            let holder = new_caster.as_mut().unwrap_or(&mut new_target);
            holder.push_effect(mirror);
        }
        log.push_str(&format!(" for {} turns", applied.duration));
    }
    log.push('.');

    let new_target = stats::refresh(new_target);
    let new_caster = match new_caster {
        Some(caster) => stats::refresh(caster),
        None => new_target.clone(),
    };

    debug!(caster = %caster.id, target = %target.id, spell = %spell_name, power, damage, "spell applied");

    SpellApplication {
        caster: new_caster,
        target: new_target,
        applied: Some(applied),
        power,
        damage,
        healing,
        was_critical,
        log,
        error: None,
    }
}

/// Progression for an over-time spell, from an already scaled template
fn spell_progression(
    applied: &EffectTemplate,
    stat_cap: i32,
    stat_power: f64,
    power: f64,
) -> Progression {
    if let Some(charge) = &applied.charge {
        Progression::Charge(ChargeParams {
            target_stats: charge.target_stats.clone(),
            stat_ramp: Ramp::new(
                round(charge.base_value * power),
                round(charge.per_turn_increase * power),
            ),
            damage_ramp: Ramp::new(
                round(charge.damage_base * power),
                round(charge.damage_increase * power),
            ),
            healing_ramp: Ramp::new(
                round(charge.healing_base * power),
                round(charge.healing_increase * power),
            ),
            max_turns: charge.max_turns,
            final_burst: round(charge.final_burst * power),
            burst_target: BurstTarget::Holder,
        })
    } else if let Some(echo) = &applied.echo {
        Progression::Echo(EchoParams {
            stat_base: scale_stats(&echo.stat_base, stat_cap, stat_power),
            damage_base: round(echo.damage_base * power),
            healing_base: round(echo.healing_base * power),
            decay_rate: echo.decay_rate,
        })
    } else {
        Progression::Standard {
            stat_changes: applied.stat_changes.clone(),
            damage_per_turn: applied.damage_over_time as i32,
            healing_per_turn: applied.healing_over_time as i32,
        }
    }
}

fn display_name(name: &str, fallback: &str) -> String {
    if name.trim().is_empty() {
        fallback.to_string()
    } else {
        name.to_string()
    }
}
