//! Death cascade - turn defeated creatures into effects on the survivors

use crate::creature::Creature;
use crate::effect::EffectInstance;
use crate::stats::{self, Stat, StatModifiers};
use crate::types::{Attribute, Rarity};
use tracing::debug;

/// Outcome of clearing the defeated creatures from one field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CascadeOutcome {
    /// Creatures still standing, carrying any ally bonuses
    pub survivors: Vec<Creature>,
    /// Opposing field, carrying any revenge debuffs
    pub opposing: Vec<Creature>,
    /// Creatures removed from the field
    pub defeated: Vec<Creature>,
    pub log: Vec<String>,
}

/// Bonus left to allies by a fallen Legendary
pub fn final_gift(fallen_species: &str, start_turn: u32) -> EffectInstance {
    EffectInstance::standard(
        "",
        format!("{}'s Final Gift", fallen_species),
        5,
        start_turn,
        StatModifiers::new()
            .with(Stat::PhysicalAttack, 2)
            .with(Stat::MagicalAttack, 2),
        0,
        0,
    )
    .in_force()
}

/// Cheaper actions for allies of a fallen energy specialist
pub fn energy_release(start_turn: u32) -> EffectInstance {
    EffectInstance::standard(
        "",
        "Energy Release",
        2,
        start_turn,
        StatModifiers::new().with(Stat::EnergyCost, -1),
        0,
        0,
    )
    .in_force()
}

/// Bonus left to allies by a fallen Epic
pub fn epic_essence(start_turn: u32) -> EffectInstance {
    EffectInstance::standard(
        "",
        "Epic Essence",
        3,
        start_turn,
        StatModifiers::new()
            .with(Stat::PhysicalAttack, 1)
            .with(Stat::MagicalAttack, 1),
        0,
        0,
    )
    .in_force()
}

/// Debuff on every creature that helped bring down a Legendary or Epic
pub fn guilty_conscience(start_turn: u32) -> EffectInstance {
    EffectInstance::standard(
        "",
        "Guilty Conscience",
        2,
        start_turn,
        StatModifiers::new()
            .with(Stat::Initiative, -2)
            .with(Stat::DodgeChance, -1),
        0,
        0,
    )
    .in_force()
}

/// The ally bonus a defeated creature leaves behind, if any
///
/// Rarity and specialty are checked in order: Legendary, energy specialist,
/// Epic. At most one bonus applies.
fn ally_bonus(fallen: &Creature, start_turn: u32) -> Option<EffectInstance> {
    if fallen.rarity == Rarity::Legendary {
        Some(final_gift(&fallen.species, start_turn))
    } else if fallen.has_specialty(Attribute::Energy) {
        Some(energy_release(start_turn))
    } else if fallen.rarity == Rarity::Epic {
        Some(epic_essence(start_turn))
    } else {
        None
    }
}

fn give(creature: &mut Creature, effect: EffectInstance) {
    creature.push_effect(effect);
    let refreshed = stats::refresh(creature.clone());
    *creature = refreshed;
}

/// Remove defeated creatures from `own` and apply their cascade effects
///
/// Survivors are settled first, so every surviving ally receives the bonus
/// regardless of field order. Effects start on the receiving creature's
/// current turn; their flat stat changes are in force at once and the
/// processor first runs them on the next turn.
pub fn resolve_deaths(own: &[Creature], opposing: &[Creature]) -> CascadeOutcome {
    let (mut survivors, defeated): (Vec<Creature>, Vec<Creature>) =
        own.iter().cloned().partition(|c| c.is_alive());
    let mut opposing = opposing.to_vec();
    let mut log = Vec::new();

    for fallen in &defeated {
        let headline = match (fallen.rarity, fallen.has_specialty(Attribute::Energy)) {
            (Rarity::Legendary, _) => Some(format!(
                "{} (Legendary) was defeated! Their sacrifice empowers allies!",
                fallen.species
            )),
            (_, true) => Some(format!(
                "Energy specialist {} was defeated! Releasing stored energy!",
                fallen.species
            )),
            (Rarity::Epic, _) => Some(format!(
                "Epic creature {} was defeated! Their essence lingers!",
                fallen.species
            )),
            _ => None,
        };
        if let Some(headline) = headline {
            log.push(headline);
        }

        for ally in survivors.iter_mut() {
            if let Some(bonus) = ally_bonus(fallen, ally.current_turn) {
                give(ally, bonus);
            }
        }

        if matches!(fallen.rarity, Rarity::Legendary | Rarity::Epic) && !opposing.is_empty() {
            for enemy in opposing.iter_mut() {
                give(enemy, guilty_conscience(enemy.current_turn));
            }
            log.push(format!(
                "Defeating {} shakes the opposing side.",
                fallen.species
            ));
        }

        debug!(creature = %fallen.id, rarity = ?fallen.rarity, "cascade resolved");
    }

    CascadeOutcome {
        survivors,
        opposing,
        defeated,
        log,
    }
}
