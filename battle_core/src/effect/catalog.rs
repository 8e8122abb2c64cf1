//! Effect catalog - (item type, item effect) to template lookup

use crate::stats::{Stat, StatModifiers};
use crate::types::{ItemEffect, ItemType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ramp parameters for a charge template, before power scaling
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChargeTemplate {
    #[serde(default)]
    pub target_stats: Vec<Stat>,
    #[serde(default)]
    pub base_value: f64,
    #[serde(default)]
    pub per_turn_increase: f64,
    #[serde(default)]
    pub damage_base: f64,
    #[serde(default)]
    pub damage_increase: f64,
    #[serde(default)]
    pub healing_base: f64,
    #[serde(default)]
    pub healing_increase: f64,
    pub max_turns: u32,
    #[serde(default)]
    pub final_burst: f64,
}

/// Decay parameters for an echo template, before power scaling
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EchoTemplate {
    #[serde(default)]
    pub stat_base: StatModifiers,
    #[serde(default)]
    pub damage_base: f64,
    #[serde(default)]
    pub healing_base: f64,
    #[serde(default = "default_decay_rate")]
    pub decay_rate: f64,
}

fn default_decay_rate() -> f64 {
    0.7
}

/// Unscaled effect descriptor
///
/// A template with `duration == 0` is instant. Otherwise it becomes an
/// effect instance whose progression is Charge when `charge` is set, Echo
/// when `echo` is set, and Standard otherwise.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EffectTemplate {
    #[serde(default)]
    pub stat_changes: StatModifiers,
    /// Deltas mirrored onto the caster of a spell
    #[serde(default)]
    pub self_stat_changes: StatModifiers,
    /// Tool first-turn heal
    #[serde(default)]
    pub health_change: f64,
    #[serde(default)]
    pub damage: f64,
    #[serde(default)]
    pub healing: f64,
    #[serde(default)]
    pub damage_over_time: f64,
    #[serde(default)]
    pub healing_over_time: f64,
    #[serde(default)]
    pub self_healing_over_time: f64,
    #[serde(default)]
    pub armor_piercing: bool,
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub charge: Option<ChargeTemplate>,
    #[serde(default)]
    pub echo: Option<EchoTemplate>,
}

impl EffectTemplate {
    pub fn is_instant(&self) -> bool {
        self.duration == 0
    }

    /// Whether a spell built from this template also affects its caster
    pub fn has_self_effects(&self) -> bool {
        !self.self_stat_changes.is_empty() || self.self_healing_over_time > 0.0
    }

    /// Scale the damage and healing amounts by a caster's magic power
    ///
    /// Stat deltas and echo healing stay unscaled.
    pub fn scaled_by_magic(mut self, magic_power: f64) -> Self {
        self.damage *= magic_power;
        self.healing *= magic_power;
        self.damage_over_time *= magic_power;
        self.healing_over_time *= magic_power;
        self.self_healing_over_time *= magic_power;
        if let Some(charge) = self.charge.as_mut() {
            charge.damage_base *= magic_power;
            charge.damage_increase *= magic_power;
            charge.final_burst *= magic_power;
        }
        if let Some(echo) = self.echo.as_mut() {
            echo.damage_base *= magic_power;
        }
        self
    }
}

/// Registry of tool and spell templates
///
/// Each table is keyed by item type and effect; the `None` effect slot holds
/// the type's base template.
#[derive(Debug, Clone, Default)]
pub struct EffectCatalog {
    tools: HashMap<(ItemType, Option<ItemEffect>), EffectTemplate>,
    spells: HashMap<(ItemType, Option<ItemEffect>), EffectTemplate>,
}

const ITEM_TYPES: [ItemType; 5] = [
    ItemType::Energy,
    ItemType::Strength,
    ItemType::Magic,
    ItemType::Stamina,
    ItemType::Speed,
];

const ITEM_EFFECTS: [ItemEffect; 5] = [
    ItemEffect::Surge,
    ItemEffect::Shield,
    ItemEffect::Echo,
    ItemEffect::Drain,
    ItemEffect::Charge,
];

impl EffectCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        EffectCatalog {
            tools: HashMap::new(),
            spells: HashMap::new(),
        }
    }

    /// Register a tool template; `None` effect replaces the type's base
    pub fn register_tool(
        &mut self,
        item_type: ItemType,
        effect: Option<ItemEffect>,
        template: EffectTemplate,
    ) {
        self.tools.insert((item_type, effect), template);
    }

    /// Register a spell template; `None` effect replaces the type's base
    pub fn register_spell(
        &mut self,
        item_type: ItemType,
        effect: Option<ItemEffect>,
        template: EffectTemplate,
    ) {
        self.spells.insert((item_type, effect), template);
    }

    pub fn tool(&self, item_type: ItemType, effect: Option<ItemEffect>) -> Option<&EffectTemplate> {
        self.tools.get(&(item_type, effect))
    }

    pub fn spell(&self, item_type: ItemType, effect: Option<ItemEffect>) -> Option<&EffectTemplate> {
        self.spells.get(&(item_type, effect))
    }

    /// Resolve the template for a tool
    ///
    /// No type → safe default. Type without effect → the type's base,
    /// strengthened by 10% and lasting a turn longer.
    pub fn tool_effect(
        &self,
        item_type: Option<ItemType>,
        effect: Option<ItemEffect>,
    ) -> EffectTemplate {
        let Some(item_type) = item_type else {
            return safe_tool_template();
        };
        match effect {
            Some(effect) => match self.tool(item_type, Some(effect)) {
                Some(template) => template.clone(),
                None => {
                    let base = self.tool(item_type, None).cloned().unwrap_or_default();
                    derive_tool(effect, &base)
                }
            },
            None => match self.tool(item_type, None) {
                Some(base) => enhanced_tool_base(base),
                None => safe_tool_template(),
            },
        }
    }

    /// Resolve the template for a spell, scaled by the caster's magic power
    pub fn spell_effect(
        &self,
        item_type: Option<ItemType>,
        effect: Option<ItemEffect>,
        magic_power: f64,
    ) -> EffectTemplate {
        let Some(item_type) = item_type else {
            return safe_spell_template();
        };
        let template = match effect {
            Some(effect) => match self.spell(item_type, Some(effect)) {
                Some(template) => template.clone(),
                None => {
                    let base = self.spell(item_type, None).cloned().unwrap_or_default();
                    derive_spell(effect, &base)
                }
            },
            None => match self.spell(item_type, None) {
                Some(base) => extended_spell_base(base),
                None => return safe_spell_template(),
            },
        };
        template.scaled_by_magic(magic_power)
    }

    /// Load the default tool and spell tables
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();

        for item_type in ITEM_TYPES {
            let base = default_tool_base(item_type);
            for effect in ITEM_EFFECTS {
                let template = tool_override(item_type, effect)
                    .unwrap_or_else(|| derive_tool(effect, &base));
                catalog.register_tool(item_type, Some(effect), template);
            }
            catalog.register_tool(item_type, None, base);

            let base = default_spell_base(item_type);
            for effect in ITEM_EFFECTS {
                let template = spell_override(item_type, effect)
                    .unwrap_or_else(|| derive_spell(effect, &base));
                catalog.register_spell(item_type, Some(effect), template);
            }
            catalog.register_spell(item_type, None, base);
        }

        catalog
    }
}

/// Tool template used when the tool names no type
pub fn safe_tool_template() -> EffectTemplate {
    EffectTemplate {
        stat_changes: StatModifiers::new().with(Stat::PhysicalDefense, 2),
        duration: 1,
        ..Default::default()
    }
}

/// Spell template used when the spell names no type
pub fn safe_spell_template() -> EffectTemplate {
    EffectTemplate {
        damage_over_time: 5.0,
        duration: 1,
        ..Default::default()
    }
}

fn or_default(value: f64, fallback: f64) -> f64 {
    if value > 0.0 {
        value
    } else {
        fallback
    }
}

fn enhanced_tool_base(base: &EffectTemplate) -> EffectTemplate {
    EffectTemplate {
        stat_changes: base
            .stat_changes
            .map(|v| (v as f64 * 1.1).round() as i32),
        healing_over_time: (or_default(base.healing_over_time, 5.0) * 1.1).round(),
        duration: base.duration + 1,
        ..base.clone()
    }
}

fn extended_spell_base(base: &EffectTemplate) -> EffectTemplate {
    let mut template = base.clone();
    if base.damage > 0.0 {
        template.damage_over_time = base.damage / 2.0;
        template.damage = 0.0;
    }
    template.duration = base.duration + 1;
    template
}

fn mods(entries: &[(Stat, i32)]) -> StatModifiers {
    entries.iter().copied().collect()
}

fn default_tool_base(item_type: ItemType) -> EffectTemplate {
    match item_type {
        ItemType::Energy => EffectTemplate {
            stat_changes: mods(&[(Stat::EnergyCost, -1)]),
            healing_over_time: 2.0,
            duration: 4,
            ..Default::default()
        },
        ItemType::Strength => EffectTemplate {
            stat_changes: mods(&[(Stat::PhysicalAttack, 10), (Stat::PhysicalDefense, 5)]),
            healing_over_time: 3.0,
            duration: 3,
            ..Default::default()
        },
        ItemType::Magic => EffectTemplate {
            stat_changes: mods(&[
                (Stat::PhysicalDefense, 10),
                (Stat::MagicalDefense, 10),
                (Stat::MaxHealth, 15),
            ]),
            healing_over_time: 5.0,
            duration: 3,
            ..Default::default()
        },
        ItemType::Stamina => EffectTemplate {
            stat_changes: mods(&[(Stat::PhysicalDefense, 5)]),
            healing_over_time: 10.0,
            duration: 4,
            ..Default::default()
        },
        ItemType::Speed => EffectTemplate {
            stat_changes: mods(&[
                (Stat::PhysicalAttack, 8),
                (Stat::MagicalAttack, 8),
                (Stat::PhysicalDefense, -2),
                (Stat::MagicalDefense, -2),
            ]),
            healing_over_time: 5.0,
            duration: 4,
            ..Default::default()
        },
    }
}

/// Hand-tuned tool combinations that replace the derived template
fn tool_override(item_type: ItemType, effect: ItemEffect) -> Option<EffectTemplate> {
    let template = match (item_type, effect) {
        (ItemType::Strength, ItemEffect::Surge) => EffectTemplate {
            stat_changes: mods(&[(Stat::PhysicalAttack, 15), (Stat::PhysicalDefense, 8)]),
            healing_over_time: 5.0,
            duration: 2,
            ..Default::default()
        },
        (ItemType::Magic, ItemEffect::Shield) => EffectTemplate {
            stat_changes: mods(&[
                (Stat::PhysicalDefense, 12),
                (Stat::MagicalDefense, 12),
                (Stat::MaxHealth, 20),
            ]),
            healing_over_time: 8.0,
            duration: 3,
            ..Default::default()
        },
        (ItemType::Energy, ItemEffect::Echo) => EffectTemplate {
            echo: Some(EchoTemplate {
                stat_base: mods(&[(Stat::EnergyCost, -1)]),
                healing_base: 5.0,
                decay_rate: 0.7,
                ..Default::default()
            }),
            duration: 4,
            ..Default::default()
        },
        (ItemType::Speed, ItemEffect::Drain) => EffectTemplate {
            stat_changes: mods(&[
                (Stat::PhysicalAttack, 10),
                (Stat::MagicalAttack, 10),
                (Stat::PhysicalDefense, -3),
                (Stat::MagicalDefense, -3),
            ]),
            healing_over_time: 7.0,
            duration: 4,
            ..Default::default()
        },
        (ItemType::Stamina, ItemEffect::Charge) => EffectTemplate {
            charge: Some(ChargeTemplate {
                target_stats: vec![Stat::PhysicalDefense, Stat::MagicalDefense, Stat::MaxHealth],
                base_value: 3.0,
                per_turn_increase: 5.0,
                healing_base: 5.0,
                healing_increase: 5.0,
                max_turns: 4,
                final_burst: 30.0,
                ..Default::default()
            }),
            duration: 4,
            ..Default::default()
        },
        _ => return None,
    };
    Some(template)
}

/// Tool template for a type/effect pair without a hand-tuned entry
fn derive_tool(effect: ItemEffect, base: &EffectTemplate) -> EffectTemplate {
    match effect {
        ItemEffect::Surge => EffectTemplate {
            stat_changes: base.stat_changes.map(|v| v * 2),
            healing_over_time: or_default(base.healing_over_time, 3.0) * 2.0,
            duration: 2,
            ..Default::default()
        },
        ItemEffect::Shield => EffectTemplate {
            stat_changes: mods(&[
                (Stat::PhysicalDefense, 12),
                (Stat::MagicalDefense, 12),
                (Stat::MaxHealth, 20),
            ]),
            healing_over_time: 10.0,
            duration: 4,
            ..Default::default()
        },
        ItemEffect::Echo => EffectTemplate {
            echo: Some(EchoTemplate {
                stat_base: base.stat_changes.clone(),
                healing_base: or_default(base.healing_over_time, 5.0) * 1.5,
                decay_rate: 0.7,
                ..Default::default()
            }),
            duration: 6,
            ..Default::default()
        },
        ItemEffect::Drain => EffectTemplate {
            stat_changes: mods(&[
                (Stat::PhysicalAttack, 10),
                (Stat::MagicalAttack, 10),
                (Stat::PhysicalDefense, -4),
                (Stat::MagicalDefense, -4),
            ]),
            healing_over_time: 8.0,
            duration: 4,
            ..Default::default()
        },
        ItemEffect::Charge => {
            // Ramp only the stats the base template raises
            let mut target_stats: Vec<Stat> = base
                .stat_changes
                .iter()
                .filter(|(_, v)| *v > 0)
                .map(|(s, _)| s)
                .collect();
            if target_stats.is_empty() {
                target_stats.push(Stat::PhysicalAttack);
            }
            EffectTemplate {
                charge: Some(ChargeTemplate {
                    target_stats,
                    base_value: 5.0,
                    per_turn_increase: 5.0,
                    healing_base: 3.0,
                    healing_increase: 3.0,
                    max_turns: 3,
                    final_burst: 20.0,
                    ..Default::default()
                }),
                duration: 4,
                ..Default::default()
            }
        }
    }
}

fn default_spell_base(item_type: ItemType) -> EffectTemplate {
    match item_type {
        ItemType::Energy => EffectTemplate {
            damage: 25.0,
            armor_piercing: true,
            duration: 0,
            ..Default::default()
        },
        ItemType::Strength => EffectTemplate {
            stat_changes: mods(&[(Stat::PhysicalAttack, -3), (Stat::MagicalAttack, -3)]),
            self_stat_changes: mods(&[(Stat::PhysicalAttack, 2), (Stat::MagicalAttack, 2)]),
            damage_over_time: 10.0,
            self_healing_over_time: 5.0,
            duration: 3,
            ..Default::default()
        },
        ItemType::Magic => EffectTemplate {
            charge: Some(ChargeTemplate {
                damage_base: 10.0,
                damage_increase: 10.0,
                max_turns: 2,
                final_burst: 35.0,
                ..Default::default()
            }),
            duration: 2,
            ..Default::default()
        },
        ItemType::Stamina => EffectTemplate {
            stat_changes: mods(&[
                (Stat::PhysicalDefense, 8),
                (Stat::MagicalDefense, 8),
                (Stat::MaxHealth, 15),
            ]),
            healing_over_time: 15.0,
            duration: 4,
            ..Default::default()
        },
        ItemType::Speed => EffectTemplate {
            stat_changes: mods(&[
                (Stat::Initiative, 5),
                (Stat::DodgeChance, 3),
                (Stat::CriticalChance, 3),
            ]),
            healing_over_time: 5.0,
            duration: 4,
            ..Default::default()
        },
    }
}

/// Hand-tuned spell combinations that replace the derived template
fn spell_override(item_type: ItemType, effect: ItemEffect) -> Option<EffectTemplate> {
    let template = match (item_type, effect) {
        (ItemType::Energy, ItemEffect::Surge) => EffectTemplate {
            damage: 30.0,
            armor_piercing: true,
            duration: 0,
            ..Default::default()
        },
        (ItemType::Stamina, ItemEffect::Shield) => EffectTemplate {
            stat_changes: mods(&[
                (Stat::PhysicalDefense, 10),
                (Stat::MagicalDefense, 10),
                (Stat::MaxHealth, 20),
            ]),
            healing_over_time: 20.0,
            duration: 4,
            ..Default::default()
        },
        (ItemType::Speed, ItemEffect::Echo) => EffectTemplate {
            echo: Some(EchoTemplate {
                stat_base: mods(&[
                    (Stat::Initiative, 8),
                    (Stat::DodgeChance, 5),
                    (Stat::CriticalChance, 5),
                ]),
                healing_base: 10.0,
                decay_rate: 0.7,
                ..Default::default()
            }),
            duration: 4,
            ..Default::default()
        },
        (ItemType::Strength, ItemEffect::Drain) => EffectTemplate {
            stat_changes: mods(&[(Stat::PhysicalAttack, -4), (Stat::MagicalAttack, -4)]),
            self_stat_changes: mods(&[(Stat::PhysicalAttack, 3), (Stat::MagicalAttack, 3)]),
            damage_over_time: 12.0,
            self_healing_over_time: 10.0,
            duration: 3,
            ..Default::default()
        },
        (ItemType::Magic, ItemEffect::Charge) => EffectTemplate {
            charge: Some(ChargeTemplate {
                damage_base: 5.0,
                damage_increase: 10.0,
                max_turns: 2,
                final_burst: 40.0,
                ..Default::default()
            }),
            duration: 2,
            ..Default::default()
        },
        _ => return None,
    };
    Some(template)
}

/// Spell template for a type/effect pair without a hand-tuned entry
fn derive_spell(effect: ItemEffect, base: &EffectTemplate) -> EffectTemplate {
    match effect {
        ItemEffect::Surge => EffectTemplate {
            damage: or_default(base.damage, 15.0) * 2.5,
            armor_piercing: true,
            duration: 0,
            ..Default::default()
        },
        ItemEffect::Shield => EffectTemplate {
            stat_changes: mods(&[
                (Stat::PhysicalDefense, 15),
                (Stat::MagicalDefense, 15),
                (Stat::MaxHealth, 25),
            ]),
            healing_over_time: 18.0,
            duration: 4,
            ..Default::default()
        },
        ItemEffect::Echo => EffectTemplate {
            echo: Some(EchoTemplate {
                damage_base: or_default(base.damage, 20.0),
                healing_base: 15.0,
                decay_rate: 0.7,
                ..Default::default()
            }),
            duration: 4,
            ..Default::default()
        },
        ItemEffect::Drain => EffectTemplate {
            stat_changes: mods(&[(Stat::PhysicalAttack, -3), (Stat::MagicalAttack, -3)]),
            self_stat_changes: mods(&[(Stat::PhysicalAttack, 2), (Stat::MagicalAttack, 2)]),
            damage_over_time: 10.0,
            self_healing_over_time: 8.0,
            duration: 3,
            ..Default::default()
        },
        ItemEffect::Charge => EffectTemplate {
            charge: Some(ChargeTemplate {
                damage_base: 8.0,
                damage_increase: 8.0,
                max_turns: 3,
                final_burst: 35.0,
                ..Default::default()
            }),
            duration: 3,
            ..Default::default()
        },
    }
}
