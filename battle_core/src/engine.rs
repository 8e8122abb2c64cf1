//! BattleEngine - configuration bundle and entry point for every operation

use crate::combat::{self, ActionResult, DefendResult};
use crate::config::{BattleConstants, ConfigError, DifficultySettings, DifficultyTable};
use crate::creature::Creature;
use crate::damage::{DamageFormula, StandardFormula};
use crate::effect::EffectCatalog;
use crate::energy::{self, MomentumBonus, PlannedAction};
use crate::item::{
    self, SpellApplication, SpellTemplate, SynergyBonus, ToolApplication, ToolTemplate, UsedEffect,
};
use crate::turn::{self, FieldState, TurnReport};
use crate::types::{AttackType, Difficulty};
use rand::Rng;
use std::path::Path;

/// Immutable battle configuration
///
/// Holds the effect catalog, tunable constants, difficulty table and damage
/// formula. Every operation takes input snapshots and returns new ones; the
/// engine itself never changes after construction.
#[derive(Debug, Clone)]
pub struct BattleEngine<F: DamageFormula = StandardFormula> {
    catalog: EffectCatalog,
    constants: BattleConstants,
    difficulties: DifficultyTable,
    formula: F,
}

impl BattleEngine<StandardFormula> {
    /// Engine with the embedded constants, difficulty table and catalog
    pub fn new() -> Self {
        let constants = BattleConstants::embedded();
        let formula = StandardFormula::new(constants.combat.clone());
        BattleEngine {
            catalog: EffectCatalog::with_defaults(),
            constants,
            difficulties: DifficultyTable::embedded(),
            formula,
        }
    }

    /// Replace the constants; the standard formula picks up the new combat section
    ///
    /// Constants that fail validation are rejected and the engine is dropped.
    pub fn with_constants(mut self, constants: BattleConstants) -> Result<Self, ConfigError> {
        constants.validate()?;
        self.formula = StandardFormula::new(constants.combat.clone());
        self.constants = constants;
        Ok(self)
    }

    /// Load constants from a TOML file
    pub fn with_constants_file(self, path: &Path) -> Result<Self, ConfigError> {
        let constants: BattleConstants = crate::config::read_sections(path)?;
        self.with_constants(constants)
    }
}

impl Default for BattleEngine<StandardFormula> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: DamageFormula> BattleEngine<F> {
    /// Swap in a different damage formula
    pub fn with_formula<G: DamageFormula>(self, formula: G) -> BattleEngine<G> {
        BattleEngine {
            catalog: self.catalog,
            constants: self.constants,
            difficulties: self.difficulties,
            formula,
        }
    }

    pub fn with_catalog(mut self, catalog: EffectCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_difficulties(mut self, difficulties: DifficultyTable) -> Self {
        self.difficulties = difficulties;
        self
    }

    pub fn catalog(&self) -> &EffectCatalog {
        &self.catalog
    }

    pub fn constants(&self) -> &BattleConstants {
        &self.constants
    }

    pub fn formula(&self) -> &F {
        &self.formula
    }

    pub fn settings(&self, difficulty: Difficulty) -> &DifficultySettings {
        self.difficulties.get(difficulty)
    }

    /// Run the turn-advance pipeline for both fields
    pub fn advance_turn(&self, field: &FieldState, turn: u32, difficulty: Difficulty) -> TurnReport {
        turn::advance_turn(field, turn, &self.constants, self.settings(difficulty))
    }

    pub fn resolve_attack(
        &self,
        attacker: &Creature,
        defender: &Creature,
        attack_type: AttackType,
        combo_level: u32,
    ) -> ActionResult {
        combat::resolve_attack(
            &self.formula,
            &self.constants.status,
            attacker,
            defender,
            attack_type,
            combo_level,
        )
    }

    pub fn resolve_attack_with_rng(
        &self,
        attacker: &Creature,
        defender: &Creature,
        attack_type: AttackType,
        combo_level: u32,
        rng: &mut impl Rng,
    ) -> ActionResult {
        combat::resolve_attack_with_rng(
            &self.formula,
            &self.constants.status,
            attacker,
            defender,
            attack_type,
            combo_level,
            rng,
        )
    }

    pub fn defend(&self, creature: &Creature, difficulty: Difficulty) -> DefendResult {
        combat::defend(creature, &self.constants, self.settings(difficulty))
    }

    pub fn apply_tool(
        &self,
        creature: &Creature,
        tool: &ToolTemplate,
        difficulty: Difficulty,
        current_turn: u32,
    ) -> ToolApplication {
        item::apply_tool(
            &self.catalog,
            &self.constants,
            self.settings(difficulty),
            creature,
            tool,
            current_turn,
        )
    }

    pub fn apply_spell(
        &self,
        caster: &Creature,
        target: &Creature,
        spell: &SpellTemplate,
        difficulty: Difficulty,
        current_turn: u32,
    ) -> SpellApplication {
        let mut rng = rand::thread_rng();
        self.apply_spell_with_rng(caster, target, spell, difficulty, current_turn, &mut rng)
    }

    pub fn apply_spell_with_rng(
        &self,
        caster: &Creature,
        target: &Creature,
        spell: &SpellTemplate,
        difficulty: Difficulty,
        current_turn: u32,
        rng: &mut impl Rng,
    ) -> SpellApplication {
        item::apply_spell_with_rng(
            &self.catalog,
            &self.constants,
            self.settings(difficulty),
            caster,
            target,
            spell,
            current_turn,
            rng,
        )
    }

    /// Energy a field regenerates this turn
    pub fn regen(&self, creatures: &[Creature], difficulty: Difficulty) -> i32 {
        energy::regen(creatures, self.settings(difficulty))
    }

    pub fn max_energy(&self, creatures: &[Creature], difficulty: Difficulty) -> i32 {
        energy::max_energy(creatures, self.settings(difficulty))
    }

    pub fn momentum(&self, total: i32) -> MomentumBonus {
        energy::momentum(total, &self.constants.momentum)
    }

    pub fn efficiency(&self, action: PlannedAction, creature: &Creature, energy_cost: i32) -> f64 {
        energy::efficiency(action, creature, energy_cost)
    }

    /// Synergy between tools used together; tools without an effect never pair
    pub fn tool_synergy(&self, tools: &[ToolTemplate]) -> Option<SynergyBonus> {
        let used: Vec<UsedEffect> = tools
            .iter()
            .filter_map(|tool| {
                let effect = tool.tool_effect?;
                let template = self.catalog.tool_effect(tool.tool_type, Some(effect));
                Some(UsedEffect::new(effect, template.stat_changes))
            })
            .collect();
        item::item_synergy(&used)
    }
}
