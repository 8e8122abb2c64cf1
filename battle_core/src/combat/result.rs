//! ActionResult - Outcome of an attack

use crate::creature::Creature;
use crate::damage::DamageKind;
use crate::error::BattleError;
use crate::types::{AttackType, Effectiveness};
use serde::{Deserialize, Serialize};

/// Damage dealt, reported under every name downstream consumers read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageFigures {
    pub damage: i32,
    pub final_damage: i32,
    pub total_damage: i32,
    pub damage_dealt: i32,
    pub actual_damage: i32,
}

impl DamageFigures {
    /// All aliases set to the same amount
    pub fn uniform(amount: i32) -> Self {
        DamageFigures {
            damage: amount,
            final_damage: amount,
            total_damage: amount,
            damage_dealt: amount,
            actual_damage: amount,
        }
    }
}

/// Result of resolving one attack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    // === Updated snapshots ===
    pub attacker: Creature,
    pub defender: Creature,

    // === Damage ===
    #[serde(flatten)]
    pub damage: DamageFigures,
    pub combo_level: u32,
    pub combo_multiplier: f64,

    // === Roll outcome ===
    pub attack_type: AttackType,
    pub is_critical: bool,
    pub is_dodged: bool,
    pub effectiveness: Effectiveness,
    pub damage_kind: DamageKind,
    /// Names of status debuffs put on the defender
    pub statuses_applied: Vec<String>,

    // === Reporting ===
    pub log: String,
    #[serde(skip)]
    pub error: Option<BattleError>,
}

impl ActionResult {
    /// Zero-damage result handing back unmodified snapshots
    pub fn rejected(
        attacker: &Creature,
        defender: &Creature,
        attack_type: AttackType,
        error: BattleError,
    ) -> Self {
        ActionResult {
            attacker: attacker.clone(),
            defender: defender.clone(),
            damage: DamageFigures::default(),
            combo_level: 0,
            combo_multiplier: 1.0,
            attack_type,
            is_critical: false,
            is_dodged: false,
            effectiveness: Effectiveness::Normal,
            damage_kind: DamageKind::Normal,
            statuses_applied: Vec::new(),
            log: format!("Attack failed: {}", error),
            error: Some(error),
        }
    }

    pub fn is_killing_blow(&self) -> bool {
        self.error.is_none() && !self.defender.is_alive()
    }

    /// Short description of the outcome
    pub fn summary(&self) -> String {
        if let Some(error) = &self.error {
            return format!("Rejected: {}", error);
        }
        if self.is_dodged {
            return "Dodged".to_string();
        }

        let mut parts = vec![format!("{} damage", self.damage.actual_damage)];
        if self.is_critical {
            parts.push("critical".to_string());
        }
        if self.combo_multiplier > 1.0 {
            parts.push(format!("combo x{:.2}", self.combo_multiplier));
        }
        for status in &self.statuses_applied {
            parts.push(status.clone());
        }
        if self.is_killing_blow() {
            parts.push("FATAL".to_string());
        }
        parts.join(", ")
    }
}

/// Result of the defend action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefendResult {
    pub creature: Creature,
    pub log: String,
    #[serde(skip)]
    pub error: Option<BattleError>,
}
