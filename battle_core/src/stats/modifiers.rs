//! StatModifiers - Sparse per-stat deltas

use super::Stat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sparse set of flat stat deltas
///
/// Used both for an effect's contribution this turn and for the turn-wide
/// aggregate. Ordered by stat so iteration (and therefore logging) is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatModifiers(BTreeMap<Stat, i32>);

impl StatModifiers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, stat: Stat, value: i32) -> Self {
        self.add(stat, value);
        self
    }

    /// Add to the delta for a stat
    pub fn add(&mut self, stat: Stat, value: i32) {
        *self.0.entry(stat).or_insert(0) += value;
    }

    /// Overwrite the delta for a stat
    pub fn set(&mut self, stat: Stat, value: i32) {
        self.0.insert(stat, value);
    }

    pub fn get(&self, stat: Stat) -> i32 {
        self.0.get(&stat).copied().unwrap_or(0)
    }

    /// Fold another set of deltas into this one
    pub fn merge(&mut self, other: &StatModifiers) {
        for (stat, value) in other.iter() {
            self.add(stat, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stat, i32)> + '_ {
        self.0.iter().map(|(s, v)| (*s, *v))
    }

    pub fn stats(&self) -> impl Iterator<Item = Stat> + '_ {
        self.0.keys().copied()
    }

    /// Map every value, keeping the same stats
    pub fn map(&self, mut f: impl FnMut(i32) -> i32) -> StatModifiers {
        StatModifiers(self.0.iter().map(|(s, v)| (*s, f(*v))).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|v| *v == 0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<(Stat, i32)> for StatModifiers {
    fn from_iter<T: IntoIterator<Item = (Stat, i32)>>(iter: T) -> Self {
        let mut mods = StatModifiers::new();
        for (stat, value) in iter {
            mods.add(stat, value);
        }
        mods
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_accumulates() {
        let mut mods = StatModifiers::new();
        mods.add(Stat::PhysicalAttack, 3);
        mods.add(Stat::PhysicalAttack, 2);
        assert_eq!(mods.get(Stat::PhysicalAttack), 5);
        assert_eq!(mods.get(Stat::MagicalAttack), 0);
    }

    #[test]
    fn test_merge() {
        let mut a = StatModifiers::new().with(Stat::Initiative, -2);
        let b = StatModifiers::new()
            .with(Stat::Initiative, 1)
            .with(Stat::DodgeChance, -1);
        a.merge(&b);
        assert_eq!(a.get(Stat::Initiative), -1);
        assert_eq!(a.get(Stat::DodgeChance), -1);
    }

    #[test]
    fn test_zero_entries_are_empty() {
        let mods = StatModifiers::new().with(Stat::EnergyCost, 0);
        assert!(mods.is_empty());
    }

    #[test]
    fn test_json_uses_stat_names() {
        let mods = StatModifiers::new().with(Stat::PhysicalDefense, 4);
        let json = serde_json::to_string(&mods).unwrap();
        assert_eq!(json, r#"{"physical_defense":4}"#);
    }
}
