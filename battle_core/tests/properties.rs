use battle_core::damage::DamageFormula;
use battle_core::effect::{advance, BurstTarget, ChargeParams, EchoParams, Ramp};
use battle_core::prelude::*;
use battle_core::stats::{derive_anchor, recompute, refresh};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn attack_buff(value: i32) -> EffectInstance {
    let mut effect = EffectInstance::standard(
        "",
        "Buff",
        3,
        0,
        StatModifiers::new().with(Stat::PhysicalAttack, value),
        0,
        0,
    );
    effect.stat_modifications = StatModifiers::new().with(Stat::PhysicalAttack, value);
    effect
}

fn arb_base_stats() -> impl Strategy<Value = BaseStats> {
    (1..30i32, 1..30i32, 1..30i32, 1..30i32, 1..30i32)
        .prop_map(|(e, s, m, st, sp)| BaseStats::new(e, s, m, st, sp))
}

fn arb_rarity() -> impl Strategy<Value = Rarity> {
    prop_oneof![
        Just(Rarity::Common),
        Just(Rarity::Rare),
        Just(Rarity::Epic),
        Just(Rarity::Legendary),
    ]
}

fn arb_item_type() -> impl Strategy<Value = ItemType> {
    prop_oneof![
        Just(ItemType::Energy),
        Just(ItemType::Strength),
        Just(ItemType::Magic),
        Just(ItemType::Stamina),
        Just(ItemType::Speed),
    ]
}

fn arb_item_effect() -> impl Strategy<Value = ItemEffect> {
    prop_oneof![
        Just(ItemEffect::Surge),
        Just(ItemEffect::Shield),
        Just(ItemEffect::Echo),
        Just(ItemEffect::Drain),
        Just(ItemEffect::Charge),
    ]
}

proptest! {
    #[test]
    fn standard_effects_add_linearly(
        base in arb_base_stats(),
        rarity in arb_rarity(),
        count in 0usize..8,
        delta in 1..6i32,
    ) {
        let mut creature = Creature::new("c", "Sproutling")
            .with_base_stats(base)
            .with_rarity(rarity);
        for _ in 0..count {
            creature.active_effects.push(attack_buff(delta));
        }

        let anchor = derive_anchor(&creature.base_stats, creature.rarity, creature.form);
        let once = recompute(&creature);
        let twice = recompute(&creature);
        prop_assert_eq!(once.physical_attack, anchor.physical_attack + count as i32 * delta);
        prop_assert_eq!(once, twice);

        let refreshed = refresh(refresh(creature.clone()));
        prop_assert_eq!(refreshed.battle_stats, Some(once));
    }

    #[test]
    fn charge_ramps_then_spikes_once(
        base in 0..10i32,
        per_turn in 0..10i32,
        max_turns in 2u32..7,
        burst in 1..60i32,
    ) {
        let effect = EffectInstance::new(
            "c",
            "Charge",
            max_turns,
            1,
            Progression::Charge(ChargeParams {
                target_stats: vec![Stat::PhysicalAttack],
                stat_ramp: Ramp::new(base, per_turn),
                damage_ramp: Ramp::new(base, per_turn),
                healing_ramp: Ramp::default(),
                max_turns,
                final_burst: burst,
                burst_target: BurstTarget::Holder,
            }),
        );

        let mut previous = i32::MIN;
        for turn in 1..max_turns {
            let processed = advance(&effect, turn);
            prop_assert!(!processed.effect.is_final_burst);
            prop_assert!(processed.effect.damage_this_turn >= previous);
            previous = processed.effect.damage_this_turn;
        }

        let last = advance(&effect, max_turns);
        prop_assert!(last.effect.is_final_burst);
        prop_assert_eq!(last.effect.damage_this_turn, burst);
        prop_assert!(last.effect.stat_modifications.is_empty());
    }

    #[test]
    fn echo_follows_geometric_decay(
        value in 1..100i32,
        rate in 0.1f64..0.99,
        turns in 1u32..8,
    ) {
        let effect = EffectInstance::new(
            "e",
            "Echo",
            turns,
            1,
            Progression::Echo(EchoParams {
                stat_base: StatModifiers::new().with(Stat::Initiative, value),
                damage_base: 0,
                healing_base: value,
                decay_rate: rate,
            }),
        );

        let mut previous = i32::MAX;
        for k in 1..=turns {
            let processed = advance(&effect, k);
            let expected = (value as f64 * rate.powi(k as i32 - 1)).round() as i32;
            prop_assert_eq!(processed.effect.healing_this_turn, expected);
            prop_assert_eq!(processed.effect.stat_modifications.get(Stat::Initiative), expected);
            prop_assert!(expected <= previous);
            previous = expected;
        }
    }

    #[test]
    fn health_stays_within_bounds(
        attacker_base in arb_base_stats(),
        defender_base in arb_base_stats(),
        seed in any::<u64>(),
        combo in 0u32..6,
        poison in 0..40i32,
        regrowth in 0..40i32,
    ) {
        let engine = BattleEngine::new();
        let mut rng = StdRng::seed_from_u64(seed);
        let attacker = Creature::new("a", "Emberpup").with_base_stats(attacker_base).deploy();
        let mut defender = Creature::new("d", "Mossback").with_base_stats(defender_base).deploy();
        defender.push_effect(EffectInstance::standard(
            "",
            "Mixed",
            4,
            0,
            StatModifiers::new().with(Stat::MaxHealth, -5),
            poison,
            regrowth,
        ));
        let defender = refresh(defender);

        let result = engine.resolve_attack_with_rng(&attacker, &defender, AttackType::Auto, combo, &mut rng);
        let hit = &result.defender;
        prop_assert!(hit.current_health >= 0);
        prop_assert!(hit.current_health <= hit.max_health());

        let mut field = FieldState::new(Side::new(vec![hit.clone()]), Side::new(vec![attacker]));
        for turn in 1..=5 {
            field = engine.advance_turn(&field, turn, Difficulty::Expert).field;
            for creature in field.player.creatures.iter().chain(field.enemy.creatures.iter()) {
                prop_assert!(creature.current_health >= 0);
                prop_assert!(creature.current_health <= creature.max_health());
            }
        }
    }

    #[test]
    fn combo_multiplier_bounded_at_any_level(level in any::<u32>()) {
        let engine = BattleEngine::new();
        let ceiling = 1.0 + engine.constants().combat.combo_max_bonus;
        let m = engine.formula().combo_multiplier(level);
        prop_assert!(m.is_finite());
        prop_assert!(m >= 1.0);
        prop_assert!(m <= ceiling);
        prop_assert!(m <= engine.formula().combo_multiplier(level.saturating_add(1)));
    }

    #[test]
    fn progressions_survive_far_turns(value in 1..100i32, turn in any::<u32>()) {
        let echo = EffectInstance::new(
            "e",
            "Echo",
            4,
            1,
            Progression::Echo(EchoParams {
                stat_base: StatModifiers::new().with(Stat::Initiative, value),
                damage_base: 0,
                healing_base: value,
                decay_rate: 0.7,
            }),
        );
        let processed = advance(&echo, turn);
        prop_assert!(processed.effect.healing_this_turn <= value);
        prop_assert!(processed.effect.healing_this_turn >= 0);

        let charge = EffectInstance::new(
            "c",
            "Charge",
            4,
            1,
            Progression::Charge(ChargeParams {
                target_stats: vec![Stat::PhysicalAttack],
                stat_ramp: Ramp::new(value, value),
                damage_ramp: Ramp::new(value, value),
                healing_ramp: Ramp::default(),
                max_turns: 3,
                final_burst: value,
                burst_target: BurstTarget::Holder,
            }),
        );
        let processed = advance(&charge, turn);
        let status = processed.effect.charge_status.unwrap_or_default();
        prop_assert!((0.0..=100.0).contains(&status.progress));
    }

    #[test]
    fn tools_change_nothing_but_health_at_use(
        base in arb_base_stats(),
        item_type in arb_item_type(),
        effect in arb_item_effect(),
        wound in 0..30i32,
    ) {
        let engine = BattleEngine::new();
        let mut creature = Creature::new("c", "Sproutling").with_base_stats(base).deploy();
        creature.current_health -= wound.min(creature.current_health - 1);
        let tool = ToolTemplate::new("Trinket", item_type, effect);

        let applied = engine.apply_tool(&creature, &tool, Difficulty::Medium, 1);
        prop_assert!(applied.error.is_none());
        prop_assert_eq!(applied.creature.battle_stats, creature.battle_stats);
        prop_assert!(applied.creature.current_health >= creature.current_health);
        for instance in &applied.creature.active_effects {
            prop_assert_eq!(instance.start_turn, 2);
            prop_assert!(instance.stat_modifications.is_empty());
            prop_assert_eq!(instance.damage_this_turn, 0);
            prop_assert_eq!(instance.healing_this_turn, 0);
        }
    }
}
