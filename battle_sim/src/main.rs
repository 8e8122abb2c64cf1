//! Battle Sim - A headless seeded battle demonstrating battle_core
//!
//! This demo shows:
//! - Deploying two fields of creatures
//! - Advancing turns (regen, effects, cascade)
//! - Attacks with combos, the defend action, tools and spells
//! - Power ratings, energy efficiency and item synergy
//!
//! Usage: `battle_sim [seed] [--json]`. Set `RUST_LOG=battle_core=debug` to
//! see effect processing diagnostics.

use battle_core::prelude::*;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

const MAX_TURNS: u32 = 12;

fn player_field() -> Vec<Creature> {
    vec![
        Creature::new("p1", "Emberpup")
            .with_base_stats(BaseStats::new(6, 9, 4, 6, 7))
            .with_element(Element::Fire)
            .with_rarity(Rarity::Rare)
            .deploy(),
        Creature::new("p2", "Voltling")
            .with_base_stats(BaseStats::new(10, 4, 9, 5, 8))
            .with_element(Element::Air)
            .with_specialty(Attribute::Energy)
            .deploy(),
    ]
}

fn enemy_field() -> Vec<Creature> {
    vec![
        Creature::new("e1", "Mossback")
            .with_base_stats(BaseStats::new(4, 7, 3, 10, 3))
            .with_element(Element::Earth)
            .with_rarity(Rarity::Epic)
            .deploy(),
        Creature::new("e2", "Gloomwing")
            .with_base_stats(BaseStats::new(5, 5, 8, 5, 9))
            .with_element(Element::Dark)
            .deploy(),
    ]
}

/// Indices of the first living creature on each side
fn front(field: &FieldState) -> Option<(usize, usize)> {
    let p = field.player.creatures.iter().position(|c| c.is_alive())?;
    let e = field.enemy.creatures.iter().position(|c| c.is_alive())?;
    Some((p, e))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let seed = args
        .iter()
        .find_map(|a| a.parse::<u64>().ok())
        .unwrap_or(42);
    let json = args.iter().any(|a| a == "--json");

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let engine = BattleEngine::new();
    let difficulty = Difficulty::Medium;

    let mut field = FieldState::new(
        Side::new(player_field()).with_energy(5),
        Side::new(enemy_field()).with_energy(5),
    );

    let tool = ToolTemplate::new("Power Coil", ItemType::Strength, ItemEffect::Charge);
    let spell = SpellTemplate::new("Leech", ItemType::Strength, ItemEffect::Drain);
    let mut player_combo = 0;
    let mut enemy_combo = 0;

    println!("=== Battle (seed {}) ===", seed);
    for creature in field.player.creatures.iter().chain(&field.enemy.creatures) {
        let cost = creature.battle_stats.map(|s| s.energy_cost).unwrap_or(0);
        println!(
            "  {} power {} (attack {:.1} per energy)",
            creature.species,
            creature.power(),
            engine.efficiency(PlannedAction::Attack, creature, cost)
        );
    }
    let draught = ToolTemplate::new("Rage Draught", ItemType::Strength, ItemEffect::Surge);
    if let Some(bonus) = engine.tool_synergy(&[tool.clone(), draught]) {
        println!(
            "  Power Coil + Rage Draught synergy: +{} damage, +{} healing, +{} turns",
            bonus.damage, bonus.healing, bonus.duration
        );
    }

    for turn in 1..=MAX_TURNS {
        let report = engine.advance_turn(&field, turn, difficulty);
        for line in &report.log {
            println!("  {}", line);
        }
        field = report.field;

        let Some((p, e)) = front(&field) else {
            break;
        };

        // Player side
        let player_cost = field.player.creatures[p]
            .battle_stats
            .map(|s| s.energy_cost)
            .unwrap_or(0);
        if turn == 1 {
            let applied = engine.apply_tool(&field.player.creatures[p], &tool, difficulty, turn);
            println!("{}", applied.log);
            field.player.replace(applied.creature);
        } else if turn == 2 && field.player.energy >= player_cost {
            let cast = engine.apply_spell_with_rng(
                &field.player.creatures[p],
                &field.enemy.creatures[e],
                &spell,
                difficulty,
                turn,
                &mut rng,
            );
            println!("{}", cast.log);
            field.player.energy -= player_cost;
            field.player.replace(cast.caster);
            field.enemy.replace(cast.target);
        } else {
            player_combo += 1;
            enemy_combo = 0;
            let result = engine.resolve_attack_with_rng(
                &field.player.creatures[p],
                &field.enemy.creatures[e],
                AttackType::Auto,
                player_combo,
                &mut rng,
            );
            println!("{}", result.log);
            if result.damage.damage > 0 {
                field.player.momentum += 1;
            }
            field.player.replace(result.attacker);
            field.enemy.replace(result.defender);
        }

        // Enemy side
        let Some((p, e)) = front(&field) else {
            break;
        };
        let defender = &field.enemy.creatures[e];
        if defender.health_fraction() < 0.3 && !defender.is_defending {
            let stance = engine.defend(defender, difficulty);
            println!("{}", stance.log);
            field.enemy.replace(stance.creature);
            enemy_combo = 0;
        } else {
            enemy_combo += 1;
            let result = engine.resolve_attack_with_rng(
                defender,
                &field.player.creatures[p],
                AttackType::Auto,
                enemy_combo,
                &mut rng,
            );
            println!("{}", result.log);
            if result.damage.damage > 0 {
                field.enemy.momentum += 1;
            }
            field.enemy.replace(result.attacker);
            field.player.replace(result.defender);
        }
    }

    let outcome = match (field.player.is_defeated(), field.enemy.is_defeated()) {
        (false, true) => "Player wins!",
        (true, false) => "Enemy wins!",
        _ => "The battle ends without a victor.",
    };
    println!("=== {} ===", outcome);

    if json {
        match serde_json::to_string_pretty(&field) {
            Ok(state) => println!("{}", state),
            Err(err) => eprintln!("Failed to serialize field: {}", err),
        }
    }
}
