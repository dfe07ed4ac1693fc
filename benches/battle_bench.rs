//! Benchmark full AI-vs-AI battle episodes

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use redice::battle::{
    ActionSource, Battle, BattleState, Character, RandomPlayer, UnitSetup,
};
use redice::catalog::Catalog;
use redice::core::config::BattleConfig;
use redice::core::types::{Location, Team};

const FIXTURE: &str = r#"{
    "Abilities": {
        "strike": {
            "uid": "strike", "name": "Strike", "type": "ATTACK", "usage": "MELEE",
            "target_type": "UNIT", "target_team": "ENEMY",
            "target_location": "NONE", "keys": "DAMAGE X"
        },
        "volley": {
            "uid": "volley", "name": "Volley", "type": "ATTACK", "usage": "RANGED",
            "target_type": "AREA", "target_team": "ENEMY",
            "target_location": "NONE", "keys": "DAMAGE 1"
        }
    },
    "Classes": {
        "vanguard": {
            "uid": "vanguard", "index": 1, "name": "Vanguard",
            "health": 12, "init": 4, "tier": 1,
            "face_1": "strike_1", "face_2": "strike_2", "face_3": "strike_1",
            "face_4": "strike_1", "face_5": "volley_0", "face_6": "strike_2"
        }
    },
    "Faces": {
        "strike_1": { "uid": "strike_1", "index": 1, "ability_id": "strike", "base_x": 1 },
        "strike_2": { "uid": "strike_2", "index": 2, "ability_id": "strike", "base_x": 2 },
        "volley_0": { "uid": "volley_0", "index": 3, "ability_id": "volley", "base_x": 0 }
    }
}"#;

fn run_episode(seed: u64) -> u32 {
    let catalog = Arc::new(Catalog::from_json(FIXTURE).unwrap());
    let roster = [
        ("P1", Team::Blue, Location::Front),
        ("P2", Team::Blue, Location::Back),
        ("E1", Team::Red, Location::Front),
        ("E2", Team::Red, Location::Back),
    ]
    .map(|(label, team, location)| {
        let character = Character::new(&catalog, label, &["vanguard", "vanguard"]).unwrap();
        UnitSetup::new(character, team, location, label)
    })
    .to_vec();
    let mut battle = Battle::new(
        catalog,
        roster,
        BattleConfig::default(),
        ChaCha8Rng::seed_from_u64(seed),
    )
    .unwrap();
    let mut blue = RandomPlayer::new(Team::Blue, ChaCha8Rng::seed_from_u64(seed ^ 0xA));
    let mut red = RandomPlayer::new(Team::Red, ChaCha8Rng::seed_from_u64(seed ^ 0xB));
    loop {
        let action = if battle.state() == BattleState::MainPhase {
            let team = battle
                .current_turn_unit()
                .and_then(|id| battle.battlefield().unit(id))
                .map(|unit| unit.team);
            match team {
                Some(Team::Blue) => blue.select_action(&battle),
                Some(Team::Red) => red.select_action(&battle),
                _ => None,
            }
        } else {
            None
        };
        if battle.step(action) {
            break;
        }
    }
    battle.turn()
}

fn battle_benchmark(c: &mut Criterion) {
    c.bench_function("full_episode_2v2", |b| {
        b.iter(|| run_episode(black_box(42)))
    });
}

criterion_group!(benches, battle_benchmark);
criterion_main!(benches);
