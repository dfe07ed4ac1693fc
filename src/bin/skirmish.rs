//! Headless skirmish runner
//!
//! Runs AI vs AI dice battles from a JSON catalog, or a manual game where
//! the blue side is driven from the console.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use redice::battle::{
    ActionSource, Battle, BattleAction, BattleState, Character, RandomPlayer, Target, UnitSetup,
};
use redice::catalog::Catalog;
use redice::core::config::BattleConfig;
use redice::core::error::Result;
use redice::core::types::{Location, Team};

/// Headless skirmish runner - dice battles from a JSON catalog
#[derive(Parser, Debug)]
#[command(name = "skirmish")]
#[command(about = "Run AI vs AI dice battles, or play the blue side manually")]
struct Args {
    /// Path to the catalog data file
    #[arg(long, default_value = "data/skirmish.json")]
    data: PathBuf,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Number of battles to run in AI vs AI mode
    #[arg(long, default_value_t = 1)]
    episodes: u32,

    /// Drive the blue side from the console
    #[arg(long)]
    manual: bool,

    /// Maximum turns before a battle is called off
    #[arg(long, default_value_t = 100)]
    turn_limit: u32,

    /// Enable verbose battle logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose || args.manual {
        "redice=debug,skirmish=debug"
    } else {
        "redice=warn,skirmish=info"
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let catalog = Arc::new(Catalog::load(&args.data)?);
    let seed = args.seed.unwrap_or_else(rand::random);
    let config = BattleConfig {
        turn_limit: args.turn_limit,
        ..BattleConfig::default()
    };

    let roster = fighters_roster(&catalog)?;
    let mut battle = Battle::new(
        catalog,
        roster,
        config,
        ChaCha8Rng::seed_from_u64(seed),
    )?;

    if args.manual {
        let mut blue = ConsolePlayer { team: Team::Blue };
        let mut red = RandomPlayer::new(Team::Red, ChaCha8Rng::seed_from_u64(seed ^ 1));
        let (turns, winner) = run_episode(&mut battle, &mut blue, &mut red);
        println!("Battle over after {} turns - winner: {:?}", turns, winner);
        return Ok(());
    }

    let mut blue_wins = 0;
    let mut red_wins = 0;
    let mut draws = 0;
    for episode in 1..=args.episodes {
        let mut blue =
            RandomPlayer::new(Team::Blue, ChaCha8Rng::seed_from_u64(seed ^ episode as u64));
        let mut red =
            RandomPlayer::new(Team::Red, ChaCha8Rng::seed_from_u64(seed ^ ((episode as u64) << 17)));
        let (turns, winner) = run_episode(&mut battle, &mut blue, &mut red);
        match winner {
            Team::Blue => blue_wins += 1,
            Team::Red => red_wins += 1,
            Team::None => draws += 1,
        }
        println!("Episode {}: {} turns, winner {:?}", episode, turns, winner);
        battle.reset()?;
    }
    println!(
        "Done: blue {} / red {} / draws {} over {} episodes (seed {})",
        blue_wins, red_wins, draws, args.episodes, seed
    );
    Ok(())
}

/// The classic 2v2: two blue fighters up front against a red fighter on
/// each line
fn fighters_roster(catalog: &Catalog) -> Result<Vec<UnitSetup>> {
    let roster = vec![
        UnitSetup::new(
            Character::new(catalog, "John Wayne", &["fighter", "fighter"])?,
            Team::Blue,
            Location::Front,
            "P1",
        ),
        UnitSetup::new(
            Character::new(catalog, "Hilbert Wayne", &["fighter", "fighter"])?,
            Team::Blue,
            Location::Front,
            "P2",
        ),
        UnitSetup::new(
            Character::new(catalog, "Rubick Coridano", &["fighter", "fighter"])?,
            Team::Red,
            Location::Front,
            "E1",
        ),
        UnitSetup::new(
            Character::new(catalog, "Aaron Keller", &["fighter", "fighter"])?,
            Team::Red,
            Location::Back,
            "E2",
        ),
    ];
    Ok(roster)
}

/// Drive one battle to completion, asking the side whose turn it is for
/// an action during every main phase
fn run_episode(
    battle: &mut Battle,
    blue: &mut dyn ActionSource,
    red: &mut dyn ActionSource,
) -> (u32, Team) {
    loop {
        let action = if battle.state() == BattleState::MainPhase {
            let team = battle
                .current_turn_unit()
                .and_then(|id| battle.battlefield().unit(id))
                .map(|unit| unit.team);
            match team {
                Some(Team::Blue) => blue.select_action(battle),
                Some(Team::Red) => red.select_action(battle),
                _ => None,
            }
        } else {
            None
        };
        if battle.step(action) {
            break;
        }
    }
    (battle.turn(), battle.winning_team())
}

/// Blue-side action source reading commands from stdin
struct ConsolePlayer {
    team: Team,
}

impl ActionSource for ConsolePlayer {
    fn team(&self) -> Team {
        self.team
    }

    fn select_action(&mut self, battle: &Battle) -> Option<BattleAction> {
        let actor = battle.current_turn_unit()?;
        let unit = battle.battlefield().unit(actor)?;
        if unit.team != self.team {
            return None;
        }

        println!("{}", battle.battlefield().format_map());
        println!("{}", battle.battlefield().format_units());
        println!("{} to act:\n{}", unit.label, unit.formatted_dice());
        print!("Enter option (examples: `primary 0 E1`, `move 1`, `end`): ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        io::stdin().read_line(&mut line).ok()?;
        let parsed = parse_command(line.trim(), battle);
        if parsed.is_none() {
            println!("Invalid command: {}", line.trim());
        }
        parsed
    }
}

fn parse_command(input: &str, battle: &Battle) -> Option<BattleAction> {
    let actor = battle.current_turn_unit()?;
    let mut args = input.split_whitespace();
    match args.next()? {
        "primary" => {
            let die_index = args.next()?.parse().ok()?;
            let label = args.next()?;
            let target = battle.battlefield().unit_by_label(label)?;
            Some(BattleAction::Primary {
                actor,
                die_index,
                target: Some(Target::Unit(target)),
            })
        }
        "move" => {
            let die_index = args.next()?.parse().ok()?;
            Some(BattleAction::Move { actor, die_index })
        }
        "end" => Some(BattleAction::End { actor }),
        _ => None,
    }
}
