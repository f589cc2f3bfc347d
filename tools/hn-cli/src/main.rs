use std::env;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use hn_engine::{Arena, ArenaError};
use hn_types::ids::BattleId;
use hn_types::MarketSnapshot;

mod synthetic;

#[derive(Debug, Clone, Copy)]
enum Speed {
    Instant,
    Fast,
    Slow,
}

impl Speed {
    fn sleep_between_epochs(self) {
        match self {
            Speed::Instant => {}
            Speed::Fast => thread::sleep(Duration::from_millis(200)),
            Speed::Slow => thread::sleep(Duration::from_millis(1000)),
        }
    }
}

struct Args {
    seed: u64,
    max_epochs: u16,
    speed: Speed,
}

fn parse_args() -> Args {
    let args: Vec<String> = env::args().collect();
    let mut seed: u64 = 42;
    let mut max_epochs: u16 = 100;
    let mut speed = Speed::Instant;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                if i < args.len() {
                    seed = args[i].parse().unwrap_or(seed);
                }
            }
            "--max-epochs" => {
                i += 1;
                if i < args.len() {
                    max_epochs = args[i].parse().unwrap_or(max_epochs);
                }
            }
            "--speed" => {
                i += 1;
                if i < args.len() {
                    speed = match args[i].as_str() {
                        "fast" => Speed::Fast,
                        "slow" => Speed::Slow,
                        _ => Speed::Instant,
                    };
                }
            }
            _ => {}
        }
        i += 1;
    }
    Args { seed, max_epochs, speed }
}

fn main() -> ExitCode {
    let args = parse_args();

    println!("\n  =============================");
    println!("    H U N G E R N A D S");
    println!("  =============================\n");
    println!("  seed={} max_epochs={}\n", args.seed, args.max_epochs);

    let mut arena = Arena::new(BattleId::new(args.seed), args.max_epochs as u32, 0);
    let roster = synthetic::synthetic_roster();
    if let Err(e) = arena.spawn_agents(roster) {
        eprintln!("  ERROR: {e:?}");
        return ExitCode::FAILURE;
    }
    if let Err(e) = arena.start_battle() {
        eprintln!("  ERROR: {e:?}");
        return ExitCode::FAILURE;
    }

    let mut rng = hn_types::RngState::new(args.seed as u32);
    let mut market = MarketSnapshot { eth: 3000.0, btc: 65000.0, sol: 150.0, mon: 1.2, timestamp: 0 };

    loop {
        let roster_snapshot: Vec<_> =
            arena.agents.iter().filter(|a| a.alive).map(|a| (a.id, a.class, a.position)).collect();
        market = synthetic::next_market(&mut rng, &market);
        let intents = synthetic::synthetic_intents(&mut rng, &roster_snapshot);
        let sponsor_effects = synthetic::synthetic_sponsor_effects();

        let result = match arena.process_epoch(market, intents, sponsor_effects) {
            Ok(r) => r,
            Err(ArenaError::EngineBug { context }) => {
                eprintln!("  ENGINE BUG: {context}");
                return ExitCode::FAILURE;
            }
            Err(e) => {
                eprintln!("  ERROR: {e:?}");
                return ExitCode::FAILURE;
            }
        };

        println!("  epoch {} | phase {:?}", result.epoch, result.phase);
        for death in &result.deaths {
            println!(
                "    {} died (cause={:?}, killer={:?})",
                death.agent_name, death.cause, death.killer_id
            );
        }

        if result.is_terminal {
            break;
        }
        args.speed.sleep_between_epochs();
    }

    match arena.complete_battle() {
        Ok(record) => {
            println!("\n  === BATTLE OVER ===");
            match record.winner_id {
                Some(id) => println!("  winner: agent {id}"),
                None => println!("  winner: none (mutual annihilation)"),
            }
            println!("  epochs survived: {}", record.epochs_survived);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("  ERROR: {e:?}");
            ExitCode::FAILURE
        }
    }
}
