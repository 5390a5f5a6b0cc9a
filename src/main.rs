//! Headless match runner.
//!
//! Usage:
//!   sumo-sim --robot robot.json --opponent opponent.json --matches 20 --jitter 4
//!   RUST_LOG=debug sumo-sim --json

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use sumo_sim::RobotConfig;
use sumo_sim::harness::{DEFAULT_MAX_TICKS, MatchDriver, StartJitter, run_series};

#[derive(Parser)]
#[command(name = "sumo-sim")]
#[command(about = "Run mini-sumo matches between two robot configurations")]
struct Args {
    /// Player robot config (JSON); factory robot when omitted
    #[arg(long)]
    robot: Option<PathBuf>,

    /// Opponent robot config (JSON); factory opponent when omitted
    #[arg(long)]
    opponent: Option<PathBuf>,

    /// Stop a match after this many ticks
    #[arg(long, default_value_t = DEFAULT_MAX_TICKS)]
    max_ticks: u64,

    /// Number of matches to run
    #[arg(long, default_value_t = 1)]
    matches: u32,

    /// Base seed for start jitter
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Max start offset per axis (arena units)
    #[arg(long, default_value_t = 0.0)]
    jitter: f32,

    /// Max start heading change (degrees)
    #[arg(long, default_value_t = 0.0)]
    jitter_rotation: f32,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Write the factory robot config to this path and exit
    #[arg(long)]
    write_defaults: Option<PathBuf>,
}

fn load_or(path: Option<&PathBuf>, fallback: RobotConfig) -> Result<RobotConfig> {
    match path {
        Some(path) => RobotConfig::load(path)
            .with_context(|| format!("failed to load robot config {}", path.display())),
        None => Ok(fallback),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if let Some(path) = &args.write_defaults {
        RobotConfig::default()
            .save(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Wrote default robot config to {}", path.display());
        return Ok(());
    }

    let robot = load_or(args.robot.as_ref(), RobotConfig::default())?;
    let opponent = load_or(args.opponent.as_ref(), RobotConfig::default_opponent())?;
    let jitter = StartJitter {
        max_offset: args.jitter,
        max_rotation: args.jitter_rotation,
    };

    if args.matches <= 1 {
        let report = MatchDriver::new(robot, opponent)
            .with_max_ticks(args.max_ticks)
            .with_start_jitter(args.seed, jitter)
            .run();

        if args.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            match report.winner {
                Some(winner) => println!("Winner: {winner:?}"),
                None => println!("No ring-out within {} ticks", report.ticks),
            }
            println!("  Ticks:    {}", report.ticks);
            println!("  Elapsed:  {} ms", report.elapsed_ms);
            let s = &report.final_state;
            println!("  Robot:    ({:.1}, {:.1}) @ {:.1}°", s.robot.x, s.robot.y, s.robot.rotation);
            println!(
                "  Opponent: ({:.1}, {:.1}) @ {:.1}°",
                s.opponent.x, s.opponent.y, s.opponent.rotation
            );
        }
        return Ok(());
    }

    let summary = run_series(&robot, &opponent, args.seed, args.matches, args.max_ticks, jitter);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("=== {} vs {} ({} matches) ===", robot.name, opponent.name, summary.matches);
        println!("  {} wins:  {}", robot.name, summary.robot_wins);
        println!("  {} wins:  {}", opponent.name, summary.opponent_wins);
        println!("  Draws:     {}", summary.draws);
        println!("  Timeouts:  {}", summary.timeouts);
        println!("  Mean ticks: {:.1}", summary.mean_ticks);
    }
    Ok(())
}
