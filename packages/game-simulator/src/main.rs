//! Game simulator CLI: runs many games in memory with scripted players.
//!
//! Useful for checking balance (how often spies win for a table size) and
//! for exercising the engine end to end without any external decision maker.

mod metrics;
mod output;
mod simulator;
mod types;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use metrics::{build_game_metrics, SimulationConfig};
use output::OutputWriter;
use rand::Rng;
use simulator::{GameResult, Simulator};
use spy_engine::domain::Winner;
use spy_engine::{GameConfig, GameStatus};
use tracing::{info, warn};
use types::{ModeArg, OutputFormat, StrategyArg};

#[derive(Parser)]
#[command(name = "game-simulator")]
#[command(about = "In-memory Who-is-the-Spy simulator")]
struct Args {
    /// Number of games to simulate
    #[arg(short, long, default_value = "1")]
    games: u32,

    /// Behavior mode for every game
    #[arg(long, value_enum, default_value = "workflow")]
    mode: ModeArg,

    /// Vote strategy for the agent mode
    #[arg(long, value_enum, default_value = "eliminate-prime")]
    vote_strategy: StrategyArg,

    /// Players per game (defaults to the configured player_count)
    #[arg(long)]
    players: Option<usize>,

    /// Round limit override
    #[arg(long)]
    max_rounds: Option<u32>,

    /// YAML configuration file (falls back to SPY_GAME_CONFIG, then defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base seed; game N uses seed + N
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Show output summary and file paths
    #[arg(long)]
    show_output: bool,

    /// Output directory for results
    #[arg(long, default_value = "./simulation-results")]
    output_dir: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "jsonl")]
    output_format: OutputFormat,

    /// Compress the JSONL output with gzip
    #[arg(long)]
    compress: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Silent by default, only warnings and errors
    let filter = if args.verbose {
        "debug"
    } else if args.show_output {
        "info"
    } else {
        "warn"
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = load_config(&args)?;
    let simulator = Simulator::new(config, args.mode.name(), args.vote_strategy.strategy().name());
    if args.show_output {
        info!(
            games = args.games,
            mode = simulator.mode(),
            vote_strategy = simulator.vote_strategy(),
            players = simulator.player_count(),
            "Starting simulation"
        );
    }

    let mut output_writer =
        OutputWriter::new(&args.output_dir, &args.output_format, args.compress)?;

    let base_seed = args.seed.unwrap_or_else(|| rand::rng().random());
    let start = Instant::now();
    let mut results = Vec::new();
    let mut errors = 0;

    for game_num in 1..=args.games {
        let game_start = Instant::now();
        let seed = base_seed.wrapping_add(u64::from(game_num));

        match simulator.simulate_game(game_num, seed).await {
            Ok(result) => {
                let duration_ms = game_start.elapsed().as_secs_f64() * 1000.0;
                let metrics = build_game_metrics(
                    game_num,
                    seed,
                    SimulationConfig {
                        mode: simulator.mode().to_string(),
                        vote_strategy: simulator.vote_strategy().to_string(),
                        players: result.outcome.state.players.len(),
                        total_games: args.games,
                    },
                    &result,
                    duration_ms,
                );
                if let Err(e) = output_writer.write_game(&metrics) {
                    warn!(game_num, error = %e, "Failed to write metrics");
                }
                if args.verbose {
                    info!(
                        game_num,
                        winner = ?result.outcome.state.winner,
                        rounds = result.outcome.rounds_played(),
                        "Game completed"
                    );
                }
                results.push(result);
            }
            Err(e) => {
                errors += 1;
                warn!(game_num, error = %e, code = e.code(), "Game failed");
            }
        }
    }

    let elapsed = start.elapsed();
    let (jsonl_path, csv_path) = output_writer.output_paths();
    let (jsonl_path, csv_path) = (jsonl_path.cloned(), csv_path.clone());
    output_writer.finish()?;

    if args.show_output {
        if let Some(path) = jsonl_path {
            info!("Detailed results written to: {}", path.display());
        }
        info!("Summary CSV written to: {}", csv_path.display());
        print_summary(&results, errors, elapsed, args.games);
    }

    Ok(())
}

fn load_config(args: &Args) -> Result<GameConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(Some(path.as_path()))?,
        None => GameConfig::from_env()?,
    };
    if let Some(players) = args.players {
        config.game.player_count = players;
        config.game.settings.max_players = config.game.settings.max_players.max(players);
    }
    if let Some(max_rounds) = args.max_rounds {
        config.game.settings.max_rounds = max_rounds;
    }
    config.validate()?;
    Ok(config)
}

fn print_summary(results: &[GameResult], errors: u32, elapsed: Duration, total: u32) {
    println!("\n=== Simulation Summary ===");
    println!("Games completed: {}/{}", results.len(), total);
    if errors > 0 {
        println!("Errors: {errors}");
    }
    println!("Total time: {elapsed:?}");
    if results.is_empty() {
        return;
    }
    println!("Average time per game: {:?}", elapsed / results.len() as u32);

    let mut civilian_wins = 0u32;
    let mut spy_wins = 0u32;
    let mut round_limited = 0u32;
    let mut total_rounds = 0u64;
    for result in results {
        total_rounds += u64::from(result.outcome.rounds_played());
        match (result.outcome.status, result.outcome.state.winner) {
            (GameStatus::RoundLimitReached, _) => round_limited += 1,
            (_, Some(Winner::Civilians)) => civilian_wins += 1,
            (_, Some(Winner::Spies)) => spy_wins += 1,
            (_, None) => {}
        }
    }

    let pct = |n: u32| (n as f64 / results.len() as f64) * 100.0;
    println!("\n=== Outcomes ===");
    println!("Civilians: {} ({:.1}%)", civilian_wins, pct(civilian_wins));
    println!("Spies: {} ({:.1}%)", spy_wins, pct(spy_wins));
    println!("Round limit: {} ({:.1}%)", round_limited, pct(round_limited));
    println!(
        "Average rounds: {:.2}",
        total_rounds as f64 / results.len() as f64
    );
}
