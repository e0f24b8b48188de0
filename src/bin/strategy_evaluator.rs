use anyhow::{Context, Result};
use clap::Parser;
use paintflow_solver::engine::MAX_STEPS;
use paintflow_solver::levels::{parse_levels, LevelSelection};
use paintflow_solver::logging::init_logger;
use paintflow_solver::race::default_strategies;
use paintflow_solver::solver::solve_with_deadline;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "Runs each search strategy alone on every selected level",
    long_about = None
)]
struct Args {
    /// Path to the level file
    levels_file: PathBuf,

    /// Level to evaluate: `N` for one level, `N+` for N and everything after it (default: all)
    level: Option<String>,

    /// Move budget for every strategy
    #[clap(long, default_value_t = MAX_STEPS)]
    max_steps: usize,

    /// Seconds a single strategy may spend on one level before it is stopped
    #[clap(long, default_value_t = 60)]
    time_limit_secs: u64,

    /// Log search progress at debug level
    #[clap(short, long)]
    verbose: bool,
}

#[derive(Default)]
struct Totals {
    solved: usize,
    moves: usize,
    time: Duration,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);

    let selection: LevelSelection = args
        .level
        .as_deref()
        .unwrap_or("")
        .parse()
        .context("Failed to parse level selection")?;
    let content = fs::read_to_string(&args.levels_file)
        .with_context(|| format!("Failed to read level file: {}", args.levels_file.display()))?;
    let levels = parse_levels(&content)
        .with_context(|| format!("Invalid level file: {}", args.levels_file.display()))?;

    let strategies = default_strategies(args.max_steps);
    let mut totals: Vec<Totals> = strategies.iter().map(|_| Totals::default()).collect();
    let mut evaluated = 0usize;
    let time_limit = Duration::from_secs(args.time_limit_secs);

    println!("Starting strategy evaluation on {} levels...", levels.len());

    for (index, level) in levels.iter().enumerate() {
        if !selection.includes(index) {
            continue;
        }
        let board = match level.to_board(index) {
            Ok(board) => board,
            Err(e) => {
                eprintln!("Warning: skipping level {}: {}", index, e);
                continue;
            }
        };
        evaluated += 1;
        println!("\nEvaluating Level {}", index);

        for (strategy, total) in strategies.iter().zip(totals.iter_mut()) {
            let started = Instant::now();
            let solution = solve_with_deadline(strategy.as_ref(), &board, time_limit);
            let elapsed = started.elapsed();
            total.time += elapsed;

            match solution {
                Some(solved) => {
                    total.solved += 1;
                    total.moves += solved.move_count();
                    println!(
                        "  Strategy: {:<4}, Moves: {:<3}, Time: {:.2?}, Solution: {}",
                        strategy.name(),
                        solved.move_count(),
                        elapsed,
                        solved.moves()
                    );
                }
                None if elapsed >= time_limit => println!(
                    "  Strategy: {:<4}, Stopped at time limit, Time: {:.2?}",
                    strategy.name(),
                    elapsed
                ),
                None => println!(
                    "  Strategy: {:<4}, No solution, Time: {:.2?}",
                    strategy.name(),
                    elapsed
                ),
            }
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!("Number of levels evaluated: {}", evaluated);
    println!("\n--- Totals ---");
    for (strategy, total) in strategies.iter().zip(&totals) {
        let avg_moves = if total.solved == 0 {
            0.0
        } else {
            total.moves as f64 / total.solved as f64
        };
        println!(
            "Strategy {:<4}: Solved = {}, Average Moves = {:.2}, Total Time = {:.2?}",
            strategy.name(),
            total.solved,
            avg_moves,
            total.time
        );
    }

    Ok(())
}
