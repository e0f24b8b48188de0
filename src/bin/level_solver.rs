use anyhow::{Context, Result};
use clap::Parser;
use paintflow_solver::engine::MAX_STEPS;
use paintflow_solver::levels::{parse_levels, LevelSelection};
use paintflow_solver::logging::init_logger;
use paintflow_solver::race::{default_strategies, Race, RaceConfig, RaceEnd};
use paintflow_solver::utils::{
    count_moves, prefer_shorter, try_existing_solution, SolutionSource,
};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to the level file
    levels_file: PathBuf,

    /// Level to solve: `N` for one level, `N+` for N and everything after it (default: all)
    level: Option<String>,

    /// Seconds the other strategies get after the first solution is found
    #[clap(long, default_value_t = 300)]
    grace_secs: u64,

    /// Move budget for every strategy
    #[clap(long, default_value_t = MAX_STEPS)]
    max_steps: usize,

    /// Log search progress at debug level
    #[clap(short, long)]
    verbose: bool,
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
    println!("Parsed {} levels", levels.len());

    let config = RaceConfig::default().with_grace_period(Duration::from_secs(args.grace_secs));
    let race = Race::with_strategies(default_strategies(args.max_steps), config);

    let interrupt = race.interrupt_handle();
    ctrlc::set_handler(move || {
        eprintln!("\nCtrl+C received, stopping...");
        interrupt.cancel();
    })
    .context("Failed to set Ctrl+C handler")?;

    for (index, level) in levels.iter().enumerate() {
        if !selection.includes(index) {
            continue;
        }
        println!("\nFinding Level {} Solution...", index);

        let board = match level.to_board(index) {
            Ok(board) => board,
            Err(e) => {
                println!("# Skipping level {}: {}", index, e);
                continue;
            }
        };

        let existing = level.solution().and_then(|solution| {
            let replayed = try_existing_solution(&board, solution);
            match &replayed {
                Some(_) => println!("# Existing solution valid ({} moves)", count_moves(solution)),
                None => println!("# Existing solution INVALID"),
            }
            replayed
        });

        let outcome = race.run(&board);
        for report in &outcome.reports {
            match &report.solution {
                Some(solved) => println!(
                    "# {} finished with {} moves in {:.2?}",
                    report.name,
                    solved.move_count(),
                    report.elapsed
                ),
                None => println!(
                    "# {} finished with no solution in {:.2?}",
                    report.name, report.elapsed
                ),
            }
        }
        if !outcome.unfinished.is_empty() {
            println!("# Cancelled: {}", outcome.unfinished.join(", "));
        }

        let had_existing = existing.is_some();
        match prefer_shorter(existing, outcome.best) {
            Some((chosen, source)) => {
                match (source, had_existing) {
                    (SolutionSource::Found, true) => println!("# New solution is better"),
                    (SolutionSource::Found, false) => println!("# Using new solution"),
                    (SolutionSource::Existing, _) if outcome.winner.is_some() => {
                        println!("# Keeping existing solution")
                    }
                    (SolutionSource::Existing, _) => {
                        println!("# Solver failed, keeping existing solution")
                    }
                }
                println!("Solution: {}", chosen.moves());
                println!("Moves: {}", chosen.move_count());
                println!("Completed board:\n{}", chosen);
            }
            None => println!("# No solution found"),
        }

        if outcome.end == RaceEnd::Interrupted {
            println!("# Interrupted, skipping remaining levels");
            break;
        }
    }

    Ok(())
}
