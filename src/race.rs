//! Runs several strategies at once and keeps the shortest solution.
//!
//! Each strategy gets its own thread and its own clone of the initial board.
//! Threads post exactly one `StrategyReport` on a channel whose only receiver
//! is the coordinator. Once the first solution arrives, the remaining
//! strategies get `grace_period` to finish; after that they are cancelled and
//! the coordinator returns without waiting for them.
use crate::engine::{Board, MAX_STEPS};
use crate::solver::{BestFirst, BreadthFirst, CancelToken, DepthFirst, Strategy};
use crossbeam_channel::{unbounded, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Time the other strategies get after the first solution is posted.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(300);

/// Upper bound on how long the coordinator sleeps between checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Clone, Debug)]
pub struct RaceConfig {
    pub grace_period: Duration,
    pub poll_interval: Duration,
}

impl Default for RaceConfig {
    fn default() -> Self {
        RaceConfig {
            grace_period: DEFAULT_GRACE_PERIOD,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl RaceConfig {
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

/// What one strategy posted.
#[derive(Clone, Debug)]
pub struct StrategyReport {
    pub name: String,
    pub solution: Option<Board>,
    /// Time from race start until the report was posted.
    pub elapsed: Duration,
}

/// Why the race stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RaceEnd {
    /// Every strategy posted a report.
    AllFinished,
    /// The grace period after the first solution ran out.
    GraceExpired,
    /// The interrupt handle was triggered.
    Interrupted,
}

#[derive(Clone, Debug)]
pub struct RaceOutcome {
    /// The solution with the fewest moves among the reports, if any.
    pub best: Option<Board>,
    /// Name of the strategy that produced `best`.
    pub winner: Option<String>,
    /// Reports in strategy launch order; strategies that never posted are absent.
    pub reports: Vec<StrategyReport>,
    /// Strategies that were still running when the race stopped.
    pub unfinished: Vec<String>,
    pub end: RaceEnd,
}

/// The three built-in strategies, each with the given move budget.
pub fn default_strategies(max_steps: usize) -> Vec<Arc<dyn Strategy>> {
    vec![
        Arc::new(DepthFirst { max_steps }),
        Arc::new(BreadthFirst { max_steps }),
        Arc::new(BestFirst { max_steps }),
    ]
}

pub struct Race {
    strategies: Vec<Arc<dyn Strategy>>,
    config: RaceConfig,
    interrupt: CancelToken,
}

impl Race {
    /// A race between the three built-in strategies with the default move budget.
    pub fn new(config: RaceConfig) -> Self {
        Race::with_strategies(default_strategies(MAX_STEPS), config)
    }

    pub fn with_strategies(strategies: Vec<Arc<dyn Strategy>>, config: RaceConfig) -> Self {
        Race {
            strategies,
            config,
            interrupt: CancelToken::new(),
        }
    }

    /// Handle that stops a running (or future) `run` early.
    pub fn interrupt_handle(&self) -> CancelToken {
        self.interrupt.clone()
    }

    /// Races every strategy on its own clone of `initial`.
    ///
    /// Returns when all strategies have reported, when the grace period after
    /// the first solution expires, or when interrupted. Strategies still
    /// running at that point are cancelled and left to wind down on their own
    /// threads. The winner is chosen by move count; ties go to the strategy
    /// launched first, never to whichever reported first.
    pub fn run(&self, initial: &Board) -> RaceOutcome {
        let started = Instant::now();
        let cancel = CancelToken::new();
        let (tx, rx) = unbounded::<(usize, StrategyReport)>();
        let mut handles = Vec::with_capacity(self.strategies.len());
        let mut slots: Vec<Option<StrategyReport>> = vec![None; self.strategies.len()];
        let mut pending = 0usize;

        for (slot, strategy) in self.strategies.iter().enumerate() {
            let strategy = Arc::clone(strategy);
            let board = initial.clone();
            let cancel = cancel.clone();
            let tx = tx.clone();

            let spawned = thread::Builder::new()
                .name(format!("strategy-{}", strategy.name()))
                .spawn(move || {
                    let solution = strategy.solve(&board, &cancel);
                    match &solution {
                        Some(solved) => log::info!(
                            "{} finished with {} moves",
                            strategy.name(),
                            solved.move_count()
                        ),
                        None => log::info!("{} finished with no solution", strategy.name()),
                    }
                    let report = StrategyReport {
                        name: strategy.name().to_string(),
                        solution,
                        elapsed: started.elapsed(),
                    };
                    // The coordinator may already be gone.
                    let _ = tx.send((slot, report));
                });

            match spawned {
                Ok(handle) => {
                    handles.push(handle);
                    pending += 1;
                }
                Err(e) => log::error!("could not start {}: {}", self.strategies[slot].name(), e),
            }
        }
        drop(tx);

        let mut first_solution_at: Option<Instant> = None;
        let end = loop {
            if self.interrupt.is_cancelled() {
                break RaceEnd::Interrupted;
            }
            if pending == 0 {
                break RaceEnd::AllFinished;
            }

            let mut wait = self.config.poll_interval;
            if let Some(first) = first_solution_at {
                let waited = first.elapsed();
                if waited >= self.config.grace_period {
                    log::info!(
                        "grace period of {:?} after first solution expired",
                        self.config.grace_period
                    );
                    break RaceEnd::GraceExpired;
                }
                wait = wait.min(self.config.grace_period - waited);
            }

            match rx.recv_timeout(wait) {
                Ok((slot, report)) => {
                    pending -= 1;
                    if report.solution.is_some() && first_solution_at.is_none() {
                        first_solution_at = Some(Instant::now());
                    }
                    slots[slot] = Some(report);
                }
                Err(RecvTimeoutError::Timeout) => {}
                // Every live sender is gone, so nothing else will arrive.
                Err(RecvTimeoutError::Disconnected) => pending = 0,
            }
        };

        cancel.cancel();
        if end == RaceEnd::AllFinished {
            for handle in handles {
                if handle.join().is_err() {
                    log::error!("a strategy thread panicked");
                }
            }
        }

        let unfinished: Vec<String> = self
            .strategies
            .iter()
            .zip(&slots)
            .filter(|(_, report)| report.is_none())
            .map(|(strategy, _)| strategy.name().to_string())
            .collect();
        if !unfinished.is_empty() {
            log::warn!("cancelled unfinished strategies: {}", unfinished.join(", "));
        }

        let reports: Vec<StrategyReport> = slots.into_iter().flatten().collect();
        let winner = reports
            .iter()
            .filter_map(|report| report.solution.as_ref().map(|board| (report, board)))
            .min_by_key(|(_, board)| board.move_count());

        let (winner, best) = match winner {
            Some((report, board)) => {
                log::info!("best solution uses {} moves ({})", board.move_count(), report.name);
                (Some(report.name.clone()), Some(board.clone()))
            }
            None => {
                log::info!("no solution found by any strategy");
                (None, None)
            }
        };

        RaceOutcome {
            best,
            winner,
            reports,
            unfinished,
            end,
        }
    }
}

/// Races the built-in strategies with the given grace period and returns the shortest solution.
pub fn solve_with_all_strategies(initial: &Board, grace_period: Duration) -> Option<Board> {
    let config = RaceConfig::default().with_grace_period(grace_period);
    Race::new(config).run(initial).best
}
