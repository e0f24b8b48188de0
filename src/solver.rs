//! Search strategies over the board model.
//!
//! Three independent searches share the same contract: they take the initial
//! board by reference, explore cloned boards only, and return a solved board
//! (whose move sequence is the solution) or `None` when nothing is reachable
//! within the move budget.
//!
//! All three deduplicate states through [`Board::fingerprint`]. A fingerprint
//! collision makes a search skip a state it never actually saw; that is an
//! accepted approximation, not something the searches try to detect.
use crate::engine::{Board, MAX_STEPS};
use crate::heuristics::count_incorrect_cells;
use crossbeam_channel::{bounded, RecvTimeoutError};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Shared stop signal checked by the searches once per expanded state.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        CancelToken(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, AtomicOrdering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(AtomicOrdering::Relaxed)
    }
}

/// A search algorithm that can take part in a race.
pub trait Strategy: Send + Sync {
    /// Short label used in logs and reports.
    fn name(&self) -> &str;

    /// Searches for a solved board reachable from `initial`.
    ///
    /// Implementations must not block past `cancel` being set for longer
    /// than one unit of work; what they return after cancellation is ignored.
    fn solve(&self, initial: &Board, cancel: &CancelToken) -> Option<Board>;
}

/// Runs `strategy` on the calling thread, cancelling it once `time_limit` has passed.
///
/// A timer thread sets the cancel token at the deadline unless the search
/// has already returned. Returns `None` when the search was cut off.
pub fn solve_with_deadline(
    strategy: &dyn Strategy,
    initial: &Board,
    time_limit: Duration,
) -> Option<Board> {
    let cancel = CancelToken::new();
    let (done_tx, done_rx) = bounded::<()>(0);

    let timer = {
        let cancel = cancel.clone();
        thread::spawn(move || {
            // Disconnected means the search returned first.
            if let Err(RecvTimeoutError::Timeout) = done_rx.recv_timeout(time_limit) {
                cancel.cancel();
            }
        })
    };

    let solution = strategy.solve(initial, &cancel);
    drop(done_tx);
    if timer.join().is_err() {
        log::error!("deadline timer for {} panicked", strategy.name());
    }

    if cancel.is_cancelled() {
        log::warn!("{} stopped after {:?}", strategy.name(), time_limit);
        return None;
    }
    solution
}

/// Exhaustive depth-first search; see [`solve_dfs`].
#[derive(Clone, Copy, Debug)]
pub struct DepthFirst {
    pub max_steps: usize,
}

/// Level-order search; see [`solve_bfs`].
#[derive(Clone, Copy, Debug)]
pub struct BreadthFirst {
    pub max_steps: usize,
}

/// Heuristic branch-and-bound search; see [`solve_best_first`].
#[derive(Clone, Copy, Debug)]
pub struct BestFirst {
    pub max_steps: usize,
}

impl Default for DepthFirst {
    fn default() -> Self {
        DepthFirst { max_steps: MAX_STEPS }
    }
}

impl Default for BreadthFirst {
    fn default() -> Self {
        BreadthFirst { max_steps: MAX_STEPS }
    }
}

impl Default for BestFirst {
    fn default() -> Self {
        BestFirst { max_steps: MAX_STEPS }
    }
}

impl Strategy for DepthFirst {
    fn name(&self) -> &str {
        "DFS"
    }

    fn solve(&self, initial: &Board, cancel: &CancelToken) -> Option<Board> {
        solve_dfs(initial, self.max_steps, cancel)
    }
}

impl Strategy for BreadthFirst {
    fn name(&self) -> &str {
        "BFS"
    }

    fn solve(&self, initial: &Board, cancel: &CancelToken) -> Option<Board> {
        solve_bfs(initial, self.max_steps, cancel)
    }
}

impl Strategy for BestFirst {
    fn name(&self) -> &str {
        "A*"
    }

    fn solve(&self, initial: &Board, cancel: &CancelToken) -> Option<Board> {
        solve_best_first(initial, self.max_steps, cancel)
    }
}

/// Exhaustive depth-first search for the fewest-move solution it can see.
///
/// A single visited set covers the whole exploration and a state is marked
/// the first time it is reached, whatever the path length. The search keeps
/// going after the first solution and only prunes on the move budget, so it
/// explores every state reachable within `max_steps`. Because a state first
/// reached through a long path is never revisited through a shorter one, the
/// result is not guaranteed to be the shortest solution.
pub fn solve_dfs(initial: &Board, max_steps: usize, cancel: &CancelToken) -> Option<Board> {
    let mut visited_states = HashSet::new();
    let mut best_solution = None;
    find_best_solution_recursive(
        initial.clone(),
        max_steps,
        &mut visited_states,
        &mut best_solution,
        cancel,
    );
    log::debug!(
        "DFS visited {} states, best: {:?} moves",
        visited_states.len(),
        best_solution.as_ref().map(Board::move_count)
    );
    best_solution
}

fn find_best_solution_recursive(
    board: Board,
    max_steps: usize,
    visited_states: &mut HashSet<u64>,
    best_solution: &mut Option<Board>,
    cancel: &CancelToken,
) {
    if cancel.is_cancelled() || board.move_count() > max_steps {
        return;
    }

    if board.is_solved() {
        let is_better = best_solution
            .as_ref()
            .map_or(true, |best| board.move_count() < best.move_count());
        if is_better {
            *best_solution = Some(board);
        }
        return;
    }

    if !visited_states.insert(board.fingerprint()) {
        return;
    }

    for position in board.clickable_positions() {
        let mut next_board = board.clone();
        if next_board.click(position.row, position.col) {
            find_best_solution_recursive(
                next_board,
                max_steps,
                visited_states,
                best_solution,
                cancel,
            );
        }
    }
}

/// Breadth-first search returning a shortest solution.
///
/// States are marked visited when enqueued, so each is expanded at most once.
/// Every click costs one move and the queue is ordered by move count, so the
/// first solved board dequeued is a shortest solution among the states
/// reachable within `max_steps`. Boards at the budget are not expanded.
pub fn solve_bfs(initial: &Board, max_steps: usize, cancel: &CancelToken) -> Option<Board> {
    let mut queue = VecDeque::new();
    let mut visited_states = HashSet::new();

    visited_states.insert(initial.fingerprint());
    queue.push_back(initial.clone());

    while let Some(board) = queue.pop_front() {
        if cancel.is_cancelled() {
            return None;
        }
        if board.is_solved() {
            log::debug!("BFS solved after visiting {} states", visited_states.len());
            return Some(board);
        }
        if board.move_count() >= max_steps {
            continue;
        }

        for position in board.clickable_positions() {
            let mut next_board = board.clone();
            if !next_board.click(position.row, position.col) {
                continue;
            }
            if !visited_states.insert(next_board.fingerprint()) {
                continue;
            }
            queue.push_back(next_board);
        }
    }

    log::debug!("BFS exhausted {} states", visited_states.len());
    None
}

/// Frontier entry of the best-first search.
///
/// Ordered by `(priority, moves, order)` only; the board is never compared.
/// `order` is an insertion counter, so the ordering is total and ties resolve
/// to the oldest entry.
struct QueueEntry {
    priority: usize,
    moves: usize,
    order: u64,
    board: Board,
}

impl QueueEntry {
    fn key(&self) -> (usize, usize, u64) {
        (self.priority, self.moves, self.order)
    }
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: `BinaryHeap` is a max-heap and the smallest key must pop first.
        other.key().cmp(&self.key())
    }
}

/// Best-first (branch-and-bound) search ordered by `moves + incorrect cells`.
///
/// Returns the first solved board popped from the frontier. The heuristic
/// ([`count_incorrect_cells`]) can overestimate, so this finds short
/// solutions quickly but does not guarantee the shortest one.
pub fn solve_best_first(initial: &Board, max_steps: usize, cancel: &CancelToken) -> Option<Board> {
    let mut frontier = BinaryHeap::new();
    let mut visited_states = HashSet::new();
    let mut counter: u64 = 0;

    visited_states.insert(initial.fingerprint());
    frontier.push(QueueEntry {
        priority: initial.move_count() + count_incorrect_cells(initial),
        moves: initial.move_count(),
        order: counter,
        board: initial.clone(),
    });

    while let Some(QueueEntry { moves, board, .. }) = frontier.pop() {
        if cancel.is_cancelled() {
            return None;
        }
        if board.is_solved() {
            log::debug!("A* solved after visiting {} states", visited_states.len());
            return Some(board);
        }
        if moves >= max_steps {
            continue;
        }

        for position in board.clickable_positions() {
            let mut next_board = board.clone();
            if !next_board.click(position.row, position.col) {
                continue;
            }
            if !visited_states.insert(next_board.fingerprint()) {
                continue;
            }
            counter += 1;
            let next_moves = next_board.move_count();
            frontier.push(QueueEntry {
                priority: next_moves + count_incorrect_cells(&next_board),
                moves: next_moves,
                order: counter,
                board: next_board,
            });
        }
    }

    log::debug!("A* exhausted {} states", visited_states.len());
    None
}
