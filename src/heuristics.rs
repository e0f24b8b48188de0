use crate::engine::Board;

/// Counts the cells that are currently not correct.
///
/// This is the estimate of remaining work used by the best-first solver.
/// It is not admissible: a single click can fix a whole run of cells, so the
/// count can overestimate the number of moves still needed. Treat solutions
/// ordered by it as "short", not "shortest".
///
/// # Arguments
/// * `board`: The `Board` to analyze.
///
/// # Returns
/// The number of incorrect cells; `0` exactly when the board is solved.
pub fn count_incorrect_cells(board: &Board) -> usize {
    board.cells().filter(|cell| !cell.is_correct()).count()
}
