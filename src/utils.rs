use crate::engine::{
    Board, Cell, Color, Modifier, MoveSequence, COLS, ROWS, SMALL_COLS, SMALL_ROWS,
};
use crate::errors::SolverError;

/// Builds a `Board` from the two positional level strings.
///
/// `color` and `modifier` hold one character per cell in row-major order;
/// whitespace is ignored. A 30 character color string selects the small
/// 6x5 layout, anything else the full 8x6 layout. Cells outside the layout,
/// or past the end of either string, become colorless walls.
///
/// Input is normalized rather than validated: unknown color characters mean
/// "no color" and unknown modifier characters become walls.
///
/// # Examples
/// ```
/// use paintflow_solver::engine::{Color, Modifier};
/// use paintflow_solver::utils::board_from_strings;
///
/// let board = board_from_strings("rr000 00000 00000 00000 00000 00000",
///                                "R0XXX XXXXX XXXXX XXXXX XXXXX XXXXX");
/// assert_eq!(board.cell(0, 0).color(), Some(Color::Red));
/// assert_eq!(board.cell(0, 1).modifier(), Modifier::Blank);
/// // Column F and rows 7-8 are outside the small layout.
/// assert_eq!(board.cell(0, 5).modifier(), Modifier::Wall);
/// assert_eq!(board.cell(7, 0).modifier(), Modifier::Wall);
/// ```
pub fn board_from_strings(color: &str, modifier: &str) -> Board {
    let colors: Vec<char> = color.chars().filter(|c| !c.is_whitespace()).collect();
    let modifiers: Vec<char> = modifier.chars().filter(|c| !c.is_whitespace()).collect();

    let small_board = colors.len() == SMALL_ROWS * SMALL_COLS;
    let (layout_rows, layout_cols) = if small_board {
        (SMALL_ROWS, SMALL_COLS)
    } else {
        (ROWS, COLS)
    };

    let mut cells = [[Cell::wall(); COLS]; ROWS];
    for (r, row) in cells.iter_mut().enumerate().take(layout_rows) {
        for (c, cell) in row.iter_mut().enumerate().take(layout_cols) {
            let idx = r * layout_cols + c;
            if let (Some(&color_char), Some(&modifier_char)) = (colors.get(idx), modifiers.get(idx))
            {
                *cell = Cell::new(
                    Color::from_char(color_char),
                    Modifier::from_char(modifier_char),
                );
            }
        }
    }
    Board::from_cells(cells)
}

/// Applies a comma-separated solution to a copy of `board`.
///
/// Every token must name a clickable cell whose click changes something;
/// otherwise `SolverError::InvalidMove` is returned. Empty tokens are skipped.
/// `board` itself is never modified.
pub fn replay_solution(board: &Board, solution: &str) -> Result<Board, SolverError> {
    let sequence: MoveSequence = solution.parse()?;
    let mut replayed = board.clone();
    for position in sequence.iter() {
        let clickable = replayed.cell(position.row, position.col).is_clickable();
        if !clickable || !replayed.click(position.row, position.col) {
            return Err(SolverError::InvalidMove {
                token: position.to_string(),
            });
        }
    }
    Ok(replayed)
}

/// Replays a stored solution and keeps it only if it actually solves the board.
pub fn try_existing_solution(board: &Board, solution: &str) -> Option<Board> {
    match replay_solution(board, solution) {
        Ok(replayed) if replayed.is_solved() => Some(replayed),
        Ok(_) => {
            log::debug!("stored solution \"{}\" leaves the board unsolved", solution);
            None
        }
        Err(e) => {
            log::debug!("stored solution \"{}\" rejected: {}", solution, e);
            None
        }
    }
}

/// Number of non-empty move tokens in a solution string.
pub fn count_moves(solution: &str) -> usize {
    solution.split(',').filter(|t| !t.trim().is_empty()).count()
}

/// Where a chosen solution came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolutionSource {
    /// Found by the solvers in this run.
    Found,
    /// Replayed from the level file.
    Existing,
}

/// Picks between a validated stored solution and a freshly found one.
///
/// The fresh solution replaces the stored one only when it is strictly shorter.
pub fn prefer_shorter(
    existing: Option<Board>,
    found: Option<Board>,
) -> Option<(Board, SolutionSource)> {
    match (existing, found) {
        (Some(existing), Some(found)) => {
            if found.move_count() < existing.move_count() {
                Some((found, SolutionSource::Found))
            } else {
                Some((existing, SolutionSource::Existing))
            }
        }
        (None, Some(found)) => Some((found, SolutionSource::Found)),
        (Some(existing), None) => Some((existing, SolutionSource::Existing)),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Position;
    use rand::rngs::SmallRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    // Arrow A1 paints B1-C1 red; arrow A2 paints B2-C2 green.
    const COLORS: &str = "rrr000 ggg000 000000 000000 000000 000000 000000 000000";
    const MODIFIERS: &str = "R00XXX R00XXX XXXXXX XXXXXX XXXXXX XXXXXX XXXXXX XXXXXX";

    #[test]
    fn test_board_from_strings_full_layout() {
        let board = board_from_strings(COLORS, MODIFIERS);
        assert_eq!(board.cell(0, 0).color(), Some(Color::Red));
        assert_eq!(board.cell(1, 2).color(), Some(Color::Green));
        assert_eq!(board.cell(0, 3).color(), None);
        assert_eq!(board.cell(0, 1).modifier(), Modifier::Blank);
        assert!(board.cell(1, 0).is_clickable());
        assert!(!board.has_bombs());
        assert!(board.moves().is_empty());
    }

    #[test]
    fn test_board_from_strings_short_input_is_walled() {
        let board = board_from_strings("rgb", "0F");
        assert_eq!(board.cell(0, 0).color(), Some(Color::Red));
        assert_eq!(board.cell(0, 1).modifier(), Modifier::Flood);
        // Index 2 is past the end of the modifier string.
        assert_eq!(board.cell(0, 2).color(), None);
        assert_eq!(board.cell(0, 2).modifier(), Modifier::Wall);
        assert_eq!(board.cell(7, 5).modifier(), Modifier::Wall);
    }

    #[test]
    fn test_board_from_strings_small_layout() {
        let colors = "r".repeat(30);
        let modifiers = "0".repeat(30);
        let board = board_from_strings(&colors, &modifiers);
        for r in 0..ROWS {
            for c in 0..COLS {
                let inside = r < SMALL_ROWS && c < SMALL_COLS;
                let expected = if inside { Modifier::Blank } else { Modifier::Wall };
                assert_eq!(board.cell(r, c).modifier(), expected, "cell ({}, {})", r, c);
                assert_eq!(board.cell(r, c).color().is_some(), inside);
            }
        }
    }

    #[test]
    fn test_board_from_strings_unknown_characters_normalized() {
        let board = board_from_strings("z", "?");
        assert_eq!(board.cell(0, 0).color(), None);
        assert_eq!(board.cell(0, 0).modifier(), Modifier::Wall);
    }

    #[test]
    fn test_replay_solution_solves_board() {
        let board = board_from_strings(COLORS, MODIFIERS);
        let solved = replay_solution(&board, "A1,A2").unwrap();
        assert!(solved.is_solved());
        assert_eq!(solved.moves().to_string(), "A1,A2");
        assert!(board.moves().is_empty());
        assert!(try_existing_solution(&board, "a2, a1").is_some());
    }

    #[test]
    fn test_replay_rejects_non_clickable_and_no_op_moves() {
        let board = board_from_strings(COLORS, MODIFIERS);
        assert!(matches!(
            replay_solution(&board, "B1"),
            Err(SolverError::InvalidMove { .. })
        ));
        assert!(matches!(
            replay_solution(&board, "A1,Z9"),
            Err(SolverError::MalformedMove { .. }) | Err(SolverError::MoveOutOfRange { .. })
        ));

        // A1 blocked by a mismatched paint produces no change.
        let blocked = board_from_strings("rr", "Rg");
        let err = replay_solution(&blocked, "A1").unwrap_err();
        assert_eq!(err.to_string(), "invalid move: A1");
    }

    #[test]
    fn test_try_existing_solution_requires_solved_board() {
        let board = board_from_strings(COLORS, MODIFIERS);
        assert!(try_existing_solution(&board, "A1").is_none());
        assert!(try_existing_solution(&board, "B1").is_none());
        assert!(try_existing_solution(&board, "A1,A2").is_some());
    }

    #[test]
    fn test_count_moves() {
        assert_eq!(count_moves(""), 0);
        assert_eq!(count_moves("A1"), 1);
        assert_eq!(count_moves("A1,,B2,"), 2);
    }

    #[test]
    fn test_serialized_moves_replay_to_identical_board() {
        let board = board_from_strings(
            "rrggbb rrggbb oodd00 oodd00 000000 000000 000000 000000",
            "R0F0a0 00B00L w0D00X 00x0F0 XXXXXX XXXXXX XXXXXX XXXXXX",
        );
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..20 {
            let mut direct = board.clone();
            for _ in 0..12 {
                let clickable: Vec<Position> = direct.clickable_positions();
                let Some(&pos) = clickable.choose(&mut rng) else {
                    break;
                };
                let mut candidate = direct.clone();
                // Only keep clicks that change something so the replay accepts them.
                if candidate.click(pos.row, pos.col) {
                    direct = candidate;
                }
            }
            let replayed = replay_solution(&board, &direct.moves().to_string()).unwrap();
            assert_eq!(replayed, direct);
        }
    }

    #[test]
    fn test_prefer_shorter() {
        let board = board_from_strings(COLORS, MODIFIERS);
        let two = replay_solution(&board, "A1,A2").unwrap();
        let four = replay_solution(&board, "A1,A1,A1,A2").unwrap();

        let (chosen, source) = prefer_shorter(Some(four.clone()), Some(two.clone())).unwrap();
        assert_eq!(source, SolutionSource::Found);
        assert_eq!(chosen.move_count(), 2);

        let (_, source) = prefer_shorter(Some(two.clone()), Some(two.clone())).unwrap();
        assert_eq!(source, SolutionSource::Existing);

        assert_eq!(prefer_shorter(None, Some(four)).unwrap().1, SolutionSource::Found);
        assert_eq!(prefer_shorter(Some(two), None).unwrap().1, SolutionSource::Existing);
        assert!(prefer_shorter(None, None).is_none());
    }
}
