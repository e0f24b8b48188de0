//! Core board model for the color-propagation puzzle.
//!
//! This module defines the puzzle's fundamental components:
//! - `Color`: The five cell colors.
//! - `Direction`: Arrow directions, with the clockwise rotation used by rotating arrows.
//! - `Modifier`: The dual-purpose cell state (a mechanism tag or a paint value).
//! - `Cell`: A color requirement plus its current modifier.
//! - `Position` / `MoveSequence`: Clicked coordinates and their text form (`A1,B2,...`).
//! - `Board`: The fixed 8x6 grid, click semantics, the solved predicate and the
//!   state fingerprint used by the solvers for deduplication.
use std::fmt;
use std::str::FromStr;

use crate::errors::SolverError;

/// Number of rows on every board.
pub const ROWS: usize = 8;

/// Number of columns on every board.
pub const COLS: usize = 6;

/// Default move budget for the solvers.
pub const MAX_STEPS: usize = 40;

/// Rows of the playable area of a "small" (30 cell) level.
pub const SMALL_ROWS: usize = 6;

/// Columns of the playable area of a "small" (30 cell) level.
pub const SMALL_COLS: usize = 5;

/// One of the five puzzle colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Green,
    Blue,
    Orange,
    Dark,
}

impl Color {
    /// Parses the level-file character for a color (`r`, `g`, `b`, `o`, `d`).
    ///
    /// Any other character means "no color".
    ///
    /// # Examples
    ///
    /// ```
    /// use paintflow_solver::engine::Color;
    /// assert_eq!(Color::from_char('o'), Some(Color::Orange));
    /// assert_eq!(Color::from_char('0'), None);
    /// ```
    pub fn from_char(c: char) -> Option<Color> {
        match c {
            'r' => Some(Color::Red),
            'g' => Some(Color::Green),
            'b' => Some(Color::Blue),
            'o' => Some(Color::Orange),
            'd' => Some(Color::Dark),
            _ => None,
        }
    }

    /// Converts the color back to its level-file character.
    pub fn to_char(&self) -> char {
        match self {
            Color::Red => 'r',
            Color::Green => 'g',
            Color::Blue => 'b',
            Color::Orange => 'o',
            Color::Dark => 'd',
        }
    }

    /// Returns the ANSI background color code string for terminal output.
    fn to_ansi_color_code(&self) -> &'static str {
        match self {
            Color::Red => "41",
            Color::Green => "42",
            Color::Orange => "43",
            Color::Blue => "44",
            Color::Dark => "45",
        }
    }
}

/// Direction an arrow propagates color in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All directions in clockwise order, starting from `Up`.
    pub const CLOCKWISE: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Returns the `(row, column)` delta of a single step in this direction.
    pub fn delta(&self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
        }
    }

    /// Returns the next direction clockwise (`Up -> Right -> Down -> Left -> Up`).
    ///
    /// # Examples
    ///
    /// ```
    /// use paintflow_solver::engine::Direction;
    /// assert_eq!(Direction::Left.clockwise(), Direction::Up);
    /// ```
    pub fn clockwise(&self) -> Direction {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }
}

/// The mutable part of a cell.
///
/// A modifier is either a mechanism tag (arrows, flood, bomb, wall) or a
/// paint value (`Blank` or `Paint(color)`). Clicks move paint values between
/// cells; rotating arrows re-tag themselves after every click.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Modifier {
    /// Unpainted (`0`).
    Blank,
    /// Currently painted with a color (`r`, `g`, `b`, `o`, `d`).
    Paint(Color),
    /// Fixed arrow (`U`, `R`, `D`, `L`).
    StaticArrow(Direction),
    /// Arrow that turns clockwise after each click (`w`, `x`, `s`, `a`).
    RotatingArrow(Direction),
    /// Flood fill (`F`).
    Flood,
    /// 3x3 bomb (`B`).
    Bomb,
    /// Wall (`X`).
    Wall,
}

impl Modifier {
    /// Parses a level-file modifier character.
    ///
    /// Unknown characters are normalized to `Wall`, the same way out-of-range
    /// positions are filled when a board is constructed.
    pub fn from_char(c: char) -> Modifier {
        if let Some(color) = Color::from_char(c) {
            return Modifier::Paint(color);
        }
        match c {
            '0' => Modifier::Blank,
            'U' => Modifier::StaticArrow(Direction::Up),
            'R' => Modifier::StaticArrow(Direction::Right),
            'D' => Modifier::StaticArrow(Direction::Down),
            'L' => Modifier::StaticArrow(Direction::Left),
            'w' => Modifier::RotatingArrow(Direction::Up),
            'x' => Modifier::RotatingArrow(Direction::Right),
            's' => Modifier::RotatingArrow(Direction::Down),
            'a' => Modifier::RotatingArrow(Direction::Left),
            'F' => Modifier::Flood,
            'B' => Modifier::Bomb,
            _ => Modifier::Wall,
        }
    }

    /// Converts the modifier back to its level-file character.
    pub fn to_char(&self) -> char {
        match self {
            Modifier::Blank => '0',
            Modifier::Paint(color) => color.to_char(),
            Modifier::StaticArrow(Direction::Up) => 'U',
            Modifier::StaticArrow(Direction::Right) => 'R',
            Modifier::StaticArrow(Direction::Down) => 'D',
            Modifier::StaticArrow(Direction::Left) => 'L',
            Modifier::RotatingArrow(Direction::Up) => 'w',
            Modifier::RotatingArrow(Direction::Right) => 'x',
            Modifier::RotatingArrow(Direction::Down) => 's',
            Modifier::RotatingArrow(Direction::Left) => 'a',
            Modifier::Flood => 'F',
            Modifier::Bomb => 'B',
            Modifier::Wall => 'X',
        }
    }

    /// The paint value a mechanism of the given color leaves behind.
    ///
    /// A colorless mechanism paints `Blank`.
    pub fn painted(color: Option<Color>) -> Modifier {
        match color {
            Some(color) => Modifier::Paint(color),
            None => Modifier::Blank,
        }
    }

    /// Returns `true` for mechanism tags that react to a click.
    pub fn is_clickable(&self) -> bool {
        matches!(
            self,
            Modifier::StaticArrow(_)
                | Modifier::RotatingArrow(_)
                | Modifier::Flood
                | Modifier::Bomb
        )
    }
}

/// A (row, column) board coordinate, both 0-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }
}

impl fmt::Display for Position {
    /// Formats the position as a move token: column letter then 1-based row (`(1, 2)` is `C2`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = (b'A' + self.col as u8) as char;
        write!(f, "{}{}", letter, self.row + 1)
    }
}

impl FromStr for Position {
    type Err = SolverError;

    /// Parses a move token such as `B3` (column letter, 1-based row).
    ///
    /// The letter is case-insensitive. Tokens that do not name a cell of the
    /// 8x6 grid are rejected.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let token = token.trim();
        let malformed = || SolverError::MalformedMove {
            token: token.to_string(),
        };

        let mut chars = token.chars();
        let letter = chars.next().ok_or_else(malformed)?.to_ascii_uppercase();
        if !letter.is_ascii_uppercase() {
            return Err(malformed());
        }
        let row_text = chars.as_str();
        if row_text.is_empty() || !row_text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let row_number: usize = row_text.parse().map_err(|_| malformed())?;

        let col = (letter as u8 - b'A') as usize;
        if row_number == 0 || row_number > ROWS || col >= COLS {
            return Err(SolverError::MoveOutOfRange {
                token: token.to_string(),
            });
        }
        Ok(Position::new(row_number - 1, col))
    }
}

/// The clicks applied to a board, in application order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveSequence {
    moves: Vec<Position>,
}

impl MoveSequence {
    pub fn new() -> Self {
        MoveSequence { moves: Vec::new() }
    }

    /// Appends a click.
    pub fn push(&mut self, position: Position) {
        self.moves.push(position);
    }

    /// Number of clicks in the sequence.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.moves.iter()
    }
}

impl fmt::Display for MoveSequence {
    /// Comma-joined move tokens, e.g. `A1,C4,C4`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, position) in self.moves.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", position)?;
        }
        Ok(())
    }
}

impl FromStr for MoveSequence {
    type Err = SolverError;

    /// Parses comma-separated move tokens. Empty tokens are skipped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut sequence = MoveSequence::new();
        for token in s.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            sequence.push(token.parse()?);
        }
        Ok(sequence)
    }
}

/// One grid position: a color requirement and the current modifier.
///
/// `color` is fixed at construction; only `modifier` changes during play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    color: Option<Color>,
    modifier: Modifier,
    // Never restricted by any level format; kept so the click filter has a place to live.
    only_clickable_from: Option<Position>,
}

impl Cell {
    /// Creates an unconstrained cell.
    pub fn new(color: Option<Color>, modifier: Modifier) -> Self {
        Cell {
            color,
            modifier,
            only_clickable_from: None,
        }
    }

    /// A colorless wall, used to fill positions outside the playable layout.
    pub fn wall() -> Self {
        Cell::new(None, Modifier::Wall)
    }

    /// The color this cell must end up with (`None` = no requirement).
    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn modifier(&self) -> Modifier {
        self.modifier
    }

    pub fn is_clickable(&self) -> bool {
        self.modifier.is_clickable()
    }

    /// Whether a click at `position` may trigger this cell.
    pub fn allows_click_at(&self, position: Position) -> bool {
        self.only_clickable_from.map_or(true, |from| from == position)
    }

    /// Per-cell correctness.
    ///
    /// - A colorless cell is always correct.
    /// - A painted cell is correct iff its paint equals its color.
    /// - Otherwise the cell is correct unless it is `Blank`, so an unfired
    ///   mechanism on a colored cell counts as satisfied.
    ///
    /// # Examples
    ///
    /// ```
    /// use paintflow_solver::engine::{Cell, Color, Modifier};
    /// assert!(Cell::new(Some(Color::Red), Modifier::Paint(Color::Red)).is_correct());
    /// assert!(!Cell::new(Some(Color::Red), Modifier::Blank).is_correct());
    /// assert!(Cell::new(Some(Color::Red), Modifier::Flood).is_correct());
    /// ```
    pub fn is_correct(&self) -> bool {
        let Some(color) = self.color else {
            return true;
        };
        match self.modifier {
            Modifier::Paint(paint) => paint == color,
            Modifier::Blank => false,
            _ => true,
        }
    }
}

/// The fixed 8x6 puzzle grid plus the moves applied to reach it.
///
/// `PartialEq` compares everything including the move history. State
/// equivalence for deduplication ignores the moves: use [`Board::same_state`]
/// or [`Board::fingerprint`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; COLS]; ROWS],
    has_bombs: bool,
    moves: MoveSequence,
}

const FNV_OFFSET: u64 = 14695981039346656037;
const FNV_PRIME: u64 = 1099511628211;

impl Board {
    /// Creates a board from a fully specified grid with an empty move history.
    pub fn from_cells(cells: [[Cell; COLS]; ROWS]) -> Self {
        let has_bombs = cells
            .iter()
            .flatten()
            .any(|cell| cell.modifier == Modifier::Bomb);
        Board {
            cells,
            has_bombs,
            moves: MoveSequence::new(),
        }
    }

    /// Returns the cell at `(r, c)`.
    ///
    /// # Panics
    /// Panics if `r >= ROWS` or `c >= COLS`.
    pub fn cell(&self, r: usize, c: usize) -> &Cell {
        &self.cells[r][c]
    }

    /// Iterates over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flatten()
    }

    /// Whether the board was built with at least one bomb.
    pub fn has_bombs(&self) -> bool {
        self.has_bombs
    }

    /// The clicks applied since construction.
    pub fn moves(&self) -> &MoveSequence {
        &self.moves
    }

    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    /// `true` when every cell is correct (see [`Cell::is_correct`]).
    ///
    /// Further clicks may un-solve a solved board.
    pub fn is_solved(&self) -> bool {
        self.cells.iter().flatten().all(Cell::is_correct)
    }

    /// Positions the solvers may click, in row-major order.
    pub fn clickable_positions(&self) -> Vec<Position> {
        let mut positions = Vec::new();
        for r in 0..ROWS {
            for c in 0..COLS {
                let position = Position::new(r, c);
                let cell = &self.cells[r][c];
                if cell.is_clickable() && cell.allows_click_at(position) {
                    positions.push(position);
                }
            }
        }
        positions
    }

    /// Compares cell contents only, ignoring move history.
    pub fn same_state(&self, other: &Board) -> bool {
        self.cells == other.cells
    }

    /// 64-bit FNV-1a over every cell's (color, modifier) pair in row-major order.
    ///
    /// Move history is not part of the fingerprint. Distinct states may
    /// collide; the solvers accept that risk and treat a collision as
    /// "already visited".
    pub fn fingerprint(&self) -> u64 {
        let mut h = FNV_OFFSET;
        for cell in self.cells.iter().flatten() {
            let color = cell.color.map_or('0', |c| c.to_char());
            for byte in [color as u8, cell.modifier.to_char() as u8] {
                h ^= byte as u64;
                h = h.wrapping_mul(FNV_PRIME);
            }
        }
        h
    }

    /// Clicks the cell at `(row, col)`, mutating this board in place.
    ///
    /// The click is appended to the move sequence. Returns whether any paint
    /// value changed; bombs and rotating arrows always report `true`.
    ///
    /// Clicking a cell that is out of range or not clickable is a caller
    /// error: it is logged, nothing is recorded, and `false` is returned.
    pub fn click(&mut self, row: usize, col: usize) -> bool {
        if row >= ROWS || col >= COLS || !self.cells[row][col].is_clickable() {
            log::warn!("ignoring click on non-clickable cell ({}, {})", row, col);
            return false;
        }
        self.moves.push(Position::new(row, col));

        let cell = self.cells[row][col];
        match cell.modifier {
            Modifier::StaticArrow(dir) => self.propagate_line(row, col, dir, cell.color),
            Modifier::RotatingArrow(dir) => {
                self.propagate_line(row, col, dir, cell.color);
                self.cells[row][col].modifier = Modifier::RotatingArrow(dir.clockwise());
                true
            }
            Modifier::Flood => self.flood(row, col, cell.color),
            Modifier::Bomb => {
                self.bomb(row, col, cell.color);
                true
            }
            Modifier::Blank | Modifier::Paint(_) | Modifier::Wall => false,
        }
    }

    /// One step from `(r, c)` in `dir`, or `None` at the grid edge.
    fn step(r: usize, c: usize, dir: Direction) -> Option<(usize, usize)> {
        let (dr, dc) = dir.delta();
        let nr = r.checked_add_signed(dr)?;
        let nc = c.checked_add_signed(dc)?;
        (nr < ROWS && nc < COLS).then_some((nr, nc))
    }

    fn neighbors(r: usize, c: usize) -> impl Iterator<Item = (usize, usize)> {
        [Direction::Down, Direction::Up, Direction::Right, Direction::Left]
            .into_iter()
            .filter_map(move |dir| Board::step(r, c, dir))
    }

    /// Arrow propagation.
    ///
    /// The first neighbor decides the mode: already `color` means erase,
    /// `Blank` means paint, anything else is a no-op. The run then converts
    /// every consecutive matching cell up to the first mismatch or the edge.
    /// A colorless arrow never changes anything.
    fn propagate_line(
        &mut self,
        row: usize,
        col: usize,
        dir: Direction,
        color: Option<Color>,
    ) -> bool {
        let target = Modifier::painted(color);
        if target == Modifier::Blank {
            return false;
        }
        let Some((mut r, mut c)) = Board::step(row, col, dir) else {
            return false;
        };

        let first = self.cells[r][c].modifier;
        let (from, to) = if first == target {
            (target, Modifier::Blank)
        } else if first == Modifier::Blank {
            (Modifier::Blank, target)
        } else {
            return false;
        };

        let mut changed = false;
        while self.cells[r][c].modifier == from {
            self.cells[r][c].modifier = to;
            changed = true;
            match Board::step(r, c, dir) {
                Some(next) => (r, c) = next,
                None => break,
            }
        }
        changed
    }

    /// Flood from each neighbor: fill `Blank` regions with `color`, or, when
    /// there is nothing to fill, erase the regions already painted `color`.
    fn flood(&mut self, row: usize, col: usize, color: Option<Color>) -> bool {
        let target = Modifier::painted(color);
        let mut changed = false;
        for (r, c) in Board::neighbors(row, col) {
            changed |= self.flood_region(r, c, Modifier::Blank, target);
        }
        if !changed {
            for (r, c) in Board::neighbors(row, col) {
                changed |= self.flood_region(r, c, target, Modifier::Blank);
            }
        }
        changed
    }

    /// Rewrites the 4-connected region of `from` cells containing `(r, c)` to `to`.
    fn flood_region(&mut self, r: usize, c: usize, from: Modifier, to: Modifier) -> bool {
        if from == to || self.cells[r][c].modifier != from {
            return false;
        }

        let mut visited = [[false; COLS]; ROWS];
        let mut stack = vec![(r, c)];
        visited[r][c] = true;

        while let Some((cr, cc)) = stack.pop() {
            self.cells[cr][cc].modifier = to;
            for (nr, nc) in Board::neighbors(cr, cc) {
                if !visited[nr][nc] && self.cells[nr][nc].modifier == from {
                    visited[nr][nc] = true;
                    stack.push((nr, nc));
                }
            }
        }
        true
    }

    /// Paints the 3x3 block centered on the bomb, clipped to the grid. Walls are skipped.
    fn bomb(&mut self, row: usize, col: usize, color: Option<Color>) {
        let paint = Modifier::painted(color);
        for r in row.saturating_sub(1)..=(row + 1).min(ROWS - 1) {
            for c in col.saturating_sub(1)..=(col + 1).min(COLS - 1) {
                if self.cells[r][c].modifier != Modifier::Wall {
                    self.cells[r][c].modifier = paint;
                }
            }
        }
    }

    /// Renders the board with ANSI backgrounds for each cell's required color.
    ///
    /// Columns are labelled `A..F`, rows `1..8`. Each cell shows its modifier
    /// character; the cell at `pos`, if any, is marked with `*`.
    pub fn to_string_with_highlight(&self, pos: Option<Position>) -> String {
        let mut output = String::new();

        output.push_str("  ");
        for c_idx in 0..COLS {
            output.push_str(&format!("{:<2}", (b'A' + c_idx as u8) as char));
        }
        output.push('\n');

        for r_idx in 0..ROWS {
            output.push_str(&format!("{:<2}", r_idx + 1));
            for c_idx in 0..COLS {
                let cell = &self.cells[r_idx][c_idx];
                let is_highlight = pos == Some(Position::new(r_idx, c_idx));
                let color_code = cell.color.map_or("40", |c| c.to_ansi_color_code());
                let marker = if is_highlight { '*' } else { ' ' };
                output.push_str(&format!(
                    "\x1b[1;{}m{}{}\x1b[m",
                    color_code,
                    cell.modifier.to_char(),
                    marker
                ));
            }
            if r_idx < ROWS - 1 {
                output.push('\n');
            }
        }

        output
    }
}

impl fmt::Display for Board {
    /// Formats the board using `to_string_with_highlight(None)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_with_highlight(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{board_from_strings, replay_solution};
    use rand::rngs::SmallRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    const ALL_WALLS: &str = "XXXXXX";
    const NO_COLOR: &str = "000000";

    /// Builds a board from up to 8 (color, modifier) row pairs; missing rows are colorless walls.
    fn board_from_rows(rows: &[(&str, &str)]) -> Board {
        let mut colors = Vec::new();
        let mut modifiers = Vec::new();
        for r in 0..ROWS {
            let (color, modifier) = rows.get(r).copied().unwrap_or((NO_COLOR, ALL_WALLS));
            colors.push(color);
            modifiers.push(modifier);
        }
        board_from_strings(&colors.join(" "), &modifiers.join(" "))
    }

    fn modifiers_of_row(board: &Board, r: usize) -> String {
        (0..COLS).map(|c| board.cell(r, c).modifier().to_char()).collect()
    }

    #[test]
    fn test_color_and_modifier_chars_round_trip() {
        for c in "rgbod".chars() {
            assert_eq!(Color::from_char(c).unwrap().to_char(), c);
        }
        for c in "0rgbodURDLwxsaFBX".chars() {
            assert_eq!(Modifier::from_char(c).to_char(), c);
        }
        assert_eq!(Modifier::from_char('?'), Modifier::Wall);
    }

    #[test]
    fn test_position_tokens() {
        assert_eq!(Position::new(0, 0).to_string(), "A1");
        assert_eq!(Position::new(7, 5).to_string(), "F8");
        assert_eq!("c2".parse::<Position>().unwrap(), Position::new(1, 2));
        assert!(matches!(
            "G1".parse::<Position>(),
            Err(SolverError::MoveOutOfRange { .. })
        ));
        assert!(matches!(
            "A9".parse::<Position>(),
            Err(SolverError::MoveOutOfRange { .. })
        ));
        assert!(matches!(
            "A0".parse::<Position>(),
            Err(SolverError::MoveOutOfRange { .. })
        ));
        assert!(matches!(
            "1A".parse::<Position>(),
            Err(SolverError::MalformedMove { .. })
        ));
        assert!(matches!(
            "B".parse::<Position>(),
            Err(SolverError::MalformedMove { .. })
        ));
        for token in ["A+3", "A-3", "A 3", "A3x"] {
            assert!(
                matches!(token.parse::<Position>(), Err(SolverError::MalformedMove { .. })),
                "{} should be malformed",
                token
            );
        }
    }

    #[test]
    fn test_move_sequence_display_and_parse() {
        let mut sequence = MoveSequence::new();
        sequence.push(Position::new(0, 0));
        sequence.push(Position::new(3, 2));
        sequence.push(Position::new(3, 2));
        assert_eq!(sequence.to_string(), "A1,C4,C4");

        let parsed: MoveSequence = "A1, C4,,C4".parse().unwrap();
        assert_eq!(parsed, sequence);
        assert!(MoveSequence::new().to_string().is_empty());
    }

    #[test]
    fn test_cell_correctness_rules() {
        let red = Some(Color::Red);
        assert!(Cell::new(None, Modifier::Blank).is_correct());
        assert!(Cell::new(None, Modifier::Paint(Color::Blue)).is_correct());
        assert!(Cell::new(red, Modifier::Paint(Color::Red)).is_correct());
        assert!(!Cell::new(red, Modifier::Paint(Color::Green)).is_correct());
        assert!(!Cell::new(red, Modifier::Blank).is_correct());
        assert!(Cell::new(red, Modifier::StaticArrow(Direction::Up)).is_correct());
        assert!(Cell::new(red, Modifier::Bomb).is_correct());
        assert!(Cell::new(red, Modifier::Wall).is_correct());
    }

    #[test]
    fn test_static_arrow_paints_run_then_erases_it() {
        // Arrow at A1 pointing right, five blank cells with a wall at E1.
        let mut board = board_from_rows(&[("gggg00", "R000X0")]);
        assert!(!board.is_solved());

        assert!(board.click(0, 0));
        assert_eq!(modifiers_of_row(&board, 0), "RgggX0");
        assert!(board.is_solved());

        assert!(board.click(0, 0));
        assert_eq!(modifiers_of_row(&board, 0), "R000X0");
        assert_eq!(board.moves().to_string(), "A1,A1");
    }

    #[test]
    fn test_static_arrow_stops_at_grid_edge() {
        let mut board = board_from_rows(&[("r00000", "R00000")]);
        assert!(board.click(0, 0));
        assert_eq!(modifiers_of_row(&board, 0), "Rrrrrr");
    }

    #[test]
    fn test_static_arrow_blocked_by_mismatched_paint() {
        let mut board = board_from_rows(&[("rr0000", "Rb0000")]);
        assert!(!board.click(0, 0));
        assert_eq!(modifiers_of_row(&board, 0), "Rb0000");
        // The click is still part of the sequence.
        assert_eq!(board.move_count(), 1);
    }

    #[test]
    fn test_static_arrow_pointing_off_grid_is_noop() {
        let mut board = board_from_rows(&[("r00000", "U00000")]);
        assert!(!board.click(0, 0));
        assert_eq!(modifiers_of_row(&board, 0), "U00000");
    }

    #[test]
    fn test_rotating_arrow_cycles_clockwise() {
        let mut board = board_from_rows(&[
            (NO_COLOR, ALL_WALLS),
            (NO_COLOR, ALL_WALLS),
            (NO_COLOR, ALL_WALLS),
            ("00b000", "XXwXXX"),
        ]);
        let mut seen = Vec::new();
        for _ in 0..4 {
            let Modifier::RotatingArrow(dir) = board.cell(3, 2).modifier() else {
                panic!("rotating arrow lost its tag");
            };
            seen.push(dir);
            // Every neighbor is a wall, yet the click still reports a change.
            assert!(board.click(3, 2));
        }
        assert_eq!(seen, Direction::CLOCKWISE.to_vec());
        assert_eq!(
            board.cell(3, 2).modifier(),
            Modifier::RotatingArrow(Direction::Up)
        );
        assert_eq!(board.move_count(), 4);
    }

    #[test]
    fn test_rotating_arrow_paints_in_current_direction_before_turning() {
        let mut board = board_from_rows(&[(NO_COLOR, ALL_WALLS), ("0bbb00", "Xx00XX")]);
        assert!(board.click(1, 1));
        assert_eq!(modifiers_of_row(&board, 1), "XsbbXX");
    }

    #[test]
    fn test_flood_fills_connected_blank_region() {
        let mut board = board_from_rows(&[
            ("rrr000", "0F0XXX"),
            ("rr0000", "00XXXX"),
            ("000000", "XXX0XX"),
        ]);
        assert!(board.click(0, 1));
        assert_eq!(modifiers_of_row(&board, 0), "rFrXXX");
        assert_eq!(modifiers_of_row(&board, 1), "rrXXXX");
        // (2, 3) is blank but not connected to the flood's neighbors.
        assert_eq!(board.cell(2, 3).modifier(), Modifier::Blank);
        assert!(board.is_solved());
    }

    #[test]
    fn test_flood_erases_when_nothing_to_fill() {
        let mut board = board_from_rows(&[("rrr000", "rFrgXX"), ("rrr000", "rrXXXX")]);
        assert!(board.click(0, 1));
        assert_eq!(modifiers_of_row(&board, 0), "0F0gXX");
        assert_eq!(modifiers_of_row(&board, 1), "00XXXX");
    }

    #[test]
    fn test_flood_with_nothing_to_do_reports_no_change() {
        let mut board = board_from_rows(&[("0r0000", "gFgXXX"), (NO_COLOR, "XgXXXX")]);
        assert!(!board.click(0, 1));
        assert_eq!(modifiers_of_row(&board, 0), "gFgXXX");
    }

    #[test]
    fn test_colorless_arrow_and_flood_report_no_change() {
        let mut board = board_from_rows(&[("000000", "R00F00"), (NO_COLOR, "XXX0XX")]);
        assert!(!board.click(0, 0));
        assert!(!board.click(0, 3));
        assert_eq!(modifiers_of_row(&board, 0), "R00F00");
        assert_eq!(board.cell(1, 3).modifier(), Modifier::Blank);

        let initial = board_from_rows(&[("000000", "R00F00")]);
        for token in ["A1", "D1"] {
            assert!(matches!(
                replay_solution(&initial, token),
                Err(SolverError::InvalidMove { .. })
            ));
        }
    }

    #[test]
    fn test_bomb_paints_block_except_walls() {
        let mut board = board_from_rows(&[
            (NO_COLOR, "000000"),
            (NO_COLOR, "000000"),
            (NO_COLOR, "0X0000"),
            ("00o000", "00B000"),
            (NO_COLOR, "0R0000"),
            (NO_COLOR, "000000"),
        ]);
        assert!(board.has_bombs());
        assert!(board.click(3, 2));
        assert_eq!(modifiers_of_row(&board, 1), "000000");
        assert_eq!(modifiers_of_row(&board, 2), "0Xoo00");
        // The bomb paints its own cell and the arrow below it.
        assert_eq!(modifiers_of_row(&board, 3), "0ooo00");
        assert_eq!(modifiers_of_row(&board, 4), "0ooo00");
        assert_eq!(modifiers_of_row(&board, 5), "000000");
        assert!(!board.cell(3, 2).is_clickable());
    }

    #[test]
    fn test_bomb_in_corner_is_clipped() {
        let mut board = board_from_rows(&[("d00000", "B00000"), (NO_COLOR, "000000")]);
        assert!(board.click(0, 0));
        assert_eq!(modifiers_of_row(&board, 0), "dd0000");
        assert_eq!(modifiers_of_row(&board, 1), "dd0000");
    }

    #[test]
    fn test_click_on_non_clickable_cell_is_rejected() {
        let mut board = board_from_rows(&[("r00000", "0R0000")]);
        assert!(!board.click(0, 0));
        assert!(!board.click(ROWS, 0));
        assert_eq!(board.move_count(), 0);
    }

    #[test]
    fn test_fingerprint_ignores_move_history() {
        let initial = board_from_rows(&[(NO_COLOR, ALL_WALLS), ("0b0000", "XwXXXX")]);
        let mut cycled = initial.clone();
        for _ in 0..4 {
            cycled.click(1, 1);
        }
        // Walled in on all sides: four turns bring the arrow back unchanged.
        assert!(cycled.same_state(&initial));
        assert_eq!(cycled.fingerprint(), initial.fingerprint());
        assert_ne!(cycled, initial);

        let mut turned = initial.clone();
        turned.click(1, 1);
        assert_ne!(turned.fingerprint(), initial.fingerprint());
    }

    #[test]
    fn test_clickable_positions_row_major() {
        let board = board_from_rows(&[("000000", "R0X0F0"), ("000000", "0B0w00")]);
        assert_eq!(
            board.clickable_positions(),
            vec![
                Position::new(0, 0),
                Position::new(0, 4),
                Position::new(1, 1),
                Position::new(1, 3),
            ]
        );
    }

    #[test]
    fn test_clone_is_independent_under_random_clicks() {
        let original = board_from_rows(&[
            ("rrggbb", "R0F0a0"),
            ("rrggbb", "00B00L"),
            ("oodd00", "w0D00X"),
            ("oodd00", "00x0F0"),
        ]);
        let snapshot = original.clone();
        let mut rng = SmallRng::seed_from_u64(514514);

        let mut copy = original.clone();
        for _ in 0..200 {
            let clickable = copy.clickable_positions();
            let Some(&pos) = clickable.choose(&mut rng) else {
                break;
            };
            copy.click(pos.row, pos.col);
        }
        assert!(copy.move_count() > 0);
        assert_eq!(original, snapshot);
        assert!(original.moves().is_empty());
    }

    #[test]
    fn test_display_board_formatting() {
        let board = board_from_rows(&[("r00000", "R00000")]);
        let display_str = format!("{}", board);
        assert!(display_str.starts_with("  A B C D E F "));
        assert_eq!(display_str.lines().count(), ROWS + 1);
        assert!(display_str.contains("\x1b[1;41mR \x1b[m"));

        let highlighted = board.to_string_with_highlight(Some(Position::new(0, 0)));
        assert!(highlighted.contains("\x1b[1;41mR*\x1b[m"));
    }
}
