//! # Paintflow Solver Library
//!
//! This library models a tile-based color-propagation puzzle and searches for
//! the shortest click sequence that brings every cell into its correct state.
//!
//! It is used by two binaries:
//! - `level_solver`: Reads a level file, validates stored solutions and races
//!   the search strategies on each selected level.
//! - `strategy_evaluator`: Runs every strategy on its own and compares move
//!   counts and timings.
//!
//! ## Modules
//! - `engine`: Cells, modifiers, the 8x6 `Board`, click semantics, the solved
//!   predicate and state fingerprints.
//! - `heuristics`: The incorrect-cell count used by the best-first search.
//! - `solver`: Depth-first, breadth-first and best-first searches behind the `Strategy` trait.
//! - `race`: Runs strategies concurrently with a grace period after the first solution.
//! - `utils`: Board construction from level strings and solution replay.
//! - `levels`: Level file reader.
//! - `errors`: The crate's error type.
//! - `logging`: Logger setup for the binaries.

pub mod engine;
pub mod errors;
pub mod heuristics;
pub mod levels;
pub mod logging;
pub mod race;
pub mod solver;
pub mod utils;
