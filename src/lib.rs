//! A general exact-cover puzzle engine: Sudoku and its topological kin,
//! solved the way a person would — forced cells, then hidden singles, then
//! box claims, then naked and hidden tuples — falling back to backtracking
//! search only once those run dry.
//!
//! Sudoku is the familiar case, but nothing here is specific to 9x9 grids:
//! a puzzle is just an alphabet of symbols and a *topology* — cells, each
//! belonging to some named sets, each set requiring distinct non-empty
//! symbols. Rows, columns, and boxes are one choice of topology;
//! Sudoku-X's diagonals, rectangular "brick" regions, Latin squares, and
//! irregular jigsaw regions are others, expressed in exactly the same
//! grammar.
//!
//! ## Solving a Sudoku
//!
//! ```
//! use sudoku_general::{GeneralSolver, SolveStatus};
//!
//! let mut solver = GeneralSolver::new();
//! solver.preset_sudoku(3).unwrap();
//! solver.problem(
//!     "...4..7894.6...1...8.....5.2.4..5....95.........9.2345.3..7.9.8.67..1...9....8..2"
//! ).unwrap();
//! assert_eq!(solver.solution().unwrap(), SolveStatus::Success);
//! assert_eq!(solver.trace().constraints_used(), "F.");
//! ```
//!
//! ## Layout
//!
//! - [`alphabet`] — the symbol set a puzzle is drawn from.
//! - [`topology`] — the static cell/set membership graph.
//! - [`allowed`] — named per-cell symbol restrictions.
//! - [`board`] — the live, reversible per-cell/per-set state.
//! - [`engine`] — the F/N/B/T deductive fixpoint.
//! - [`backtrack`] — the fallback guess-and-check search.
//! - [`stack`] — the shared undo log those two modules push records onto.
//! - [`trace`] — read-only views over that log.
//! - [`presets`] — generators for the common puzzle shapes.
//! - [`solver`] — [`GeneralSolver`], the object callers actually drive.

#![allow(clippy::needless_range_loop)]

pub mod allowed;
pub mod alphabet;
pub mod backtrack;
pub mod board;
pub mod engine;
pub mod error;
pub mod presets;
pub mod solver;
pub mod stack;
pub mod topology;
pub mod trace;

pub use allowed::AllowedSymbolSets;
pub use alphabet::Alphabet;
pub use board::BoardState;
pub use error::{Result, SolverError};
pub use solver::{GeneralSolver, SolveStatus, Verbosity};
pub use topology::Topology;
pub use trace::StepTrace;
