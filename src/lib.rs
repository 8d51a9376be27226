//! This crate solves 9x9 Sudoku puzzles by modelling them as a constraint
//! satisfaction problem: 81 variables with all-different constraints over
//! rows, columns and boxes, solved by arc-consistency propagation (AC-3)
//! with a fallback to backtracking search using minimum-remaining-values
//! ordering and forward-checking inference.

/// The `csp` module holds the constraint model, the propagation and search
/// engines, and the solver orchestration.
pub mod csp;
