#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Solver orchestration.
//!
//! [`CspSolver`] runs the two stages in order. Arc consistency goes first,
//! on a private clone of the CSP; its result is accepted only if every cell
//! ended up assigned and the assignment is consistent. Anything short of
//! that falls back to backtracking search over the original, unreduced CSP,
//! with forward checking as the per-node inference step. The returned
//! [`Solution`] carries the stage that produced it, which the CLI writes
//! out as the `AC3`/`BTS` tag.

use crate::csp::ac3;
use crate::csp::board::Board;
use crate::csp::search::Backtracking;
use crate::csp::state::Csp;
use crate::csp::variable_selection::{Mrv, VariableSelection};
use core::fmt::{self, Display};

/// Which stage produced a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Arc consistency alone finished the puzzle.
    Ac3,
    /// Backtracking search was required.
    Bts,
}

impl Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ac3 => write!(f, "AC3"),
            Self::Bts => write!(f, "BTS"),
        }
    }
}

/// A solved board together with the stage that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Solution {
    /// The fully assigned board.
    pub board: Board,
    /// The stage that produced it.
    pub stage: Stage,
}

/// Counters collected across both stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolveStats {
    /// AC-3 revise calls that changed a domain.
    pub revisions: usize,
    /// Candidate values tried by search.
    pub decisions: usize,
    /// Assignments committed by forward-checking inference.
    pub inferences: usize,
    /// Search nodes undone.
    pub backtracks: usize,
}

impl SolveStats {
    fn absorb(&mut self, other: Self) {
        self.revisions += other.revisions;
        self.decisions += other.decisions;
        self.inferences += other.inferences;
        self.backtracks += other.backtracks;
    }
}

/// Common interface of the puzzle solvers.
pub trait Solver {
    fn new(board: Board) -> Self;
    fn solve(&mut self) -> Option<Solution>;
    fn stats(&self) -> SolveStats;
}

/// The two-stage constraint solver.
#[derive(Debug, Clone)]
pub struct CspSolver<S: VariableSelection = Mrv> {
    csp: Csp,
    selector: S,
    stats: SolveStats,
}

impl<S: VariableSelection + Clone + Default> Solver for CspSolver<S> {
    fn new(board: Board) -> Self {
        Self {
            csp: Csp::new(board),
            selector: S::default(),
            stats: SolveStats::default(),
        }
    }

    /// Attempts to solve the puzzle, arc consistency first, search second.
    ///
    /// Returns `None` when the givens are contradictory or the search space
    /// is exhausted without a complete consistent assignment.
    fn solve(&mut self) -> Option<Solution> {
        if !self.csp.is_consistent() {
            log::debug!("givens are contradictory, refusing to search");
            return None;
        }

        let mut reduced = self.csp.clone();
        if ac3::propagate(&mut reduced, &mut self.stats) {
            ac3::materialize(&mut reduced);
            if reduced.is_solved() {
                log::debug!("arc consistency solved the puzzle");
                return Some(Solution {
                    board: *reduced.board(),
                    stage: Stage::Ac3,
                });
            }
            log::debug!(
                "arc consistency left {} cells open, falling back to search",
                reduced.unassigned().len()
            );
        } else {
            log::debug!("arc consistency wiped out a domain, falling back to search");
        }

        let mut search = Backtracking::new(self.selector.clone());
        let solved = search.solve(&mut self.csp);
        self.stats.absorb(search.stats());

        if solved {
            Some(Solution {
                board: *self.csp.board(),
                stage: Stage::Bts,
            })
        } else {
            log::debug!("search space exhausted, puzzle has no solution");
            None
        }
    }

    fn stats(&self) -> SolveStats {
        self.stats
    }
}
