#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The backtracking search engine.
//!
//! Depth-first search over partial assignments, used when arc consistency
//! alone cannot finish a puzzle. Each node picks an unassigned cell through
//! the configured [`VariableSelection`] heuristic, tries its candidates in
//! ascending order, validates each assignment against the consistency
//! predicate and runs forward checking before recursing. The first complete
//! assignment found is the answer.
//!
//! Branch isolation is by trail mark: a node takes a mark before touching
//! the CSP and unwinds to it when a candidate fails, which also reverts
//! every assignment forward checking inferred under that candidate.

use crate::csp::domain::Value;
use crate::csp::forward_checking::forward_check;
use crate::csp::solver::SolveStats;
use crate::csp::state::Csp;
use crate::csp::variable_selection::{Mrv, VariableSelection};
use smallvec::SmallVec;

/// Recursive backtracking over one [`Csp`], accumulating search counters.
#[derive(Debug, Clone, Default)]
pub struct Backtracking<S: VariableSelection = Mrv> {
    selector: S,
    stats: SolveStats,
}

impl<S: VariableSelection> Backtracking<S> {
    #[must_use]
    pub fn new(selector: S) -> Self {
        Self {
            selector,
            stats: SolveStats::default(),
        }
    }

    /// Counters accumulated so far: decisions, inferences, backtracks.
    #[must_use]
    pub const fn stats(&self) -> SolveStats {
        self.stats
    }

    /// Searches for a completion of `csp`'s current assignment.
    ///
    /// On success the board inside `csp` is fully assigned and `true` is
    /// returned; on failure `csp` is left exactly as it was handed in.
    pub fn solve(&mut self, csp: &mut Csp) -> bool {
        let Some(cell) = self.selector.pick(csp) else {
            return true;
        };

        let candidates: SmallVec<[Value; 9]> = csp.domain(cell).iter().collect();
        for value in candidates {
            self.stats.decisions += 1;
            let mark = csp.mark();
            csp.assign(cell, value);

            if csp.is_consistent() {
                if let Some(inferred) = forward_check(csp) {
                    self.stats.inferences += inferred;
                    log::trace!("try {cell} := {value}, {inferred} inferred");
                    if self.solve(csp) {
                        return true;
                    }
                }
            }

            csp.undo_to(mark);
            self.stats.backtracks += 1;
        }

        false
    }
}
