#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The arc-consistency engine (AC-3).
//!
//! AC-3 works a queue of binary inequality arcs to a fixpoint: for each arc
//! `(Xi, Xj)` it removes from `Xi`'s candidates every value with no support
//! in `Xj`'s, and whenever a domain shrinks it re-queues the arcs pointing
//! at `Xi`. An emptied domain fails the whole puzzle immediately.
//!
//! Propagation and assignment are separate phases here: [`propagate`] only
//! prunes candidate sets, and [`materialize`] afterwards commits every
//! still-unassigned cell whose domain collapsed to a single value. The
//! caller decides whether the propagated state is a solution (complete and
//! consistent) or merely a reduced starting point for search.
//!
//! Arc consistency alone solves the easier class of puzzles; it never
//! invents a value, so on harder boards it converges with multi-value
//! domains left over and the backtracking engine takes it from there.

use crate::csp::cell::Cell;
use crate::csp::solver::SolveStats;
use crate::csp::state::Csp;
use itertools::Itertools;
use std::collections::VecDeque;

/// Runs the worklist to a fixpoint. Returns `false` on a domain wipeout,
/// `true` once every arc is consistent.
pub fn propagate(csp: &mut Csp, stats: &mut SolveStats) -> bool {
    let mut queue: VecDeque<(Cell, Cell)> = csp.model().arcs().iter().copied().collect();

    while let Some((xi, xj)) = queue.pop_front() {
        if revise(csp, xi, xj) {
            stats.revisions += 1;

            if csp.domain(xi).is_empty() {
                log::debug!("domain of {xi} wiped out while revising against {xj}");
                return false;
            }

            for &xk in csp.model().peers(xi) {
                if xk != xj {
                    queue.push_back((xk, xi));
                }
            }
        }
    }

    true
}

/// Removes from `Domain[xi]` every value without support in `Domain[xj]`.
/// For an inequality arc a value loses support exactly when the other
/// domain is the matching singleton. Returns whether anything was removed.
fn revise(csp: &mut Csp, xi: Cell, xj: Cell) -> bool {
    let other = csp.domain(xj);
    let mut revised = false;

    for value in csp.domain(xi).iter() {
        let supported = other.iter().any(|w| w != value);
        if !supported {
            csp.prune(xi, value);
            revised = true;
        }
    }

    revised
}

/// Commits every unassigned cell whose candidate set is down to one value.
/// Run after [`propagate`] so that assignment stays out of the fixpoint
/// loop.
pub fn materialize(csp: &mut Csp) {
    let singletons = csp.unassigned().iter().collect_vec();
    for cell in singletons {
        if let Some(value) = csp.domain(cell).as_singleton() {
            csp.assign(cell, value);
        }
    }
}
