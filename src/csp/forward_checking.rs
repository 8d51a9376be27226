#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Forward-checking inference.
//!
//! Invoked by the search engine right after each assignment. Every still
//! unassigned cell has its candidates filtered against the values already
//! placed in its groups; a cell left with exactly one candidate is committed
//! on the spot, so cells later in the same pass see it. A cell left with no
//! candidates kills the branch.
//!
//! All removals and commits go through the CSP's trail, so the caller's
//! mark/undo bracket reverts the whole pass on backtrack.

use crate::csp::state::Csp;
use itertools::Itertools;

/// Prunes the domains of all unassigned cells against the current board.
///
/// Returns the number of cells committed by inference, or `None` if some
/// domain was wiped out (the branch is dead).
pub fn forward_check(csp: &mut Csp) -> Option<usize> {
    let pending = csp.unassigned().iter().collect_vec();
    let mut inferred = 0;

    for cell in pending {
        for value in csp.domain(cell).iter() {
            if csp.conflicts(cell, value) {
                csp.prune(cell, value);
            }
        }

        let remaining = csp.domain(cell);
        if remaining.is_empty() {
            log::trace!("forward checking emptied {cell}");
            return None;
        }
        if let Some(value) = remaining.as_singleton() {
            csp.assign(cell, value);
            inferred += 1;
        }
    }

    Some(inferred)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csp::cell::Cell;
    use crate::csp::domain::Value;

    fn empty_csp() -> Csp {
        Csp::new("0".repeat(81).parse().expect("board should parse"))
    }

    fn narrow_to(csp: &mut Csp, cell: Cell, keep: &[Value]) {
        for v in 1..=9 {
            if !keep.contains(&v) {
                csp.prune(cell, v);
            }
        }
    }

    #[test]
    fn test_prunes_conflicting_candidates() {
        let mut csp = empty_csp();
        let cell = Cell::at(0, 0);
        csp.assign(cell, 5);

        assert_eq!(forward_check(&mut csp), Some(0));
        for &peer in csp.model().peers(cell) {
            assert!(!csp.domain(peer).contains(5));
        }
        // Unrelated cells keep the value.
        assert!(csp.domain(Cell::at(8, 8)).contains(5));
    }

    #[test]
    fn test_commits_forced_cells() {
        let mut csp = empty_csp();
        let forced = Cell::at(0, 8);
        narrow_to(&mut csp, forced, &[5, 6]);

        csp.assign(Cell::at(0, 0), 5);
        let inferred = forward_check(&mut csp).expect("branch should survive");

        assert!(inferred >= 1);
        assert_eq!(csp.board().get(forced), Some(6));
        assert!(!csp.unassigned().contains(forced));
    }

    #[test]
    fn test_reports_wipeout() {
        let mut csp = empty_csp();
        let doomed = Cell::at(0, 8);
        narrow_to(&mut csp, doomed, &[5]);

        csp.assign(Cell::at(0, 0), 5);
        assert_eq!(forward_check(&mut csp), None);
    }

    #[test]
    fn test_undo_reverts_whole_pass() {
        let mut csp = empty_csp();
        let forced = Cell::at(0, 8);
        narrow_to(&mut csp, forced, &[5, 6]);
        let baseline = csp.clone();

        let mark = csp.mark();
        csp.assign(Cell::at(0, 0), 5);
        forward_check(&mut csp).expect("branch should survive");
        csp.undo_to(mark);

        assert_eq!(csp, baseline);
    }

    #[test]
    fn test_pruned_values_cannot_complete() {
        // Any value forward checking removes clashes with an assigned
        // group member, so no completion from this state could use it.
        let mut csp = empty_csp();
        let cell = Cell::at(4, 4);
        csp.assign(cell, 9);
        forward_check(&mut csp).expect("branch should survive");

        for &peer in csp.model().peers(cell) {
            for value in csp.domain(peer).iter() {
                assert!(!csp.conflicts(peer, value));
            }
        }
    }
}
