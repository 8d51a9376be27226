#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The mutable CSP state for one solving attempt.
//!
//! [`Csp`] owns the board, the candidate sets, the unassigned set, the
//! per-group used-value counts and the undo trail, and keeps them in sync
//! through its two mutators, [`Csp::assign`] and [`Csp::prune`]. Both are
//! recorded on the trail, so a branch unwinds with [`Csp::undo_to`].
//!
//! Consistency is tracked incrementally: each group counts how often each
//! value occurs among its assigned cells, and a running duplicate counter
//! makes the consistency predicate O(1). The pairwise full scan survives as
//! [`Csp::is_consistent_scan`] for tests and debug assertions.

use crate::csp::board::Board;
use crate::csp::cell::{Cell, CELL_COUNT};
use crate::csp::domain::{Candidates, Value};
use crate::csp::model::{ConstraintModel, GROUPS_PER_CELL, GROUP_COUNT};
use crate::csp::trail::{Change, Trail};

/// The cells still awaiting a value, with O(1) removal and membership.
#[derive(Debug, Clone)]
pub struct UnassignedSet {
    cells: Vec<Cell>,
    pos: [usize; CELL_COUNT],
}

// Iteration order is an implementation detail; equality is set membership.
impl PartialEq for UnassignedSet {
    fn eq(&self, other: &Self) -> bool {
        self.cells.len() == other.cells.len() && self.cells.iter().all(|&c| other.contains(c))
    }
}

impl Eq for UnassignedSet {}

const NOT_PRESENT: usize = usize::MAX;

impl UnassignedSet {
    fn new() -> Self {
        Self {
            cells: Vec::with_capacity(CELL_COUNT),
            pos: [NOT_PRESENT; CELL_COUNT],
        }
    }

    fn insert(&mut self, cell: Cell) {
        if self.pos[cell.index()] == NOT_PRESENT {
            self.pos[cell.index()] = self.cells.len();
            self.cells.push(cell);
        }
    }

    fn remove(&mut self, cell: Cell) {
        let at = self.pos[cell.index()];
        if at == NOT_PRESENT {
            return;
        }
        self.cells.swap_remove(at);
        if let Some(&moved) = self.cells.get(at) {
            self.pos[moved.index()] = at;
        }
        self.pos[cell.index()] = NOT_PRESENT;
    }

    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        self.pos[cell.index()] != NOT_PRESENT
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }
}

/// Per-group value occurrence counts plus a running duplicate counter.
#[derive(Debug, Clone, PartialEq, Eq)]
struct GroupUsage {
    counts: [[u8; 10]; GROUP_COUNT],
    duplicates: u32,
}

impl GroupUsage {
    const fn new() -> Self {
        Self {
            counts: [[0; 10]; GROUP_COUNT],
            duplicates: 0,
        }
    }

    fn place(&mut self, groups: [usize; GROUPS_PER_CELL], value: Value) {
        for group in groups {
            let count = &mut self.counts[group][value as usize];
            *count += 1;
            if *count == 2 {
                self.duplicates += 1;
            }
        }
    }

    fn displace(&mut self, groups: [usize; GROUPS_PER_CELL], value: Value) {
        for group in groups {
            let count = &mut self.counts[group][value as usize];
            if *count == 2 {
                self.duplicates -= 1;
            }
            *count -= 1;
        }
    }

    const fn uses(&self, group: usize, value: Value) -> bool {
        self.counts[group][value as usize] > 0
    }

    const fn consistent(&self) -> bool {
        self.duplicates == 0
    }
}

/// The full constraint-satisfaction state for one solving attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Csp {
    model: ConstraintModel,
    board: Board,
    domains: [Candidates; CELL_COUNT],
    unassigned: UnassignedSet,
    usage: GroupUsage,
    trail: Trail,
}

impl Csp {
    /// Builds the CSP for `board`: singleton domains for givens, full
    /// domains for blanks, usage counts seeded from the givens. A board
    /// whose givens already clash starts out inconsistent.
    #[must_use]
    pub fn new(board: Board) -> Self {
        let model = ConstraintModel::new();
        let mut domains = [Candidates::full(); CELL_COUNT];
        let mut unassigned = UnassignedSet::new();
        let mut usage = GroupUsage::new();

        for cell in Cell::all() {
            match board.get(cell) {
                Some(value) => {
                    domains[cell.index()] = Candidates::singleton(value);
                    usage.place(ConstraintModel::groups_of(cell), value);
                }
                None => unassigned.insert(cell),
            }
        }

        Self {
            model,
            board,
            domains,
            unassigned,
            usage,
            trail: Trail::new(),
        }
    }

    #[must_use]
    pub const fn model(&self) -> &ConstraintModel {
        &self.model
    }

    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub const fn domain(&self, cell: Cell) -> Candidates {
        self.domains[cell.index()]
    }

    #[must_use]
    pub const fn unassigned(&self) -> &UnassignedSet {
        &self.unassigned
    }

    /// True while no group holds a value twice among its assigned cells.
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        self.usage.consistent()
    }

    /// True once every cell holds a value.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unassigned.is_empty()
    }

    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.is_complete() && self.is_consistent()
    }

    /// Would assigning `value` to `cell` clash with a value already placed
    /// in one of its groups?
    #[must_use]
    pub fn conflicts(&self, cell: Cell, value: Value) -> bool {
        ConstraintModel::groups_of(cell)
            .iter()
            .any(|&group| self.usage.uses(group, value))
    }

    /// Places `value` into `cell`, keeping board, unassigned set and usage
    /// counts in sync and recording the change on the trail.
    pub fn assign(&mut self, cell: Cell, value: Value) {
        debug_assert!(self.board.get(cell).is_none(), "cell {cell} already assigned");
        self.board.set(cell, Some(value));
        self.unassigned.remove(cell);
        self.usage.place(ConstraintModel::groups_of(cell), value);
        self.trail.record(Change::Assigned(cell));
    }

    /// Removes `value` from `cell`'s candidates, recording the change on
    /// the trail. Returns whether the value was present.
    pub fn prune(&mut self, cell: Cell, value: Value) -> bool {
        if self.domains[cell.index()].remove(value) {
            self.trail.record(Change::Pruned(cell, value));
            true
        } else {
            false
        }
    }

    /// Current trail position; pass back to [`Csp::undo_to`] to unwind.
    #[must_use]
    pub fn mark(&self) -> usize {
        self.trail.mark()
    }

    /// Reverses every change made since `mark`, newest first.
    pub fn undo_to(&mut self, mark: usize) {
        while self.trail.len() > mark {
            match self.trail.pop() {
                Some(Change::Assigned(cell)) => {
                    if let Some(value) = self.board.get(cell) {
                        self.board.set(cell, None);
                        self.usage.displace(ConstraintModel::groups_of(cell), value);
                        self.unassigned.insert(cell);
                    }
                }
                Some(Change::Pruned(cell, value)) => {
                    self.domains[cell.index()].insert(value);
                }
                None => break,
            }
        }
    }

    /// The pairwise reference consistency check: every group, every pair of
    /// assigned members, no equal values. Quadratic per group; kept for
    /// tests and debug assertions, the solver itself relies on the
    /// incremental counts.
    #[must_use]
    pub fn is_consistent_scan(&self) -> bool {
        for group in self.model.groups() {
            for (i, &a) in group.iter().enumerate() {
                let Some(va) = self.board.get(a) else {
                    continue;
                };
                for &b in &group[i + 1..] {
                    if self.board.get(b) == Some(va) {
                        return false;
                    }
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Csp {
        Csp::new(s.parse().expect("board should parse"))
    }

    #[test]
    fn test_initial_domains() {
        let mut given = "0".repeat(81);
        given.replace_range(0..1, "7");
        let csp = parse(&given);

        assert_eq!(csp.domain(Cell::new(0)), Candidates::singleton(7));
        assert_eq!(csp.domain(Cell::new(1)), Candidates::full());
        assert_eq!(csp.unassigned().len(), 80);
        assert!(!csp.unassigned().contains(Cell::new(0)));
        assert!(csp.is_consistent());
    }

    #[test]
    fn test_contradictory_givens_start_inconsistent() {
        let mut given = "0".repeat(81);
        given.replace_range(0..2, "55");
        let csp = parse(&given);

        assert!(!csp.is_consistent());
        assert!(!csp.is_consistent_scan());
    }

    #[test]
    fn test_assign_updates_all_views() {
        let mut csp = parse(&"0".repeat(81));
        let cell = Cell::at(3, 4);

        csp.assign(cell, 6);
        assert_eq!(csp.board().get(cell), Some(6));
        assert!(!csp.unassigned().contains(cell));
        assert!(csp.conflicts(Cell::at(3, 0), 6));
        assert!(csp.conflicts(Cell::at(8, 4), 6));
        assert!(csp.conflicts(Cell::at(4, 3), 6));
        assert!(!csp.conflicts(Cell::at(8, 8), 6));
        assert!(csp.is_consistent());
    }

    #[test]
    fn test_incremental_matches_scan_on_clash() {
        let mut csp = parse(&"0".repeat(81));
        csp.assign(Cell::at(0, 0), 5);
        csp.assign(Cell::at(0, 7), 5);
        assert!(!csp.is_consistent());
        assert!(!csp.is_consistent_scan());
    }

    #[test]
    fn test_undo_restores_everything() {
        let mut csp = parse(&"0".repeat(81));
        let baseline = csp.clone();

        let mark = csp.mark();
        csp.assign(Cell::at(2, 2), 4);
        csp.prune(Cell::at(2, 3), 4);
        csp.prune(Cell::at(2, 4), 4);
        csp.assign(Cell::at(5, 5), 4);
        assert_ne!(csp, baseline);

        csp.undo_to(mark);
        assert_eq!(csp, baseline);
    }

    #[test]
    fn test_nested_marks_unwind_independently() {
        let mut csp = parse(&"0".repeat(81));

        let outer = csp.mark();
        csp.assign(Cell::at(0, 0), 1);
        let after_outer = csp.clone();

        let inner = csp.mark();
        csp.assign(Cell::at(1, 1), 2);
        csp.prune(Cell::at(0, 1), 1);

        csp.undo_to(inner);
        assert_eq!(csp, after_outer);

        csp.undo_to(outer);
        assert!(csp.board().get(Cell::at(0, 0)).is_none());
        assert_eq!(csp.unassigned().len(), 81);
    }

    #[test]
    fn test_prune_is_idempotent() {
        let mut csp = parse(&"0".repeat(81));
        let cell = Cell::new(17);

        assert!(csp.prune(cell, 9));
        assert!(!csp.prune(cell, 9));
        assert_eq!(csp.domain(cell).len(), 8);
        assert_eq!(csp.mark(), 1);
    }
}
