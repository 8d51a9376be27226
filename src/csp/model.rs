#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The static constraint structure of the puzzle.
//!
//! A [`ConstraintModel`] is built once per board and shared read-only by
//! propagation and search. It holds the 27 all-different groups (9 rows,
//! 9 columns, 9 boxes), each cell's membership in exactly three of them,
//! each cell's 20 distinct peers, and the binary inequality arcs derived
//! from the groups.
//!
//! The arc set is emitted per (cell, group, other member), so a pair of
//! cells sharing both a line and a box contributes two identical arcs.
//! That duplication is deliberate and harmless: revising an arc twice is
//! idempotent, and the worklist algorithm tolerates it.

use crate::csp::cell::{Cell, CELL_COUNT, SIDE};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

/// Number of all-different groups: 9 rows, 9 columns, 9 boxes.
pub const GROUP_COUNT: usize = 27;

/// Number of groups any one cell belongs to.
pub const GROUPS_PER_CELL: usize = 3;

/// Number of distinct peers of any one cell.
pub const PEER_COUNT: usize = 20;

/// One all-different group: nine cells holding pairwise-distinct values.
pub type Group = [Cell; SIDE];

/// An ordered cell pair connected by an inequality constraint.
pub type Arc = (Cell, Cell);

/// The immutable constraint structure shared by the solving engines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintModel {
    groups: [Group; GROUP_COUNT],
    peers: Vec<SmallVec<[Cell; PEER_COUNT]>>,
    arcs: Vec<Arc>,
}

fn build_groups() -> [Group; GROUP_COUNT] {
    let mut groups = [[Cell::default(); SIDE]; GROUP_COUNT];

    for row in 0..SIDE {
        for col in 0..SIDE {
            groups[row][col] = Cell::at(row, col);
        }
    }

    for col in 0..SIDE {
        for row in 0..SIDE {
            groups[SIDE + col][row] = Cell::at(row, col);
        }
    }

    for block in 0..SIDE {
        let top = (block / 3) * 3;
        let left = (block % 3) * 3;
        for (i, slot) in groups[2 * SIDE + block].iter_mut().enumerate() {
            *slot = Cell::at(top + i / 3, left + i % 3);
        }
    }

    groups
}

impl ConstraintModel {
    #[must_use]
    pub fn new() -> Self {
        let groups = build_groups();

        let mut peers: Vec<SmallVec<[Cell; PEER_COUNT]>> = Vec::with_capacity(CELL_COUNT);
        for cell in Cell::all() {
            let mut distinct: FxHashSet<Cell> = FxHashSet::default();
            for &group in Self::groups_of(cell).iter() {
                for &other in &groups[group] {
                    if other != cell {
                        distinct.insert(other);
                    }
                }
            }
            let mut list: SmallVec<[Cell; PEER_COUNT]> = distinct.into_iter().collect();
            list.sort_unstable();
            peers.push(list);
        }

        let mut arcs = Vec::new();
        for cell in Cell::all() {
            for &group in Self::groups_of(cell).iter() {
                for &other in &groups[group] {
                    if other != cell {
                        arcs.push((cell, other));
                    }
                }
            }
        }

        Self {
            groups,
            peers,
            arcs,
        }
    }

    /// Indices of the three groups `cell` belongs to: its row, its column,
    /// its box.
    #[must_use]
    pub const fn groups_of(cell: Cell) -> [usize; GROUPS_PER_CELL] {
        [cell.row(), SIDE + cell.col(), 2 * SIDE + cell.block()]
    }

    #[must_use]
    pub const fn groups(&self) -> &[Group; GROUP_COUNT] {
        &self.groups
    }

    /// The distinct cells sharing a group with `cell`.
    #[must_use]
    pub fn peers(&self, cell: Cell) -> &[Cell] {
        &self.peers[cell.index()]
    }

    /// Every binary inequality arc, duplicates included.
    #[must_use]
    pub fn arcs(&self) -> &[Arc] {
        &self.arcs
    }
}

impl Default for ConstraintModel {
    fn default() -> Self {
        Self::new()
    }
}
