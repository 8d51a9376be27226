#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]

use crate::csp::cell::Cell;
use crate::csp::state::Csp;
use clap::ValueEnum;
use core::fmt::{self, Display};

/// Picks the next cell for the search engine to branch on.
///
/// Returns `None` exactly when no unassigned cell remains, which is the
/// search's success condition.
pub trait VariableSelection {
    fn pick(&self, csp: &Csp) -> Option<Cell>;
}

/// Minimum-remaining-values ordering: the unassigned cell with the smallest
/// candidate set, ties broken by whichever the unassigned set yields first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Mrv;

impl VariableSelection for Mrv {
    fn pick(&self, csp: &Csp) -> Option<Cell> {
        let mut best: Option<(Cell, usize)> = None;

        for cell in csp.unassigned().iter() {
            let size = csp.domain(cell).len();
            match best {
                Some((_, smallest)) if size >= smallest => {}
                _ => best = Some((cell, size)),
            }
        }

        best.map(|(cell, _)| cell)
    }
}

/// Takes whatever unassigned cell comes first; the baseline ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FirstUnassigned;

impl VariableSelection for FirstUnassigned {
    fn pick(&self, csp: &Csp) -> Option<Cell> {
        csp.unassigned().iter().next()
    }
}

/// Enum representing the variable-ordering heuristic, for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum)]
pub enum SelectionStrategy {
    /// Minimum remaining values.
    #[default]
    Mrv,
    /// First unassigned cell.
    FirstUnassigned,
}

impl Display for SelectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mrv => write!(f, "mrv"),
            Self::FirstUnassigned => write!(f, "first-unassigned"),
        }
    }
}
