//! Boundary conditions for the padded grid.

use crate::grid::GridLayout;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the boundary ring derives its values from the interior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Boundary {
    /// Mirror the adjacent interior cell on every wall (scalar fields).
    #[default]
    None,
    /// Negate across the left and right walls (x velocity).
    LeftRight,
    /// Negate across the top and bottom walls (y velocity).
    TopBottom,
}

/// Rewrites the boundary ring of `x` from its interior neighbours.
///
/// Corner cells become the average of their two adjacent edge cells.
pub fn set_boundary(bound: Boundary, x: &mut [f64], grid: GridLayout) {
    let n = grid.n();

    for j in 1..=n {
        let (left, right) = (x[grid.idx(1, j)], x[grid.idx(n, j)]);
        if bound == Boundary::LeftRight {
            x[grid.idx(0, j)] = -left;
            x[grid.idx(n + 1, j)] = -right;
        } else {
            x[grid.idx(0, j)] = left;
            x[grid.idx(n + 1, j)] = right;
        }
    }

    for i in 1..=n {
        let (bottom, top) = (x[grid.idx(i, 1)], x[grid.idx(i, n)]);
        if bound == Boundary::TopBottom {
            x[grid.idx(i, 0)] = -bottom;
            x[grid.idx(i, n + 1)] = -top;
        } else {
            x[grid.idx(i, 0)] = bottom;
            x[grid.idx(i, n + 1)] = top;
        }
    }

    x[grid.idx(0, 0)] = 0.5 * (x[grid.idx(1, 0)] + x[grid.idx(0, 1)]);
    x[grid.idx(0, n + 1)] = 0.5 * (x[grid.idx(1, n + 1)] + x[grid.idx(0, n)]);
    x[grid.idx(n + 1, 0)] = 0.5 * (x[grid.idx(n, 0)] + x[grid.idx(n + 1, 1)]);
    x[grid.idx(n + 1, n + 1)] = 0.5 * (x[grid.idx(n, n + 1)] + x[grid.idx(n + 1, n)]);
}
