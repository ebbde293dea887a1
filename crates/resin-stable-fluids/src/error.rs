//! Error types for the stable-fluids solver.

use crate::solver::FieldKind;
use thiserror::Error;

/// Errors reported by solver construction, configuration and cell access.
///
/// Stepping never fails; these only surface at the API edges.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    /// The grid needs at least one interior cell.
    #[error("invalid resolution: grid needs at least one interior cell")]
    InvalidResolution,

    /// A cell coordinate fell outside the padded grid.
    #[error("cell ({x}, {y}) out of bounds for field {field} (valid range 0..{size})")]
    OutOfBounds {
        /// Field that was addressed.
        field: FieldKind,
        /// Requested x coordinate.
        x: usize,
        /// Requested y coordinate.
        y: usize,
        /// Cells per side including the boundary ring, `n + 2`.
        size: usize,
    },

    /// A configuration value is unusable.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
