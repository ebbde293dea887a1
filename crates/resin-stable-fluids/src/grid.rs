//! Padded square grid layout shared by every field.

/// Layout of an `n x n` grid padded with a one-cell boundary ring.
///
/// Storage is a flat row-major buffer of `(n + 2)^2` cells; cell `(i, j)`
/// with `0 <= i, j <= n + 1` lives at `i + (n + 2) * j`. Interior cells are
/// `1..=n` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    n: usize,
}

impl GridLayout {
    /// Creates a layout with `n` interior cells per side.
    pub fn new(n: usize) -> Self {
        Self { n }
    }

    /// Number of interior cells per side.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Cells per row, boundary included.
    pub fn stride(&self) -> usize {
        self.n + 2
    }

    /// Total number of stored cells.
    pub fn len(&self) -> usize {
        self.stride() * self.stride()
    }

    /// Always false; a layout holds at least its boundary ring.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Flat index of cell `(i, j)`.
    #[inline]
    pub fn idx(&self, i: usize, j: usize) -> usize {
        i + self.stride() * j
    }

    /// Whether `(i, j)` addresses a stored cell (boundary ring included).
    pub fn contains(&self, i: usize, j: usize) -> bool {
        i <= self.n + 1 && j <= self.n + 1
    }

    /// A zero-filled buffer sized for this layout.
    pub fn zeroed(&self) -> Vec<f64> {
        vec![0.0; self.len()]
    }

    /// Sum of the interior cells of `field`.
    pub fn interior_sum(&self, field: &[f64]) -> f64 {
        let mut sum = 0.0;
        for j in 1..=self.n {
            for i in 1..=self.n {
                sum += field[self.idx(i, j)];
            }
        }
        sum
    }
}
