//! Semi-Lagrangian advection.

use crate::boundary::{Boundary, set_boundary};
use crate::grid::GridLayout;

/// Bilinearly samples `field` at grid coordinates `(x, y)`.
///
/// The position is clamped to `[0.5, n + 0.5]` so the 2x2 stencil never
/// leaves the padded grid.
pub fn bilinear_sample(field: &[f64], x: f64, y: f64, grid: GridLayout) -> f64 {
    let max = grid.n() as f64 + 0.5;
    let x = x.clamp(0.5, max);
    let y = y.clamp(0.5, max);

    let i0 = x as usize;
    let i1 = i0 + 1;
    let j0 = y as usize;
    let j1 = j0 + 1;

    let s1 = x - i0 as f64;
    let s0 = 1.0 - s1;
    let t1 = y - j0 as f64;
    let t0 = 1.0 - t1;

    s0 * (t0 * field[grid.idx(i0, j0)] + t1 * field[grid.idx(i0, j1)])
        + s1 * (t0 * field[grid.idx(i1, j0)] + t1 * field[grid.idx(i1, j1)])
}

/// Transports `d0` along `(u, v)` into `d` by tracing each cell backwards.
pub fn advect(
    bound: Boundary,
    d: &mut [f64],
    d0: &[f64],
    u: &[f64],
    v: &[f64],
    dt: f64,
    grid: GridLayout,
) {
    let n = grid.n();
    let dt0 = dt * n as f64;

    for j in 1..=n {
        for i in 1..=n {
            let idx = grid.idx(i, j);
            let x = i as f64 - dt0 * u[idx];
            let y = j as f64 - dt0 * v[idx];
            d[idx] = bilinear_sample(d0, x, y, grid);
        }
    }

    set_boundary(bound, d, grid);
}
