//! Vorticity confinement and buoyancy forcing.

use crate::grid::GridLayout;

/// Weight of the raw density term in the buoyancy force.
pub const BUOYANCY_DENSITY: f64 = 0.000625;
/// Weight of the deviation-from-ambient term in the buoyancy force.
pub const BUOYANCY_DEVIATION: f64 = 0.015;

/// Curl of `(u, v)` at interior cell `(i, j)`.
///
/// The half factor binds to the trailing sample only, so this is not a
/// symmetric central difference. The confinement force is tuned against
/// this exact form.
#[inline]
pub fn curl(u: &[f64], v: &[f64], i: usize, j: usize, grid: GridLayout) -> f64 {
    let du_dy = u[grid.idx(i, j + 1)] - u[grid.idx(i, j - 1)] * 0.5;
    let dv_dx = v[grid.idx(i + 1, j)] - v[grid.idx(i - 1, j)] * 0.5;
    du_dy - dv_dx
}

/// Writes the vorticity confinement force into `fx` / `fy`.
///
/// `curl_mag` keeps per-cell curl magnitudes between calls. Magnitudes and
/// their gradient are computed in a single sweep, so cells after `(i, j)` in
/// sweep order still contribute the previous call's magnitude. Only interior
/// cells of `fx` / `fy` are written.
pub fn vorticity_confinement(
    u: &[f64],
    v: &[f64],
    curl_mag: &mut [f64],
    fx: &mut [f64],
    fy: &mut [f64],
    grid: GridLayout,
) {
    let n = grid.n();

    for j in 1..=n {
        for i in 1..=n {
            let idx = grid.idx(i, j);
            let w = curl(u, v, i, j, grid);
            curl_mag[idx] = w.abs();

            let mut dx = curl_mag[grid.idx(i + 1, j)] - curl_mag[grid.idx(i - 1, j)] * 0.5;
            let mut dy = curl_mag[grid.idx(i, j + 1)] - curl_mag[grid.idx(i, j - 1)] * 0.5;

            let mut norm = (dx * dx + dy * dy).sqrt();
            if norm == 0.0 {
                norm = 1.0;
            }
            dx /= norm;
            dy /= norm;

            fx[idx] = -dy * w;
            fy[idx] = dx * w;
        }
    }
}

/// Writes the buoyancy force for density `d` into the interior of `fy`.
///
/// The grid-average density stands in for ambient temperature. The sum runs
/// over the whole buffer while the average divides by the interior count.
pub fn buoyancy(d: &[f64], fy: &mut [f64], grid: GridLayout) {
    let n = grid.n();
    let ambient = d.iter().sum::<f64>() / (n * n) as f64;

    for j in 1..=n {
        for i in 1..=n {
            let idx = grid.idx(i, j);
            fy[idx] = BUOYANCY_DENSITY * d[idx] - BUOYANCY_DEVIATION * (d[idx] - ambient);
        }
    }
}
