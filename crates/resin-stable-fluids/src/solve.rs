//! Source integration, Gauss-Seidel relaxation, diffusion and projection.

use crate::boundary::{Boundary, set_boundary};
use crate::grid::GridLayout;

/// Integrates a source buffer into a field: `x[i] += s[i] * dt`.
///
/// Covers every stored cell, boundary ring included.
pub fn add_source(x: &mut [f64], s: &[f64], dt: f64) {
    for (x, s) in x.iter_mut().zip(s) {
        *x += s * dt;
    }
}

/// Relaxes `x[i,j] = (x0[i,j] + a * (sum of 4 neighbours)) / c` in place.
///
/// Each sweep reads neighbours already updated earlier in the same sweep.
/// The boundary ring is rewritten after every sweep.
pub fn lin_solve(
    bound: Boundary,
    x: &mut [f64],
    x0: &[f64],
    a: f64,
    c: f64,
    iterations: u32,
    grid: GridLayout,
) {
    let n = grid.n();
    let c_recip = 1.0 / c;

    for _ in 0..iterations {
        for j in 1..=n {
            for i in 1..=n {
                let idx = grid.idx(i, j);
                x[idx] = (x0[idx]
                    + a * (x[grid.idx(i - 1, j)]
                        + x[grid.idx(i + 1, j)]
                        + x[grid.idx(i, j - 1)]
                        + x[grid.idx(i, j + 1)]))
                    * c_recip;
            }
        }
        set_boundary(bound, x, grid);
    }
}

/// Implicit diffusion of `x0` into `x` at the given rate.
///
/// With zero iterations diffusion is skipped: the interior of `x0` is copied
/// into `x` and the boundary reapplied.
pub fn diffuse(
    bound: Boundary,
    x: &mut [f64],
    x0: &[f64],
    rate: f64,
    dt: f64,
    iterations: u32,
    grid: GridLayout,
) {
    if iterations == 0 {
        let n = grid.n();
        for j in 1..=n {
            let row = grid.idx(1, j)..=grid.idx(n, j);
            x[row.clone()].copy_from_slice(&x0[row]);
        }
        set_boundary(bound, x, grid);
        return;
    }

    let n = grid.n() as f64;
    let a = dt * rate * n * n;
    lin_solve(bound, x, x0, a, 1.0 + 4.0 * a, iterations, grid);
}

/// Removes the divergent part of `(u, v)`.
///
/// `p` and `div` are scratch buffers; both are overwritten.
pub fn project(
    u: &mut [f64],
    v: &mut [f64],
    p: &mut [f64],
    div: &mut [f64],
    iterations: u32,
    grid: GridLayout,
) {
    let n = grid.n();
    let h = 1.0 / n as f64;

    for j in 1..=n {
        for i in 1..=n {
            let idx = grid.idx(i, j);
            div[idx] = -0.5
                * h
                * (u[grid.idx(i + 1, j)] - u[grid.idx(i - 1, j)] + v[grid.idx(i, j + 1)]
                    - v[grid.idx(i, j - 1)]);
            p[idx] = 0.0;
        }
    }
    set_boundary(Boundary::None, div, grid);
    set_boundary(Boundary::None, p, grid);

    lin_solve(Boundary::None, p, div, 1.0, 4.0, iterations, grid);

    for j in 1..=n {
        for i in 1..=n {
            let idx = grid.idx(i, j);
            u[idx] -= 0.5 * (p[grid.idx(i + 1, j)] - p[grid.idx(i - 1, j)]) / h;
            v[idx] -= 0.5 * (p[grid.idx(i, j + 1)] - p[grid.idx(i, j - 1)]) / h;
        }
    }
    set_boundary(Boundary::LeftRight, u, grid);
    set_boundary(Boundary::TopBottom, v, grid);
}

/// Central-difference divergence of `(u, v)` over interior cells.
///
/// Boundary cells of the result are zero.
pub fn divergence(u: &[f64], v: &[f64], grid: GridLayout) -> Vec<f64> {
    let n = grid.n();
    let half_n = 0.5 * n as f64;
    let mut div = grid.zeroed();

    for j in 1..=n {
        for i in 1..=n {
            div[grid.idx(i, j)] = half_n
                * (u[grid.idx(i + 1, j)] - u[grid.idx(i - 1, j)] + v[grid.idx(i, j + 1)]
                    - v[grid.idx(i, j - 1)]);
        }
    }
    div
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total_divergence(u: &[f64], v: &[f64], grid: GridLayout) -> f64 {
        divergence(u, v, grid).iter().map(|d| d.abs()).sum()
    }

    fn max_divergence(u: &[f64], v: &[f64], grid: GridLayout) -> f64 {
        divergence(u, v, grid)
            .iter()
            .fold(0.0_f64, |max, d| max.max(d.abs()))
    }

    #[test]
    fn test_add_source_scales_by_dt() {
        let mut x = vec![1.0, 2.0, 3.0];
        let s = vec![10.0, 0.0, -4.0];
        add_source(&mut x, &s, 0.5);
        assert_eq!(x, vec![6.0, 2.0, 1.0]);
    }

    #[test]
    fn test_add_source_accumulates() {
        let mut x = vec![0.0; 4];
        let s = vec![2.0; 4];
        add_source(&mut x, &s, 0.25);
        add_source(&mut x, &s, 0.25);
        assert!(x.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_lin_solve_zero_iterations_is_noop() {
        let grid = GridLayout::new(8);
        let mut x = grid.zeroed();
        let mut x0 = grid.zeroed();
        x0[grid.idx(4, 4)] = 1.0;
        lin_solve(Boundary::None, &mut x, &x0, 1.0, 5.0, 0, grid);
        assert!(x.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_lin_solve_reads_updated_neighbours_within_a_sweep() {
        let grid = GridLayout::new(4);
        let mut x = grid.zeroed();
        let mut x0 = grid.zeroed();
        x0[grid.idx(1, 1)] = 4.0;

        lin_solve(Boundary::None, &mut x, &x0, 1.0, 4.0, 1, grid);

        // (1, 1) is visited first and becomes 1; (2, 1) sees it in the same sweep.
        assert_eq!(x[grid.idx(1, 1)], 1.0);
        assert_eq!(x[grid.idx(2, 1)], 0.25);
        assert_eq!(x[grid.idx(3, 1)], 0.0625);
        assert_eq!(x[grid.idx(1, 2)], 0.25);
        assert_eq!(x[grid.idx(2, 2)], 0.125);
    }

    #[test]
    fn test_diffuse_zero_iterations_copies_interior() {
        let grid = GridLayout::new(4);
        let mut x0 = grid.zeroed();
        x0[grid.idx(2, 3)] = 7.0;
        x0[grid.idx(1, 4)] = -2.0;
        let mut x = vec![9.0; grid.len()];

        diffuse(Boundary::None, &mut x, &x0, 0.5, 0.2, 0, grid);

        for j in 1..=4 {
            for i in 1..=4 {
                assert_eq!(x[grid.idx(i, j)], x0[grid.idx(i, j)]);
            }
        }
        assert_eq!(x[grid.idx(0, 4)], -2.0);
        assert_eq!(x[grid.idx(1, 5)], -2.0);
        assert_eq!(x[grid.idx(0, 0)], 0.0);
    }

    #[test]
    fn test_lin_solve_spreads_from_center() {
        let grid = GridLayout::new(16);
        let mut x = grid.zeroed();
        let mut x0 = grid.zeroed();
        x0[grid.idx(8, 8)] = 100.0;
        x.copy_from_slice(&x0);

        lin_solve(Boundary::None, &mut x, &x0, 1.0, 5.0, 20, grid);

        let center = x[grid.idx(8, 8)];
        let neighbor = x[grid.idx(9, 8)];
        assert!(center > 0.0);
        assert!(neighbor > 0.0);
        assert!(center > neighbor);
    }

    #[test]
    fn test_diffusion_stays_within_bounds() {
        let grid = GridLayout::new(16);
        let hot = 100.0;
        let mut x0 = grid.zeroed();
        x0[grid.idx(8, 8)] = hot;
        let mut x = grid.zeroed();

        // Large rate: an explicit scheme would overshoot here.
        diffuse(Boundary::None, &mut x, &x0, 0.05, 0.2, 20, grid);

        for j in 1..=16 {
            for i in 1..=16 {
                let value = x[grid.idx(i, j)];
                assert!(
                    (0.0..=hot).contains(&value),
                    "value {} at ({}, {}) escaped [0, {}]",
                    value,
                    i,
                    j,
                    hot
                );
            }
        }
        let center = x[grid.idx(8, 8)];
        assert!(center < hot);
        for (i, j) in [(7, 8), (9, 8), (8, 7), (8, 9)] {
            let value = x[grid.idx(i, j)];
            assert!(value > 0.0 && value <= center);
        }
    }

    #[test]
    fn test_diffuse_zero_rate_copies_interior() {
        let grid = GridLayout::new(6);
        let mut x0 = grid.zeroed();
        for (k, value) in x0.iter_mut().enumerate() {
            *value = k as f64;
        }
        let mut x = grid.zeroed();
        diffuse(Boundary::None, &mut x, &x0, 0.0, 0.2, 3, grid);
        for j in 1..=6 {
            for i in 1..=6 {
                assert_eq!(x[grid.idx(i, j)], x0[grid.idx(i, j)]);
            }
        }
    }

    #[test]
    fn test_project_reduces_point_source_divergence() {
        let grid = GridLayout::new(32);
        let mut u = grid.zeroed();
        let mut v = grid.zeroed();
        let (cx, cy) = (16, 16);
        u[grid.idx(cx + 1, cy)] = 1.0;
        u[grid.idx(cx - 1, cy)] = -1.0;
        v[grid.idx(cx, cy + 1)] = 1.0;
        v[grid.idx(cx, cy - 1)] = -1.0;

        let before = max_divergence(&u, &v, grid);
        assert!(before > 0.0);

        let mut p = grid.zeroed();
        let mut div = grid.zeroed();
        project(&mut u, &mut v, &mut p, &mut div, 40, grid);

        let after = max_divergence(&u, &v, grid);
        assert!(
            after < before,
            "divergence should drop: before={}, after={}",
            before,
            after
        );
    }

    #[test]
    fn test_project_smooth_outflow_mostly_removed() {
        let grid = GridLayout::new(32);
        let mut u = grid.zeroed();
        let mut v = grid.zeroed();
        for j in 1..=32 {
            for i in 1..=32 {
                let dx = i as f64 - 16.0;
                let dy = j as f64 - 16.0;
                let falloff = (-(dx * dx + dy * dy) / 8.0).exp();
                u[grid.idx(i, j)] = dx * 0.1 * falloff;
                v[grid.idx(i, j)] = dy * 0.1 * falloff;
            }
        }
        let before = total_divergence(&u, &v, grid);

        let mut p = grid.zeroed();
        let mut div = grid.zeroed();
        project(&mut u, &mut v, &mut p, &mut div, 20, grid);

        let after = total_divergence(&u, &v, grid);
        assert!(after < 0.5 * before, "before={}, after={}", before, after);
    }

    #[test]
    fn test_project_leaves_zero_field_at_zero() {
        let grid = GridLayout::new(8);
        let mut u = grid.zeroed();
        let mut v = grid.zeroed();
        let mut p = grid.zeroed();
        let mut div = grid.zeroed();
        project(&mut u, &mut v, &mut p, &mut div, 10, grid);
        assert!(u.iter().chain(&v).all(|&x| x == 0.0));
    }

    #[test]
    fn test_divergence_of_uniform_flow_is_zero() {
        let grid = GridLayout::new(8);
        let u = vec![0.3; grid.len()];
        let v = vec![-0.7; grid.len()];
        assert!(divergence(&u, &v, grid).iter().all(|&d| d == 0.0));
    }
}
