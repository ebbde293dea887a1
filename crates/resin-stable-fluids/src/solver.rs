//! The grid solver: field ownership, cell access and the frame step.

use std::fmt;

use glam::DVec2;
use log::{debug, log_enabled, trace, warn};

use crate::advect::{advect, bilinear_sample};
use crate::boundary::Boundary;
use crate::config::StableFluids;
use crate::error::SolverError;
use crate::forces::{buoyancy, vorticity_confinement};
use crate::grid::GridLayout;
use crate::solve::{add_source, diffuse, divergence, project};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Value both velocity components take after [`Solver::reset_velocity`].
///
/// Non-zero so renderers can still derive a flow direction.
pub const RESET_VELOCITY: f64 = 0.001;

/// One of the six externally addressable fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FieldKind {
    /// Velocity, x component.
    U,
    /// Velocity, y component.
    V,
    /// Density.
    D,
    /// Pending x force.
    UOld,
    /// Pending y force.
    VOld,
    /// Pending density source.
    DOld,
}

impl FieldKind {
    /// Every addressable field.
    pub const ALL: [FieldKind; 6] = [
        FieldKind::U,
        FieldKind::V,
        FieldKind::D,
        FieldKind::UOld,
        FieldKind::VOld,
        FieldKind::DOld,
    ];

    /// Short name of the field.
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::U => "u",
            FieldKind::V => "v",
            FieldKind::D => "d",
            FieldKind::UOld => "uOld",
            FieldKind::VOld => "vOld",
            FieldKind::DOld => "dOld",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 2D stable-fluids solver on an `n x n` grid.
///
/// Based on Jos Stam's "Real-Time Fluid Dynamics for Games" (2003), with
/// vorticity confinement and density-driven buoyancy. External code writes
/// forces and density into the `*Old` fields, then calls
/// [`velocity_step`](Self::velocity_step) followed by
/// [`density_step`](Self::density_step) once per frame.
///
/// # Example
///
/// ```
/// use rhizome_resin_stable_fluids::{FieldKind, Solver};
///
/// let mut solver = Solver::new(32).unwrap();
/// solver.set_cell(FieldKind::DOld, 16, 16, 50.0).unwrap();
/// solver.set_cell(FieldKind::UOld, 16, 16, 5.0).unwrap();
/// solver.step();
///
/// assert!(solver.cell(FieldKind::D, 16, 16).unwrap() > 0.0);
/// ```
#[derive(Clone, Debug)]
pub struct Solver {
    grid: GridLayout,
    config: StableFluids,
    u: Vec<f64>,
    v: Vec<f64>,
    d: Vec<f64>,
    u_old: Vec<f64>,
    v_old: Vec<f64>,
    d_old: Vec<f64>,
    /// Curl magnitudes, carried between velocity steps.
    curl: Vec<f64>,
}

impl Solver {
    /// Creates a solver with `n` interior cells per side and default config.
    pub fn new(n: usize) -> Result<Self, SolverError> {
        Self::with_config(n, StableFluids::default())
    }

    /// Creates a solver with `n` interior cells per side.
    pub fn with_config(n: usize, config: StableFluids) -> Result<Self, SolverError> {
        let storage = n
            .checked_add(2)
            .and_then(|stride| stride.checked_mul(stride));
        if n == 0 || storage.is_none() {
            return Err(SolverError::InvalidResolution);
        }
        config.validate()?;

        let grid = GridLayout::new(n);
        debug!("creating {n}x{n} fluid solver with {config:?}");
        Ok(Self {
            grid,
            config,
            u: grid.zeroed(),
            v: grid.zeroed(),
            d: grid.zeroed(),
            u_old: grid.zeroed(),
            v_old: grid.zeroed(),
            d_old: grid.zeroed(),
            curl: grid.zeroed(),
        })
    }

    /// Interior cells per side.
    pub fn resolution(&self) -> usize {
        self.grid.n()
    }

    /// Storage layout shared by every field.
    pub fn grid(&self) -> GridLayout {
        self.grid
    }

    /// Current configuration.
    pub fn config(&self) -> &StableFluids {
        &self.config
    }

    /// Replaces the configuration, keeping the current one if validation fails.
    pub fn set_config(&mut self, config: StableFluids) -> Result<(), SolverError> {
        self.config = config.apply()?;
        debug!("fluid solver config changed to {:?}", self.config);
        Ok(())
    }

    /// Read-only view of a whole field, `(n + 2)^2` cells in row-major order.
    pub fn field(&self, kind: FieldKind) -> &[f64] {
        match kind {
            FieldKind::U => &self.u,
            FieldKind::V => &self.v,
            FieldKind::D => &self.d,
            FieldKind::UOld => &self.u_old,
            FieldKind::VOld => &self.v_old,
            FieldKind::DOld => &self.d_old,
        }
    }

    fn field_mut(&mut self, kind: FieldKind) -> &mut [f64] {
        match kind {
            FieldKind::U => &mut self.u,
            FieldKind::V => &mut self.v,
            FieldKind::D => &mut self.d,
            FieldKind::UOld => &mut self.u_old,
            FieldKind::VOld => &mut self.v_old,
            FieldKind::DOld => &mut self.d_old,
        }
    }

    fn checked_idx(&self, field: FieldKind, x: usize, y: usize) -> Result<usize, SolverError> {
        if self.grid.contains(x, y) {
            Ok(self.grid.idx(x, y))
        } else {
            Err(SolverError::OutOfBounds {
                field,
                x,
                y,
                size: self.grid.stride(),
            })
        }
    }

    /// Overwrites one cell. Boundary cells `0` and `n + 1` are addressable.
    pub fn set_cell(
        &mut self,
        field: FieldKind,
        x: usize,
        y: usize,
        value: f64,
    ) -> Result<(), SolverError> {
        let idx = self.checked_idx(field, x, y)?;
        self.field_mut(field)[idx] = value;
        Ok(())
    }

    /// Reads one cell.
    pub fn cell(&self, field: FieldKind, x: usize, y: usize) -> Result<f64, SolverError> {
        let idx = self.checked_idx(field, x, y)?;
        Ok(self.field(field)[idx])
    }

    /// Accumulates a force into the pending velocity sources.
    pub fn add_force(&mut self, x: usize, y: usize, force: DVec2) -> Result<(), SolverError> {
        let idx = self.checked_idx(FieldKind::UOld, x, y)?;
        self.u_old[idx] += force.x;
        self.v_old[idx] += force.y;
        Ok(())
    }

    /// Accumulates density into the pending density source.
    pub fn add_density_source(
        &mut self,
        x: usize,
        y: usize,
        amount: f64,
    ) -> Result<(), SolverError> {
        let idx = self.checked_idx(FieldKind::DOld, x, y)?;
        self.d_old[idx] += amount;
        Ok(())
    }

    /// Advances the velocity field by one frame and clears pending forces.
    pub fn velocity_step(&mut self) {
        let grid = self.grid;
        let StableFluids {
            dt,
            viscosity,
            iterations,
            vorticity,
            buoyancy: buoyant,
            ..
        } = self.config;

        add_source(&mut self.u, &self.u_old, dt);
        add_source(&mut self.v, &self.v_old, dt);

        if vorticity {
            vorticity_confinement(
                &self.u,
                &self.v,
                &mut self.curl,
                &mut self.u_old,
                &mut self.v_old,
                grid,
            );
            add_source(&mut self.u, &self.u_old, dt);
            add_source(&mut self.v, &self.v_old, dt);
        }

        if buoyant {
            buoyancy(&self.d, &mut self.v_old, grid);
            add_source(&mut self.v, &self.v_old, dt);
        }

        std::mem::swap(&mut self.u, &mut self.u_old);
        diffuse(
            Boundary::LeftRight,
            &mut self.u,
            &self.u_old,
            viscosity,
            dt,
            iterations,
            grid,
        );

        std::mem::swap(&mut self.v, &mut self.v_old);
        diffuse(
            Boundary::TopBottom,
            &mut self.v,
            &self.v_old,
            viscosity,
            dt,
            iterations,
            grid,
        );

        project(
            &mut self.u,
            &mut self.v,
            &mut self.u_old,
            &mut self.v_old,
            iterations,
            grid,
        );

        std::mem::swap(&mut self.u, &mut self.u_old);
        std::mem::swap(&mut self.v, &mut self.v_old);

        advect(
            Boundary::LeftRight,
            &mut self.u,
            &self.u_old,
            &self.u_old,
            &self.v_old,
            dt,
            grid,
        );
        advect(
            Boundary::TopBottom,
            &mut self.v,
            &self.v_old,
            &self.u_old,
            &self.v_old,
            dt,
            grid,
        );

        project(
            &mut self.u,
            &mut self.v,
            &mut self.u_old,
            &mut self.v_old,
            iterations,
            grid,
        );

        self.u_old.fill(0.0);
        self.v_old.fill(0.0);

        trace!("velocity step done");
        self.warn_non_finite("velocity", FieldKind::U);
        self.warn_non_finite("velocity", FieldKind::V);
    }

    /// Advances the density field by one frame and clears pending sources.
    ///
    /// Call after [`velocity_step`](Self::velocity_step) so density moves
    /// with the updated velocity.
    pub fn density_step(&mut self) {
        let grid = self.grid;
        let StableFluids {
            dt,
            diffusion,
            iterations,
            ..
        } = self.config;

        add_source(&mut self.d, &self.d_old, dt);

        std::mem::swap(&mut self.d, &mut self.d_old);
        diffuse(
            Boundary::None,
            &mut self.d,
            &self.d_old,
            diffusion,
            dt,
            iterations,
            grid,
        );

        std::mem::swap(&mut self.d, &mut self.d_old);
        advect(Boundary::None, &mut self.d, &self.d_old, &self.u, &self.v, dt, grid);

        self.d_old.fill(0.0);

        trace!("density step done");
        self.warn_non_finite("density", FieldKind::D);
    }

    /// Runs one full frame: velocity, then density.
    pub fn step(&mut self) {
        self.velocity_step();
        self.density_step();
    }

    /// Sets both velocity components to [`RESET_VELOCITY`] everywhere.
    pub fn reset_velocity(&mut self) {
        debug!("resetting fluid velocity");
        self.u.fill(RESET_VELOCITY);
        self.v.fill(RESET_VELOCITY);
    }

    /// Clears the density field.
    pub fn reset_density(&mut self) {
        debug!("resetting fluid density");
        self.d.fill(0.0);
    }

    /// Bilinearly samples density at grid coordinates.
    pub fn sample_density(&self, pos: DVec2) -> f64 {
        bilinear_sample(&self.d, pos.x, pos.y, self.grid)
    }

    /// Bilinearly samples velocity at grid coordinates.
    pub fn sample_velocity(&self, pos: DVec2) -> DVec2 {
        DVec2::new(
            bilinear_sample(&self.u, pos.x, pos.y, self.grid),
            bilinear_sample(&self.v, pos.x, pos.y, self.grid),
        )
    }

    /// Total density over the interior cells.
    pub fn total_density(&self) -> f64 {
        self.grid.interior_sum(&self.d)
    }

    /// Largest absolute velocity divergence over the interior.
    pub fn max_divergence(&self) -> f64 {
        divergence(&self.u, &self.v, self.grid)
            .iter()
            .fold(0.0_f64, |max, d| max.max(d.abs()))
    }

    fn warn_non_finite(&self, stage: &str, kind: FieldKind) {
        if log_enabled!(log::Level::Warn) && self.field(kind).iter().any(|x| !x.is_finite()) {
            warn!("{stage} step left non-finite values in field {kind}");
        }
    }
}
