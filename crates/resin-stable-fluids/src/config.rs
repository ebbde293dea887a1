//! Solver configuration.

use crate::error::SolverError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the stable-fluids solver.
///
/// Set at construction and replaceable between frames through
/// [`Solver::set_config`](crate::Solver::set_config).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StableFluids {
    /// Time step for simulation.
    pub dt: f64,
    /// Diffusion rate of the density field.
    pub diffusion: f64,
    /// Viscosity, the diffusion rate of the velocity field.
    pub viscosity: f64,
    /// Number of Gauss-Seidel sweeps per linear solve.
    pub iterations: u32,
    /// Apply vorticity confinement during the velocity step.
    pub vorticity: bool,
    /// Apply density-driven buoyancy during the velocity step.
    pub buoyancy: bool,
}

impl Default for StableFluids {
    fn default() -> Self {
        Self {
            dt: 0.2,
            diffusion: 0.0001,
            viscosity: 0.0,
            iterations: 10,
            vorticity: true,
            buoyancy: true,
        }
    }
}

impl StableFluids {
    /// Sets the time step.
    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    /// Sets the density diffusion rate.
    pub fn with_diffusion(mut self, diffusion: f64) -> Self {
        self.diffusion = diffusion;
        self
    }

    /// Sets the viscosity.
    pub fn with_viscosity(mut self, viscosity: f64) -> Self {
        self.viscosity = viscosity;
        self
    }

    /// Sets the number of relaxation sweeps.
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Enables or disables vorticity confinement.
    pub fn with_vorticity(mut self, enabled: bool) -> Self {
        self.vorticity = enabled;
        self
    }

    /// Enables or disables buoyancy.
    pub fn with_buoyancy(mut self, enabled: bool) -> Self {
        self.buoyancy = enabled;
        self
    }

    /// Applies this configuration, returning a validated copy.
    pub fn apply(&self) -> Result<StableFluids, SolverError> {
        self.validate()?;
        Ok(self.clone())
    }

    /// Checks that every rate is finite and in range.
    pub fn validate(&self) -> Result<(), SolverError> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(SolverError::InvalidConfig(format!(
                "dt must be finite and positive, got {}",
                self.dt
            )));
        }
        for (name, value) in [("diffusion", self.diffusion), ("viscosity", self.viscosity)] {
            if !value.is_finite() || value < 0.0 {
                return Err(SolverError::InvalidConfig(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}
