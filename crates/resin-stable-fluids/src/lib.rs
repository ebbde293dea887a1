//! Stable-fluids grid solver for resin.
//!
//! A 2D Eulerian solver on a square grid padded with a boundary ring:
//! - implicit diffusion via Gauss-Seidel relaxation
//! - semi-Lagrangian advection with bilinear interpolation
//! - pressure projection for (approximate) incompressibility
//! - vorticity confinement and density-driven buoyancy
//!
//! External code injects forces and density into the `*Old` fields, runs
//! [`Solver::velocity_step`] then [`Solver::density_step`] once per frame,
//! and reads the resulting fields back for rendering or for moving
//! [`Particle`]s.
//!
//! # Example
//!
//! ```
//! use glam::DVec2;
//! use rhizome_resin_stable_fluids::{Solver, StableFluids};
//!
//! let config = StableFluids::default().with_iterations(20);
//! let mut solver = Solver::with_config(64, config)?;
//!
//! solver.add_density_source(32, 32, 50.0)?;
//! solver.add_force(32, 32, DVec2::new(5.0, 0.0))?;
//! solver.velocity_step();
//! solver.density_step();
//!
//! let density = solver.sample_density(DVec2::new(32.0, 32.0));
//! assert!(density > 0.0);
//! # Ok::<(), rhizome_resin_stable_fluids::SolverError>(())
//! ```

pub mod advect;
pub mod boundary;
pub mod config;
pub mod error;
pub mod forces;
pub mod grid;
pub mod particle;
pub mod solve;
pub mod solver;

pub use advect::{advect, bilinear_sample};
pub use boundary::{Boundary, set_boundary};
pub use config::StableFluids;
pub use error::SolverError;
pub use forces::{BUOYANCY_DENSITY, BUOYANCY_DEVIATION, buoyancy, curl, vorticity_confinement};
pub use grid::GridLayout;
pub use particle::{Particle, ParticleConfig, advance_particles, viewport_to_grid};
pub use solve::{add_source, diffuse, divergence, lin_solve, project};
pub use solver::{FieldKind, RESET_VELOCITY, Solver};
