//! Passive tracer particles carried by the solved velocity field.
//!
//! Particles live in viewport units (e.g. terminal cells or pixels) and are
//! owned by the caller; the solver is only read.

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::solver::Solver;

/// Remaining alpha below which a particle counts as faded out.
const MIN_ALPHA: f64 = 0.001;

/// Tracer particle behaviour.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParticleConfig {
    /// Lifetime in seconds.
    pub time_to_live: f64,
    /// Factor from grid velocity to viewport units per update.
    pub velocity_scale: f64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            time_to_live: 8.0,
            velocity_scale: 50.0,
        }
    }
}

/// A tracer particle.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Particle {
    /// Position in viewport units.
    pub position: DVec2,
    /// Displacement applied on the last update.
    pub velocity: DVec2,
    /// Age in seconds.
    pub age: f64,
    /// Set once the particle has expired or left the viewport.
    pub dead: bool,
}

impl Particle {
    /// Spawns a particle at `position`.
    pub fn new(position: DVec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Remaining visibility in `[0, 1]`, fading linearly with age.
    pub fn alpha(&self, config: &ParticleConfig) -> f64 {
        if config.time_to_live <= 0.0 {
            0.0
        } else {
            (1.0 - self.age / config.time_to_live).clamp(0.0, 1.0)
        }
    }

    /// Ages the particle and moves it with the fluid.
    ///
    /// A particle that is too old or sits outside `(0, viewport)` is marked
    /// dead instead of moved.
    pub fn update(
        &mut self,
        solver: &Solver,
        dt: f64,
        viewport: DVec2,
        config: &ParticleConfig,
    ) {
        if self.dead {
            return;
        }
        self.age += dt;

        let inside =
            self.position.cmpgt(DVec2::ZERO).all() && self.position.cmplt(viewport).all();
        if self.age >= config.time_to_live || self.alpha(config) < MIN_ALPHA || !inside {
            self.dead = true;
            return;
        }

        let cell = viewport_to_grid(self.position, viewport, solver.resolution());
        self.velocity = solver.sample_velocity(cell) * config.velocity_scale;
        self.position += self.velocity;
    }
}

/// Maps a viewport position to solver grid coordinates.
///
/// The viewport spans the interior cells; cell `i` is centred on grid
/// coordinate `i`.
pub fn viewport_to_grid(position: DVec2, viewport: DVec2, n: usize) -> DVec2 {
    position / viewport * n as f64 + DVec2::splat(0.5)
}

/// Updates every particle and drops the dead ones.
pub fn advance_particles(
    particles: &mut Vec<Particle>,
    solver: &Solver,
    dt: f64,
    viewport: DVec2,
    config: &ParticleConfig,
) {
    for particle in particles.iter_mut() {
        particle.update(solver, dt, viewport, config);
    }
    particles.retain(|p| !p.dead);
}
