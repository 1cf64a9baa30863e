//! Fixed-timestep simulation driver
//!
//! Converts variable wall-clock frame deltas into a whole number of fixed
//! integration steps and keeps one step of history so callers can blend
//! between the last two discrete states.

use crate::engine::{ForceAccumulator, ForceModel, State};
use crate::integrator;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Default fixed step size in seconds
pub const DEFAULT_FIXED_DT: f32 = 0.01;
/// Default upper bound on a single frame delta in seconds
pub const DEFAULT_MAX_FRAME_DT: f32 = 0.25;
/// Largest `max_frame_dt / fixed_dt` ratio a configuration may have
pub const MAX_STEPS_PER_ADVANCE: u32 = 10_000;

/// Rejected simulation configuration
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("fixed_dt must be positive and finite, got {value}")]
    InvalidFixedDt { value: f32 },

    #[error("max_frame_dt must be finite and at least fixed_dt ({fixed_dt}), got {value}")]
    InvalidMaxFrameDt { value: f32, fixed_dt: f32 },

    #[error("fixed_dt {fixed_dt} is too small for max_frame_dt {max_frame_dt}: one frame could need more than {limit} steps")]
    TooManySteps {
        fixed_dt: f32,
        max_frame_dt: f32,
        limit: u32,
    },

    #[error("initial state must be finite, got {state:?}")]
    NonFiniteState { state: State },

    #[error("force model #{index} ({name}) has non-finite parameters")]
    NonFiniteForce { index: usize, name: &'static str },
}

/// Timing parameters, fixed for the lifetime of a [`Simulation`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    pub fixed_dt: f32,
    /// Frame deltas above this are clamped, bounding catch-up work per call
    pub max_frame_dt: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fixed_dt: DEFAULT_FIXED_DT,
            max_frame_dt: DEFAULT_MAX_FRAME_DT,
        }
    }
}

impl SimulationConfig {
    pub fn new(fixed_dt: f32) -> Self {
        Self {
            fixed_dt,
            ..Self::default()
        }
    }

    pub fn with_max_frame_dt(mut self, max_frame_dt: f32) -> Self {
        self.max_frame_dt = max_frame_dt;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fixed_dt.is_finite() || self.fixed_dt <= 0.0 {
            return Err(ConfigError::InvalidFixedDt {
                value: self.fixed_dt,
            });
        }
        if !self.max_frame_dt.is_finite() || self.max_frame_dt < self.fixed_dt {
            return Err(ConfigError::InvalidMaxFrameDt {
                value: self.max_frame_dt,
                fixed_dt: self.fixed_dt,
            });
        }
        if self.max_frame_dt / self.fixed_dt > MAX_STEPS_PER_ADVANCE as f32 {
            return Err(ConfigError::TooManySteps {
                fixed_dt: self.fixed_dt,
                max_frame_dt: self.max_frame_dt,
                limit: MAX_STEPS_PER_ADVANCE,
            });
        }
        Ok(())
    }

    /// Upper bound on the fixed steps a single `advance` call can run.
    ///
    /// `advance` stops at this count even when f32 rounding in the accumulator
    /// would pay for one more step.
    pub fn max_steps_per_advance(&self) -> u32 {
        ((self.max_frame_dt / self.fixed_dt) as u32).saturating_add(1)
    }
}

/// Drives one point mass through fixed steps under a fixed set of force models
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    current: State,
    previous: State,
    accumulator: f32,
    step_count: u64,
    forces: Vec<ForceModel>,
}

impl Simulation {
    pub fn new(
        initial: State,
        config: SimulationConfig,
        forces: Vec<ForceModel>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if !initial.is_finite() {
            return Err(ConfigError::NonFiniteState { state: initial });
        }
        if let Some((index, model)) = forces.iter().enumerate().find(|(_, m)| !m.is_finite()) {
            return Err(ConfigError::NonFiniteForce {
                index,
                name: model.name(),
            });
        }

        debug!(
            fixed_dt = config.fixed_dt,
            max_frame_dt = config.max_frame_dt,
            force_models = forces.len(),
            "simulation created"
        );

        Ok(Self {
            config,
            current: initial,
            previous: initial,
            accumulator: 0.0,
            step_count: 0,
            forces,
        })
    }

    /// Feed `frame_dt` seconds of wall-clock time and run every fixed step it pays for.
    ///
    /// The delta is clamped into `[0, max_frame_dt]` first (NaN counts as zero),
    /// so a long stall costs at most `max_steps_per_advance` steps. Returns the
    /// number of fixed steps taken, never more than that bound.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let clamped = frame_dt.max(0.0).min(self.config.max_frame_dt);
        if frame_dt > self.config.max_frame_dt {
            warn!(
                frame_dt,
                max_frame_dt = self.config.max_frame_dt,
                "frame delta clamped"
            );
        }

        self.accumulator += clamped;
        let max_steps = self.config.max_steps_per_advance();
        let mut steps: u32 = 0;
        while self.accumulator >= self.config.fixed_dt {
            if steps == max_steps {
                warn!(
                    steps,
                    accumulator = self.accumulator,
                    "step limit reached, dropping whole steps from the accumulator"
                );
                self.accumulator %= self.config.fixed_dt;
                break;
            }
            self.fixed_step();
            self.accumulator -= self.config.fixed_dt;
            steps += 1;
        }

        debug_assert!(
            self.accumulator >= 0.0 && self.accumulator < self.config.fixed_dt,
            "time accumulator {} escaped [0, {})",
            self.accumulator,
            self.config.fixed_dt
        );
        debug!(frame_dt = clamped, steps, step_count = self.step_count, "advanced");
        steps
    }

    /// Run exactly `steps` fixed steps, leaving the time accumulator untouched
    pub fn run_steps(&mut self, steps: u64) {
        for _ in 0..steps {
            self.fixed_step();
        }
    }

    fn fixed_step(&mut self) {
        self.previous = self.current;
        let forces = ForceAccumulator::collect(&self.forces);
        integrator::step(&mut self.current, &forces, self.config.fixed_dt);
        self.step_count += 1;
        trace!(step = self.step_count, state = ?self.current, "fixed step");
    }

    pub fn current_state(&self) -> &State {
        &self.current
    }

    /// State exactly one fixed step before `current_state`
    pub fn previous_state(&self) -> &State {
        &self.previous
    }

    /// Fraction of the next fixed step already elapsed, in `[0, 1)`
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.config.fixed_dt
    }

    /// Blend of the previous and current states at [`Simulation::alpha`]
    pub fn interpolated_state(&self) -> State {
        State::lerp(&self.previous, &self.current, self.alpha())
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Unconsumed wall-clock time in seconds
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Simulated time covered by the fixed steps taken so far
    pub fn elapsed(&self) -> f64 {
        self.step_count as f64 * f64::from(self.config.fixed_dt)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn forces(&self) -> &[ForceModel] {
        &self.forces
    }
}
