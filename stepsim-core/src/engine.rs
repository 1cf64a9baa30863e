use glam::Vec2;
use std::fmt;

/// Physical state of a single point mass. Positions are in meters,
/// velocities in meters per second.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct State {
    pub position: Vec2,
    pub velocity: Vec2,
}

impl State {
    /// Size of the raw snapshot produced by [`State::to_ne_bytes`]
    pub const SNAPSHOT_LEN: usize = 16;

    pub fn new(position: Vec2, velocity: Vec2) -> Self {
        Self { position, velocity }
    }

    pub fn at_rest(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
        }
    }

    /// Linear interpolation `a + alpha * (b - a)` of both position and velocity.
    ///
    /// Presentation only: the result never feeds back into a simulation.
    pub fn lerp(a: &State, b: &State, alpha: f32) -> State {
        State {
            position: a.position + (b.position - a.position) * alpha,
            velocity: a.velocity + (b.velocity - a.velocity) * alpha,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }

    /// Bitwise comparison of every scalar field.
    ///
    /// Unlike `==` this treats `0.0` and `-0.0` as different and a NaN as
    /// equal to an identical NaN, which is what reproducibility checks want.
    pub fn bit_eq(&self, other: &State) -> bool {
        self.scalars()
            .iter()
            .zip(other.scalars().iter())
            .all(|(a, b)| a.to_bits() == b.to_bits())
    }

    /// Native-endian memory image of (pos.x, pos.y, vel.x, vel.y).
    ///
    /// Not a file format: byte order follows the host and nothing is versioned.
    pub fn to_ne_bytes(&self) -> [u8; Self::SNAPSHOT_LEN] {
        let mut bytes = [0u8; Self::SNAPSHOT_LEN];
        for (chunk, value) in bytes.chunks_exact_mut(4).zip(self.scalars()) {
            chunk.copy_from_slice(&value.to_ne_bytes());
        }
        bytes
    }

    fn scalars(&self) -> [f32; 4] {
        [
            self.position.x,
            self.position.y,
            self.velocity.x,
            self.velocity.y,
        ]
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Position: {}, {}", self.position.x, self.position.y)?;
        write!(f, "Velocity: {}, {}", self.velocity.x, self.velocity.y)
    }
}

/// A force source acting on the simulated body.
///
/// The set is closed: every model contributes a constant acceleration and a
/// drag coefficient into the per-step [`ForceAccumulator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForceModel {
    /// Uniform gravitational field
    Gravity { acceleration: Vec2 },
    /// Velocity-proportional drag, `dv/dt = -k * v`
    LinearDrag { k: f32 },
    /// Arbitrary constant acceleration plus drag
    Uniform { acceleration: Vec2, drag: f32 },
}

impl ForceModel {
    pub fn gravity(acceleration: Vec2) -> Self {
        Self::Gravity { acceleration }
    }

    pub fn linear_drag(k: f32) -> Self {
        Self::LinearDrag { k }
    }

    pub fn uniform(acceleration: Vec2, drag: f32) -> Self {
        Self::Uniform { acceleration, drag }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Gravity { .. } => "gravity",
            Self::LinearDrag { .. } => "drag",
            Self::Uniform { .. } => "uniform",
        }
    }

    pub fn acceleration(&self) -> Vec2 {
        match self {
            Self::Gravity { acceleration } | Self::Uniform { acceleration, .. } => *acceleration,
            Self::LinearDrag { .. } => Vec2::ZERO,
        }
    }

    pub fn drag(&self) -> f32 {
        match self {
            Self::Gravity { .. } => 0.0,
            Self::LinearDrag { k } => *k,
            Self::Uniform { drag, .. } => *drag,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.acceleration().is_finite() && self.drag().is_finite()
    }

    /// Add this model's acceleration and drag into `forces`
    pub fn contribute(&self, forces: &mut ForceAccumulator) {
        forces.add_acceleration(self.acceleration());
        forces.add_drag(self.drag());
    }
}

/// Scratch space that force models write into for one fixed step.
///
/// Drag combines additively: coefficients are summed here and turned into a
/// single damping factor by [`ForceAccumulator::damping_factor`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ForceAccumulator {
    pub acceleration: Vec2,
    pub drag: f32,
}

impl ForceAccumulator {
    pub const NEUTRAL: Self = Self {
        acceleration: Vec2::ZERO,
        drag: 0.0,
    };

    pub fn new() -> Self {
        Self::NEUTRAL
    }

    /// Start from neutral and let every model contribute, in slice order
    pub fn collect(models: &[ForceModel]) -> Self {
        let mut forces = Self::new();
        for model in models {
            model.contribute(&mut forces);
        }
        forces
    }

    pub fn add_acceleration(&mut self, acceleration: Vec2) {
        self.acceleration += acceleration;
    }

    pub fn add_drag(&mut self, drag: f32) {
        self.drag += drag;
    }

    /// Linear approximation of exponential decay, saturating at zero
    pub fn damping_factor(&self, dt: f32) -> f32 {
        (1.0 - dt * self.drag).max(0.0)
    }
}
