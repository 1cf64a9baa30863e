use crate::diagnostics::Span;
use glam::Vec2;

/// A parsed scenario file
#[derive(Debug, Clone)]
pub struct Scenario {
    pub bodies: Vec<BodyDecl>,
    pub forces: Vec<ForceDecl>,
    pub simulate: SimulateDecl,
    pub frames: Vec<FramesDecl>,
    pub steps: Vec<StepsDecl>,
}

impl Scenario {
    /// Every frame delta in declaration order, repeats expanded
    pub fn frame_deltas(&self) -> impl Iterator<Item = f32> + '_ {
        self.frames.iter().flat_map(|f| f.deltas())
    }

    /// Sum of all `steps` declarations, saturating at `u64::MAX`
    pub fn total_steps(&self) -> u64 {
        self.steps
            .iter()
            .fold(0u64, |total, s| total.saturating_add(s.count))
    }
}

/// Body declaration: `body at (x, y) velocity (vx, vy)`
#[derive(Debug, Clone)]
pub struct BodyDecl {
    pub position: Vec2,
    pub velocity: Vec2,
    pub span: Option<Span>,
}

/// Force declaration: `force kind params...`
#[derive(Debug, Clone)]
pub struct ForceDecl {
    pub kind: ForceKind,
    pub span: Option<Span>,
}

/// Force kinds
#[derive(Debug, Clone, PartialEq)]
pub enum ForceKind {
    Gravity { g: Vec2 },                   // force gravity g = (x, y)
    Drag { k: f32 },                       // force drag k = c
    Uniform { accel: Vec2, drag: f32 },    // force uniform accel = (x, y) drag = c
}

/// Simulation configuration: `simulate fixed_dt = x max_frame_dt = y`
#[derive(Debug, Clone)]
pub struct SimulateDecl {
    pub fixed_dt: f32,
    pub max_frame_dt: Option<f32>,
    pub span: Option<Span>,
}

/// Frame deltas: `frames a, b, c` or `frames d repeat n`
#[derive(Debug, Clone)]
pub struct FramesDecl {
    pub deltas: Vec<f32>,
    pub repeat: u32,
    pub span: Option<Span>,
}

impl FramesDecl {
    pub fn deltas(&self) -> impl Iterator<Item = f32> + '_ {
        (0..self.repeat).flat_map(move |_| self.deltas.iter().copied())
    }
}

/// Fixed step count: `steps n`
#[derive(Debug, Clone)]
pub struct StepsDecl {
    pub count: u64,
    pub span: Option<Span>,
}
