use crate::analyzer::analyze_scenario;
use crate::ast::{ForceKind, Scenario};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::engine::{ForceModel, State};
use crate::integrator;
use crate::parser::{parse_scenario, ParseError};
use crate::simulation::{ConfigError, Simulation, SimulationConfig};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Failure to load or run a scenario
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to read scenario: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("scenario has {} error(s)", .0.len())]
    Analysis(Vec<Diagnostic>),

    #[error("scenario declares no body")]
    MissingBody,

    #[error("invalid simulation configuration: {0}")]
    Config(#[from] ConfigError),
}

/// One presentation sample, taken after each frame is fed to the driver
#[derive(Debug, Clone, Copy)]
pub struct FrameSample {
    pub index: usize,
    pub frame_dt: f32,
    pub steps: u32,
    pub alpha: f32,
    pub interpolated: State,
}

/// Final result of running a scenario
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    pub current: State,
    pub previous: State,
    pub alpha: f32,
    pub step_count: u64,
    pub frames: Vec<FrameSample>,
    pub diagnostics: Diagnostics,
}

/// Outcome of running one scenario through three independent paths
#[derive(Debug, Clone)]
pub struct DeterminismReport {
    pub first: State,
    pub second: State,
    /// Same number of steps through the plain fixed-step runner
    pub reference: State,
    pub step_count: u64,
}

impl DeterminismReport {
    /// True when all three runs produced byte-identical snapshots
    pub fn passed(&self) -> bool {
        let bytes = self.first.to_ne_bytes();
        bytes == self.second.to_ne_bytes() && bytes == self.reference.to_ne_bytes()
    }
}

/// Convert the scenario's force declarations into force models, in declaration order
pub fn force_models(scenario: &Scenario) -> Vec<ForceModel> {
    scenario
        .forces
        .iter()
        .map(|decl| match decl.kind {
            ForceKind::Gravity { g } => ForceModel::gravity(g),
            ForceKind::Drag { k } => ForceModel::linear_drag(k),
            ForceKind::Uniform { accel, drag } => ForceModel::uniform(accel, drag),
        })
        .collect()
}

/// Build a Simulation from a parsed Scenario
pub fn build_simulation(scenario: &Scenario) -> Result<Simulation, RunError> {
    let body = scenario.bodies.first().ok_or(RunError::MissingBody)?;
    let mut config = SimulationConfig::new(scenario.simulate.fixed_dt);
    if let Some(max_frame_dt) = scenario.simulate.max_frame_dt {
        config = config.with_max_frame_dt(max_frame_dt);
    }
    let sim = Simulation::new(
        State::new(body.position, body.velocity),
        config,
        force_models(scenario),
    )?;
    Ok(sim)
}

/// Parse, analyze and build, failing on any analysis error
pub fn build_simulation_from_source(
    source: &str,
) -> Result<(Simulation, Scenario, Diagnostics), RunError> {
    let scenario = parse_scenario(source)?;
    let diagnostics = analyze_scenario(&scenario);
    if diagnostics.has_errors() {
        return Err(RunError::Analysis(diagnostics.errors().cloned().collect()));
    }
    let sim = build_simulation(&scenario)?;
    Ok((sim, scenario, diagnostics))
}

/// Main entry point: parse and run a scenario
pub fn run_scenario(source: &str) -> Result<ScenarioResult, RunError> {
    let (mut sim, scenario, diagnostics) = build_simulation_from_source(source)?;

    let steps = scenario.total_steps();
    if steps > 0 {
        sim.run_steps(steps);
    }

    let mut frames = Vec::new();
    for (index, frame_dt) in scenario.frame_deltas().enumerate() {
        let steps = sim.advance(frame_dt);
        frames.push(FrameSample {
            index,
            frame_dt,
            steps,
            alpha: sim.alpha(),
            interpolated: sim.interpolated_state(),
        });
    }

    info!(
        step_count = sim.step_count(),
        frames = frames.len(),
        elapsed = sim.elapsed(),
        "scenario finished"
    );

    Ok(ScenarioResult {
        current: *sim.current_state(),
        previous: *sim.previous_state(),
        alpha: sim.alpha(),
        step_count: sim.step_count(),
        frames,
        diagnostics,
    })
}

pub fn run_scenario_file(path: impl AsRef<Path>) -> Result<ScenarioResult, RunError> {
    let source = std::fs::read_to_string(path)?;
    run_scenario(&source)
}

/// Run a scenario twice, then replay its step count without the accumulator
pub fn check_determinism(source: &str) -> Result<DeterminismReport, RunError> {
    let first = run_scenario(source)?;
    let second = run_scenario(source)?;

    let scenario = parse_scenario(source)?;
    let sim = build_simulation(&scenario)?;
    let reference = integrator::run_steps(
        *sim.current_state(),
        sim.forces(),
        first.step_count,
        sim.config().fixed_dt,
    );

    debug!(
        step_count = first.step_count,
        second_step_count = second.step_count,
        "determinism runs complete"
    );

    Ok(DeterminismReport {
        first: first.current,
        second: second.current,
        reference,
        step_count: first.step_count,
    })
}
