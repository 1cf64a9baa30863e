pub mod analyzer;
pub mod ast;
pub mod diagnostics;
pub mod engine;
pub mod integrator;
pub mod parser;
pub mod runtime;
pub mod simulation;

pub use analyzer::analyze_scenario;
pub use diagnostics::{Diagnostic, DiagnosticSeverity, Diagnostics, SourceLocation, Span};
pub use engine::{ForceAccumulator, ForceModel, State};
pub use parser::{parse_scenario, ParseError};
pub use runtime::{
    build_simulation, build_simulation_from_source, check_determinism, run_scenario,
    run_scenario_file, DeterminismReport, FrameSample, RunError, ScenarioResult,
};
pub use simulation::{ConfigError, Simulation, SimulationConfig};

// Test helpers module (public for integration tests)
// Always compiled - integration tests are separate crates and need access
pub mod tests;
