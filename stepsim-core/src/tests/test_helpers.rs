//! Test helper utilities for stepsim tests

use crate::engine::{ForceModel, State};
use crate::simulation::{Simulation, SimulationConfig};
use glam::Vec2;
use std::path::PathBuf;

/// Check if two f32 values are approximately equal within tolerance
pub fn approx_eq_f32(a: f32, b: f32, tol: f32) -> bool {
    (a - b).abs() <= tol
}

/// Check if two vectors are approximately equal component-wise
pub fn approx_eq_vec2(a: Vec2, b: Vec2, tol: f32) -> bool {
    approx_eq_f32(a.x, b.x, tol) && approx_eq_f32(a.y, b.y, tol)
}

/// Assert that a state matches the given raw f32 bit patterns
/// (pos.x, pos.y, vel.x, vel.y)
pub fn assert_state_bits(state: &State, bits: [u32; 4]) {
    let expected = State::new(
        Vec2::new(f32::from_bits(bits[0]), f32::from_bits(bits[1])),
        Vec2::new(f32::from_bits(bits[2]), f32::from_bits(bits[3])),
    );
    assert!(
        state.bit_eq(&expected),
        "state mismatch:\n{}\nexpected:\n{}",
        state,
        expected
    );
}

/// The projectile used throughout the tests: launched from the origin at
/// (50, 100) m/s under gravity (0, -9.8) with drag 0.1
pub fn projectile_state() -> State {
    State::new(Vec2::ZERO, Vec2::new(50.0, 100.0))
}

pub fn projectile_forces() -> Vec<ForceModel> {
    vec![ForceModel::uniform(Vec2::new(0.0, -9.8), 0.1)]
}

pub fn projectile_simulation() -> Simulation {
    Simulation::new(
        projectile_state(),
        SimulationConfig::default(),
        projectile_forces(),
    )
    .expect("projectile configuration is valid")
}

/// Path to a scenario file under `tests/data`
pub fn scenario_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("data");
    path.push(filename);
    path
}

/// Load a scenario file from `tests/data`
pub fn load_scenario(filename: &str) -> String {
    let path = scenario_path(filename);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e))
}
