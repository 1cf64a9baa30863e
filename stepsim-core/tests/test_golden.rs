//! Golden tests - the reference projectile pinned to exact bit patterns

use stepsim_core::integrator::run_steps;
use stepsim_core::run_scenario;
use stepsim_core::tests::test_helpers::{
    assert_state_bits, load_scenario, projectile_forces, projectile_simulation, projectile_state,
};

/// pos (315.8377, 271.07574), vel (18.385002, -25.133986) after 1000 steps of 0.01 s
const PROJECTILE_1000_STEPS: [u32; 4] = [0x439d_eb3a, 0x4387_89b2, 0x4193_147c, 0xc1c9_1267];

#[test]
fn test_projectile_golden_plain_runner() {
    let state = run_steps(projectile_state(), &projectile_forces(), 1000, 0.01);
    assert_state_bits(&state, PROJECTILE_1000_STEPS);
}

#[test]
fn test_projectile_golden_driver() {
    let mut sim = projectile_simulation();
    // 0.05 s frames drain cleanly: 200 frames, 1000 steps
    for _ in 0..200 {
        sim.advance(0.05);
    }
    assert_eq!(sim.step_count(), 1000);
    assert_state_bits(sim.current_state(), PROJECTILE_1000_STEPS);
}

#[test]
fn test_projectile_golden_scenario_file() {
    let result = run_scenario(&load_scenario("projectile_steps.sim")).expect("scenario failed");
    assert_eq!(result.step_count, 1000);
    assert!(result.frames.is_empty());
    assert_state_bits(&result.current, PROJECTILE_1000_STEPS);
}

#[test]
fn test_projectile_display() {
    let state = run_steps(projectile_state(), &projectile_forces(), 1000, 0.01);
    assert_eq!(
        state.to_string(),
        "Position: 315.8377, 271.07574\nVelocity: 18.385002, -25.133986"
    );
}
