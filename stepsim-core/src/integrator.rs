use crate::engine::{ForceAccumulator, ForceModel, State};

/// Advance `state` by one fixed step of `dt` using semi-implicit Euler integration.
///
/// The order is fixed: velocity is kicked by the accumulated acceleration,
/// then damped, and only then used to move the position. Reordering these
/// changes the trajectory bit for bit.
pub fn step(state: &mut State, forces: &ForceAccumulator, dt: f32) {
    state.velocity += forces.acceleration * dt;
    state.velocity *= forces.damping_factor(dt);
    state.position += state.velocity * dt;
}

/// Run exactly `steps` fixed steps from `state` without any time accumulator
pub fn run_steps(mut state: State, models: &[ForceModel], steps: u64, dt: f32) -> State {
    for _ in 0..steps {
        let forces = ForceAccumulator::collect(models);
        step(&mut state, &forces, dt);
    }
    state
}
