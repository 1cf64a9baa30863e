//! Static checks for parsed scenarios
//!
//! Catches configurations the simulation would reject, and flags the ones it
//! would accept but silently reshape (clamped frames, saturated damping).

use crate::ast::{ForceKind, Scenario};
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::simulation::{DEFAULT_MAX_FRAME_DT, MAX_STEPS_PER_ADVANCE};

/// Analyze a scenario and return diagnostics
pub fn analyze_scenario(scenario: &Scenario) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();

    // Check 1: exactly one body, with finite state
    for extra in scenario.bodies.iter().skip(1) {
        diagnostics.push(Diagnostic::error(
            "duplicate 'body' declaration (only one body is simulated)",
            extra.span,
        ));
    }
    for body in &scenario.bodies {
        if !body.position.is_finite() || !body.velocity.is_finite() {
            diagnostics.push(Diagnostic::error(
                "body position and velocity must be finite",
                body.span,
            ));
        }
    }

    // Check 2: timing
    let simulate = &scenario.simulate;
    let fixed_dt = simulate.fixed_dt;
    let max_frame_dt = simulate.max_frame_dt.unwrap_or(DEFAULT_MAX_FRAME_DT);
    let fixed_dt_valid = fixed_dt.is_finite() && fixed_dt > 0.0;
    if !fixed_dt_valid {
        diagnostics.push(Diagnostic::error(
            format!("fixed_dt must be positive and finite, got {}", fixed_dt),
            simulate.span,
        ));
    } else if !max_frame_dt.is_finite() || max_frame_dt < fixed_dt {
        diagnostics.push(Diagnostic::error(
            format!(
                "max_frame_dt ({}) must be finite and at least fixed_dt ({})",
                max_frame_dt, fixed_dt
            ),
            simulate.span,
        ));
    } else if max_frame_dt / fixed_dt > MAX_STEPS_PER_ADVANCE as f32 {
        diagnostics.push(Diagnostic::error(
            format!(
                "fixed_dt ({}) is too small for max_frame_dt ({}): one frame could need more than {} steps",
                fixed_dt, max_frame_dt, MAX_STEPS_PER_ADVANCE
            ),
            simulate.span,
        ));
    }

    // Check 3: forces
    if scenario.forces.is_empty() {
        diagnostics.push(Diagnostic::warning(
            "no force models declared; the body moves in a straight line",
            None,
        ));
    }
    let mut total_drag = 0.0_f32;
    for force in &scenario.forces {
        let finite = match &force.kind {
            ForceKind::Gravity { g } => g.is_finite(),
            ForceKind::Drag { k } => {
                total_drag += k;
                k.is_finite()
            }
            ForceKind::Uniform { accel, drag } => {
                total_drag += drag;
                accel.is_finite() && drag.is_finite()
            }
        };
        if !finite {
            diagnostics.push(Diagnostic::error(
                "force parameters must be finite",
                force.span,
            ));
        }
    }
    if fixed_dt_valid && total_drag.is_finite() && fixed_dt * total_drag > 1.0 {
        diagnostics.push(Diagnostic::warning(
            format!(
                "total drag {} exceeds 1/fixed_dt; damping saturates and velocity is zeroed every step",
                total_drag
            ),
            simulate.span,
        ));
    }

    // Check 4: what to run
    match (scenario.steps.is_empty(), scenario.frames.is_empty()) {
        (false, false) => diagnostics.push(Diagnostic::error(
            "'steps' and 'frames' cannot be combined in one scenario",
            scenario.steps.first().and_then(|s| s.span),
        )),
        (true, true) => diagnostics.push(Diagnostic::error(
            "nothing to run: declare 'frames' or 'steps'",
            None,
        )),
        _ => {}
    }

    // Check 5: frame deltas
    for frames in &scenario.frames {
        for &delta in &frames.deltas {
            if !delta.is_finite() {
                diagnostics.push(Diagnostic::error(
                    format!("frame delta {} is not finite", delta),
                    frames.span,
                ));
            } else if delta < 0.0 {
                diagnostics.push(Diagnostic::warning(
                    format!("negative frame delta {} counts as zero", delta),
                    frames.span,
                ));
            } else if delta > max_frame_dt {
                diagnostics.push(Diagnostic::warning(
                    format!(
                        "frame delta {} exceeds max_frame_dt {} and will be clamped",
                        delta, max_frame_dt
                    ),
                    frames.span,
                ));
            }
        }
    }

    diagnostics
}
