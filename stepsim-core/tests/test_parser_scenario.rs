//! Tests for the scenario file parser

use glam::Vec2;
use stepsim_core::ast::ForceKind;
use stepsim_core::diagnostics::{format_parse_error, SourceLocation};
use stepsim_core::parse_scenario;

#[test]
fn test_parse_full_scenario() {
    let source = r#"
# launch
body at (1.5, -2.0) velocity (50.0, 100.0)
force gravity g = (0.0, -9.8)
force drag k = 0.1
force uniform accel = (0.5, 0.0) drag = 0.02   # wind
simulate fixed_dt = 0.02 max_frame_dt = 0.1
frames 0.016, 0.017 0.033
frames 0.05 repeat 3
"#;

    let scenario = parse_scenario(source).expect("should parse");

    assert_eq!(scenario.bodies.len(), 1);
    assert_eq!(scenario.bodies[0].position, Vec2::new(1.5, -2.0));
    assert_eq!(scenario.bodies[0].velocity, Vec2::new(50.0, 100.0));

    assert_eq!(scenario.forces.len(), 3);
    assert_eq!(scenario.forces[0].kind, ForceKind::Gravity { g: Vec2::new(0.0, -9.8) });
    assert_eq!(scenario.forces[1].kind, ForceKind::Drag { k: 0.1 });
    assert_eq!(
        scenario.forces[2].kind,
        ForceKind::Uniform {
            accel: Vec2::new(0.5, 0.0),
            drag: 0.02
        }
    );

    assert_eq!(scenario.simulate.fixed_dt, 0.02);
    assert_eq!(scenario.simulate.max_frame_dt, Some(0.1));

    let deltas: Vec<f32> = scenario.frame_deltas().collect();
    assert_eq!(deltas, vec![0.016, 0.017, 0.033, 0.05, 0.05, 0.05]);
    assert_eq!(scenario.total_steps(), 0);
}

#[test]
fn test_parse_defaults() {
    let scenario = parse_scenario("body at (0, 0)\nsimulate fixed_dt = 0.01\nsteps 20\nsteps 5\n")
        .expect("should parse");

    assert_eq!(scenario.bodies[0].velocity, Vec2::ZERO);
    assert_eq!(scenario.simulate.max_frame_dt, None);
    assert!(scenario.forces.is_empty());
    assert_eq!(scenario.total_steps(), 25);
}

#[test]
fn test_parse_error_spans_point_at_line() {
    let source = "body at (0.0, 0.0)\nsimulate fixed_dt = 0.01\nforce magnet k = 3.0\n";

    let err = parse_scenario(source).unwrap_err();
    assert_eq!(err.to_string(), "Unknown force type: magnet");

    let span = err.span().expect("error should carry a span");
    assert_eq!(span.location(source), SourceLocation { line: 3, column: 1 });

    let formatted = format_parse_error(&err, source);
    assert!(formatted.contains("at line 3: force magnet k = 3.0"), "{}", formatted);
}

#[test]
fn test_parse_rejects_malformed_lines() {
    let cases = [
        ("body (0, 0)\nsimulate fixed_dt = 0.01", "Expected 'at'"),
        ("body at (0, 0, 0)\nsimulate fixed_dt = 0.01", "two components"),
        ("body at (0, 0) speed (1, 1)\nsimulate fixed_dt = 0.01", "Expected 'velocity'"),
        ("body at (0, 0)\nsimulate dt = 0.01", "Expected 'fixed_dt ='"),
        ("body at (0, 0)\nsimulate max_frame_dt = 0.2 fixed_dt = 0.01", "first"),
        ("body at (0, 0)\nsimulate fixed_dt = fast", "Invalid number"),
        ("body at (0, 0)\nsimulate fixed_dt = 0.01\nframes", "at least one frame delta"),
        ("body at (0, 0)\nsimulate fixed_dt = 0.01\nframes 0.1 repeat -2", "Invalid repeat count"),
        ("body at (0, 0)\nsimulate fixed_dt = 0.01\nsteps many", "Invalid step count"),
        ("body at (0, 0)\nsimulate fixed_dt = 0.01\nforce gravity g = (0, -9.8) extra", "trailing"),
        ("body at (0, 0)\nsimulate fixed_dt = 0.01\nsimulate fixed_dt = 0.02", "Duplicate 'simulate'"),
        ("body at (0, 0)\nsimulate fixed_dt = 0.01\nparticle p", "Unexpected token: particle"),
    ];

    for (source, expected) in cases {
        let err = parse_scenario(source).unwrap_err();
        assert!(
            err.to_string().contains(expected),
            "error '{}' for {:?} should mention '{}'",
            err,
            source,
            expected
        );
    }
}

#[test]
fn test_parse_requires_body_and_simulate() {
    let err = parse_scenario("body at (0, 0)\nsteps 1").unwrap_err();
    assert!(err.to_string().contains("Missing 'simulate'"));
    assert!(err.span().is_none());

    let err = parse_scenario("simulate fixed_dt = 0.01\nsteps 1").unwrap_err();
    assert!(err.to_string().contains("Missing 'body'"));
}

#[test]
fn test_total_steps_saturates() {
    let scenario = parse_scenario(
        "body at (0, 0)\nsimulate fixed_dt = 0.01\nsteps 18446744073709551615\nsteps 1\n",
    )
    .expect("should parse");
    assert_eq!(scenario.total_steps(), u64::MAX);
}
