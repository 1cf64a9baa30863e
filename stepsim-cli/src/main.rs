mod watch;

use clap::{Parser, Subcommand};
use stepsim_core::diagnostics::{format_diagnostic, format_parse_error};
use stepsim_core::{check_determinism, run_scenario, RunError, ScenarioResult};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "stepsim")]
#[command(about = "stepsim - deterministic fixed-timestep point-mass simulator", long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario and print the final state
    Run {
        /// Path to the scenario file
        file: PathBuf,
    },
    /// Run a scenario and print one interpolated sample per frame
    Trace {
        /// Path to the scenario file
        file: PathBuf,
    },
    /// Run a scenario repeatedly and verify the results are bit-identical
    Check {
        /// Path to the scenario file
        file: PathBuf,
    },
    /// Re-run a scenario every time the file changes
    Watch {
        /// Path to the scenario file
        file: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run { file } => run_file(&file),
        Commands::Trace { file } => trace_file(&file),
        Commands::Check { file } => check_file(&file),
        Commands::Watch { file } => watch::watch_file(&file),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Run the scenario at `file`, printing any diagnostics against its source
pub(crate) fn load_and_run(file: &Path) -> Result<ScenarioResult, Box<dyn std::error::Error>> {
    let source = fs::read_to_string(file)?;
    let result = run_scenario(&source).map_err(|e| describe_run_error(e, &source))?;
    for warning in result.diagnostics.warnings() {
        eprintln!("{}", format_diagnostic(warning, &source));
    }
    Ok(result)
}

/// Render a run failure with line context from `source` where it has a span
fn describe_run_error(err: RunError, source: &str) -> String {
    match err {
        RunError::Parse(e) => format_parse_error(&e, source),
        RunError::Analysis(errors) => {
            let mut msg = String::new();
            for error in &errors {
                msg.push_str(&format_diagnostic(error, source));
                msg.push('\n');
            }
            msg.push_str(&RunError::Analysis(errors).to_string());
            msg
        }
        e => e.to_string(),
    }
}

pub(crate) fn print_summary(result: &ScenarioResult) {
    println!("{}", result.current);
    println!("Steps: {}", result.step_count);
    println!("Alpha: {}", result.alpha);
}

fn run_file(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let result = load_and_run(file)?;
    print_summary(&result);
    Ok(())
}

fn trace_file(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let result = load_and_run(file)?;

    println!("frame\tframe_dt\tsteps\talpha\tx\ty\tvx\tvy");
    for sample in &result.frames {
        let s = &sample.interpolated;
        println!(
            "{}\t{}\t{}\t{:.4}\t{}\t{}\t{}\t{}",
            sample.index,
            sample.frame_dt,
            sample.steps,
            sample.alpha,
            s.position.x,
            s.position.y,
            s.velocity.x,
            s.velocity.y
        );
    }
    print_summary(&result);
    Ok(())
}

fn check_file(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = fs::read_to_string(file)?;
    let report = check_determinism(&source).map_err(|e| describe_run_error(e, &source))?;

    println!("{}", report.first);
    if !report.passed() {
        return Err(format!(
            "determinism check failed after {} steps:\nrun 1:\n{}\nrun 2:\n{}\nreference:\n{}",
            report.step_count, report.first, report.second, report.reference
        )
        .into());
    }
    println!("Determinism check passed.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_errors_carry_line_context() {
        let source = "body at (0, 0)\nsimulate fixed_dt = 0.0\nsteps 1\n";
        let err = check_determinism(source).unwrap_err();
        let msg = describe_run_error(err, source);
        assert!(msg.contains("at line 2"), "{}", msg);
        assert!(msg.ends_with("scenario has 1 error(s)"), "{}", msg);

        let source = "body at (0, 0)\nsimulate fixed_dt = 0.01\nparticle p\n";
        let msg = describe_run_error(check_determinism(source).unwrap_err(), source);
        assert!(msg.starts_with("Parse error: Unexpected token: particle"), "{}", msg);
        assert!(msg.contains("at line 3"), "{}", msg);
    }
}
