//! Nodal - reference circuit runner
//!
//! Builds one of the built-in circuits, solves it, steps it forward and
//! prints the results.
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=debug nodal rc --ticks 2000
//! ```

use clap::Parser;
use nodal_core::{
    demo::{report, run, ReferenceCircuit},
    error::Result,
    solver::{DEFAULT_MAX_ITERATIONS, DEFAULT_RESET_DIODES_EVERY_N_TICKS},
    CircuitSettings, DEFAULT_TIME_STEP,
};

/// Small-signal nodal circuit solver
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Reference circuit to simulate
    #[arg(value_enum, value_name = "CIRCUIT")]
    circuit: ReferenceCircuit,

    /// Number of time steps after the initial solve
    #[arg(short, long, default_value_t = 0)]
    ticks: u64,

    /// Maximum solves per step while diodes settle
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,

    /// Reset diodes to Hi-Z every N ticks (0 disables)
    #[arg(long, default_value_t = DEFAULT_RESET_DIODES_EVERY_N_TICKS)]
    reset_diodes_every: u64,

    /// Time step in seconds
    #[arg(long, default_value_t = DEFAULT_TIME_STEP)]
    time_step: f64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let settings = CircuitSettings::new()
        .with_max_iterations(args.max_iterations)
        .with_reset_diodes_every_n_ticks(args.reset_diodes_every)
        .with_time_step(args.time_step);

    let circuit = run(args.circuit, settings, args.ticks)?;
    print!("{}", report(&circuit));

    Ok(())
}
