#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Slither session.

mod session;

use anyhow::Result as AnyResult;
use clap::Parser;
use slither_core::{GRID_COLUMNS, GRID_ROWS};

/// Arguments accepted by the Slither command-line interface.
#[derive(Debug, Parser)]
#[command(name = "slither", about = "Headless Slither simulation runner")]
struct Args {
    /// Raw frames to simulate.
    #[arg(long, default_value_t = 2_000)]
    ticks: u32,

    /// Session seed; omit for a fresh one from entropy.
    #[arg(long)]
    seed: Option<u64>,

    /// Human seats to claim at the first frame; zero watches the attract demo.
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=2))]
    humans: u8,

    /// Grid width in cells.
    #[arg(long, default_value_t = GRID_COLUMNS)]
    columns: u32,

    /// Grid height in cells.
    #[arg(long, default_value_t = GRID_ROWS)]
    rows: u32,
}

/// Entry point for the Slither command-line interface.
fn main() -> AnyResult<()> {
    let args = Args::parse();
    let report = session::run(session::Config {
        ticks: args.ticks,
        seed: args.seed,
        humans: args.humans,
        columns: args.columns,
        rows: args.rows,
    })?;

    print!("{}", report.final_frame);
    println!(
        "ticks {} rounds {} matches {} score {} - {} ({:?})",
        report.ticks,
        report.rounds,
        report.matches,
        report.scores[0],
        report.scores[1],
        report.phase,
    );
    Ok(())
}
