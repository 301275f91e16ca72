use clap::{Parser, Subcommand};

use crate::builtin::{BuiltinArgs, run_builtin};
use crate::error::Result;
use crate::inspect::{InspectArgs, run_inspect};
use crate::logging;
use crate::simulate::{SimulateArgs, run_simulate};
use crate::snap::{SnapArgs, run_snap};

#[derive(Debug, Parser)]
#[command(
    name = "scrollchor-doctor",
    about = "Inspect, snap and simulate scroll-choreographed pages headlessly",
    version
)]
pub struct Cli {
    /// Debug-level diagnostics on stderr.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Lay out a page and report its trigger and snap ranges.
    Inspect(InspectArgs),

    /// Resolve snap decisions for candidate scroll fractions.
    Snap(SnapArgs),

    /// Scroll through a page step by step and report section frames.
    Simulate(SimulateArgs),

    /// Print the built-in showcase definition.
    Builtin(BuiltinArgs),
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Inspect(args) => run_inspect(args),
        Commands::Snap(args) => run_snap(args),
        Commands::Simulate(args) => run_simulate(args),
        Commands::Builtin(args) => run_builtin(args),
    }
}
