use std::path::PathBuf;

use clap::{Parser, Subcommand};
use psakit::commands::{self, IcerArgs, InputArgs, PairwiseArgs};
use psakit::init_logging;

#[derive(Parser, Debug)]
#[command(name = "psakit")]
#[command(about = "Summaries of probabilistic sensitivity analysis draws")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compare all strategies: NMB, frontier, MCE and EVPI
    Cea(InputArgs),
    /// Compare every strategy against a comparator: deltas, CEAC and INMB
    Pairwise(PairwiseArgs),
    /// Print the ICER table at one decision threshold
    Icer(IcerArgs),
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(args.log_file.as_deref(), &args.log_level)?;

    match &args.command {
        Command::Cea(input) => commands::run_cea(input)?,
        Command::Pairwise(pairwise) => commands::run_pairwise(pairwise)?,
        Command::Icer(icer) => commands::run_icer(icer)?,
    }

    tracing::debug!("done");
    Ok(())
}
