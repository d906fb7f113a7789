//! CLI argument parsing for the dispatch-worker binary.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dispatch-worker", about = "Delivery load planning and route sequencing worker")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the worker server (default if no subcommand given)
    Serve,
    /// Plan one vehicle's load from a JSON request and print the result
    PlanLoad {
        /// Request file, or "-" for stdin
        #[arg(long, default_value = "-")]
        input: String,
    },
    /// Sequence a route from a JSON request and print the result
    SequenceRoute {
        /// Request file, or "-" for stdin
        #[arg(long, default_value = "-")]
        input: String,
    },
}
