// ============================================================
// Layer 1 — Command-Line Interface
// ============================================================
// The outermost layer: parses arguments with clap's derive API
// and dispatches to the matching use case. Nothing below this
// layer knows the program has a command line.
//
// Reference: clap documentation (derive tutorial)

pub mod commands;

use anyhow::Result;
use clap::Parser;

use commands::Command;

#[derive(Parser, Debug)]
#[command(
    name = "sentence-sim",
    about = "Score sentence-pair similarity with a pretrained attention-based CNN",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        self.command.run()
    }
}
