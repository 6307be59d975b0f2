// ============================================================
// sentence-sim — ABCNN sentence-pair similarity scoring
// ============================================================
// Layered layout, outermost to innermost:
//
//   Layer 1  cli          argument parsing, dispatch
//   Layer 2  application  use cases (predict, eval)
//   Layer 3  domain       pairs, vocabulary, the scorer trait
//   Layer 4  data         files → tokens → indices → batches
//   Layer 5  ml           the ABCNN model, inference
//   Layer 6  infra        config, checkpoints, metrics
//
// Dependencies point downward only.

#![allow(dead_code)]

mod application;
mod cli;
mod data;
mod domain;
mod infra;
mod ml;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // RUST_LOG overrides; default keeps our own info-level logs
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sentence_sim=info")),
        )
        .init();

    cli::Cli::parse().run()
}
