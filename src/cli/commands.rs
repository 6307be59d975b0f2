// ============================================================
// Layer 1 — Subcommands
// ============================================================
// Argument definitions and the handler for each subcommand. The
// handlers only parse/print — the real work happens in Layer 2.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Subcommand;

use crate::application::eval_use_case::EvalUseCase;
use crate::application::pipeline::PipelineContext;
use crate::application::predict_use_case::PredictUseCase;
use crate::data::loader::TsvLoader;
use crate::domain::sentence_pair::SentencePair;
use crate::infra::config::PipelineConfig;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score one or more sentence pairs for similarity
    Predict {
        /// Path to the run configuration file
        #[arg(short, long, default_value = "config.json")]
        config: PathBuf,

        /// First sentence (requires --second)
        #[arg(long, requires = "second")]
        first: Option<String>,

        /// Second sentence (requires --first)
        #[arg(long, requires = "first")]
        second: Option<String>,

        /// Two-column TSV file of sentence pairs to score
        #[arg(long, conflicts_with_all = ["first", "second"])]
        pairs_file: Option<PathBuf>,
    },

    /// Evaluate the model on one of the configured datasets
    Eval {
        /// Path to the run configuration file
        #[arg(short, long, default_value = "config.json")]
        config: PathBuf,

        /// Name of the dataset to evaluate (a key of data_paths)
        #[arg(short, long, default_value = "test")]
        dataset: String,

        /// Examples per forward pass
        #[arg(short, long, default_value_t = 64)]
        batch_size: usize,

        /// CSV file to append the evaluation summary to
        /// (default: <checkpoint_dir>/metrics.csv)
        #[arg(long)]
        metrics_file: Option<PathBuf>,
    },
}

impl Command {
    pub fn run(self) -> Result<()> {
        match self {
            Command::Predict { config, first, second, pairs_file } => {
                run_predict(&config, first, second, pairs_file)
            }
            Command::Eval { config, dataset, batch_size, metrics_file } => {
                run_eval(&config, &dataset, batch_size, metrics_file)
            }
        }
    }
}

fn run_predict(
    config_path: &PathBuf,
    first: Option<String>,
    second: Option<String>,
    pairs_file: Option<PathBuf>,
) -> Result<()> {
    let config = PipelineConfig::load(config_path)?;
    let context = PipelineContext::build(&config)?;

    let pairs = match (first, second, pairs_file) {
        (Some(first), Some(second), _) => vec![SentencePair { first, second }],
        (_, _, Some(path)) => {
            let pairs = TsvLoader::load_pairs_file(&path)?;
            if pairs.is_empty() {
                bail!("'{}' contains no sentence pairs", path.display());
            }
            pairs
        }
        _ => demo_pairs(),
    };

    let results = PredictUseCase::new(&context).run(pairs)?;
    for result in &results {
        println!(
            "{:.4}  \"{}\"  /  \"{}\"",
            result.score, result.pair.first, result.pair.second
        );
        tracing::debug!(
            "Tokens: {:?} / {:?}",
            result.tokens.first,
            result.tokens.second
        );
    }
    Ok(())
}

fn run_eval(
    config_path: &PathBuf,
    dataset: &str,
    batch_size: usize,
    metrics_file: Option<PathBuf>,
) -> Result<()> {
    let config = PipelineConfig::load(config_path)?;
    let metrics_path =
        metrics_file.unwrap_or_else(|| config.checkpoint_dir.join("metrics.csv"));
    let context = PipelineContext::build(&config)?;

    let metrics = EvalUseCase::new(&context).run(dataset, batch_size, Some(&metrics_path))?;

    println!("dataset:   {dataset}");
    println!("examples:  {}", metrics.examples);
    println!("accuracy:  {:.4}", metrics.accuracy);
    println!("precision: {:.4}", metrics.precision);
    println!("recall:    {:.4}", metrics.recall);
    println!("f1:        {:.4}", metrics.f1);
    println!(
        "confusion: [[{}, {}], [{}, {}]]",
        metrics.confusion[0][0], metrics.confusion[0][1],
        metrics.confusion[1][0], metrics.confusion[1][1]
    );
    Ok(())
}

/// A handful of pairs to score when the user gives none — shows the
/// output format without needing an input file.
fn demo_pairs() -> Vec<SentencePair> {
    [
        ("How do I connect?", "How do I connect to VPN?"),
        ("How do I reset my password?", "I forgot my password, what now?"),
        ("How do I reset my password?", "Where is the cafeteria?"),
    ]
    .into_iter()
    .map(|(first, second)| SentencePair {
        first:  first.to_string(),
        second: second.to_string(),
    })
    .collect()
}
