// ============================================================
// Layer 2 — Evaluate Use Case
// ============================================================
// Runs the restored model over one labelled dataset and reports
// accuracy, macro precision/recall/F1 and the confusion matrix.
// Samples are batched in file order (no shuffling) so repeated
// evaluations of the same checkpoint give identical numbers.
//
// Score ≥ 0.5 counts as a "duplicate" prediction.

use std::path::Path;

use anyhow::{bail, Result};
use burn::data::dataloader::batcher::Batcher;

use crate::application::pipeline::PipelineContext;
use crate::data::batcher::PairBatcher;
use crate::infra::metrics::{EvalMetrics, MetricsLogger};
use crate::ml::inferencer::InferBackend;

const DECISION_THRESHOLD: f32 = 0.5;

pub struct EvalUseCase<'a> {
    context: &'a PipelineContext,
}

impl<'a> EvalUseCase<'a> {
    pub fn new(context: &'a PipelineContext) -> Self {
        Self { context }
    }

    pub fn run(
        &self,
        dataset_name: &str,
        batch_size: usize,
        metrics_file: Option<&Path>,
    ) -> Result<EvalMetrics> {
        let Some(dataset) = self.context.datasets.get(dataset_name) else {
            let known: Vec<&str> = self.context.datasets.keys().map(String::as_str).collect();
            bail!(
                "no dataset named '{}' in the configuration (have: {})",
                dataset_name,
                known.join(", ")
            );
        };
        if batch_size == 0 {
            bail!("batch size must be at least 1");
        }

        tracing::info!(
            "Evaluating '{}': {} examples in batches of {}",
            dataset_name,
            dataset.sample_count(),
            batch_size
        );

        let batcher = PairBatcher::<InferBackend>::new(Default::default());
        let mut labels      = Vec::with_capacity(dataset.sample_count());
        let mut predictions = Vec::with_capacity(dataset.sample_count());

        for chunk in dataset.samples().chunks(batch_size) {
            let batch = batcher.batch(chunk.to_vec());
            let scores = self.context.inferencer.score_batch(&batch)?;

            labels.extend(chunk.iter().map(|s| s.label));
            predictions.extend(
                scores
                    .iter()
                    .map(|&s| (s >= DECISION_THRESHOLD) as u8),
            );
        }

        let metrics = EvalMetrics::compute(&labels, &predictions);
        metrics.log_summary(dataset_name);

        if let Some(path) = metrics_file {
            MetricsLogger::new(path).append(dataset_name, &metrics)?;
            tracing::info!("Metrics appended to '{}'", path.display());
        }

        Ok(metrics)
    }
}
