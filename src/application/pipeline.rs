// ============================================================
// Layer 2 — Pipeline Assembly
// ============================================================
// Builds everything the use cases need, in dependency order:
//
//   configuration
//     → TSV datasets → vocabulary + encoded datasets
//     → pretrained word vectors → embedding matrix
//     → checkpoint compatibility check → restored model
//
// The vocabulary must be built from the SAME dataset files the
// checkpoint was trained on, in the same order, or index i would
// mean a different word than the weights assume. The architecture
// sidecar check catches size drift; it cannot catch content drift,
// so the dataset files are part of the checkpoint's contract.

use std::collections::BTreeMap;

use anyhow::{Context, Result};

use crate::data::dataset::PairDataset;
use crate::data::embedding::EmbeddingMatrix;
use crate::data::loader::TsvLoader;
use crate::data::prepare::prepare_datasets;
use crate::data::word_vectors::WordVectors;
use crate::domain::traits::PairSource;
use crate::domain::vocabulary::Vocabulary;
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::config::PipelineConfig;
use crate::ml::inferencer::Inferencer;
use crate::ml::model::AbcnnConfig;

/// Everything a use case needs, fully constructed and validated.
pub struct PipelineContext {
    pub vocabulary: Vocabulary,
    pub datasets:   BTreeMap<String, PairDataset>,
    pub inferencer: Inferencer,
    pub max_length: usize,
}

impl PipelineContext {
    pub fn build(config: &PipelineConfig) -> Result<Self> {
        // ── Step 1: load and encode the datasets ──────────────────────────
        let loader = TsvLoader::new(config.data_paths.clone());
        let raw = loader
            .load_all()
            .context("failed to load dataset files")?;

        let prepared = prepare_datasets(&raw, config.model.max_length)
            .context("failed to prepare datasets")?;
        tracing::info!(
            "Prepared {} dataset(s), vocabulary of {} tokens",
            prepared.datasets.len(),
            prepared.vocabulary.len()
        );

        // ── Step 2: pretrained vectors → embedding matrix ─────────────────
        let vectors = WordVectors::load(&config.embeddings.path, config.embeddings.size)
            .context("failed to load pretrained word vectors")?;
        let matrix = EmbeddingMatrix::build(&vectors, &prepared.vocabulary, config.embeddings.size);

        // ── Step 3: restore the model from the checkpoint ─────────────────
        let checkpoint = CheckpointManager::new(&config.checkpoint_dir);
        let model_config = AbcnnConfig::new(
            prepared.vocabulary.len(),
            config.embeddings.size,
            config.model.max_length,
            config.model.num_blocks,
            config.model.num_filters,
            config.model.filter_width,
            config.model.dropout,
        );
        let inferencer = Inferencer::from_checkpoint(&checkpoint, &model_config, &matrix)?;

        if let Some(history) = checkpoint.load_history()? {
            for (metric, values) in &history {
                if let Some(last) = values.last() {
                    tracing::info!(
                        "Checkpoint training history: {} ended at {:.4} after {} epoch(s)",
                        metric, last, values.len()
                    );
                }
            }
        }

        Ok(Self {
            vocabulary: prepared.vocabulary,
            datasets:   prepared.datasets,
            inferencer,
            max_length: config.model.max_length,
        })
    }
}
