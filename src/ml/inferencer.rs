// ============================================================
// Layer 5 — Inferencer
// ============================================================
// Wraps a restored model for scoring. Owns the backend choice:
// inference runs on the NdArray CPU backend, so callers never
// see a Backend type parameter.
//
// The inferencer is the only place tensors are read back into
// plain Vec<f32> — everything above it works with scores, not
// tensors.

use anyhow::{anyhow, bail, Context, Result};
use burn::prelude::*;

use crate::data::batcher::PairBatch;
use crate::data::embedding::EmbeddingMatrix;
use crate::domain::sentence_pair::EncodedPair;
use crate::domain::traits::SimilarityScorer;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::{AbcnnConfig, AbcnnModel};

pub type InferBackend = burn::backend::NdArray;
pub type InferDevice  = burn::backend::ndarray::NdArrayDevice;

pub struct Inferencer {
    model:      AbcnnModel<InferBackend>,
    device:     InferDevice,
    max_length: usize,
}

impl Inferencer {
    /// Build the configured architecture, check it against the
    /// checkpoint's recorded architecture, then restore the weights.
    pub fn from_checkpoint(
        checkpoint: &CheckpointManager,
        config: &AbcnnConfig,
        matrix: &EmbeddingMatrix,
    ) -> Result<Self> {
        checkpoint
            .verify_compatible(config)
            .context("checkpoint is not compatible with the configured model")?;

        let device = InferDevice::default();
        let model: AbcnnModel<InferBackend> = config.init(matrix, &device);
        let model = checkpoint
            .load_model(model, &device)
            .context("failed to restore model weights")?;

        Ok(Self {
            model,
            device,
            max_length: config.max_length,
        })
    }

    /// Score pre-encoded pairs. Each sequence must already be exactly
    /// max_length long (the featurizer's contract).
    pub fn score(&self, pairs: &[EncodedPair]) -> Result<Vec<f32>> {
        if pairs.is_empty() {
            return Ok(Vec::new());
        }
        for (i, pair) in pairs.iter().enumerate() {
            if pair.first_ids.len() != self.max_length
                || pair.second_ids.len() != self.max_length
            {
                bail!(
                    "pair {} has sequence lengths {}/{}, expected {}",
                    i,
                    pair.first_ids.len(),
                    pair.second_ids.len(),
                    self.max_length
                );
            }
        }

        let batch_size = pairs.len();
        let first  = self.stack(pairs, |p| &p.first_ids, batch_size);
        let second = self.stack(pairs, |p| &p.second_ids, batch_size);

        self.read_scores(self.model.similarity(first, second))
    }

    /// Score an already-batched tensor pair (the evaluation path).
    pub fn score_batch(&self, batch: &PairBatch<InferBackend>) -> Result<Vec<f32>> {
        self.read_scores(
            self.model
                .similarity(batch.first.clone(), batch.second.clone()),
        )
    }

    fn stack(
        &self,
        pairs: &[EncodedPair],
        side: impl Fn(&EncodedPair) -> &Vec<u32>,
        batch_size: usize,
    ) -> Tensor<InferBackend, 2, Int> {
        let flat: Vec<i32> = pairs
            .iter()
            .flat_map(|p| side(p).iter().map(|&x| x as i32))
            .collect();
        Tensor::<InferBackend, 1, Int>::from_ints(flat.as_slice(), &self.device)
            .reshape([batch_size, self.max_length])
    }

    fn read_scores(&self, scores: Tensor<InferBackend, 1>) -> Result<Vec<f32>> {
        scores
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow!("cannot read scores from tensor: {e:?}"))
    }
}

impl SimilarityScorer for Inferencer {
    fn score_pairs(&self, pairs: &[EncodedPair]) -> Result<Vec<f32>> {
        self.score(pairs)
    }
}
