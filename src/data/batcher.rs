// ============================================================
// Layer 4 — Pair Batcher
// ============================================================
// Implements Burn's Batcher trait to stack encoded pairs into
// model-ready tensors.
//
// Input:  Vec of N PairSamples, each with two sequences of length L
// Output: PairBatch with two [N, L] Int tensors plus [N] labels
//
// We flatten each side's ids into one long Vec, then reshape:
//   [s1_t1 ... s1_tL, s2_t1 ... sN_tL] → [N, L]
//
// This only works because the featurizer guarantees every
// sequence is already exactly max_length long — no dynamic
// padding happens here.
//
// Reference: Burn Book §4 (Batcher)

use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::data::dataset::PairSample;

// ─── PairBatch ────────────────────────────────────────────────────────────────
/// A batch of sentence pairs ready for the model forward pass.
///
/// B is the Burn Backend — generic so the same batcher works on
/// any device.
#[derive(Debug, Clone)]
pub struct PairBatch<B: Backend> {
    /// First sentences — shape: [batch_size, max_length]
    pub first: Tensor<B, 2, Int>,

    /// Second sentences — shape: [batch_size, max_length]
    pub second: Tensor<B, 2, Int>,

    /// Duplicate labels (0 or 1) — shape: [batch_size]
    pub labels: Tensor<B, 1, Int>,
}

// ─── PairBatcher ──────────────────────────────────────────────────────────────
/// Holds the target device so tensors are created in the right place.
#[derive(Clone, Debug)]
pub struct PairBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> PairBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<PairSample, PairBatch<B>> for PairBatcher<B> {
    fn batch(&self, items: Vec<PairSample>) -> PairBatch<B> {
        let batch_size = items.len();
        // All sequences share one length (featurizer invariant)
        let seq_len = items[0].encoded.first_ids.len();

        // Burn uses i32 slices for Int tensor construction
        let first_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.encoded.first_ids.iter().map(|&x| x as i32))
            .collect();

        let second_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.encoded.second_ids.iter().map(|&x| x as i32))
            .collect();

        let labels: Vec<i32> = items.iter().map(|s| s.label as i32).collect();

        let first = Tensor::<B, 1, Int>::from_ints(first_flat.as_slice(), &self.device)
            .reshape([batch_size, seq_len]);

        let second = Tensor::<B, 1, Int>::from_ints(second_flat.as_slice(), &self.device)
            .reshape([batch_size, seq_len]);

        let labels = Tensor::<B, 1, Int>::from_ints(labels.as_slice(), &self.device);

        PairBatch { first, second, labels }
    }
}
