// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// By programming against traits instead of concrete types,
// we can swap implementations without changing the code
// that uses them:
//   - TsvLoader implements PairSource
//   - A future JsonlLoader could also implement PairSource
//   - The application layer only sees PairSource
//
// The same applies to the model: the pipeline core treats it
// as a capability that accepts encoded batches and returns
// scores. It never needs to know the network architecture.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use std::collections::BTreeMap;

use anyhow::Result;

use crate::domain::sentence_pair::{EncodedPair, LabeledPair};

// ─── PairSource ───────────────────────────────────────────────────────────────
/// Any component that can load named, labelled sentence-pair datasets.
///
/// Implementations:
///   - TsvLoader → loads tab-separated files listed in the configuration
pub trait PairSource {
    /// Load every configured dataset, keyed by dataset name.
    /// BTreeMap keeps iteration order deterministic, which in turn
    /// keeps the vocabulary built from these datasets deterministic.
    fn load_all(&self) -> Result<BTreeMap<String, Vec<LabeledPair>>>;
}

// ─── SimilarityScorer ─────────────────────────────────────────────────────────
/// Any component that can turn encoded pairs into similarity scores.
///
/// The restored model behind this trait is already in evaluation mode:
/// scoring never updates weights and has no training-time side effects.
///
/// Implementations:
///   - Inferencer → the checkpoint-restored ABCNN model
pub trait SimilarityScorer {
    /// One similarity score in [0, 1] per input pair.
    fn score_pairs(&self, pairs: &[EncodedPair]) -> Result<Vec<f32>>;
}
