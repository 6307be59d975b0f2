// ============================================================
// Layer 3 — Sentence Pair Domain Types
// ============================================================
// The core concept of this system: two free-text sentences
// whose semantic similarity we want to score.
//
// The types here track the pair through the pipeline:
//   SentencePair  → raw text as it arrives from the user or a file
//   LabeledPair   → a dataset row: a pair plus a 0/1 duplicate label
//   TokenizedPair → the pair after tokenisation (kept for inspection)
//   EncodedPair   → fixed-length vocabulary-index sequences, ready
//                   to be stacked into model input tensors
//
// Rules for this layer (as everywhere in domain/):
//   - NO Burn framework types
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Reference: Yin et al. (2016) ABCNN paper
//            Rust Book §5 (Structs)

use serde::{Deserialize, Serialize};

/// A raw sentence pair as supplied by the user or read from a dataset file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentencePair {
    pub first:  String,
    pub second: String,
}

impl SentencePair {
    /// Uses impl Into<String> so callers can pass &str or String.
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first:  first.into(),
            second: second.into(),
        }
    }
}

/// One labelled dataset row: a sentence pair plus its duplicate label.
///
/// The label is binary: 1 = the two sentences mean the same thing,
/// 0 = they do not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledPair {
    pub pair:  SentencePair,
    pub label: u8,
}

impl LabeledPair {
    pub fn new(pair: SentencePair, label: u8) -> Self {
        Self { pair, label }
    }
}

/// The tokenised form of a pair, returned alongside the encoded batch
/// so callers can inspect exactly what the model saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedPair {
    pub first:  Vec<String>,
    pub second: Vec<String>,
}

/// A featurised pair: two vocabulary-index sequences, each padded or
/// truncated to exactly the configured maximum length.
///
/// Invariants (enforced by the featurizer, relied on by the batcher):
///   - first_ids.len() == second_ids.len() == max_length
///   - every index is < vocabulary size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPair {
    pub first_ids:  Vec<u32>,
    pub second_ids: Vec<u32>,
}

impl EncodedPair {
    pub fn len(&self) -> usize {
        self.first_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first_ids.is_empty()
    }
}
