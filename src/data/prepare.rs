// ============================================================
// Layer 4 — Dataset Preparer
// ============================================================
// Turns the raw named datasets into model-ready form:
//
//   raw rows ──tokenize──► distinct token set ──► Vocabulary
//        │                                           │
//        └────────────encode against────────────────┘
//                          │
//                          ▼
//              BTreeMap<name, PairDataset>
//
// The vocabulary is built from tokens in FIRST-SEEN order while
// walking datasets in sorted (BTreeMap) name order, then rows in
// file order, then tokens left to right. The same input therefore
// always produces the same word → index mapping, which is what
// makes a restored checkpoint's embedding rows line up.

use std::collections::BTreeMap;

use crate::data::dataset::{PairDataset, PairSample};
use crate::data::featurizer::{Featurizer, FeaturizationError};
use crate::data::tokenizer::tokenize;
use crate::domain::sentence_pair::LabeledPair;
use crate::domain::vocabulary::Vocabulary;

/// Everything dataset preparation produces, handed onward as
/// read-only state for the rest of the pipeline.
pub struct PreparedData {
    /// Encoded datasets, keyed by the configured dataset name.
    pub datasets:   BTreeMap<String, PairDataset>,
    /// The word → index mapping built from the corpus.
    pub vocabulary: Vocabulary,
}

/// Tokenize every text field, build the vocabulary, and encode
/// every row to fixed-length index sequences.
pub fn prepare_datasets(
    raw:        &BTreeMap<String, Vec<LabeledPair>>,
    max_length: usize,
) -> Result<PreparedData, FeaturizationError> {
    // ── Pass 1: build the vocabulary ──────────────────────────────────────────
    // Insertion order is the deterministic walk described above.
    let mut vocabulary = Vocabulary::new();
    for rows in raw.values() {
        for row in rows {
            for token in tokenize(&row.pair.first) {
                vocabulary.insert(&token);
            }
            for token in tokenize(&row.pair.second) {
                vocabulary.insert(&token);
            }
        }
    }
    tracing::info!(
        "Vocabulary built: {} distinct tokens (+2 reserved)",
        vocabulary.corpus_tokens().len()
    );

    if max_length == 0 {
        return Err(FeaturizationError::ZeroMaxLength);
    }

    // ── Pass 2: encode every row against the finished vocabulary ─────────────
    let featurizer = Featurizer::new(&vocabulary, max_length);
    let mut datasets = BTreeMap::new();

    for (name, rows) in raw {
        let mut samples = Vec::with_capacity(rows.len());
        for row in rows {
            let (encoded, _tokens) = featurizer.encode_pair(&row.pair);
            samples.push(PairSample {
                encoded,
                label: row.label,
            });
        }
        tracing::debug!("Encoded dataset '{}': {} samples", name, samples.len());
        datasets.insert(name.clone(), PairDataset::new(samples));
    }

    Ok(PreparedData { datasets, vocabulary })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sentence_pair::SentencePair;

    fn raw_one(name: &str, rows: &[(&str, &str, u8)]) -> BTreeMap<String, Vec<LabeledPair>> {
        let mut m = BTreeMap::new();
        m.insert(
            name.to_string(),
            rows.iter()
                .map(|(a, b, l)| LabeledPair::new(SentencePair::new(*a, *b), *l))
                .collect(),
        );
        m
    }

    #[test]
    fn test_vocabulary_covers_both_text_fields() {
        let raw = raw_one("train", &[("red apple", "green pear", 0)]);
        let prepared = prepare_datasets(&raw, 5).unwrap();
        for w in ["red", "apple", "green", "pear"] {
            assert!(prepared.vocabulary.get(w).is_some(), "missing '{w}'");
        }
    }

    #[test]
    fn test_every_row_is_encoded_to_max_length() {
        let raw = raw_one("train", &[("a b c", "d", 1), ("e", "f g", 0)]);
        let prepared = prepare_datasets(&raw, 4).unwrap();
        let ds = &prepared.datasets["train"];
        assert_eq!(ds.sample_count(), 2);
        for s in ds.samples() {
            assert_eq!(s.encoded.first_ids.len(), 4);
            assert_eq!(s.encoded.second_ids.len(), 4);
        }
    }

    #[test]
    fn test_preparation_is_deterministic() {
        let raw = raw_one("train", &[("one two three", "three two one", 1)]);
        let a = prepare_datasets(&raw, 6).unwrap();
        let b = prepare_datasets(&raw, 6).unwrap();
        assert_eq!(a.vocabulary.len(), b.vocabulary.len());
        assert_eq!(
            a.datasets["train"].samples()[0].encoded,
            b.datasets["train"].samples()[0].encoded
        );
    }

    #[test]
    fn test_labels_survive_encoding() {
        let raw = raw_one("val", &[("x", "y", 1)]);
        let prepared = prepare_datasets(&raw, 3).unwrap();
        assert_eq!(prepared.datasets["val"].samples()[0].label, 1);
    }
}
