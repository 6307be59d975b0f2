// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from raw files to model-ready tensor batches.
//
// The pipeline flows in this order:
//
//   TSV dataset files
//       │
//       ▼
//   TsvLoader         → reads labelled sentence-pair rows
//       │
//       ▼
//   tokenizer         → shared lowercase/alphanumeric policy
//       │
//       ▼
//   prepare           → builds the Vocabulary, encodes datasets
//       │
//       ▼
//   WordVectors       → pretrained word2vec binary lookup
//       │
//       ▼
//   EmbeddingMatrix   → (vocab × dim) rows for the model
//       │
//       ▼
//   Featurizer        → raw pairs → fixed-length index pairs
//       │
//       ▼
//   PairBatcher       → stacks samples into tensor batches
//
// Each module is responsible for exactly one step.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads tab-separated labelled sentence-pair files
pub mod loader;

/// The single shared tokenisation policy
pub mod tokenizer;

/// Builds the vocabulary and encodes the named datasets
pub mod prepare;

/// Parses the pretrained word2vec binary container
pub mod word_vectors;

/// Builds the dense embedding matrix from vocabulary + vectors
pub mod embedding;

/// Converts raw sentence pairs into fixed-shape index sequences
pub mod featurizer;

/// Implements Burn's Dataset trait for encoded pairs
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
