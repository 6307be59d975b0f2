// ============================================================
// Layer 4 — Embedding Matrix Builder
// ============================================================
// Assembles the dense (vocabulary size × embedding dimension)
// matrix the model's embedding layer is seeded from.
//
// Row policy (explicit, and relied on by tests):
//   - row i = pretrained vector for vocabulary token i,
//     when the pretrained lookup contains that token
//   - PAD row, UNK row, and rows for corpus tokens absent from
//     the pretrained file are the all-zero vector
//
// Zero (not random) for the fallback keeps the build fully
// deterministic, and keeps PAD contributing nothing to the
// convolution sums over the padded tail.
//
// One pass over the vocabulary, one copy per row:
// O(vocab × dim) time, nothing quadratic.

use crate::data::word_vectors::WordVectors;
use crate::domain::vocabulary::Vocabulary;

/// Row-major dense matrix of shape (vocabulary size × dim).
pub struct EmbeddingMatrix {
    data: Vec<f32>,
    rows: usize,
    dim:  usize,
}

impl EmbeddingMatrix {
    /// Build the matrix for a vocabulary from a pretrained lookup.
    pub fn build(vectors: &WordVectors, vocabulary: &Vocabulary, dim: usize) -> Self {
        let rows = vocabulary.len();
        let mut data = vec![0.0f32; rows * dim];
        let mut covered = 0usize;

        // Rows 0 (PAD) and 1 (UNK) stay zero; corpus tokens start at 2
        for i in 2..rows {
            let token = vocabulary
                .token(i as u32)
                .unwrap_or_default();
            if let Some(vector) = vectors.get(token) {
                data[i * dim..(i + 1) * dim].copy_from_slice(vector);
                covered += 1;
            }
        }

        let corpus = rows.saturating_sub(2);
        tracing::info!(
            "Embedding matrix: {}×{}, pretrained coverage {}/{} tokens",
            rows, dim, covered, corpus
        );

        Self { data, rows, dim }
    }

    /// Row i as a slice of length dim.
    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }

    /// The full matrix in row-major order, for tensor construction.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn dim(&self) -> usize {
        self.dim
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::vocabulary::{PAD_INDEX, UNK_INDEX};
    use std::io::Cursor;

    fn word_vectors(entries: &[(&str, &[f32])], dim: usize) -> WordVectors {
        let mut buf = format!("{} {}\n", entries.len(), dim).into_bytes();
        for (word, vec) in entries {
            buf.extend_from_slice(word.as_bytes());
            buf.push(b' ');
            for v in *vec {
                buf.extend_from_slice(&v.to_le_bytes());
            }
            buf.push(b'\n');
        }
        WordVectors::from_reader(Cursor::new(buf), dim).unwrap()
    }

    #[test]
    fn test_row_count_equals_vocabulary_size() {
        let wv = word_vectors(&[("apple", &[1.0, 2.0])], 2);
        let vocab = Vocabulary::from_tokens(["apple", "pear"]);
        let m = EmbeddingMatrix::build(&wv, &vocab, 2);
        assert_eq!(m.rows(), vocab.len());
        assert_eq!(m.data().len(), vocab.len() * 2);
    }

    #[test]
    fn test_pretrained_rows_are_copied() {
        let wv = word_vectors(&[("apple", &[1.5, -2.5])], 2);
        let vocab = Vocabulary::from_tokens(["apple"]);
        let m = EmbeddingMatrix::build(&wv, &vocab, 2);
        let apple = vocab.get("apple").unwrap() as usize;
        assert_eq!(m.row(apple), &[1.5, -2.5]);
    }

    #[test]
    fn test_oov_rows_fall_back_to_zero() {
        let wv = word_vectors(&[("apple", &[1.0, 1.0])], 2);
        let vocab = Vocabulary::from_tokens(["apple", "durian"]);
        let m = EmbeddingMatrix::build(&wv, &vocab, 2);
        let durian = vocab.get("durian").unwrap() as usize;
        assert_eq!(m.row(durian), &[0.0, 0.0]);
    }

    #[test]
    fn test_reserved_rows_are_zero() {
        let wv = word_vectors(&[("apple", &[9.0, 9.0])], 2);
        let vocab = Vocabulary::from_tokens(["apple"]);
        let m = EmbeddingMatrix::build(&wv, &vocab, 2);
        assert_eq!(m.row(PAD_INDEX as usize), &[0.0, 0.0]);
        assert_eq!(m.row(UNK_INDEX as usize), &[0.0, 0.0]);
    }
}
