// ============================================================
// Layer 4 — Pretrained Word Vector Loader
// ============================================================
// Parses the word2vec binary container (the format used by the
// GoogleNews vectors and by gensim's save_word2vec_format):
//
//   header:  "<word_count> <dimension>\n"        (ASCII)
//   entry:   "<word> " + dimension × f32 (LE)    (repeated)
//
// Entries may be separated by a single '\n'; we simply trim
// whitespace off the front of each word. Files ending in .gz are
// transparently decompressed with flate2.
//
// The whole file is read inside the load call; the handle is
// dropped on every exit path, including the failure ones.
//
// Reference: Mikolov et al. (2013) word2vec

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use flate2::read::GzDecoder;
use thiserror::Error;

/// Word-vector file unreadable, truncated, or incompatible.
#[derive(Debug, Error)]
pub enum EmbeddingLoadError {
    #[error("cannot open word-vector file '{path}': {source}")]
    Io {
        path:   String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed word2vec header: {0}")]
    Header(String),

    #[error("truncated vector data after {words_read} of {expected} words: {source}")]
    Truncated {
        words_read: usize,
        expected:   usize,
        #[source]
        source:     std::io::Error,
    },

    #[error("embedding dimension mismatch: file has {found}, configuration expects {expected}")]
    DimensionMismatch { found: usize, expected: usize },
}

/// Lookup from token string to a fixed-length float vector.
/// Built once from the pretrained file, read-only afterwards.
#[derive(Debug)]
pub struct WordVectors {
    dim:     usize,
    vectors: HashMap<String, Vec<f32>>,
}

impl WordVectors {
    /// Load a word2vec binary file, gzip-compressed or plain.
    pub fn load(path: &Path, expected_dim: usize) -> Result<Self, EmbeddingLoadError> {
        let file = File::open(path).map_err(|source| EmbeddingLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let reader = BufReader::new(file);

        let is_gz = path.extension().and_then(|e| e.to_str()) == Some("gz");
        let vectors = if is_gz {
            Self::from_reader(BufReader::new(GzDecoder::new(reader)), expected_dim)?
        } else {
            Self::from_reader(reader, expected_dim)?
        };

        tracing::info!(
            "Loaded {} pretrained vectors of dimension {} from '{}'",
            vectors.len(),
            vectors.dim(),
            path.display()
        );
        Ok(vectors)
    }

    /// Parse the word2vec binary layout from any buffered reader.
    /// Split out from the file handling so tests can feed in-memory bytes.
    pub fn from_reader<R: BufRead>(
        mut reader: R,
        expected_dim: usize,
    ) -> Result<Self, EmbeddingLoadError> {
        // ── Header: "<count> <dim>\n" ─────────────────────────────────────────
        let mut header = Vec::new();
        reader
            .read_until(b'\n', &mut header)
            .map_err(|e| EmbeddingLoadError::Header(e.to_string()))?;
        let header = String::from_utf8_lossy(&header);
        let mut parts = header.split_whitespace();

        let count: usize = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| EmbeddingLoadError::Header(format!("bad word count in '{}'", header.trim())))?;
        let dim: usize = parts
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| EmbeddingLoadError::Header(format!("bad dimension in '{}'", header.trim())))?;

        if dim != expected_dim {
            return Err(EmbeddingLoadError::DimensionMismatch {
                found:    dim,
                expected: expected_dim,
            });
        }

        // ── Entries: word bytes, one space, dim little-endian f32s ────────────
        let mut vectors = HashMap::with_capacity(count);
        for i in 0..count {
            let mut word_bytes = Vec::new();
            reader
                .read_until(b' ', &mut word_bytes)
                .map_err(|source| EmbeddingLoadError::Truncated {
                    words_read: i,
                    expected:   count,
                    source,
                })?;
            // Leading '\n' left over from the previous entry, trailing ' '
            let word = String::from_utf8_lossy(&word_bytes).trim().to_string();
            if word.is_empty() {
                return Err(EmbeddingLoadError::Truncated {
                    words_read: i,
                    expected:   count,
                    source:     std::io::Error::from(std::io::ErrorKind::UnexpectedEof),
                });
            }

            let mut vector = vec![0.0f32; dim];
            reader
                .read_f32_into::<LittleEndian>(&mut vector)
                .map_err(|source| EmbeddingLoadError::Truncated {
                    words_read: i,
                    expected:   count,
                    source,
                })?;

            vectors.insert(word, vector);
        }

        Ok(Self { dim, vectors })
    }

    /// The vector for a token, if the pretrained file contains it.
    pub fn get(&self, token: &str) -> Option<&[f32]> {
        self.vectors.get(token).map(Vec::as_slice)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.vectors.contains_key(token)
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}
