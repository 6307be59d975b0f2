// ============================================================
// Layer 3 — Vocabulary
// ============================================================
// Bijective mapping between distinct corpus tokens and integer
// indices used to address rows of the embedding matrix.
//
// Two indices are reserved and never assigned to corpus tokens:
//   PAD_INDEX (0) — fills the tail of short sequences
//   UNK_INDEX (1) — stands in for tokens never seen in the corpus
//
// Corpus tokens are numbered from 2 upward in FIRST-SEEN order,
// so the same corpus always produces the same vocabulary.
// The structure is built once during dataset preparation and is
// read-only afterwards; the embedding-matrix builder and the
// featurizer both take it by shared reference.
//
// Reference: Rust Book §8 (HashMaps)

use std::collections::HashMap;

/// Index reserved for the padding token.
pub const PAD_INDEX: u32 = 0;
/// Index reserved for out-of-vocabulary tokens.
pub const UNK_INDEX: u32 = 1;

/// The printable forms of the reserved tokens, used in debug output.
pub const PAD_TOKEN: &str = "<pad>";
pub const UNK_TOKEN: &str = "<unk>";

/// Word → index mapping with reserved padding and unknown slots.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    index:  HashMap<String, u32>,
    tokens: Vec<String>,
}

impl Vocabulary {
    /// An empty vocabulary containing only the two reserved tokens.
    pub fn new() -> Self {
        let tokens = vec![PAD_TOKEN.to_string(), UNK_TOKEN.to_string()];
        let index = tokens
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i as u32))
            .collect();
        Self { index, tokens }
    }

    /// Build a vocabulary from tokens in iteration order.
    /// Duplicates keep their first-seen index.
    pub fn from_tokens<I>(tokens: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut vocab = Self::new();
        for token in tokens {
            vocab.insert(token.as_ref());
        }
        vocab
    }

    /// Insert a token, returning its index. Inserting an existing
    /// token is a no-op that returns the original index.
    pub fn insert(&mut self, token: &str) -> u32 {
        if let Some(&i) = self.index.get(token) {
            return i;
        }
        let i = self.tokens.len() as u32;
        self.index.insert(token.to_string(), i);
        self.tokens.push(token.to_string());
        i
    }

    /// Look up a corpus token. Reserved tokens are not returned here.
    pub fn get(&self, token: &str) -> Option<u32> {
        self.index.get(token).copied()
    }

    /// Look up a token, mapping anything unseen to UNK_INDEX.
    /// This is the only lookup the featurizer uses.
    pub fn index_or_unk(&self, token: &str) -> u32 {
        self.get(token).unwrap_or(UNK_INDEX)
    }

    /// The token at a given index, if any.
    pub fn token(&self, index: u32) -> Option<&str> {
        self.tokens.get(index as usize).map(String::as_str)
    }

    /// Total size including the two reserved slots.
    /// This is the row count of the embedding matrix.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        // Never true in practice: reserved tokens are always present.
        self.tokens.is_empty()
    }

    /// All distinct corpus tokens in insertion order,
    /// excluding the reserved padding/unknown slots.
    pub fn corpus_tokens(&self) -> &[String] {
        &self.tokens[2..]
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new()
    }
}
