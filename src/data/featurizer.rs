// ============================================================
// Layer 4 — Featurizer
// ============================================================
// Converts raw sentence pairs into the fixed-shape index
// sequences the model consumes. This is the heart of the data
// pipeline; everything else is plumbing around it.
//
// Per sentence:
//   1. Tokenise with the shared policy (data::tokenizer)
//   2. Map each token to its vocabulary index;
//      tokens unseen in the corpus map to UNK_INDEX
//   3. Truncate to max_length, keeping the prefix
//   4. Pad the TAIL with PAD_INDEX up to max_length
//
// Padding goes at the END, never the start. The convolution
// filters slide left-to-right over the sequence, so padding
// position affects which windows see real tokens — it must
// match how the checkpoint was trained.
//
// Edge cases:
//   - empty string        → all-PAD sequence
//   - exactly max_length  → neither truncated nor padded
//
// Reference: Yin et al. (2016) ABCNN paper
//            Rust Book §13 (Iterators)

use thiserror::Error;

use crate::data::tokenizer::tokenize;
use crate::domain::sentence_pair::{EncodedPair, SentencePair, TokenizedPair};
use crate::domain::vocabulary::{Vocabulary, PAD_INDEX};

/// Invalid featurization input. The typed API already rules out
/// non-string pair elements, so the remaining failure modes are
/// structural: nothing to encode, or a zero-length target shape.
#[derive(Debug, Error)]
pub enum FeaturizationError {
    #[error("cannot featurize an empty batch of sentence pairs")]
    EmptyBatch,

    #[error("max_length must be at least 1")]
    ZeroMaxLength,
}

/// Encodes sentence pairs against a fixed, read-only vocabulary.
pub struct Featurizer<'a> {
    vocabulary: &'a Vocabulary,
    max_length: usize,
}

impl<'a> Featurizer<'a> {
    pub fn new(vocabulary: &'a Vocabulary, max_length: usize) -> Self {
        Self { vocabulary, max_length }
    }

    /// Featurize a batch of raw pairs.
    ///
    /// Returns the encoded batch together with the tokenised text,
    /// so callers can inspect exactly what the model will see.
    /// Every produced sequence has length exactly `max_length` and
    /// every index is < vocabulary size.
    pub fn encode_pairs(
        &self,
        pairs: &[SentencePair],
    ) -> Result<(Vec<EncodedPair>, Vec<TokenizedPair>), FeaturizationError> {
        if self.max_length == 0 {
            return Err(FeaturizationError::ZeroMaxLength);
        }
        if pairs.is_empty() {
            return Err(FeaturizationError::EmptyBatch);
        }

        let mut encoded   = Vec::with_capacity(pairs.len());
        let mut tokenized = Vec::with_capacity(pairs.len());

        for pair in pairs {
            let (e, t) = self.encode_pair(pair);
            encoded.push(e);
            tokenized.push(t);
        }

        Ok((encoded, tokenized))
    }

    /// Featurize a single pair. Infallible: any string, including the
    /// empty one, encodes to two sequences of exactly `max_length`.
    pub fn encode_pair(&self, pair: &SentencePair) -> (EncodedPair, TokenizedPair) {
        let (first_ids,  first_tokens)  = self.encode_sentence(&pair.first);
        let (second_ids, second_tokens) = self.encode_sentence(&pair.second);

        (
            EncodedPair { first_ids, second_ids },
            TokenizedPair {
                first:  first_tokens,
                second: second_tokens,
            },
        )
    }

    /// Encode one sentence into exactly `max_length` indices,
    /// returning the token list alongside.
    fn encode_sentence(&self, text: &str) -> (Vec<u32>, Vec<String>) {
        let tokens = tokenize(text);

        let mut ids: Vec<u32> = tokens
            .iter()
            .take(self.max_length)
            .map(|t| self.vocabulary.index_or_unk(t))
            .collect();

        // End-padding: real tokens keep their positions, the tail is PAD
        while ids.len() < self.max_length {
            ids.push(PAD_INDEX);
        }

        (ids, tokens)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::vocabulary::UNK_INDEX;

    fn vocab(words: &[&str]) -> Vocabulary {
        Vocabulary::from_tokens(words.iter().copied())
    }

    #[test]
    fn test_short_sentences_are_end_padded_to_max_length() {
        let v = vocab(&["how", "do", "i", "connect", "to", "vpn"]);
        let f = Featurizer::new(&v, 10);
        let (encoded, _) = f
            .encode_pairs(&[SentencePair::new("how do i", "connect")])
            .unwrap();

        assert_eq!(encoded[0].first_ids.len(), 10);
        assert_eq!(encoded[0].second_ids.len(), 10);
        // Three real tokens, then padding to the end
        assert_eq!(&encoded[0].first_ids[..3], &[2, 3, 4]);
        assert!(encoded[0].first_ids[3..].iter().all(|&i| i == PAD_INDEX));
    }

    #[test]
    fn test_long_sentences_are_truncated_preserving_prefix() {
        let v = vocab(&["a", "b", "c", "d", "e"]);
        let f = Featurizer::new(&v, 3);
        let (encoded, _) = f
            .encode_pairs(&[SentencePair::new("a b c d e", "a")])
            .unwrap();

        assert_eq!(encoded[0].first_ids, vec![2, 3, 4]);
    }

    #[test]
    fn test_exact_length_is_neither_truncated_nor_padded() {
        let v = vocab(&["a", "b", "c"]);
        let f = Featurizer::new(&v, 3);
        let (encoded, _) = f
            .encode_pairs(&[SentencePair::new("a b c", "c b a")])
            .unwrap();

        assert_eq!(encoded[0].first_ids,  vec![2, 3, 4]);
        assert_eq!(encoded[0].second_ids, vec![4, 3, 2]);
    }

    #[test]
    fn test_unknown_tokens_map_to_unk_index() {
        let v = vocab(&["known"]);
        let f = Featurizer::new(&v, 2);
        let (encoded, _) = f
            .encode_pairs(&[SentencePair::new("known mystery", "mystery")])
            .unwrap();

        assert_eq!(encoded[0].first_ids,  vec![2, UNK_INDEX]);
        assert_eq!(encoded[0].second_ids, vec![UNK_INDEX, PAD_INDEX]);
    }

    #[test]
    fn test_empty_string_gives_all_padding() {
        let v = vocab(&["word"]);
        let f = Featurizer::new(&v, 5);
        let (encoded, tokenized) = f
            .encode_pairs(&[SentencePair::new("", "")])
            .unwrap();

        assert!(encoded[0].first_ids.iter().all(|&i| i == PAD_INDEX));
        assert!(encoded[0].second_ids.iter().all(|&i| i == PAD_INDEX));
        assert!(tokenized[0].first.is_empty());
    }

    #[test]
    fn test_vpn_scenario() {
        // Vocabulary contains every word except "vpn"
        let v = vocab(&["how", "do", "i", "connect", "to", "need", "connecting"]);
        let f = Featurizer::new(&v, 10);
        let (encoded, tokenized) = f
            .encode_pairs(&[SentencePair::new(
                "How do I connect to VPN?",
                "I need connecting to VPN",
            )])
            .unwrap();

        let e = &encoded[0];
        assert_eq!(e.first_ids.len(), 10);
        assert_eq!(e.second_ids.len(), 10);
        // "VPN" is position 5 in the first sentence, position 4 in the second
        assert_eq!(e.first_ids[5],  UNK_INDEX);
        assert_eq!(e.second_ids[4], UNK_INDEX);
        // Trailing slots are padding
        assert!(e.first_ids[6..].iter().all(|&i| i == PAD_INDEX));
        assert!(e.second_ids[5..].iter().all(|&i| i == PAD_INDEX));
        // Tokenised text comes back for inspection
        assert_eq!(tokenized[0].first.last().unwrap(), "vpn");
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let v = vocab(&["repeat", "after", "me"]);
        let f = Featurizer::new(&v, 6);
        let pairs = [SentencePair::new("Repeat after me", "after me, repeat")];
        let (a, _) = f.encode_pairs(&pairs).unwrap();
        let (b, _) = f.encode_pairs(&pairs).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_every_index_is_below_vocabulary_size() {
        let v = vocab(&["a", "b"]);
        let f = Featurizer::new(&v, 4);
        let (encoded, _) = f
            .encode_pairs(&[SentencePair::new("a b zzz", "zzz zzz")])
            .unwrap();
        let limit = v.len() as u32;
        assert!(encoded[0].first_ids.iter().all(|&i| i < limit));
        assert!(encoded[0].second_ids.iter().all(|&i| i < limit));
    }

    #[test]
    fn test_empty_batch_is_an_error() {
        let v = vocab(&[]);
        let f = Featurizer::new(&v, 4);
        assert!(matches!(
            f.encode_pairs(&[]),
            Err(FeaturizationError::EmptyBatch)
        ));
    }
}
