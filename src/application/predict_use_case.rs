// ============================================================
// Layer 2 — Predict Use Case
// ============================================================
// Scores ad-hoc sentence pairs against the restored model. The
// pairs come from the command line or a two-column TSV file, not
// from the configured datasets, so words the training data never
// saw map to the unknown token.

use anyhow::Result;

use crate::application::pipeline::PipelineContext;
use crate::data::featurizer::Featurizer;
use crate::domain::sentence_pair::{SentencePair, TokenizedPair};
use crate::domain::traits::SimilarityScorer;

/// One scored pair, with the tokenisation that produced the score
/// so callers can show what the model actually saw.
pub struct PairScore {
    pub pair:   SentencePair,
    pub tokens: TokenizedPair,
    pub score:  f32,
}

pub struct PredictUseCase<'a> {
    context: &'a PipelineContext,
}

impl<'a> PredictUseCase<'a> {
    pub fn new(context: &'a PipelineContext) -> Self {
        Self { context }
    }

    pub fn run(&self, pairs: Vec<SentencePair>) -> Result<Vec<PairScore>> {
        let featurizer = Featurizer::new(&self.context.vocabulary, self.context.max_length);
        let (encoded, tokenized) = featurizer.encode_pairs(&pairs)?;

        let scorer: &dyn SimilarityScorer = &self.context.inferencer;
        let scores = scorer.score_pairs(&encoded)?;

        tracing::info!("Scored {} pair(s)", scores.len());

        Ok(pairs
            .into_iter()
            .zip(tokenized)
            .zip(scores)
            .map(|((pair, tokens), score)| PairScore { pair, tokens, score })
            .collect())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sentence_pair::EncodedPair;
    use crate::domain::vocabulary::Vocabulary;

    // A scorer stub lets the use-case plumbing be tested without a
    // checkpoint on disk.
    struct FixedScorer(f32);

    impl SimilarityScorer for FixedScorer {
        fn score_pairs(&self, pairs: &[EncodedPair]) -> Result<Vec<f32>> {
            Ok(vec![self.0; pairs.len()])
        }
    }

    #[test]
    fn test_scores_line_up_with_input_pairs() {
        let vocab = Vocabulary::from_tokens(["how", "do", "i", "connect"]);
        let featurizer = Featurizer::new(&vocab, 8);

        let pairs = vec![
            SentencePair {
                first:  "How do I connect?".into(),
                second: "How do I connect to VPN?".into(),
            },
            SentencePair {
                first:  "one".into(),
                second: "two".into(),
            },
        ];

        let (encoded, tokenized) = featurizer.encode_pairs(&pairs).unwrap();
        let scores = FixedScorer(0.75).score_pairs(&encoded).unwrap();

        assert_eq!(scores, vec![0.75, 0.75]);
        assert_eq!(tokenized.len(), pairs.len());
        assert_eq!(tokenized[0].first, vec!["how", "do", "i", "connect"]);
    }
}
