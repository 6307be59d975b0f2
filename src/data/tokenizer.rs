// ============================================================
// Layer 4 — Tokenizer
// ============================================================
// The single tokenisation policy shared by dataset preparation
// and featurization: lowercase, split on non-alphanumeric
// boundaries, drop empty fragments.
//
// There is deliberately exactly ONE implementation of this
// policy. The vocabulary is built from these tokens during
// dataset preparation, and the featurizer must reproduce them
// exactly at inference time — if the two ever disagreed, the
// model would receive indices the embedding rows were never
// trained for. Sharing one function makes that divergence
// impossible rather than merely unlikely.

/// Tokenise a sentence: lowercase, split on any non-alphanumeric
/// character, keep only non-empty fragments.
///
/// `char::is_alphanumeric` is Unicode-aware, so accented words and
/// non-Latin scripts survive as single tokens rather than being
/// shredded into bytes.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}
