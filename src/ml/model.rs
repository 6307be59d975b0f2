// ============================================================
// Layer 5 — ABCNN Similarity Model
// ============================================================
// Attention-Based Convolutional Neural Network for sentence-pair
// similarity, after Yin et al. (2016):
//
//   http://www.aclweb.org/anthology/Q16-1019
//
// Per block (ABCNN-1 style):
//   1. an attention matrix relates every token position of one
//      sentence to every position of the other
//   2. the attention-weighted view of the OTHER sentence is
//      stacked onto each sentence's own representation as an
//      extra channel group
//   3. a shared 1-D convolution + tanh reads both
//   4. w-ap average pooling feeds the next block,
//      all-ap average pooling contributes to the output features
//
// The final classifier is a linear layer over the all-ap features
// of every block (plus the raw embedding averages), producing two
// logits: [not-duplicate, duplicate].
//
// The embedding layer is seeded from the pretrained matrix built
// in Layer 4, so vocabulary index i must address matrix row i.

use burn::{
    module::Param,
    nn::{
        conv::{Conv1d, Conv1dConfig},
        pool::{AvgPool1d, AvgPool1dConfig},
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
        PaddingConfig1d,
    },
    prelude::*,
    tensor::activation::softmax,
};

use crate::data::embedding::EmbeddingMatrix;

// NOTE: #[derive(Config)] already generates the serde impls, so this
// struct doubles as the checkpoint's model_config.json schema.
#[derive(Config, Debug)]
pub struct AbcnnConfig {
    pub vocab_size:     usize,
    pub embedding_size: usize,
    pub max_length:     usize,
    pub num_blocks:     usize,
    pub num_filters:    usize,
    pub filter_width:   usize,
    pub dropout:        f64,
}

impl AbcnnConfig {
    /// Build the model with its embedding layer seeded from the
    /// pretrained matrix. The matrix shape must be
    /// (vocab_size × embedding_size); checkpoint restoration then
    /// overwrites every parameter, embedding included.
    pub fn init<B: Backend>(
        &self,
        matrix: &EmbeddingMatrix,
        device: &B::Device,
    ) -> AbcnnModel<B> {
        let weight = Tensor::<B, 1>::from_floats(matrix.data(), device)
            .reshape([self.vocab_size, self.embedding_size]);
        let mut embedding = EmbeddingConfig::new(self.vocab_size, self.embedding_size)
            .init(device);
        embedding.weight = Param::from_tensor(weight);

        let blocks: Vec<AttentionConvBlock<B>> = (0..self.num_blocks)
            .map(|i| self.build_block(i, device))
            .collect();

        // All-ap features: both raw embeddings + both sides of every block
        let feature_dim = 2 * self.embedding_size + self.num_blocks * 2 * self.num_filters;
        let output  = LinearConfig::new(feature_dim, 2).init(device);
        let dropout = DropoutConfig::new(self.dropout).init();

        AbcnnModel { embedding, blocks, output, dropout }
    }

    fn build_block<B: Backend>(&self, index: usize, device: &B::Device) -> AttentionConvBlock<B> {
        // Block 0 reads embeddings; later blocks read pooled conv maps
        let input_dim = if index == 0 { self.embedding_size } else { self.num_filters };

        // ×2: own representation + attention channels
        let conv = Conv1dConfig::new(2 * input_dim, self.num_filters, self.filter_width)
            .with_padding(PaddingConfig1d::Same)
            .init(device);
        let pool = AvgPool1dConfig::new(self.filter_width)
            .with_padding(PaddingConfig1d::Same)
            .init();
        let dropout = DropoutConfig::new(self.dropout).init();

        AttentionConvBlock { conv, pool, dropout }
    }
}

// ─── AttentionConvBlock ───────────────────────────────────────────────────────
#[derive(Module, Debug)]
pub struct AttentionConvBlock<B: Backend> {
    conv:    Conv1d<B>,
    pool:    AvgPool1d,
    dropout: Dropout,
}

/// What one block hands onward: w-ap maps for the next block,
/// all-ap vectors for the output layer.
pub struct BlockOutput<B: Backend> {
    pub w1: Tensor<B, 3>,
    pub w2: Tensor<B, 3>,
    pub a1: Tensor<B, 2>,
    pub a2: Tensor<B, 2>,
}

impl<B: Backend> AttentionConvBlock<B> {
    /// x1, x2: [batch, max_length, input_dim]
    pub fn forward(&self, x1: Tensor<B, 3>, x2: Tensor<B, 3>) -> BlockOutput<B> {
        // Attention matrix over token positions: [batch, L, L]
        let attn = x1.clone().matmul(x2.clone().swap_dims(1, 2));

        // Each position's attention-weighted view of the other sentence
        let seen_by_1 = softmax(attn.clone(), 2).matmul(x2.clone());       // [b, L, d]
        let seen_by_2 = softmax(attn.swap_dims(1, 2), 2).matmul(x1.clone()); // [b, L, d]

        // Stack own representation and attention view as channel groups,
        // then move channels in front for the convolution: [b, 2d, L]
        let in1 = Tensor::cat(vec![x1, seen_by_1], 2).swap_dims(1, 2);
        let in2 = Tensor::cat(vec![x2, seen_by_2], 2).swap_dims(1, 2);

        // Shared weights read both sentences — same filters, same features
        let c1 = self.conv.forward(in1).tanh(); // [b, filters, L]
        let c2 = self.conv.forward(in2).tanh();

        // w-ap: window-average pooling, back to [b, L, filters]
        let w1 = self.dropout.forward(self.pool.forward(c1.clone()).swap_dims(1, 2));
        let w2 = self.dropout.forward(self.pool.forward(c2.clone()).swap_dims(1, 2));

        // all-ap: average over the whole sequence → [b, filters]
        let a1 = average_over_length(c1);
        let a2 = average_over_length(c2);

        BlockOutput { w1, w2, a1, a2 }
    }
}

/// Mean over the last (length) dimension: [b, c, L] → [b, c].
fn average_over_length<B: Backend>(x: Tensor<B, 3>) -> Tensor<B, 2> {
    let [batch, channels, _] = x.dims();
    x.mean_dim(2).reshape([batch, channels])
}

// ─── AbcnnModel ───────────────────────────────────────────────────────────────
#[derive(Module, Debug)]
pub struct AbcnnModel<B: Backend> {
    pub embedding: Embedding<B>,
    pub blocks:    Vec<AttentionConvBlock<B>>,
    pub output:    Linear<B>,
    pub dropout:   Dropout,
}

impl<B: Backend> AbcnnModel<B> {
    /// first, second: [batch, max_length] → logits [batch, 2]
    pub fn forward(&self, first: Tensor<B, 2, Int>, second: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        let x1 = self.embedding.forward(first);  // [b, L, d]
        let x2 = self.embedding.forward(second);

        // Raw embedding averages anchor the feature vector
        let mut features = vec![
            average_embedding(x1.clone()),
            average_embedding(x2.clone()),
        ];

        let (mut w1, mut w2) = (x1, x2);
        for block in &self.blocks {
            let out = block.forward(w1, w2);
            features.push(out.a1);
            features.push(out.a2);
            w1 = out.w1;
            w2 = out.w2;
        }

        let features = Tensor::cat(features, 1); // [b, feature_dim]
        self.output.forward(self.dropout.forward(features))
    }

    /// Similarity score per pair: softmax probability of the
    /// "duplicate" class, in [0, 1].
    pub fn similarity(&self, first: Tensor<B, 2, Int>, second: Tensor<B, 2, Int>) -> Tensor<B, 1> {
        let logits = self.forward(first, second);
        let [batch, _] = logits.dims();
        softmax(logits, 1)
            .slice([0..batch, 1..2])
            .reshape([batch])
    }
}

/// Mean over token positions: [b, L, d] → [b, d].
fn average_embedding<B: Backend>(x: Tensor<B, 3>) -> Tensor<B, 2> {
    let [batch, _, dim] = x.dims();
    x.mean_dim(1).reshape([batch, dim])
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::word_vectors::WordVectors;
    use crate::domain::vocabulary::Vocabulary;
    use std::io::Cursor;

    type TestBackend = burn::backend::NdArray;

    fn tiny_matrix(dim: usize) -> (EmbeddingMatrix, Vocabulary) {
        let vocab = Vocabulary::from_tokens(["alpha", "beta", "gamma"]);
        // Empty pretrained lookup: every row falls back to zero,
        // which is fine for shape tests
        let wv = WordVectors::from_reader(
            Cursor::new(format!("0 {dim}\n").into_bytes()),
            dim,
        )
        .unwrap();
        (EmbeddingMatrix::build(&wv, &vocab, dim), vocab)
    }

    fn tiny_config(vocab_size: usize, dim: usize) -> AbcnnConfig {
        AbcnnConfig::new(vocab_size, dim, 6, 2, 4, 3, 0.0)
    }

    #[test]
    fn test_forward_produces_two_logits_per_pair() {
        let device = burn::backend::ndarray::NdArrayDevice::default();
        let (matrix, vocab) = tiny_matrix(5);
        let model: AbcnnModel<TestBackend> =
            tiny_config(vocab.len(), 5).init(&matrix, &device);

        let first = Tensor::<TestBackend, 1, Int>::from_ints(
            [2, 3, 4, 0, 0, 0, 3, 2, 0, 0, 0, 0].as_slice(),
            &device,
        )
        .reshape([2, 6]);
        let second = Tensor::<TestBackend, 1, Int>::from_ints(
            [4, 4, 0, 0, 0, 0, 2, 3, 4, 2, 3, 4].as_slice(),
            &device,
        )
        .reshape([2, 6]);

        let logits = model.forward(first, second);
        assert_eq!(logits.dims(), [2, 2]);
    }

    #[test]
    fn test_similarity_scores_are_probabilities() {
        let device = burn::backend::ndarray::NdArrayDevice::default();
        let (matrix, vocab) = tiny_matrix(5);
        let model: AbcnnModel<TestBackend> =
            tiny_config(vocab.len(), 5).init(&matrix, &device);

        let first = Tensor::<TestBackend, 1, Int>::from_ints(
            [2, 3, 0, 0, 0, 0].as_slice(),
            &device,
        )
        .reshape([1, 6]);
        let second = Tensor::<TestBackend, 1, Int>::from_ints(
            [3, 2, 0, 0, 0, 0].as_slice(),
            &device,
        )
        .reshape([1, 6]);

        let scores: Vec<f32> = model
            .similarity(first, second)
            .into_data()
            .to_vec()
            .unwrap();
        assert_eq!(scores.len(), 1);
        assert!((0.0..=1.0).contains(&scores[0]));
    }
}
