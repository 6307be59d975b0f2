use burn::data::dataset::Dataset;

use crate::domain::sentence_pair::EncodedPair;

/// One fully encoded, labelled sentence-pair sample.
/// Both sequences are already padded to the configured max length.
#[derive(Debug, Clone)]
pub struct PairSample {
    pub encoded: EncodedPair,
    pub label:   u8,
}

pub struct PairDataset {
    samples: Vec<PairSample>,
}

impl PairDataset {
    pub fn new(samples: Vec<PairSample>) -> Self {
        Self { samples }
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn samples(&self) -> &[PairSample] {
        &self.samples
    }
}

impl Dataset<PairSample> for PairDataset {
    fn get(&self, index: usize) -> Option<PairSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
