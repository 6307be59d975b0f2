// ============================================================
// Layer 6 — Evaluation Metrics
// ============================================================
// Computes classification quality for a labelled dataset and
// appends one summary row per evaluation to a CSV file, so that
// repeated runs build up a comparable record:
//
//   dataset,examples,accuracy,precision,recall,f1
//   test,40371,0.8312,0.8197,0.8026,0.8110
//
// Precision/recall/F1 are macro-averaged over both classes, and a
// class absent from the evaluated data contributes zero to the
// average rather than a division by zero.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

const CSV_HEADER: &str = "dataset,examples,accuracy,precision,recall,f1";

// ─── EvalMetrics ──────────────────────────────────────────────────────────────
/// Quality summary for one evaluation pass.
#[derive(Debug, Clone)]
pub struct EvalMetrics {
    pub examples:  usize,
    pub accuracy:  f64,
    /// Macro-averaged over the two classes.
    pub precision: f64,
    pub recall:    f64,
    pub f1:        f64,
    /// confusion[actual][predicted], classes 0 and 1.
    pub confusion: [[usize; 2]; 2],
}

impl EvalMetrics {
    /// Compare predictions against labels. Both slices must be the
    /// same length; values outside {0, 1} are a caller bug and are
    /// clamped into class 1.
    pub fn compute(labels: &[u8], predictions: &[u8]) -> Self {
        debug_assert_eq!(labels.len(), predictions.len());

        let mut confusion = [[0usize; 2]; 2];
        for (&label, &predicted) in labels.iter().zip(predictions) {
            confusion[(label != 0) as usize][(predicted != 0) as usize] += 1;
        }

        let examples = labels.len();
        let correct  = confusion[0][0] + confusion[1][1];
        let accuracy = ratio(correct, examples);

        // Per-class, then macro-average
        let mut precision_sum = 0.0;
        let mut recall_sum    = 0.0;
        let mut f1_sum        = 0.0;
        for class in 0..2 {
            let true_positive = confusion[class][class];
            let predicted_as  = confusion[0][class] + confusion[1][class];
            let actual_count  = confusion[class][0] + confusion[class][1];

            let precision = ratio(true_positive, predicted_as);
            let recall    = ratio(true_positive, actual_count);
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };

            precision_sum += precision;
            recall_sum    += recall;
            f1_sum        += f1;
        }

        Self {
            examples,
            accuracy,
            precision: precision_sum / 2.0,
            recall:    recall_sum / 2.0,
            f1:        f1_sum / 2.0,
            confusion,
        }
    }

    pub fn log_summary(&self, dataset: &str) {
        tracing::info!(
            "Evaluation on '{}': {} examples, accuracy {:.4}, precision {:.4}, recall {:.4}, F1 {:.4}",
            dataset, self.examples, self.accuracy, self.precision, self.recall, self.f1
        );
        tracing::info!(
            "Confusion matrix [actual][predicted]: [[{}, {}], [{}, {}]]",
            self.confusion[0][0], self.confusion[0][1],
            self.confusion[1][0], self.confusion[1][1]
        );
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

// ─── MetricsLogger ────────────────────────────────────────────────────────────
/// Appends evaluation rows to a CSV file, writing the header only
/// when the file is first created.
pub struct MetricsLogger {
    path: PathBuf,
}

impl MetricsLogger {
    pub fn new(path: &Path) -> Self {
        Self { path: path.to_path_buf() }
    }

    pub fn append(&self, dataset: &str, metrics: &EvalMetrics) -> Result<()> {
        let write_header = !self.path.exists();

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("cannot open metrics file '{}'", self.path.display()))?;

        if write_header {
            writeln!(file, "{CSV_HEADER}")?;
        }
        writeln!(
            file,
            "{},{},{:.4},{:.4},{:.4},{:.4}",
            dataset, metrics.examples, metrics.accuracy,
            metrics.precision, metrics.recall, metrics.f1
        )?;
        Ok(())
    }
}
