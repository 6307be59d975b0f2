// ============================================================
// Layer 6 — Checkpoint Restorer
// ============================================================
// Restores a trained model from a checkpoint directory:
//
//   checkpoint_dir/
//     model.mpk.gz        ← parameters (Burn CompactRecorder)
//     model_config.json   ← architecture the weights were trained for
//     history.json        ← optional per-epoch training curves
//
// The architecture sidecar is the shape-mismatch guard: before any
// weights are touched we compare it field by field against the
// architecture the current run is about to build. Restoring weights
// into a differently-shaped model would otherwise fail deep inside
// the recorder with a message that names tensors, not hyperparameters.
//
// Reference: Burn Book §6 (Saving and Loading Models)

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use burn::{
    prelude::*,
    record::{CompactRecorder, RecorderError},
};
use thiserror::Error;

use crate::ml::model::{AbcnnConfig, AbcnnModel};

/// Checkpoint directory missing, unreadable, or incompatible.
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path:   String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed checkpoint metadata in '{path}': {source}")]
    Metadata {
        path:   String,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "checkpoint architecture does not match the configured model: {}",
        mismatches.join("; ")
    )]
    ShapeMismatch { mismatches: Vec<String> },

    #[error("cannot restore model weights from '{path}': {source}")]
    Restore {
        path:   String,
        #[source]
        source: RecorderError,
    },
}

/// Owns the checkpoint directory layout so no other layer needs to
/// know the file names inside it.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    pub fn new(dir: &Path) -> Self {
        Self { dir: dir.to_path_buf() }
    }

    fn config_path(&self) -> PathBuf {
        self.dir.join("model_config.json")
    }

    fn history_path(&self) -> PathBuf {
        self.dir.join("history.json")
    }

    /// Read the architecture the checkpoint's weights were trained for.
    pub fn load_config(&self) -> Result<AbcnnConfig, CheckpointError> {
        let path = self.config_path();
        let text = fs::read_to_string(&path).map_err(|source| CheckpointError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| CheckpointError::Metadata {
            path: path.display().to_string(),
            source,
        })
    }

    /// Write the architecture sidecar next to the weights.
    pub fn save_config(&self, config: &AbcnnConfig) -> Result<(), CheckpointError> {
        let path = self.config_path();
        let text = serde_json::to_string_pretty(config).map_err(|source| {
            CheckpointError::Metadata {
                path: path.display().to_string(),
                source,
            }
        })?;
        fs::write(&path, text).map_err(|source| CheckpointError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Fail fast if the stored architecture differs from the one the
    /// current configuration describes. Every differing field is
    /// reported, not just the first.
    pub fn verify_compatible(&self, expected: &AbcnnConfig) -> Result<(), CheckpointError> {
        let saved = self.load_config()?;
        let mismatches = architecture_mismatches(expected, &saved);
        if mismatches.is_empty() {
            tracing::debug!("Checkpoint architecture matches the configured model");
            Ok(())
        } else {
            Err(CheckpointError::ShapeMismatch { mismatches })
        }
    }

    /// Restore the model's parameters from model.mpk.gz.
    pub fn load_model<B: Backend>(
        &self,
        model: AbcnnModel<B>,
        device: &B::Device,
    ) -> Result<AbcnnModel<B>, CheckpointError> {
        let path = self.dir.join("model");
        let restored = model
            .load_file(path.clone(), &CompactRecorder::new(), device)
            .map_err(|source| CheckpointError::Restore {
                path: path.display().to_string(),
                source,
            })?;
        tracing::info!("Model weights restored from '{}'", self.dir.display());
        Ok(restored)
    }

    /// Training curves from the checkpoint's run, if recorded.
    /// Metric name → per-epoch values (e.g. "val_accuracy" → [...]).
    pub fn load_history(&self) -> Result<Option<BTreeMap<String, Vec<f64>>>, CheckpointError> {
        let path = self.history_path();
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path).map_err(|source| CheckpointError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let history = serde_json::from_str(&text).map_err(|source| CheckpointError::Metadata {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Some(history))
    }
}

fn architecture_mismatches(expected: &AbcnnConfig, saved: &AbcnnConfig) -> Vec<String> {
    let mut mismatches = Vec::new();
    let mut check = |name: &str, want: String, got: String| {
        if want != got {
            mismatches.push(format!("{name}: configured {want}, checkpoint has {got}"));
        }
    };
    check("vocab_size",     expected.vocab_size.to_string(),     saved.vocab_size.to_string());
    check("embedding_size", expected.embedding_size.to_string(), saved.embedding_size.to_string());
    check("max_length",     expected.max_length.to_string(),     saved.max_length.to_string());
    check("num_blocks",     expected.num_blocks.to_string(),     saved.num_blocks.to_string());
    check("num_filters",    expected.num_filters.to_string(),    saved.num_filters.to_string());
    check("filter_width",   expected.filter_width.to_string(),   saved.filter_width.to_string());
    mismatches
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn temp_checkpoint_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("sentence-sim-test-{name}"));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn config(vocab_size: usize) -> AbcnnConfig {
        AbcnnConfig::new(vocab_size, 50, 40, 2, 16, 3, 0.5)
    }

    #[test]
    fn test_config_round_trip() {
        let dir = temp_checkpoint_dir("config-round-trip");
        let manager = CheckpointManager::new(&dir);

        manager.save_config(&config(1000)).unwrap();
        let loaded = manager.load_config().unwrap();
        assert_eq!(loaded.vocab_size, 1000);
        assert_eq!(loaded.num_filters, 16);
    }

    #[test]
    fn test_matching_architecture_verifies() {
        let dir = temp_checkpoint_dir("matching-arch");
        let manager = CheckpointManager::new(&dir);

        manager.save_config(&config(1000)).unwrap();
        assert!(manager.verify_compatible(&config(1000)).is_ok());
    }

    #[test]
    fn test_mismatched_architecture_is_rejected() {
        let dir = temp_checkpoint_dir("mismatched-arch");
        let manager = CheckpointManager::new(&dir);

        manager.save_config(&config(1000)).unwrap();
        let err = manager.verify_compatible(&config(2000)).unwrap_err();
        match err {
            CheckpointError::ShapeMismatch { mismatches } => {
                assert_eq!(mismatches.len(), 1);
                assert!(mismatches[0].contains("vocab_size"));
            }
            other => panic!("expected ShapeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_every_mismatched_field_is_reported() {
        let dir = temp_checkpoint_dir("all-mismatches");
        let manager = CheckpointManager::new(&dir);

        manager.save_config(&config(1000)).unwrap();
        let other = AbcnnConfig::new(2000, 300, 40, 2, 16, 3, 0.5);
        let err = manager.verify_compatible(&other).unwrap_err();
        match err {
            CheckpointError::ShapeMismatch { mismatches } => {
                assert_eq!(mismatches.len(), 2);
            }
            other => panic!("expected ShapeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_config_is_an_io_error() {
        let dir = temp_checkpoint_dir("missing-config");
        let manager = CheckpointManager::new(&dir);
        assert!(matches!(
            manager.load_config(),
            Err(CheckpointError::Io { .. })
        ));
    }

    #[test]
    fn test_absent_history_is_none() {
        let dir = temp_checkpoint_dir("no-history");
        let manager = CheckpointManager::new(&dir);
        assert!(manager.load_history().unwrap().is_none());
    }

    #[test]
    fn test_history_parses_metric_curves() {
        let dir = temp_checkpoint_dir("history");
        let manager = CheckpointManager::new(&dir);

        fs::write(
            dir.join("history.json"),
            r#"{ "loss": [0.7, 0.5, 0.4], "val_accuracy": [0.61, 0.68, 0.71] }"#,
        )
        .unwrap();

        let history = manager.load_history().unwrap().unwrap();
        assert_eq!(history["loss"].len(), 3);
        assert!((history["val_accuracy"][2] - 0.71).abs() < 1e-9);
    }
}
