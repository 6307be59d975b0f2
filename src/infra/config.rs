// ============================================================
// Layer 6 — Pipeline Configuration
// ============================================================
// Loads the JSON configuration file that describes one run:
// dataset paths, the pretrained-vector file and its dimension,
// model hyperparameters, optimizer provenance, checkpoint dir.
//
// The configuration is an explicit typed structure, not a bag of
// dynamic keys: every field is named, missing required keys fail
// at parse time, and #[serde(deny_unknown_fields)] rejects keys
// we would otherwise silently ignore (usually typos). Loaded
// once; immutable afterwards.
//
// Example file:
//
//   {
//     "data_paths": { "train": "data/train.tsv", "test": "data/test.tsv" },
//     "embeddings": { "path": "vectors/GoogleNews.bin.gz", "size": 300 },
//     "model": { "max_length": 40, "num_blocks": 2,
//                "num_filters": 50, "filter_width": 3, "dropout": 0.5 },
//     "optimizer": { "learning_rate": 0.08, "weight_decay": 0.0004 },
//     "checkpoint_dir": "checkpoints"
//   }
//
// Reference: Rust Book §9 (Error Handling)
//            serde documentation (container attributes)

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration file missing, unparsable, or invalid.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read configuration file '{path}': {source}")]
    Io {
        path:   String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed configuration in '{path}': {source}")]
    Parse {
        path:   String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// The full, validated run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Dataset name → file path. BTreeMap so iteration order (and
    /// therefore vocabulary construction) is deterministic.
    pub data_paths: BTreeMap<String, PathBuf>,

    pub embeddings: EmbeddingsConfig,
    pub model:      ModelConfig,

    /// Provenance of the checkpoint's training run. Unused by
    /// inference itself, but part of the run description.
    pub optimizer: OptimizerConfig,

    /// Directory holding model.mpk.gz, model_config.json and
    /// (optionally) history.json.
    pub checkpoint_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmbeddingsConfig {
    /// Path to the word2vec binary file (.bin or .bin.gz).
    pub path: PathBuf,
    /// Vector dimensionality; must match the file's header.
    pub size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Every sentence is padded/truncated to exactly this many tokens.
    pub max_length: usize,
    /// Number of stacked attention-convolution blocks.
    pub num_blocks: usize,
    /// Convolution output channels per block.
    pub num_filters: usize,
    /// Convolution filter width (tokens per window).
    pub filter_width: usize,
    /// Dropout probability used when the checkpoint was trained.
    pub dropout: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptimizerConfig {
    pub learning_rate: f64,
    pub weight_decay:  f64,
}

impl PipelineConfig {
    /// Read and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&text).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })?;
        tracing::debug!("Configuration loaded from '{}'", path.display());
        Ok(config)
    }

    /// Parse and validate from a JSON string (used directly by tests).
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: "<inline>".to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.data_paths.is_empty() {
            return Err(ConfigError::Invalid("data_paths must not be empty".into()));
        }
        if self.embeddings.size == 0 {
            return Err(ConfigError::Invalid("embeddings.size must be at least 1".into()));
        }
        if self.model.max_length == 0 {
            return Err(ConfigError::Invalid("model.max_length must be at least 1".into()));
        }
        if self.model.num_blocks == 0 {
            return Err(ConfigError::Invalid("model.num_blocks must be at least 1".into()));
        }
        if self.model.filter_width == 0 {
            return Err(ConfigError::Invalid("model.filter_width must be at least 1".into()));
        }
        if !(0.0..1.0).contains(&self.model.dropout) {
            return Err(ConfigError::Invalid(format!(
                "model.dropout must be in [0, 1), got {}",
                self.model.dropout
            )));
        }
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn valid_json() -> String {
        r#"{
            "data_paths": { "train": "data/train.tsv", "test": "data/test.tsv" },
            "embeddings": { "path": "vectors.bin", "size": 300 },
            "model": { "max_length": 40, "num_blocks": 2,
                       "num_filters": 50, "filter_width": 3, "dropout": 0.5 },
            "optimizer": { "learning_rate": 0.08, "weight_decay": 0.0004 },
            "checkpoint_dir": "checkpoints"
        }"#
        .to_string()
    }

    #[test]
    fn test_valid_config_parses() {
        let cfg = PipelineConfig::from_json_str(&valid_json()).unwrap();
        assert_eq!(cfg.embeddings.size, 300);
        assert_eq!(cfg.model.max_length, 40);
        assert_eq!(cfg.data_paths.len(), 2);
    }

    #[test]
    fn test_missing_required_key_is_an_error() {
        let json = valid_json().replace(r#""embeddings": { "path": "vectors.bin", "size": 300 },"#, "");
        assert!(matches!(
            PipelineConfig::from_json_str(&json),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let json = valid_json().replace(
            r#""checkpoint_dir": "checkpoints""#,
            r#""checkpoint_dir": "checkpoints", "surprise": 1"#,
        );
        assert!(matches!(
            PipelineConfig::from_json_str(&json),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_zero_max_length_is_rejected() {
        let json = valid_json().replace(r#""max_length": 40"#, r#""max_length": 0"#);
        assert!(matches!(
            PipelineConfig::from_json_str(&json),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_zero_embedding_size_is_rejected() {
        let json = valid_json().replace(r#""size": 300"#, r#""size": 0"#);
        assert!(matches!(
            PipelineConfig::from_json_str(&json),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = PipelineConfig::load(Path::new("/no/such/config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
