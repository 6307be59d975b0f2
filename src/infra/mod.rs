// ============================================================
// Layer 6 — Infrastructure
// ============================================================
// Everything that touches the filesystem outside the datasets:
// the run configuration, the checkpoint directory, and the
// metrics CSV. No model or pipeline logic lives here.

/// Typed JSON run configuration with validation
pub mod config;

/// Checkpoint directory layout, restore + compatibility guard
pub mod checkpoint;

/// Evaluation metrics and the append-only CSV record
pub mod metrics;
