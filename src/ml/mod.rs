// ============================================================
// Layer 5 — Machine Learning
// ============================================================
// The ABCNN model and the inference wrapper around it. This is
// the only layer that knows about Burn backends and tensors;
// the layers above see sentence pairs in and f32 scores out.
//
// Reference: Burn Book §3 (Building Blocks: Module)

/// The attention-based CNN architecture and its configuration
pub mod model;

/// Restored-model wrapper that scores encoded pairs on CPU
pub mod inferencer;
