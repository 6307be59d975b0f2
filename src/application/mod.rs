// ============================================================
// Layer 2 — Application Use Cases
// ============================================================
// One module per thing the program can do. Use cases own the
// orchestration — which layers get called, in what order — but
// no I/O details (Layer 6) and no tensor math (Layer 5).

/// Builds the shared context: datasets, vocabulary, restored model
pub mod pipeline;

/// Scores ad-hoc sentence pairs
pub mod predict_use_case;

/// Evaluates the model on a labelled dataset
pub mod eval_use_case;
