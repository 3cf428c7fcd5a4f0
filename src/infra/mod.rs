// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// Persistence of everything a trained model consists of:
//
//   checkpoint.rs - weights (Burn CompactRecorder), class
//                   labels and manifest (serde_json), plus
//                   deleting them again
//
//   metrics.rs    - per-epoch loss / accuracy CSV
//
// Reference: Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Model artifact saving, loading and deletion
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;
