// ============================================================
// Layer 5 - ML / Model Layer (Burn)
// ============================================================
// All Burn model, optimiser and backend code lives here.
// (The data layer only touches Burn's Dataset/Batcher traits.)
//
//   model.rs      - PlantCnn: two conv/pool stages and two
//                   dense layers, softmax for probabilities
//
//   trainer.rs    - Adam + cross-entropy training loop with
//                   optional validation and per-epoch saving
//
//   inferencer.rs - rebuilds the model from the model
//                   directory and classifies single images
//
//   device.rs     - cpu (NdArray) / gpu (Wgpu) selection and
//                   the backend dispatch for the two above
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

/// Convolutional classifier architecture
pub mod model;

/// Training loop with validation and checkpointing
pub mod trainer;

/// Inference engine - loads the model and classifies images
pub mod inferencer;

/// Compute device selection
pub mod device;
