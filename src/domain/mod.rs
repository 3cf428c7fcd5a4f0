// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain Rust types that describe what the classifier works
// with: class labels, labelled training images, predictions
// and the edits a user can apply to an image.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Everything here is testable without a GPU or a dataset.

// Ordered class-label list (index = model output unit)
pub mod labels;

// A training image on disk and the corpus built from a folder
pub mod sample;

// The result of classifying one image
pub mod prediction;

// Rotate / mirror operations
pub mod edit;

// Core abstractions (traits) that other layers implement
pub mod traits;
