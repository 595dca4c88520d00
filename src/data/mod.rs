// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the zipped recording and the tensor
// batches the trainer consumes:
//
//   data_augmented.zip
//       │
//       ▼
//   ArchivePreparer   → extracts the archive once
//       │
//       ▼
//   load_driving_log  → CSV → columnar DrivingLog
//       │
//       ▼
//   DrivingDataset    → typed rows, implements Burn's Dataset
//       │
//       ▼
//   split_indices     → 80/20 train/validation index sets
//       │
//       ▼
//   BatchGenerator    → infinite shuffled batches of decoded frames
//       │
//       ▼
//   DrivingBatcher    → stacks the batch into tensors
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Typed error taxonomy for this layer
pub mod error;

/// Extracts the image archive if it has not been extracted yet
pub mod archive;

/// Reads the driving log CSV
pub mod loader;

/// Typed row table implementing Burn's Dataset trait
pub mod dataset;

/// Random train/validation split of row indices
pub mod splitter;

/// Image decoding into Frames
pub mod frames;

/// Infinite, reshuffling batch generator
pub mod generator;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

pub use error::DataError;
