// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting persistence concerns:
//
//   model_store.rs — the trained model artifact
//                    Weights go through Burn's full-precision MessagePack recorder,
//                    the architecture config and the training
//                    config are written as JSON next to them so
//                    the model can be rebuilt for inference.
//
//   metrics.rs     — per-epoch training/validation loss, appended
//                    to a CSV file for plotting learning curves.
//
// Reference: Burn Book §5 (Records and Checkpointing)

/// Saving and loading the trained model artifact
pub mod model_store;

/// Training metrics CSV logger
pub mod metrics;
