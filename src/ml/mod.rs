// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All network code lives here:
//
//   model.rs      — PilotNet: crop, normalise, 5 convolutions,
//                   4 dense layers, one steering angle out
//
//   trainer.rs    — the epoch loop: pulls batches from the two
//                   generators, MSE + Adam updates, validation
//                   on the inner backend, metrics per epoch
//
//   inferencer.rs — reloads a saved model and predicts the
//                   steering angle for camera frames
//
//   device.rs     — which Burn backend a run executes on
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)
//            Bojarski et al. (2016) End to End Learning for Self-Driving Cars

/// PilotNet steering-angle regression model
pub mod model;

/// Training loop with per-epoch validation
pub mod trainer;

/// Inference from a saved model artifact
pub mod inferencer;

/// Backend selection (GPU via WGPU or CPU via NdArray)
pub mod device;
