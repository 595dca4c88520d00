// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal each:
//
//   train_use_case.rs   — archive → CSV → split → generators
//                         → training loop → saved model
//   predict_use_case.rs — saved model + one camera image
//                         → steering angle
//
// Rules for this layer:
//   - No ML math or model code here
//   - No printing here (that's Layer 1)
//   - Only workflow coordination and backend selection

// The training workflow
pub mod train_use_case;

// Steering prediction from a saved model
pub mod predict_use_case;
