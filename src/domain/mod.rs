// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs describing the driving data:
//
//   driving_log.rs — the raw CSV table, column name → values
//   record.rs      — one resolved row (image path + angle)
//   frame.rs       — a decoded RGB camera frame and its label
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs and their invariants

pub mod driving_log;

pub mod record;

pub mod frame;
