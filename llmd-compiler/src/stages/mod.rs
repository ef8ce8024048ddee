//! The six pipeline stages, in execution order.
//!
//! ```text
//!     normalize  → logical lines (NFKC, LF, right-trimmed)
//!     fences     → placeholder lines + fenced-block side table
//!     classify   → flat IR node sequence
//!     emit       → LLMD line stream (scopes, batching, tables, blocks)
//!     compress   → cumulative cleanup passes c0/c1/c2
//!     finalize   → advisory validation + optional scope anchors
//! ```
//!
//! Data flows strictly forward; no stage looks at a later stage's output.
//! Every stage is a pure function of its input and the resolved options, so
//! the whole pipeline is deterministic byte-for-byte.

pub mod classify;
pub mod compress;
pub mod emit;
pub mod fences;
pub mod finalize;
pub mod normalize;
