//! Handle marks - bounded lifetimes for transient references
//!
//! Design: references materialized while unboxing must be released once the
//! call arguments are built. Instead of pairing push/pop calls by hand:
//! 1. `handles.rs` - per-thread stack of handle blocks
//! 2. `mark.rs` - `HandleMark`, the scope guard that pushes and pops one block
//!
//! Marks nest strictly and unwind in reverse push order, panics included.

mod handles;
mod mark;


pub use handles::{active_marks, depth, live_references, track, MarkId};
pub use mark::{with_handle_mark, HandleMark};
