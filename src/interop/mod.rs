//! Interoperability - unbox managed call arguments for native dispatch
//!
//! Design: closed type set, one pass per call, no allocation beyond the
//! output buffer for common arities
//!
//! Architecture:
//! - `types.rs` - basic types, primitive kinds, slot kinds, primitive values
//! - `args.rs` - `CallArguments`, the ordered native slot buffer
//! - `marshal.rs` - `ArgumentUnboxer`, boxed handles to native slots

mod args;
mod marshal;
mod types;

pub use args::{CallArguments, NativeSlot};
pub use marshal::{unbox_arguments, ArgumentUnboxer, CallKind};
pub use types::{BasicType, PrimitiveKind, PrimitiveValue, SlotKind};

use core::sync::atomic::Ordering;

/// Get interop statistics
pub fn stats() -> InteropStats {
    InteropStats {
        unbox_passes: marshal::PASSES.load(Ordering::Relaxed),
        slots_produced: marshal::SLOTS.load(Ordering::Relaxed),
    }
}

/// Interop statistics for monitoring
#[derive(Debug, Clone, Copy)]
pub struct InteropStats {
    pub unbox_passes: usize,
    pub slots_produced: usize,
}
