//! VM data snapshot - frozen layout facts about the managed runtime
//!
//! Design: every unboxing pass needs to know where a boxed wrapper keeps its
//! payload. Those offsets (and a set of unrelated runtime constants sharing
//! the same lifecycle) are captured once from the host and never change:
//! 1. `VmData::capture` - build a snapshot value from a `LayoutSource`
//! 2. `initialize` - install the process-wide snapshot, exactly once
//! 3. `get` / `offset_of` - lock-free reads for the rest of the process
//!
//! Initialization is serialized by a mutex; reads go through a `OnceCell` and
//! take no lock. There is no teardown.

mod constants;


pub use constants::{Constant, ConstantKind};

use once_cell::sync::OnceCell;
use parking_lot::Mutex;

use crate::error::{fatal, Violation};
use crate::heap::LayoutSource;
use crate::interop::PrimitiveKind;
use crate::logging::log_vmdata_captured;

static VM_DATA: OnceCell<VmData> = OnceCell::new();
static INIT_LOCK: Mutex<()> = parking_lot::const_mutex(());

/// Captured layout constants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmData {
    boxing_offsets: [i32; PrimitiveKind::COUNT],
    values: [i64; Constant::COUNT],
}

impl VmData {
    /// Query `source` for every boxing offset and every named constant.
    ///
    /// A constant the host cannot answer is a bring-up defect and is fatal.
    pub fn capture<S: LayoutSource + ?Sized>(source: &S) -> Self {
        let mut boxing_offsets = [0; PrimitiveKind::COUNT];
        for kind in PrimitiveKind::ALL {
            boxing_offsets[kind.index()] = source.boxing_value_offset(kind);
        }

        let mut values = [0; Constant::COUNT];
        for &constant in Constant::ALL {
            values[constant.index()] = source
                .constant(constant.name())
                .unwrap_or_else(|| fatal(Violation::MissingConstant(constant.name())));
        }

        Self {
            boxing_offsets,
            values,
        }
    }

    /// Offset of the value field inside the boxed wrapper for `kind`
    #[inline]
    pub fn offset_of(&self, kind: PrimitiveKind) -> i32 {
        self.boxing_offsets[kind.index()]
    }

    #[inline]
    pub fn get(&self, constant: Constant) -> i64 {
        self.values[constant.index()]
    }

    /// Look a constant up by the name the host was queried with
    pub fn constant(&self, name: &str) -> Option<i64> {
        Constant::from_name(name).map(|constant| self.get(constant))
    }

    #[inline]
    pub fn address(&self, constant: Constant) -> usize {
        debug_assert_eq!(constant.kind(), ConstantKind::Address);
        self.get(constant) as usize
    }

    #[inline]
    pub fn flag(&self, constant: Constant) -> bool {
        debug_assert_eq!(constant.kind(), ConstantKind::Flag);
        self.get(constant) != 0
    }

    #[inline]
    pub fn page_size(&self) -> usize {
        self.get(Constant::PageSize) as usize
    }

    /// Deepest stack slot a frame map may reference; the host must report it
    pub fn max_frame_map_stack_offset(&self) -> i32 {
        let value = self.get(Constant::MaxFrameMapStackOffset);
        if value <= 0 {
            fatal(Violation::NonPositiveConstant {
                name: Constant::MaxFrameMapStackOffset.name(),
                value,
            });
        }
        value as i32
    }

    pub fn iter(&self) -> impl Iterator<Item = (Constant, i64)> + '_ {
        Constant::ALL.iter().map(move |&constant| (constant, self.get(constant)))
    }
}

/// Install the process-wide snapshot.
///
/// Must run once during bring-up, before any unboxing. A second call,
/// sequential or concurrent, is fatal.
pub fn initialize<S: LayoutSource + ?Sized>(source: &S) -> &'static VmData {
    let _guard = INIT_LOCK.lock();
    if VM_DATA.get().is_some() {
        fatal(Violation::SnapshotReinitialized);
    }

    let data = VmData::capture(source);
    if VM_DATA.set(data).is_err() {
        fatal(Violation::SnapshotReinitialized);
    }

    let data = get();
    log_vmdata_captured(data);
    data
}

/// The process-wide snapshot; fatal before `initialize`
#[inline]
pub fn get() -> &'static VmData {
    match VM_DATA.get() {
        Some(data) => data,
        None => fatal(Violation::SnapshotUninitialized),
    }
}

#[inline]
pub fn is_initialized() -> bool {
    VM_DATA.get().is_some()
}

/// Boxing offset for `kind` from the process-wide snapshot
#[inline]
pub fn offset_of(kind: PrimitiveKind) -> i32 {
    get().offset_of(kind)
}
