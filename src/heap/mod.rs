//! Managed heap access - the host side of the call boundary
//!
//! Design: the unboxer never touches managed memory directly. It goes through
//! two narrow traits the hosting runtime implements:
//! 1. `LayoutSource` - answers layout queries once, at snapshot capture
//! 2. `ManagedHeap` - reads primitive payloads out of boxed wrappers
//!
//! Two hosts ship with the crate:
//! - `boxed.rs` - in-process heap with a concurrent object table
//! - `direct.rs` - raw-pointer heap for callers that hand over real addresses

mod boxed;
mod direct;

#[cfg(test)]
mod tests;

pub use boxed::{BoxHeap, BoxLayout};
pub use direct::DirectHeap;

use crate::interop::{PrimitiveKind, PrimitiveValue};

/// Opaque reference to a managed object
///
/// The bits are owned by the host: an object table key for `BoxHeap`, an
/// address for `DirectHeap`. Zero is always null.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ObjectRef(usize);

impl ObjectRef {
    pub const NULL: ObjectRef = ObjectRef(0);

    #[inline]
    pub const fn from_raw(bits: usize) -> Self {
        Self(bits)
    }

    #[inline]
    pub fn from_ptr<T>(ptr: *const T) -> Self {
        Self(ptr as usize)
    }

    #[inline]
    pub const fn raw(self) -> usize {
        self.0
    }

    #[inline]
    pub fn as_ptr(self) -> *const u8 {
        self.0 as *const u8
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl core::fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_null() {
            write!(f, "ObjectRef(null)")
        } else {
            write!(f, "ObjectRef({:#x})", self.0)
        }
    }
}

/// Layout facts the host reports at snapshot capture
pub trait LayoutSource {
    /// Byte offset of the value field inside the boxed wrapper for `kind`
    fn boxing_value_offset(&self, kind: PrimitiveKind) -> i32;

    /// Value of the named runtime constant, `None` if the host has no such constant
    fn constant(&self, name: &str) -> Option<i64>;
}

/// Read access to boxed wrapper objects
pub trait ManagedHeap {
    /// Read the `kind` payload stored `offset` bytes into `obj`
    fn read_primitive(&self, obj: ObjectRef, kind: PrimitiveKind, offset: i32) -> PrimitiveValue;

    /// Kind of the boxed wrapper behind `obj`, `None` when it is not a box
    fn boxed_kind(&self, obj: ObjectRef) -> Option<PrimitiveKind>;
}

impl<H: ManagedHeap + ?Sized> ManagedHeap for &H {
    #[inline]
    fn read_primitive(&self, obj: ObjectRef, kind: PrimitiveKind, offset: i32) -> PrimitiveValue {
        (**self).read_primitive(obj, kind, offset)
    }

    #[inline]
    fn boxed_kind(&self, obj: ObjectRef) -> Option<PrimitiveKind> {
        (**self).boxed_kind(obj)
    }
}
