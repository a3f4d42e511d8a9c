//! Raw-pointer heap for foreign callers
//!
//! Here an `ObjectRef` is the address of a live boxed object in memory owned
//! by someone else. Reads are unaligned loads at `address + offset`.

use super::{ManagedHeap, ObjectRef};
use crate::interop::{PrimitiveKind, PrimitiveValue};

type Classifier = dyn Fn(ObjectRef) -> Option<PrimitiveKind> + Send + Sync;

/// Heap view over caller-owned memory
pub struct DirectHeap {
    classify: Box<Classifier>,
}

impl DirectHeap {
    /// Create a view that asks `classify` for the boxed kind of an object.
    ///
    /// # Safety
    /// Every non-null `ObjectRef` read through this heap must point to a live
    /// object at least `offset + kind.size()` bytes long for each read, and
    /// must stay live for the duration of the read.
    pub unsafe fn new<F>(classify: F) -> Self
    where
        F: Fn(ObjectRef) -> Option<PrimitiveKind> + Send + Sync + 'static,
    {
        Self {
            classify: Box::new(classify),
        }
    }
}

impl ManagedHeap for DirectHeap {
    fn read_primitive(&self, obj: ObjectRef, kind: PrimitiveKind, offset: i32) -> PrimitiveValue {
        debug_assert!(!obj.is_null(), "primitive read through a null reference");
        // SAFETY: the constructor contract guarantees the object is live and
        // large enough for this read.
        unsafe {
            let field = obj.as_ptr().offset(offset as isize);
            match kind {
                PrimitiveKind::Boolean => PrimitiveValue::Boolean(field.read() != 0),
                PrimitiveKind::Char => PrimitiveValue::Char(field.cast::<u16>().read_unaligned()),
                PrimitiveKind::Short => PrimitiveValue::Short(field.cast::<i16>().read_unaligned()),
                PrimitiveKind::Byte => PrimitiveValue::Byte(field.cast::<i8>().read()),
                PrimitiveKind::Int => PrimitiveValue::Int(field.cast::<i32>().read_unaligned()),
                PrimitiveKind::Long => PrimitiveValue::Long(field.cast::<i64>().read_unaligned()),
                PrimitiveKind::Float => PrimitiveValue::Float(field.cast::<f32>().read_unaligned()),
                PrimitiveKind::Double => {
                    PrimitiveValue::Double(field.cast::<f64>().read_unaligned())
                }
            }
        }
    }

    #[inline]
    fn boxed_kind(&self, obj: ObjectRef) -> Option<PrimitiveKind> {
        (self.classify)(obj)
    }
}
