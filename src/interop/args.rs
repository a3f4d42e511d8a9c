//! Native call-argument buffer

use smallvec::SmallVec;

use super::types::{PrimitiveValue, SlotKind};
use crate::heap::ObjectRef;

/// One native call-argument slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NativeSlot {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Object(ObjectRef),
}

impl NativeSlot {
    #[inline]
    pub const fn kind(&self) -> SlotKind {
        match self {
            Self::Int(_) => SlotKind::Int,
            Self::Long(_) => SlotKind::Long,
            Self::Float(_) => SlotKind::Float,
            Self::Double(_) => SlotKind::Double,
            Self::Object(_) => SlotKind::Object,
        }
    }
}

impl From<PrimitiveValue> for NativeSlot {
    /// Widen a primitive into its slot: booleans become 0/1, `char`
    /// zero-extends, `short` and `byte` sign-extend.
    fn from(value: PrimitiveValue) -> Self {
        match value {
            PrimitiveValue::Boolean(v) => Self::Int(i32::from(v)),
            PrimitiveValue::Char(v) => Self::Int(i32::from(v)),
            PrimitiveValue::Short(v) => Self::Int(i32::from(v)),
            PrimitiveValue::Byte(v) => Self::Int(i32::from(v)),
            PrimitiveValue::Int(v) => Self::Int(v),
            PrimitiveValue::Long(v) => Self::Long(v),
            PrimitiveValue::Float(v) => Self::Float(v),
            PrimitiveValue::Double(v) => Self::Double(v),
        }
    }
}

/// Ordered argument sequence for one call, receiver first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArguments {
    slots: SmallVec<[NativeSlot; 8]>,
}

impl CallArguments {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: SmallVec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn push_int(&mut self, value: i32) {
        self.slots.push(NativeSlot::Int(value));
    }

    #[inline]
    pub fn push_long(&mut self, value: i64) {
        self.slots.push(NativeSlot::Long(value));
    }

    #[inline]
    pub fn push_float(&mut self, value: f32) {
        self.slots.push(NativeSlot::Float(value));
    }

    #[inline]
    pub fn push_double(&mut self, value: f64) {
        self.slots.push(NativeSlot::Double(value));
    }

    #[inline]
    pub fn push_oop(&mut self, obj: ObjectRef) {
        self.slots.push(NativeSlot::Object(obj));
    }

    #[inline]
    pub fn push_primitive(&mut self, value: PrimitiveValue) {
        self.slots.push(NativeSlot::from(value));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[NativeSlot] {
        &self.slots
    }

    pub fn iter(&self) -> core::slice::Iter<'_, NativeSlot> {
        self.slots.iter()
    }

    /// Call-stack words the arguments occupy; 64-bit slots take two
    pub fn size_in_words(&self) -> usize {
        self.slots.iter().map(|slot| slot.kind().words()).sum()
    }

    pub fn into_vec(self) -> Vec<NativeSlot> {
        self.slots.into_vec()
    }
}

impl core::ops::Index<usize> for CallArguments {
    type Output = NativeSlot;

    fn index(&self, index: usize) -> &NativeSlot {
        &self.slots[index]
    }
}

impl<'a> IntoIterator for &'a CallArguments {
    type Item = &'a NativeSlot;
    type IntoIter = core::slice::Iter<'a, NativeSlot>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}
