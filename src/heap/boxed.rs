//! In-process heap of boxed wrapper objects
//!
//! Objects are byte buffers laid out like the managed runtime lays out its
//! boxes: a header followed by the value field at the layout's offset. The
//! object table is a `DashMap`, so any number of threads can box and read
//! concurrently.

use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use tracing::trace;

use super::{LayoutSource, ManagedHeap, ObjectRef};
use crate::error::{fatal, Violation};
use crate::interop::{PrimitiveKind, PrimitiveValue};
use crate::vmdata::Constant;

const OBJECT_ALIGN: usize = 8;
const PAGE_SIZE: i64 = 4096;

/// Boxed wrapper layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxLayout {
    header_size: usize,
    value_offsets: [i32; PrimitiveKind::COUNT],
}

impl BoxLayout {
    /// 12-byte header with a narrow class word; 8-byte payloads are realigned to 16
    pub const fn compressed() -> Self {
        Self {
            header_size: 12,
            value_offsets: [12, 12, 12, 12, 12, 16, 12, 16],
        }
    }

    /// 16-byte header with a full class word
    pub const fn uncompressed() -> Self {
        Self {
            header_size: 16,
            value_offsets: [16; PrimitiveKind::COUNT],
        }
    }

    #[inline]
    pub const fn header_size(&self) -> usize {
        self.header_size
    }

    #[inline]
    pub const fn value_offset(&self, kind: PrimitiveKind) -> i32 {
        self.value_offsets[kind.index()]
    }

    #[inline]
    pub const fn is_compressed(&self) -> bool {
        self.header_size < 16
    }

    /// Allocation size for a box of `kind`, or a plain object when `None`
    pub fn object_size(&self, kind: Option<PrimitiveKind>) -> usize {
        let end = match kind {
            Some(kind) => self.value_offset(kind) as usize + kind.size(),
            None => self.header_size,
        };
        end.next_multiple_of(OBJECT_ALIGN)
    }
}

impl Default for BoxLayout {
    fn default() -> Self {
        Self::compressed()
    }
}

struct HeapObject {
    kind: Option<PrimitiveKind>,
    bytes: Box<[u8]>,
}

/// Concurrent in-process heap
pub struct BoxHeap {
    layout: BoxLayout,
    objects: DashMap<usize, HeapObject>,
    next_ref: AtomicUsize,
    overrides: DashMap<Constant, i64>,
}

impl BoxHeap {
    pub fn new(layout: BoxLayout) -> Self {
        Self {
            layout,
            objects: DashMap::with_capacity(64),
            next_ref: AtomicUsize::new(OBJECT_ALIGN),
            overrides: DashMap::new(),
        }
    }

    #[inline]
    pub fn layout(&self) -> &BoxLayout {
        &self.layout
    }

    /// Allocate a boxed wrapper holding `value`
    pub fn box_value(&self, value: PrimitiveValue) -> ObjectRef {
        let kind = value.kind();
        let mut bytes = vec![0u8; self.layout.object_size(Some(kind))].into_boxed_slice();
        let offset = self.layout.value_offset(kind) as usize;
        let (payload, len) = value.to_ne_bytes();
        bytes[offset..offset + len].copy_from_slice(&payload[..len]);
        self.insert(Some(kind), bytes)
    }

    /// Allocate a plain object with no payload
    pub fn alloc_object(&self) -> ObjectRef {
        let bytes = vec![0u8; self.layout.object_size(None)].into_boxed_slice();
        self.insert(None, bytes)
    }

    fn insert(&self, kind: Option<PrimitiveKind>, bytes: Box<[u8]>) -> ObjectRef {
        let raw = self.next_ref.fetch_add(OBJECT_ALIGN, Ordering::Relaxed);
        trace!(
            event = "object_allocated",
            object = raw,
            kind = kind.map_or("object", PrimitiveKind::name),
            size_bytes = bytes.len(),
            "object allocated"
        );
        self.objects.insert(raw, HeapObject { kind, bytes });
        ObjectRef::from_raw(raw)
    }

    /// Release `obj`; returns false if it was not live
    pub fn free(&self, obj: ObjectRef) -> bool {
        self.objects.remove(&obj.raw()).is_some()
    }

    pub fn contains(&self, obj: ObjectRef) -> bool {
        self.objects.contains_key(&obj.raw())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Report `value` for `constant` instead of the layout-derived default
    pub fn set_constant(&self, constant: Constant, value: i64) {
        self.overrides.insert(constant, value);
    }

    fn default_constant(&self, constant: Constant) -> i64 {
        let compressed = self.layout.is_compressed();
        match constant {
            Constant::PageSize => PAGE_SIZE,
            Constant::NarrowRefShift | Constant::NarrowClassShift if compressed => 3,
            Constant::NarrowClassSize if compressed => 4,
            Constant::ArrayHeaderSize => (self.layout.header_size + 4).next_multiple_of(OBJECT_ALIGN) as i64,
            Constant::VtableEntrySize => OBJECT_ALIGN as i64,
            Constant::BasicLockSize => OBJECT_ALIGN as i64,
            Constant::TlabAlignmentReserve => self.layout.object_size(None) as i64,
            Constant::MaxFrameMapStackOffset => PAGE_SIZE,
            Constant::CardTableShift => 9,
            _ => 0,
        }
    }
}

impl Default for BoxHeap {
    fn default() -> Self {
        Self::new(BoxLayout::default())
    }
}

impl ManagedHeap for BoxHeap {
    fn read_primitive(&self, obj: ObjectRef, kind: PrimitiveKind, offset: i32) -> PrimitiveValue {
        let Some(object) = self.objects.get(&obj.raw()) else {
            fatal(Violation::UnknownObject(obj));
        };
        let field = usize::try_from(offset)
            .ok()
            .and_then(|start| object.bytes.get(start..start + kind.size()));
        match field {
            Some(bytes) => PrimitiveValue::from_ne_bytes(kind, bytes),
            None => {
                let len = object.bytes.len();
                drop(object);
                fatal(Violation::OutOfBoundsRead {
                    obj,
                    offset,
                    size: kind.size(),
                    len,
                });
            }
        }
    }

    fn boxed_kind(&self, obj: ObjectRef) -> Option<PrimitiveKind> {
        self.objects.get(&obj.raw()).and_then(|object| object.kind)
    }
}

impl LayoutSource for BoxHeap {
    #[inline]
    fn boxing_value_offset(&self, kind: PrimitiveKind) -> i32 {
        self.layout.value_offset(kind)
    }

    fn constant(&self, name: &str) -> Option<i64> {
        let constant = Constant::from_name(name)?;
        let value = self
            .overrides
            .get(&constant)
            .map(|entry| *entry.value())
            .unwrap_or_else(|| self.default_constant(constant));
        Some(value)
    }
}
