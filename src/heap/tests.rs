//! Heap implementation tests

use super::*;
use crate::vmdata::Constant;

#[test]
fn test_layout_offsets() {
    let compressed = BoxLayout::compressed();
    assert!(compressed.is_compressed());
    assert_eq!(compressed.value_offset(PrimitiveKind::Int), 12);
    assert_eq!(compressed.value_offset(PrimitiveKind::Long), 16);
    assert_eq!(compressed.value_offset(PrimitiveKind::Double), 16);
    assert_eq!(compressed.object_size(Some(PrimitiveKind::Byte)), 16);
    assert_eq!(compressed.object_size(Some(PrimitiveKind::Long)), 24);
    assert_eq!(compressed.object_size(None), 16);

    let uncompressed = BoxLayout::uncompressed();
    assert!(!uncompressed.is_compressed());
    for kind in PrimitiveKind::ALL {
        assert_eq!(uncompressed.value_offset(kind), 16);
    }
    assert_eq!(uncompressed.object_size(Some(PrimitiveKind::Int)), 24);
}

#[test]
fn test_box_and_read_every_kind() {
    let heap = BoxHeap::default();
    let values = [
        PrimitiveValue::Boolean(true),
        PrimitiveValue::Char(0x263A),
        PrimitiveValue::Short(i16::MIN),
        PrimitiveValue::Byte(-1),
        PrimitiveValue::Int(0x1234_5678),
        PrimitiveValue::Long(-0x0102_0304_0506_0708),
        PrimitiveValue::Float(-0.125),
        PrimitiveValue::Double(6.02e23),
    ];

    for value in values {
        let kind = value.kind();
        let obj = heap.box_value(value);
        assert_eq!(heap.boxed_kind(obj), Some(kind));
        let offset = heap.boxing_value_offset(kind);
        assert_eq!(heap.read_primitive(obj, kind, offset), value);
    }
    assert_eq!(heap.len(), values.len());
}

#[test]
fn test_plain_objects_are_not_boxes() {
    let heap = BoxHeap::default();
    let obj = heap.alloc_object();
    assert!(!obj.is_null());
    assert_eq!(heap.boxed_kind(obj), None);
    assert_eq!(heap.boxed_kind(ObjectRef::NULL), None);
}

#[test]
fn test_free() {
    let heap = BoxHeap::default();
    let obj = heap.alloc_object();
    assert!(heap.contains(obj));
    assert!(heap.free(obj));
    assert!(!heap.free(obj));
    assert!(heap.is_empty());
}

#[test]
fn test_refs_are_distinct_and_aligned() {
    let heap = BoxHeap::default();
    let a = heap.alloc_object();
    let b = heap.box_value(PrimitiveValue::Int(1));
    assert_ne!(a, b);
    assert_eq!(a.raw() % 8, 0);
    assert_eq!(b.raw() % 8, 0);
}

#[test]
#[should_panic(expected = "is not a live heap object")]
fn test_read_unknown_object_is_fatal() {
    let heap = BoxHeap::default();
    heap.read_primitive(ObjectRef::from_raw(0x1000), PrimitiveKind::Int, 12);
}

#[test]
#[should_panic(expected = "8-byte read at offset 12")]
fn test_read_past_object_end_is_fatal() {
    let heap = BoxHeap::default();
    let obj = heap.box_value(PrimitiveValue::Int(1));
    heap.read_primitive(obj, PrimitiveKind::Long, 12);
}

#[test]
#[should_panic(expected = "offset -4")]
fn test_negative_offset_is_fatal() {
    let heap = BoxHeap::default();
    let obj = heap.box_value(PrimitiveValue::Int(1));
    heap.read_primitive(obj, PrimitiveKind::Int, -4);
}

#[test]
fn test_constants() {
    let heap = BoxHeap::default();
    assert_eq!(heap.constant("sizeof.page"), Some(4096));
    assert_eq!(heap.constant("heap.narrow_ref_shift"), Some(3));
    assert_eq!(heap.constant("method.max_frame_map_stack_offset"), Some(4096));
    assert_eq!(heap.constant("stub.ic_miss"), Some(0));
    assert_eq!(heap.constant("no.such.constant"), None);

    heap.set_constant(Constant::IcMissStub, 0xdead_0000);
    assert_eq!(heap.constant("stub.ic_miss"), Some(0xdead_0000));

    let uncompressed = BoxHeap::new(BoxLayout::uncompressed());
    assert_eq!(uncompressed.constant("heap.narrow_ref_shift"), Some(0));
}

#[test]
fn test_object_ref_debug() {
    assert_eq!(format!("{:?}", ObjectRef::NULL), "ObjectRef(null)");
    assert_eq!(format!("{:?}", ObjectRef::from_raw(0x40)), "ObjectRef(0x40)");
}

#[test]
fn test_direct_heap_reads_caller_memory() {
    #[repr(C, align(8))]
    struct BoxedLong {
        header: [u8; 16],
        value: i64,
    }

    let boxed = BoxedLong {
        header: [0; 16],
        value: -77,
    };
    let obj = ObjectRef::from_ptr(&boxed);
    let heap = unsafe {
        DirectHeap::new(move |candidate| (candidate == obj).then_some(PrimitiveKind::Long))
    };

    assert_eq!(heap.boxed_kind(obj), Some(PrimitiveKind::Long));
    assert_eq!(heap.boxed_kind(ObjectRef::from_raw(8)), None);
    assert_eq!(
        heap.read_primitive(obj, PrimitiveKind::Long, 16),
        PrimitiveValue::Long(-77)
    );
    assert_eq!(boxed.header.len(), 16);
}

#[test]
fn test_direct_heap_unaligned_read() {
    let mut bytes = [0u8; 32];
    bytes[13..17].copy_from_slice(&2.5f32.to_ne_bytes());
    let obj = ObjectRef::from_ptr(bytes.as_ptr());
    let heap = unsafe { DirectHeap::new(|_| Some(PrimitiveKind::Float)) };

    assert_eq!(
        heap.read_primitive(obj, PrimitiveKind::Float, 13),
        PrimitiveValue::Float(2.5)
    );
}
