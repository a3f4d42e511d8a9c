//! Argument unboxing benchmarks
//!
//! Measures a full pass per arity, plus descriptor parsing on its own.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vmbridge::gc::HandleMark;
use vmbridge::heap::{BoxHeap, ObjectRef};
use vmbridge::interop::{ArgumentUnboxer, BasicType, CallKind, PrimitiveValue};
use vmbridge::signature::MethodSignature;
use vmbridge::vmdata::VmData;

fn arguments(heap: &BoxHeap, params: &[BasicType]) -> Vec<ObjectRef> {
    params
        .iter()
        .enumerate()
        .map(|(i, ty)| match ty {
            BasicType::Int => heap.box_value(PrimitiveValue::Int(i as i32)),
            BasicType::Long => heap.box_value(PrimitiveValue::Long(i as i64)),
            BasicType::Double => heap.box_value(PrimitiveValue::Double(i as f64)),
            _ => heap.alloc_object(),
        })
        .collect()
}

fn bench_unbox(c: &mut Criterion) {
    let heap = BoxHeap::default();
    let vm = VmData::capture(&heap);
    let cycle = [BasicType::Int, BasicType::Object, BasicType::Long, BasicType::Double];

    let mut group = c.benchmark_group("unbox");
    for arity in [0usize, 2, 4, 8, 16] {
        let params: Vec<_> = cycle.iter().copied().cycle().take(arity).collect();
        let signature = MethodSignature::new(params.iter().copied(), BasicType::Void);
        let args = arguments(&heap, &params);

        group.bench_with_input(BenchmarkId::from_parameter(arity), &args, |b, args| {
            b.iter(|| {
                let _mark = HandleMark::new().unwrap();
                ArgumentUnboxer::new(&heap, &vm, black_box(args))
                    .verify_box_types(false)
                    .unbox(black_box(&signature), CallKind::Static)
            })
        });
    }
    group.finish();
}

fn bench_verified_unbox(c: &mut Criterion) {
    let heap = BoxHeap::default();
    let vm = VmData::capture(&heap);
    let params = [BasicType::Int; 8];
    let signature = MethodSignature::new(params, BasicType::Void);
    let args = arguments(&heap, &params);

    c.bench_function("unbox_verified_8_ints", |b| {
        b.iter(|| {
            let _mark = HandleMark::new().unwrap();
            ArgumentUnboxer::new(&heap, &vm, black_box(&args))
                .verify_box_types(true)
                .unbox(&signature, CallKind::Static)
        })
    });
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_descriptor", |b| {
        b.iter(|| MethodSignature::parse(black_box("(IJLpkg/sub/Name;[[DZ[Lpkg/Other;)Lpkg/Out;")))
    });
}

criterion_group!(benches, bench_unbox, bench_verified_unbox, bench_parse);
criterion_main!(benches);
