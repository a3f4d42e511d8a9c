//! Argument unboxing - boxed handles to native call slots
//!
//! Design: one straight-line pass over the signature, consuming handles from
//! the front of the argument array. Heap reads go through `ManagedHeap`,
//! payload offsets come from the VM data snapshot, and every reference
//! appended is tracked against the innermost open handle mark.

use core::sync::atomic::{AtomicUsize, Ordering};

use super::args::CallArguments;
use super::types::{BasicType, PrimitiveKind};
use crate::config;
use crate::error::{fatal, Violation};
use crate::gc;
use crate::heap::{ManagedHeap, ObjectRef};
use crate::logging::log_unbox_complete;
use crate::signature::{MethodSignature, SigEntry};
use crate::vmdata::{self, VmData};

pub(super) static PASSES: AtomicUsize = AtomicUsize::new(0);
pub(super) static SLOTS: AtomicUsize = AtomicUsize::new(0);

/// Whether the target method takes a receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    Static,
    Instance,
}

impl CallKind {
    #[inline]
    pub const fn has_receiver(self) -> bool {
        matches!(self, Self::Instance)
    }
}

/// Single-use unboxer bound to one argument array
pub struct ArgumentUnboxer<'a, H: ManagedHeap + ?Sized> {
    heap: &'a H,
    vm: &'a VmData,
    args: &'a [ObjectRef],
    jca: CallArguments,
    index: usize,
    verify: bool,
}

impl<'a, H: ManagedHeap + ?Sized> ArgumentUnboxer<'a, H> {
    pub fn new(heap: &'a H, vm: &'a VmData, args: &'a [ObjectRef]) -> Self {
        Self {
            heap,
            vm,
            args,
            jca: CallArguments::with_capacity(args.len()),
            index: 0,
            verify: config::current().unbox.verify_box_types,
        }
    }

    /// Override the configured box kind check for this pass
    pub fn verify_box_types(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Run the pass. Must be called inside an open `HandleMark`.
    ///
    /// Fatal when the signature and the argument array disagree on length.
    pub fn unbox(mut self, signature: &MethodSignature, kind: CallKind) -> CallArguments {
        let _span = tracing::trace_span!("unbox", call = ?kind, args = self.args.len()).entered();

        if kind.has_receiver() {
            let receiver = self.next_arg();
            self.push_object(receiver);
        }

        for (entry, is_return) in signature.positions() {
            self.visit(entry, is_return);
        }

        if self.index != self.args.len() {
            fatal(Violation::ArgumentCountMismatch {
                consumed: self.index,
                len: self.args.len(),
            });
        }

        PASSES.fetch_add(1, Ordering::Relaxed);
        SLOTS.fetch_add(self.jca.len(), Ordering::Relaxed);
        log_unbox_complete(signature, self.jca.len(), self.jca.size_in_words());
        self.jca
    }

    fn visit(&mut self, entry: &SigEntry, is_return: bool) {
        match entry.ty() {
            BasicType::Boolean => self.do_primitive(PrimitiveKind::Boolean, is_return),
            BasicType::Char => self.do_primitive(PrimitiveKind::Char, is_return),
            BasicType::Short => self.do_primitive(PrimitiveKind::Short, is_return),
            BasicType::Byte => self.do_primitive(PrimitiveKind::Byte, is_return),
            BasicType::Int => self.do_primitive(PrimitiveKind::Int, is_return),
            BasicType::Long => self.do_primitive(PrimitiveKind::Long, is_return),
            BasicType::Float => self.do_primitive(PrimitiveKind::Float, is_return),
            BasicType::Double => self.do_primitive(PrimitiveKind::Double, is_return),
            // Known quirk: a plain object entry consumes a handle even at the
            // return position, unlike every other tag. Callers size their
            // argument arrays around it, so it stays.
            BasicType::Object if !entry.is_bounded() => self.do_object(),
            BasicType::Object | BasicType::Array => {
                if !is_return {
                    self.do_object();
                }
            }
            BasicType::Void => {}
        }
    }

    fn do_primitive(&mut self, kind: PrimitiveKind, is_return: bool) {
        if is_return {
            return;
        }
        let obj = self.next_arg();
        if self.verify {
            let found = self.heap.boxed_kind(obj);
            if found != Some(kind) {
                fatal(Violation::box_kind_mismatch(self.index - 1, kind, found));
            }
        }
        let value = self.heap.read_primitive(obj, kind, self.vm.offset_of(kind));
        self.jca.push_primitive(value);
    }

    fn do_object(&mut self) {
        let obj = self.next_arg();
        self.push_object(obj);
    }

    #[inline]
    fn push_object(&mut self, obj: ObjectRef) {
        gc::track(obj);
        self.jca.push_oop(obj);
    }

    #[inline]
    fn next_arg(&mut self) -> ObjectRef {
        let Some(&obj) = self.args.get(self.index) else {
            fatal(Violation::ArgumentOverrun {
                index: self.index,
                len: self.args.len(),
            });
        };
        self.index += 1;
        obj
    }
}

/// Unbox `args` for `signature` against the process-wide VM data snapshot.
///
/// Usage:
/// ```ignore
/// let _mark = HandleMark::new()?;
/// let args = unbox_arguments(&heap, &signature, &boxed, CallKind::Instance);
/// ```
pub fn unbox_arguments<H: ManagedHeap + ?Sized>(
    heap: &H,
    signature: &MethodSignature,
    args: &[ObjectRef],
    kind: CallKind,
) -> CallArguments {
    ArgumentUnboxer::new(heap, vmdata::get(), args).unbox(signature, kind)
}
