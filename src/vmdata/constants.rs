//! Named runtime constants captured alongside the boxing offsets

/// How a constant's raw value is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstantKind {
    /// Signed offset, shift or count
    Int,
    /// Size in bytes
    Size,
    /// Address in the host process (zero when absent)
    Address,
    /// Boolean capability flag
    Flag,
}

macro_rules! vm_constants {
    ($($variant:ident => ($name:literal, $kind:ident)),* $(,)?) => {
        /// Runtime constant known to the VM data snapshot
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Constant {
            $($variant),*
        }

        impl Constant {
            pub const ALL: &'static [Constant] = &[$(Constant::$variant),*];
            pub const COUNT: usize = Self::ALL.len();

            /// Name the host is queried with
            pub const fn name(self) -> &'static str {
                match self {
                    $(Constant::$variant => $name),*
                }
            }

            pub const fn kind(self) -> ConstantKind {
                match self {
                    $(Constant::$variant => ConstantKind::$kind),*
                }
            }
        }
    };
}

vm_constants! {
    // class layout
    ClassVtableStartOffset => ("class.vtable_start_offset", Int),
    ClassVtableLengthOffset => ("class.vtable_length_offset", Int),
    BaseVtableSize => ("class.base_vtable_size", Int),
    VtableEntrySize => ("sizeof.vtable_entry", Size),

    // method layout
    MethodExtraStackEntries => ("method.extra_stack_entries", Int),
    MaxFrameMapStackOffset => ("method.max_frame_map_stack_offset", Int),

    // compressed references
    NarrowRefBase => ("heap.narrow_ref_base", Address),
    NarrowRefShift => ("heap.narrow_ref_shift", Int),
    NarrowClassBase => ("heap.narrow_class_base", Address),
    NarrowClassShift => ("heap.narrow_class_shift", Int),

    // reference verification
    VerifyRefMask => ("heap.verify_ref_mask", Int),
    VerifyRefBits => ("heap.verify_ref_bits", Int),
    NonRefBits => ("heap.non_ref_bits", Int),

    // allocation
    SupportsInlineContigAlloc => ("heap.supports_inline_contig_alloc", Flag),
    HeapTopAddress => ("heap.top_address", Address),
    HeapEndAddress => ("heap.end_address", Address),
    TlabAlignmentReserve => ("heap.tlab_alignment_reserve", Size),

    // card table
    CardTableStart => ("card_table.start", Address),
    CardTableShift => ("card_table.shift", Int),

    // sizes
    PageSize => ("sizeof.page", Size),
    ExceptionTableElementSize => ("sizeof.exception_table_element", Size),
    LocalVariableTableElementSize => ("sizeof.local_variable_table_element", Size),
    ConstantPoolSize => ("sizeof.constant_pool", Size),
    NarrowClassSize => ("sizeof.narrow_class", Size),
    ArrayHeaderSize => ("sizeof.array_header", Size),
    BasicLockSize => ("sizeof.basic_lock", Size),

    // stubs
    IcMissStub => ("stub.ic_miss", Address),
    HandleWrongMethodStub => ("stub.handle_wrong_method", Address),
    DeoptUnpack => ("stub.deopt_unpack", Address),
    DeoptUnpackWithException => ("stub.deopt_unpack_with_exception", Address),
    DeoptUncommonTrap => ("stub.deopt_uncommon_trap", Address),

    // math intrinsics
    MathSin => ("math.sin", Address),
    MathCos => ("math.cos", Address),
    MathTan => ("math.tan", Address),
    MathExp => ("math.exp", Address),
    MathLog => ("math.log", Address),
    MathLog10 => ("math.log10", Address),
    MathPow => ("math.pow", Address),
}

impl Constant {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_name(name: &str) -> Option<Constant> {
        Self::ALL.iter().copied().find(|constant| constant.name() == name)
    }
}

impl core::fmt::Display for Constant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
