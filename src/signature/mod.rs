//! Method signatures - the tag sequence the unboxer walks
//!
//! A signature is an ordered list of parameter entries plus one return entry.
//! Entries parsed from a descriptor remember the byte range of their type
//! inside it; entries built in code do not. The unboxer treats the two
//! differently at the return position.

mod descriptor;


use core::fmt;
use core::ops::Range;

use crate::error::SignatureError;
use crate::interop::{BasicType, CallKind};

/// One position of a method signature
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SigEntry {
    ty: BasicType,
    range: Option<Range<usize>>,
}

impl SigEntry {
    #[inline]
    pub const fn new(ty: BasicType) -> Self {
        Self { ty, range: None }
    }

    /// Entry spanning `range` of its source descriptor
    #[inline]
    pub const fn ranged(ty: BasicType, range: Range<usize>) -> Self {
        Self {
            ty,
            range: Some(range),
        }
    }

    #[inline]
    pub const fn ty(&self) -> BasicType {
        self.ty
    }

    #[inline]
    pub fn range(&self) -> Option<Range<usize>> {
        self.range.clone()
    }

    /// Whether the entry was visited as part of a bounded range
    #[inline]
    pub const fn is_bounded(&self) -> bool {
        self.range.is_some()
    }
}

impl From<BasicType> for SigEntry {
    fn from(ty: BasicType) -> Self {
        Self::new(ty)
    }
}

/// Immutable method signature
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    params: Vec<SigEntry>,
    ret: SigEntry,
    descriptor: Option<String>,
}

impl MethodSignature {
    /// Build a signature from bare tags.
    ///
    /// # Panics
    /// If any parameter is `Void`.
    pub fn new(params: impl IntoIterator<Item = BasicType>, ret: BasicType) -> Self {
        let params: Vec<SigEntry> = params.into_iter().map(SigEntry::new).collect();
        assert!(
            params.iter().all(|entry| entry.ty != BasicType::Void),
            "void is only valid as a return type"
        );
        Self {
            params,
            ret: SigEntry::new(ret),
            descriptor: None,
        }
    }

    /// Parse a method descriptor such as `(I[JLpkg/Name;)V`
    pub fn parse(descriptor: &str) -> Result<Self, SignatureError> {
        let (params, ret) = descriptor::parse(descriptor)?;
        Ok(Self {
            params,
            ret,
            descriptor: Some(descriptor.to_owned()),
        })
    }

    #[inline]
    pub fn params(&self) -> &[SigEntry] {
        &self.params
    }

    #[inline]
    pub fn return_entry(&self) -> &SigEntry {
        &self.ret
    }

    #[inline]
    pub fn return_type(&self) -> BasicType {
        self.ret.ty
    }

    #[inline]
    pub fn parameter_count(&self) -> usize {
        self.params.len()
    }

    /// Handles an argument array must hold for this signature.
    ///
    /// One per parameter, one for the receiver of an instance call, and one
    /// for a plain object return entry, which the unboxer consumes as well.
    pub fn argument_count(&self, kind: CallKind) -> usize {
        let receiver = usize::from(kind == CallKind::Instance);
        let plain_object_return = usize::from(self.ret.ty == BasicType::Object && !self.ret.is_bounded());
        receiver + self.params.len() + plain_object_return
    }

    /// Every position in declaration order, flagged `true` for the return entry
    pub fn positions(&self) -> impl Iterator<Item = (&SigEntry, bool)> + '_ {
        self.params
            .iter()
            .map(|entry| (entry, false))
            .chain(core::iter::once((&self.ret, true)))
    }

    #[inline]
    pub fn descriptor(&self) -> Option<&str> {
        self.descriptor.as_deref()
    }

    /// Source text of a ranged entry, e.g. `Lpkg/Name;` or `[I`
    pub fn type_name(&self, entry: &SigEntry) -> Option<&str> {
        let range = entry.range.clone()?;
        self.descriptor.as_deref()?.get(range)
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(descriptor) = &self.descriptor {
            return f.write_str(descriptor);
        }
        f.write_str("(")?;
        for (i, entry) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(entry.ty.name())?;
        }
        write!(f, ") -> {}", self.ret.ty.name())
    }
}

impl core::str::FromStr for MethodSignature {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
