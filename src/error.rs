//! Error taxonomy for the call boundary
//!
//! Two kinds of failure exist here. Recoverable ones (`FrameError`,
//! `SignatureError`, `ConfigError`) come back as `Result`. Internal
//! consistency violations never do: they go through [`fatal`], which logs and
//! panics so that unwinding still releases every open handle mark.

use std::path::PathBuf;

use crate::heap::ObjectRef;
use crate::interop::PrimitiveKind;

/// Internal consistency violation
///
/// Each variant is a defect in the caller or in subsystem bring-up ordering,
/// never a user-correctable condition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("argument count mismatch with signature: consumed {consumed}, array holds {len}")]
    ArgumentCountMismatch { consumed: usize, len: usize },

    #[error("signature consumes argument {index} but the array holds only {len}")]
    ArgumentOverrun { index: usize, len: usize },

    #[error("argument {index} must be a boxed {expected}, found {found}")]
    BoxKindMismatch {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },

    #[error("VM data read before initialization")]
    SnapshotUninitialized,

    #[error("VM data initialized twice")]
    SnapshotReinitialized,

    #[error("host does not define VM constant `{0}`")]
    MissingConstant(&'static str),

    #[error("VM constant `{name}` must be positive, got {value}")]
    NonPositiveConstant { name: &'static str, value: i64 },

    #[error("no handle mark is active on this thread")]
    NoActiveHandleMark,

    #[error("{0:?} is not a live heap object")]
    UnknownObject(ObjectRef),

    #[error("{size}-byte read at offset {offset} is outside {obj:?} ({len} bytes)")]
    OutOfBoundsRead {
        obj: ObjectRef,
        offset: i32,
        size: usize,
        len: usize,
    },
}

impl Violation {
    pub(crate) fn box_kind_mismatch(
        index: usize,
        expected: PrimitiveKind,
        found: Option<PrimitiveKind>,
    ) -> Self {
        Self::BoxKindMismatch {
            index,
            expected: expected.name(),
            found: found.map_or("a non-box object", PrimitiveKind::name),
        }
    }
}

/// Halt on an internal consistency violation.
#[cold]
#[track_caller]
pub fn fatal(violation: Violation) -> ! {
    crate::logging::log_violation(&violation);
    panic!("internal consistency violation: {violation}")
}

/// Handle mark acquisition failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    #[error("handle mark depth limit of {limit} reached")]
    DepthExceeded { limit: usize },
}

/// Malformed method descriptor
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignatureError {
    #[error("descriptor must start with '('")]
    MissingOpenParen,

    #[error("descriptor ends unexpectedly at offset {offset}")]
    UnexpectedEnd { offset: usize },

    #[error("unknown type tag {tag:?} at offset {offset}")]
    UnknownTag { tag: char, offset: usize },

    #[error("'V' is only valid as a return type (offset {offset})")]
    VoidParameter { offset: usize },

    #[error("class name starting at offset {offset} is not terminated by ';'")]
    UnterminatedClassName { offset: usize },

    #[error("empty class name at offset {offset}")]
    EmptyClassName { offset: usize },

    #[error("unexpected characters after return type at offset {offset}")]
    TrailingCharacters { offset: usize },
}

/// Configuration loading failure
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
