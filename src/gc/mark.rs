//! Scope guard over one handle block

use core::marker::PhantomData;

use super::handles::{self, MarkId};
use crate::error::FrameError;

/// RAII handle mark
///
/// Construction pushes a handle block for the current thread; drop pops it on
/// every exit path, including unwinding. The guard is neither `Send` nor
/// `Sync`, so it cannot be released from another thread.
///
/// Usage:
/// ```ignore
/// let mark = HandleMark::new()?;
/// let args = unbox_arguments(&heap, &signature, &boxed, CallKind::Static);
/// // call into the VM with `args`
/// drop(mark);
/// ```
#[must_use = "dropping a HandleMark immediately releases its block"]
pub struct HandleMark {
    id: MarkId,
    _not_send: PhantomData<*const ()>,
}

impl HandleMark {
    #[inline]
    pub fn new() -> Result<Self, FrameError> {
        let id = handles::push_block()?;
        Ok(Self {
            id,
            _not_send: PhantomData,
        })
    }

    #[inline]
    pub fn id(&self) -> MarkId {
        self.id
    }
}

impl Drop for HandleMark {
    #[inline]
    fn drop(&mut self) {
        handles::pop_block(self.id);
    }
}

impl core::fmt::Debug for HandleMark {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HandleMark").field("id", &self.id).finish()
    }
}

/// Run `f` inside a fresh handle mark
pub fn with_handle_mark<R>(f: impl FnOnce() -> R) -> Result<R, FrameError> {
    let _mark = HandleMark::new()?;
    Ok(f())
}
