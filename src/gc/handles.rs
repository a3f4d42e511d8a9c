//! Thread-local handle blocks
//!
//! Every thread owns a stack of handle blocks. A block collects the object
//! references materialized while it is innermost; popping it releases them.
//! Blocks never cross threads.

use std::cell::RefCell;

use crate::config;
use crate::error::{fatal, FrameError, Violation};
use crate::heap::ObjectRef;
use crate::logging::{log_mark_pop, log_mark_push};

/// Identity of one pushed handle block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkId(u64);

impl MarkId {
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

struct HandleBlock {
    id: MarkId,
    refs: Vec<ObjectRef>,
}

#[derive(Default)]
struct BlockStack {
    blocks: Vec<HandleBlock>,
    next_id: u64,
}

thread_local! {
    static BLOCKS: RefCell<BlockStack> = RefCell::new(BlockStack::default());
}

/// Push a fresh block on this thread's stack
pub(crate) fn push_block() -> Result<MarkId, FrameError> {
    let frames = &config::current().frames;
    BLOCKS.with(|stack| {
        let mut stack = stack.borrow_mut();
        if stack.blocks.len() >= frames.max_depth {
            return Err(FrameError::DepthExceeded {
                limit: frames.max_depth,
            });
        }

        stack.next_id += 1;
        let id = MarkId(stack.next_id);
        stack.blocks.push(HandleBlock {
            id,
            refs: Vec::with_capacity(frames.block_capacity),
        });
        log_mark_push(id, stack.blocks.len());
        Ok(id)
    })
}

/// Pop the innermost block, which must be `id`
pub(crate) fn pop_block(id: MarkId) {
    // The thread-local may already be gone during thread teardown
    let _ = BLOCKS.try_with(|stack| {
        let mut stack = stack.borrow_mut();
        let Some(block) = stack.blocks.pop() else {
            tracing::error!(mark = id.raw(), "handle mark popped from an empty stack");
            return;
        };

        if block.id != id {
            tracing::error!(
                expected = id.raw(),
                found = block.id.raw(),
                "handle marks must be released in LIFO order"
            );
            debug_assert!(
                std::thread::panicking(),
                "handle marks must be released in LIFO order"
            );
        }
        log_mark_pop(block.id, stack.blocks.len(), block.refs.len());
    });
}

/// Record a reference usage against the innermost block.
///
/// Fatal when no handle mark is open on this thread.
pub fn track(obj: ObjectRef) {
    if obj.is_null() {
        return;
    }
    let tracked = BLOCKS.with(|stack| match stack.borrow_mut().blocks.last_mut() {
        Some(block) => {
            block.refs.push(obj);
            true
        }
        None => false,
    });
    if !tracked {
        fatal(Violation::NoActiveHandleMark);
    }
}

/// Number of open handle marks on this thread
pub fn depth() -> usize {
    BLOCKS.with(|stack| stack.borrow().blocks.len())
}

/// References held by the innermost block (0 when none is open)
pub fn live_references() -> usize {
    BLOCKS.with(|stack| stack.borrow().blocks.last().map_or(0, |block| block.refs.len()))
}

/// Ids of the open handle marks, outermost first
pub fn active_marks() -> Vec<MarkId> {
    BLOCKS.with(|stack| stack.borrow().blocks.iter().map(|block| block.id).collect())
}
