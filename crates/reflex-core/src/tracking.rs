//! Active-subscriber tracking context
//!
//! Reads performed while a subscriber is evaluating are attributed to that
//! subscriber. The context is a thread-local stack: entering a
//! [`TrackingScope`] pushes, dropping it pops, so a subscriber constructed
//! inside another subscriber's tracked read hands control back to the outer
//! one when it finishes.
//!
//! # Invariants
//!
//! 1. The stack is empty outside of subscriber construction and re-evaluation.
//! 2. Only the innermost entry receives registrations.
//! 3. An [`untracked`] barrier hides every outer entry until it returns.

use crate::dependency::Watcher;
use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

thread_local! {
    static ACTIVE: RefCell<Vec<Option<Rc<dyn Watcher>>>> = const { RefCell::new(Vec::new()) };
}

/// RAII guard marking a watcher as the active reader
///
/// Dropping the guard pops the watcher and restores whichever reader was
/// active before it.
#[must_use = "dropping this guard ends dependency tracking"]
pub struct TrackingScope {
    depth: usize,
    // Bound to the thread that owns the stack entry.
    _not_send: PhantomData<Rc<()>>,
}

impl TrackingScope {
    /// Push `watcher` as the innermost active reader
    pub fn enter(watcher: Rc<dyn Watcher>) -> Self {
        Self::push(Some(watcher))
    }

    fn push(entry: Option<Rc<dyn Watcher>>) -> Self {
        let depth = ACTIVE.with(|stack| {
            let mut stack = stack.borrow_mut();
            stack.push(entry);
            stack.len()
        });
        Self {
            depth,
            _not_send: PhantomData,
        }
    }
}

impl Drop for TrackingScope {
    fn drop(&mut self) {
        ACTIVE.with(|stack| {
            let mut stack = stack.borrow_mut();
            debug_assert_eq!(stack.len(), self.depth, "tracking scopes dropped out of order");
            stack.pop();
        });
    }
}

/// The innermost active reader, if any
pub fn current() -> Option<Rc<dyn Watcher>> {
    ACTIVE.with(|stack| stack.borrow().last().cloned().flatten())
}

/// Whether a read right now would register a dependency
pub fn is_tracking() -> bool {
    ACTIVE.with(|stack| matches!(stack.borrow().last(), Some(Some(_))))
}

/// Number of entries on the stack, barriers included
pub fn depth() -> usize {
    ACTIVE.with(|stack| stack.borrow().len())
}

/// Run `f` with tracking suspended
///
/// Subscriber callbacks run under this barrier so reads they perform are not
/// charged to whichever subscriber happens to be evaluating further out.
pub fn untracked<R>(f: impl FnOnce() -> R) -> R {
    let _barrier = TrackingScope::push(None);
    f()
}
