//! Version tracking shared between a container and its cursors.
//!
//! Each container owns one [`VersionCell`] behind an `Rc`; cursors hold a
//! `Weak` back-reference plus a snapshot of the counters and buffer
//! identity taken at creation. Validation is a pure function of (snapshot,
//! live cell) and is re-evaluated on every cursor use, never cached. The
//! `Rc`/`Weak` split is a liveness token, not shared ownership: when the
//! container drops, the last `Rc` goes with it and every outstanding
//! cursor deterministically observes the fatal unbound state.

use std::cell::Cell;
use std::ptr::NonNull;

/// Live mutation state published by a container to its cursors.
///
/// The container is the sole writer. Both counters start at zero, only
/// increase, and in practice never wrap.
pub(crate) struct VersionCell {
    /// Bumped by any size-changing or rebinding mutation.
    structural: Cell<u64>,
    /// Bumped only when the backing buffer's identity changes: growth
    /// reallocation, copy-assignment, or an ownership transfer.
    identity: Cell<u64>,
    /// Identity token of the live buffer (its base address).
    head: Cell<*const ()>,
    /// Live logical element count.
    len: Cell<usize>,
}

impl VersionCell {
    /// Fresh state for a new container: both counters at zero.
    pub(crate) fn new(head: *const (), len: usize) -> Self {
        Self {
            structural: Cell::new(0),
            identity: Cell::new(0),
            head: Cell::new(head),
            len: Cell::new(len),
        }
    }

    pub(crate) fn structural(&self) -> u64 {
        self.structural.get()
    }

    pub(crate) fn identity(&self) -> u64 {
        self.identity.get()
    }

    pub(crate) fn head(&self) -> *const () {
        self.head.get()
    }

    pub(crate) fn len(&self) -> usize {
        self.len.get()
    }

    /// Record a size-changing mutation that kept the buffer.
    pub(crate) fn note_structural(&self, len: usize) {
        self.structural.set(self.structural.get() + 1);
        self.len.set(len);
    }

    /// Record a mutation that replaced the buffer (or emptied the
    /// container by transfer). Bumps both counters.
    pub(crate) fn note_identity(&self, head: *const (), len: usize) {
        self.structural.set(self.structural.get() + 1);
        self.identity.set(self.identity.get() + 1);
        self.head.set(head);
        self.len.set(len);
    }
}

/// Identity token for a container with no live allocation.
pub(crate) fn dangling_head() -> *const () {
    NonNull::<u8>::dangling().as_ptr().cast_const().cast()
}
