//! Raw buffer management: the only module containing `unsafe` code.
//!
//! [`RawBuf`] acquires and releases uninitialized storage and performs
//! placement construction, relocation and destruction of single elements at
//! arbitrary slot offsets. It knows nothing about logical size, slack, or
//! cursors; the container layers that bookkeeping on top. Every `unsafe`
//! block carries a `// SAFETY:` comment.

use std::alloc::{alloc, dealloc, handle_alloc_error, Layout};
use std::mem;
use std::ptr::{self, NonNull};

/// An owned region of uninitialized storage for `cap` elements of `T`.
///
/// Dropping a `RawBuf` releases the storage without destructing any
/// elements — callers must destruct every constructed slot first.
pub(crate) struct RawBuf<T> {
    ptr: NonNull<T>,
    cap: usize,
}

impl<T> RawBuf<T> {
    /// A buffer with no backing allocation. Used for zero capacity and for
    /// zero-sized element types, which never allocate.
    pub(crate) const fn dangling() -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: 0,
        }
    }

    /// Acquire storage for `cap` elements. No element is constructed.
    ///
    /// # Panics
    ///
    /// Panics if the requested layout overflows `isize` (internal
    /// consistency failure), and aborts via [`handle_alloc_error`] if the
    /// allocator refuses the request.
    pub(crate) fn allocate(cap: usize) -> Self {
        if cap == 0 || mem::size_of::<T>() == 0 {
            // Slot arithmetic on a dangling pointer is a no-op for ZSTs,
            // so the capacity is still tracked.
            return Self {
                ptr: NonNull::dangling(),
                cap,
            };
        }
        let layout = match Layout::array::<T>(cap) {
            Ok(layout) => layout,
            Err(_) => panic!("buffer layout overflow for capacity {cap}"),
        };
        // SAFETY: `layout` has non-zero size (cap > 0 and T is not a ZST).
        let raw = unsafe { alloc(layout) };
        match NonNull::new(raw.cast::<T>()) {
            Some(ptr) => Self { ptr, cap },
            None => handle_alloc_error(layout),
        }
    }

    /// Total capacity in element slots.
    pub(crate) fn capacity(&self) -> usize {
        self.cap
    }

    /// Base pointer of the region. Valid for `cap` slots; dangling when
    /// nothing is allocated.
    pub(crate) fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Buffer identity token: the base address, type-erased. Two buffers
    /// compare equal only if they are the same allocation (or both
    /// dangling).
    pub(crate) fn identity(&self) -> *const () {
        self.ptr.as_ptr().cast_const().cast()
    }

    /// Placement-construct `value` into `slot`.
    ///
    /// # Safety
    ///
    /// `slot < cap`, and the slot must currently be uninitialized.
    pub(crate) unsafe fn write(&mut self, slot: usize, value: T) {
        debug_assert!(slot < self.cap, "slot {slot} past capacity {}", self.cap);
        // SAFETY: caller guarantees the slot is in range and vacant.
        unsafe { ptr::write(self.ptr.as_ptr().add(slot), value) }
    }

    /// Move the element out of `slot`, leaving it uninitialized.
    ///
    /// # Safety
    ///
    /// `slot < cap`, and the slot must hold a constructed element that is
    /// not read again before being rewritten.
    pub(crate) unsafe fn take(&mut self, slot: usize) -> T {
        debug_assert!(slot < self.cap, "slot {slot} past capacity {}", self.cap);
        // SAFETY: caller guarantees the slot is in range and constructed.
        unsafe { ptr::read(self.ptr.as_ptr().add(slot)) }
    }

    /// Destruct the element in `slot`, leaving it uninitialized.
    ///
    /// # Safety
    ///
    /// `slot < cap`, and the slot must hold a constructed element.
    pub(crate) unsafe fn drop_in_place(&mut self, slot: usize) {
        debug_assert!(slot < self.cap, "slot {slot} past capacity {}", self.cap);
        // SAFETY: caller guarantees the slot is in range and constructed.
        unsafe { ptr::drop_in_place(self.ptr.as_ptr().add(slot)) }
    }
}

impl<T> Drop for RawBuf<T> {
    fn drop(&mut self) {
        if self.cap == 0 || mem::size_of::<T>() == 0 {
            return;
        }
        // The layout was validated at allocation time.
        let layout = match Layout::array::<T>(self.cap) {
            Ok(layout) => layout,
            Err(_) => return,
        };
        // SAFETY: `ptr` was obtained from `alloc` with exactly this layout
        //  and has not been released before (drop runs once).
        unsafe { dealloc(self.ptr.as_ptr().cast(), layout) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_capacity_never_allocates() {
        let buf = RawBuf::<u64>::allocate(0);
        assert_eq!(buf.capacity(), 0);
        assert_eq!(buf.identity(), RawBuf::<u64>::dangling().identity());
    }

    #[test]
    fn write_then_take_round_trips() {
        let mut buf = RawBuf::<String>::allocate(4);
        // SAFETY: slots 1 and 3 are in range and vacant, then constructed.
        unsafe {
            buf.write(3, String::from("rear"));
            buf.write(1, String::from("mid"));
            assert_eq!(buf.take(3), "rear");
            buf.drop_in_place(1);
        }
    }

    #[test]
    fn distinct_allocations_have_distinct_identity() {
        let a = RawBuf::<u32>::allocate(8);
        let b = RawBuf::<u32>::allocate(8);
        assert_ne!(a.identity(), b.identity());
    }

    #[test]
    fn zst_buffers_track_capacity_without_allocating() {
        let mut buf = RawBuf::<()>::allocate(16);
        assert_eq!(buf.capacity(), 16);
        // SAFETY: ZST writes touch no memory.
        unsafe {
            buf.write(7, ());
            buf.take(7);
        }
    }
}
