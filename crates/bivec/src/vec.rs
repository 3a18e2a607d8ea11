//! The double-ended growable vector.
//!
//! [`BiVec`] owns exactly one contiguous buffer with free slack on both
//! sides of the logical element range. Pushes on either end consume the
//! slack on that side; when a side runs out, the buffer is replaced by one
//! of twice the total capacity without shifting existing elements. Every
//! mutation is recorded in a shared [`VersionCell`](crate::version) so
//! outstanding cursors can classify exactly how stale they are.
//!
//! # Layout invariants
//!
//! `front_slack + len + rear_slack == capacity` at all times; slots
//! `[front_slack, front_slack + len)` hold constructed elements and every
//! other slot is uninitialized memory. A violation of the slack identity
//! is an unrecoverable internal error and panics.

use std::fmt;
use std::rc::Rc;
use std::slice;

use crate::cursor::{Cursor, CursorMut};
use crate::error::Error;
use crate::raw::RawBuf;
use crate::version::{dangling_head, VersionCell};

/// A growable sequence with amortized O(1) pushes on both ends and
/// version-stamped cursor invalidation tracking.
///
/// Single-threaded by design: no internal synchronization, one logical
/// owner mutating at a time (`Rc` state makes the type `!Send`, which is
/// deliberate).
pub struct BiVec<T> {
    buf: RawBuf<T>,
    /// Free slots before the first logical element; also the offset of the
    /// logical front within the buffer.
    front_slack: usize,
    /// Free slots after the last logical element.
    rear_slack: usize,
    /// Logical element count.
    len: usize,
    state: Rc<VersionCell>,
}

impl<T> BiVec<T> {
    /// Capacity of a freshly created empty container, and the floor for
    /// the first growth of a container that started with no allocation.
    pub const INITIAL_CAPACITY: usize = 8;

    /// An empty container with the default initial capacity, all of it as
    /// rear slack.
    #[must_use]
    pub fn new() -> Self {
        let buf = RawBuf::allocate(Self::INITIAL_CAPACITY);
        let state = Rc::new(VersionCell::new(buf.identity(), 0));
        Self {
            buf,
            front_slack: 0,
            rear_slack: Self::INITIAL_CAPACITY,
            len: 0,
            state,
        }
    }

    /// A container of `len` default-constructed elements in an exact-fit
    /// buffer with no slack on either side.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConstruction`] if `len` is zero; nothing is
    /// allocated in that case.
    pub fn with_len(len: usize) -> Result<Self, Error>
    where
        T: Default,
    {
        if len == 0 {
            return Err(Error::InvalidConstruction { requested: len });
        }
        let buf = build_buf(len, 0, len, |_| T::default());
        let state = Rc::new(VersionCell::new(buf.identity(), len));
        Ok(Self {
            buf,
            front_slack: 0,
            rear_slack: 0,
            len,
            state,
        })
    }

    /// A container holding clones of the elements between two cursors of
    /// `owner`, in an exact-fit buffer.
    ///
    /// Both cursors are fully validated against `owner` before any
    /// allocation happens.
    ///
    /// # Errors
    ///
    /// Propagates cursor validation errors ([`Error::UnboundCursor`],
    /// [`Error::CrossContainer`], [`Error::Invalidated`]), returns
    /// [`Error::IndexOutOfRange`] for a cursor parked outside `[0, len]`,
    /// and [`Error::InvalidConstruction`] for a reversed range.
    pub fn from_cursor_range(
        owner: &BiVec<T>,
        start: &Cursor<T>,
        end: &Cursor<T>,
    ) -> Result<Self, Error>
    where
        T: Clone,
    {
        start.validate_against(owner, false)?;
        end.validate_against(owner, false)?;
        // An in-sync cursor may sit anywhere; pin both positions into
        // [0, len] before touching the element range.
        for position in [start.position(), end.position()] {
            if position < 0 || position > owner.len as i64 {
                return Err(Error::IndexOutOfRange {
                    index: position,
                    len: owner.len,
                });
            }
        }
        let (a, b) = (start.position(), end.position());
        if b < a {
            return Err(Error::InvalidConstruction { requested: 0 });
        }
        let count = (b - a) as usize;
        let range = &owner.as_slice()[a as usize..b as usize];
        let buf = build_buf(count, 0, count, |slot| range[slot].clone());
        let state = Rc::new(VersionCell::new(buf.identity(), count));
        Ok(Self {
            buf,
            front_slack: 0,
            rear_slack: 0,
            len: count,
            state,
        })
    }

    /// Logical element count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the logical element range is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total buffer capacity in element slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Free slots before the logical front.
    #[must_use]
    pub fn front_slack(&self) -> usize {
        self.front_slack
    }

    /// Free slots after the logical back.
    #[must_use]
    pub fn rear_slack(&self) -> usize {
        self.rear_slack
    }

    /// Bounds-checked read access to the element at logical index `index`.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if `index >= len`.
    pub fn get(&self, index: usize) -> Result<&T, Error> {
        if index >= self.len {
            return Err(Error::IndexOutOfRange {
                index: index as i64,
                len: self.len,
            });
        }
        Ok(&self.as_slice()[index])
    }

    /// Bounds-checked write access to the element at logical index `index`.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if `index >= len`.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T, Error> {
        if index >= self.len {
            return Err(Error::IndexOutOfRange {
                index: index as i64,
                len: self.len,
            });
        }
        Ok(&mut self.as_mut_slice()[index])
    }

    /// The logical element range as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: slots [front_slack, front_slack + len) are constructed,
        //  and a zero-length slice from the dangling base is valid.
        unsafe { slice::from_raw_parts(self.buf.as_ptr().add(self.front_slack), self.len) }
    }

    /// The logical element range as a mutable slice.
    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as for `as_slice`, and `&mut self` guarantees exclusivity.
        unsafe { slice::from_raw_parts_mut(self.buf.as_ptr().add(self.front_slack), self.len) }
    }

    /// Borrowing iterator over the logical element range.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Mutably borrowing iterator over the logical element range.
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// Append an element at the rear, growing if the rear slack is
    /// exhausted.
    pub fn push_back(&mut self, value: T) {
        self.assert_bookkeeping();
        if self.rear_slack == 0 {
            self.grow_rear(value);
        } else {
            let slot = self.front_slack + self.len;
            // SAFETY: `rear_slack > 0` puts `slot` inside the buffer, and
            //  the slot is outside the constructed range.
            unsafe { self.buf.write(slot, value) };
            self.len += 1;
            self.rear_slack -= 1;
            self.state.note_structural(self.len);
        }
    }

    /// Prepend an element at the front, growing if the front slack is
    /// exhausted.
    pub fn push_front(&mut self, value: T) {
        self.assert_bookkeeping();
        if self.front_slack == 0 {
            self.grow_front(value);
        } else {
            let slot = self.front_slack - 1;
            // SAFETY: `front_slack > 0` puts `slot` inside the buffer, and
            //  the slot is outside the constructed range.
            unsafe { self.buf.write(slot, value) };
            self.front_slack -= 1;
            self.len += 1;
            self.state.note_structural(self.len);
        }
    }

    /// Construct an element in place at the rear from a constructor
    /// closure, with the same growth rule as [`push_back`](Self::push_back).
    pub fn emplace_back(&mut self, build: impl FnOnce() -> T) {
        self.assert_bookkeeping();
        if self.rear_slack == 0 {
            self.grow_rear(build());
        } else {
            let slot = self.front_slack + self.len;
            // SAFETY: as in `push_back`; the closure's value is written
            //  directly into the vacant slot.
            unsafe { self.buf.write(slot, build()) };
            self.len += 1;
            self.rear_slack -= 1;
            self.state.note_structural(self.len);
        }
    }

    /// Remove and return the rear element.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] on an empty container; no state is
    /// disturbed.
    pub fn pop_back(&mut self) -> Result<T, Error> {
        if self.len == 0 {
            return Err(Error::IndexOutOfRange { index: -1, len: 0 });
        }
        let slot = self.front_slack + self.len - 1;
        // SAFETY: the rear slot is constructed; it leaves the logical
        //  range in the same statement.
        let value = unsafe { self.buf.take(slot) };
        self.len -= 1;
        self.rear_slack += 1;
        self.state.note_structural(self.len);
        Ok(value)
    }

    /// Remove and return the front element.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] on an empty container; no state is
    /// disturbed.
    pub fn pop_front(&mut self) -> Result<T, Error> {
        if self.len == 0 {
            return Err(Error::IndexOutOfRange { index: 0, len: 0 });
        }
        let slot = self.front_slack;
        // SAFETY: the front slot is constructed; it leaves the logical
        //  range in the same statement.
        let value = unsafe { self.buf.take(slot) };
        self.front_slack += 1;
        self.len -= 1;
        self.state.note_structural(self.len);
        Ok(value)
    }

    /// Remove every element, keeping the buffer. Structural mutation.
    pub fn clear(&mut self) {
        for offset in 0..self.len {
            // SAFETY: every slot in the logical range is constructed.
            unsafe { self.buf.drop_in_place(self.front_slack + offset) };
        }
        self.rear_slack += self.len;
        self.len = 0;
        self.state.note_structural(0);
    }

    /// Elementwise truncating assignment: copies `min(self.len(), source
    /// length)` elements from `source` and pops this container's own
    /// elements beyond that size. Assignment never grows the destination;
    /// this asymmetric contract is relied on by the elementwise math layer.
    ///
    /// Source elements may be of any type convertible into `T`.
    pub fn assign_from<I>(&mut self, source: I)
    where
        I: IntoIterator,
        I::IntoIter: ExactSizeIterator,
        I::Item: Into<T>,
    {
        let source = source.into_iter();
        let target = self.len.min(source.len());
        while self.len > target {
            // Cannot fail: len > target >= 0.
            let _ = self.pop_back();
        }
        for (slot, value) in self.as_mut_slice().iter_mut().zip(source) {
            *slot = value.into();
        }
    }

    /// Transfer buffer ownership out of `self`, equivalent to a move
    /// assignment: the returned container starts with fresh version
    /// counters, while `self` becomes empty with zero capacity and both of
    /// its counters bumped so any outstanding cursor into it reports
    /// invalidation rather than reading stale memory.
    pub fn take(&mut self) -> Self {
        let buf = std::mem::replace(&mut self.buf, RawBuf::dangling());
        let state = Rc::new(VersionCell::new(buf.identity(), self.len));
        let moved = Self {
            buf,
            front_slack: self.front_slack,
            rear_slack: self.rear_slack,
            len: self.len,
            state,
        };
        self.front_slack = 0;
        self.rear_slack = 0;
        self.len = 0;
        self.state.note_identity(dangling_head(), 0);
        moved
    }

    /// Read-only cursor at the logical front (position 0).
    #[must_use]
    pub fn cursor(&self) -> Cursor<T> {
        self.cursor_at(0)
    }

    /// Read-only cursor one past the logical back (position `len`).
    #[must_use]
    pub fn cursor_end(&self) -> Cursor<T> {
        self.cursor_at(self.len as i64)
    }

    /// Read-only cursor at an arbitrary position. The position is not
    /// bounds-checked at creation; every use re-validates.
    #[must_use]
    pub fn cursor_at(&self, position: i64) -> Cursor<T> {
        Cursor::bind(&self.state, position)
    }

    /// Mutable cursor at the logical front.
    #[must_use]
    pub fn cursor_mut(&mut self) -> CursorMut<T> {
        self.cursor_at_mut(0)
    }

    /// Mutable cursor one past the logical back.
    #[must_use]
    pub fn cursor_end_mut(&mut self) -> CursorMut<T> {
        self.cursor_at_mut(self.len as i64)
    }

    /// Mutable cursor at an arbitrary position.
    #[must_use]
    pub fn cursor_at_mut(&mut self, position: i64) -> CursorMut<T> {
        CursorMut::bind(&self.state, position)
    }

    pub(crate) fn state(&self) -> &Rc<VersionCell> {
        &self.state
    }

    /// Fatal degenerate guard: the slack identity must hold before any
    /// push is serviced. A violation means the container's own bookkeeping
    /// is broken and must not be papered over.
    fn assert_bookkeeping(&self) {
        assert!(
            self.front_slack + self.len + self.rear_slack == self.buf.capacity(),
            "slack bookkeeping corrupted: front {} + len {} + rear {} != capacity {}",
            self.front_slack,
            self.len,
            self.rear_slack,
            self.buf.capacity(),
        );
    }

    /// Replace the buffer with one of twice the capacity, keeping the
    /// front offset, then append `value`. Rear-triggered growth.
    #[cold]
    fn grow_rear(&mut self, value: T) {
        let old_cap = self.buf.capacity();
        let new_cap = if old_cap == 0 {
            Self::INITIAL_CAPACITY
        } else {
            old_cap * 2
        };
        let mut new_buf = RawBuf::allocate(new_cap);
        let front = self.front_slack;
        // SAFETY: `front + len < new_cap` because `front + len == old_cap`
        //  (rear slack was zero) and `new_cap > old_cap`. Each source slot
        //  is constructed and read exactly once; each target slot is fresh.
        unsafe {
            new_buf.write(front + self.len, value);
            for offset in 0..self.len {
                let elem = self.buf.take(front + offset);
                new_buf.write(front + offset, elem);
            }
        }
        // Old storage is released without destructing: every element was
        // moved out above.
        self.buf = new_buf;
        self.len += 1;
        self.rear_slack = new_cap - self.front_slack - self.len;
        self.state.note_identity(self.buf.identity(), self.len);
    }

    /// Mirror image of [`grow_rear`](Self::grow_rear): the new front lands
    /// at the old total capacity, freeing one slot below it for `value`.
    #[cold]
    fn grow_front(&mut self, value: T) {
        let old_cap = self.buf.capacity();
        let (new_cap, new_front) = if old_cap == 0 {
            (Self::INITIAL_CAPACITY, Self::INITIAL_CAPACITY)
        } else {
            (old_cap * 2, old_cap)
        };
        let mut new_buf = RawBuf::allocate(new_cap);
        // SAFETY: `new_front + len <= new_cap` because `len <= old_cap` and
        //  `new_front + old_cap == new_cap`; `new_front >= 1` so the
        //  prepended slot exists. Source slots are constructed and read
        //  exactly once; target slots are fresh.
        unsafe {
            new_buf.write(new_front - 1, value);
            for offset in 0..self.len {
                let elem = self.buf.take(self.front_slack + offset);
                new_buf.write(new_front + offset, elem);
            }
        }
        self.buf = new_buf;
        self.front_slack = new_front - 1;
        self.len += 1;
        self.rear_slack = new_cap - self.front_slack - self.len;
        self.state.note_identity(self.buf.identity(), self.len);
    }
}

/// Allocate `cap` slots and construct `count` elements at consecutive
/// offsets starting at `offset`. If a constructor panics, the elements
/// already written are destructed before the unwind continues, so no slot
/// is destructed twice or leaked.
///
/// Caller contract: `offset + count <= cap`.
fn build_buf<T>(
    cap: usize,
    offset: usize,
    count: usize,
    mut construct: impl FnMut(usize) -> T,
) -> RawBuf<T> {
    struct Partial<'a, T> {
        buf: &'a mut RawBuf<T>,
        offset: usize,
        written: usize,
    }

    impl<T> Drop for Partial<'_, T> {
        fn drop(&mut self) {
            for slot in 0..self.written {
                // SAFETY: slots `[offset, offset + written)` hold
                //  constructed elements nothing else owns yet.
                unsafe { self.buf.drop_in_place(self.offset + slot) };
            }
        }
    }

    let mut buf = RawBuf::allocate(cap);
    let mut partial = Partial {
        buf: &mut buf,
        offset,
        written: 0,
    };
    for slot in 0..count {
        let value = construct(slot);
        // SAFETY: `offset + slot < cap` by the caller contract, and each
        //  slot is fresh and written once.
        unsafe { partial.buf.write(partial.offset + partial.written, value) };
        partial.written += 1;
    }
    std::mem::forget(partial);
    buf
}

impl<T> Drop for BiVec<T> {
    fn drop(&mut self) {
        for offset in 0..self.len {
            // SAFETY: every slot in the logical range is constructed, and
            //  drop runs once.
            unsafe { self.buf.drop_in_place(self.front_slack + offset) };
        }
        // The buffer itself is released by RawBuf's drop, exactly once.
        // Outstanding cursors observe the death of the version cell.
    }
}

impl<T> Default for BiVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for BiVec<T> {
    /// Independent buffer with the same layout (capacity and front
    /// offset); the clone's version counters start at zero.
    fn clone(&self) -> Self {
        let source = self.as_slice();
        let buf = build_buf(self.buf.capacity(), self.front_slack, self.len, |slot| {
            source[slot].clone()
        });
        let state = Rc::new(VersionCell::new(buf.identity(), self.len));
        Self {
            buf,
            front_slack: self.front_slack,
            rear_slack: self.rear_slack,
            len: self.len,
            state,
        }
    }

    /// Copy-assignment: adopts an independent copy of `source`'s buffer,
    /// destroys the current elements, and bumps both version counters so
    /// existing cursors into `self` report invalidation.
    ///
    /// The copy is built completely before anything of `self` is touched:
    /// a panicking element clone leaves `self` exactly as it was, with no
    /// slot destructed twice.
    fn clone_from(&mut self, source: &Self) {
        let values = source.as_slice();
        let buf = build_buf(source.buf.capacity(), source.front_slack, source.len, |slot| {
            values[slot].clone()
        });
        for offset in 0..self.len {
            // SAFETY: every slot in the logical range is constructed.
            unsafe { self.buf.drop_in_place(self.front_slack + offset) };
        }
        self.buf = buf;
        self.front_slack = source.front_slack;
        self.rear_slack = source.rear_slack;
        self.len = source.len;
        self.state.note_identity(self.buf.identity(), self.len);
    }
}

impl<T: fmt::Debug> fmt::Debug for BiVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: PartialEq> PartialEq for BiVec<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for BiVec<T> {}

impl<T> std::ops::Index<usize> for BiVec<T> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if `index` is outside the logical range; use
    /// [`get`](Self::get) for the recoverable form.
    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T> std::ops::IndexMut<usize> for BiVec<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len;
        match self.get_mut(index) {
            Ok(value) => value,
            Err(_) => panic!("index {index} out of range for length {len}"),
        }
    }
}

impl<T, const N: usize> From<[T; N]> for BiVec<T> {
    /// Exact-fit buffer with no slack on either side.
    fn from(values: [T; N]) -> Self {
        let mut buf = RawBuf::allocate(N);
        for (slot, value) in values.into_iter().enumerate() {
            // SAFETY: `slot < N == capacity` and the buffer is fresh.
            unsafe { buf.write(slot, value) };
        }
        let state = Rc::new(VersionCell::new(buf.identity(), N));
        Self {
            buf,
            front_slack: 0,
            rear_slack: 0,
            len: N,
            state,
        }
    }
}

impl<T: Clone> From<&[T]> for BiVec<T> {
    /// Exact-fit buffer cloned from a slice.
    fn from(values: &[T]) -> Self {
        let buf = build_buf(values.len(), 0, values.len(), |slot| values[slot].clone());
        let state = Rc::new(VersionCell::new(buf.identity(), values.len()));
        Self {
            buf,
            front_slack: 0,
            rear_slack: 0,
            len: values.len(),
            state,
        }
    }
}

impl<T> FromIterator<T> for BiVec<T> {
    /// Push-loop construction for sources of unknown length, growing as
    /// needed (the input-cursor construction path).
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut vec = Self::new();
        vec.extend(iter);
        vec
    }
}

impl<T> Extend<T> for BiVec<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

/// Owning iterator that drains the container front to back.
pub struct IntoIter<T> {
    inner: BiVec<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.pop_front().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.inner.len();
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.pop_back().ok()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> IntoIterator for BiVec<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter { inner: self }
    }
}

impl<'a, T> IntoIterator for &'a BiVec<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut BiVec<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn new_has_symmetric_initial_layout() {
        let vec = BiVec::<i32>::new();
        assert_eq!(vec.len(), 0);
        assert_eq!(vec.capacity(), BiVec::<i32>::INITIAL_CAPACITY);
        assert_eq!(vec.front_slack(), 0);
        assert_eq!(vec.rear_slack(), BiVec::<i32>::INITIAL_CAPACITY);
    }

    #[test]
    fn with_len_rejects_zero() {
        let err = BiVec::<i32>::with_len(0).unwrap_err();
        assert_eq!(err, Error::InvalidConstruction { requested: 0 });
    }

    #[test]
    fn with_len_is_exact_fit_default_filled() {
        let vec = BiVec::<i32>::with_len(5).unwrap();
        assert_eq!(vec.len(), 5);
        assert_eq!(vec.capacity(), 5);
        assert_eq!(vec.front_slack(), 0);
        assert_eq!(vec.rear_slack(), 0);
        assert!(vec.iter().all(|&v| v == 0));
    }

    #[test]
    fn push_back_then_front_orders_elements() {
        let mut vec = BiVec::new();
        vec.push_back(1);
        vec.push_back(2);
        vec.push_front(0);
        assert_eq!(vec.len(), 3);
        assert_eq!(vec.as_slice(), &[0, 1, 2]);
    }

    #[test]
    fn rear_growth_doubles_and_preserves_order() {
        let mut vec = BiVec::new();
        for i in 0..BiVec::<usize>::INITIAL_CAPACITY {
            vec.push_back(i);
        }
        assert_eq!(vec.capacity(), BiVec::<usize>::INITIAL_CAPACITY);
        vec.push_back(99);
        assert_eq!(vec.capacity(), 2 * BiVec::<usize>::INITIAL_CAPACITY);
        let expected: Vec<usize> = (0..BiVec::<usize>::INITIAL_CAPACITY).chain([99]).collect();
        assert_eq!(vec.as_slice(), expected.as_slice());
        assert_eq!(vec.rear_slack(), BiVec::<usize>::INITIAL_CAPACITY - 1);
    }

    #[test]
    fn front_growth_mirrors_rear_growth() {
        let mut vec = BiVec::from([1, 2, 3]);
        assert_eq!(vec.front_slack(), 0);
        vec.push_front(0);
        assert_eq!(vec.capacity(), 6);
        assert_eq!(vec.front_slack(), 2);
        assert_eq!(vec.rear_slack(), 0);
        assert_eq!(vec.as_slice(), &[0, 1, 2, 3]);
    }

    #[test]
    fn pop_on_empty_reports_out_of_range() {
        let mut vec = BiVec::<i32>::new();
        assert!(matches!(vec.pop_back(), Err(Error::IndexOutOfRange { .. })));
        assert!(matches!(vec.pop_front(), Err(Error::IndexOutOfRange { .. })));
    }

    #[test]
    fn pops_return_boundary_elements_and_adjust_slack() {
        let mut vec = BiVec::from([1, 2, 3]);
        assert_eq!(vec.pop_front().unwrap(), 1);
        assert_eq!(vec.pop_back().unwrap(), 3);
        assert_eq!(vec.as_slice(), &[2]);
        assert_eq!(vec.front_slack(), 1);
        assert_eq!(vec.rear_slack(), 1);
    }

    #[test]
    fn emplace_back_constructs_in_place() {
        let mut vec = BiVec::new();
        vec.emplace_back(|| String::from("built"));
        assert_eq!(vec[0], "built");
    }

    #[test]
    fn indexed_access_is_bounds_checked() {
        let vec = BiVec::from([10, 20]);
        assert_eq!(*vec.get(1).unwrap(), 20);
        assert_eq!(
            vec.get(2).unwrap_err(),
            Error::IndexOutOfRange { index: 2, len: 2 }
        );
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn index_operator_panics_past_the_end() {
        let vec = BiVec::from([1]);
        let _ = vec[1];
    }

    #[test]
    fn assign_from_truncates_to_smaller_source() {
        let mut dst = BiVec::from([1, 2, 3, 4, 5]);
        dst.assign_from([9, 8]);
        assert_eq!(dst.as_slice(), &[9, 8]);
    }

    #[test]
    fn assign_from_never_grows_the_destination() {
        let mut dst = BiVec::from([1, 2]);
        dst.assign_from([7, 8, 9, 10]);
        assert_eq!(dst.as_slice(), &[7, 8]);
    }

    #[test]
    fn clone_is_independent_with_same_layout() {
        let mut vec = BiVec::new();
        vec.push_back(1);
        vec.push_front(0);
        let copy = vec.clone();
        assert_eq!(copy, vec);
        assert_eq!(copy.capacity(), vec.capacity());
        assert_eq!(copy.front_slack(), vec.front_slack());
        vec.push_back(2);
        assert_eq!(copy.as_slice(), &[0, 1]);
    }

    #[test]
    fn take_transfers_contents_and_empties_source() {
        let mut vec = BiVec::from([1, 2, 3]);
        let moved = vec.take();
        assert_eq!(moved.as_slice(), &[1, 2, 3]);
        assert_eq!(vec.len(), 0);
        assert_eq!(vec.capacity(), 0);
    }

    #[test]
    fn take_then_push_regrows_from_initial_capacity() {
        let mut vec = BiVec::from([1]);
        let _moved = vec.take();
        vec.push_back(5);
        assert_eq!(vec.capacity(), BiVec::<i32>::INITIAL_CAPACITY);
        assert_eq!(vec.as_slice(), &[5]);
    }

    #[test]
    fn clear_keeps_the_buffer() {
        let mut vec = BiVec::from([1, 2, 3]);
        let cap = vec.capacity();
        vec.clear();
        assert!(vec.is_empty());
        assert_eq!(vec.capacity(), cap);
    }

    #[test]
    fn from_iterator_collects_in_order() {
        let vec: BiVec<i32> = (0..20).collect();
        let expected: Vec<i32> = (0..20).collect();
        assert_eq!(vec.as_slice(), expected.as_slice());
    }

    #[test]
    fn into_iter_drains_front_to_back() {
        let vec = BiVec::from([1, 2, 3]);
        let drained: Vec<i32> = vec.into_iter().collect();
        assert_eq!(drained, vec![1, 2, 3]);
    }

    #[test]
    fn into_iter_supports_both_ends() {
        let mut iter = BiVec::from([1, 2, 3]).into_iter();
        assert_eq!(iter.next(), Some(1));
        assert_eq!(iter.next_back(), Some(3));
        assert_eq!(iter.next(), Some(2));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn from_cursor_range_clones_the_subrange() {
        let vec = BiVec::from([1, 2, 3, 4]);
        let start = vec.cursor_at(1);
        let end = vec.cursor_at(3);
        let sub = BiVec::from_cursor_range(&vec, &start, &end).unwrap();
        assert_eq!(sub.as_slice(), &[2, 3]);
        assert_eq!(sub.capacity(), 2);
    }

    #[test]
    fn from_cursor_range_rejects_positions_outside_the_container() {
        let vec = BiVec::from([1, 2, 3]);
        assert_eq!(
            BiVec::from_cursor_range(&vec, &vec.cursor_at(0), &vec.cursor_at(100)).unwrap_err(),
            Error::IndexOutOfRange { index: 100, len: 3 },
        );
        assert_eq!(
            BiVec::from_cursor_range(&vec, &vec.cursor_at(-1), &vec.cursor_at(2)).unwrap_err(),
            Error::IndexOutOfRange { index: -1, len: 3 },
        );
    }

    #[test]
    fn from_cursor_range_accepts_the_full_span() {
        let vec = BiVec::from([1, 2, 3]);
        let all = BiVec::from_cursor_range(&vec, &vec.cursor(), &vec.cursor_end()).unwrap();
        assert_eq!(all.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn from_cursor_range_rejects_reversed_cursors() {
        let vec = BiVec::from([1, 2, 3]);
        let start = vec.cursor_at(2);
        let end = vec.cursor_at(1);
        assert_eq!(
            BiVec::from_cursor_range(&vec, &start, &end).unwrap_err(),
            Error::InvalidConstruction { requested: 0 },
        );
    }

    #[test]
    fn assign_from_converts_element_types() {
        let mut dst: BiVec<i64> = BiVec::from([1i64, 2, 3]);
        dst.assign_from([7i32, 8]);
        assert_eq!(dst.as_slice(), &[7i64, 8]);
    }

    #[test]
    fn interrupted_copy_assignment_destructs_each_element_once() {
        use std::cell::Cell;
        use std::panic::{catch_unwind, AssertUnwindSafe};
        use std::rc::Rc;

        #[derive(Default)]
        struct Ledger {
            live: Cell<isize>,
            clones_left: Cell<usize>,
        }

        struct Tracked(Rc<Ledger>);

        impl Tracked {
            fn new(ledger: &Rc<Ledger>) -> Self {
                ledger.live.set(ledger.live.get() + 1);
                Tracked(Rc::clone(ledger))
            }
        }

        impl Clone for Tracked {
            fn clone(&self) -> Self {
                let left = self.0.clones_left.get();
                if left == 0 {
                    panic!("clone budget exhausted");
                }
                self.0.clones_left.set(left - 1);
                Tracked::new(&self.0)
            }
        }

        impl Drop for Tracked {
            fn drop(&mut self) {
                self.0.live.set(self.0.live.get() - 1);
            }
        }

        let ledger = Rc::new(Ledger::default());
        {
            let source: BiVec<Tracked> = (0..3).map(|_| Tracked::new(&ledger)).collect();
            let mut dst: BiVec<Tracked> = (0..4).map(|_| Tracked::new(&ledger)).collect();
            ledger.clones_left.set(2);
            let outcome = catch_unwind(AssertUnwindSafe(|| dst.clone_from(&source)));
            assert!(outcome.is_err());
            // The failed assignment left the destination untouched.
            assert_eq!(dst.len(), 4);
        }
        // A leak would leave this positive, a double destruction negative.
        assert_eq!(ledger.live.get(), 0);
    }

    #[test]
    fn drop_destructs_every_element_exactly_once() {
        use std::cell::Cell;
        use std::rc::Rc;

        struct Counted(Rc<Cell<usize>>);
        impl Drop for Counted {
            fn drop(&mut self) {
                self.0.set(self.0.get() + 1);
            }
        }

        let drops = Rc::new(Cell::new(0));
        {
            let mut vec = BiVec::new();
            for _ in 0..10 {
                vec.push_back(Counted(Rc::clone(&drops)));
                vec.push_front(Counted(Rc::clone(&drops)));
            }
            let _ = vec.pop_back();
        }
        assert_eq!(drops.get(), 20);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        /// One end-mutation step in a generated operation sequence.
        #[derive(Clone, Copy, Debug)]
        enum Op {
            PushBack(i32),
            PushFront(i32),
            PopBack,
            PopFront,
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                any::<i32>().prop_map(Op::PushBack),
                any::<i32>().prop_map(Op::PushFront),
                Just(Op::PopBack),
                Just(Op::PopFront),
            ]
        }

        proptest! {
            #[test]
            fn mirrors_a_reference_deque(ops in proptest::collection::vec(op_strategy(), 0..200)) {
                let mut vec = BiVec::new();
                let mut model = std::collections::VecDeque::new();
                for op in ops {
                    match op {
                        Op::PushBack(v) => {
                            vec.push_back(v);
                            model.push_back(v);
                        }
                        Op::PushFront(v) => {
                            vec.push_front(v);
                            model.push_front(v);
                        }
                        Op::PopBack => {
                            prop_assert_eq!(vec.pop_back().ok(), model.pop_back());
                        }
                        Op::PopFront => {
                            prop_assert_eq!(vec.pop_front().ok(), model.pop_front());
                        }
                    }
                }
                prop_assert_eq!(vec.len(), model.len());
                let collected: Vec<i32> = vec.iter().copied().collect();
                let expected: Vec<i32> = model.iter().copied().collect();
                prop_assert_eq!(collected, expected);
            }

            #[test]
            fn slack_identity_holds_under_any_sequence(
                ops in proptest::collection::vec(op_strategy(), 0..200),
            ) {
                let mut vec = BiVec::new();
                for op in ops {
                    match op {
                        Op::PushBack(v) => vec.push_back(v),
                        Op::PushFront(v) => vec.push_front(v),
                        Op::PopBack => drop(vec.pop_back()),
                        Op::PopFront => drop(vec.pop_front()),
                    }
                    prop_assert_eq!(
                        vec.front_slack() + vec.len() + vec.rear_slack(),
                        vec.capacity()
                    );
                }
            }

            #[test]
            fn assignment_takes_the_smaller_size(
                dst in proptest::collection::vec(any::<i32>(), 0..32),
                src in proptest::collection::vec(any::<i32>(), 0..32),
            ) {
                let mut vec: BiVec<i32> = dst.iter().copied().collect();
                vec.assign_from(src.iter().copied());
                let shared = dst.len().min(src.len());
                prop_assert_eq!(vec.len(), shared);
                prop_assert_eq!(vec.as_slice(), &src[..shared]);
            }
        }
    }
}
