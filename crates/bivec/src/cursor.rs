//! Random-access cursors with use-time validity classification.
//!
//! A cursor is a weak reference into a [`BiVec`]: a dead-or-alive
//! back-reference to the container's version cell, a logical position
//! (which may transiently go negative or past the end during arithmetic),
//! and a snapshot of the two version counters and the buffer identity
//! taken at creation. Every use re-runs the validation state machine
//! against the container's live state; nothing is cached.
//!
//! Element access passes the owning container explicitly ([`Cursor::get`]
//! takes `&BiVec`, [`CursorMut::get_mut`] takes `&mut BiVec`), so aliasing
//! is enforced by the borrow checker while staleness is enforced at
//! runtime. Passing a container the cursor does not belong to is reported
//! as [`Error::CrossContainer`].
//!
//! [`Cursor`] and [`CursorMut`] are thin wrappers over one shared
//! validation core, so the state machine exists exactly once.

use std::cmp::Ordering;
use std::marker::PhantomData;
use std::ptr;
use std::rc::{Rc, Weak};

use crate::error::{Error, Severity};
use crate::vec::BiVec;
use crate::version::{dangling_head, VersionCell};

/// Bounds classification shared by every validation path.
///
/// For a dereference the position must name a concrete element
/// (`0 <= p < len`); for pure position arithmetic one-past-the-end is
/// allowed (`0 <= p <= len`). An empty container is out of bounds for
/// either use.
fn out_of_bounds(position: i64, len: usize, for_deref: bool) -> bool {
    let len = len as i64;
    if position < 0 {
        return true;
    }
    if for_deref {
        if position > len - 1 {
            return true;
        }
    } else if position > len {
        return true;
    }
    len == 0
}

/// The shared validation core: snapshot plus back-reference.
#[derive(Clone, Debug)]
struct RawCursor {
    owner: Weak<VersionCell>,
    /// Buffer identity captured at binding time.
    head: *const (),
    /// Logical position, 0-based. Arithmetic may move it anywhere; only
    /// use validates it.
    position: i64,
    /// Structural counter captured at binding time.
    structural: u64,
    /// Identity counter captured at binding time.
    identity: u64,
}

impl RawCursor {
    fn detached() -> Self {
        Self {
            owner: Weak::new(),
            head: dangling_head(),
            position: 0,
            structural: 0,
            identity: 0,
        }
    }

    fn bind(state: &Rc<VersionCell>, position: i64) -> Self {
        Self {
            owner: Rc::downgrade(state),
            head: state.head(),
            position,
            structural: state.structural(),
            identity: state.identity(),
        }
    }

    /// The validation state machine (run on every use, never cached).
    ///
    /// 1. Dead back-reference: fatal binding error.
    /// 2. Structural counter and buffer identity both match: in sync;
    ///    bounds are checked only for a dereference.
    /// 3. Diverged: out of bounds wins (Severe); otherwise an identity
    ///    divergence means the buffer under the position is not the one
    ///    the cursor was created against (Moderate); otherwise the
    ///    residual structural-only case (Mild).
    fn validate(&self, for_deref: bool) -> Result<(), Error> {
        let Some(live) = self.owner.upgrade() else {
            return Err(Error::UnboundCursor);
        };
        let len = live.len();
        if self.structural == live.structural() && ptr::eq(self.head, live.head()) {
            if for_deref && out_of_bounds(self.position, len, true) {
                return Err(Error::IndexOutOfRange {
                    index: self.position,
                    len,
                });
            }
            return Ok(());
        }
        if out_of_bounds(self.position, len, for_deref) {
            return Err(Error::Invalidated {
                severity: Severity::Severe,
            });
        }
        if self.identity != live.identity() {
            return Err(Error::Invalidated {
                severity: Severity::Moderate,
            });
        }
        Err(Error::Invalidated {
            severity: Severity::Mild,
        })
    }

    /// The cursor must belong to the container that was passed in.
    fn ensure_owner<T>(&self, owner: &BiVec<T>) -> Result<(), Error> {
        if ptr::eq(self.owner.as_ptr(), Rc::as_ptr(owner.state())) {
            Ok(())
        } else {
            Err(Error::CrossContainer)
        }
    }

    /// Both cursors must be bound to the same container instance.
    fn ensure_same_owner(&self, other: &Self) -> Result<(), Error> {
        if Weak::ptr_eq(&self.owner, &other.owner) {
            Ok(())
        } else {
            Err(Error::CrossContainer)
        }
    }

    fn seek(&mut self, delta: i64) -> Result<(), Error> {
        self.validate(false)?;
        self.position += delta;
        Ok(())
    }

    fn try_eq(&self, other: &Self) -> Result<bool, Error> {
        self.validate(false)?;
        other.validate(false)?;
        self.ensure_same_owner(other)?;
        Ok(self.position == other.position)
    }

    fn try_cmp(&self, other: &Self) -> Result<Ordering, Error> {
        self.validate(false)?;
        other.validate(false)?;
        self.ensure_same_owner(other)?;
        Ok(self.position.cmp(&other.position))
    }

    fn distance(&self, other: &Self) -> Result<i64, Error> {
        self.validate(false)?;
        other.validate(false)?;
        self.ensure_same_owner(other)?;
        Ok(self.position - other.position)
    }

    /// Validated slot index for a dereference at `position + offset`
    /// within `owner`.
    fn deref_index<T>(&self, owner: &BiVec<T>, offset: i64) -> Result<usize, Error> {
        let shifted = Self {
            owner: self.owner.clone(),
            position: self.position + offset,
            ..*self
        };
        shifted.validate(true)?;
        shifted.ensure_owner(owner)?;
        Ok(shifted.position as usize)
    }
}

/// A read-only random-access cursor into a [`BiVec`].
///
/// Created by [`BiVec::cursor`], [`BiVec::cursor_end`] or
/// [`BiVec::cursor_at`]. Holds no ownership; a cursor that outlives its
/// container reports [`Error::UnboundCursor`] instead of keeping the
/// container alive or reading stale memory.
#[derive(Clone, Debug)]
pub struct Cursor<T> {
    raw: RawCursor,
    _elem: PhantomData<fn() -> T>,
}

/// A mutable random-access cursor into a [`BiVec`].
///
/// Identical to [`Cursor`] in positioning and validation; element access
/// additionally requires `&mut BiVec`, so writes are exclusive.
#[derive(Clone, Debug)]
pub struct CursorMut<T> {
    raw: RawCursor,
    _elem: PhantomData<fn() -> T>,
}

impl<T> Cursor<T> {
    pub(crate) fn bind(state: &Rc<VersionCell>, position: i64) -> Self {
        Self {
            raw: RawCursor::bind(state, position),
            _elem: PhantomData,
        }
    }

    /// A cursor bound to nothing. Any use reports
    /// [`Error::UnboundCursor`].
    #[must_use]
    pub fn detached() -> Self {
        Self {
            raw: RawCursor::detached(),
            _elem: PhantomData,
        }
    }

    /// The logical position, 0-based relative to the container's front.
    #[must_use]
    pub fn position(&self) -> i64 {
        self.raw.position
    }

    /// Run the validation state machine without dereferencing.
    ///
    /// # Errors
    ///
    /// [`Error::UnboundCursor`] if the container is gone, or
    /// [`Error::Invalidated`] with the applicable severity.
    pub fn status(&self) -> Result<(), Error> {
        self.raw.validate(false)
    }

    /// Dereference: a shared reference to the element under the cursor.
    ///
    /// # Errors
    ///
    /// Validation errors as for [`status`](Self::status);
    /// [`Error::IndexOutOfRange`] for an in-sync cursor parked outside
    /// the element range; [`Error::CrossContainer`] if `owner` is not the
    /// container this cursor was created from.
    pub fn get<'a>(&self, owner: &'a BiVec<T>) -> Result<&'a T, Error> {
        let index = self.raw.deref_index(owner, 0)?;
        Ok(&owner.as_slice()[index])
    }

    /// Subscript-style relative dereference at `position + offset`.
    /// Negative offsets reach earlier elements, as with the container's
    /// original cursor subscript.
    ///
    /// # Errors
    ///
    /// As for [`get`](Self::get), evaluated at the shifted position.
    pub fn get_at<'a>(&self, owner: &'a BiVec<T>, offset: i64) -> Result<&'a T, Error> {
        let index = self.raw.deref_index(owner, offset)?;
        Ok(&owner.as_slice()[index])
    }

    /// Move the cursor by `delta` positions (validates, then moves; the
    /// new position is only checked on the next use).
    ///
    /// # Errors
    ///
    /// Validation errors as for [`status`](Self::status).
    pub fn seek(&mut self, delta: i64) -> Result<(), Error> {
        self.raw.seek(delta)
    }

    /// Step one position toward the rear.
    ///
    /// # Errors
    ///
    /// Validation errors as for [`status`](Self::status).
    pub fn advance(&mut self) -> Result<(), Error> {
        self.raw.seek(1)
    }

    /// Step one position toward the front.
    ///
    /// # Errors
    ///
    /// Validation errors as for [`status`](Self::status).
    pub fn retreat(&mut self) -> Result<(), Error> {
        self.raw.seek(-1)
    }

    /// Positional equality with another cursor of the same container.
    ///
    /// # Errors
    ///
    /// Validation errors for either cursor; [`Error::CrossContainer`] if
    /// they are bound to different containers.
    pub fn try_eq(&self, other: &Cursor<T>) -> Result<bool, Error> {
        self.raw.try_eq(&other.raw)
    }

    /// Positional ordering with another cursor of the same container.
    ///
    /// # Errors
    ///
    /// As for [`try_eq`](Self::try_eq).
    pub fn try_cmp(&self, other: &Cursor<T>) -> Result<Ordering, Error> {
        self.raw.try_cmp(&other.raw)
    }

    /// Signed positional difference `self - other`.
    ///
    /// # Errors
    ///
    /// As for [`try_eq`](Self::try_eq); never a meaningless number for
    /// cursors of different containers.
    pub fn distance(&self, other: &Cursor<T>) -> Result<i64, Error> {
        self.raw.distance(&other.raw)
    }

    pub(crate) fn validate_against(&self, owner: &BiVec<T>, for_deref: bool) -> Result<(), Error> {
        self.raw.validate(for_deref)?;
        self.raw.ensure_owner(owner)
    }
}

impl<T> Default for Cursor<T> {
    fn default() -> Self {
        Self::detached()
    }
}

impl<T> CursorMut<T> {
    pub(crate) fn bind(state: &Rc<VersionCell>, position: i64) -> Self {
        Self {
            raw: RawCursor::bind(state, position),
            _elem: PhantomData,
        }
    }

    /// A mutable cursor bound to nothing. Any use reports
    /// [`Error::UnboundCursor`].
    #[must_use]
    pub fn detached() -> Self {
        Self {
            raw: RawCursor::detached(),
            _elem: PhantomData,
        }
    }

    /// The logical position, 0-based relative to the container's front.
    #[must_use]
    pub fn position(&self) -> i64 {
        self.raw.position
    }

    /// Run the validation state machine without dereferencing.
    ///
    /// # Errors
    ///
    /// As for [`Cursor::status`].
    pub fn status(&self) -> Result<(), Error> {
        self.raw.validate(false)
    }

    /// Dereference for reading.
    ///
    /// # Errors
    ///
    /// As for [`Cursor::get`].
    pub fn get<'a>(&self, owner: &'a BiVec<T>) -> Result<&'a T, Error> {
        let index = self.raw.deref_index(owner, 0)?;
        Ok(&owner.as_slice()[index])
    }

    /// Dereference for writing: an exclusive reference to the element
    /// under the cursor.
    ///
    /// # Errors
    ///
    /// As for [`Cursor::get`].
    pub fn get_mut<'a>(&self, owner: &'a mut BiVec<T>) -> Result<&'a mut T, Error> {
        let index = self.raw.deref_index(owner, 0)?;
        Ok(&mut owner.as_mut_slice()[index])
    }

    /// Overwrite the element under the cursor. Element overwrites are not
    /// structural mutations and bump no version counter.
    ///
    /// # Errors
    ///
    /// As for [`Cursor::get`].
    pub fn set(&self, owner: &mut BiVec<T>, value: T) -> Result<(), Error> {
        *self.get_mut(owner)? = value;
        Ok(())
    }

    /// Subscript-style relative dereference for writing.
    ///
    /// # Errors
    ///
    /// As for [`Cursor::get_at`].
    pub fn get_at_mut<'a>(&self, owner: &'a mut BiVec<T>, offset: i64) -> Result<&'a mut T, Error> {
        let index = self.raw.deref_index(owner, offset)?;
        Ok(&mut owner.as_mut_slice()[index])
    }

    /// Move the cursor by `delta` positions.
    ///
    /// # Errors
    ///
    /// Validation errors as for [`status`](Self::status).
    pub fn seek(&mut self, delta: i64) -> Result<(), Error> {
        self.raw.seek(delta)
    }

    /// Step one position toward the rear.
    ///
    /// # Errors
    ///
    /// Validation errors as for [`status`](Self::status).
    pub fn advance(&mut self) -> Result<(), Error> {
        self.raw.seek(1)
    }

    /// Step one position toward the front.
    ///
    /// # Errors
    ///
    /// Validation errors as for [`status`](Self::status).
    pub fn retreat(&mut self) -> Result<(), Error> {
        self.raw.seek(-1)
    }

    /// Positional equality with a read-only cursor of the same container.
    ///
    /// # Errors
    ///
    /// As for [`Cursor::try_eq`].
    pub fn try_eq(&self, other: &Cursor<T>) -> Result<bool, Error> {
        self.raw.try_eq(&other.raw)
    }

    /// Signed positional difference `self - other` against a read-only
    /// cursor.
    ///
    /// # Errors
    ///
    /// As for [`Cursor::distance`].
    pub fn distance(&self, other: &Cursor<T>) -> Result<i64, Error> {
        self.raw.distance(&other.raw)
    }

    /// The read-only view of this cursor, carrying the same snapshot.
    #[must_use]
    pub fn as_read_only(&self) -> Cursor<T> {
        Cursor {
            raw: self.raw.clone(),
            _elem: PhantomData,
        }
    }
}

impl<T> Default for CursorMut<T> {
    fn default() -> Self {
        Self::detached()
    }
}
