//! A double-ended growable vector with versioned cursor validation.
//!
//! [`BiVec`] keeps spare capacity on both sides of its elements, so
//! pushing at either end is amortized O(1): rear growth doubles the
//! buffer and keeps the front offset, front growth mirrors that and
//! opens a block of slack before the first element.
//!
//! # Architecture
//!
//! ```text
//! BiVec<T>
//! ├── RawBuf<T>        allocation only (the one unsafe module)
//! ├── slack bookkeeping  front_slack + len + rear_slack == capacity
//! └── Rc<VersionCell>  structural + identity counters, buffer head, len
//!       └── Cursor / CursorMut hold a Weak back-reference + snapshot
//! ```
//!
//! Two counters drive cursor validation: the *structural* counter bumps
//! on every length change, the *identity* counter bumps whenever the
//! buffer an element lives in can have changed (growth, copy
//! assignment, [`BiVec::take`]). A cursor snapshots both at creation
//! and re-runs the validation state machine on every use, classifying
//! staleness as [`Severity::Severe`], [`Severity::Moderate`] or
//! [`Severity::Mild`], with dead back-references ([`Error::UnboundCursor`])
//! and mismatched containers ([`Error::CrossContainer`]) as the fatal
//! cases.
//!
//! # Safety
//!
//! `unsafe` is confined to raw buffer management and the slot-level
//! reads and writes in `vec.rs`; every cursor, version and error path
//! is safe code.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod cursor;
mod error;
mod raw;
mod vec;
mod version;

pub use cursor::{Cursor, CursorMut};
pub use error::{Error, Severity};
pub use vec::{BiVec, IntoIter};
