//! Lazy elementwise arithmetic over the double-ended container.
//!
//! [`Array`] wraps [`bivec::BiVec`] and adds expression-template style
//! arithmetic: `&a + &b * 2.0` builds a tree of [`Zip`]/[`Map`] nodes
//! that is only evaluated when materialised with [`Array::from_expr`],
//! assigned with [`Array::assign_expr`], or reduced with [`Array::sum`]
//! or [`Array::fold`].
//!
//! Scalars broadcast (a [`Scalar`] node reports an endless length) and
//! binary nodes take the shorter of their operand lengths, so mixing
//! arrays of different sizes is well defined rather than an error.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod array;
mod expr;

pub use array::Array;
pub use expr::{
    BinOp, Divide, Expr, ExprRef, IntoExpr, Map, MapFn, Minus, Negate, Plus, Scalar, SqrtOp,
    Times, UnOp, Zip,
};
