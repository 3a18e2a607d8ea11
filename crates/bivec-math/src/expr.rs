//! Lazy elementwise expression templates.
//!
//! An expression is a tree of lightweight nodes ([`ExprRef`], [`Scalar`],
//! [`Zip`], [`Map`], [`MapFn`]) that knows its element count and how to
//! produce the element at any index, but computes nothing until it is
//! materialised by [`Array::from_expr`](crate::Array::from_expr),
//! [`Array::assign_expr`](crate::Array::assign_expr) or a reduction.
//!
//! The `std::ops` overloads below build the tree: any combination of
//! arrays, expression nodes and scalars with `+ - * /` (and unary `-`)
//! yields another node. Scalars act as an endless sequence of one value,
//! so a binary node takes the shorter of its two operand lengths.

use std::cmp;
use std::marker::PhantomData;
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::array::Array;

/// A lazy elementwise sequence.
///
/// `eval` is only defined for indices below `len`; nodes assume their
/// callers respect that.
pub trait Expr {
    /// Element type produced by evaluation.
    type Elem;

    /// Number of addressable elements. Scalars report `usize::MAX`.
    fn len(&self) -> usize;

    /// The element at `index`.
    fn eval(&self, index: usize) -> Self::Elem;
}

/// Conversion of operands (arrays, scalars, nodes) into expression nodes.
///
/// This is what lets the operator overloads accept `&Array`, a bare
/// scalar, or another expression on the right-hand side uniformly.
pub trait IntoExpr {
    /// The node this operand becomes.
    type Node: Expr;

    /// Wrap the operand as an expression node.
    fn into_expr(self) -> Self::Node;
}

/// Borrow of an [`Array`] as an expression leaf.
#[derive(Debug)]
pub struct ExprRef<'a, T>(pub(crate) &'a Array<T>);

impl<T> Clone for ExprRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ExprRef<'_, T> {}

impl<T: Copy> Expr for ExprRef<'_, T> {
    type Elem = T;

    fn len(&self) -> usize {
        self.0.len()
    }

    fn eval(&self, index: usize) -> T {
        self.0.as_slice()[index]
    }
}

impl<'a, T: Copy> IntoExpr for &'a Array<T> {
    type Node = ExprRef<'a, T>;

    fn into_expr(self) -> Self::Node {
        ExprRef(self)
    }
}

impl<'a, T: Copy> IntoExpr for ExprRef<'a, T> {
    type Node = Self;

    fn into_expr(self) -> Self {
        self
    }
}

/// A scalar broadcast to every index.
#[derive(Clone, Copy, Debug)]
pub struct Scalar<T>(
    /// The broadcast value.
    pub T,
);

impl<T: Copy> Expr for Scalar<T> {
    type Elem = T;

    fn len(&self) -> usize {
        usize::MAX
    }

    fn eval(&self, _index: usize) -> T {
        self.0
    }
}

/// Elementwise binary operation marker.
pub trait BinOp<T> {
    /// Combine one element from each side.
    fn apply(lhs: T, rhs: T) -> T;
}

/// Elementwise unary operation marker.
pub trait UnOp<T> {
    /// Element type after the operation.
    type Output;

    /// Transform one element.
    fn apply(value: T) -> Self::Output;
}

/// Marker for elementwise addition.
#[derive(Clone, Copy, Debug)]
pub struct Plus;

/// Marker for elementwise subtraction.
#[derive(Clone, Copy, Debug)]
pub struct Minus;

/// Marker for elementwise multiplication.
#[derive(Clone, Copy, Debug)]
pub struct Times;

/// Marker for elementwise division.
#[derive(Clone, Copy, Debug)]
pub struct Divide;

impl<T: Add<Output = T>> BinOp<T> for Plus {
    fn apply(lhs: T, rhs: T) -> T {
        lhs + rhs
    }
}

impl<T: Sub<Output = T>> BinOp<T> for Minus {
    fn apply(lhs: T, rhs: T) -> T {
        lhs - rhs
    }
}

impl<T: Mul<Output = T>> BinOp<T> for Times {
    fn apply(lhs: T, rhs: T) -> T {
        lhs * rhs
    }
}

impl<T: Div<Output = T>> BinOp<T> for Divide {
    fn apply(lhs: T, rhs: T) -> T {
        lhs / rhs
    }
}

/// Marker for elementwise negation.
#[derive(Clone, Copy, Debug)]
pub struct Negate;

impl<T: Neg<Output = T>> UnOp<T> for Negate {
    type Output = T;

    fn apply(value: T) -> T {
        -value
    }
}

/// Marker for elementwise square root.
#[derive(Clone, Copy, Debug)]
pub struct SqrtOp;

impl UnOp<f64> for SqrtOp {
    type Output = f64;

    fn apply(value: f64) -> f64 {
        value.sqrt()
    }
}

impl UnOp<f32> for SqrtOp {
    type Output = f32;

    fn apply(value: f32) -> f32 {
        value.sqrt()
    }
}

/// Binary expression node combining two operands elementwise.
#[derive(Clone, Copy, Debug)]
pub struct Zip<Op, L, R> {
    lhs: L,
    rhs: R,
    op: PhantomData<Op>,
}

impl<Op, L, R> Zip<Op, L, R> {
    pub(crate) fn new(lhs: L, rhs: R) -> Self {
        Self {
            lhs,
            rhs,
            op: PhantomData,
        }
    }
}

impl<T, Op, L, R> Expr for Zip<Op, L, R>
where
    T: Copy,
    Op: BinOp<T>,
    L: Expr<Elem = T>,
    R: Expr<Elem = T>,
{
    type Elem = T;

    fn len(&self) -> usize {
        cmp::min(self.lhs.len(), self.rhs.len())
    }

    fn eval(&self, index: usize) -> T {
        Op::apply(self.lhs.eval(index), self.rhs.eval(index))
    }
}

impl<T, Op, L, R> IntoExpr for Zip<Op, L, R>
where
    T: Copy,
    Op: BinOp<T>,
    L: Expr<Elem = T>,
    R: Expr<Elem = T>,
{
    type Node = Self;

    fn into_expr(self) -> Self {
        self
    }
}

/// Unary expression node applying a marker operation to every element.
#[derive(Clone, Copy, Debug)]
pub struct Map<Op, E> {
    expr: E,
    op: PhantomData<Op>,
}

impl<Op, E> Map<Op, E> {
    pub(crate) fn new(expr: E) -> Self {
        Self {
            expr,
            op: PhantomData,
        }
    }
}

impl<Op, E> Expr for Map<Op, E>
where
    E: Expr,
    Op: UnOp<E::Elem>,
{
    type Elem = Op::Output;

    fn len(&self) -> usize {
        self.expr.len()
    }

    fn eval(&self, index: usize) -> Self::Elem {
        Op::apply(self.expr.eval(index))
    }
}

impl<Op, E> IntoExpr for Map<Op, E>
where
    E: Expr,
    Op: UnOp<E::Elem>,
    Op::Output: Copy,
{
    type Node = Self;

    fn into_expr(self) -> Self {
        self
    }
}

/// Unary expression node applying a plain function to every element.
#[derive(Clone, Copy, Debug)]
pub struct MapFn<E: Expr> {
    expr: E,
    f: fn(E::Elem) -> E::Elem,
}

impl<E: Expr> MapFn<E> {
    pub(crate) fn new(expr: E, f: fn(E::Elem) -> E::Elem) -> Self {
        Self { expr, f }
    }
}

impl<E: Expr> Expr for MapFn<E> {
    type Elem = E::Elem;

    fn len(&self) -> usize {
        self.expr.len()
    }

    fn eval(&self, index: usize) -> E::Elem {
        (self.f)(self.expr.eval(index))
    }
}

impl<E> IntoExpr for MapFn<E>
where
    E: Expr,
    E::Elem: Copy,
{
    type Node = Self;

    fn into_expr(self) -> Self {
        self
    }
}

// Binary operator overloads. Every family of left-hand operands gets the
// same four impls, with the right-hand side accepted through `IntoExpr`
// so arrays, scalars and nodes all work there.
macro_rules! binary_ops_for_array {
    ($($trait:ident, $method:ident, $marker:ident;)*) => {$(
        impl<'a, T, Rhs> $trait<Rhs> for &'a Array<T>
        where
            T: Copy + $trait<Output = T>,
            Rhs: IntoExpr,
            Rhs::Node: Expr<Elem = T>,
        {
            type Output = Zip<$marker, ExprRef<'a, T>, Rhs::Node>;

            fn $method(self, rhs: Rhs) -> Self::Output {
                Zip::new(ExprRef(self), rhs.into_expr())
            }
        }

        impl<'a, T, Rhs> $trait<Rhs> for ExprRef<'a, T>
        where
            T: Copy + $trait<Output = T>,
            Rhs: IntoExpr,
            Rhs::Node: Expr<Elem = T>,
        {
            type Output = Zip<$marker, ExprRef<'a, T>, Rhs::Node>;

            fn $method(self, rhs: Rhs) -> Self::Output {
                Zip::new(self, rhs.into_expr())
            }
        }
    )*};
}

binary_ops_for_array! {
    Add, add, Plus;
    Sub, sub, Minus;
    Mul, mul, Times;
    Div, div, Divide;
}

macro_rules! binary_ops_for_zip {
    ($($trait:ident, $method:ident, $marker:ident;)*) => {$(
        impl<T, Op0, L0, R0, Rhs> $trait<Rhs> for Zip<Op0, L0, R0>
        where
            T: Copy + $trait<Output = T>,
            Op0: BinOp<T>,
            L0: Expr<Elem = T>,
            R0: Expr<Elem = T>,
            Rhs: IntoExpr,
            Rhs::Node: Expr<Elem = T>,
        {
            type Output = Zip<$marker, Self, Rhs::Node>;

            fn $method(self, rhs: Rhs) -> Self::Output {
                Zip::new(self, rhs.into_expr())
            }
        }
    )*};
}

binary_ops_for_zip! {
    Add, add, Plus;
    Sub, sub, Minus;
    Mul, mul, Times;
    Div, div, Divide;
}

macro_rules! binary_ops_for_unary_nodes {
    ($($trait:ident, $method:ident, $marker:ident;)*) => {$(
        impl<Op0, E0, Rhs> $trait<Rhs> for Map<Op0, E0>
        where
            E0: Expr,
            Op0: UnOp<E0::Elem>,
            Op0::Output: Copy + $trait<Output = Op0::Output>,
            Rhs: IntoExpr,
            Rhs::Node: Expr<Elem = Op0::Output>,
        {
            type Output = Zip<$marker, Self, Rhs::Node>;

            fn $method(self, rhs: Rhs) -> Self::Output {
                Zip::new(self, rhs.into_expr())
            }
        }

        impl<E0, Rhs> $trait<Rhs> for MapFn<E0>
        where
            E0: Expr,
            E0::Elem: Copy + $trait<Output = E0::Elem>,
            Rhs: IntoExpr,
            Rhs::Node: Expr<Elem = E0::Elem>,
        {
            type Output = Zip<$marker, Self, Rhs::Node>;

            fn $method(self, rhs: Rhs) -> Self::Output {
                Zip::new(self, rhs.into_expr())
            }
        }
    )*};
}

binary_ops_for_unary_nodes! {
    Add, add, Plus;
    Sub, sub, Minus;
    Mul, mul, Times;
    Div, div, Divide;
}

// Scalars on the left cannot take a generic right-hand side (the
// standard ops traits on `f64` and friends are foreign), so each scalar
// type gets concrete impls per node family.
macro_rules! scalar_lhs_ops {
    ($($scalar:ty),*) => {$(
        scalar_lhs_ops!(@ops $scalar, Add, add, Plus);
        scalar_lhs_ops!(@ops $scalar, Sub, sub, Minus);
        scalar_lhs_ops!(@ops $scalar, Mul, mul, Times);
        scalar_lhs_ops!(@ops $scalar, Div, div, Divide);
    )*};
    (@ops $scalar:ty, $trait:ident, $method:ident, $marker:ident) => {
        impl<'a> $trait<&'a Array<$scalar>> for $scalar {
            type Output = Zip<$marker, Scalar<$scalar>, ExprRef<'a, $scalar>>;

            fn $method(self, rhs: &'a Array<$scalar>) -> Self::Output {
                Zip::new(Scalar(self), ExprRef(rhs))
            }
        }

        impl<'a> $trait<ExprRef<'a, $scalar>> for $scalar {
            type Output = Zip<$marker, Scalar<$scalar>, ExprRef<'a, $scalar>>;

            fn $method(self, rhs: ExprRef<'a, $scalar>) -> Self::Output {
                Zip::new(Scalar(self), rhs)
            }
        }

        impl<Op0, L0, R0> $trait<Zip<Op0, L0, R0>> for $scalar
        where
            Op0: BinOp<$scalar>,
            L0: Expr<Elem = $scalar>,
            R0: Expr<Elem = $scalar>,
        {
            type Output = Zip<$marker, Scalar<$scalar>, Zip<Op0, L0, R0>>;

            fn $method(self, rhs: Zip<Op0, L0, R0>) -> Self::Output {
                Zip::new(Scalar(self), rhs)
            }
        }

        impl<Op0, E0> $trait<Map<Op0, E0>> for $scalar
        where
            E0: Expr,
            Op0: UnOp<E0::Elem, Output = $scalar>,
        {
            type Output = Zip<$marker, Scalar<$scalar>, Map<Op0, E0>>;

            fn $method(self, rhs: Map<Op0, E0>) -> Self::Output {
                Zip::new(Scalar(self), rhs)
            }
        }

        impl<E0> $trait<MapFn<E0>> for $scalar
        where
            E0: Expr<Elem = $scalar>,
        {
            type Output = Zip<$marker, Scalar<$scalar>, MapFn<E0>>;

            fn $method(self, rhs: MapFn<E0>) -> Self::Output {
                Zip::new(Scalar(self), rhs)
            }
        }
    };
}

scalar_lhs_ops!(f32, f64, i32, i64);

macro_rules! scalar_into_expr {
    ($($scalar:ty),*) => {$(
        impl IntoExpr for $scalar {
            type Node = Scalar<$scalar>;

            fn into_expr(self) -> Self::Node {
                Scalar(self)
            }
        }
    )*};
}

scalar_into_expr!(f32, f64, i32, i64);

// Unary negation over every node family.
impl<'a, T: Copy + Neg<Output = T>> Neg for &'a Array<T> {
    type Output = Map<Negate, ExprRef<'a, T>>;

    fn neg(self) -> Self::Output {
        Map::new(ExprRef(self))
    }
}

impl<'a, T: Copy + Neg<Output = T>> Neg for ExprRef<'a, T> {
    type Output = Map<Negate, Self>;

    fn neg(self) -> Self::Output {
        Map::new(self)
    }
}

impl<T, Op0, L0, R0> Neg for Zip<Op0, L0, R0>
where
    T: Copy + Neg<Output = T>,
    Op0: BinOp<T>,
    L0: Expr<Elem = T>,
    R0: Expr<Elem = T>,
{
    type Output = Map<Negate, Self>;

    fn neg(self) -> Self::Output {
        Map::new(self)
    }
}

impl<Op0, E0> Neg for Map<Op0, E0>
where
    E0: Expr,
    Op0: UnOp<E0::Elem>,
    Op0::Output: Copy + Neg<Output = Op0::Output>,
{
    type Output = Map<Negate, Self>;

    fn neg(self) -> Self::Output {
        Map::new(self)
    }
}

impl<E0> Neg for MapFn<E0>
where
    E0: Expr,
    E0::Elem: Copy + Neg<Output = E0::Elem>,
{
    type Output = Map<Negate, Self>;

    fn neg(self) -> Self::Output {
        Map::new(self)
    }
}
