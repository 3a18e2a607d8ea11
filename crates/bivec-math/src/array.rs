//! Numeric array built on the double-ended container.

use std::fmt;
use std::ops::{Deref, DerefMut};

use bivec::{BiVec, Error};

use crate::expr::{Expr, ExprRef, IntoExpr, Map, MapFn, SqrtOp};

/// A numeric array with lazy elementwise arithmetic.
///
/// `Array` is the double-ended container plus the expression layer: it
/// derefs to [`BiVec`], so all container operations (pushing at either
/// end, cursors, slack inspection) are available, and references to it
/// participate in `+ - * /` expression building.
///
/// ```
/// use bivec_math::Array;
///
/// let a = Array::from([1.0, 2.0, 3.0]);
/// let b = Array::from([10.0, 20.0, 30.0]);
/// let c = Array::from_expr(&a * 2.0 + &b);
/// assert_eq!(c.as_slice(), &[12.0, 24.0, 36.0]);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Array<T> {
    vec: BiVec<T>,
}

impl<T> Array<T> {
    /// An empty array with the container's default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self { vec: BiVec::new() }
    }

    /// An array of `len` default-constructed elements.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConstruction`] if `len` is zero.
    pub fn with_len(len: usize) -> Result<Self, Error>
    where
        T: Default,
    {
        Ok(Self {
            vec: BiVec::with_len(len)?,
        })
    }

    /// Materialise an expression into a fresh array.
    pub fn from_expr<E>(expr: E) -> Self
    where
        E: IntoExpr,
        E::Node: Expr<Elem = T>,
    {
        let node = expr.into_expr();
        Self {
            vec: (0..node.len()).map(|i| node.eval(i)).collect(),
        }
    }

    /// Assign an expression elementwise, truncating to the shorter of
    /// the two lengths (the container's assignment contract).
    pub fn assign_expr<E>(&mut self, expr: E)
    where
        E: IntoExpr,
        E::Node: Expr<Elem = T>,
    {
        let node = expr.into_expr();
        self.vec.assign_from((0..node.len()).map(|i| node.eval(i)));
    }

    /// Sum of all elements; the additive default for an empty array.
    #[must_use]
    pub fn sum(&self) -> T
    where
        T: Copy + Default + std::ops::Add<Output = T>,
    {
        self.fold(T::default(), |acc, v| acc + v)
    }

    /// Left fold over the elements, front to rear.
    pub fn fold<A>(&self, init: A, mut f: impl FnMut(A, T) -> A) -> A
    where
        T: Copy,
    {
        self.vec.iter().fold(init, |acc, v| f(acc, *v))
    }

    /// Lazy elementwise application of a plain function.
    #[must_use]
    pub fn apply(&self, f: fn(T) -> T) -> MapFn<ExprRef<'_, T>>
    where
        T: Copy,
    {
        MapFn::new(ExprRef(self), f)
    }
}

macro_rules! float_sqrt {
    ($($float:ty),*) => {$(
        impl Array<$float> {
            /// Lazy elementwise square root.
            #[must_use]
            pub fn sqrt(&self) -> Map<SqrtOp, ExprRef<'_, $float>> {
                Map::new(ExprRef(self))
            }
        }
    )*};
}

float_sqrt!(f32, f64);

impl<T> Deref for Array<T> {
    type Target = BiVec<T>;

    fn deref(&self) -> &BiVec<T> {
        &self.vec
    }
}

impl<T> DerefMut for Array<T> {
    fn deref_mut(&mut self) -> &mut BiVec<T> {
        &mut self.vec
    }
}

impl<T, const N: usize> From<[T; N]> for Array<T> {
    fn from(values: [T; N]) -> Self {
        Self { vec: values.into() }
    }
}

impl<T: Clone> From<&[T]> for Array<T> {
    fn from(values: &[T]) -> Self {
        Self { vec: values.into() }
    }
}

impl<T> From<BiVec<T>> for Array<T> {
    fn from(vec: BiVec<T>) -> Self {
        Self { vec }
    }
}

impl<T> FromIterator<T> for Array<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            vec: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for Array<T> {
    type Item = T;
    type IntoIter = bivec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.vec.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Array<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.vec.iter()
    }
}

impl<T: fmt::Display> fmt::Display for Array<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.vec.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_paths() {
        let empty = Array::<f64>::new();
        assert!(empty.is_empty());

        let sized = Array::<f64>::with_len(4).unwrap();
        assert_eq!(sized.as_slice(), &[0.0; 4]);

        assert!(matches!(
            Array::<f64>::with_len(0),
            Err(Error::InvalidConstruction { requested: 0 })
        ));

        let collected: Array<i64> = (0..5).collect();
        assert_eq!(collected.as_slice(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn container_operations_pass_through() {
        let mut a = Array::from([2.0, 3.0]);
        a.push_front(1.0);
        a.push_back(4.0);
        assert_eq!(a.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(a.front_slack() + a.len() + a.rear_slack(), a.capacity());

        let cursor = a.cursor_at(2);
        assert_eq!(*cursor.get(&a).unwrap(), 3.0);
    }

    #[test]
    fn from_expr_materialises() {
        let a = Array::from([1.0, 2.0]);
        let b = Array::from([3.0, 4.0]);
        let c = Array::from_expr(&a + &b);
        assert_eq!(c.as_slice(), &[4.0, 6.0]);
    }

    #[test]
    fn assign_expr_truncates_to_the_shorter_side() {
        let mut dst = Array::from([0.0, 0.0, 0.0, 0.0]);
        let src = Array::from([1.0, 2.0]);
        dst.assign_expr(&src * 10.0);
        assert_eq!(dst.as_slice(), &[10.0, 20.0]);
    }

    #[test]
    fn reductions() {
        let a = Array::from([1.0, 2.0, 3.0]);
        assert_eq!(a.sum(), 6.0);
        assert_eq!(a.fold(1.0, |acc, v| acc * v), 6.0);
        assert_eq!(Array::<f64>::new().sum(), 0.0);
    }

    #[test]
    fn apply_and_sqrt_stay_lazy_until_materialised() {
        let a = Array::from([1.0f64, 4.0, 9.0]);
        let roots = Array::from_expr(a.sqrt());
        assert_eq!(roots.as_slice(), &[1.0, 2.0, 3.0]);

        let doubled = Array::from_expr(a.apply(|v| v * 2.0));
        assert_eq!(doubled.as_slice(), &[2.0, 8.0, 18.0]);
    }

    #[test]
    fn display_formats_like_a_list() {
        let a = Array::from([1, 2, 3]);
        assert_eq!(a.to_string(), "[1, 2, 3]");
    }
}
