//! Operator impls for [`Matrix`].
//!
//! Binary operators accept operands of differing element types and storage
//! policies; the result element type comes from the [`Promote`] lattice and
//! the result storage from the [`Combine`] table. Nothing here mutates an
//! operand except the compound-assignment forms.

use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::matrix::Matrix;
use crate::storage::{Combine, Combined, Storage};
use crate::traits::{AsPrimitive, Common, Element, Promote};

// ---------------------------------------------------------------------------
// matrix + matrix, matrix - matrix

// Generated for every value/reference operand combination.
macro_rules! impl_mat_add_sub {
    ($( [ ($($lt_a:tt)*) ($($ref_a:tt)*) ] [ ($($lt_b:tt)*) ($($ref_b:tt)*) ] )*) => {$(
        impl<$($lt_a)* $($lt_b)* A, B, const R: usize, const C: usize, SA, SB>
            Add<$($ref_b)* Matrix<B, R, C, SB>> for $($ref_a)* Matrix<A, R, C, SA>
        where
            A: Element + Promote<B> + AsPrimitive<Common<A, B>>,
            B: Element + AsPrimitive<Common<A, B>>,
            SA: Storage<A, R, C> + Combine<SB>,
            SB: Storage<B, R, C>,
        {
            type Output = Matrix<Common<A, B>, R, C, Combined<SA, SB, Common<A, B>, R, C>>;

            #[inline]
            fn add(self, rhs: $($ref_b)* Matrix<B, R, C, SB>) -> Self::Output {
                let (a, b) = (self.read(), rhs.read());
                Matrix::from_fn(|r, c| a[r * C + c].as_() + b[r * C + c].as_())
            }
        }

        impl<$($lt_a)* $($lt_b)* A, B, const R: usize, const C: usize, SA, SB>
            Sub<$($ref_b)* Matrix<B, R, C, SB>> for $($ref_a)* Matrix<A, R, C, SA>
        where
            A: Element + Promote<B> + AsPrimitive<Common<A, B>>,
            B: Element + AsPrimitive<Common<A, B>>,
            SA: Storage<A, R, C> + Combine<SB>,
            SB: Storage<B, R, C>,
        {
            type Output = Matrix<Common<A, B>, R, C, Combined<SA, SB, Common<A, B>, R, C>>;

            #[inline]
            fn sub(self, rhs: $($ref_b)* Matrix<B, R, C, SB>) -> Self::Output {
                let (a, b) = (self.read(), rhs.read());
                Matrix::from_fn(|r, c| a[r * C + c].as_() - b[r * C + c].as_())
            }
        }
    )*};
}

impl_mat_add_sub!{
    [ (   ) (   ) ] [ (   ) (   ) ]
    [ (   ) (   ) ] [ ('b,) (&'b) ]
    [ ('a,) (&'a) ] [ (   ) (   ) ]
    [ ('a,) (&'a) ] [ ('b,) (&'b) ]
}

// ---------------------------------------------------------------------------
// unary ops

// The storage of a single-operand result is the operand's policy combined
// with itself: Stack and Heap keep their placement, Auto stays Auto, and
// External degrades to Auto since the result cannot borrow the caller's
// buffer.
macro_rules! impl_mat_neg {
    ($( [ ($($lt_a:tt)*) ($($ref_a:tt)*) ] )*) => {$(
        impl<$($lt_a)* T, const R: usize, const C: usize, S> Neg for $($ref_a)* Matrix<T, R, C, S>
        where
            T: Element + Neg<Output = T>,
            S: Storage<T, R, C> + Combine<S>,
        {
            type Output = Matrix<T, R, C, Combined<S, S, T, R, C>>;

            #[inline]
            fn neg(self) -> Self::Output {
                let a = self.read();
                Matrix::from_fn(|r, c| -a[r * C + c])
            }
        }
    )*};
}

impl_mat_neg!{
    [ (   ) (   ) ]
    [ ('a,) (&'a) ]
}

impl<T, const R: usize, const C: usize, S> Matrix<T, R, C, S>
where
    T: Element,
    S: Storage<T, R, C> + Combine<S>,
{
    /// A detached value copy with the single-operand result storage — the
    /// nearest Rust rendition of unary `+` on a matrix.
    pub fn pos(&self) -> Matrix<T, R, C, Combined<S, S, T, R, C>>
    { Matrix::from_fn(|r, c| self[(r, c)]) }
}

// ---------------------------------------------------------------------------
// matrix * scalar, matrix / scalar

// The scalar converts to the matrix's element type, never the other way;
// the result element type is therefore `T` unchanged.
macro_rules! impl_mat_scalar_ops {
    ($( [ ($($lt_a:tt)*) ($($ref_a:tt)*) ] )*) => {$(
        impl<$($lt_a)* T, K, const R: usize, const C: usize, S> Mul<K> for $($ref_a)* Matrix<T, R, C, S>
        where
            T: Element,
            K: AsPrimitive<T>,
            S: Storage<T, R, C> + Combine<S>,
        {
            type Output = Matrix<T, R, C, Combined<S, S, T, R, C>>;

            #[inline]
            fn mul(self, scalar: K) -> Self::Output {
                let a = self.read();
                let scalar = scalar.as_();
                Matrix::from_fn(|r, c| a[r * C + c] * scalar)
            }
        }

        impl<$($lt_a)* T, K, const R: usize, const C: usize, S> Div<K> for $($ref_a)* Matrix<T, R, C, S>
        where
            T: Element,
            K: AsPrimitive<T>,
            S: Storage<T, R, C> + Combine<S>,
        {
            type Output = Matrix<T, R, C, Combined<S, S, T, R, C>>;

            // Division by a scalar that converts to zero is not
            // intercepted; the outcome is whatever `T`'s division does.
            #[inline]
            fn div(self, scalar: K) -> Self::Output {
                let a = self.read();
                let scalar = scalar.as_();
                Matrix::from_fn(|r, c| a[r * C + c] / scalar)
            }
        }
    )*};
}

impl_mat_scalar_ops!{
    [ (   ) (   ) ]
    [ ('a,) (&'a) ]
}

// scalar * matrix, defined by commuting.
//
// The orphan rules prevent a single impl "for K", so one impl is generated
// per primitive scalar type.
macro_rules! impl_scalar_mat_mul {
    ($($K:ty)*) => {$(
        impl<'m, T, const R: usize, const C: usize, S> Mul<&'m Matrix<T, R, C, S>> for $K
        where
            T: Element,
            $K: AsPrimitive<T>,
            S: Storage<T, R, C> + Combine<S>,
        {
            type Output = Matrix<T, R, C, Combined<S, S, T, R, C>>;

            #[inline(always)]
            fn mul(self, matrix: &'m Matrix<T, R, C, S>) -> Self::Output
            { matrix * self }
        }

        impl<T, const R: usize, const C: usize, S> Mul<Matrix<T, R, C, S>> for $K
        where
            T: Element,
            $K: AsPrimitive<T>,
            S: Storage<T, R, C> + Combine<S>,
        {
            type Output = Matrix<T, R, C, Combined<S, S, T, R, C>>;

            #[inline(always)]
            fn mul(self, matrix: Matrix<T, R, C, S>) -> Self::Output
            { &matrix * self }
        }
    )*};
}

impl_scalar_mat_mul!{ i8 i16 i32 i64 u8 u16 u32 u64 f32 f64 }

// ---------------------------------------------------------------------------
// compound assignment

// In place, converting the right side to the left's element type; no
// fresh storage is ever created here.
macro_rules! impl_mat_assign_ops {
    ($( [ ($($lt_b:tt)*) ($($ref_b:tt)*) ] )*) => {$(
        impl<$($lt_b)* T, K, const R: usize, const C: usize, S, S2>
            AddAssign<$($ref_b)* Matrix<K, R, C, S2>> for Matrix<T, R, C, S>
        where
            T: Element,
            K: Element + AsPrimitive<T>,
            S: Storage<T, R, C>,
            S2: Storage<K, R, C>,
        {
            #[inline]
            fn add_assign(&mut self, rhs: $($ref_b)* Matrix<K, R, C, S2>) {
                for (dst, src) in self.write().iter_mut().zip(rhs.read()) {
                    *dst += src.as_();
                }
            }
        }

        impl<$($lt_b)* T, K, const R: usize, const C: usize, S, S2>
            SubAssign<$($ref_b)* Matrix<K, R, C, S2>> for Matrix<T, R, C, S>
        where
            T: Element,
            K: Element + AsPrimitive<T>,
            S: Storage<T, R, C>,
            S2: Storage<K, R, C>,
        {
            #[inline]
            fn sub_assign(&mut self, rhs: $($ref_b)* Matrix<K, R, C, S2>) {
                for (dst, src) in self.write().iter_mut().zip(rhs.read()) {
                    *dst -= src.as_();
                }
            }
        }
    )*};
}

impl_mat_assign_ops!{
    [ (   ) (   ) ]
    [ ('b,) (&'b) ]
}

impl<T, K, const R: usize, const C: usize, S> MulAssign<K> for Matrix<T, R, C, S>
where
    T: Element,
    K: AsPrimitive<T>,
    S: Storage<T, R, C>,
{
    #[inline]
    fn mul_assign(&mut self, scalar: K) {
        let scalar = scalar.as_();
        for dst in self.write() {
            *dst *= scalar;
        }
    }
}

impl<T, K, const R: usize, const C: usize, S> DivAssign<K> for Matrix<T, R, C, S>
where
    T: Element,
    K: AsPrimitive<T>,
    S: Storage<T, R, C>,
{
    #[inline]
    fn div_assign(&mut self, scalar: K) {
        let scalar = scalar.as_();
        for dst in self.write() {
            *dst /= scalar;
        }
    }
}

// ---------------------------------------------------------------------------
// comparison

// Exact element-wise comparison after converting the right side to the
// left's element type. Deliberately not tolerance-based: two float
// matrices that differ by accumulated rounding error compare unequal.
impl<T, K, const R: usize, const C: usize, S, S2>
    PartialEq<Matrix<K, R, C, S2>> for Matrix<T, R, C, S>
where
    T: Element,
    K: Element + AsPrimitive<T>,
    S: Storage<T, R, C>,
    S2: Storage<K, R, C>,
{
    fn eq(&self, other: &Matrix<K, R, C, S2>) -> bool {
        self.read().iter()
            .zip(other.read())
            .all(|(a, b)| *a == b.as_())
    }
}

// ---------------------------------------------------------------------------
// formatting

// fmt traits apply the format to each element: one line per row, elements
// space-separated, newline after every row.
macro_rules! impl_mat_fmt {
    ($($Format:ident)*) => {$(
        impl<T: fmt::$Format, const R: usize, const C: usize, S: Storage<T, R, C>>
            fmt::$Format for Matrix<T, R, C, S>
        {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                for row in self.rows() {
                    for (c, x) in row.iter().enumerate() {
                        if c != 0 {
                            f.write_str(" ")?;
                        }
                        fmt::$Format::fmt(x, f)?;
                    }
                    f.write_str("\n")?;
                }
                Ok(())
            }
        }
    )*};
}

impl_mat_fmt!{ Display LowerExp UpperExp LowerHex UpperHex Octal Binary }

// ---------------------------------------------------------------------------
