//! Scalar traits exposed in public interfaces.
//!
//! These are implemented on a finite set of primitive types rather than
//! through open generic bounds, so that the operator and storage tables in
//! the rest of the crate commit to nothing beyond what they were written
//! for.

use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign};

use num_traits::{One, Zero};

pub use num_traits::AsPrimitive;

/// A matrix element: a primitive numeric type.
///
/// Conversions between element types follow `as`-cast semantics via
/// [`AsPrimitive`]; nothing saturates and nothing is checked, which is
/// precisely the contract the matrix constructors and operators promise.
///
/// This trait is sealed. You get primitive floats and integers; matrices of
/// matrices and other fun algebras are not on the menu.
pub trait Element
    : Copy + Default + fmt::Debug + PartialEq + PartialOrd + 'static
    + Add<Output = Self> + Sub<Output = Self>
    + Mul<Output = Self> + Div<Output = Self>
    + AddAssign + SubAssign + MulAssign + DivAssign
    + Zero + One
    + sealed::Sealed
{ }

mod sealed {
    pub trait Sealed { }
}

macro_rules! impl_element {
    ($($T:ty)*) => {$(
        impl Element for $T { }
        impl sealed::Sealed for $T { }
    )*};
}

impl_element!{ i8 i16 i32 i64 u8 u16 u32 u64 f32 f64 }

/// The common element type of a mixed-type binary operation.
///
/// `Common<A, B>` is the type both `A` and `B` convert to when matrices of
/// differing element types meet in `+`, `-` or [`multiply`]: whichever of
/// the two is higher in conversion rank.
///
/// [`multiply`]: crate::linalg::multiply
pub type Common<A, B> = <A as Promote<B>>::Wider;

/// Relates every ordered pair of element types to their common type.
///
/// The lattice is a single chain ordered by conversion rank
/// (`i8 < u8 < i16 < u16 < i32 < u32 < i64 < u64 < f32 < f64`);
/// `Wider` is whichever of the two sits higher.
pub trait Promote<B: Element>: Element {
    type Wider: Element;
}

// Every pair (A, B) with A earlier in the list than B gets Wider = B, in
// both argument orders; the head-only case closes the diagonal.
macro_rules! impl_promote {
    ($A:ty) => {
        impl Promote<$A> for $A { type Wider = $A; }
    };
    ($A:ty, $($B:ty),+) => {
        impl Promote<$A> for $A { type Wider = $A; }
        $(
            impl Promote<$B> for $A { type Wider = $B; }
            impl Promote<$A> for $B { type Wider = $B; }
        )+
        impl_promote!{ $($B),+ }
    };
}

impl_promote!{ i8, u8, i16, u16, i32, u32, i64, u64, f32, f64 }
