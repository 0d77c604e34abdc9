//! Conversions between storage policies and element types.
//!
//! Every conversion is an element-wise copy into fresh, policy-appropriate
//! storage — never buffer aliasing. The destination is always an owned
//! policy: there is no conversion *into* external storage, because no
//! destination buffer would be implied; external matrices are only ever
//! built from an explicit buffer.

use crate::matrix::Matrix;
use crate::storage::{OwnedStorage, Storage};
use crate::traits::{AsPrimitive, Element};

impl<T, const R: usize, const C: usize, S: Storage<T, R, C>> Matrix<T, R, C, S> {
    /// An element-wise converting copy into another element type and/or
    /// another (owned) storage policy.
    pub fn convert<K, S2>(&self) -> Matrix<K, R, C, S2>
    where
        T: Element + AsPrimitive<K>,
        K: Element,
        S2: OwnedStorage<K, R, C>,
    { Matrix::from_fn(|r, c| self[(r, c)].as_()) }
}

impl<'m, T, K, const R: usize, const C: usize, S, S2>
    From<&'m Matrix<K, R, C, S2>> for Matrix<T, R, C, S>
where
    T: Element,
    K: Element + AsPrimitive<T>,
    S: OwnedStorage<T, R, C>,
    S2: Storage<K, R, C>,
{
    fn from(other: &'m Matrix<K, R, C, S2>) -> Self
    { other.convert() }
}
