//! The matrix entity.
//!
//! Layout:
//! ```text
//!         C
//!   x - - - >
//!   |0,0 0,1
//! R |1,0 1,1
//!   v
//! ```
//! Element `(r, c)` lives at flat index `r * C + c` of the backing buffer.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use crate::storage::{Auto, External, Heap, OwnedStorage, Stack, Storage};
use crate::traits::{AsPrimitive, Element};

/// A dense `R x C` matrix of `T`, stored wherever `S` says.
///
/// The storage parameter defaults to [`Auto`], which resolves to stack or
/// heap placement from the buffer's byte size. Two matrices of the same
/// `(T, R, C)` but different storage are interchangeable everywhere a
/// matrix is read.
pub struct Matrix<T, const R: usize, const C: usize, S = Auto<T, R, C>> {
    data: S,
    marker: PhantomData<T>,
}

/// A matrix whose placement is resolved from its byte size.
pub type AutoMatrix<T, const R: usize, const C: usize> = Matrix<T, R, C, Auto<T, R, C>>;
/// A matrix stored inline.
pub type StackMatrix<T, const R: usize, const C: usize> = Matrix<T, R, C, Stack<T, R, C>>;
/// A matrix stored in its own heap allocation.
pub type HeapMatrix<T, const R: usize, const C: usize> = Matrix<T, R, C, Heap<T, R, C>>;
/// A matrix over a caller-owned buffer.
pub type ExternMatrix<'a, T, const R: usize, const C: usize> = Matrix<T, R, C, External<'a, T, R, C>>;

/// Row iterator over contiguous row slices.
pub type Rows<'a, T> = std::slice::Chunks<'a, T>;

// ---------------------------------------------------------------------------
// construction (owned storage only)

impl<T: Element, const R: usize, const C: usize, S: OwnedStorage<T, R, C>> Matrix<T, R, C, S> {
    fn from_storage(data: S) -> Self {
        const { assert!(R > 0 && C > 0, "matrix dimensions must be nonzero") }
        Matrix { data, marker: PhantomData }
    }

    /// A matrix with every cell `T::default()`.
    pub fn new() -> Self
    { Self::from_fn(|_, _| T::default()) }

    /// Construct from a function on `(row, col)` indices.
    pub fn from_fn(mut f: impl FnMut(usize, usize) -> T) -> Self
    { Self::from_storage(S::from_fn(|i| f(i / C, i % C))) }

    /// A matrix with every cell equal to `value`, converted to `T`
    /// with `as`-cast semantics.
    pub fn filled<K: AsPrimitive<T>>(value: K) -> Self
    { Self::from_fn(|_, _| value.as_()) }

    /// Element-wise converting copy of a row array.
    pub fn from_rows<K: AsPrimitive<T>>(rows: &[[K; C]; R]) -> Self
    { Self::from_fn(|r, c| rows[r][c].as_()) }

    /// Element-wise converting copy of the first `R * C` elements of a
    /// flat row-major slice. Excess elements are ignored.
    ///
    /// # Panics
    ///
    /// Panics if the slice holds fewer than `R * C` elements.
    pub fn from_flat<K: AsPrimitive<T>>(flat: &[K]) -> Self {
        assert!(flat.len() >= R * C, "flat source too small for a {R}x{C} matrix");
        Self::from_storage(S::from_fn(|i| flat[i].as_()))
    }

    /// Construct from a literal sequence, row-major.
    ///
    /// Fewer elements than `R * C` leaves the remaining cells at
    /// `T::default()`; more than `R * C` silently drops the excess.
    pub fn from_list<K, I>(list: I) -> Self
    where
        K: AsPrimitive<T>,
        I: IntoIterator<Item = K>,
    {
        let mut list = list.into_iter();
        Self::from_storage(S::from_fn(|_| match list.next() {
            Some(value) => value.as_(),
            None => T::default(),
        }))
    }
}

impl<T: Element, const R: usize, const C: usize, S: OwnedStorage<T, R, C>> Default for Matrix<T, R, C, S> {
    fn default() -> Self
    { Self::new() }
}

// Cloning deep-copies owned storage; `External` has no `Clone`, so
// copy-constructing a borrowed-buffer matrix is a compile error.
impl<T: Clone, const R: usize, const C: usize, S: Clone> Clone for Matrix<T, R, C, S> {
    fn clone(&self) -> Self
    { Matrix { data: self.data.clone(), marker: PhantomData } }
}

// ---------------------------------------------------------------------------
// construction (external storage)

impl<'a, T: Element, const R: usize, const C: usize> ExternMatrix<'a, T, R, C> {
    /// A matrix over `buf`, leaving the buffer's contents as they are.
    ///
    /// The buffer must hold at least `R * C` elements (any excess is never
    /// touched) and stays owned by the caller; the matrix neither allocates
    /// nor frees. There is no list or default form, and no construction
    /// from another matrix — nothing implies a destination buffer except
    /// an explicit one.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is shorter than `R * C`.
    pub fn over(buf: &'a mut [T]) -> Self {
        const { assert!(R > 0 && C > 0, "matrix dimensions must be nonzero") }
        Matrix { data: External::new(buf), marker: PhantomData }
    }

    /// A matrix over `buf` with every cell set to `value`.
    pub fn over_filled<K: AsPrimitive<T>>(buf: &'a mut [T], value: K) -> Self {
        let mut matrix = Self::over(buf);
        matrix.write().fill(value.as_());
        matrix
    }

    /// A matrix over `buf` filled from a row array.
    pub fn over_rows<K: AsPrimitive<T>>(buf: &'a mut [T], rows: &[[K; C]; R]) -> Self {
        let mut matrix = Self::over(buf);
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                matrix[(r, c)] = value.as_();
            }
        }
        matrix
    }
}

// ---------------------------------------------------------------------------
// access

impl<T, const R: usize, const C: usize, S: Storage<T, R, C>> Matrix<T, R, C, S> {
    /// The flat row-major buffer, read-only. O(1), infallible.
    #[inline(always)]
    pub fn read(&self) -> &[T]
    { self.data.as_slice() }

    /// The flat row-major buffer, mutable. O(1), infallible; no validation
    /// is performed on what the caller writes.
    #[inline(always)]
    pub fn write(&mut self) -> &mut [T]
    { self.data.as_mut_slice() }

    /// Iterate over contiguous rows.
    pub fn rows(&self) -> Rows<'_, T>
    { self.read().chunks(C) }

    /// `(R, C)`.
    pub const fn dims(&self) -> (usize, usize)
    { (R, C) }

    /// Element-wise converting copy-assignment from any same-shape matrix.
    ///
    /// This is also the only way to "copy" into external storage: both
    /// sides already have buffers, so no ownership question arises.
    pub fn copy_from<K, S2>(&mut self, other: &Matrix<K, R, C, S2>)
    where
        T: Element,
        K: Element + AsPrimitive<T>,
        S2: Storage<K, R, C>,
    {
        for (dst, src) in self.write().iter_mut().zip(other.read()) {
            *dst = src.as_();
        }
    }

    /// Write the matrix to stdout: one line per row, elements separated by
    /// spaces, trailing newline. Diagnostic only.
    pub fn print(&self)
    where T: fmt::Display,
    { print!("{}", self) }
}

impl<T, const R: usize, const C: usize, S: Storage<T, R, C>> Index<(usize, usize)> for Matrix<T, R, C, S> {
    type Output = T;

    #[inline(always)]
    fn index(&self, (r, c): (usize, usize)) -> &T
    { &self.read()[r * C + c] }
}

impl<T, const R: usize, const C: usize, S: Storage<T, R, C>> IndexMut<(usize, usize)> for Matrix<T, R, C, S> {
    #[inline(always)]
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut T
    { &mut self.write()[r * C + c] }
}

// Debug as a nested list of rows, regardless of storage.
impl<T: fmt::Debug, const R: usize, const C: usize, S: Storage<T, R, C>> fmt::Debug for Matrix<T, R, C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    { f.debug_list().entries(self.rows()).finish() }
}

// ---------------------------------------------------------------------------
