//! Storage placement: where a matrix's backing buffer lives.
//!
//! Every [`Matrix`](crate::Matrix) is parameterized by one of exactly four
//! backends: [`Stack`] (inline), [`Heap`] (owned allocation), [`Auto`]
//! (stack or heap, picked by byte size), and [`External`] (a caller-owned
//! buffer the matrix merely borrows). The set is closed — the traits here
//! are sealed, because the result-storage table in [`Combine`] enumerates
//! all sixteen pairings and a fifth policy would silently fall outside it.

use std::mem;

use log::trace;

/// The largest matrix (in bytes) that [`Auto`] keeps inline.
///
/// Defaults to 1024; can be overridden at build time through the
/// `PLACEMAT_STACK_LIMIT` environment variable. Moving the limit changes
/// which backend `Auto` picks, never the arithmetic.
pub const STACK_SIZE_MAX: usize = match option_env!("PLACEMAT_STACK_LIMIT") {
    Some(s) => parse_limit(s),
    None => 1024,
};

const fn parse_limit(s: &str) -> usize {
    let digits = s.as_bytes();
    assert!(!digits.is_empty(), "PLACEMAT_STACK_LIMIT must be a byte count");
    let mut value = 0;
    let mut i = 0;
    while i < digits.len() {
        assert!(digits[i].is_ascii_digit(), "PLACEMAT_STACK_LIMIT must be a byte count");
        value = value * 10 + (digits[i] - b'0') as usize;
        i += 1;
    }
    value
}

/// Outcome of automatic placement: one of the two owned backends.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Placement {
    Stack,
    Heap,
}

/// Decides where a buffer of the given byte size should live.
///
/// Pure and const; [`Auto`] evaluates it once per monomorphization.
pub const fn auto_placement(byte_size: usize) -> Placement {
    if byte_size > STACK_SIZE_MAX { Placement::Heap } else { Placement::Stack }
}

// ---------------------------------------------------------------------------

/// Uniform access to a flat, row-major buffer of exactly `R * C` elements.
///
/// The accessors perform no validation of their own; the matrix layer and
/// the algorithms respect the fixed extent.
///
/// This trait is sealed: the four backends in this module are the only
/// implementations there will ever be.
pub trait Storage<T, const R: usize, const C: usize>: sealed::Sealed {
    fn as_slice(&self) -> &[T];
    fn as_mut_slice(&mut self) -> &mut [T];
}

/// A [`Storage`] that owns its buffer and can therefore be created.
///
/// [`External`] deliberately does not implement this; every construction
/// form that would need to conjure a destination buffer (default, copy,
/// list, conversion from another matrix) bounds on `OwnedStorage` and is
/// thus a compile error for caller-owned storage.
pub trait OwnedStorage<T, const R: usize, const C: usize>
    : Storage<T, R, C> + Sized
{
    /// Build a buffer from a function on flat row-major indices.
    fn from_fn(f: impl FnMut(usize) -> T) -> Self;
}

mod sealed {
    pub trait Sealed { }

    impl<T, const R: usize, const C: usize> Sealed for super::Stack<T, R, C> { }
    impl<T, const R: usize, const C: usize> Sealed for super::Heap<T, R, C> { }
    impl<T, const R: usize, const C: usize> Sealed for super::Auto<T, R, C> { }
    impl<'a, T, const R: usize, const C: usize> Sealed for super::External<'a, T, R, C> { }
}

// ---------------------------------------------------------------------------

/// Inline storage. Lives wherever the matrix itself lives.
#[derive(Debug, Clone)]
pub struct Stack<T, const R: usize, const C: usize>([[T; C]; R]);

impl<T, const R: usize, const C: usize> Storage<T, R, C> for Stack<T, R, C> {
    #[inline(always)]
    fn as_slice(&self) -> &[T]
    { self.0.as_flattened() }

    #[inline(always)]
    fn as_mut_slice(&mut self) -> &mut [T]
    { self.0.as_flattened_mut() }
}

impl<T, const R: usize, const C: usize> OwnedStorage<T, R, C> for Stack<T, R, C> {
    fn from_fn(mut f: impl FnMut(usize) -> T) -> Self {
        trace!("stack storage ({R}x{C})");
        Stack(std::array::from_fn(|r| std::array::from_fn(|c| f(r * C + c))))
    }
}

/// Heap storage. One allocation per matrix, freed with it.
///
/// Moving out transfers the box, so the moved-from value never frees;
/// a panic while filling drops whatever was already produced.
#[derive(Debug, Clone)]
pub struct Heap<T, const R: usize, const C: usize>(Box<[T]>);

impl<T, const R: usize, const C: usize> Storage<T, R, C> for Heap<T, R, C> {
    #[inline(always)]
    fn as_slice(&self) -> &[T]
    { &self.0 }

    #[inline(always)]
    fn as_mut_slice(&mut self) -> &mut [T]
    { &mut self.0 }
}

impl<T, const R: usize, const C: usize> OwnedStorage<T, R, C> for Heap<T, R, C> {
    fn from_fn(f: impl FnMut(usize) -> T) -> Self {
        trace!("heap storage ({R}x{C})");
        Heap((0..R * C).map(f).collect())
    }
}

/// Size-resolved storage: [`Stack`] up to [`STACK_SIZE_MAX`] bytes,
/// [`Heap`] beyond.
///
/// The variant is decided by [`auto_placement`] through an associated
/// const, so each concrete `Auto<T, R, C>` only ever constructs one arm.
#[derive(Debug, Clone)]
pub enum Auto<T, const R: usize, const C: usize> {
    Stack(Stack<T, R, C>),
    Heap(Heap<T, R, C>),
}

impl<T, const R: usize, const C: usize> Auto<T, R, C> {
    /// Where this monomorphization's buffer lives.
    pub const PLACEMENT: Placement = auto_placement(mem::size_of::<T>() * R * C);
}

impl<T, const R: usize, const C: usize> Storage<T, R, C> for Auto<T, R, C> {
    #[inline(always)]
    fn as_slice(&self) -> &[T] {
        match self {
            Auto::Stack(data) => data.as_slice(),
            Auto::Heap(data) => data.as_slice(),
        }
    }

    #[inline(always)]
    fn as_mut_slice(&mut self) -> &mut [T] {
        match self {
            Auto::Stack(data) => data.as_mut_slice(),
            Auto::Heap(data) => data.as_mut_slice(),
        }
    }
}

impl<T, const R: usize, const C: usize> OwnedStorage<T, R, C> for Auto<T, R, C> {
    fn from_fn(f: impl FnMut(usize) -> T) -> Self {
        match Self::PLACEMENT {
            Placement::Stack => Auto::Stack(Stack::from_fn(f)),
            Placement::Heap => Auto::Heap(Heap::from_fn(f)),
        }
    }
}

/// Caller-owned storage: a borrowed buffer the matrix never allocates,
/// frees, or copies into existence.
///
/// Not `Clone` — a copy would need a destination buffer this API has no way
/// to obtain. The borrow also forces the buffer to outlive the matrix.
/// Element-wise assignment between two existing externals is available as
/// [`Matrix::copy_from`](crate::Matrix::copy_from).
#[derive(Debug)]
pub struct External<'a, T, const R: usize, const C: usize>(&'a mut [T]);

impl<'a, T, const R: usize, const C: usize> External<'a, T, R, C> {
    /// Wrap a caller-supplied buffer of at least `R * C` elements.
    /// Any excess tail is left untouched.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is shorter than `R * C`.
    pub fn new(buf: &'a mut [T]) -> Self {
        trace!("external storage ({R}x{C}) over buffer of {}", buf.len());
        assert!(buf.len() >= R * C, "external buffer too small for a {R}x{C} matrix");
        External(&mut buf[..R * C])
    }
}

impl<'a, T, const R: usize, const C: usize> Storage<T, R, C> for External<'a, T, R, C> {
    #[inline(always)]
    fn as_slice(&self) -> &[T]
    { self.0 }

    #[inline(always)]
    fn as_mut_slice(&mut self) -> &mut [T]
    { self.0 }
}

// ---------------------------------------------------------------------------

/// The result-storage table for binary operations.
///
/// `<SA as Combine<SB>>::With<U, R, C>` is the storage of the result of an
/// operation between operands stored in `SA` and `SB`, with result element
/// type `U` and shape `R x C`. The table:
///
/// ```text
///     lhs \ rhs   Auto   Stack  Heap   External
///     Auto        Auto   Stack  Heap   Auto
///     Stack       Stack  Stack  Auto   Stack
///     Heap        Heap   Auto   Heap   Heap
///     External    Auto   Stack  Heap   Auto
/// ```
///
/// Stack against Heap is ambiguous by size, so it falls back to sizing the
/// result; External never propagates, since ownership of a fresh result
/// cannot be inferred from a borrowed operand. The output is always owned.
pub trait Combine<Rhs> {
    type With<U, const R: usize, const C: usize>: OwnedStorage<U, R, C>;
}

/// Shorthand for a [`Combine`] table cell.
pub type Combined<SA, SB, U, const R: usize, const C: usize>
    = <SA as Combine<SB>>::With<U, R, C>;

// One impl per table cell. Operand shapes and element types are free (a
// matrix product combines differently-shaped operands); only the backend
// kind feeds the decision.
macro_rules! combine_cells {
    ($( $Lhs:ident [$($alt:lifetime)?] + $Rhs:ident [$($blt:lifetime)?] => $Out:ident; )*) => {$(
        impl<$($alt,)? $($blt,)? A, B, const AR: usize, const AC: usize, const BR: usize, const BC: usize>
            Combine<$Rhs<$($blt,)? B, BR, BC>> for $Lhs<$($alt,)? A, AR, AC>
        {
            type With<U, const R: usize, const C: usize> = $Out<U, R, C>;
        }
    )*};
}

combine_cells!{
    Auto []     + Auto []      => Auto;
    Auto []     + Stack []     => Stack;
    Auto []     + Heap []      => Heap;
    Auto []     + External['b] => Auto;

    Stack []    + Auto []      => Stack;
    Stack []    + Stack []     => Stack;
    Stack []    + Heap []      => Auto;
    Stack []    + External['b] => Stack;

    Heap []     + Auto []      => Heap;
    Heap []     + Stack []     => Auto;
    Heap []     + Heap []      => Heap;
    Heap []     + External['b] => Heap;

    External['a] + Auto []      => Auto;
    External['a] + Stack []     => Stack;
    External['a] + Heap []      => Heap;
    External['a] + External['b] => Auto;
}

// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_boundary() {
        assert_eq!(auto_placement(0), Placement::Stack);
        assert_eq!(auto_placement(STACK_SIZE_MAX), Placement::Stack);
        assert_eq!(auto_placement(STACK_SIZE_MAX + 1), Placement::Heap);
    }

    #[test]
    fn auto_resolves_by_byte_size() {
        // 16 * 8 * 8 = 1024 bytes exactly; one more row spills.
        assert_eq!(Auto::<f64, 16, 8>::PLACEMENT, Placement::Stack);
        assert_eq!(Auto::<f64, 17, 8>::PLACEMENT, Placement::Heap);
        // Element size matters, not element count.
        assert_eq!(Auto::<u8, 17, 8>::PLACEMENT, Placement::Stack);
    }

    #[test]
    fn from_fn_is_flat_row_major() {
        let stack = Stack::<usize, 2, 3>::from_fn(|i| i * 10);
        assert_eq!(stack.as_slice(), &[0, 10, 20, 30, 40, 50]);

        let heap = Heap::<usize, 2, 3>::from_fn(|i| i * 10);
        assert_eq!(heap.as_slice(), stack.as_slice());

        let auto = Auto::<usize, 2, 3>::from_fn(|i| i * 10);
        assert_eq!(auto.as_slice(), stack.as_slice());
    }

    #[test]
    fn external_trims_to_extent() {
        let mut buf = [7i32; 10];
        let mut ext = External::<i32, 2, 3>::new(&mut buf);
        assert_eq!(ext.as_slice().len(), 6);
        ext.as_mut_slice()[5] = -1;
        assert_eq!(buf[5], -1);
        assert_eq!(buf[6..], [7, 7, 7, 7]);
    }

    #[test]
    #[should_panic(expected = "external buffer too small")]
    fn external_rejects_short_buffer() {
        let mut buf = [0u8; 5];
        let _ = External::<u8, 2, 3>::new(&mut buf);
    }

    #[test]
    fn parse_limit_accepts_digits() {
        assert_eq!(parse_limit("0"), 0);
        assert_eq!(parse_limit("4096"), 4096);
    }
}
