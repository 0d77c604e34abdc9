//! Fixed-dimension dense matrices whose storage placement is a
//! compile-time policy, independent of their arithmetic.
//!
//! A [`Matrix<T, R, C, S>`](Matrix) always holds exactly `R * C` elements
//! in row-major order; `S` decides where that buffer lives:
//!
//! * [`Stack`](storage::Stack) — inline with the matrix;
//! * [`Heap`](storage::Heap) — an owned allocation;
//! * [`Auto`](storage::Auto) — stack or heap, resolved from the buffer's
//!   byte size against [`STACK_SIZE_MAX`](storage::STACK_SIZE_MAX)
//!   (the default);
//! * [`External`](storage::External) — a caller-owned buffer the matrix
//!   borrows but never allocates, frees, or copies into existence.
//!
//! The same arithmetic holds across all four. Binary operators mix element
//! types (the result uses the [`Common`](traits::Common) promoted type)
//! and storage policies (the result's storage comes from the
//! [`Combine`](storage::Combine) table). Misuse of caller-owned storage —
//! default construction, copy construction, building one from another
//! matrix — is a compile error rather than a runtime condition.
//!
//! ```
//! use placemat::{Matrix, StackMatrix, HeapMatrix, multiply};
//!
//! let a = StackMatrix::<i32, 2, 3>::from_list([1, 2, 3, 4, 5, 6]);
//! let b = HeapMatrix::<f64, 3, 2>::filled(0.5);
//! let product = multiply(&a, &b); // 2x2, f64, auto-placed
//! assert_eq!(product, Matrix::<f64, 2, 2>::from_list([3.0, 3.0, 7.5, 7.5]));
//! ```
//!
//! Everything is single-threaded and synchronous; each owned matrix has
//! exclusive use of its buffer, so distinct matrices may be used from
//! distinct threads, while sharing one external buffer needs caller-side
//! synchronization.

mod conv;
mod matrix;
mod ops;

pub mod linalg;
pub mod storage;
pub mod traits;

pub use crate::linalg::{det, multiply};
pub use crate::matrix::{AutoMatrix, ExternMatrix, HeapMatrix, Matrix, Rows, StackMatrix};
pub use crate::storage::{
    auto_placement, Auto, Combine, Combined, External, Heap, OwnedStorage, Placement, Stack,
    Storage, STACK_SIZE_MAX,
};
pub use crate::traits::{AsPrimitive, Common, Element, Promote};
