//! The public contract, exercised the way a consumer would.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use placemat::{
    det, multiply, Auto, AutoMatrix, ExternMatrix, HeapMatrix, Matrix, Placement, StackMatrix,
};

macro_rules! assert_close {
    ($a:expr, $b:expr) => { assert_close!($a, $b, 1e-9) };
    ($a:expr, $b:expr, $tol:expr) => {{
        let (a, b): (f64, f64) = ($a, $b);
        assert!((a - b).abs() <= $tol, "not nearly equal!\n left: {a:?}\nright: {b:?}");
    }};
}

#[test]
fn value_construction_is_uniform_across_policies() {
    let auto = AutoMatrix::<i32, 3, 4>::filled(7.9f64);
    let stack = StackMatrix::<i32, 3, 4>::filled(7.9f64);
    let heap = HeapMatrix::<i32, 3, 4>::filled(7.9f64);
    let mut buf = [0i32; 12];
    let ext = ExternMatrix::<i32, 3, 4>::over_filled(&mut buf, 7.9f64);

    for m in [auto.read(), stack.read(), heap.read(), ext.read()] {
        assert_eq!(m, &[7; 12]);
    }
    assert_eq!(auto, stack);
    assert_eq!(stack, heap);
    assert_eq!(heap, ext);
}

#[test]
fn equality_spans_element_types_and_policies() {
    let doubles = AutoMatrix::<f64, 2, 2>::filled(2.0);
    let ints = StackMatrix::<i32, 2, 2>::filled(2);
    assert_eq!(doubles, ints);
    assert!(doubles != StackMatrix::<i32, 2, 2>::filled(3));
}

#[test]
fn arithmetic_chains_across_mixed_policies() {
    let mut buf = [0.0f64; 4];
    let stack = StackMatrix::<f64, 2, 2>::from_list([1.0, 2.0, 3.0, 4.0]);
    let heap = HeapMatrix::<i32, 2, 2>::filled(10);
    let ext = ExternMatrix::<f64, 2, 2>::over_filled(&mut buf, 0.5);

    // ((stack + heap) - ext) * 2 / 4, all without mutating any operand.
    let chained = &(&(&stack + &heap) - &ext) * 2 / 4;
    assert_eq!(chained.read(), &[5.25, 5.75, 6.25, 6.75]);
    assert_eq!(stack.read(), &[1.0, 2.0, 3.0, 4.0]);
    assert_eq!(heap.read(), &[10; 4]);
}

#[test]
fn conversion_round_trips_are_lossless() {
    let original = HeapMatrix::<f64, 4, 4>::from_fn(|r, c| (r * 4 + c) as f64 / 3.0);
    let stacked: StackMatrix<f64, 4, 4> = original.convert();
    let back: HeapMatrix<f64, 4, 4> = stacked.convert();
    assert_eq!(back.read(), original.read());

    let auto: AutoMatrix<f64, 4, 4> = back.convert();
    assert_eq!(auto, original);
}

#[test]
fn auto_spills_big_matrices_to_the_heap() {
    // 32 * 32 * 8 bytes is far past the default 1024-byte limit; the
    // matrix still behaves identically.
    assert_eq!(Auto::<f64, 32, 32>::PLACEMENT, Placement::Heap);
    assert_eq!(Auto::<f64, 4, 4>::PLACEMENT, Placement::Stack);

    let big = AutoMatrix::<f64, 32, 32>::filled(1.5);
    let sum = &big + &AutoMatrix::<f64, 32, 32>::filled(0.5);
    assert_eq!(sum.read(), &[2.0; 1024]);
}

#[test]
fn external_buffers_stay_with_the_caller() {
    let mut buf = vec![0.0f64; 16];
    {
        let mut m = ExternMatrix::<f64, 4, 4>::over(&mut buf);
        m.copy_from(&StackMatrix::<i32, 4, 4>::filled(3));
        m *= 2;
    }
    assert_eq!(buf, vec![6.0; 16]);
}

#[test]
fn rectangular_product_worked_example() {
    let a = AutoMatrix::<i32, 5, 3>::from_rows(&[
        [ 4, 7, 2],
        [ 0, 1, 2],
        [-2, 1, 7],
        [-1, 0, 4],
        [ 0, 1, 5],
    ]);
    let b = AutoMatrix::<i32, 3, 2>::from_flat(&[4, 2, 5, 0, -2, -1]);
    let expected = AutoMatrix::<i32, 5, 2>::from_flat(&[47, 6, 1, -2, -17, -11, -12, -6, -5, -5]);
    assert_eq!(multiply(&a, &b), expected);
}

#[test]
fn determinant_worked_example() {
    let m = AutoMatrix::<f64, 4, 4>::from_rows(&[
        [ 3.0, -2.0,  1.0,  1.0],
        [ 5.0,  1.0,  2.0,  0.0],
        [-1.0,  1.0, -1.0,  1.0],
        [ 2.0, -1.0,  6.0, -3.0],
    ]);
    assert_close!(det(&m), -69.0);

    let dependent = AutoMatrix::<f64, 3, 3>::from_rows(&[
        [ 1.0, -2.0, 4.0],
        [-3.0,  6.0, -12.0], // -3 times the first row
        [ 5.0,  0.0, 1.0],
    ]);
    assert_close!(det(&dependent), 0.0);
}

#[test]
fn determinant_is_multiplicative() {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    for _ in 0..20 {
        let a = AutoMatrix::<f64, 4, 4>::from_fn(|_, _| rng.gen_range(-2.0..2.0));
        let b = AutoMatrix::<f64, 4, 4>::from_fn(|_, _| rng.gen_range(-2.0..2.0));
        assert_close!(det(&multiply(&a, &b)), det(&a) * det(&b), 1e-8);
    }
}

#[test]
fn display_matches_the_printer_contract() {
    let m = StackMatrix::<i32, 3, 1>::from_list([2, 1]);
    assert_eq!(m.read(), &[2, 1, 0]);
    assert_eq!(format!("{m}"), "2\n1\n0\n");

    let wide = Matrix::<f64, 1, 3>::from_list([0.5, -1.0, 2.0]);
    assert_eq!(format!("{wide}"), "0.5 -1 2\n");
}
