use std::sync::atomic::{AtomicUsize, Ordering};

use lct_basis::{BasisState, Monomial};
use lct_core::errors::{ErrorInfo, LctError};
use lct_elem::{MassTerm, MatrixElement};
use lct_matrix::{assemble, hermiticity_defect, AssemblyOpts};
use num_complex::Complex64;
use proptest::prelude::*;

fn ladder(n: u32) -> Vec<BasisState> {
    (0..n)
        .map(|l| BasisState::single(Monomial::new(1, l + 1), Complex64::new(1.0, 0.0)).expect("state"))
        .collect()
}

fn opts(threads: usize) -> AssemblyOpts {
    AssemblyOpts {
        threads,
        ..AssemblyOpts::default()
    }
}

struct Counting {
    calls: AtomicUsize,
}

impl MatrixElement for Counting {
    fn label(&self) -> &'static str {
        "counting"
    }

    fn evaluate(&self, o1: &BasisState, o2: &BasisState) -> Result<Complex64, LctError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(Complex64::new(
            (o1.dimension() * o2.dimension()) as f64,
            (o1.dimension() - o2.dimension()) as f64,
        ))
    }
}

struct FailsAt {
    row_dim: i64,
    col_dim: i64,
}

impl MatrixElement for FailsAt {
    fn label(&self) -> &'static str {
        "fails-at"
    }

    fn evaluate(&self, o1: &BasisState, o2: &BasisState) -> Result<Complex64, LctError> {
        if o1.dimension() == self.row_dim && o2.dimension() == self.col_dim {
            return Err(LctError::Quadrature(ErrorInfo::new(
                "quadrature-divergence",
                "synthetic failure",
            )));
        }
        Ok(Complex64::new(1.0, 0.0))
    }
}

struct Complexified;

impl MatrixElement for Complexified {
    fn label(&self) -> &'static str {
        "complexified"
    }

    fn evaluate(&self, _o1: &BasisState, _o2: &BasisState) -> Result<Complex64, LctError> {
        Ok(Complex64::new(1.0, 0.25))
    }
}

#[test]
fn evaluates_each_lower_triangle_cell_once() {
    let states = ladder(6);
    let element = Counting {
        calls: AtomicUsize::new(0),
    };
    let matrix = assemble(&states, &element, &opts(3)).expect("assembly");
    assert_eq!(element.calls.load(Ordering::Relaxed), 6 * 7 / 2);
    assert_eq!(matrix.shape(), (6, 6));
    assert_eq!(hermiticity_defect(&matrix), 0.0);
    // dims are 3..=8; (i, j) = (4, 1) holds dim 7 against dim 4
    assert_eq!(matrix[(4, 1)], Complex64::new(28.0, 3.0));
    assert_eq!(matrix[(1, 4)], Complex64::new(28.0, -3.0));
}

#[test]
fn single_state_yields_one_by_one() {
    let states = ladder(1);
    let matrix = assemble(&states, &MassTerm, &opts(1)).expect("assembly");
    assert_eq!(matrix.shape(), (1, 1));
    assert!((matrix[(0, 0)].re - 1.0 / 6.0).abs() < 1e-15);
    assert_eq!(matrix[(0, 0)].im, 0.0);
}

#[test]
fn thread_count_does_not_change_the_result() {
    let states = ladder(5);
    let serial = assemble(&states, &MassTerm, &opts(1)).expect("serial");
    let parallel = assemble(&states, &MassTerm, &opts(4)).expect("parallel");
    assert_eq!(serial, parallel);
}

#[test]
fn failing_cell_reports_its_indices() {
    let states = ladder(4);
    let err = assemble(
        &states,
        &FailsAt {
            row_dim: 5,
            col_dim: 4,
        },
        &opts(2),
    )
    .unwrap_err();
    assert!(matches!(err, LctError::Quadrature(_)));
    assert_eq!(err.code(), "quadrature-divergence");
    let context = &err.info().context;
    assert_eq!(context.get("row").map(String::as_str), Some("2"));
    assert_eq!(context.get("col").map(String::as_str), Some("1"));
    assert_eq!(context.get("operator").map(String::as_str), Some("fails-at"));
}

#[test]
fn complex_diagonal_is_rejected() {
    let err = assemble(&ladder(2), &Complexified, &opts(1)).unwrap_err();
    assert!(matches!(err, LctError::Assembly(_)));
    assert_eq!(err.code(), "non-real-diagonal");
}

#[test]
fn empty_basis_is_rejected() {
    let err = assemble(&[], &MassTerm, &opts(1)).unwrap_err();
    assert_eq!(err.code(), "empty-basis");
}

fn arbitrary_state() -> impl Strategy<Value = BasisState> {
    prop::collection::btree_map((1u32..5, 1u32..5), (-3.0f64..3.0, -3.0f64..3.0), 1..4).prop_map(
        |terms| {
            let terms = terms
                .into_iter()
                .map(|((k1, k2), (re, im))| (Monomial::new(k1, k2), Complex64::new(re, im)))
                .collect();
            BasisState::new(terms).expect("distinct monomials")
        },
    )
}

proptest! {
    #[test]
    fn mass_matrix_is_hermitian_with_positive_diagonal(
        states in prop::collection::vec(arbitrary_state(), 1..5)
    ) {
        let matrix = assemble(&states, &MassTerm, &opts(2)).expect("assembly");
        prop_assert_eq!(hermiticity_defect(&matrix), 0.0);
        for i in 0..states.len() {
            prop_assert_eq!(matrix[(i, i)].im, 0.0);
            prop_assert!(matrix[(i, i)].re > 0.0);
        }
    }
}
