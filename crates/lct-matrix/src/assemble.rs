use std::sync::atomic::{AtomicUsize, Ordering};

use lct_basis::{BasisState, PrimaryBasis};
use lct_core::errors::{ErrorInfo, LctError};
use lct_elem::{InteractionTerm, MassTerm, MatrixElement};
use nalgebra::DMatrix;
use num_complex::Complex64;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::AssemblyOpts;

fn assembly_error(code: &str, message: impl Into<String>) -> LctError {
    LctError::Assembly(ErrorInfo::new(code, message.into()))
}

/// Lower-triangle index pairs `(i, j)` with `j <= i`, row by row.
pub fn triangular_pairs(n: usize) -> Vec<(usize, usize)> {
    (0..n).flat_map(|i| (0..=i).map(move |j| (i, j))).collect()
}

/// Shared completion counter of one assembly phase.
#[derive(Debug)]
struct Progress {
    label: &'static str,
    total: usize,
    stride: usize,
    done: AtomicUsize,
}

impl Progress {
    fn new(label: &'static str, total: usize) -> Self {
        Self {
            label,
            total,
            stride: (total / 10).max(1),
            done: AtomicUsize::new(0),
        }
    }

    fn tick(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        if done % self.stride == 0 || done == self.total {
            info!(operator = self.label, done, total = self.total, "assembly progress");
        }
    }
}

/// Assembles the Hermitian matrix `M[i][j] = <o_i| op |o_j>`.
///
/// Only the lower triangle is evaluated, in parallel; the upper triangle is
/// filled with conjugates. Diagonal elements must be real up to
/// `diagonal_tolerance` and are stored with a zero imaginary part. The
/// first failing cell aborts the assembly with its indices attached.
pub fn assemble<E>(
    states: &[BasisState],
    element: &E,
    opts: &AssemblyOpts,
) -> Result<DMatrix<Complex64>, LctError>
where
    E: MatrixElement + ?Sized,
{
    let n = states.len();
    if n == 0 {
        return Err(assembly_error("empty-basis", "cannot assemble over an empty basis")
            .with_context("operator", element.label()));
    }
    let pairs = triangular_pairs(n);
    let progress = Progress::new(element.label(), pairs.len());
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opts.threads)
        .build()
        .map_err(|err| assembly_error("thread-pool", err.to_string()))?;
    info!(operator = element.label(), states = n, pairs = pairs.len(), "assembling matrix");

    let cells: Result<Vec<(usize, usize, Complex64)>, LctError> = pool.install(|| {
        pairs
            .par_iter()
            .map(|&(i, j)| {
                let value = element.evaluate(&states[i], &states[j]).map_err(|err| {
                    err.with_context("operator", element.label())
                        .with_context("row", i.to_string())
                        .with_context("col", j.to_string())
                })?;
                debug!(operator = element.label(), i, j, re = value.re, im = value.im, "matrix element");
                progress.tick();
                Ok((i, j, value))
            })
            .collect()
    });

    let mut matrix = DMatrix::from_element(n, n, Complex64::new(0.0, 0.0));
    for (i, j, value) in cells? {
        if i == j {
            matrix[(i, i)] = real_diagonal(element.label(), i, value, opts.diagonal_tolerance)?;
        } else {
            matrix[(i, j)] = value;
            matrix[(j, i)] = value.conj();
        }
    }
    Ok(matrix)
}

fn real_diagonal(
    label: &'static str,
    index: usize,
    value: Complex64,
    tolerance: f64,
) -> Result<Complex64, LctError> {
    let bound = tolerance * value.re.abs().max(1.0);
    if value.im.abs() > bound {
        return Err(assembly_error(
            "non-real-diagonal",
            "diagonal matrix element has a significant imaginary part",
        )
        .with_context("operator", label)
        .with_context("row", index.to_string())
        .with_context("col", index.to_string())
        .with_context("re", value.re.to_string())
        .with_context("im", value.im.to_string())
        .with_context("tolerance", tolerance.to_string()));
    }
    if value.im != 0.0 && value.im.abs() > 0.5 * bound {
        warn!(operator = label, index, im = value.im, "diagonal element close to tolerance");
    }
    Ok(Complex64::new(value.re, 0.0))
}

/// Largest entry of `|M - M^†|`.
pub fn hermiticity_defect(matrix: &DMatrix<Complex64>) -> f64 {
    (matrix - matrix.adjoint())
        .iter()
        .map(|entry| entry.norm())
        .fold(0.0, f64::max)
}

/// Row-major copy of a matrix.
pub fn to_rows(matrix: &DMatrix<Complex64>) -> Vec<Vec<Complex64>> {
    matrix
        .row_iter()
        .map(|row| row.iter().copied().collect())
        .collect()
}

/// Rebuilds a square matrix from row-major rows.
pub fn from_rows(rows: &[Vec<Complex64>]) -> Result<DMatrix<Complex64>, LctError> {
    let n = rows.len();
    if let Some((idx, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != n) {
        return Err(assembly_error("non-square-matrix", "matrix rows must all have length N")
            .with_context("row", idx.to_string())
            .with_context("len", row.len().to_string())
            .with_context("expected", n.to_string()));
    }
    Ok(DMatrix::from_fn(n, n, |i, j| rows[i][j]))
}

/// Mass and interaction matrices over one basis.
#[derive(Debug, Clone, PartialEq)]
pub struct TruncationMatrices {
    /// Mass² matrix.
    pub mass: DMatrix<Complex64>,
    /// Interaction matrix, `s - t/2`.
    pub inter: DMatrix<Complex64>,
}

/// Assembles both matrices, mass first, then interaction.
pub fn build_matrices(
    basis: &PrimaryBasis,
    opts: &AssemblyOpts,
) -> Result<TruncationMatrices, LctError> {
    opts.validate()?;
    info!(states = basis.len(), "building mass matrix");
    let mass = assemble(basis.states(), &MassTerm, opts)?;
    info!(states = basis.len(), "building interaction matrix");
    let interaction = InteractionTerm::new(opts.quadrature.clone())?;
    let inter = assemble(basis.states(), &interaction, opts)?;
    info!(
        integrations = interaction.gross().integrations(),
        "interaction matrix complete"
    );
    Ok(TruncationMatrices { mass, inter })
}
