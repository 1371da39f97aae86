use lct_basis::BasisState;
use lct_core::errors::LctError;
use num_complex::Complex64;

use crate::algebra::{bilinear_sum, mass_contraction, s_channel_contraction};
use crate::gross::{GrossEvaluator, QuadratureOpts};

/// A physical operator whose matrix elements between basis states can be
/// evaluated independently, pair by pair.
pub trait MatrixElement: Sync {
    /// Short label used in logs and error context.
    fn label(&self) -> &'static str;

    /// Matrix element `<o1| op |o2>`.
    fn evaluate(&self, o1: &BasisState, o2: &BasisState) -> Result<Complex64, LctError>;
}

/// Mass² matrix element.
pub fn mass_term(o1: &BasisState, o2: &BasisState) -> Result<Complex64, LctError> {
    mass_contraction(o1, o2)
}

/// s-channel (annihilation) part of the interaction.
pub fn s_channel(o1: &BasisState, o2: &BasisState) -> Result<Complex64, LctError> {
    s_channel_contraction(o1, o2)
}

/// t-channel (exchange) part of the interaction; one regularised double
/// integral per monomial pair.
pub fn t_channel(
    o1: &BasisState,
    o2: &BasisState,
    gross: &GrossEvaluator,
) -> Result<Complex64, LctError> {
    bilinear_sum(o1, o2, |m1, m2| {
        gross.evaluate([m1.k1(), m1.k2(), m2.k1(), m2.k2()])
    })
}

/// Full interaction matrix element, `s - t/2`.
pub fn interaction_term(
    o1: &BasisState,
    o2: &BasisState,
    gross: &GrossEvaluator,
) -> Result<Complex64, LctError> {
    Ok(s_channel(o1, o2)? - 0.5 * t_channel(o1, o2, gross)?)
}

/// [`mass_term`] as a [`MatrixElement`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MassTerm;

impl MatrixElement for MassTerm {
    fn label(&self) -> &'static str {
        "mass"
    }

    fn evaluate(&self, o1: &BasisState, o2: &BasisState) -> Result<Complex64, LctError> {
        mass_term(o1, o2)
    }
}

/// [`interaction_term`] as a [`MatrixElement`], owning its t-channel cache.
#[derive(Debug)]
pub struct InteractionTerm {
    gross: GrossEvaluator,
}

impl InteractionTerm {
    /// Creates the operator with validated quadrature options.
    pub fn new(opts: QuadratureOpts) -> Result<Self, LctError> {
        Ok(Self {
            gross: GrossEvaluator::new(opts)?,
        })
    }

    /// The underlying t-channel evaluator.
    pub fn gross(&self) -> &GrossEvaluator {
        &self.gross
    }
}

impl MatrixElement for InteractionTerm {
    fn label(&self) -> &'static str {
        "inter"
    }

    fn evaluate(&self, o1: &BasisState, o2: &BasisState) -> Result<Complex64, LctError> {
        interaction_term(o1, o2, &self.gross)
    }
}
