use std::collections::BTreeSet;

use lct_core::errors::{ErrorInfo, LctError};
use num_complex::Complex64;

use crate::monomial::Monomial;

fn state_error(code: &str, message: impl Into<String>) -> LctError {
    LctError::Basis(ErrorInfo::new(code, message.into()))
}

/// One primary operator of the truncated basis, expanded in monomials.
///
/// Coefficients are fixed at construction and never mutated afterwards; the
/// matrix-element code only borrows states for the duration of a build.
#[derive(Debug, Clone, PartialEq)]
pub struct BasisState {
    dimension: i64,
    terms: Vec<(Monomial, Complex64)>,
}

impl BasisState {
    /// Builds a state from its ordered monomial expansion.
    ///
    /// The expansion must be non-empty, contain each monomial at most once
    /// and carry finite coefficients. The state dimension is the largest
    /// monomial dimension in the expansion.
    pub fn new(terms: Vec<(Monomial, Complex64)>) -> Result<Self, LctError> {
        if terms.is_empty() {
            return Err(state_error(
                "empty-state",
                "basis state must contain at least one monomial",
            ));
        }
        let mut seen = BTreeSet::new();
        for (monomial, coeff) in &terms {
            if !seen.insert(*monomial) {
                return Err(state_error("duplicate-monomial", "monomial listed twice")
                    .with_context("monomial", monomial.to_string()));
            }
            if !coeff.re.is_finite() || !coeff.im.is_finite() {
                return Err(state_error("non-finite-coefficient", "coefficient is not finite")
                    .with_context("monomial", monomial.to_string()));
            }
        }
        let dimension = terms
            .iter()
            .map(|(monomial, _)| monomial.conf_dim())
            .max()
            .unwrap_or_default();
        Ok(Self { dimension, terms })
    }

    /// Convenience constructor for a state made of a single monomial.
    pub fn single(monomial: Monomial, coeff: Complex64) -> Result<Self, LctError> {
        Self::new(vec![(monomial, coeff)])
    }

    /// Scaling dimension of the state.
    pub fn dimension(&self) -> i64 {
        self.dimension
    }

    /// Ordered `(monomial, coefficient)` pairs.
    pub fn terms(&self) -> &[(Monomial, Complex64)] {
        &self.terms
    }

    /// Iterates over the monomials in expansion order.
    pub fn monomials(&self) -> impl Iterator<Item = &Monomial> + '_ {
        self.terms.iter().map(|(monomial, _)| monomial)
    }

    /// Looks up the coefficient of a monomial.
    pub fn coefficient(&self, monomial: &Monomial) -> Option<Complex64> {
        self.terms
            .iter()
            .find(|(candidate, _)| candidate == monomial)
            .map(|(_, coeff)| *coeff)
    }

    /// Number of monomials in the expansion.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Always false for a constructed state; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
