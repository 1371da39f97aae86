use lct_core::errors::{ErrorInfo, LctError};
use num_complex::Complex64;
use tracing::debug;

use crate::monomial::Monomial;
use crate::provider::{BasisProvider, PrimaryBasis};
use crate::state::BasisState;

/// Dimension of the lowest Dirichlet primary, `∂ψ† ∂ψ`.
pub const LOWEST_DIMENSION: u32 = 3;

/// Largest supported primary dimension. Mass matrix elements need
/// `(2Δ - 2)!`, which must stay representable as an `f64`.
pub const MAX_DIMENSION: u32 = 83;

fn dirichlet_error(code: &str, message: impl Into<String>) -> LctError {
    LctError::Basis(ErrorInfo::new(code, message.into()))
}

/// Two-particle primaries with Dirichlet boundary behaviour.
///
/// Every monomial carries at least one derivative on each field, so the
/// lightcone wavefunctions vanish at both momentum-fraction endpoints. The
/// level-`l` primary has dimension `l + 3` and expansion
/// `Σ_k (-1)^k C(l,k) C(l+4,k+2) ∂^{k+1}ψ† ∂^{l-k+1}ψ`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirichletBasis;

impl DirichletBasis {
    /// Creates the provider.
    pub fn new() -> Self {
        Self
    }

    /// Builds the primary at level `l`.
    pub fn primary(level: u32) -> Result<BasisState, LctError> {
        let terms = (0..=level)
            .map(|k| {
                let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
                let weight = binomial(level, k) * binomial(level + 4, k + 2);
                (
                    Monomial::new(k + 1, level - k + 1),
                    Complex64::new(sign * weight as f64, 0.0),
                )
            })
            .collect();
        BasisState::new(terms)
    }
}

impl BasisProvider for DirichletBasis {
    fn name(&self) -> &str {
        "dirichlet"
    }

    fn generate(&self, del_max: f64) -> Result<PrimaryBasis, LctError> {
        if !del_max.is_finite() || del_max <= 0.0 {
            return Err(
                dirichlet_error("invalid-cutoff", "cutoff must be positive and finite")
                    .with_context("del_max", del_max.to_string()),
            );
        }
        if del_max > MAX_DIMENSION as f64 {
            return Err(
                dirichlet_error("cutoff-too-large", "cutoff exceeds supported dimension")
                    .with_context("del_max", del_max.to_string())
                    .with_context("max", MAX_DIMENSION.to_string()),
            );
        }
        let states = (0..)
            .take_while(|level| (level + LOWEST_DIMENSION) as f64 <= del_max)
            .map(Self::primary)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(del_max, states = states.len(), "generated dirichlet basis");
        PrimaryBasis::new(del_max, states)
    }
}

fn binomial(n: u32, k: u32) -> u128 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k) as u128;
    let n = n as u128;
    let mut acc: u128 = 1;
    for i in 0..k {
        acc = acc * (n - i) / (i + 1);
    }
    acc
}
