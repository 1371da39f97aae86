use lct_core::errors::{ErrorInfo, LctError};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::monomial::Monomial;
use crate::state::BasisState;

fn raw_error(code: &str, message: impl Into<String>) -> LctError {
    LctError::Basis(ErrorInfo::new(code, message.into()))
}

/// Serialized monomial entry with its complex coefficient split into parts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawMonomial {
    /// Derivatives on the first field.
    pub k1: u32,
    /// Derivatives on the second field.
    pub k2: u32,
    /// Real part of the coefficient.
    pub re: f64,
    /// Imaginary part of the coefficient.
    pub im: f64,
}

/// Serialized basis state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawState {
    /// Scaling dimension recorded by the provider.
    pub dimension: i64,
    /// Monomial expansion in provider order.
    pub monomials: Vec<RawMonomial>,
}

/// Raw basis dump that can be reloaded without regenerating the basis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBasis {
    /// Scaling-dimension cutoff the basis was generated for.
    pub del_max: f64,
    /// Ordered basis states.
    pub states: Vec<RawState>,
}

impl RawState {
    /// Captures a basis state.
    pub fn from_state(state: &BasisState) -> Self {
        let monomials = state
            .terms()
            .iter()
            .map(|(monomial, coeff)| RawMonomial {
                k1: monomial.k1(),
                k2: monomial.k2(),
                re: coeff.re,
                im: coeff.im,
            })
            .collect();
        Self {
            dimension: state.dimension(),
            monomials,
        }
    }

    /// Rebuilds the basis state, checking the recorded dimension.
    pub fn load(&self) -> Result<BasisState, LctError> {
        let terms = self
            .monomials
            .iter()
            .map(|raw| (Monomial::new(raw.k1, raw.k2), Complex64::new(raw.re, raw.im)))
            .collect();
        let state = BasisState::new(terms)?;
        if state.dimension() != self.dimension {
            return Err(raw_error(
                "dimension-mismatch",
                "recorded dimension disagrees with the monomial expansion",
            )
            .with_context("recorded", self.dimension.to_string())
            .with_context("derived", state.dimension().to_string()));
        }
        Ok(state)
    }
}

impl RawBasis {
    /// Captures an ordered list of states generated for `del_max`.
    pub fn from_states(del_max: f64, states: &[BasisState]) -> Self {
        Self {
            del_max,
            states: states.iter().map(RawState::from_state).collect(),
        }
    }

    /// Rebuilds every state in order.
    pub fn load_states(&self) -> Result<Vec<BasisState>, LctError> {
        self.states
            .iter()
            .enumerate()
            .map(|(idx, raw)| {
                raw.load()
                    .map_err(|err| err.with_context("state", idx.to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_dimension_is_rejected() {
        let raw = RawState {
            dimension: 5,
            monomials: vec![RawMonomial {
                k1: 1,
                k2: 1,
                re: 1.0,
                im: 0.0,
            }],
        };
        let err = raw.load().unwrap_err();
        assert_eq!(err.code(), "dimension-mismatch");
    }
}
