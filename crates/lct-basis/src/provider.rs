use lct_core::errors::{ErrorInfo, LctError};

use crate::raw::RawBasis;
use crate::state::BasisState;

/// Source of primary-state bases for a given scaling-dimension cutoff.
///
/// Implementations own the physics of basis construction; the matrix
/// element engine only borrows the returned states.
pub trait BasisProvider: Send + Sync {
    /// Short identifier recorded in provenance.
    fn name(&self) -> &str;

    /// Generates the ordered basis for the cutoff `del_max`.
    fn generate(&self, del_max: f64) -> Result<PrimaryBasis, LctError>;
}

/// Ordered primary basis produced for one cutoff.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryBasis {
    del_max: f64,
    states: Vec<BasisState>,
}

impl PrimaryBasis {
    /// Wraps an ordered, non-empty list of states.
    pub fn new(del_max: f64, states: Vec<BasisState>) -> Result<Self, LctError> {
        if states.is_empty() {
            return Err(LctError::Basis(
                ErrorInfo::new("empty-basis", "basis contains no states")
                    .with_context("del_max", del_max.to_string())
                    .with_hint("raise the scaling-dimension cutoff"),
            ));
        }
        Ok(Self { del_max, states })
    }

    /// Rebuilds a basis from its raw dump.
    pub fn load_raw(raw: &RawBasis) -> Result<Self, LctError> {
        Self::new(raw.del_max, raw.load_states()?)
    }

    /// Dumps the basis into its raw serializable form.
    pub fn dump_raw(&self) -> RawBasis {
        RawBasis::from_states(self.del_max, &self.states)
    }

    /// Cutoff the basis was generated for.
    pub fn del_max(&self) -> f64 {
        self.del_max
    }

    /// Ordered states.
    pub fn states(&self) -> &[BasisState] {
        &self.states
    }

    /// Number of states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether the basis is empty (never true for a constructed basis).
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
