#![deny(missing_docs)]
#![doc = "Matrix elements of the mass and interaction operators between lightcone primary states: closed-form monomial contractions and the regularised t-channel quadrature."]

/// Closed-form bilinear contractions over monomial expansions.
pub mod algebra;
/// Mass and interaction matrix element functions.
pub mod elements;
/// Factorials with explicit domain errors.
pub mod factorial;
/// Regularised t-channel double integral.
pub mod gross;
/// Adaptive Gauss–Kronrod quadrature.
pub mod quadrature;

pub use algebra::{i_pow, mass_contraction, s_channel_contraction};
pub use elements::{
    interaction_term, mass_term, s_channel, t_channel, InteractionTerm, MassTerm, MatrixElement,
};
pub use factorial::factorial;
pub use gross::{gross_integral, GrossEvaluator, QuadratureOpts};
pub use quadrature::{integrate, Estimate, QuadratureLimits};
