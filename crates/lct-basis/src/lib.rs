#![deny(missing_docs)]
#![doc = "Primary-state basis for two-particle lightcone conformal truncation: monomials, basis states, providers and the raw round-trip format."]

/// Dirichlet two-particle primary basis.
pub mod dirichlet;
/// Monomial descriptors keyed by derivative exponents.
pub mod monomial;
/// Basis provider contract and generated basis container.
pub mod provider;
/// Serializable raw basis representation.
pub mod raw;
/// Immutable basis states.
pub mod state;

pub use dirichlet::DirichletBasis;
pub use monomial::Monomial;
pub use provider::{BasisProvider, PrimaryBasis};
pub use raw::{RawBasis, RawMonomial, RawState};
pub use state::BasisState;
