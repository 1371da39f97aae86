use std::fmt;

use serde::{Deserialize, Serialize};

/// Derivative monomial `∂^{k1} ψ† ∂^{k2} ψ` used as a key into a basis state.
///
/// Identity is structural on `(k1, k2)`. The conformal dimension is derived:
/// each fermion carries dimension one half and every derivative adds one, so
/// `dim = k1 + k2 + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Monomial {
    k1: u32,
    k2: u32,
}

impl Monomial {
    /// Creates a monomial from its two derivative exponents.
    pub const fn new(k1: u32, k2: u32) -> Self {
        Self { k1, k2 }
    }

    /// Number of derivatives acting on the first field.
    pub const fn k1(&self) -> u32 {
        self.k1
    }

    /// Number of derivatives acting on the second field.
    pub const fn k2(&self) -> u32 {
        self.k2
    }

    /// Conformal dimension of the monomial.
    pub const fn conf_dim(&self) -> i64 {
        self.k1 as i64 + self.k2 as i64 + 1
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.k1, self.k2)
    }
}
