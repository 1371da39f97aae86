use lct_basis::{BasisState, Monomial};
use lct_core::errors::LctError;
use num_complex::Complex64;

use crate::factorial::factorial;

/// Exact integer power of the imaginary unit, `i^n`, for any sign of `n`.
pub fn i_pow(n: i64) -> Complex64 {
    match n.rem_euclid(4) {
        0 => Complex64::new(1.0, 0.0),
        1 => Complex64::new(0.0, 1.0),
        2 => Complex64::new(-1.0, 0.0),
        _ => Complex64::new(0.0, -1.0),
    }
}

/// Bilinear sum over the monomial expansions of two states.
///
/// Accumulates `c1(m1) · conj(c2(m2)) · i^(dim m1 - dim m2) · w(m1, m2)` over
/// every monomial pair, outer loop over `o2`. A failing weight aborts the
/// sum and names both monomials in the error context.
pub fn bilinear_sum<W>(o1: &BasisState, o2: &BasisState, weight: W) -> Result<Complex64, LctError>
where
    W: Fn(&Monomial, &Monomial) -> Result<f64, LctError>,
{
    let mut total = Complex64::new(0.0, 0.0);
    for (m2, c2) in o2.terms() {
        for (m1, c1) in o1.terms() {
            let w = weight(m1, m2).map_err(|err| {
                err.with_context("m1", m1.to_string())
                    .with_context("m2", m2.to_string())
            })?;
            total += c1 * c2.conj() * i_pow(m1.conf_dim() - m2.conf_dim()) * w;
        }
    }
    Ok(total)
}

/// Closed-form mass weight for one monomial pair.
///
/// `[(a+c-1)!(b+d)! + (a+c)!(b+d-1)!] / (dim1 + dim2 - 2)!` with
/// `(a, b) = m1` and `(c, d) = m2`. Both pairs of exponents must not vanish
/// together, otherwise a negative factorial argument is reported.
pub fn mass_weight(m1: &Monomial, m2: &Monomial) -> Result<f64, LctError> {
    let k1 = m1.k1() as i64 + m2.k1() as i64;
    let k2 = m1.k2() as i64 + m2.k2() as i64;
    let slot = |label: &'static str| move |err: LctError| err.with_context("slot", label);
    let first = factorial(k1 - 1).map_err(slot("k1"))? * factorial(k2)?;
    let second = factorial(k1)? * factorial(k2 - 1).map_err(slot("k2"))?;
    Ok((first + second) / factorial(m1.conf_dim() + m2.conf_dim() - 2)?)
}

/// Closed-form s-channel weight for one monomial pair.
///
/// Product of the two endpoint overlaps `k1! k2! / (k1 + k2 + 1)!`; always
/// well defined for non-negative exponents.
pub fn s_channel_weight(m1: &Monomial, m2: &Monomial) -> Result<f64, LctError> {
    Ok(overlap(m1)? * overlap(m2)?)
}

fn overlap(m: &Monomial) -> Result<f64, LctError> {
    let (k1, k2) = (m.k1() as i64, m.k2() as i64);
    Ok(factorial(k1)? * factorial(k2)? / factorial(k1 + k2 + 1)?)
}

/// Mass contraction `Σ c1 conj(c2) i^(Δ1-Δ2) mass_weight(m1, m2)`.
pub fn mass_contraction(o1: &BasisState, o2: &BasisState) -> Result<Complex64, LctError> {
    bilinear_sum(o1, o2, mass_weight)
}

/// s-channel contraction `Σ c1 conj(c2) i^(Δ1-Δ2) s_channel_weight(m1, m2)`.
pub fn s_channel_contraction(o1: &BasisState, o2: &BasisState) -> Result<Complex64, LctError> {
    bilinear_sum(o1, o2, s_channel_weight)
}
