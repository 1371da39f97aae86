use std::sync::OnceLock;

use lct_core::errors::{ErrorInfo, LctError};

/// Largest argument whose factorial is finite in `f64`.
pub const MAX_FACTORIAL_ARGUMENT: i64 = 170;

fn factorial_error(code: &str, message: impl Into<String>, n: i64) -> LctError {
    LctError::Factorial(ErrorInfo::new(code, message.into()).with_context("argument", n.to_string()))
}

fn table() -> &'static [f64] {
    static TABLE: OnceLock<Vec<f64>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut values = Vec::with_capacity(MAX_FACTORIAL_ARGUMENT as usize + 1);
        let mut acc = 1.0f64;
        values.push(acc);
        for n in 1..=MAX_FACTORIAL_ARGUMENT {
            acc *= n as f64;
            values.push(acc);
        }
        values
    })
}

/// Factorial of a non-negative integer as an `f64`.
///
/// Exact up to `22!`; beyond that each entry is the correctly rounded
/// product of the previous entry and `n`. Negative arguments are an error,
/// never a silent default.
pub fn factorial(n: i64) -> Result<f64, LctError> {
    if n < 0 {
        return Err(factorial_error(
            "negative-factorial-argument",
            "factorial of a negative integer is undefined",
            n,
        ));
    }
    if n > MAX_FACTORIAL_ARGUMENT {
        return Err(factorial_error(
            "factorial-overflow",
            "factorial does not fit in an f64",
            n,
        ));
    }
    Ok(table()[n as usize])
}
