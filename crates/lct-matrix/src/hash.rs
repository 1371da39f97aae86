use lct_basis::RawBasis;
use lct_core::errors::LctError;
use num_complex::Complex64;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::serde::to_canonical_json_bytes;

/// SHA-256 of the canonical JSON encoding of `value`, as lowercase hex.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, LctError> {
    let bytes = to_canonical_json_bytes(value)?;
    let digest = Sha256::digest(&bytes);
    Ok(format!("{:x}", digest))
}

/// Hash of a raw basis dump.
pub fn basis_hash(basis: &RawBasis) -> Result<String, LctError> {
    stable_hash_string(basis)
}

/// Hash of a row-major matrix payload.
pub fn matrix_hash(rows: &[Vec<Complex64>]) -> Result<String, LctError> {
    stable_hash_string(&rows)
}
