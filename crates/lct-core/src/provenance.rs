//! Provenance and schema descriptors shared across persisted artefacts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Semantic version describing the schema of serialized payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version incremented for breaking changes.
    pub major: u32,
    /// Minor version incremented for additive changes.
    pub minor: u32,
    /// Patch version incremented for bug fixes and documentation updates.
    pub patch: u32,
}

impl SchemaVersion {
    /// Creates a new schema version descriptor.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

/// Provenance information attached to every persisted truncation record.
///
/// No wall-clock timestamp is stored so that two runs over the same basis
/// produce byte-identical records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RunProvenance {
    /// Hash of the raw basis the matrices were computed in.
    pub basis_hash: String,
    /// Hash of the mass matrix payload.
    pub mass_hash: String,
    /// Hash of the interaction matrix payload.
    pub inter_hash: String,
    /// Half-width of the strip excised around the t-channel singularity.
    pub epsilon: f64,
    /// Absolute tolerance requested from the adaptive quadrature.
    pub abs_tol: f64,
    /// Relative tolerance requested from the adaptive quadrature.
    pub rel_tol: f64,
    /// Subinterval budget of every nested integration.
    #[serde(default)]
    pub max_subdivisions: usize,
    /// Wall-clock budget of one integral, in milliseconds.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Tolerance factor of the opt-in relaxed retry, when it was enabled.
    #[serde(default)]
    pub relaxed_retry_factor: Option<f64>,
    /// Version map for all tools involved in the run.
    pub tool_versions: BTreeMap<String, String>,
}
