#![deny(missing_docs)]
#![doc = "Parallel assembly of the Hermitian mass and interaction matrices of a lightcone truncation, and persistence of the resulting records."]

/// Hermitian matrix assembly over a basis.
pub mod assemble;
/// Assembly and run configuration.
pub mod config;
/// Stable content hashes.
pub mod hash;
/// Persisted truncation records.
pub mod record;
/// End-to-end generation entry points.
pub mod run;
/// Canonical JSON, bincode and YAML helpers.
pub mod serde;

pub use assemble::{
    assemble, build_matrices, from_rows, hermiticity_defect, to_rows, triangular_pairs,
    TruncationMatrices,
};
pub use config::{AssemblyOpts, RunConfig};
pub use hash::stable_hash_string;
pub use record::TruncationRecord;
pub use run::{generate, generate_to_dir};
