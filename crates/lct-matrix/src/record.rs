use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use lct_basis::{PrimaryBasis, RawBasis};
use lct_core::errors::{ErrorInfo, LctError};
use lct_core::{RunProvenance, SchemaVersion};
use lct_elem::QuadratureOpts;
use nalgebra::DMatrix;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::assemble::{from_rows, hermiticity_defect, to_rows, TruncationMatrices};
use crate::hash::{basis_hash, matrix_hash};
use crate::serde::{
    from_bincode_slice, from_json_slice, to_bincode_bytes, to_canonical_json_bytes,
};

fn io_error(code: &str, err: impl ToString, path: &Path) -> LctError {
    LctError::Serde(
        ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
    )
}

fn record_error(code: &str, message: impl Into<String>) -> LctError {
    LctError::Assembly(ErrorInfo::new(code, message.into()))
}

/// Relative Hermiticity slack accepted when a record is re-checked.
const HERMITICITY_TOLERANCE: f64 = 1e-12;

/// Persisted output of one truncation run: the basis and both matrices.
///
/// Matrices are stored row-major, `mass[i][j] = <o_i|M²|o_j>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruncationRecord {
    /// Schema of this payload.
    pub schema_version: SchemaVersion,
    /// Hashes and options the record was produced with.
    pub provenance: RunProvenance,
    /// Scaling-dimension cutoff.
    pub del_max: f64,
    /// Basis the matrices are expressed in.
    pub basis: RawBasis,
    /// Mass² matrix.
    pub mass: Vec<Vec<Complex64>>,
    /// Interaction matrix.
    pub inter: Vec<Vec<Complex64>>,
}

impl TruncationRecord {
    /// Bundles a basis with its matrices and stamps the provenance.
    pub fn new(
        basis: &PrimaryBasis,
        matrices: &TruncationMatrices,
        quadrature: &QuadratureOpts,
        provider: &str,
    ) -> Result<Self, LctError> {
        let raw = basis.dump_raw();
        let mass = to_rows(&matrices.mass);
        let inter = to_rows(&matrices.inter);
        let mut tool_versions = BTreeMap::new();
        tool_versions.insert("lct-matrix".to_string(), env!("CARGO_PKG_VERSION").to_string());
        tool_versions.insert("basis-provider".to_string(), provider.to_string());
        let provenance = RunProvenance {
            basis_hash: basis_hash(&raw)?,
            mass_hash: matrix_hash(&mass)?,
            inter_hash: matrix_hash(&inter)?,
            epsilon: quadrature.epsilon,
            abs_tol: quadrature.abs_tol,
            rel_tol: quadrature.rel_tol,
            max_subdivisions: quadrature.max_subdivisions,
            timeout_ms: quadrature.timeout_ms,
            relaxed_retry_factor: quadrature.relaxed_retry_factor,
            tool_versions,
        };
        Ok(Self {
            schema_version: SchemaVersion::default(),
            provenance,
            del_max: basis.del_max(),
            basis: raw,
            mass,
            inter,
        })
    }

    /// File name of the binary record for a cutoff, `2DQED_trunc_D{del_max}.bin`.
    pub fn file_name(del_max: f64) -> String {
        format!("2DQED_trunc_D{del_max}.bin")
    }

    /// Number of basis states.
    pub fn dim(&self) -> usize {
        self.basis.states.len()
    }

    /// Mass matrix as a dense matrix.
    pub fn mass_matrix(&self) -> Result<DMatrix<Complex64>, LctError> {
        from_rows(&self.mass).map_err(|err| err.with_context("matrix", "mass"))
    }

    /// Interaction matrix as a dense matrix.
    pub fn inter_matrix(&self) -> Result<DMatrix<Complex64>, LctError> {
        from_rows(&self.inter).map_err(|err| err.with_context("matrix", "inter"))
    }

    /// Rebuilds the basis without regenerating it.
    pub fn load_basis(&self) -> Result<PrimaryBasis, LctError> {
        PrimaryBasis::load_raw(&self.basis)
    }

    /// Re-checks shapes, stored hashes and Hermiticity.
    pub fn verify(&self) -> Result<(), LctError> {
        let n = self.dim();
        for (label, rows, stored) in [
            ("mass", &self.mass, &self.provenance.mass_hash),
            ("inter", &self.inter, &self.provenance.inter_hash),
        ] {
            let matrix = from_rows(rows).map_err(|err| err.with_context("matrix", label))?;
            if matrix.nrows() != n {
                return Err(record_error("shape-mismatch", "matrix size differs from basis size")
                    .with_context("matrix", label)
                    .with_context("rows", matrix.nrows().to_string())
                    .with_context("states", n.to_string()));
            }
            check_hash(label, stored, &matrix_hash(rows)?)?;
            let scale = matrix.iter().map(|entry| entry.norm()).fold(1.0, f64::max);
            let defect = hermiticity_defect(&matrix);
            if defect > HERMITICITY_TOLERANCE * scale {
                return Err(record_error("non-hermitian", "stored matrix is not Hermitian")
                    .with_context("matrix", label)
                    .with_context("defect", defect.to_string()));
            }
        }
        check_hash("basis", &self.provenance.basis_hash, &basis_hash(&self.basis)?)
    }

    /// Binary encoding of the record.
    pub fn to_bytes(&self) -> Result<Vec<u8>, LctError> {
        to_bincode_bytes(self)
    }

    /// Decodes a binary record.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LctError> {
        from_bincode_slice(bytes)
    }

    /// Canonical JSON encoding of the record.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, LctError> {
        to_canonical_json_bytes(self)
    }

    /// Decodes a JSON record.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, LctError> {
        from_json_slice(bytes)
    }

    /// Writes the binary record into `dir`, returning its path.
    pub fn write(&self, dir: &Path) -> Result<PathBuf, LctError> {
        let path = dir.join(Self::file_name(self.del_max));
        write_file(&path, &self.to_bytes()?)?;
        Ok(path)
    }

    /// Writes the JSON sibling of the binary record into `dir`.
    pub fn write_json(&self, dir: &Path) -> Result<PathBuf, LctError> {
        let path = dir.join(Self::file_name(self.del_max)).with_extension("json");
        write_file(&path, &self.to_json_bytes()?)?;
        Ok(path)
    }

    /// Reads a record, choosing the decoder by file extension.
    pub fn read(path: &Path) -> Result<Self, LctError> {
        let bytes = fs::read(path).map_err(|err| io_error("record-read", err, path))?;
        let decoded = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_bytes(&bytes),
            _ => Self::from_bytes(&bytes),
        };
        decoded.map_err(|err| err.with_context("path", path.display().to_string()))
    }
}

fn check_hash(label: &str, stored: &str, actual: &str) -> Result<(), LctError> {
    if stored != actual {
        return Err(LctError::Serde(
            ErrorInfo::new("hash-mismatch", "stored hash does not match the payload")
                .with_context("payload", label)
                .with_context("stored", stored)
                .with_context("actual", actual),
        ));
    }
    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), LctError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| io_error("record-out-dir", err, parent))?;
    }
    fs::write(path, bytes).map_err(|err| io_error("record-write", err, path))
}
