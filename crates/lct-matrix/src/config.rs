use std::fs;
use std::path::{Path, PathBuf};

use lct_core::errors::{ErrorInfo, LctError};
use lct_elem::QuadratureOpts;
use serde::{Deserialize, Serialize};

use crate::serde::from_yaml_slice;

fn config_error(code: &str, message: impl Into<String>) -> LctError {
    LctError::Config(ErrorInfo::new(code, message.into()))
}

/// Options governing one matrix assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyOpts {
    /// Worker threads; zero lets rayon pick.
    #[serde(default)]
    pub threads: usize,
    /// Largest admissible `|Im|` of a diagonal element, relative to
    /// `max(1, |Re|)`.
    #[serde(default = "default_diagonal_tolerance")]
    pub diagonal_tolerance: f64,
    /// Options of the t-channel quadrature.
    #[serde(default)]
    pub quadrature: QuadratureOpts,
}

fn default_diagonal_tolerance() -> f64 {
    1e-9
}

impl Default for AssemblyOpts {
    fn default() -> Self {
        Self {
            threads: 0,
            diagonal_tolerance: default_diagonal_tolerance(),
            quadrature: QuadratureOpts::default(),
        }
    }
}

impl AssemblyOpts {
    /// Checks the assembly knobs and the nested quadrature options.
    pub fn validate(&self) -> Result<(), LctError> {
        if !(self.diagonal_tolerance >= 0.0 && self.diagonal_tolerance.is_finite()) {
            return Err(config_error(
                "invalid-diagonal-tolerance",
                "diagonal tolerance must be finite and non-negative",
            )
            .with_context("diagonal_tolerance", self.diagonal_tolerance.to_string()));
        }
        self.quadrature.validate()
    }
}

/// YAML-configurable parameters of a truncation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Scaling-dimension cutoff of the basis.
    pub del_max: f64,
    /// Directory receiving the record files.
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    /// Also write a canonical JSON sibling of the binary record.
    #[serde(default)]
    pub write_json: bool,
    /// Assembly and quadrature options.
    #[serde(default)]
    pub assembly: AssemblyOpts,
}

fn default_out_dir() -> PathBuf {
    PathBuf::from(".")
}

impl RunConfig {
    /// Configuration with default options for the given cutoff.
    pub fn new(del_max: f64) -> Self {
        Self {
            del_max,
            out_dir: default_out_dir(),
            write_json: false,
            assembly: AssemblyOpts::default(),
        }
    }

    /// Parses a YAML document.
    pub fn from_yaml_slice(data: &[u8]) -> Result<Self, LctError> {
        from_yaml_slice(data)
    }

    /// Loads a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self, LctError> {
        let bytes = fs::read(path).map_err(|err| {
            LctError::Serde(
                ErrorInfo::new("config-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        Self::from_yaml_slice(&bytes).map_err(|err| err.with_context("path", path.display().to_string()))
    }
}
