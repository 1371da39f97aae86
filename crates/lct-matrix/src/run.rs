use std::fs;
use std::path::PathBuf;

use lct_basis::BasisProvider;
use lct_core::errors::{ErrorInfo, LctError};
use tracing::info;

use crate::assemble::build_matrices;
use crate::config::{AssemblyOpts, RunConfig};
use crate::record::TruncationRecord;

/// Generates the basis for `del_max` and assembles both matrices over it.
///
/// Provider failures are propagated unchanged.
pub fn generate<P>(provider: &P, del_max: f64, opts: &AssemblyOpts) -> Result<TruncationRecord, LctError>
where
    P: BasisProvider + ?Sized,
{
    opts.validate()?;
    info!(provider = provider.name(), del_max, "generating primary basis");
    let basis = provider.generate(del_max)?;
    info!(states = basis.len(), "basis ready");
    let matrices = build_matrices(&basis, opts)?;
    TruncationRecord::new(&basis, &matrices, &opts.quadrature, provider.name())
}

/// Runs [`generate`] for a configuration and persists the record.
///
/// Returns the paths written, binary record first.
pub fn generate_to_dir<P>(provider: &P, config: &RunConfig) -> Result<Vec<PathBuf>, LctError>
where
    P: BasisProvider + ?Sized,
{
    fs::create_dir_all(&config.out_dir).map_err(|err| {
        LctError::Serde(
            ErrorInfo::new("record-out-dir", err.to_string())
                .with_context("path", config.out_dir.display().to_string()),
        )
    })?;
    let record = generate(provider, config.del_max, &config.assembly)?;
    let mut written = vec![record.write(&config.out_dir)?];
    if config.write_json {
        written.push(record.write_json(&config.out_dir)?);
    }
    info!(files = ?written, "truncation record written");
    Ok(written)
}
