use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use lct_basis::DirichletBasis;
use lct_matrix::{generate_to_dir, RunConfig};
use tracing::info;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Scaling-dimension cutoff; overrides the configuration file.
    pub del_max: Option<f64>,
    /// YAML run configuration.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Output directory for the record.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Worker threads (0 lets rayon decide).
    #[arg(long)]
    pub threads: Option<usize>,
    /// Half-width of the strip excised around the t-channel singularity.
    #[arg(long)]
    pub epsilon: Option<f64>,
    /// Absolute and relative quadrature tolerance.
    #[arg(long)]
    pub tolerance: Option<f64>,
    /// Subdivision budget of each quadrature.
    #[arg(long)]
    pub max_subdivisions: Option<usize>,
    /// Wall-clock budget of each quadrature, in milliseconds.
    #[arg(long)]
    pub timeout_ms: Option<u64>,
    /// Retry non-converging integrals once with tolerances scaled by this factor.
    #[arg(long)]
    pub relaxed_retry: Option<f64>,
    /// Also write the record as canonical JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &GenerateArgs) -> Result<(), Box<dyn Error>> {
    let config = resolve_config(args)?;
    info!(del_max = config.del_max, out = %config.out_dir.display(), "starting truncation run");
    let written = generate_to_dir(&DirichletBasis::new(), &config)?;
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}

pub(crate) fn resolve_config(args: &GenerateArgs) -> Result<RunConfig, Box<dyn Error>> {
    let mut config = match (&args.config, args.del_max) {
        (Some(path), _) => RunConfig::load(path)?,
        (None, Some(del_max)) => RunConfig::new(del_max),
        (None, None) => return Err("a cutoff or --config is required".into()),
    };
    if let Some(del_max) = args.del_max {
        config.del_max = del_max;
    }
    if let Some(out) = &args.out {
        config.out_dir = out.clone();
    }
    if let Some(threads) = args.threads {
        config.assembly.threads = threads;
    }
    let quadrature = &mut config.assembly.quadrature;
    if let Some(epsilon) = args.epsilon {
        quadrature.epsilon = epsilon;
    }
    if let Some(tolerance) = args.tolerance {
        quadrature.abs_tol = tolerance;
        quadrature.rel_tol = tolerance;
    }
    if let Some(max_subdivisions) = args.max_subdivisions {
        quadrature.max_subdivisions = max_subdivisions;
    }
    if args.timeout_ms.is_some() {
        quadrature.timeout_ms = args.timeout_ms;
    }
    if args.relaxed_retry.is_some() {
        quadrature.relaxed_retry_factor = args.relaxed_retry;
    }
    config.write_json |= args.json;
    Ok(config)
}
