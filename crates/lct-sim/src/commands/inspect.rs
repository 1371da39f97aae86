use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use lct_matrix::TruncationRecord;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to a `.bin` or `.json` truncation record.
    pub path: PathBuf,
    /// Print the summary as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct RecordSummary {
    del_max: f64,
    states: usize,
    dimensions: Vec<i64>,
    mass_diagonal: Vec<f64>,
    inter_diagonal: Vec<f64>,
    basis_hash: String,
    mass_hash: String,
    inter_hash: String,
    epsilon: f64,
    abs_tol: f64,
    rel_tol: f64,
}

pub fn run(args: &InspectArgs) -> Result<(), Box<dyn Error>> {
    let record = TruncationRecord::read(&args.path)?;
    record.verify()?;
    let summary = summarize(&record)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }
    println!("record      {}", args.path.display());
    println!("del_max     {}", summary.del_max);
    println!("states      {}", summary.states);
    println!("epsilon     {}", summary.epsilon);
    println!("tolerance   abs {} rel {}", summary.abs_tol, summary.rel_tol);
    println!("basis hash  {}", summary.basis_hash);
    println!("mass hash   {}", summary.mass_hash);
    println!("inter hash  {}", summary.inter_hash);
    println!("{:>4} {:>4} {:>18} {:>18}", "i", "dim", "mass", "inter");
    for (idx, dim) in summary.dimensions.iter().enumerate() {
        println!(
            "{:>4} {:>4} {:>18.10e} {:>18.10e}",
            idx, dim, summary.mass_diagonal[idx], summary.inter_diagonal[idx]
        );
    }
    Ok(())
}

fn summarize(record: &TruncationRecord) -> Result<RecordSummary, Box<dyn Error>> {
    let mass = record.mass_matrix()?;
    let inter = record.inter_matrix()?;
    Ok(RecordSummary {
        del_max: record.del_max,
        states: record.dim(),
        dimensions: record.basis.states.iter().map(|state| state.dimension).collect(),
        mass_diagonal: mass.diagonal().iter().map(|entry| entry.re).collect(),
        inter_diagonal: inter.diagonal().iter().map(|entry| entry.re).collect(),
        basis_hash: record.provenance.basis_hash.clone(),
        mass_hash: record.provenance.mass_hash.clone(),
        inter_hash: record.provenance.inter_hash.clone(),
        epsilon: record.provenance.epsilon,
        abs_tol: record.provenance.abs_tol,
        rel_tol: record.provenance.rel_tol,
    })
}
