use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    generate::{self, GenerateArgs},
    inspect::{self, InspectArgs},
};

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "lct-sim",
    about = "Lightcone conformal truncation matrices for 2D QED"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the mass and interaction matrices for a cutoff and persist them.
    Generate(GenerateArgs),
    /// Load a persisted record, verify it and print a summary.
    Inspect(InspectArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Generate(args) => generate::run(&args),
        Command::Inspect(args) => inspect::run(&args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn generate_accepts_a_positional_cutoff() {
        let cli = Cli::try_parse_from(["lct-sim", "generate", "6", "--threads", "2"]).unwrap();
        match cli.command {
            Command::Generate(args) => {
                assert_eq!(args.del_max, Some(6.0));
                assert_eq!(args.threads, Some(2));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
