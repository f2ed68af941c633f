use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use miette::Result;
use tracing_subscriber::EnvFilter;

pub mod commands;

use commands::compare::compare_versions;
use commands::matches::{OutputFormat, match_versions};
use commands::validate::validate_range;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Print the versions that satisfy a range")]
    Match {
        /// Range to match against, e.g. ">=1.2.0 <2.0.0" or "^1.2.3"
        range: String,

        /// Versions to test
        #[arg(required = true)]
        versions: Vec<String>,

        /// Output format for the matching versions
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    #[command(about = "Parse a range and print its normalized form")]
    Validate {
        /// Range to validate
        range: String,
    },

    #[command(about = "Compare two versions by precedence")]
    Compare {
        left: String,
        right: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(cli.verbosity.tracing_level_filter().into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Match {
            range,
            versions,
            format,
        } => {
            let any_matched = match_versions(&range, &versions, format)?;
            if !any_matched {
                std::process::exit(1);
            }
        }
        Commands::Validate { range } => validate_range(&range)?,
        Commands::Compare { left, right } => compare_versions(&left, &right)?,
    }

    Ok(())
}
