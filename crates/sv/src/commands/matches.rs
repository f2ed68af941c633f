use anstream::println;
use clap::ValueEnum;
use miette::{IntoDiagnostic, Result, WrapErr};
use owo_colors::OwoColorize;
use sv_range::{Comparator, Version};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Prints the versions that satisfy `range`, in the order given. Returns
/// whether any did.
pub fn match_versions(range: &str, versions: &[String], format: OutputFormat) -> Result<bool> {
    let chain: Comparator = range
        .parse()
        .into_diagnostic()
        .wrap_err_with(|| format!("Invalid range {range:?}"))?;
    debug!("Matching against {chain}");

    let mut matched = Vec::new();
    for version in versions {
        let version: Version = version
            .parse()
            .into_diagnostic()
            .wrap_err_with(|| format!("Invalid version {version:?}"))?;
        if chain.satisfied_by(&version) {
            matched.push(version);
        }
    }

    match format {
        OutputFormat::Text => {
            for version in &matched {
                println!("{}", version.green());
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&matched).into_diagnostic()?);
        }
    }
    Ok(!matched.is_empty())
}
