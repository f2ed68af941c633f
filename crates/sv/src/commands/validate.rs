use anstream::println;
use miette::{IntoDiagnostic, Result, WrapErr};
use owo_colors::OwoColorize;
use sv_range::Comparator;

/// Parses `range` and prints the normalized comparator chain, with every
/// shorthand expanded into its inequality bounds.
pub fn validate_range(range: &str) -> Result<()> {
    let chain: Comparator = range
        .parse()
        .into_diagnostic()
        .wrap_err_with(|| format!("Invalid range {range:?}"))?;
    println!("{}", chain.to_string().cyan());
    Ok(())
}
