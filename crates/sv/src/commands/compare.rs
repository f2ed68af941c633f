use std::cmp::Ordering;

use anstream::println;
use miette::{IntoDiagnostic, Result, WrapErr};
use sv_version::Version;

pub fn compare_versions(left: &str, right: &str) -> Result<()> {
    let left: Version = left
        .parse()
        .into_diagnostic()
        .wrap_err_with(|| format!("Invalid version {left:?}"))?;
    let right: Version = right
        .parse()
        .into_diagnostic()
        .wrap_err_with(|| format!("Invalid version {right:?}"))?;
    println!("{}", ordering_symbol(left.cmp(&right)));
    Ok(())
}

fn ordering_symbol(ordering: Ordering) -> &'static str {
    match ordering {
        Ordering::Less => "<",
        Ordering::Equal => "=",
        Ordering::Greater => ">",
    }
}
