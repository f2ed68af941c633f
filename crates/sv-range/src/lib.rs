//! npm-style version range matching.
//!
//! A range string is a space-separated conjunction of comparators
//! (`>=1.2.0 <2.0.0`), where each comparator is either an explicit
//! inequality or a shorthand (`^1.2.3`, `~1.2`, `1.2.x`, `1.2.3 - 1.4`)
//! that normalizes into one or two inequalities. [`Comparator::parse`]
//! turns one such string into a chain, [`Comparator::satisfied_by`]
//! matches a concrete [`Version`] against it, and `Display` renders the
//! normalized form back out.
//!
//! `||`-separated alternatives are out of scope here: callers split on the
//! OR separator and invoke this crate once per branch.

pub mod comparator;
pub mod partial;

pub use comparator::{Comparator, ComparisonOperator, RangeError};
pub use partial::{Component, Partial};
pub use sv_version::{Identifier, Version, VersionError};

/// Upper bound on the byte length of a single range string. Longer inputs
/// are rejected before parsing; this also bounds recursion depth for
/// parsing, matching and rendering, since every extra comparator in a
/// chain costs at least one byte of input.
pub const MAX_RANGE_LEN: usize = 256;

/// Parses `range` and matches `version` against it. A malformed range is
/// reported as a non-match rather than an error; use [`Comparator::parse`]
/// directly when the distinction matters.
pub fn matches_range(version: &Version, range: &str) -> bool {
    Comparator::parse(range)
        .map(|chain| chain.satisfied_by(version))
        .unwrap_or(false)
}
