use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    #[error("Malformed version string {version}")]
    MalformedVersion { version: String },
    #[error("Trailing characters in version string {version}")]
    TrailingCharacters { version: String },
    #[error("Empty identifier at offset {offset}")]
    EmptyIdentifier { offset: usize },
    #[error("Numeric value too large at offset {offset}")]
    NumberOverflow { offset: usize },
}

/// One dot-separated prerelease identifier.
///
/// Identifiers made purely of ASCII digits compare numerically, everything
/// else compares as an ASCII string. The derived ordering puts every
/// `Numeric` below every `AlphaNumeric`, which is exactly the precedence
/// rule for prerelease identifiers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Identifier {
    Numeric(u64),
    AlphaNumeric(String),
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Identifier::Numeric(n) => write!(f, "{n}"),
            Identifier::AlphaNumeric(s) => write!(f, "{s}"),
        }
    }
}

/// A concrete semantic version: `major.minor.patch` with optional
/// prerelease and build identifier runs.
///
/// Comparison, equality and hashing all follow precedence rules: build
/// metadata is ignored, a release sorts above any of its prereleases, and
/// prerelease identifiers compare pairwise with the shorter run losing a
/// tie. Wildcards never appear here; during range parsing they live in
/// `Partial` on the range side.
#[derive(Debug, Clone)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Vec<Identifier>,
    pub build: Vec<String>,
}

fn is_identifier_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'-'
}

/// Reads a run of ASCII digits starting at `pos`, advancing `pos` past
/// them. Returns `Ok(None)` without moving when no digit is present.
pub fn read_number(input: &str, pos: &mut usize) -> Result<Option<u64>, VersionError> {
    let bytes = input.as_bytes();
    let start = *pos;
    let mut value: u64 = 0;
    while let Some(byte) = bytes.get(*pos).copied() {
        if !byte.is_ascii_digit() {
            break;
        }
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(u64::from(byte - b'0')))
            .ok_or(VersionError::NumberOverflow { offset: start })?;
        *pos += 1;
    }
    if *pos == start {
        return Ok(None);
    }
    Ok(Some(value))
}

fn read_one_identifier<'a>(input: &'a str, pos: &mut usize) -> Result<&'a str, VersionError> {
    let bytes = input.as_bytes();
    let start = *pos;
    while bytes.get(*pos).copied().is_some_and(is_identifier_char) {
        *pos += 1;
    }
    if *pos == start {
        return Err(VersionError::EmptyIdentifier { offset: start });
    }
    Ok(&input[start..*pos])
}

fn read_identifier_run<'a>(input: &'a str, pos: &mut usize) -> Result<Vec<&'a str>, VersionError> {
    let mut identifiers = vec![read_one_identifier(input, pos)?];
    while input.as_bytes().get(*pos) == Some(&b'.') {
        *pos += 1;
        identifiers.push(read_one_identifier(input, pos)?);
    }
    Ok(identifiers)
}

/// Reads a dot-separated prerelease identifier run starting at `pos`.
/// All-digit identifiers become [`Identifier::Numeric`].
pub fn read_prerelease(input: &str, pos: &mut usize) -> Result<Vec<Identifier>, VersionError> {
    let start = *pos;
    read_identifier_run(input, pos)?
        .into_iter()
        .map(|identifier| {
            if identifier.bytes().all(|b| b.is_ascii_digit()) {
                let value = identifier
                    .parse::<u64>()
                    .map_err(|_| VersionError::NumberOverflow { offset: start })?;
                Ok(Identifier::Numeric(value))
            } else {
                Ok(Identifier::AlphaNumeric(identifier.to_string()))
            }
        })
        .collect()
}

/// Reads a dot-separated build identifier run starting at `pos`. Build
/// identifiers carry no precedence, so they are kept verbatim.
pub fn read_build(input: &str, pos: &mut usize) -> Result<Vec<String>, VersionError> {
    Ok(read_identifier_run(input, pos)?
        .into_iter()
        .map(str::to_string)
        .collect())
}

impl Version {
    pub fn new(version: impl AsRef<str>) -> Result<Self, VersionError> {
        let input = version.as_ref().trim();
        let mut pos = 0;
        let parsed = Self::read(input, &mut pos)?;
        if pos < input.len() {
            return Err(VersionError::TrailingCharacters {
                version: input.to_string(),
            });
        }
        Ok(parsed)
    }

    /// Reads one full version starting at `pos`, advancing `pos` past it.
    /// All three numeric components are required.
    pub fn read(input: &str, pos: &mut usize) -> Result<Self, VersionError> {
        let bytes = input.as_bytes();
        let malformed = || VersionError::MalformedVersion {
            version: input.to_string(),
        };

        let major = read_number(input, pos)?.ok_or_else(malformed)?;
        if bytes.get(*pos) != Some(&b'.') {
            return Err(malformed());
        }
        *pos += 1;
        let minor = read_number(input, pos)?.ok_or_else(malformed)?;
        if bytes.get(*pos) != Some(&b'.') {
            return Err(malformed());
        }
        *pos += 1;
        let patch = read_number(input, pos)?.ok_or_else(malformed)?;

        let mut prerelease = Vec::new();
        if bytes.get(*pos) == Some(&b'-') {
            *pos += 1;
            prerelease = read_prerelease(input, pos)?;
        }
        let mut build = Vec::new();
        if bytes.get(*pos) == Some(&b'+') {
            *pos += 1;
            build = read_build(input, pos)?;
        }

        Ok(Version {
            major,
            minor,
            patch,
            prerelease,
            build,
        })
    }

    pub fn is_prerelease(&self) -> bool {
        !self.prerelease.is_empty()
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl std::hash::Hash for Version {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.major.hash(state);
        self.minor.hash(state);
        self.patch.hash(state);
        self.prerelease.hash(state);
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then_with(|| self.minor.cmp(&other.minor))
            .then_with(|| self.patch.cmp(&other.patch))
            .then_with(
                || match (self.prerelease.is_empty(), other.prerelease.is_empty()) {
                    (true, true) => Ordering::Equal,
                    (true, false) => Ordering::Greater,
                    (false, true) => Ordering::Less,
                    (false, false) => self.prerelease.cmp(&other.prerelease),
                },
            )
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        for (index, identifier) in self.prerelease.iter().enumerate() {
            f.write_str(if index == 0 { "-" } else { "." })?;
            write!(f, "{identifier}")?;
        }
        for (index, identifier) in self.build.iter().enumerate() {
            f.write_str(if index == 0 { "+" } else { "." })?;
            f.write_str(identifier)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, VersionError> {
        Version::new(s)
    }
}

impl serde::Serialize for Version {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Version {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Version::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[track_caller]
    fn v(version: &str) -> Version {
        Version::new(version).unwrap()
    }

    #[test]
    fn test_version_creation() {
        let version = v("1.2.3");
        assert_eq!(version.major, 1);
        assert_eq!(version.minor, 2);
        assert_eq!(version.patch, 3);
        assert!(version.prerelease.is_empty());
        assert!(version.build.is_empty());
    }

    #[test]
    fn test_prerelease_and_build_parsing() {
        let version = v("1.2.3-alpha.1+build.42");
        assert_eq!(
            version.prerelease,
            vec![
                Identifier::AlphaNumeric("alpha".to_string()),
                Identifier::Numeric(1),
            ]
        );
        assert_eq!(version.build, vec!["build".to_string(), "42".to_string()]);
    }

    #[test]
    fn test_hyphen_inside_identifier() {
        let version = v("1.0.0-beta-2");
        assert_eq!(
            version.prerelease,
            vec![Identifier::AlphaNumeric("beta-2".to_string())]
        );
    }

    #[test]
    fn test_whitespace_handling() {
        assert_eq!(v(" 1.2.3 "), v("1.2.3"));
        assert_eq!(v("1.2.3\n"), v("1.2.3"));
    }

    #[test]
    fn test_invalid_versions() {
        assert!(Version::new("").is_err());
        assert!(Version::new("1").is_err());
        assert!(Version::new("1.2").is_err());
        assert!(Version::new("1.2.").is_err());
        assert!(Version::new("1.2.3.4").is_err());
        assert!(Version::new("1.2.3-").is_err());
        assert!(Version::new("1.2.3-alpha..1").is_err());
        assert!(Version::new("1.2.3+").is_err());
        assert!(Version::new("junk").is_err());
        assert!(Version::new("1.2.3 4.5.6").is_err());
    }

    #[test]
    fn test_numeric_overflow() {
        assert_eq!(
            Version::new("99999999999999999999999.0.0"),
            Err(VersionError::NumberOverflow { offset: 0 })
        );
        assert!(Version::new("1.0.0-99999999999999999999999").is_err());
    }

    #[test]
    fn test_version_ordering() {
        assert!(v("1.8.2") > v("0.0.0"));
        assert!(v("1.2.3") < v("1.2.4"));
        assert!(v("1.2.3") < v("1.3.0"));
        assert!(v("1.2.3") < v("2.0.0"));
    }

    #[test]
    fn test_prerelease_ordering() {
        assert!(v("1.0.0-alpha") < v("1.0.0"));
        assert!(v("1.0.0-alpha") < v("1.0.0-alpha.1"));
        assert!(v("1.0.0-alpha.1") < v("1.0.0-alpha.beta"));
        assert!(v("1.0.0-alpha.beta") < v("1.0.0-beta"));
        assert!(v("1.0.0-beta") < v("1.0.0-beta.2"));
        assert!(v("1.0.0-beta.2") < v("1.0.0-beta.11"));
        assert!(v("1.0.0-beta.11") < v("1.0.0-rc.1"));
        assert!(v("1.0.0-rc.1") < v("1.0.0"));
    }

    #[test]
    fn test_build_metadata_ignored() {
        assert_eq!(v("1.2.3+build.1"), v("1.2.3+build.2"));
        assert_eq!(v("1.2.3+build"), v("1.2.3"));
        assert_eq!(
            v("1.2.3+alpha").cmp(&v("1.2.3+beta")),
            std::cmp::Ordering::Equal
        );
    }

    #[test]
    fn test_display_round_trip() {
        for text in ["1.2.3", "0.0.0", "1.2.3-alpha.1", "1.2.3-rc.1+build.5"] {
            assert_eq!(v(text).to_string(), text);
        }
    }

    #[test]
    fn test_is_prerelease() {
        assert!(v("1.0.0-alpha").is_prerelease());
        assert!(!v("1.0.0").is_prerelease());
        assert!(!v("1.0.0+build").is_prerelease());
    }

    #[test]
    fn test_read_number() {
        let mut pos = 0;
        assert_eq!(read_number("123abc", &mut pos), Ok(Some(123)));
        assert_eq!(pos, 3);
        assert_eq!(read_number("123abc", &mut pos), Ok(None));
        assert_eq!(pos, 3);
    }

    #[test]
    fn test_read_prerelease_stops_at_space() {
        let input = "alpha.1 2.0.0";
        let mut pos = 0;
        let identifiers = read_prerelease(input, &mut pos).unwrap();
        assert_eq!(identifiers.len(), 2);
        assert_eq!(&input[pos..], " 2.0.0");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn display_then_parse_round_trips(
                major in 0u64..=100_000,
                minor in 0u64..=100_000,
                patch in 0u64..=100_000,
                prerelease in prop::collection::vec("[a-z][a-z0-9]{0,3}", 0..3),
                build in prop::collection::vec("[0-9a-z]{1,4}", 0..3),
            ) {
                let version = Version {
                    major,
                    minor,
                    patch,
                    prerelease: prerelease
                        .into_iter()
                        .map(Identifier::AlphaNumeric)
                        .collect(),
                    build,
                };
                let reparsed = Version::new(version.to_string()).unwrap();
                prop_assert_eq!(reparsed.to_string(), version.to_string());
            }

            #[test]
            fn ordering_is_antisymmetric(
                left in "[0-9]{1,2}\\.[0-9]{1,2}\\.[0-9]{1,2}(-[a-z0-9]{1,3})?",
                right in "[0-9]{1,2}\\.[0-9]{1,2}\\.[0-9]{1,2}(-[a-z0-9]{1,3})?",
            ) {
                let left = Version::new(&left).unwrap();
                let right = Version::new(&right).unwrap();
                prop_assert_eq!(left.cmp(&right), right.cmp(&left).reverse());
            }
        }
    }
}
