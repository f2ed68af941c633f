use sv_version::{Identifier, Version, read_build, read_number, read_prerelease};

use crate::comparator::RangeError;

/// Byte cursor threaded through every sub-parser. Range grammar is pure
/// ASCII, so peeking and bumping by single bytes is safe.
#[derive(Debug)]
pub(crate) struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub(crate) fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    pub(crate) fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.input.as_bytes().get(self.pos + ahead).copied()
    }

    pub(crate) fn bump(&mut self) {
        self.pos += 1;
    }

    pub(crate) fn advance(&mut self, count: usize) {
        self.pos += count;
    }

    /// Consumes `byte` if it is next.
    pub(crate) fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn read_number(&mut self) -> Result<Option<u64>, RangeError> {
        Ok(read_number(self.input, &mut self.pos)?)
    }

    fn read_prerelease(&mut self) -> Result<Vec<Identifier>, RangeError> {
        Ok(read_prerelease(self.input, &mut self.pos)?)
    }

    fn read_build(&mut self) -> Result<Vec<String>, RangeError> {
        Ok(read_build(self.input, &mut self.pos)?)
    }
}

/// One position of a partial version: either a concrete number or a
/// wildcard marker (`x`, `X`, `*`, or simply absent).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Concrete(u64),
    Wildcard,
}

impl Component {
    pub fn is_wildcard(self) -> bool {
        matches!(self, Component::Wildcard)
    }
}

/// A version literal as written inside a range, where trailing components
/// may be missing or wildcarded (`1`, `1.2`, `1.2.x`, `*`). Only ever an
/// intermediate parsing value: normalization turns it into concrete
/// comparator bounds, and no wildcard survives into a parsed chain.
///
/// Wildcards only occur as a suffix run; the reader stops at the first
/// wildcard, so a concrete component can never follow one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partial {
    pub major: Component,
    pub minor: Component,
    pub patch: Component,
    pub prerelease: Vec<Identifier>,
    pub build: Vec<String>,
}

impl Partial {
    fn unspecified() -> Self {
        Partial {
            major: Component::Wildcard,
            minor: Component::Wildcard,
            patch: Component::Wildcard,
            prerelease: Vec::new(),
            build: Vec::new(),
        }
    }

    /// Reads a partial version at the cursor, stopping at the first
    /// wildcard, missing component, or end of input. A `-prerelease` or
    /// `+build` suffix is only read behind a fully concrete triple. A dot
    /// that is not followed by a component is an error; everything short
    /// of that is just an earlier stop.
    pub(crate) fn read(cursor: &mut Cursor) -> Result<Self, RangeError> {
        let mut partial = Self::unspecified();

        let Some(major) = read_component(cursor)? else {
            return Ok(partial);
        };
        partial.major = major;
        if major.is_wildcard() || !cursor.eat(b'.') {
            return Ok(partial);
        }

        partial.minor = require_component(cursor)?;
        if partial.minor.is_wildcard() || !cursor.eat(b'.') {
            return Ok(partial);
        }

        partial.patch = require_component(cursor)?;
        if partial.patch.is_wildcard() {
            return Ok(partial);
        }

        if cursor.eat(b'-') {
            partial.prerelease = cursor.read_prerelease()?;
        }
        if cursor.eat(b'+') {
            partial.build = cursor.read_build()?;
        }
        Ok(partial)
    }

    pub fn is_complete(&self) -> bool {
        !self.major.is_wildcard() && !self.minor.is_wildcard() && !self.patch.is_wildcard()
    }

    /// The concrete floor of this partial: the wildcard tail zeroed out
    /// (`1.2.x` becomes `1.2.0`, `*` becomes `0.0.0`). Prerelease and
    /// build identifiers are carried over unchanged.
    pub fn floor(&self) -> Version {
        let (major, minor, patch) = match (self.major, self.minor, self.patch) {
            (Component::Wildcard, _, _) => (0, 0, 0),
            (Component::Concrete(major), Component::Wildcard, _) => (major, 0, 0),
            (Component::Concrete(major), Component::Concrete(minor), Component::Wildcard) => {
                (major, minor, 0)
            }
            (
                Component::Concrete(major),
                Component::Concrete(minor),
                Component::Concrete(patch),
            ) => (major, minor, patch),
        };
        Version {
            major,
            minor,
            patch,
            prerelease: self.prerelease.clone(),
            build: self.build.clone(),
        }
    }
}

fn read_component(cursor: &mut Cursor) -> Result<Option<Component>, RangeError> {
    match cursor.peek() {
        Some(b'x' | b'X' | b'*') => {
            cursor.bump();
            Ok(Some(Component::Wildcard))
        }
        Some(byte) if byte.is_ascii_digit() => {
            let value = cursor.read_number()?;
            Ok(value.map(Component::Concrete))
        }
        _ => Ok(None),
    }
}

fn require_component(cursor: &mut Cursor) -> Result<Component, RangeError> {
    read_component(cursor)?.ok_or(RangeError::Unexpected { offset: cursor.pos() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[track_caller]
    fn read(input: &str) -> (Partial, usize) {
        let mut cursor = Cursor::new(input);
        let partial = Partial::read(&mut cursor).unwrap();
        (partial, cursor.pos())
    }

    #[test]
    fn test_full_version() {
        let (partial, consumed) = read("1.2.3");
        assert!(partial.is_complete());
        assert_eq!(partial.floor(), Version::new("1.2.3").unwrap());
        assert_eq!(consumed, 5);
    }

    #[test]
    fn test_missing_components_are_wildcards() {
        let (partial, _) = read("1.2");
        assert_eq!(partial.major, Component::Concrete(1));
        assert_eq!(partial.minor, Component::Concrete(2));
        assert_eq!(partial.patch, Component::Wildcard);

        let (partial, _) = read("1");
        assert_eq!(partial.minor, Component::Wildcard);

        let (partial, consumed) = read("");
        assert_eq!(partial.major, Component::Wildcard);
        assert_eq!(consumed, 0);
    }

    #[test]
    fn test_wildcard_markers() {
        for input in ["x", "X", "*"] {
            let (partial, consumed) = read(input);
            assert_eq!(partial.major, Component::Wildcard);
            assert_eq!(consumed, 1);
        }
        let (partial, _) = read("1.x");
        assert_eq!(partial.major, Component::Concrete(1));
        assert_eq!(partial.minor, Component::Wildcard);
    }

    #[test]
    fn test_reader_stops_at_wildcard() {
        // Nothing after the wildcard is consumed; the caller sees the
        // leftover and rejects it.
        let (partial, consumed) = read("1.x.3");
        assert_eq!(partial.minor, Component::Wildcard);
        assert_eq!(consumed, 3);
    }

    #[test]
    fn test_metadata_requires_complete_triple() {
        let (partial, _) = read("1.2.3-alpha.1+build");
        assert_eq!(
            partial.prerelease,
            vec![
                Identifier::AlphaNumeric("alpha".to_string()),
                Identifier::Numeric(1),
            ]
        );
        assert_eq!(partial.build, vec!["build".to_string()]);

        // A wildcard patch stops the reader before the dash.
        let (partial, consumed) = read("1.2.x-alpha");
        assert!(partial.prerelease.is_empty());
        assert_eq!(consumed, 5);
    }

    #[test]
    fn test_dot_requires_component() {
        for input in ["1.", "1.2.", "1.junk"] {
            let mut cursor = Cursor::new(input);
            assert!(Partial::read(&mut cursor).is_err(), "{input:?}");
        }
    }

    #[test]
    fn test_floor_zeroes_wildcard_tail() {
        assert_eq!(read("*").0.floor(), Version::new("0.0.0").unwrap());
        assert_eq!(read("1").0.floor(), Version::new("1.0.0").unwrap());
        assert_eq!(read("1.2").0.floor(), Version::new("1.2.0").unwrap());
        assert_eq!(read("1.2.3").0.floor(), Version::new("1.2.3").unwrap());
    }

    #[test]
    fn test_reader_stops_at_unrelated_input() {
        let (partial, consumed) = read("1.2.3 - 2");
        assert!(partial.is_complete());
        assert_eq!(consumed, 5);
    }
}
