use std::cmp::Ordering;
use std::str::FromStr;

use sv_version::{Version, VersionError};

use crate::MAX_RANGE_LEN;
use crate::partial::{Cursor, Partial};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("Empty range string")]
    Empty,
    #[error("Range string is {length} bytes, limit is {MAX_RANGE_LEN}")]
    TooLong { length: usize },
    #[error("Unexpected input at offset {offset}")]
    Unexpected { offset: usize },
    #[error("Version component overflow while expanding range")]
    Overflow,
    #[error(transparent)]
    Version(#[from] VersionError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Equal,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl ComparisonOperator {
    /// The textual operator prefix. Equality renders bare, so canonical
    /// output re-parses to an equivalent chain.
    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOperator::Equal => "",
            ComparisonOperator::Less => "<",
            ComparisonOperator::LessEqual => "<=",
            ComparisonOperator::Greater => ">",
            ComparisonOperator::GreaterEqual => ">=",
        }
    }

    fn matches(self, ordering: Ordering) -> bool {
        match self {
            ComparisonOperator::Equal => ordering == Ordering::Equal,
            ComparisonOperator::Less => ordering == Ordering::Less,
            ComparisonOperator::LessEqual => ordering != Ordering::Greater,
            ComparisonOperator::Greater => ordering == Ordering::Greater,
            ComparisonOperator::GreaterEqual => ordering != Ordering::Less,
        }
    }
}

/// One node of a comparator chain: an operator, its bound, and an owning
/// link to the rest of the chain. A whole chain is the logical AND of its
/// nodes; dropping the head drops every node it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparator {
    pub operator: ComparisonOperator,
    pub version: Version,
    pub next: Option<Box<Comparator>>,
}

impl Comparator {
    pub fn new(operator: ComparisonOperator, version: Version) -> Self {
        Self {
            operator,
            version,
            next: None,
        }
    }

    /// Parses one AND-chain of comparators. The whole input must be
    /// consumed; inputs longer than [`MAX_RANGE_LEN`] are rejected before
    /// their content is looked at.
    pub fn parse(range: &str) -> Result<Self, RangeError> {
        if range.len() > MAX_RANGE_LEN {
            return Err(RangeError::TooLong {
                length: range.len(),
            });
        }
        let mut cursor = Cursor::new(range);
        let chain = Self::read_chain(&mut cursor)?;
        if !cursor.is_at_end() {
            return Err(RangeError::Unexpected {
                offset: cursor.pos(),
            });
        }
        Ok(chain)
    }

    /// Reads one comparator (which may normalize into two nodes), then a
    /// single space followed by anything other than another space or the
    /// OR separator continues the conjunction.
    fn read_chain(cursor: &mut Cursor) -> Result<Self, RangeError> {
        let mut comparator = match cursor.peek() {
            Some(b'^') => {
                cursor.bump();
                Self::read_caret(cursor)?
            }
            Some(b'~') => {
                cursor.bump();
                Self::read_tilde(cursor)?
            }
            Some(b'>') => {
                cursor.bump();
                let operator = if cursor.eat(b'=') {
                    ComparisonOperator::GreaterEqual
                } else {
                    ComparisonOperator::Greater
                };
                Self::read_explicit(operator, cursor)?
            }
            Some(b'<') => {
                cursor.bump();
                let operator = if cursor.eat(b'=') {
                    ComparisonOperator::LessEqual
                } else {
                    ComparisonOperator::Less
                };
                Self::read_explicit(operator, cursor)?
            }
            Some(b'=') => {
                cursor.bump();
                Self::read_explicit(ComparisonOperator::Equal, cursor)?
            }
            _ => Self::read_bare(cursor)?,
        };

        if cursor.peek() == Some(b' ')
            && cursor
                .peek_at(1)
                .is_some_and(|byte| byte != b' ' && byte != b'|')
        {
            cursor.bump();
            let rest = Self::read_chain(cursor)?;
            comparator.tail_mut().next = Some(Box::new(rest));
        }
        Ok(comparator)
    }

    /// Explicit operator form: the operator applies to the partial's
    /// floor directly, with no bound expansion. `>1.2.x` is therefore
    /// `>1.2.0`, not "above the whole 1.2.x band".
    fn read_explicit(
        operator: ComparisonOperator,
        cursor: &mut Cursor,
    ) -> Result<Self, RangeError> {
        let partial = Partial::read(cursor)?;
        Ok(Comparator::new(operator, partial.floor()))
    }

    /// `^A`: at least the floor, below the next breaking bump. The first
    /// nonzero floor component decides what "breaking" means.
    fn read_caret(cursor: &mut Cursor) -> Result<Self, RangeError> {
        let partial = Partial::read(cursor)?;
        let floor = partial.floor();
        let mut ceiling = floor.clone();
        if ceiling.major != 0 {
            ceiling.major = bump(ceiling.major)?;
            ceiling.minor = 0;
            ceiling.patch = 0;
        } else if ceiling.minor != 0 {
            ceiling.minor = bump(ceiling.minor)?;
            ceiling.patch = 0;
        } else {
            ceiling.patch = bump(ceiling.patch)?;
        }
        Ok(Self::bounded(floor, ComparisonOperator::Less, ceiling))
    }

    /// `~A`: at least the floor, below the next minor bump; with only a
    /// major given, below the next major bump.
    fn read_tilde(cursor: &mut Cursor) -> Result<Self, RangeError> {
        let partial = Partial::read(cursor)?;
        let floor = partial.floor();
        let mut ceiling = floor.clone();
        if ceiling.minor != 0 || ceiling.patch != 0 {
            ceiling.minor = bump(ceiling.minor)?;
            ceiling.patch = 0;
        } else {
            ceiling.major = bump(ceiling.major)?;
            ceiling.minor = 0;
            ceiling.patch = 0;
        }
        Ok(Self::bounded(floor, ComparisonOperator::Less, ceiling))
    }

    /// Bare form: a fully specified version is an exact match, a partial
    /// one becomes the `[floor, next bump)` band, and a wildcard major
    /// leaves the range unconstrained above.
    fn read_bare(cursor: &mut Cursor) -> Result<Self, RangeError> {
        let partial = Partial::read(cursor)?;
        if cursor.peek() == Some(b' ')
            && cursor.peek_at(1) == Some(b'-')
            && cursor.peek_at(2) == Some(b' ')
        {
            cursor.advance(3);
            return Self::read_hyphen(partial, cursor);
        }

        if partial.major.is_wildcard() {
            return Ok(Comparator::new(ComparisonOperator::GreaterEqual, partial.floor()));
        }
        if partial.minor.is_wildcard() {
            let floor = partial.floor();
            let mut ceiling = floor.clone();
            ceiling.major = bump(ceiling.major)?;
            return Ok(Self::bounded(floor, ComparisonOperator::Less, ceiling));
        }
        if partial.patch.is_wildcard() {
            let floor = partial.floor();
            let mut ceiling = floor.clone();
            ceiling.minor = bump(ceiling.minor)?;
            return Ok(Self::bounded(floor, ComparisonOperator::Less, ceiling));
        }
        Ok(Comparator::new(ComparisonOperator::Equal, partial.floor()))
    }

    /// `A - B`: inclusive of A's floor; the upper bound is inclusive only
    /// when B is fully specified, otherwise it is the exclusive bump of
    /// B's last concrete component. An entirely wildcarded B leaves the
    /// range unconstrained above.
    fn read_hyphen(lower: Partial, cursor: &mut Cursor) -> Result<Self, RangeError> {
        let upper = Partial::read(cursor)?;
        let floor = lower.floor();

        if upper.major.is_wildcard() {
            return Ok(Comparator::new(ComparisonOperator::GreaterEqual, floor));
        }
        let mut bound = upper.floor();
        let operator = if upper.minor.is_wildcard() {
            bound.major = bump(bound.major)?;
            ComparisonOperator::Less
        } else if upper.patch.is_wildcard() {
            bound.minor = bump(bound.minor)?;
            ComparisonOperator::Less
        } else {
            ComparisonOperator::LessEqual
        };
        Ok(Self::bounded(floor, operator, bound))
    }

    fn bounded(floor: Version, operator: ComparisonOperator, ceiling: Version) -> Self {
        Self {
            operator: ComparisonOperator::GreaterEqual,
            version: floor,
            next: Some(Box::new(Comparator::new(operator, ceiling))),
        }
    }

    fn tail_mut(&mut self) -> &mut Comparator {
        match self.next {
            Some(ref mut next) => next.tail_mut(),
            None => self,
        }
    }

    /// Parses `range` as a fresh chain and appends it at the tail of this
    /// one, conjoining the constraints. Empty input is rejected, and a
    /// parse failure leaves the existing chain untouched.
    pub fn and(&mut self, range: &str) -> Result<(), RangeError> {
        if range.is_empty() {
            return Err(RangeError::Empty);
        }
        let chain = Comparator::parse(range)?;
        self.tail_mut().next = Some(Box::new(chain));
        Ok(())
    }

    /// True when `version` satisfies every node of the chain.
    pub fn satisfied_by(&self, version: &Version) -> bool {
        if !self.operator.matches(version.cmp(&self.version)) {
            return false;
        }
        match &self.next {
            Some(next) => next.satisfied_by(version),
            None => true,
        }
    }

    pub fn matches(&self, version: &Version) -> bool {
        self.satisfied_by(version)
    }
}

fn bump(value: u64) -> Result<u64, RangeError> {
    value.checked_add(1).ok_or(RangeError::Overflow)
}

impl std::fmt::Display for Comparator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.operator.symbol(), self.version)?;
        if let Some(next) = &self.next {
            write!(f, " {next}")?;
        }
        Ok(())
    }
}

impl FromStr for Comparator {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, RangeError> {
        Comparator::parse(s)
    }
}

impl serde::Serialize for Comparator {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Comparator {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Comparator::parse(&s).map_err(serde::de::Error::custom)
    }
}
