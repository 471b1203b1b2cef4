use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::error::TranslateError;

/// Literal used for a wildcard segment in the dotted form of a path.
pub const ANY: &str = "*";

/// A single step in a [`Path`].
///
/// # Examples
/// - `address.city` → `[Name("address"), Name("city")]`
/// - `items.0.sku` → `[Name("items"), Index(0), Name("sku")]`
/// - `items.*.sku` → `[Name("items"), Any, Name("sku")]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    /// Object member name
    Name(String),

    /// Concrete array index
    Index(usize),

    /// Any index at this depth (`*`)
    Any,
}

impl Segment {
    /// True when the two segments can address the same position.
    ///
    /// A wildcard matches any index or another wildcard; it never matches a name.
    pub fn matches(&self, other: &Segment) -> bool {
        match (self, other) {
            (Segment::Any, Segment::Any | Segment::Index(_)) => true,
            (Segment::Index(_), Segment::Any) => true,
            (a, b) => a == b,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Name(name) => f.write_str(name),
            Segment::Index(i) => write!(f, "{}", i),
            Segment::Any => f.write_str(ANY),
        }
    }
}

/// Errors produced while parsing a dotted path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// Two dots in a row, or a leading/trailing dot
    #[error("empty segment in path '{0}'")]
    EmptySegment(String),
}

/// An immutable field locator.
///
/// Paths are written in dotted form. Purely numeric segments are indices,
/// `*` is a wildcard, everything else is a member name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// The empty path (the document root).
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Path { segments }
    }

    /// Parses a dotted path such as `items.*.sku`.
    pub fn parse(s: &str) -> Result<Self, PathError> {
        if s.is_empty() {
            return Ok(Self::root());
        }
        let segments = s
            .split('.')
            .map(|part| match part {
                "" => Err(PathError::EmptySegment(s.to_string())),
                ANY => Ok(Segment::Any),
                p if p.bytes().all(|b| b.is_ascii_digit()) => p
                    .parse::<usize>()
                    .map(Segment::Index)
                    .or_else(|_| Ok(Segment::Name(p.to_string()))),
                p => Ok(Segment::Name(p.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Path { segments })
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, i: usize) -> Option<&Segment> {
        self.segments.get(i)
    }

    pub fn is_index(&self, i: usize) -> bool {
        matches!(self.segments.get(i), Some(Segment::Index(_)))
    }

    /// The path made of segments `i..`.
    pub fn suffix(&self, i: usize) -> Path {
        Path {
            segments: self.segments.get(i..).unwrap_or_default().to_vec(),
        }
    }

    /// The last segment rendered as a string, used as the record key.
    pub fn last_name(&self) -> Option<String> {
        self.segments.last().map(Segment::to_string)
    }

    /// Number of wildcard segments.
    pub fn n_anys(&self) -> usize {
        self.segments.iter().filter(|s| **s == Segment::Any).count()
    }

    /// A new path with `segment` appended.
    pub fn child(&self, segment: Segment) -> Path {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Path { segments }
    }

    /// A new path with all of `other` appended.
    pub fn join(&self, other: &Path) -> Path {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Path { segments }
    }

    /// True when one path is a wildcard-aware prefix of the other.
    pub fn overlaps(&self, other: &Path) -> bool {
        self.segments
            .iter()
            .zip(other.segments.iter())
            .all(|(a, b)| a.matches(b))
    }

    /// Dot-joined storage form. Wildcards are dropped, indices stay.
    ///
    /// `a.*.b` → `a.b`, `a.2.b` → `a.2.b`
    pub fn storage_path(&self) -> String {
        self.segments
            .iter()
            .filter(|s| **s != Segment::Any)
            .map(Segment::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Script accessor form with bracketed indices: `a.2.b` → `a[2].b`.
    ///
    /// Wildcards must already have been unrolled into loop variables, so any
    /// `*` is a translation error.
    pub fn script_path(&self) -> Result<String, TranslateError> {
        let mut out = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Any => return Err(TranslateError::Translation(self.to_string())),
                Segment::Index(n) => {
                    out.push('[');
                    out.push_str(&n.to_string());
                    out.push(']');
                }
                Segment::Name(name) => {
                    if i > 0 {
                        out.push('.');
                    }
                    out.push_str(name);
                }
            }
        }
        Ok(out)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}
