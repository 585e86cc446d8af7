//! Hierarchical paths addressing components in the registry and values inside a model.
//!
//! The string form joins segments with `.`; a literal `.` or `\` inside a segment is
//! escaped with a backslash. The empty string is the root path.

use crate::error::TreeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const DELIMITER: char = '.';
pub const ESCAPE: char = '\\';

/// An immutable, ordered sequence of non-empty segments.
///
/// Ordering is lexicographic by segment, so every descendant of a path sorts
/// directly after it; the registry relies on this for subtree ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// The zero-length path: the registry root, or the whole model.
    #[must_use]
    pub const fn root() -> Self {
        Self { segments: Vec::new() }
    }

    /// Builds a path from already-split segments.
    ///
    /// # Errors
    /// Returns [`TreeError::MalformedPath`] if any segment is empty.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, TreeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if let Some(index) = segments.iter().position(String::is_empty) {
            return Err(TreeError::MalformedPath {
                message: format!("empty segment at position {index}").into(),
                context: None,
            });
        }
        Ok(Self { segments })
    }

    /// Parses the escaped string form.
    ///
    /// # Errors
    /// Returns [`TreeError::MalformedPath`] for a dangling or unknown escape sequence,
    /// or for an empty segment (`a..b`, `.a`, `a.`).
    ///
    /// # Examples
    /// ```rust
    /// use nexus_tree::Path;
    ///
    /// let path = Path::parse(r"settings.ip\.v4").unwrap();
    /// assert_eq!(path.segments(), ["settings", "ip.v4"]);
    /// assert!(Path::parse(r"broken\").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, TreeError> {
        if raw.is_empty() {
            return Ok(Self::root());
        }

        let mut segments = Vec::new();
        let mut current = String::new();
        let mut chars = raw.chars();

        while let Some(ch) = chars.next() {
            match ch {
                ESCAPE => match chars.next() {
                    Some(escaped @ (DELIMITER | ESCAPE)) => current.push(escaped),
                    Some(other) => {
                        return Err(malformed(raw, format!("unknown escape sequence '\\{other}'")));
                    },
                    None => return Err(malformed(raw, "dangling escape at end of path".to_owned())),
                },
                DELIMITER => segments.push(std::mem::take(&mut current)),
                other => current.push(other),
            }
        }
        segments.push(current);

        if segments.iter().any(String::is_empty) {
            return Err(malformed(raw, "empty segment".to_owned()));
        }
        Ok(Self { segments })
    }

    /// Renders the escaped string form accepted by [`Path::parse`].
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Last segment, `None` for the root.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// All segments but the last; `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.segments
            .split_last()
            .map(|(_, parent)| Self { segments: parent.to_vec() })
    }

    /// `self` followed by `other`.
    #[must_use]
    pub fn concat(&self, other: &Self) -> Self {
        let mut segments = Vec::with_capacity(self.len() + other.len());
        segments.extend_from_slice(&self.segments);
        segments.extend_from_slice(&other.segments);
        Self { segments }
    }

    /// A child path with one more segment.
    ///
    /// # Errors
    /// Returns [`TreeError::MalformedPath`] if `segment` is empty.
    pub fn child(&self, segment: impl Into<String>) -> Result<Self, TreeError> {
        let segment = segment.into();
        if segment.is_empty() {
            return Err(TreeError::MalformedPath {
                message: "empty segment".into(),
                context: Some(format!("child of '{self}'").into()),
            });
        }
        let mut segments = self.segments.clone();
        segments.push(segment);
        Ok(Self { segments })
    }

    /// True when every segment of `self` matches the start of `other`.
    /// The root is a prefix of every path, and every path is a prefix of itself.
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        other.segments.starts_with(&self.segments)
    }

    /// Either path is a prefix of the other; decides which listeners see a change.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.is_prefix_of(other) || other.is_prefix_of(self)
    }
}

fn malformed(raw: &str, message: String) -> TreeError {
    TreeError::MalformedPath { message: message.into(), context: Some(format!("'{raw}'").into()) }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            for ch in segment.chars() {
                if matches!(ch, DELIMITER | ESCAPE) {
                    write!(f, "{ESCAPE}")?;
                }
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Path {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
