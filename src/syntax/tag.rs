//! Tags and the tag grammar.
//!
//! A tag is a non-empty list of colon separated segments. Segments consist of
//! `a-z`, `0-9` and `-`, never start or end with a hyphen, and the whole tag
//! must start with a letter. Uppercase input is folded to lowercase.

use crate::errors::{Result, SmlError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A validated tag, e.g. `li:2:last` as `["li", "2", "last"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Tag(Vec<String>);

impl Tag {
    /// Validates `raw` and builds a tag from it.
    pub fn new(raw: &str) -> Result<Self> {
        validate_tag(raw)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// The first segment; used as the writer dispatch key.
    pub fn first(&self) -> &str {
        &self.0[0]
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(":"))
    }
}

impl FromStr for Tag {
    type Err = SmlError;

    fn from_str(s: &str) -> Result<Self> {
        validate_tag(s)
    }
}

impl TryFrom<Vec<String>> for Tag {
    type Error = SmlError;

    /// Every element must be a single segment; `["a:b"]` is rejected.
    fn try_from(segments: Vec<String>) -> Result<Self> {
        let joined = segments.join(":");
        if segments.iter().any(|segment| segment.contains(':')) {
            return Err(SmlError::Grammar { tag: joined });
        }
        validate_tag(&joined)
    }
}

impl From<Tag> for Vec<String> {
    fn from(tag: Tag) -> Self {
        tag.0
    }
}

impl PartialEq<[&str]> for Tag {
    fn eq(&self, other: &[&str]) -> bool {
        self.0.len() == other.len() && self.0.iter().zip(other).all(|(a, b)| a == b)
    }
}

impl<const N: usize> PartialEq<[&str; N]> for Tag {
    fn eq(&self, other: &[&str; N]) -> bool {
        self == &other[..]
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Splits a raw tag into its segments, or fails with [`SmlError::Grammar`].
///
/// Total and side-effect free: every input yields exactly one of the two.
pub fn validate_tag(raw: &str) -> Result<Tag> {
    let invalid = || SmlError::Grammar {
        tag: raw.to_string(),
    };
    let lowered = raw.to_ascii_lowercase();
    if !lowered.starts_with(|c: char| c.is_ascii_lowercase()) {
        return Err(invalid());
    }
    let mut segments = Vec::new();
    for segment in lowered.split(':') {
        if !valid_segment(segment) {
            return Err(invalid());
        }
        segments.push(segment.to_string());
    }
    Ok(Tag(segments))
}

fn valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && !segment.starts_with('-')
        && !segment.ends_with('-')
        && segment
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
