//! Builder folding a document into a path/value store.
//!
//! Each tag opens a path below its parent; the trimmed text inside a tag
//! becomes the value of that path. Useful for configuration-like documents:
//!
//! ```text
//! {config {foo 1} {bar 2} {yadda {up down} {down up}}}
//! ```
//!
//! yields `config/foo = 1`, `config/bar = 2`, `config/yadda/up = down` and
//! `config/yadda/down = up`.

use super::{Builder, ALREADY_DONE, NOT_YET_DONE};
use crate::errors::{Result, SmlError};
use crate::syntax::tag::Tag;
use serde::ser::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Paths and their optional values, ordered by path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathValues {
    entries: BTreeMap<Vec<String>, Option<String>>,
}

impl PathValues {
    /// Value stored at `path`; `None` if the path is unknown or has no value.
    pub fn get(&self, path: &[&str]) -> Option<&str> {
        let key: Vec<String> = path.iter().map(|s| s.to_string()).collect();
        self.entries.get(&key).and_then(|v| v.as_deref())
    }

    pub fn contains(&self, path: &[&str]) -> bool {
        let key: Vec<String> = path.iter().map(|s| s.to_string()).collect();
        self.entries.contains_key(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[String], Option<&str>)> {
        self.entries
            .iter()
            .map(|(path, value)| (path.as_slice(), value.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for PathValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.entries
                .iter()
                .map(|(path, value)| (path.join("/"), value)),
        )
    }
}

/// Builds [`PathValues`]; path components are the full tags, e.g. `li:1`.
#[derive(Debug, Default)]
pub struct PathValueBuilder {
    path: Vec<String>,
    values: PathValues,
    done: bool,
}

impl PathValueBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn values(&self) -> Result<&PathValues> {
        if !self.done {
            return Err(SmlError::protocol(NOT_YET_DONE));
        }
        Ok(&self.values)
    }

    pub fn finish(self) -> Result<PathValues> {
        if !self.done {
            return Err(SmlError::protocol(NOT_YET_DONE));
        }
        Ok(self.values)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.done {
            return Err(SmlError::protocol(ALREADY_DONE));
        }
        Ok(())
    }
}

impl Builder for PathValueBuilder {
    fn begin_tag_node(&mut self, tag: Tag) -> Result<()> {
        self.ensure_open()?;
        self.path.push(tag.to_string());
        self.values.entries.entry(self.path.clone()).or_insert(None);
        Ok(())
    }

    fn end_tag_node(&mut self) -> Result<()> {
        self.ensure_open()?;
        if self.path.pop().is_none() {
            return Err(SmlError::protocol("no opening tag"));
        }
        if self.path.is_empty() {
            self.done = true;
        }
        Ok(())
    }

    fn text_node(&mut self, text: String) -> Result<()> {
        self.ensure_open()?;
        let Some(slot) = self.values.entries.get_mut(&self.path) else {
            return Err(SmlError::protocol("no opening tag for text"));
        };
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }
        if slot.is_some() {
            return Err(SmlError::protocol(format!(
                "node has multiple values: {}",
                self.path.join("/")
            )));
        }
        *slot = Some(text.to_string());
        Ok(())
    }

    fn raw_node(&mut self, raw: String) -> Result<()> {
        self.text_node(raw)
    }

    fn comment_node(&mut self, _comment: String) -> Result<()> {
        self.ensure_open()?;
        if self.path.is_empty() {
            return Err(SmlError::protocol("no opening tag for comment"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(raw: &str) -> Tag {
        Tag::new(raw).unwrap()
    }

    #[test]
    fn stores_trimmed_values_by_path() {
        let mut builder = PathValueBuilder::new();
        builder.begin_tag_node(tag("config")).unwrap();
        builder.begin_tag_node(tag("name")).unwrap();
        builder.text_node("  demo \n".into()).unwrap();
        builder.comment_node("ignored".into()).unwrap();
        builder.end_tag_node().unwrap();
        builder.begin_tag_node(tag("empty")).unwrap();
        builder.text_node("   ".into()).unwrap();
        builder.end_tag_node().unwrap();
        builder.end_tag_node().unwrap();

        let values = builder.finish().unwrap();
        assert_eq!(values.len(), 3);
        assert_eq!(values.get(&["config", "name"]), Some("demo"));
        assert!(values.contains(&["config", "empty"]));
        assert_eq!(values.get(&["config", "empty"]), None);
        assert_eq!(values.get(&["config"]), None);
    }

    #[test]
    fn second_value_for_a_path_is_rejected() {
        let mut builder = PathValueBuilder::new();
        builder.begin_tag_node(tag("foo")).unwrap();
        builder.begin_tag_node(tag("bar")).unwrap();
        builder.text_node("1".into()).unwrap();
        builder.end_tag_node().unwrap();
        builder.begin_tag_node(tag("bar")).unwrap();
        let err = builder.raw_node("2".into()).unwrap_err();
        assert!(err.to_string().contains("node has multiple values"));
    }

    #[test]
    fn values_before_completion_fail() {
        let mut builder = PathValueBuilder::new();
        builder.begin_tag_node(tag("a")).unwrap();
        assert!(matches!(builder.values(), Err(SmlError::Protocol { .. })));
        builder.end_tag_node().unwrap();
        assert!(builder.values().is_ok());
        assert!(matches!(builder.text_node("x".into()), Err(SmlError::Protocol { .. })));
    }

    #[test]
    fn content_without_open_tag_is_rejected() {
        let mut builder = PathValueBuilder::new();
        assert!(matches!(builder.text_node("x".into()), Err(SmlError::Protocol { .. })));
        assert!(matches!(builder.raw_node("x".into()), Err(SmlError::Protocol { .. })));
        let err = builder.comment_node("x".into()).unwrap_err();
        assert_eq!(err.to_string(), "protocol error: no opening tag for comment");
        assert!(matches!(builder.end_tag_node(), Err(SmlError::Protocol { .. })));
    }

    #[test]
    fn serializes_as_flat_map() {
        let mut builder = PathValueBuilder::new();
        builder.begin_tag_node(tag("a")).unwrap();
        builder.begin_tag_node(tag("b:1")).unwrap();
        builder.text_node("x".into()).unwrap();
        builder.end_tag_node().unwrap();
        builder.end_tag_node().unwrap();
        let json = serde_json::to_value(builder.finish().unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({"a": null, "a/b:1": "x"}));
    }
}
