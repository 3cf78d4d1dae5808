//! The builder protocol driven by the parser.
//!
//! The parser never constructs output itself; it emits events in document
//! pre-order to a [`Builder`]. [`TreeBuilder`] assembles the in-memory
//! document tree, [`PathValueBuilder`] folds the same events into a path/value
//! store.
//!
//! # Call discipline
//!
//! - every `end_tag_node` closes the most recent unmatched `begin_tag_node`
//! - content events are only valid while a tag is open
//! - once the outermost tag is closed the builder is done and rejects
//!   every further event
//!
//! Conforming builders report violations as [`SmlError::Protocol`].
//!
//! [`SmlError::Protocol`]: crate::SmlError::Protocol

use crate::errors::Result;
use crate::syntax::tag::Tag;

pub mod tree;
pub mod values;

pub use tree::TreeBuilder;
pub use values::{PathValueBuilder, PathValues};

pub(crate) const ALREADY_DONE: &str = "building is already done";
pub(crate) const NOT_YET_DONE: &str = "building is not yet done";

/// Event sink for the parser.
pub trait Builder {
    fn begin_tag_node(&mut self, tag: Tag) -> Result<()>;
    fn end_tag_node(&mut self) -> Result<()>;
    fn text_node(&mut self, text: String) -> Result<()>;
    fn raw_node(&mut self, raw: String) -> Result<()>;
    fn comment_node(&mut self, comment: String) -> Result<()>;
}
