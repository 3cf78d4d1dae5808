//! Reading and writing sml documents.
//!
//! sml is a brace-delimited markup: a document is a single tag node whose
//! children are text, nested tag nodes, raw blocks `{! ... !}` and comments
//! `{# ... #}`.
//!
//! ```
//! let root = sml::parse_str("{greeting:main Hello ^{world^}}").unwrap();
//! assert_eq!(root.tag.to_string(), "greeting:main");
//! assert_eq!(root.children[0].as_text(), Some("Hello {world}"));
//!
//! let xml = sml::write_xml(&root, "pre", false, "").unwrap();
//! assert_eq!(xml, r#" <greeting id="main"> Hello {world}</greeting>"#);
//! ```
//!
//! Parsing is event driven: the parser feeds a [`Builder`], and
//! [`TreeBuilder`] is the one producing a [`TagNode`] tree. Writing goes
//! through a [`WriterContext`] whose [`WriterProcessor`]s can be swapped per
//! subtree.

pub mod ast;
pub mod builder;
pub mod cli;
pub mod errors;
pub mod logging;
pub mod syntax;
pub mod writer;

pub use ast::{Node, Processor, TagNode};
pub use builder::{Builder, PathValueBuilder, PathValues, TreeBuilder};
pub use errors::{Phase, Result, SmlError};
pub use syntax::{
    parse_reader, parse_str, parse_str_with, read_document, validate_tag, ParseOptions, Tag,
};
pub use writer::{
    write_document, write_native, write_xml, NativeProcessor, WriterContext, WriterProcessor,
    XmlProcessor,
};
