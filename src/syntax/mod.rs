//! Surface syntax: character classification, tag grammar and the parser.

pub mod parser;
pub mod tag;
pub mod tokenizer;

pub use parser::{parse_reader, parse_str, parse_str_with, read_document, ParseOptions, Parser};
pub use tag::{validate_tag, Tag};
pub use tokenizer::{RuneClass, Tokenizer, Unit};
