//! sml Parser
//!
//! Recursive-descent recognizer for the sml grammar that drives a
//! [`Builder`] with events in document order. Nested tag nodes are tracked on
//! an explicit stack instead of the call stack, so adversarial nesting fails
//! with [`SmlError::NestingTooDeep`] rather than overflowing.
//!
//! ```text
//! document ::= preamble '{' tagnode
//! tagnode  ::= tag (space child)* '}'
//! child    ::= tagnode | '{!' raw '!}' | '{#' comment '#}' | text
//! ```
//!
//! Input after the closing brace of the root tag node is ignored, just like
//! the preamble before it.

use crate::ast::TagNode;
use crate::builder::{Builder, TreeBuilder};
use crate::errors::{Phase, Result, SmlError};
use crate::syntax::tag::validate_tag;
use crate::syntax::tokenizer::{RuneClass, Tokenizer, CH_BANG, CH_HASH};
use std::io::Read;

/// Default limit for nested tag nodes.
pub const DEFAULT_MAX_DEPTH: usize = 512;

// ============================================================================
// OPTIONS
// ============================================================================

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum number of simultaneously open tag nodes, root included.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parses a document from `source`, feeding the events to `builder`.
pub fn read_document<I, B>(source: I, builder: &mut B, options: ParseOptions) -> Result<()>
where
    I: IntoIterator<Item = char>,
    B: Builder + ?Sized,
{
    Parser::new(source.into_iter(), builder, options).parse()
}

/// Parses a document into a tree with default options.
///
/// # Examples
///
/// ```rust
/// let root = sml::parse_str("{root Text A}").unwrap();
/// assert_eq!(root.tag, ["root"]);
/// assert_eq!(root.children[0].as_text(), Some("Text A"));
/// ```
pub fn parse_str(source: &str) -> Result<TagNode> {
    parse_str_with(source, ParseOptions::default())
}

pub fn parse_str_with(source: &str, options: ParseOptions) -> Result<TagNode> {
    let mut builder = TreeBuilder::new();
    read_document(source.chars(), &mut builder, options)?;
    builder.into_root()
}

/// Reads all of `reader` as UTF-8 and parses it into a tree.
pub fn parse_reader<R: Read>(mut reader: R) -> Result<TagNode> {
    let mut source = String::new();
    reader.read_to_string(&mut source)?;
    parse_str(&source)
}

// ============================================================================
// PARSER
// ============================================================================

/// Outcome of reading a tag: whether children follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagEnd {
    Children,
    Closed,
}

pub struct Parser<'b, I: Iterator<Item = char>, B: Builder + ?Sized> {
    tokenizer: Tokenizer<I>,
    builder: &'b mut B,
    options: ParseOptions,
    /// Positions of the opening braces of all tag nodes still awaiting `}`.
    open: Vec<usize>,
}

impl<'b, I, B> Parser<'b, I, B>
where
    I: Iterator<Item = char>,
    B: Builder + ?Sized,
{
    pub fn new(source: I, builder: &'b mut B, options: ParseOptions) -> Self {
        Self {
            tokenizer: Tokenizer::new(source),
            builder,
            options,
            open: Vec::new(),
        }
    }

    /// Parses the whole document. The first error aborts the parse.
    pub fn parse(mut self) -> Result<()> {
        self.skip_preamble()?;
        self.read_tag_node()?;
        while !self.open.is_empty() {
            self.read_child()?;
        }
        log::debug!("document parsed, root closed at position {}", self.tokenizer.position());
        Ok(())
    }

    fn error(&self, phase: Phase, message: &'static str) -> SmlError {
        SmlError::syntax(self.tokenizer.position(), phase, message)
    }

    /// Discards everything up to and including the first `{`.
    fn skip_preamble(&mut self) -> Result<()> {
        loop {
            match self.tokenizer.read().class {
                RuneClass::EndOfInput => {
                    return Err(self.error(
                        Phase::Preamble,
                        "unexpected end of input while reading preamble",
                    ))
                }
                RuneClass::Open => return Ok(()),
                _ => {}
            }
        }
    }

    /// Reads a tag node; the tokenizer is positioned on its `{`.
    fn read_tag_node(&mut self) -> Result<()> {
        let start = self.tokenizer.position();
        let (tag, end) = self.read_tag()?;
        if self.open.len() >= self.options.max_depth {
            return Err(SmlError::NestingTooDeep {
                position: start,
                limit: self.options.max_depth,
            });
        }
        let tag = validate_tag(&tag)?;
        self.builder.begin_tag_node(tag)?;
        match end {
            TagEnd::Closed => self.builder.end_tag_node(),
            TagEnd::Children => {
                self.open.push(start);
                Ok(())
            }
        }
    }

    fn read_tag(&mut self) -> Result<(String, TagEnd)> {
        let mut buf = String::new();
        loop {
            let unit = self.tokenizer.read();
            match unit.class {
                RuneClass::TagChar => buf.push(unit.ch),
                RuneClass::Space => return Ok((buf, TagEnd::Children)),
                RuneClass::Close => return Ok((buf, TagEnd::Closed)),
                // A started tag cut off by the end of input is reported by
                // the children reader, which sees the same end.
                RuneClass::EndOfInput if !buf.is_empty() => return Ok((buf, TagEnd::Children)),
                RuneClass::EndOfInput => {
                    return Err(
                        self.error(Phase::Tag, "unexpected end of input while reading a tag")
                    )
                }
                _ => return Err(self.error(Phase::Tag, "invalid tag character")),
            }
        }
    }

    /// Reads one child of the innermost open tag node, or its closing brace.
    fn read_child(&mut self) -> Result<()> {
        let unit = self.tokenizer.read();
        match unit.class {
            RuneClass::EndOfInput => Err(self.error(
                Phase::Children,
                "unexpected end of input while reading children",
            )),
            RuneClass::Close => {
                self.open.pop();
                self.builder.end_tag_node()
            }
            RuneClass::Open => self.read_braced_content(),
            _ => {
                self.tokenizer.unread();
                self.read_text_node()
            }
        }
    }

    /// Dispatches on the character following a `{` inside a tag node.
    fn read_braced_content(&mut self) -> Result<()> {
        let unit = self.tokenizer.read();
        match unit.class {
            RuneClass::EndOfInput => Err(self.error(
                Phase::Children,
                "unexpected end of input after opening",
            )),
            RuneClass::TagChar => {
                self.tokenizer.unread();
                self.read_tag_node()
            }
            RuneClass::Bang => {
                let raw = self.read_block(CH_BANG, Phase::Raw)?;
                self.builder.raw_node(raw)
            }
            RuneClass::Hash => {
                let comment = self.read_block(CH_HASH, Phase::Comment)?;
                self.builder.comment_node(comment)
            }
            _ => Err(self.error(Phase::Children, "invalid character after opening")),
        }
    }

    /// Reads verbatim content up to `marker` directly followed by `}`.
    fn read_block(&mut self, marker: char, phase: Phase) -> Result<String> {
        let unexpected_end = match phase {
            Phase::Raw => "unexpected end of input while reading a raw node",
            _ => "unexpected end of input while reading a comment node",
        };
        let mut buf = String::new();
        loop {
            let unit = self.tokenizer.read();
            match unit.class {
                RuneClass::EndOfInput => return Err(self.error(phase, unexpected_end)),
                _ if unit.ch == marker => {
                    let next = self.tokenizer.read();
                    match next.class {
                        RuneClass::Close => return Ok(buf),
                        RuneClass::EndOfInput => return Err(self.error(phase, unexpected_end)),
                        _ => {
                            buf.push(marker);
                            self.tokenizer.unread();
                        }
                    }
                }
                _ => buf.push(unit.ch),
            }
        }
    }

    fn read_text_node(&mut self) -> Result<()> {
        let mut buf = String::new();
        loop {
            let unit = self.tokenizer.read();
            match unit.class {
                RuneClass::EndOfInput => {
                    return Err(self.error(
                        Phase::Text,
                        "unexpected end of input while reading a text node",
                    ))
                }
                RuneClass::Open | RuneClass::Close => {
                    self.tokenizer.unread();
                    return self.builder.text_node(buf);
                }
                RuneClass::Escape => {
                    let escaped = self.tokenizer.read();
                    match escaped.class {
                        RuneClass::Open | RuneClass::Close | RuneClass::Escape => {
                            buf.push(escaped.ch)
                        }
                        RuneClass::EndOfInput => {
                            return Err(self.error(
                                Phase::Escape,
                                "unexpected end of input after escape",
                            ))
                        }
                        _ => {
                            return Err(
                                self.error(Phase::Escape, "invalid character after escape")
                            )
                        }
                    }
                }
                _ => buf.push(unit.ch),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::tag::Tag;

    /// Records builder events as strings.
    #[derive(Default)]
    struct EventLog(Vec<String>);

    impl Builder for EventLog {
        fn begin_tag_node(&mut self, tag: Tag) -> Result<()> {
            self.0.push(format!("begin {tag}"));
            Ok(())
        }
        fn end_tag_node(&mut self) -> Result<()> {
            self.0.push("end".into());
            Ok(())
        }
        fn text_node(&mut self, text: String) -> Result<()> {
            self.0.push(format!("text {text:?}"));
            Ok(())
        }
        fn raw_node(&mut self, raw: String) -> Result<()> {
            self.0.push(format!("raw {raw:?}"));
            Ok(())
        }
        fn comment_node(&mut self, comment: String) -> Result<()> {
            self.0.push(format!("comment {comment:?}"));
            Ok(())
        }
    }

    fn events(src: &str) -> Vec<String> {
        let mut log = EventLog::default();
        read_document(src.chars(), &mut log, ParseOptions::default()).unwrap();
        log.0
    }

    #[test]
    fn events_follow_document_order() {
        assert_eq!(
            events("pre {a x{b}{!r!}{#c#}y} post"),
            vec![
                "begin a",
                "text \"x\"",
                "begin b",
                "end",
                "raw \"r\"",
                "comment \"c\"",
                "text \"y\"",
                "end",
            ]
        );
    }

    #[test]
    fn lone_markers_inside_blocks_are_content() {
        assert_eq!(
            events("{a {!x!y!!}{#1#2##}}"),
            vec!["begin a", "raw \"x!y!\"", "comment \"1#2#\"", "end"]
        );
    }

    #[test]
    fn tag_cut_off_by_end_is_a_children_error() {
        let err = parse_str("{root").unwrap_err();
        assert_eq!(err.phase(), Some(Phase::Children));
        assert_eq!(err.position(), Some(5));
    }

    #[test]
    fn empty_input_fails_in_preamble() {
        let err = parse_str("no braces here").unwrap_err();
        assert_eq!(err.phase(), Some(Phase::Preamble));
        assert_eq!(err.position(), Some(14));
    }

    #[test]
    fn lone_opening_fails_in_tag() {
        let err = parse_str("  {").unwrap_err();
        assert_eq!(err.phase(), Some(Phase::Tag));
        assert_eq!(err.position(), Some(3));
    }

    #[test]
    fn depth_limit_is_enforced() {
        let options = ParseOptions::default().with_max_depth(3);
        assert!(parse_str_with("{a {b {c}}}", options).is_ok());
        let err = parse_str_with("{a {b {c {d}}}}", options).unwrap_err();
        assert!(matches!(err, SmlError::NestingTooDeep { position: 9, limit: 3 }));
    }

    #[test]
    fn parse_reader_reads_everything() {
        let root = parse_reader("{doc {p hello}}".as_bytes()).unwrap();
        assert_eq!(root.tag, ["doc"]);
        assert_eq!(root.children.len(), 1);
    }
}
