//! Writer engine.
//!
//! Walks a document tree and hands every event to a [`WriterProcessor`]. The
//! processor registered under the empty key renders the document; processors
//! registered under a tag's first segment take over for that tag's subtree
//! and are dropped again when the tag closes.
//!
//! The engine owns all layout: with pretty printing every event goes on its
//! own line, indented by the current depth; otherwise opening and content
//! events are separated by a single space and no newlines are written.

use crate::ast::{Processor, TagNode};
use crate::errors::{Result, SmlError};
use crate::syntax::tag::Tag;
use std::collections::HashMap;
use std::io::{self, BufWriter, Write};

pub mod native;
pub mod xml;

pub use native::NativeProcessor;
pub use xml::XmlProcessor;

// ============================================================================
// PROCESSOR CONTRACT
// ============================================================================

/// A rendering strategy for the five traversal events.
///
/// Processors only write the node itself; indentation and line breaks are
/// added by the engine.
pub trait WriterProcessor {
    fn open_tag(&self, tag: &Tag, out: &mut dyn Write) -> Result<()>;
    fn close_tag(&self, tag: &Tag, out: &mut dyn Write) -> Result<()>;
    fn text(&self, text: &str, out: &mut dyn Write) -> Result<()>;
    fn raw(&self, raw: &str, out: &mut dyn Write) -> Result<()>;
    fn comment(&self, comment: &str, out: &mut dyn Write) -> Result<()>;
}

// ============================================================================
// CONTEXT
// ============================================================================

/// Processors, layout settings and the output sink of a writing.
pub struct WriterContext<W: Write> {
    processors: HashMap<String, Box<dyn WriterProcessor>>,
    out: W,
    pretty: bool,
    indent: String,
}

impl<W: Write> WriterContext<W> {
    /// Creates a context with `root` as the processor for the whole document.
    pub fn new(
        root: impl WriterProcessor + 'static,
        out: W,
        pretty: bool,
        indent: impl Into<String>,
    ) -> Self {
        let mut processors: HashMap<String, Box<dyn WriterProcessor>> = HashMap::new();
        processors.insert(String::new(), Box::new(root));
        Self {
            processors,
            out,
            pretty,
            indent: indent.into(),
        }
    }

    /// Registers `processor` for all tags whose first segment is `key`.
    pub fn register(
        &mut self,
        key: impl Into<String>,
        processor: impl WriterProcessor + 'static,
    ) -> Result<()> {
        let key = key.into();
        if self.processors.contains_key(&key) {
            return Err(SmlError::DuplicateProcessor { key });
        }
        self.processors.insert(key, Box::new(processor));
        Ok(())
    }

    pub fn is_pretty(&self) -> bool {
        self.pretty
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// Writes `root` through the processors of `ctx`. Output is buffered and
/// flushed once at the end.
pub fn write_document<W: Write>(root: &TagNode, ctx: &mut WriterContext<W>) -> Result<()> {
    let WriterContext {
        processors,
        out,
        pretty,
        indent,
    } = ctx;
    let processors: &HashMap<String, Box<dyn WriterProcessor>> = processors;
    let base = processors
        .get("")
        .map(|p| &**p)
        .ok_or_else(|| SmlError::protocol("need root processor"))?;
    let mut writer = DocumentWriter {
        processors,
        out: BufWriter::new(out),
        pretty: *pretty,
        indent: indent.as_str(),
        active: vec![base],
        pushed: Vec::new(),
        depth: 0,
    };
    if let Err(err) = root.process_with(&mut writer) {
        // Buffered output of a failed document never reaches the sink.
        let _ = writer.out.into_parts();
        return Err(err);
    }
    writer.out.flush()?;
    log::debug!("document {} written", root.tag);
    Ok(())
}

/// Renders `root` in sml notation.
pub fn write_native(root: &TagNode, pretty: bool, indent: &str) -> Result<String> {
    write_to_string(root, NativeProcessor::new(), pretty, indent)
}

/// Renders `root` as XML, wrapping raw nodes into `raw_tag` elements.
pub fn write_xml(root: &TagNode, raw_tag: &str, pretty: bool, indent: &str) -> Result<String> {
    write_to_string(root, XmlProcessor::new(raw_tag), pretty, indent)
}

fn write_to_string(
    root: &TagNode,
    processor: impl WriterProcessor + 'static,
    pretty: bool,
    indent: &str,
) -> Result<String> {
    let mut ctx = WriterContext::new(processor, Vec::new(), pretty, indent);
    write_document(root, &mut ctx)?;
    String::from_utf8(ctx.into_inner())
        .map_err(|e| SmlError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

struct DocumentWriter<'c, W: Write> {
    processors: &'c HashMap<String, Box<dyn WriterProcessor>>,
    out: BufWriter<&'c mut W>,
    pretty: bool,
    indent: &'c str,
    /// Active processors; the top one renders the current node.
    active: Vec<&'c dyn WriterProcessor>,
    /// Per open tag: whether it pushed a processor on entry.
    pushed: Vec<bool>,
    depth: usize,
}

impl<'c, W: Write> DocumentWriter<'c, W> {
    fn processor(&self) -> &'c dyn WriterProcessor {
        // The base processor is never popped.
        self.active[self.active.len() - 1]
    }

    fn write_indent(&mut self, opening: bool) -> Result<()> {
        if self.pretty {
            for _ in 0..self.depth {
                self.out.write_all(self.indent.as_bytes())?;
            }
        } else if opening {
            self.out.write_all(b" ")?;
        }
        Ok(())
    }

    fn write_newline(&mut self) -> Result<()> {
        if self.pretty {
            self.out.write_all(b"\n")?;
        }
        Ok(())
    }

    fn emit(
        &mut self,
        event: impl FnOnce(&dyn WriterProcessor, &mut dyn Write) -> Result<()>,
    ) -> Result<()> {
        self.write_indent(true)?;
        let processor = self.processor();
        event(processor, &mut self.out)?;
        self.write_newline()
    }
}

impl<W: Write> Processor for DocumentWriter<'_, W> {
    fn open_tag(&mut self, tag: &Tag) -> Result<()> {
        let override_processor = self.processors.get(tag.first()).map(|p| &**p);
        if let Some(processor) = override_processor {
            log::trace!("processor {:?} takes over at {tag}", tag.first());
            self.active.push(processor);
        }
        self.pushed.push(override_processor.is_some());
        self.emit(|p, out| p.open_tag(tag, out))?;
        self.depth += 1;
        Ok(())
    }

    fn close_tag(&mut self, tag: &Tag) -> Result<()> {
        self.depth = self.depth.saturating_sub(1);
        self.write_indent(false)?;
        let processor = self.processor();
        processor.close_tag(tag, &mut self.out)?;
        self.write_newline()?;
        if self.pushed.pop().unwrap_or(false) {
            self.active.pop();
        }
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<()> {
        self.emit(|p, out| p.text(text, out))
    }

    fn raw(&mut self, raw: &str) -> Result<()> {
        self.emit(|p, out| p.raw(raw, out))
    }

    fn comment(&mut self, comment: &str) -> Result<()> {
        self.emit(|p, out| p.comment(comment, out))
    }
}
