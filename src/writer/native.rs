//! Processor reproducing sml notation.

use super::WriterProcessor;
use crate::errors::Result;
use crate::syntax::tag::Tag;
use crate::syntax::tokenizer::{CH_CLOSE, CH_ESCAPE, CH_OPEN};
use std::io::Write;

/// Writes documents back as sml. The output parses into an equal tree,
/// modulo the whitespace added by the layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeProcessor;

impl NativeProcessor {
    pub fn new() -> Self {
        Self
    }
}

/// Escapes `^`, `{` and `}` with a leading `^`.
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, CH_ESCAPE | CH_OPEN | CH_CLOSE) {
            escaped.push(CH_ESCAPE);
        }
        escaped.push(ch);
    }
    escaped
}

impl WriterProcessor for NativeProcessor {
    fn open_tag(&self, tag: &Tag, out: &mut dyn Write) -> Result<()> {
        write!(out, "{{{tag}")?;
        Ok(())
    }

    fn close_tag(&self, _tag: &Tag, out: &mut dyn Write) -> Result<()> {
        out.write_all(b"}")?;
        Ok(())
    }

    fn text(&self, text: &str, out: &mut dyn Write) -> Result<()> {
        out.write_all(escape_text(text).as_bytes())?;
        Ok(())
    }

    fn raw(&self, raw: &str, out: &mut dyn Write) -> Result<()> {
        write!(out, "{{!{raw}!}}")?;
        Ok(())
    }

    fn comment(&self, comment: &str, out: &mut dyn Write) -> Result<()> {
        write!(out, "{{#{comment}#}}")?;
        Ok(())
    }
}
