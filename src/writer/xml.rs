//! Processor emitting XML.
//!
//! The first tag segment names the element, the second becomes the `id`
//! attribute and the third the `class` attribute:
//!
//! ```text
//! {p:intro:preface Hello}  =>  <p id="intro" class="preface">Hello</p>
//! ```

use super::WriterProcessor;
use crate::errors::Result;
use crate::syntax::tag::Tag;
use std::io::Write;

#[derive(Debug, Clone)]
pub struct XmlProcessor {
    raw_tag: String,
}

impl XmlProcessor {
    /// `raw_tag` names the element wrapping raw nodes, e.g. `pre`.
    pub fn new(raw_tag: impl Into<String>) -> Self {
        Self {
            raw_tag: raw_tag.into(),
        }
    }
}

/// Escapes text content the way XML character data requires.
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            '\t' => escaped.push_str("&#x9;"),
            '\n' => escaped.push_str("&#xA;"),
            '\r' => escaped.push_str("&#xD;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Separates consecutive hyphens, which XML does not allow inside comments.
pub fn escape_comment(comment: &str) -> String {
    let mut escaped = String::with_capacity(comment.len());
    let mut last = None;
    for ch in comment.chars() {
        if ch == '-' && last == Some('-') {
            escaped.push(' ');
        }
        escaped.push(ch);
        last = Some(ch);
    }
    escaped
}

impl WriterProcessor for XmlProcessor {
    fn open_tag(&self, tag: &Tag, out: &mut dyn Write) -> Result<()> {
        write!(out, "<{}", tag.first())?;
        if let Some(id) = tag.get(1) {
            write!(out, " id={id:?}")?;
        }
        if let Some(class) = tag.get(2) {
            write!(out, " class={class:?}")?;
        }
        out.write_all(b">")?;
        Ok(())
    }

    fn close_tag(&self, tag: &Tag, out: &mut dyn Write) -> Result<()> {
        write!(out, "</{}>", tag.first())?;
        Ok(())
    }

    fn text(&self, text: &str, out: &mut dyn Write) -> Result<()> {
        out.write_all(escape_text(text).as_bytes())?;
        Ok(())
    }

    fn raw(&self, raw: &str, out: &mut dyn Write) -> Result<()> {
        write!(out, "<{tag}>{raw}</{tag}>", tag = self.raw_tag)?;
        Ok(())
    }

    fn comment(&self, comment: &str, out: &mut dyn Write) -> Result<()> {
        write!(out, "<!-- {} -->", escape_comment(comment))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::write_xml;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(escape_text("a < b & \"c\""), "a &lt; b &amp; &#34;c&#34;");
    }

    #[test]
    fn comments_never_contain_double_hyphens() {
        assert_eq!(escape_comment("a--b"), "a- -b");
        assert_eq!(escape_comment("---"), "- - -");
        assert_eq!(escape_comment("-a-b-"), "-a-b-");
        let root = crate::parse_str("{p {#-- x --#}}").unwrap();
        assert_eq!(
            write_xml(&root, "pre", false, "").unwrap(),
            " <p> <!-- - - x - - --></p>"
        );
    }

    #[test]
    fn id_and_class_come_from_segments() {
        let root = crate::parse_str("{p:intro:preface Hi {! <b> !}{# note #}}").unwrap();
        assert_eq!(
            write_xml(&root, "pre", false, "").unwrap(),
            r#" <p id="intro" class="preface"> Hi  <pre> <b> </pre> <!--  note  --></p>"#
        );
    }
}
