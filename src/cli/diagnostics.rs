//! Diagnostic presentation for document errors.
//!
//! Library errors carry a character position but no source text. The CLI
//! pairs them with the document they came from so miette can point at the
//! failing character.

use crate::errors::SmlError;
use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode, SourceSpan};
use std::fmt::Display;
use thiserror::Error;

/// An [`SmlError`] together with the document it was raised for.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct DocumentDiagnostic {
    error: SmlError,
    document: NamedSource<String>,
    span: Option<SourceSpan>,
}

impl DocumentDiagnostic {
    pub fn new(error: SmlError, name: impl AsRef<str>, text: impl Into<String>) -> Self {
        let text = text.into();
        let span = error.position().map(|position| char_span(&text, position));
        Self {
            error,
            document: NamedSource::new(name, text),
            span,
        }
    }

    pub fn error(&self) -> &SmlError {
        &self.error
    }
}

/// Byte span of the character at `position`; empty at the end of the text.
fn char_span(text: &str, position: usize) -> SourceSpan {
    match text.char_indices().nth(position) {
        Some((offset, ch)) => (offset, ch.len_utf8()).into(),
        None => (text.len(), 0).into(),
    }
}

impl Diagnostic for DocumentDiagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        self.error.code()
    }

    fn help<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        self.error.help()
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&self.document)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.span?;
        let label = LabeledSpan::new_with_span(Some(self.error.label()), span);
        Some(Box::new(std::iter::once(label)))
    }
}
