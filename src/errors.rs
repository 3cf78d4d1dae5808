//! sml Error Handling
//!
//! Every stage of the pipeline (tokenizer, parser, tag validation, builders,
//! writers) reports failures through the single [`SmlError`] type. Errors are
//! always fatal to the operation that raised them; nothing is retried or
//! recovered internally.

use miette::Diagnostic;
use std::fmt;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T, E = SmlError> = std::result::Result<T, E>;

// ============================================================================
// PARSE PHASES
// ============================================================================

/// The grammar production the parser was in when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Discarding input before the first `{`.
    Preamble,
    /// Reading the characters of a tag.
    Tag,
    /// Reading the children of a tag node, including what follows a `{`.
    Children,
    /// Reading a `{! ... !}` block.
    Raw,
    /// Reading a `{# ... #}` block.
    Comment,
    /// Reading free text.
    Text,
    /// Reading the character after a `^`.
    Escape,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Preamble => "preamble",
            Phase::Tag => "tag",
            Phase::Children => "children",
            Phase::Raw => "raw",
            Phase::Comment => "comment",
            Phase::Text => "text",
            Phase::Escape => "escape",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ERROR TYPE
// ============================================================================

/// Unified error type for parsing, building and writing documents.
#[derive(Debug, Error)]
pub enum SmlError {
    /// Malformed input; carries the character position and the phase.
    #[error("syntax error at position {position} ({phase}): {message}")]
    Syntax {
        position: usize,
        phase: Phase,
        message: &'static str,
    },
    /// A tag that does not follow the tag grammar.
    #[error("invalid tag: {tag:?}")]
    Grammar { tag: String },
    /// A builder event that violates the call discipline.
    #[error("protocol error: {message}")]
    Protocol { message: String },
    /// Input nested deeper than the configured limit.
    #[error("nesting too deep at position {position}: limit is {limit}")]
    NestingTooDeep { position: usize, limit: usize },
    /// A writer processor was registered twice for the same key.
    #[error("processor {key:?} already registered")]
    DuplicateProcessor { key: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SmlError {
    pub(crate) fn syntax(position: usize, phase: Phase, message: &'static str) -> Self {
        SmlError::Syntax {
            position,
            phase,
            message,
        }
    }

    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        SmlError::Protocol {
            message: message.into(),
        }
    }

    /// Character position of the failure, for errors raised while reading input.
    pub fn position(&self) -> Option<usize> {
        match self {
            SmlError::Syntax { position, .. } | SmlError::NestingTooDeep { position, .. } => {
                Some(*position)
            }
            _ => None,
        }
    }

    /// The parse phase, for syntax errors.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            SmlError::Syntax { phase, .. } => Some(*phase),
            _ => None,
        }
    }

    /// Short label for the failing character, used by diagnostics.
    pub fn label(&self) -> String {
        match self {
            SmlError::Syntax { message, .. } => (*message).to_string(),
            SmlError::NestingTooDeep { limit, .. } => format!("exceeds depth {limit}"),
            other => other.to_string(),
        }
    }
}

impl Diagnostic for SmlError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self {
            SmlError::Syntax { .. } => "sml::syntax",
            SmlError::Grammar { .. } => "sml::grammar",
            SmlError::Protocol { .. } => "sml::protocol",
            SmlError::NestingTooDeep { .. } => "sml::nesting",
            SmlError::DuplicateProcessor { .. } => "sml::writer",
            SmlError::Io(_) => "sml::io",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self {
            SmlError::Syntax {
                phase: Phase::Escape,
                ..
            } => "only `^^`, `^{` and `^}` are valid escapes",
            SmlError::Grammar { .. } => {
                "tags are colon separated segments of a-z, 0-9 and inner hyphens, starting with a letter"
            }
            SmlError::NestingTooDeep { .. } => "raise the limit with --max-depth",
            _ => return None,
        };
        Some(Box::new(help))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_reports_position_and_phase() {
        let err = SmlError::syntax(5, Phase::Children, "unexpected end of input while reading children");
        assert_eq!(err.position(), Some(5));
        assert_eq!(err.phase(), Some(Phase::Children));
        assert_eq!(
            err.to_string(),
            "syntax error at position 5 (children): unexpected end of input while reading children"
        );
    }

    #[test]
    fn grammar_error_quotes_the_tag() {
        let err = SmlError::Grammar { tag: "1abc".into() };
        assert_eq!(err.to_string(), "invalid tag: \"1abc\"");
        assert_eq!(err.position(), None);
        assert_eq!(err.code().map(|c| c.to_string()).as_deref(), Some("sml::grammar"));
    }
}
