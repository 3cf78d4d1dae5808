//! Single-character classifier feeding the parser.
//!
//! The tokenizer reads one character at a time from a forward-only source,
//! classifies it, and tracks the character position used in diagnostics. It
//! supports exactly one unit of pushback.

// ============================================================================
// CHARACTER CLASSES
// ============================================================================

pub const CH_OPEN: char = '{';
pub const CH_CLOSE: char = '}';
pub const CH_ESCAPE: char = '^';
pub const CH_BANG: char = '!';
pub const CH_HASH: char = '#';

/// Classification of a single input character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuneClass {
    Text,
    Space,
    Open,
    Close,
    Escape,
    Bang,
    Hash,
    /// `a-z`, `A-Z`, `0-9`, `-` and `:`.
    TagChar,
    EndOfInput,
}

impl RuneClass {
    pub fn of(ch: char) -> Self {
        match ch {
            CH_OPEN => RuneClass::Open,
            CH_CLOSE => RuneClass::Close,
            CH_ESCAPE => RuneClass::Escape,
            CH_BANG => RuneClass::Bang,
            CH_HASH => RuneClass::Hash,
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | ':' => RuneClass::TagChar,
            c if c.is_whitespace() => RuneClass::Space,
            _ => RuneClass::Text,
        }
    }
}

/// One classified character. At end of input `ch` is `'\0'`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unit {
    pub class: RuneClass,
    pub ch: char,
}

impl Unit {
    const END: Unit = Unit {
        class: RuneClass::EndOfInput,
        ch: '\0',
    };

    pub fn is(&self, class: RuneClass) -> bool {
        self.class == class
    }
}

// ============================================================================
// TOKENIZER
// ============================================================================

/// Reads classified units from any character iterator.
pub struct Tokenizer<I: Iterator<Item = char>> {
    source: I,
    /// Index the next freshly read character will get.
    next_index: usize,
    /// Index of the most recently returned unit.
    position: usize,
    pending: Option<(Unit, usize)>,
    last: Option<(Unit, usize)>,
}

impl<I: Iterator<Item = char>> Tokenizer<I> {
    pub fn new(source: I) -> Self {
        Self {
            source,
            next_index: 0,
            position: 0,
            pending: None,
            last: None,
        }
    }

    /// Returns the next unit. Once the source is exhausted every call
    /// returns `EndOfInput` at the position just past the last character.
    pub fn read(&mut self) -> Unit {
        let (unit, index) = match self.pending.take() {
            Some(pending) => pending,
            None => match self.source.next() {
                Some(ch) => {
                    let index = self.next_index;
                    self.next_index += 1;
                    (
                        Unit {
                            class: RuneClass::of(ch),
                            ch,
                        },
                        index,
                    )
                }
                None => (Unit::END, self.next_index),
            },
        };
        self.position = index;
        self.last = Some((unit, index));
        unit
    }

    /// Pushes the most recently read unit back; the next `read` returns it again.
    pub fn unread(&mut self) {
        debug_assert!(self.pending.is_none(), "only one unit of pushback");
        if let Some(last) = self.last.take() {
            self.pending = Some(last);
            self.position = last.1.saturating_sub(1);
        }
    }

    /// Character position of the most recently read unit.
    pub fn position(&self) -> usize {
        self.position
    }
}
