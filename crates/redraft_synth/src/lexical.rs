//! Lexical scan telling top-level SQL text apart from literals, quoted
//! identifiers, comments and parenthesized expressions.

use redraft_error::{SynthesisError, SynthesisErrorKind};
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    SingleQuoted,
    DoubleQuoted,
    Backticked,
    Bracketed,
    BlockComment,
}

/// Per-byte record of which positions of a statement lie at the top level.
///
/// Only ASCII delimiters are inspected, so scanning bytes is safe for UTF-8
/// input: continuation bytes never equal a delimiter.
#[derive(Debug)]
pub(crate) struct TopLevel {
    mask: Vec<bool>,
}

impl TopLevel {
    /// Scan `text`, failing on constructs the rewrite cannot reason about.
    pub(crate) fn scan(text: &str) -> Result<Self, SynthesisError> {
        let bytes = text.as_bytes();
        let mut mask = vec![false; bytes.len()];
        let mut state = State::Code;
        let mut depth: usize = 0;
        let mut i = 0;

        while i < bytes.len() {
            let byte = bytes[i];
            let next = bytes.get(i + 1).copied();
            match state {
                State::Code => match byte {
                    b'\'' => state = State::SingleQuoted,
                    b'"' => state = State::DoubleQuoted,
                    b'`' => state = State::Backticked,
                    b'[' => state = State::Bracketed,
                    b'(' => depth += 1,
                    b')' => {
                        depth = depth
                            .checked_sub(1)
                            .ok_or_else(|| unsupported("unbalanced parentheses"))?;
                    }
                    // Newlines are folded into spaces before scanning, so a
                    // line comment would swallow the rest of the statement.
                    b'-' if next == Some(b'-') => {
                        return Err(unsupported("line comments are not supported"));
                    }
                    b'/' if next == Some(b'*') => {
                        state = State::BlockComment;
                        i += 2;
                        continue;
                    }
                    _ => mask[i] = depth == 0,
                },
                State::SingleQuoted if byte == b'\'' => state = State::Code,
                State::DoubleQuoted if byte == b'"' => state = State::Code,
                State::Backticked if byte == b'`' => state = State::Code,
                State::Bracketed if byte == b']' => state = State::Code,
                State::BlockComment if byte == b'*' && next == Some(b'/') => {
                    state = State::Code;
                    i += 2;
                    continue;
                }
                _ => {}
            }
            i += 1;
        }

        if state != State::Code {
            return Err(unsupported(
                "unterminated string literal, quoted identifier or comment",
            ));
        }
        if depth != 0 {
            return Err(unsupported("unbalanced parentheses"));
        }
        Ok(Self { mask })
    }

    /// Whether the byte at `offset` is top-level code.
    pub(crate) fn is_top_level(&self, offset: usize) -> bool {
        self.mask.get(offset).copied().unwrap_or(false)
    }

    /// Offsets in `range` holding `needle` at the top level.
    pub(crate) fn top_level_bytes<'a>(
        &'a self,
        text: &'a str,
        range: Range<usize>,
        needle: u8,
    ) -> impl Iterator<Item = usize> + 'a {
        let bytes = text.as_bytes();
        range.filter(move |&i| bytes.get(i) == Some(&needle) && self.is_top_level(i))
    }
}

#[track_caller]
pub(crate) fn unsupported(reason: impl Into<String>) -> SynthesisError {
    SynthesisError::new(SynthesisErrorKind::UnsupportedQuery(reason.into()))
}
