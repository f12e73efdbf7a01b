//! Quote- and bracket-aware character scanning.
//!
//! Every structural question the compiler asks about a line ("is there an
//! `=` here", "is this comma a separator", "where does this bracket close")
//! is answered by walking the text once with [`Scanner`], which tracks
//! whether the current character sits inside a double-quoted span, a
//! bracket, or both.
//!
//! Structural characters are all ASCII, so the byte offsets reported here
//! are always valid `str` slice boundaries.

use std::str::CharIndices;

/// Where the scanner is relative to quotes and brackets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanState {
    Normal,
    InQuotes,
    InBracket,
    InBracketQuotes,
}

impl ScanState {
    /// Check if the state is inside a double-quoted span.
    #[must_use]
    pub fn in_quotes(self) -> bool {
        matches!(self, ScanState::InQuotes | ScanState::InBracketQuotes)
    }
}

/// Character scanner yielding `(byte offset, char, state)`.
///
/// The reported state is the one the character is read in, so an opening
/// quote is reported as `Normal` and its closing quote as `InQuotes`.
///
/// ```
/// use rummy::compiler::scanner::{ScanState, Scanner};
///
/// let states: Vec<ScanState> = Scanner::new(r#"a"b"[c]"#).map(|(_, _, s)| s).collect();
/// assert_eq!(states[2], ScanState::InQuotes);
/// assert_eq!(states[5], ScanState::InBracket);
/// ```
pub struct Scanner<'a> {
    chars: CharIndices<'a>,
    state: ScanState,
    depth: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            chars: text.char_indices(),
            state: ScanState::Normal,
            depth: 0,
        }
    }

    /// State after the characters consumed so far.
    #[must_use]
    pub fn state(&self) -> ScanState {
        self.state
    }
}

impl Iterator for Scanner<'_> {
    type Item = (usize, char, ScanState);

    fn next(&mut self) -> Option<Self::Item> {
        use ScanState::*;

        let (offset, c) = self.chars.next()?;
        let state = self.state;
        self.state = match (state, c) {
            (Normal, '"') => InQuotes,
            (Normal, '[') => {
                self.depth = 1;
                InBracket
            }
            (InQuotes, '"') => Normal,
            (InBracket, '"') => InBracketQuotes,
            (InBracket, '[') => {
                self.depth += 1;
                InBracket
            }
            (InBracket, ']') => {
                self.depth -= 1;
                if self.depth == 0 {
                    Normal
                } else {
                    InBracket
                }
            }
            (InBracketQuotes, '"') => InBracket,
            (s, _) => s,
        };
        Some((offset, c, state))
    }
}

/// Offset of the first `target` outside double quotes.
#[must_use]
pub fn find_unquoted(text: &str, target: char) -> Option<usize> {
    Scanner::new(text)
        .find(|&(_, c, state)| c == target && !state.in_quotes())
        .map(|(offset, _, _)| offset)
}

/// Offset of the assignment `=`: the first `=` outside quotes that is not
/// part of `==`, `!=`, `<=` or `>=`.
#[must_use]
pub fn find_assignment(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    Scanner::new(text)
        .find(|&(offset, c, state)| {
            if c != '=' || state.in_quotes() {
                return false;
            }
            let prev = offset.checked_sub(1).map(|i| bytes[i]);
            let next = bytes.get(offset + 1).copied();
            !matches!(prev, Some(b'=' | b'!' | b'<' | b'>')) && next != Some(b'=')
        })
        .map(|(offset, _, _)| offset)
}

/// Split on `sep` where it appears outside quotes, brackets and parentheses.
#[must_use]
pub fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for offset in top_level_offsets(text, sep) {
        pieces.push(&text[start..offset]);
        start = offset + sep.len_utf8();
    }
    pieces.push(&text[start..]);
    pieces
}

/// Check for `sep` outside quotes, brackets and parentheses.
#[must_use]
pub fn has_top_level(text: &str, sep: char) -> bool {
    top_level_offsets(text, sep).next().is_some()
}

fn top_level_offsets(text: &str, sep: char) -> impl Iterator<Item = usize> + '_ {
    let mut parens = 0usize;
    Scanner::new(text).filter_map(move |(offset, c, state)| {
        if state != ScanState::Normal {
            return None;
        }
        match c {
            '(' => parens += 1,
            ')' => parens = parens.saturating_sub(1),
            _ if c == sep && parens == 0 => return Some(offset),
            _ => {}
        }
        None
    })
}

/// Offset of the `]` closing the `[` at `open`.
#[must_use]
pub fn matching_bracket(text: &str, open: usize) -> Option<usize> {
    let tail = text.get(open..)?;
    if !tail.starts_with('[') {
        return None;
    }
    let mut scanner = Scanner::new(tail);
    while let Some((offset, c, _)) = scanner.next() {
        if c == ']' && scanner.state() == ScanState::Normal {
            return Some(open + offset);
        }
    }
    None
}

/// Check that every bracket outside quotes is matched.
#[must_use]
pub fn brackets_balanced(text: &str) -> bool {
    let mut scanner = Scanner::new(text);
    while let Some((_, c, state)) = scanner.next() {
        if c == ']' && state == ScanState::Normal {
            return false;
        }
    }
    !matches!(scanner.state(), ScanState::InBracket | ScanState::InBracketQuotes)
}

/// Check if the text is one bracketed literal such as `[1, 2, 3]`.
#[must_use]
pub fn is_bracketed_literal(text: &str) -> bool {
    text.starts_with('[') && matching_bracket(text, 0) == Some(text.len() - 1)
}

/// Remove every whitespace character.
#[must_use]
pub fn remove_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Remove whitespace outside double-quoted spans.
///
/// Returns `None` when a quote is left open.
#[must_use]
pub fn remove_whitespace_preserve_quotes(text: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut in_quotes = false;
    for c in text.chars() {
        if c == '"' {
            in_quotes = !in_quotes;
        }
        if in_quotes || c == '"' || !c.is_whitespace() {
            out.push(c);
        }
    }
    (!in_quotes).then_some(out)
}
