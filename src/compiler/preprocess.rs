//! Raw text → logical lines.
//!
//! Drops blank and comment-only lines, splits off trailing comments, removes
//! control whitespace (everything except plain spaces), and joins lines
//! ending in the continuation character.

use crate::core::CompilerConfig;

use super::scanner::find_unquoted;

/// One statement-sized line of input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogicalLine {
    /// Joined text, trimmed of surrounding spaces.
    pub text: String,
    /// 1-based number of the first raw line.
    pub line: usize,
    /// Trailing comment text, joined across continued lines.
    pub comment: Option<String>,
}

/// Iterator over the logical lines of a deck.
///
/// ```
/// use rummy::compiler::preprocess::Preprocessor;
/// use rummy::core::CompilerConfig;
///
/// let config = CompilerConfig::default();
/// let text = "# header\na = 1 + &  # first\n    2  # second\n";
/// let lines: Vec<_> = Preprocessor::new(text, &config).collect();
///
/// assert_eq!(lines.len(), 1);
/// assert_eq!(lines[0].text, "a = 1 + 2");
/// assert_eq!(lines[0].line, 2);
/// assert_eq!(lines[0].comment.as_deref(), Some("first second"));
/// ```
pub struct Preprocessor<'a> {
    raw: std::iter::Enumerate<std::str::Lines<'a>>,
    comment_char: char,
    continuation_char: char,
}

impl<'a> Preprocessor<'a> {
    pub fn new(text: &'a str, config: &CompilerConfig) -> Self {
        Self {
            raw: text.lines().enumerate(),
            comment_char: config.comment_char,
            continuation_char: config.continuation_char,
        }
    }

    /// Split a cleaned raw line into its body and comment fragment.
    fn split_comment<'l>(&self, line: &'l str) -> (&'l str, Option<String>) {
        match find_unquoted(line, self.comment_char) {
            Some(at) => {
                let fragment: String = line[at + self.comment_char.len_utf8()..]
                    .chars()
                    .filter(|&c| c != self.continuation_char)
                    .collect();
                let fragment = fragment.trim();
                let fragment = (!fragment.is_empty()).then(|| fragment.to_string());
                (&line[..at], fragment)
            }
            None => (line, None),
        }
    }
}

impl Iterator for Preprocessor<'_> {
    type Item = LogicalLine;

    fn next(&mut self) -> Option<LogicalLine> {
        let mut pending: Option<(usize, String)> = None;
        let mut comments: Vec<String> = Vec::new();

        while let Some((index, raw)) = self.raw.next() {
            let cleaned: String = raw
                .chars()
                .filter(|&c| c == ' ' || !c.is_whitespace())
                .collect();
            let trimmed = cleaned.trim_start_matches(' ');
            if trimmed.is_empty() || trimmed.starts_with(self.comment_char) {
                continue;
            }

            let (body, comment) = self.split_comment(trimmed);
            comments.extend(comment);
            let body = body.trim_end_matches(' ');
            if body.is_empty() {
                continue;
            }

            if let Some(head) = body.strip_suffix(self.continuation_char) {
                let head = head.trim_end_matches(' ');
                if let Some((_, buffer)) = pending.as_mut() {
                    buffer.push(' ');
                    buffer.push_str(head);
                } else {
                    pending = Some((index + 1, head.to_string()));
                }
                continue;
            }

            let (line, text) = match pending.take() {
                Some((line, mut buffer)) => {
                    buffer.push(' ');
                    buffer.push_str(body);
                    (line, buffer)
                }
                None => (index + 1, body.to_string()),
            };
            return Some(logical(text, line, comments));
        }

        // a continuation left open at the end of input still counts
        pending.map(|(line, text)| logical(text, line, comments))
    }
}

fn logical(text: String, line: usize, comments: Vec<String>) -> LogicalLine {
    LogicalLine {
        text: text.trim().to_string(),
        line,
        comment: (!comments.is_empty()).then(|| comments.join(" ")),
    }
}
