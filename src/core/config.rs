//! Compiler configuration.
//!
//! The deck syntax uses a handful of delimiter characters. They default to
//! the conventional `#`, `&`, `<` and `>`, and a project can override them
//! when its decks need those characters for something else.

use serde::{Deserialize, Serialize};

/// Deck syntax and output settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Starts a full-line or trailing comment.
    pub comment_char: char,

    /// Last character of a line that continues onto the next line.
    pub continuation_char: char,

    /// Opens a suit header (`<suit>`).
    pub suit_open: char,

    /// Closes a suit header.
    pub suit_close: char,

    /// Fractional digits for non-integral numbers in `write_deck`.
    /// `None` writes the shortest text that parses back to the same value.
    pub precision: Option<usize>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            comment_char: '#',
            continuation_char: '&',
            suit_open: '<',
            suit_close: '>',
            precision: None,
        }
    }
}

impl CompilerConfig {
    /// Use a different comment character.
    #[must_use]
    pub fn with_comment_char(mut self, c: char) -> Self {
        self.comment_char = c;
        self
    }

    /// Use a different continuation character.
    #[must_use]
    pub fn with_continuation_char(mut self, c: char) -> Self {
        self.continuation_char = c;
        self
    }

    /// Use different suit header delimiters.
    #[must_use]
    pub fn with_suit_delimiters(mut self, open: char, close: char) -> Self {
        self.suit_open = open;
        self.suit_close = close;
        self
    }

    /// Write numbers with a fixed number of fractional digits.
    #[must_use]
    pub fn with_precision(mut self, digits: usize) -> Self {
        self.precision = Some(digits);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CompilerConfig::default();
        assert_eq!(config.comment_char, '#');
        assert_eq!(config.continuation_char, '&');
        assert_eq!(config.suit_open, '<');
        assert_eq!(config.suit_close, '>');
        assert_eq!(config.precision, None);
    }

    #[test]
    fn test_builder_pattern() {
        let config = CompilerConfig::default()
            .with_comment_char('!')
            .with_continuation_char('\\')
            .with_suit_delimiters('{', '}')
            .with_precision(6);

        assert_eq!(config.comment_char, '!');
        assert_eq!(config.continuation_char, '\\');
        assert_eq!(config.suit_open, '{');
        assert_eq!(config.suit_close, '}');
        assert_eq!(config.precision, Some(6));
    }

    #[test]
    fn test_serialization() {
        let config = CompilerConfig::default().with_precision(3);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: CompilerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let config: CompilerConfig = serde_json::from_str(r#"{"comment_char":"%"}"#).unwrap();
        assert_eq!(config.comment_char, '%');
        assert_eq!(config.continuation_char, '&');
    }
}
