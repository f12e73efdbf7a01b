//! Suit header resolution.

use crate::core::{CompilerConfig, DeckError, Result, SourceLocation, SuitPath};

use super::scanner::remove_whitespace;

/// Tracks the suit being compiled.
///
/// `previous` is the last suit declared with an absolute name; relative
/// headers (`<../x>`) resolve against it and leave it unchanged.
#[derive(Clone, Debug)]
pub struct SuitResolver {
    current: SuitPath,
    previous: Option<SuitPath>,
    open: char,
    close: char,
}

impl SuitResolver {
    pub fn new(config: &CompilerConfig) -> Self {
        Self {
            current: SuitPath::root(),
            previous: None,
            open: config.suit_open,
            close: config.suit_close,
        }
    }

    #[must_use]
    pub fn current(&self) -> &SuitPath {
        &self.current
    }

    /// Location of `line` within the current suit.
    #[must_use]
    pub fn at(&self, line: usize) -> SourceLocation {
        SourceLocation::new(line, self.current.clone())
    }

    /// Check if a logical line is a suit header.
    #[must_use]
    pub fn is_header(&self, text: &str) -> bool {
        text.starts_with(self.open)
    }

    /// Switch to the suit declared by a header line.
    pub fn enter(&mut self, text: &str, line: usize) -> Result<&SuitPath> {
        let inner = text
            .strip_prefix(self.open)
            .and_then(|rest| rest.split_once(self.close))
            .map(|(inner, _)| inner)
            .ok_or_else(|| DeckError::MalformedSuitHeader {
                at: self.at(line),
                fragment: text.to_string(),
            })?;

        let name = remove_whitespace(inner);
        if name.is_empty() {
            return Err(DeckError::EmptySuitName { at: self.at(line) });
        }

        if let Some(rest) = name.strip_prefix("..") {
            let previous = self
                .previous
                .as_ref()
                .ok_or_else(|| DeckError::DanglingRelativeSuit {
                    at: self.at(line),
                    fragment: name.clone(),
                })?;
            self.current = previous.sibling(rest);
        } else {
            self.current = SuitPath::new(&name);
            self.previous = Some(self.current.clone());
        }
        Ok(&self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> SuitResolver {
        SuitResolver::new(&CompilerConfig::default())
    }

    #[test]
    fn test_absolute_suits() {
        let mut suits = resolver();
        assert!(suits.current().is_root());
        assert_eq!(suits.enter("<suit1>", 1).unwrap().as_str(), "suit1");
        assert_eq!(suits.enter("< a / b >", 2).unwrap().as_str(), "a/b");
        assert_eq!(suits.enter("<a.c>", 3).unwrap().as_str(), "a/c");
    }

    #[test]
    fn test_relative_suit() {
        let mut suits = resolver();
        suits.enter("<a/b>", 1).unwrap();
        assert_eq!(suits.enter("<../c>", 2).unwrap().as_str(), "a/c");
        // the previous absolute suit is still a/b
        assert_eq!(suits.enter("<../d>", 3).unwrap().as_str(), "a/d");
    }

    #[test]
    fn test_header_errors() {
        let mut suits = resolver();
        let err = suits.enter("<foo", 4).unwrap_err();
        assert!(matches!(err, DeckError::MalformedSuitHeader { .. }));
        assert_eq!(err.line(), Some(4));

        assert!(matches!(
            suits.enter("< >", 5),
            Err(DeckError::EmptySuitName { .. })
        ));
        assert!(matches!(
            suits.enter("<../x>", 6),
            Err(DeckError::DanglingRelativeSuit { .. })
        ));
    }

    #[test]
    fn test_custom_delimiters() {
        let config = CompilerConfig::default().with_suit_delimiters('{', '}');
        let mut suits = SuitResolver::new(&config);
        assert!(suits.is_header("{x}"));
        assert!(!suits.is_header("<x>"));
        assert_eq!(suits.enter("{x}", 1).unwrap().as_str(), "x");
    }
}
