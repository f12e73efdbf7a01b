//! A single named value and its provenance.

use serde::{Deserialize, Serialize};

use crate::core::{DeckError, FromValue, Result, SuitPath, Value};

/// One named value bound within a suit.
///
/// A card always holds a concrete value; a missing card is reported as
/// `CardNotFound` rather than represented by an empty card.
///
/// ```
/// use rummy::cards::Card;
///
/// let card = Card::new("hearts", "ace", 1.0).with_line(5);
/// assert_eq!(card.suit.as_str(), "hearts");
/// assert_eq!(card.line, Some(5));
/// assert_eq!(card.get::<i32>().unwrap(), 1);
/// assert_eq!(card.to_value_string(None), "1");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Suit holding this card (`/` for top level).
    pub suit: SuitPath,

    /// Unqualified card name, e.g. `card1` or `vec[2]`.
    pub name: String,

    /// Source line the card was compiled from. `None` for cards created
    /// through the store API.
    pub line: Option<usize>,

    value: Value,
    comment: Option<String>,
}

impl Card {
    /// Create a card without provenance.
    pub fn new(suit: impl Into<SuitPath>, name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            suit: suit.into(),
            name: name.into(),
            line: None,
            value: value.into(),
            comment: None,
        }
    }

    /// Set the source line.
    #[must_use]
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Attach a trailing comment. Empty comments are ignored.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.set_comment(comment);
        self
    }

    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    #[must_use]
    pub fn is_string(&self) -> bool {
        self.value.is_string()
    }

    /// Read the value as `T`, failing with `TypeMismatch` on the wrong kind.
    pub fn get<T: FromValue>(&self) -> Result<T> {
        T::from_value(&self.value).ok_or_else(|| DeckError::TypeMismatch {
            suit: self.suit.to_string(),
            name: self.name.clone(),
            expected: T::KIND,
            found: self.value.kind(),
        })
    }

    /// Text of the value as written to a deck, without quotes.
    #[must_use]
    pub fn to_value_string(&self, precision: Option<usize>) -> String {
        self.value.to_deck_string(precision)
    }

    pub(crate) fn set_value(&mut self, value: Value) {
        self.value = value;
    }

    pub(crate) fn set_comment(&mut self, comment: impl Into<String>) {
        let comment = comment.into();
        if !comment.is_empty() {
            self.comment = Some(comment);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ValueKind;

    #[test]
    fn test_card_properties() {
        let card = Card::new("hearts", "ace", 1.0).with_line(5);
        assert_eq!(card.suit, SuitPath::new("hearts"));
        assert_eq!(card.name, "ace");
        assert_eq!(card.line, Some(5));
        assert_eq!(card.get::<f64>().unwrap(), 1.0);
        assert_eq!(card.to_value_string(None), "1");
    }

    #[test]
    fn test_copy_is_identical() {
        let card = Card::new("hearts", "ace", 1.0).with_line(5).with_comment("high");
        let copy = card.clone();
        assert_eq!(copy, card);
        assert_eq!(copy.comment(), Some("high"));
    }

    #[test]
    fn test_value_types() {
        let string_card = Card::new("spades", "king", "face");
        let bool_card = Card::new("clubs", "joker", true);
        let int_card = Card::new("diamonds", "ten", 10);

        assert_eq!(string_card.to_value_string(None), "face");
        assert_eq!(bool_card.to_value_string(None), "true");
        assert_eq!(int_card.to_value_string(None), "10");

        assert_eq!(string_card.get::<String>().unwrap(), "face");
        assert!(bool_card.get::<bool>().unwrap());
        assert_eq!(int_card.get::<i32>().unwrap(), 10);
        assert!(string_card.is_string());
        assert!(!int_card.is_string());
    }

    #[test]
    fn test_type_mismatch() {
        let card = Card::new("suit1", "flag", true);
        match card.get::<f64>() {
            Err(DeckError::TypeMismatch { expected, found, .. }) => {
                assert_eq!(expected, ValueKind::Number);
                assert_eq!(found, ValueKind::Bool);
            }
            other => panic!("expected TypeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_comment_is_ignored() {
        let card = Card::new("/", "x", 1).with_comment("");
        assert_eq!(card.comment(), None);
    }
}
