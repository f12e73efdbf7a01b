//! The `Deck`: compiler, evaluator and card store behind one API.
//!
//! ## Usage
//!
//! ```
//! use rummy::Deck;
//!
//! let mut deck = Deck::new();
//! deck.build("global1 = 10\nglobal2 = 20\n<suit1>\ncard1 = global1 + global2\n").unwrap();
//! assert_eq!(deck.get_card_value::<f64>("suit1", "card1").unwrap(), 30.0);
//!
//! // later builds see earlier cards
//! deck.build("<suit2>\ncard2 = suit1.card1 * 2\n").unwrap();
//! assert_eq!(deck.get_card_value::<f64>("suit2", "card2").unwrap(), 60.0);
//! ```
//!
//! ## Builds
//!
//! Each build copies the card store into the evaluator's globals, compiles
//! the text, then writes every global back into the store. A failed build
//! leaves the store as it was.

use std::io;
use std::path::Path;

use tracing::info;

use crate::cards::{Card, CardStore};
use crate::compiler::bridge::{rehydrate, seed_globals};
use crate::compiler::{Compiler, Provenance};
use crate::core::{CompilerConfig, DeckError, FromValue, Result};
use crate::eval::{Evaluator, Interpreter};

/// A compiled input deck.
#[derive(Clone, Debug)]
pub struct Deck<E: Evaluator = Interpreter> {
    config: CompilerConfig,
    evaluator: E,
    cards: CardStore,
}

impl Default for Deck<Interpreter> {
    fn default() -> Self {
        Self::new()
    }
}

impl Deck<Interpreter> {
    /// Create an empty deck using the built-in interpreter.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(CompilerConfig::default())
    }

    /// Create an empty deck with custom syntax settings.
    #[must_use]
    pub fn with_config(config: CompilerConfig) -> Self {
        Self::with_evaluator(Interpreter::new(), config)
    }
}

impl<E: Evaluator> Deck<E> {
    /// Create an empty deck around a custom evaluator.
    pub fn with_evaluator(evaluator: E, config: CompilerConfig) -> Self {
        Self {
            config,
            evaluator,
            cards: CardStore::new(),
        }
    }

    /// Compile `text` into the deck.
    ///
    /// On error the store is unchanged and the evaluator's globals are reset
    /// to the store, so nothing from the failed text survives.
    pub fn build(&mut self, text: &str) -> Result<()> {
        seed_globals(&self.cards, self.evaluator.globals_mut());
        let compiled = match Compiler::new(&self.config, &mut self.evaluator).compile(text) {
            Ok(compiled) => compiled,
            Err(e) => {
                seed_globals(&self.cards, self.evaluator.globals_mut());
                return Err(e);
            }
        };

        for suit in &compiled.suits {
            self.cards.ensure_suit(suit);
        }
        let written = rehydrate(self.evaluator.globals(), &compiled.provenance, &mut self.cards);
        info!(
            statements = compiled.statements,
            cards = written,
            suits = self.cards.suit_count(),
            "deck built"
        );
        Ok(())
    }

    /// Compile `prepend` as its own build, then `text`.
    ///
    /// Used to inject externally supplied constants ahead of a deck. If
    /// either part fails, neither is kept.
    pub fn build_with_prepend(&mut self, text: &str, prepend: &str) -> Result<()> {
        let snapshot = self.cards.clone();
        let result = self.build(prepend).and_then(|()| self.build(text));
        if result.is_err() {
            self.cards = snapshot;
            seed_globals(&self.cards, self.evaluator.globals_mut());
        }
        result
    }

    /// Read and compile a deck file, optionally after `prepend`.
    pub fn build_file(&mut self, path: impl AsRef<Path>, prepend: Option<&str>) -> Result<()> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DeckError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;
        match prepend {
            Some(prepend) => self.build_with_prepend(&text, prepend),
            None => self.build(&text),
        }
    }

    /// Run one fully qualified statement directly against the evaluator.
    ///
    /// The card store is not touched; call [`update_deck`](Self::update_deck)
    /// to pull the result in.
    pub fn recompile_card(&mut self, statement: &str) -> Result<()> {
        self.evaluator
            .interpret(statement, None)
            .map(|_| ())
            .map_err(|source| DeckError::Expression {
                at: None,
                statement: statement.to_string(),
                hint: None,
                source,
            })
    }

    /// Sync the card store from the evaluator's globals without parsing.
    ///
    /// Existing cards keep their line and comment.
    pub fn update_deck(&mut self) {
        let written = rehydrate(self.evaluator.globals(), &Provenance::default(), &mut self.cards);
        info!(cards = written, "deck updated from evaluator");
    }

    #[must_use]
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    #[must_use]
    pub fn cards(&self) -> &CardStore {
        &self.cards
    }

    /// Mutable access to the card store. Changes are seen by the next build.
    pub fn cards_mut(&mut self) -> &mut CardStore {
        &mut self.cards
    }

    #[must_use]
    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    pub fn evaluator_mut(&mut self) -> &mut E {
        &mut self.evaluator
    }

    pub fn get_card(&self, suit: &str, name: &str) -> Result<&Card> {
        self.cards.get_card(suit, name)
    }

    pub fn get_card_value<T: FromValue>(&self, suit: &str, name: &str) -> Result<T> {
        self.cards.get_card_value(suit, name)
    }

    pub fn get_vector<T: FromValue>(&self, suit: &str, base: &str) -> Result<Vec<T>> {
        self.cards.get_vector(suit, base)
    }

    /// Write the deck text using the configured number precision.
    pub fn write_deck<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        self.cards.write_deck_with(out, self.config.precision)
    }

    /// Deck text using the configured number precision.
    #[must_use]
    pub fn to_deck_string(&self) -> String {
        self.cards.to_deck_string(self.config.precision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Value;

    #[test]
    fn test_failed_build_leaves_store() {
        let mut deck = Deck::new();
        deck.build("a = 1\n").unwrap();
        assert!(deck.build("b = 2\nc = missing\n").is_err());
        assert!(!deck.cards().card_exists("/", "b"));
        assert_eq!(deck.get_card_value::<f64>("/", "a").unwrap(), 1.0);

        // the half-built globals do not leak into the next build
        deck.build("d = 3\n").unwrap();
        assert!(!deck.cards().card_exists("/", "b"));
    }

    #[test]
    fn test_failed_build_leaves_nothing_to_update() {
        let mut deck = Deck::new();
        deck.build("a = 1
").unwrap();
        assert!(deck.build("b = 2
c = missing
").is_err());
        assert!(!deck.evaluator().globals().contains_key("b"));

        deck.update_deck();
        assert!(!deck.cards().card_exists("/", "b"));
        assert_eq!(deck.cards().len(), 1);
    }

    #[test]
    fn test_failed_prepend_build_is_discarded() {
        let mut deck = Deck::new();
        deck.build("a = 1
").unwrap();

        assert!(deck.build_with_prepend("x = nope
", "c = 3
<extra>
d = 4
").is_err());
        assert!(!deck.cards().card_exists("/", "c"));
        assert!(!deck.cards().suit_exists("extra"));
        assert!(!deck.evaluator().globals().contains_key("c"));

        deck.update_deck();
        assert!(!deck.cards().card_exists("/", "c"));
        assert_eq!(deck.get_card_value::<f64>("/", "a").unwrap(), 1.0);
    }

    #[test]
    fn test_store_edits_reach_next_build() {
        let mut deck = Deck::new();
        deck.build("a = 1\n").unwrap();
        deck.cards_mut().update_card("/", "a", 5, None).unwrap();
        deck.build("b = a * 2\n").unwrap();
        assert_eq!(deck.get_card_value::<f64>("/", "b").unwrap(), 10.0);

        deck.cards_mut().remove_card("/", "b").unwrap();
        deck.build("c = 1\n").unwrap();
        assert!(!deck.cards().card_exists("/", "b"));
    }

    #[test]
    fn test_recompile_and_update() {
        let mut deck = Deck::new();
        deck.build("<s>\nx = 1  # one\n").unwrap();

        deck.recompile_card("s.x = 42").unwrap();
        assert_eq!(deck.get_card_value::<f64>("s", "x").unwrap(), 1.0);
        assert_eq!(deck.evaluator().globals().get("s.x"), Some(&Value::Number(42.0)));

        deck.update_deck();
        let card = deck.get_card("s", "x").unwrap();
        assert_eq!(card.get::<f64>().unwrap(), 42.0);
        assert_eq!(card.line, Some(2));
        assert_eq!(card.comment(), Some("one"));

        assert!(matches!(
            deck.recompile_card("s.y = nope"),
            Err(DeckError::Expression { at: None, .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let mut deck = Deck::new();
        let err = deck.build_file("/definitely/not/here.deck", None).unwrap_err();
        assert!(matches!(err, DeckError::FileOpen { .. }));
    }
}
