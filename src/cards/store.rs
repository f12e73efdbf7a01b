//! Two-level suit → card store.
//!
//! The `CardStore` maps suit paths to their cards and remembers the order
//! in which suits were first seen, so a deck can be written back out in
//! its original layout. The root suit `/` is always present.

use std::collections::BTreeMap;

use tracing::warn;

use crate::core::{DeckError, FromValue, Result, SuitPath, Value};

use super::card::Card;
use super::vector::natural_order;

/// Cards of one suit, keyed by card name.
pub type Suit = BTreeMap<String, Card>;

/// Store of all cards in a deck.
///
/// ## Example
///
/// ```
/// use rummy::cards::CardStore;
///
/// let mut store = CardStore::new();
/// store.add_card("suit1", "card5", 7.77, None);
///
/// let card = store.get_card("suit1", "card5").unwrap();
/// assert_eq!(card.name, "card5");
/// assert_eq!(store.get_card_value::<f64>("suit1", "card5").unwrap(), 7.77);
/// assert!(store.get_card("suit1", "missing").is_err());
/// ```
#[derive(Clone, Debug)]
pub struct CardStore {
    suits: BTreeMap<SuitPath, Suit>,
    order: Vec<SuitPath>,
}

impl Default for CardStore {
    fn default() -> Self {
        let mut store = Self {
            suits: BTreeMap::new(),
            order: Vec::new(),
        };
        store.ensure_suit(&SuitPath::root());
        store
    }
}

impl CardStore {
    /// Create a store holding only the empty root suit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a suit, appending it to the suit order when new.
    pub(crate) fn ensure_suit(&mut self, suit: &SuitPath) -> &mut Suit {
        if !self.suits.contains_key(suit) {
            self.order.push(suit.clone());
        }
        self.suits.entry(suit.clone()).or_default()
    }

    /// Add a card, overwriting any card of the same name.
    ///
    /// The suit is created if it does not exist yet. An empty comment is
    /// ignored, as in [`update_card`](Self::update_card).
    pub fn add_card(&mut self, suit: &str, name: &str, value: impl Into<Value>, comment: Option<&str>) {
        let mut card = Card::new(suit, name, value);
        if let Some(comment) = comment {
            card.set_comment(comment);
        }
        self.insert_card(card);
    }

    /// Insert a fully-formed card (keeping its line and comment).
    pub fn insert_card(&mut self, card: Card) {
        let suit = card.suit.clone();
        self.ensure_suit(&suit).insert(card.name.clone(), card);
    }

    /// Get a card by suit and name.
    pub fn get_card(&self, suit: &str, name: &str) -> Result<&Card> {
        self.find_suit(suit)?
            .get(name)
            .ok_or_else(|| DeckError::card_not_found(suit, name))
    }

    pub(crate) fn get_card_mut(&mut self, suit: &str, name: &str) -> Result<&mut Card> {
        self.suits
            .get_mut(&SuitPath::new(suit))
            .ok_or_else(|| DeckError::suit_not_found(suit))?
            .get_mut(name)
            .ok_or_else(|| DeckError::card_not_found(suit, name))
    }

    /// Get a card's value as `T`.
    pub fn get_card_value<T: FromValue>(&self, suit: &str, name: &str) -> Result<T> {
        self.get_card(suit, name)?.get()
    }

    /// Get a card's value, adding the card with `default` when it is absent.
    ///
    /// This is the only lookup that does not report a missing card. A card
    /// that exists with the wrong kind still fails with `TypeMismatch`.
    pub fn get_or_add_card_value<T>(&mut self, suit: &str, name: &str, default: T) -> Result<T>
    where
        T: FromValue + Into<Value>,
    {
        if self.card_exists(suit, name) {
            return self.get_card_value(suit, name);
        }
        let card = Card::new(suit, name, default);
        let value = card.get()?;
        self.insert_card(card);
        Ok(value)
    }

    /// Replace the value of an existing card.
    ///
    /// The source line is kept. The comment is replaced only when `comment`
    /// is non-empty.
    pub fn update_card(
        &mut self,
        suit: &str,
        name: &str,
        value: impl Into<Value>,
        comment: Option<&str>,
    ) -> Result<()> {
        let card = self.get_card_mut(suit, name)?;
        card.set_value(value.into());
        if let Some(comment) = comment {
            card.set_comment(comment);
        }
        Ok(())
    }

    /// Remove a card and return it.
    pub fn remove_card(&mut self, suit: &str, name: &str) -> Result<Card> {
        self.suits
            .get_mut(&SuitPath::new(suit))
            .ok_or_else(|| DeckError::suit_not_found(suit))?
            .remove(name)
            .ok_or_else(|| DeckError::card_not_found(suit, name))
    }

    /// Cards of a suit, if it exists.
    #[must_use]
    pub fn suit(&self, suit: &str) -> Option<&Suit> {
        self.suits.get(&SuitPath::new(suit))
    }

    /// Exact suit lookup.
    pub fn find_suit(&self, suit: &str) -> Result<&Suit> {
        self.suits
            .get(&SuitPath::new(suit))
            .ok_or_else(|| DeckError::suit_not_found(suit))
    }

    /// Cards of every suit whose path contains `pattern`.
    ///
    /// One `*` is removed from the pattern before matching, so `phys*` and
    /// `phys` behave the same. This is a substring match, not a glob.
    #[must_use]
    pub fn find_suit_fuzzy(&self, pattern: &str) -> Vec<&Card> {
        let needle = strip_wildcard(pattern);
        let result: Vec<&Card> = self
            .suits
            .iter()
            .filter(|(path, _)| path.as_str().contains(needle.as_str()))
            .flat_map(|(_, cards)| cards.values())
            .collect();
        if result.is_empty() {
            warn!(pattern = %needle, "no suits matching pattern found in the deck");
        }
        result
    }

    /// Cards of a suit sorted by the line they were defined on.
    ///
    /// With `fuzzy` the suit is matched as in [`find_suit_fuzzy`](Self::find_suit_fuzzy).
    /// An exact lookup of a missing suit fails, except for the root suit.
    pub fn find_suit_in_order(&self, suit: &str, fuzzy: bool) -> Result<Vec<&Card>> {
        let mut cards: Vec<&Card> = if fuzzy {
            self.find_suit_fuzzy(suit)
        } else {
            match self.find_suit(suit) {
                Ok(cards) => cards.values().collect(),
                Err(_) if SuitPath::new(suit).is_root() => Vec::new(),
                Err(e) => return Err(e),
            }
        };
        cards.sort_by(|a, b| a.line.cmp(&b.line).then_with(|| natural_order(&a.name, &b.name)));
        Ok(cards)
    }

    /// Cards of a suit whose name contains `pattern`.
    pub fn find_card_fuzzy(&self, suit: &str, pattern: &str) -> Result<Vec<&Card>> {
        Ok(self
            .find_suit(suit)?
            .values()
            .filter(|card| card.name.contains(pattern))
            .collect())
    }

    #[must_use]
    pub fn suit_exists(&self, suit: &str) -> bool {
        self.suits.contains_key(&SuitPath::new(suit))
    }

    #[must_use]
    pub fn card_exists(&self, suit: &str, name: &str) -> bool {
        self.suits
            .get(&SuitPath::new(suit))
            .is_some_and(|cards| cards.contains_key(name))
    }

    /// Suit paths in first-seen order, starting with the root.
    pub fn suits(&self) -> impl Iterator<Item = &SuitPath> {
        self.order.iter()
    }

    /// Number of suits, including the root.
    #[must_use]
    pub fn suit_count(&self) -> usize {
        self.suits.len()
    }

    /// Total number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.suits.values().map(BTreeMap::len).sum()
    }

    /// Check if the store holds no cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.suits.values().all(BTreeMap::is_empty)
    }

    /// All cards, suit by suit in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.order
            .iter()
            .filter_map(|suit| self.suits.get(suit))
            .flat_map(|cards| cards.values())
    }
}

fn strip_wildcard(pattern: &str) -> String {
    pattern.replacen('*', "", 1)
}
