//! Deck text serialization.

use std::io;

use crate::core::SuitPath;

use super::card::Card;
use super::store::CardStore;
use super::vector::natural_order;

impl CardStore {
    /// Write the store back out as deck text.
    ///
    /// Suits appear in first-seen order, each followed by a blank line. The
    /// root suit has no header and is skipped entirely when empty.
    pub fn write_deck<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        self.write_deck_with(out, None)
    }

    /// Like [`write_deck`](Self::write_deck), with numbers printed at a fixed
    /// number of significant decimals.
    pub fn write_deck_with<W: io::Write>(&self, out: &mut W, precision: Option<usize>) -> io::Result<()> {
        out.write_all(self.to_deck_string(precision).as_bytes())
    }

    /// Deck text of the whole store.
    #[must_use]
    pub fn to_deck_string(&self, precision: Option<usize>) -> String {
        let mut text = String::new();
        for suit in self.suits() {
            let Some(cards) = self.suit(suit.as_str()) else {
                continue;
            };
            if suit.is_root() && cards.is_empty() {
                continue;
            }
            push_header(&mut text, suit);
            let mut cards: Vec<&Card> = cards.values().collect();
            cards.sort_by(|a, b| natural_order(&a.name, &b.name));
            for card in cards {
                push_card(&mut text, card, precision);
            }
            text.push('\n');
        }
        text
    }
}

fn push_header(text: &mut String, suit: &SuitPath) {
    if !suit.is_root() {
        text.push('<');
        text.push_str(suit.as_str());
        text.push_str(">\n");
    }
}

fn push_card(text: &mut String, card: &Card, precision: Option<usize>) {
    text.push_str(&card.name);
    text.push_str(" = ");
    let value = card.to_value_string(precision);
    if card.is_string() {
        text.push('"');
        text.push_str(&value);
        text.push('"');
    } else {
        text.push_str(&value);
    }
    if let Some(comment) = card.comment() {
        text.push_str("  # ");
        text.push_str(comment);
    }
    text.push('\n');
}
