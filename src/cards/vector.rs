//! Vectors as runs of indexed sibling cards.
//!
//! A vector `v` in a suit is stored as the cards `v[0]`, `v[1]`, ... with
//! contiguous zero-based indices.

use std::cmp::Ordering;

use crate::core::{DeckError, FromValue, Result, Value};

use super::store::CardStore;

/// Card name of element `index` of vector `base`.
#[must_use]
pub fn element_name(base: &str, index: usize) -> String {
    format!("{base}[{index}]")
}

/// Split `base[N]` into `(base, N)`.
#[must_use]
pub fn parse_element_name(name: &str) -> Option<(&str, usize)> {
    let inner = name.strip_suffix(']')?;
    let (base, index) = inner.rsplit_once('[')?;
    if base.is_empty() || index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((base, index.parse().ok()?))
}

/// Name ordering that sorts `v[2]` before `v[10]`.
#[must_use]
pub fn natural_order(a: &str, b: &str) -> Ordering {
    match (parse_element_name(a), parse_element_name(b)) {
        (Some((base_a, i)), Some((base_b, j))) => base_a.cmp(base_b).then(i.cmp(&j)),
        (Some((base_a, _)), None) => base_a.cmp(b).then(Ordering::Greater),
        (None, Some((base_b, _))) => a.cmp(base_b).then(Ordering::Less),
        (None, None) => a.cmp(b),
    }
}

impl CardStore {
    /// Assemble vector `base` of a suit.
    ///
    /// Elements are read from `base[0]` upward until the first missing index.
    /// A vector without a `base[0]` card is reported as `CardNotFound`.
    pub fn get_vector<T: FromValue>(&self, suit: &str, base: &str) -> Result<Vec<T>> {
        let cards = self.find_suit(suit)?;
        if !cards.contains_key(&element_name(base, 0)) {
            return Err(DeckError::card_not_found(suit, base));
        }
        (0..)
            .map_while(|i| cards.get(&element_name(base, i)))
            .map(|card| card.get())
            .collect()
    }

    /// Overwrite the first `values.len()` elements of an existing vector.
    ///
    /// Elements beyond the new values keep their old values. Every targeted
    /// element must already exist; nothing is changed if one is missing.
    pub fn update_vector<T, I>(&mut self, suit: &str, base: &str, values: I) -> Result<()>
    where
        T: Into<Value>,
        I: IntoIterator<Item = T>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        for i in 0..values.len() {
            self.get_card(suit, &element_name(base, i))?;
        }
        for (i, value) in values.into_iter().enumerate() {
            self.update_card(suit, &element_name(base, i), value, None)?;
        }
        Ok(())
    }

    /// Add (or overwrite) the elements `base[0..]` of a vector.
    pub fn add_vector<T, I>(&mut self, suit: &str, base: &str, values: I)
    where
        T: Into<Value>,
        I: IntoIterator<Item = T>,
    {
        for (i, value) in values.into_iter().enumerate() {
            self.add_card(suit, &element_name(base, i), value, None);
        }
    }
}
