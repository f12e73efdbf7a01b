//! Translation between the evaluator's flat global table and the card store.
//!
//! The evaluator sees every card under its dotted global name
//! (`suit.sub.card`). Before a build the store is copied into the globals;
//! afterwards every global is split on its last dot and written back as a
//! card, together with the line and comment it was compiled from.

use rustc_hash::FxHashMap;

use crate::cards::{Card, CardStore};
use crate::core::split_global;
use crate::eval::Table;

/// Where a global was last assigned during a build.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Origin {
    pub line: usize,
    pub comment: Option<String>,
}

/// Global name → origin of its latest assignment.
pub type Provenance = FxHashMap<String, Origin>;

/// Replace the evaluator's globals with the cards of `store`.
pub fn seed_globals(store: &CardStore, globals: &mut Table) {
    globals.clear();
    for card in store.iter() {
        globals.insert(card.suit.qualify(&card.name), card.value().clone());
    }
}

/// Write every global back into the store.
///
/// Globals assigned during the build become fresh cards carrying their
/// origin. Other globals update the value of an existing card, keeping its
/// line and comment, or become new cards without provenance. Globals are
/// visited by line, so suits first created here are ordered by where they
/// were first assigned.
///
/// Returns the number of cards written.
pub fn rehydrate(globals: &Table, provenance: &Provenance, store: &mut CardStore) -> usize {
    let mut entries: Vec<_> = globals.iter().collect();
    entries.sort_by(|(a, _), (b, _)| {
        let line_of = |name: &str| provenance.get(name).map_or(usize::MAX, |origin| origin.line);
        line_of(a.as_str()).cmp(&line_of(b.as_str())).then_with(|| a.cmp(b))
    });

    for (global, value) in &entries {
        let (suit, name) = split_global(global);
        let card = match (provenance.get(global.as_str()), store.get_card(suit.as_str(), name)) {
            (Some(origin), _) => {
                let card = Card::new(suit, name, (*value).clone()).with_line(origin.line);
                match &origin.comment {
                    Some(comment) => card.with_comment(comment.as_str()),
                    None => card,
                }
            }
            (None, Ok(existing)) => {
                let mut card = existing.clone();
                card.set_value((*value).clone());
                card
            }
            (None, Err(_)) => Card::new(suit, name, (*value).clone()),
        };
        store.insert_card(card);
    }
    entries.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Value;

    #[test]
    fn test_seed_uses_dotted_names() {
        let mut store = CardStore::new();
        store.add_card("/", "g", 1, None);
        store.add_card("a/b", "v[0]", 2, None);

        let mut globals = Table::default();
        globals.insert("stale".to_string(), Value::Bool(true));
        seed_globals(&store, &mut globals);

        assert_eq!(globals.len(), 2);
        assert_eq!(globals.get("g"), Some(&Value::Number(1.0)));
        assert_eq!(globals.get("a.b.v[0]"), Some(&Value::Number(2.0)));
    }

    #[test]
    fn test_rehydrate_with_provenance() {
        let mut globals = Table::default();
        globals.insert("suit1.card1".to_string(), Value::Number(30.0));
        globals.insert("global1".to_string(), Value::Number(10.0));

        let mut provenance = Provenance::default();
        provenance.insert(
            "suit1.card1".to_string(),
            Origin {
                line: 4,
                comment: Some("sum".to_string()),
            },
        );

        let mut store = CardStore::new();
        assert_eq!(rehydrate(&globals, &provenance, &mut store), 2);

        let card = store.get_card("suit1", "card1").unwrap();
        assert_eq!(card.line, Some(4));
        assert_eq!(card.comment(), Some("sum"));
        assert_eq!(store.get_card("/", "global1").unwrap().line, None);
    }

    #[test]
    fn test_rehydrate_keeps_existing_provenance() {
        let mut store = CardStore::new();
        store.insert_card(Card::new("s", "x", 1).with_line(2).with_comment("keep"));

        let mut globals = Table::default();
        globals.insert("s.x".to_string(), Value::Number(5.0));
        rehydrate(&globals, &Provenance::default(), &mut store);

        let card = store.get_card("s", "x").unwrap();
        assert_eq!(card.get::<f64>().unwrap(), 5.0);
        assert_eq!(card.line, Some(2));
        assert_eq!(card.comment(), Some("keep"));
    }
}
