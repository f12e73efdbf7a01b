//! Card system: cards, the suit store, vectors, and deck text output.
//!
//! ## Key Types
//!
//! - `Card`: one named value with its source line and comment
//! - `CardStore`: suit → card mapping with first-seen suit order
//!
//! Vectors are not a separate type. A vector `v` is the run of cards
//! `v[0]`, `v[1]`, ... in one suit; see [`vector`].

pub mod card;
pub mod store;
pub mod vector;
pub mod writer;

pub use card::Card;
pub use store::{CardStore, Suit};
pub use vector::{element_name, natural_order, parse_element_name};
