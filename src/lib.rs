//! # rummy
//!
//! A compiler for hierarchical input decks: human-written configuration text
//! becomes a typed, queryable namespace of named values.
//!
//! ```text
//! # physical constants
//! c = 3e8                      # speed of light
//!
//! <materials/steel>
//! density = 7850
//! moduli = 200e9, 80e9
//! scaled[:] = moduli[:2] / c
//!
//! <../copper>
//! density = materials.steel.density * 1.14
//! ```
//!
//! ## Design Principles
//!
//! 1. **Top-Down Visibility**: a value may reference anything assigned above
//!    it, in its own suit by bare name or in any suit by dotted name.
//!
//! 2. **Typed Errors**: malformed input is reported as a [`DeckError`] with
//!    the line and suit it came from. The first error stops the build.
//!
//! 3. **Pluggable Evaluation**: expressions run through the [`Evaluator`]
//!    trait. The built-in [`Interpreter`] covers arithmetic, comparisons,
//!    logic, strings and a few math functions.
//!
//! ## Data Model
//!
//! - **Suit**: a `/`-separated namespace node; the root suit is `/`
//! - **Card**: one named value in a suit, with its source line and comment
//! - **Vector**: the cards `v[0]`, `v[1]`, ... of one suit
//!
//! ## Modules
//!
//! - `core`: values, suit paths, errors, configuration
//! - `eval`: the evaluator trait and the default interpreter
//! - `compiler`: preprocessing, suit resolution, assignment expansion
//! - `cards`: cards, the card store, vectors, deck text output
//! - `deck`: the `Deck` facade tying them together

pub mod core;
pub mod eval;
pub mod compiler;
pub mod cards;
pub mod deck;

// Re-export commonly used types
pub use crate::core::{
    CompilerConfig,
    DeckError, Result, SourceLocation,
    SuitPath, ROOT_SUIT,
    FromValue, Value, ValueKind,
};

pub use crate::eval::{EvalError, Evaluator, Interpreter, Table};

pub use crate::cards::{Card, CardStore};

pub use crate::deck::Deck;
