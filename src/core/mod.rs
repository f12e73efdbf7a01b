//! Core types: values, suit paths, errors, configuration.
//!
//! These are shared by the evaluator, the compiler and the card store.

pub mod config;
pub mod error;
pub mod path;
pub mod value;

pub use config::CompilerConfig;
pub use error::{DeckError, Result, SourceLocation};
pub use path::{split_global, SuitPath, ROOT_SUIT};
pub use value::{FromValue, Value, ValueKind};
