//! Error taxonomy for deck compilation and card lookup.
//!
//! Parse errors carry a [`SourceLocation`] (line number and the suit being
//! compiled) plus the offending fragment. The first error stops a build.

use std::path::PathBuf;

use thiserror::Error;

use crate::eval::EvalError;

use super::{SuitPath, ValueKind};

/// Where in the input deck an error was detected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceLocation {
    /// 1-based line number of the (first raw line of the) logical line.
    pub line: usize,
    /// Suit being compiled at that line.
    pub suit: SuitPath,
}

impl SourceLocation {
    pub fn new(line: usize, suit: SuitPath) -> Self {
        Self { line, suit }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {} in suit '{}'", self.line, self.suit)
    }
}

/// Errors produced by building or querying a deck.
#[derive(Debug, Error)]
pub enum DeckError {
    #[error("could not open file '{}'", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("missing '>' in suit declaration '{fragment}' at {at}")]
    MalformedSuitHeader { at: SourceLocation, fragment: String },

    #[error("empty suit name at {at}")]
    EmptySuitName { at: SourceLocation },

    #[error("relative suit '{fragment}' has no previous suit to resolve against at {at}")]
    DanglingRelativeSuit { at: SourceLocation, fragment: String },

    #[error("malformed vector syntax '{fragment}' at {at}")]
    MalformedVectorSyntax { at: SourceLocation, fragment: String },

    #[error("invalid card name '{fragment}' at {at}: card names cannot contain ','")]
    InvalidCardName { at: SourceLocation, fragment: String },

    #[error("missing closing quote in '{fragment}' at {at}")]
    UnterminatedQuote { at: SourceLocation, fragment: String },

    #[error("empty name or value in assignment '{fragment}' at {at}")]
    EmptyAssignment { at: SourceLocation, fragment: String },

    #[error("must specify upper bound in vector slice '{fragment}' at {at}")]
    MissingSliceUpperBound { at: SourceLocation, fragment: String },

    #[error("slice bound '{fragment}' is not a non-negative integer at {at}")]
    InvalidSliceBound { at: SourceLocation, fragment: String },

    #[error("more card names ({names}) than values ({values}) at {at}")]
    SliceLengthMismatch {
        at: SourceLocation,
        names: usize,
        values: usize,
    },

    #[error("failed to compile expression '{statement}'{}{}", location_suffix(.at), hint_suffix(.hint))]
    Expression {
        at: Option<SourceLocation>,
        statement: String,
        hint: Option<&'static str>,
        #[source]
        source: EvalError,
    },

    #[error("suit '{suit}' not found in the deck")]
    SuitNotFound { suit: String },

    #[error("card '{name}' not found in suit '{suit}'")]
    CardNotFound { suit: String, name: String },

    #[error("card '{suit}/{name}' holds a {found}, not a {expected}")]
    TypeMismatch {
        suit: String,
        name: String,
        expected: ValueKind,
        found: ValueKind,
    },
}

fn location_suffix(at: &Option<SourceLocation>) -> String {
    match at {
        Some(at) => format!(" at {at}"),
        None => String::new(),
    }
}

fn hint_suffix(hint: &Option<&'static str>) -> String {
    match hint {
        Some(hint) => format!("; {hint}"),
        None => String::new(),
    }
}

impl DeckError {
    /// Source location of a parse error, if the error has one.
    #[must_use]
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            DeckError::MalformedSuitHeader { at, .. }
            | DeckError::EmptySuitName { at }
            | DeckError::DanglingRelativeSuit { at, .. }
            | DeckError::MalformedVectorSyntax { at, .. }
            | DeckError::InvalidCardName { at, .. }
            | DeckError::UnterminatedQuote { at, .. }
            | DeckError::EmptyAssignment { at, .. }
            | DeckError::MissingSliceUpperBound { at, .. }
            | DeckError::InvalidSliceBound { at, .. }
            | DeckError::SliceLengthMismatch { at, .. } => Some(at),
            DeckError::Expression { at, .. } => at.as_ref(),
            _ => None,
        }
    }

    /// Line number of a parse error, if the error has one.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        self.location().map(|at| at.line)
    }

    pub(crate) fn suit_not_found(suit: &str) -> Self {
        DeckError::SuitNotFound {
            suit: suit.to_string(),
        }
    }

    pub(crate) fn card_not_found(suit: &str, name: &str) -> Self {
        DeckError::CardNotFound {
            suit: suit.to_string(),
            name: name.to_string(),
        }
    }
}

/// Result alias for deck operations.
pub type Result<T> = std::result::Result<T, DeckError>;
