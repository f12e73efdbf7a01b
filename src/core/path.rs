//! Suit path codec.
//!
//! Suits are addressed with `/`-separated paths (`physics/constants`) in the
//! public model, while the evaluator sees one flat namespace where `.` is the
//! separator (`physics.constants.c`). `SuitPath` is the single place where
//! the two spellings are translated.
//!
//! ## Usage
//!
//! ```
//! use rummy::core::{split_global, SuitPath};
//!
//! let suit = SuitPath::new("physics/constants");
//! assert_eq!(suit.qualify("c"), "physics.constants.c");
//!
//! let (suit, card) = split_global("physics.constants.c");
//! assert_eq!(suit.as_str(), "physics/constants");
//! assert_eq!(card, "c");
//!
//! let (root, card) = split_global("c");
//! assert!(root.is_root());
//! assert_eq!(card, "c");
//! ```

use serde::{Deserialize, Serialize};

/// Path of the implicit top-level suit.
pub const ROOT_SUIT: &str = "/";

const PUBLIC_SEP: char = '/';
const GLOBAL_SEP: char = '.';

/// Canonical suit path in `/` form. The root suit is `/`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SuitPath(String);

impl SuitPath {
    /// The root suit.
    #[must_use]
    pub fn root() -> Self {
        Self(ROOT_SUIT.to_string())
    }

    /// Normalize a suit path.
    ///
    /// Dots are treated as separators, surrounding separators are dropped,
    /// and an empty path means the root suit.
    #[must_use]
    pub fn new(path: &str) -> Self {
        let normalized: String = path
            .chars()
            .map(|c| if c == GLOBAL_SEP { PUBLIC_SEP } else { c })
            .collect();
        let trimmed = normalized.trim_matches(PUBLIC_SEP);
        if trimmed.is_empty() {
            Self::root()
        } else {
            Self(trimmed.to_string())
        }
    }

    /// Build a path from the evaluator's dotted spelling.
    #[must_use]
    pub fn from_dotted(dotted: &str) -> Self {
        Self::new(dotted)
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == ROOT_SUIT
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The evaluator's spelling of this path, `None` for the root suit.
    #[must_use]
    pub fn to_dotted(&self) -> Option<String> {
        if self.is_root() {
            None
        } else {
            Some(self.0.replace(PUBLIC_SEP, &GLOBAL_SEP.to_string()))
        }
    }

    /// Prefix that turns a local card name into a global one.
    #[must_use]
    pub fn global_prefix(&self) -> String {
        match self.to_dotted() {
            Some(dotted) => format!("{dotted}{GLOBAL_SEP}"),
            None => String::new(),
        }
    }

    /// Global (evaluator) name of a card in this suit.
    #[must_use]
    pub fn qualify(&self, local: &str) -> String {
        format!("{}{}", self.global_prefix(), local)
    }

    /// Strip this suit's prefix from a global name.
    ///
    /// Returns `None` when the global does not belong to this suit.
    #[must_use]
    pub fn localize<'a>(&self, global: &'a str) -> Option<&'a str> {
        global.strip_prefix(self.global_prefix().as_str())
    }

    /// Replace the trailing segment of this path with `rest`.
    ///
    /// `a/b` with `c` gives `a/c`; a single-segment path is replaced entirely,
    /// and an empty `rest` yields the parent.
    #[must_use]
    pub fn sibling(&self, rest: &str) -> Self {
        let parent = match self.0.rsplit_once(PUBLIC_SEP) {
            Some((parent, _)) => parent,
            None => "",
        };
        let rest = rest.trim_matches(PUBLIC_SEP);
        match (parent.is_empty(), rest.is_empty()) {
            (true, _) => Self::new(rest),
            (false, true) => Self::new(parent),
            (false, false) => Self::new(&format!("{parent}{PUBLIC_SEP}{rest}")),
        }
    }
}

impl Default for SuitPath {
    fn default() -> Self {
        Self::root()
    }
}

impl std::fmt::Display for SuitPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SuitPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SuitPath {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl AsRef<str> for SuitPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Split a global name on its last dot into (suit, card name).
#[must_use]
pub fn split_global(global: &str) -> (SuitPath, &str) {
    match global.rsplit_once(GLOBAL_SEP) {
        Some((suit, card)) => (SuitPath::from_dotted(suit), card),
        None => (SuitPath::root(), global),
    }
}
