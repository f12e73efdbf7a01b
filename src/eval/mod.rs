//! Expression evaluation.
//!
//! The deck compiler treats the evaluator as a black box behind the
//! [`Evaluator`] trait: it hands over one statement at a time together with
//! the current suit's local table, and reads results back from the
//! persistent global table.
//!
//! ## Key Types
//!
//! - `Evaluator`: the boundary trait the compiler calls into
//! - `Table`: name → value mapping used for globals and locals
//! - `Interpreter`: the default evaluator (lexer, parser, tree walker)
//!
//! ## Language
//!
//! Deck values are whitespace-stripped before evaluation, so every operator
//! is symbolic: `+ - * / % ^ ** < <= > >= == != && || !`. Names may be
//! dotted (`suit.card`) and indexed (`vec[2]`); built-in functions are
//! `print`, `sqrt`, `abs`, `exp`, `log`, `log10`, `sin`, `cos`, `tan`,
//! `floor`, `ceil`, `min`, `max` and `pow`.

pub mod interp;
pub mod lexer;
pub mod parser;

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::core::{Value, ValueKind};

pub use interp::Interpreter;
pub use lexer::{Lexer, Token};
pub use parser::{BinaryOp, Expr, NameRef, Parser, Stmt, UnaryOp};

/// Name → value table. Globals use dotted names, locals unqualified ones.
pub type Table = FxHashMap<String, Value>;

/// Errors raised while interpreting a statement.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum EvalError {
    #[error("unexpected character '{ch}' at column {column}")]
    UnexpectedChar { ch: char, column: usize },

    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),

    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("undefined name '{0}'")]
    UndefinedName(String),

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    #[error("function '{name}' expects {expected} argument(s), got {found}")]
    Arity {
        name: String,
        expected: &'static str,
        found: usize,
    },

    #[error("'{op}' expects {expected}, got a {found}")]
    TypeMismatch {
        op: &'static str,
        expected: &'static str,
        found: ValueKind,
    },

    #[error("index {0} is not a non-negative integer")]
    InvalidIndex(f64),
}

/// Boundary between the deck compiler and an expression engine.
///
/// Implementations keep a persistent global table across calls. Locals are
/// owned by the caller and only live for one suit.
pub trait Evaluator {
    /// Interpret one statement or expression.
    ///
    /// On success returns the global name that was assigned, or `None` for a
    /// bare expression. Index expressions in the target are normalized, so
    /// `v[1+1] = 3` reports `v[2]`.
    fn interpret(&mut self, statement: &str, locals: Option<&Table>) -> Result<Option<String>, EvalError>;

    /// The persistent global table.
    fn globals(&self) -> &Table;

    /// Mutable access to the persistent global table.
    fn globals_mut(&mut self) -> &mut Table;
}
