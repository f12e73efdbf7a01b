//! Deck text compiler.
//!
//! Turns deck text into evaluator statements, one logical line at a time:
//!
//! 1. [`preprocess`] joins continuations and splits off comments
//! 2. [`suit`] resolves `<suit>` headers
//! 3. [`assign`] classifies each remaining line
//! 4. [`slice`] expands slice lines into per-index assignments
//! 5. [`bridge`] moves values between the evaluator and the card store
//!
//! Lines run strictly in order; a card may only reference cards assigned
//! above it. The first error stops compilation.

pub mod assign;
pub mod bridge;
pub mod preprocess;
pub mod scanner;
pub mod slice;
pub mod suit;

use tracing::debug;

use crate::cards::element_name;
use crate::core::{CompilerConfig, DeckError, Result, SourceLocation, SuitPath};
use crate::eval::{Evaluator, Table};

pub use assign::{classify, Statement};
pub use bridge::{Origin, Provenance};
pub use preprocess::{LogicalLine, Preprocessor};
pub use suit::SuitResolver;

const MISSING_EQUALS_HINT: &str = "possibly missing '=' in card declaration";

/// Result of compiling one text.
#[derive(Clone, Debug, Default)]
pub struct Compiled {
    /// Origin of every global assigned by the text.
    pub provenance: Provenance,
    /// Suits declared by headers, in first-seen order.
    pub suits: Vec<SuitPath>,
    /// Number of statements sent to the evaluator.
    pub statements: usize,
}

/// Drives one text through an evaluator.
///
/// ```
/// use rummy::compiler::Compiler;
/// use rummy::core::{CompilerConfig, Value};
/// use rummy::eval::{Evaluator, Interpreter};
///
/// let config = CompilerConfig::default();
/// let mut vm = Interpreter::new();
/// let compiled = Compiler::new(&config, &mut vm)
///     .compile("g = 10\n<suit1>\ncard1 = g * 2\ncard2 = card1 + 1\n")
///     .unwrap();
///
/// assert_eq!(compiled.statements, 3);
/// assert_eq!(vm.globals().get("suit1.card2"), Some(&Value::Number(21.0)));
/// assert_eq!(compiled.provenance["suit1.card2"].line, 4);
/// ```
pub struct Compiler<'a, E: Evaluator> {
    config: &'a CompilerConfig,
    evaluator: &'a mut E,
    suits: SuitResolver,
    locals: Table,
    compiled: Compiled,
}

impl<'a, E: Evaluator> Compiler<'a, E> {
    pub fn new(config: &'a CompilerConfig, evaluator: &'a mut E) -> Self {
        Self {
            config,
            evaluator,
            suits: SuitResolver::new(config),
            locals: Table::default(),
            compiled: Compiled::default(),
        }
    }

    /// Compile a whole text.
    pub fn compile(mut self, text: &str) -> Result<Compiled> {
        for line in Preprocessor::new(text, self.config) {
            self.compile_line(line)?;
        }
        Ok(self.compiled)
    }

    fn compile_line(&mut self, line: LogicalLine) -> Result<()> {
        if self.suits.is_header(&line.text) {
            let suit = self.suits.enter(&line.text, line.line)?.clone();
            debug!(suit = %suit, line = line.line, "entering suit");
            if !self.compiled.suits.contains(&suit) {
                self.compiled.suits.push(suit);
            }
            self.locals.clear();
            return Ok(());
        }

        let at = self.suits.at(line.line);
        let mut comment = line.comment;
        match classify(&line.text, &at)? {
            Statement::Expression(expr) => {
                self.run(expr, &at, Some(MISSING_EQUALS_HINT))?;
            }
            Statement::Scalar { name, value } => {
                self.assign(&name, &value, &at, comment.take())?;
            }
            Statement::VectorLiteral { name, values } => {
                for (i, value) in values.iter().enumerate() {
                    self.assign(&element_name(&name, i), value, &at, comment.take())?;
                }
            }
            Statement::Slice { name, value } => {
                let pairs = slice::expand(&name, &value, &at, |base| self.existing_len(base))?;
                for (name, value) in &pairs {
                    self.assign(name, value, &at, comment.take())?;
                }
            }
        }
        Ok(())
    }

    /// Run one statement, mapping evaluator failures to deck errors.
    fn run(&mut self, statement: &str, at: &SourceLocation, hint: Option<&'static str>) -> Result<Option<String>> {
        debug!(line = at.line, statement, "interpreting");
        self.compiled.statements += 1;
        self.evaluator
            .interpret(statement, Some(&self.locals))
            .map_err(|source| DeckError::Expression {
                at: Some(at.clone()),
                statement: statement.to_string(),
                hint,
                source,
            })
    }

    /// Assign `local` in the current suit and bind it as a local.
    fn assign(&mut self, local: &str, value: &str, at: &SourceLocation, comment: Option<String>) -> Result<()> {
        let suit = self.suits.current().clone();
        let statement = format!("{} = {}", suit.qualify(local), value);
        let key = self
            .run(&statement, at, None)?
            .unwrap_or_else(|| suit.qualify(local));

        let local_key = suit.localize(&key).unwrap_or(local).to_string();
        if let Some(value) = self.evaluator.globals().get(&key).cloned() {
            self.locals.insert(local_key, value);
        }
        self.compiled.provenance.insert(
            key,
            Origin {
                line: at.line,
                comment,
            },
        );
        Ok(())
    }

    /// Length of an already-defined vector visible from the current suit.
    fn existing_len(&self, base: &str) -> Option<usize> {
        let qualified = self.suits.current().qualify(base);
        let globals = self.evaluator.globals();
        let defined = |i: usize| {
            self.locals.contains_key(&element_name(base, i))
                || globals.contains_key(&element_name(&qualified, i))
                || globals.contains_key(&element_name(base, i))
        };
        let len = (0..).take_while(|&i| defined(i)).count();
        (len > 0).then_some(len)
    }
}
