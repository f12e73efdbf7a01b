//! Precedence-climbing parser for deck statements.
//!
//! Precedence, lowest first: `||`, `&&`, comparisons, `+ -`, `* / %`,
//! unary `- + !`, and right-associative `^`.

use super::lexer::Token;
use super::EvalError;

/// Reference to a (possibly dotted, possibly indexed) name.
#[derive(Clone, Debug, PartialEq)]
pub struct NameRef {
    /// Dotted path, e.g. `suit1.card1`.
    pub path: String,
    /// Optional `[index]` expression.
    pub index: Option<Box<Expr>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

impl BinaryOp {
    /// Operator spelling, for error messages.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Pow => "^",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    Str(String),
    Bool(bool),
    Name(NameRef),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Call(String, Vec<Expr>),
}

/// A parsed statement.
#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    /// `target = expr`
    Assign(NameRef, Expr),
    /// Bare expression, evaluated for its side effects.
    Expr(Expr),
}

/// Parser over a token slice.
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parse one complete statement.
    pub fn parse_statement(mut self) -> Result<Stmt, EvalError> {
        if self.tokens.is_empty() {
            return Err(EvalError::Syntax("empty statement".into()));
        }
        let expr = self.parse_or()?;
        let stmt = if self.eat(&Token::Assign) {
            let target = match expr {
                Expr::Name(name) => name,
                other => {
                    return Err(EvalError::Syntax(format!(
                        "cannot assign to {}",
                        describe(&other)
                    )))
                }
            };
            Stmt::Assign(target, self.parse_or()?)
        } else {
            Stmt::Expr(expr)
        };
        match self.peek() {
            None => Ok(stmt),
            Some(tok) => Err(EvalError::Syntax(format!("unexpected {tok:?} after statement"))),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos);
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), EvalError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(EvalError::Syntax(format!(
                "expected {expected:?}, found {:?}",
                self.peek()
            )))
        }
    }

    fn parse_or(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.parse_and()?;
        while self.eat(&Token::OrOr) {
            let rhs = self.parse_and()?;
            lhs = Expr::Binary(BinaryOp::Or, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.parse_compare()?;
        while self.eat(&Token::AndAnd) {
            let rhs = self.parse_compare()?;
            lhs = Expr::Binary(BinaryOp::And, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_compare(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.parse_additive()?;
        loop {
            let op = match self.peek() {
                Some(Token::Lt) => BinaryOp::Lt,
                Some(Token::Le) => BinaryOp::Le,
                Some(Token::Gt) => BinaryOp::Gt,
                Some(Token::Ge) => BinaryOp::Ge,
                Some(Token::EqEq) => BinaryOp::Eq,
                Some(Token::NotEq) => BinaryOp::Ne,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.parse_additive()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn parse_additive(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.parse_multiplicative()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, EvalError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::Percent) => BinaryOp::Rem,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.parse_unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, EvalError> {
        let op = match self.peek() {
            Some(Token::Minus) => UnaryOp::Neg,
            Some(Token::Plus) => UnaryOp::Plus,
            Some(Token::Bang) => UnaryOp::Not,
            _ => return self.parse_power(),
        };
        self.pos += 1;
        let operand = self.parse_unary()?;
        Ok(Expr::Unary(op, Box::new(operand)))
    }

    fn parse_power(&mut self) -> Result<Expr, EvalError> {
        let base = self.parse_primary()?;
        if self.eat(&Token::Caret) {
            // right-associative; the exponent may carry its own sign
            let exponent = self.parse_unary()?;
            return Ok(Expr::Binary(BinaryOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expr, EvalError> {
        match self.advance().cloned() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::Str(s)) => Ok(Expr::Str(s)),
            Some(Token::LParen) => {
                let inner = self.parse_or()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Some(Token::Ident(first)) => self.parse_name(first),
            Some(tok) => Err(EvalError::Syntax(format!("unexpected {tok:?}"))),
            None => Err(EvalError::Syntax("unexpected end of expression".into())),
        }
    }

    fn parse_name(&mut self, first: String) -> Result<Expr, EvalError> {
        let mut path = first;
        while self.peek() == Some(&Token::Dot) {
            self.pos += 1;
            match self.advance().cloned() {
                Some(Token::Ident(segment)) => {
                    path.push('.');
                    path.push_str(&segment);
                }
                other => {
                    return Err(EvalError::Syntax(format!(
                        "expected a name after '.', found {other:?}"
                    )))
                }
            }
        }

        if self.eat(&Token::LParen) {
            let args = self.parse_args()?;
            return Ok(Expr::Call(path, args));
        }

        if !path.contains('.') {
            match path.as_str() {
                "true" => return Ok(Expr::Bool(true)),
                "false" => return Ok(Expr::Bool(false)),
                _ => {}
            }
        }

        let index = if self.eat(&Token::LBracket) {
            let index = self.parse_or()?;
            self.expect(&Token::RBracket)?;
            Some(Box::new(index))
        } else {
            None
        };
        Ok(Expr::Name(NameRef { path, index }))
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>, EvalError> {
        let mut args = Vec::new();
        if self.eat(&Token::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_or()?);
            if self.eat(&Token::RParen) {
                return Ok(args);
            }
            self.expect(&Token::Comma)?;
        }
    }
}

fn describe(expr: &Expr) -> &'static str {
    match expr {
        Expr::Number(_) | Expr::Str(_) | Expr::Bool(_) => "a literal",
        Expr::Call(..) => "a function call",
        _ => "an expression",
    }
}
