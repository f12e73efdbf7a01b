//! Tokenizer for deck expressions.

use super::EvalError;

/// A lexical token.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Number(f64),
    Str(String),
    Ident(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Dot,
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Lt,
    Le,
    Gt,
    Ge,
    EqEq,
    NotEq,
    AndAnd,
    OrOr,
    Bang,
}

/// Converts statement text into tokens.
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    /// Tokenize the whole statement.
    pub fn tokenize(mut self) -> Result<Vec<Token>, EvalError> {
        let mut tokens: Vec<Token> = Vec::new();
        while let Some(c) = self.peek(0) {
            if c.is_whitespace() {
                self.pos += 1;
                continue;
            }
            let after_name = matches!(tokens.last(), Some(Token::Ident(_) | Token::RBracket));
            let token = if c.is_ascii_digit()
                || (c == '.' && !after_name && self.peek(1).is_some_and(|n| n.is_ascii_digit()))
            {
                self.number()?
            } else if c.is_ascii_alphabetic() || c == '_' {
                self.ident()
            } else if c == '"' {
                self.string()?
            } else {
                self.operator(c)?
            };
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn peek(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.pos + ahead).copied()
    }

    fn number(&mut self) -> Result<Token, EvalError> {
        let start = self.pos;
        self.eat_digits();
        if self.peek(0) == Some('.') {
            self.pos += 1;
            self.eat_digits();
        }
        if matches!(self.peek(0), Some('e' | 'E')) {
            let signed = matches!(self.peek(1), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };
            if self.peek(digit_at).is_some_and(|d| d.is_ascii_digit()) {
                self.pos += digit_at;
                self.eat_digits();
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse::<f64>()
            .map(Token::Number)
            .map_err(|_| EvalError::InvalidNumber(text))
    }

    fn eat_digits(&mut self) {
        while self.peek(0).is_some_and(|d| d.is_ascii_digit()) {
            self.pos += 1;
        }
    }

    fn ident(&mut self) -> Token {
        let start = self.pos;
        while self.peek(0).is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        Token::Ident(self.chars[start..self.pos].iter().collect())
    }

    fn string(&mut self) -> Result<Token, EvalError> {
        self.pos += 1;
        let start = self.pos;
        while let Some(c) = self.peek(0) {
            if c == '"' {
                let text: String = self.chars[start..self.pos].iter().collect();
                self.pos += 1;
                return Ok(Token::Str(text));
            }
            self.pos += 1;
        }
        Err(EvalError::UnterminatedString)
    }

    fn operator(&mut self, c: char) -> Result<Token, EvalError> {
        let next = self.peek(1);
        let (token, width) = match (c, next) {
            ('*', Some('*')) => (Token::Caret, 2),
            ('<', Some('=')) => (Token::Le, 2),
            ('>', Some('=')) => (Token::Ge, 2),
            ('=', Some('=')) => (Token::EqEq, 2),
            ('!', Some('=')) => (Token::NotEq, 2),
            ('&', Some('&')) => (Token::AndAnd, 2),
            ('|', Some('|')) => (Token::OrOr, 2),
            ('(', _) => (Token::LParen, 1),
            (')', _) => (Token::RParen, 1),
            ('[', _) => (Token::LBracket, 1),
            (']', _) => (Token::RBracket, 1),
            (',', _) => (Token::Comma, 1),
            ('.', _) => (Token::Dot, 1),
            ('=', _) => (Token::Assign, 1),
            ('+', _) => (Token::Plus, 1),
            ('-', _) => (Token::Minus, 1),
            ('*', _) => (Token::Star, 1),
            ('/', _) => (Token::Slash, 1),
            ('%', _) => (Token::Percent, 1),
            ('^', _) => (Token::Caret, 1),
            ('<', _) => (Token::Lt, 1),
            ('>', _) => (Token::Gt, 1),
            ('!', _) => (Token::Bang, 1),
            _ => {
                return Err(EvalError::UnexpectedChar {
                    ch: c,
                    column: self.pos + 1,
                })
            }
        };
        self.pos += width;
        Ok(token)
    }
}
