//! Classification of card lines.

use crate::core::{DeckError, Result, SourceLocation};

use super::scanner::{
    brackets_balanced, find_assignment, find_unquoted, has_top_level, is_bracketed_literal,
    remove_whitespace, remove_whitespace_preserve_quotes, split_top_level,
};

/// What a non-header logical line asks the compiler to do.
#[derive(Clone, Debug, PartialEq)]
pub enum Statement<'a> {
    /// No assignment: forward the line as is (`print(...)`).
    Expression(&'a str),

    /// `name = value`, including indexed targets like `v[1] = 2`.
    Scalar { name: String, value: String },

    /// `name = a, b, c` or `name = [a, b, c]`.
    VectorLiteral { name: String, values: Vec<String> },

    /// Any line with a `:` outside quotes on either side.
    Slice { name: String, value: String },
}

/// Classify one logical line.
///
/// ```
/// use rummy::compiler::assign::{classify, Statement};
/// use rummy::core::{SourceLocation, SuitPath};
///
/// let at = SourceLocation::new(1, SuitPath::root());
/// let stmt = classify(r#"names = "a, b", "c""#, &at).unwrap();
/// assert_eq!(
///     stmt,
///     Statement::VectorLiteral {
///         name: "names".into(),
///         values: vec![r#""a, b""#.into(), r#""c""#.into()],
///     }
/// );
/// ```
pub fn classify<'a>(text: &'a str, at: &SourceLocation) -> Result<Statement<'a>> {
    let Some(eq) = find_assignment(text) else {
        return Ok(Statement::Expression(text));
    };

    let name = remove_whitespace(&text[..eq]);
    let raw_value = &text[eq + 1..];
    let value = remove_whitespace_preserve_quotes(raw_value).ok_or_else(|| {
        DeckError::UnterminatedQuote {
            at: at.clone(),
            fragment: raw_value.trim().to_string(),
        }
    })?;
    if name.is_empty() || value.is_empty() {
        return Err(DeckError::EmptyAssignment {
            at: at.clone(),
            fragment: text.to_string(),
        });
    }

    if name.contains(',') {
        return Err(DeckError::InvalidCardName {
            at: at.clone(),
            fragment: name,
        });
    }
    for side in [&name, &value] {
        if !brackets_balanced(side) {
            return Err(malformed(at, side));
        }
    }

    let has_colon = find_unquoted(&name, ':').is_some() || find_unquoted(&value, ':').is_some();
    if has_colon {
        return Ok(Statement::Slice { name, value });
    }

    let lhs_vec = name.contains('[');
    let bracketed = is_bracketed_literal(&value);
    let listed = has_top_level(&value, ',');

    match (lhs_vec, bracketed || listed) {
        (_, false) => Ok(Statement::Scalar { name, value }),
        (true, true) => Err(malformed(at, text)),
        (false, true) => {
            let inner = if bracketed {
                &value[1..value.len() - 1]
            } else {
                value.as_str()
            };
            let values: Vec<String> = split_top_level(inner, ',')
                .into_iter()
                .map(str::to_string)
                .collect();
            if values.iter().any(String::is_empty) {
                return Err(DeckError::EmptyAssignment {
                    at: at.clone(),
                    fragment: text.to_string(),
                });
            }
            Ok(Statement::VectorLiteral { name, values })
        }
    }
}

fn malformed(at: &SourceLocation, fragment: &str) -> DeckError {
    DeckError::MalformedVectorSyntax {
        at: at.clone(),
        fragment: fragment.to_string(),
    }
}
