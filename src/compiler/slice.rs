//! Slice assignment expansion.
//!
//! A slice line such as `c[:] = a[1:4] + b[:3]` is expanded into one scalar
//! assignment per index:
//!
//! ```text
//! c[0] = a[1] + b[0]
//! c[1] = a[2] + b[1]
//! c[2] = a[3] + b[2]
//! ```
//!
//! Every `[lower:upper]` on either side contributes a length, and all sides
//! share the shortest one (the broadcast length). A bracket without a colon
//! is kept as literal text.

use smallvec::SmallVec;

use crate::core::{DeckError, Result, SourceLocation};

use super::scanner::{
    find_unquoted, has_top_level, is_bracketed_literal, matching_bracket, split_top_level,
};

/// One `[lower:upper]` and the literal text leading up to it.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Segment {
    prefix: String,
    lower: usize,
    upper: Option<usize>,
}

impl Segment {
    fn len(&self) -> Option<usize> {
        self.upper.map(|upper| upper - self.lower)
    }

    /// Name of the vector this slice reads, e.g. `suit1.v` in `2*suit1.v`.
    fn vector_name(&self) -> Option<&str> {
        let start = self
            .prefix
            .char_indices()
            .rev()
            .take_while(|&(_, c)| c.is_ascii_alphanumeric() || c == '_' || c == '.')
            .last()
            .map(|(i, _)| i)?;
        Some(&self.prefix[start..])
    }
}

/// One side of a slice assignment, split into slice segments and text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlicePattern {
    segments: SmallVec<[Segment; 2]>,
    tail: String,
}

impl SlicePattern {
    /// Parse one side of a slice line.
    pub fn parse(text: &str, at: &SourceLocation) -> Result<Self> {
        let mut segments = SmallVec::new();
        let mut literal = String::new();
        let mut rest = text;

        while let Some(open) = find_unquoted(rest, '[') {
            let close = matching_bracket(rest, open).ok_or_else(|| {
                DeckError::MalformedVectorSyntax {
                    at: at.clone(),
                    fragment: text.to_string(),
                }
            })?;
            literal.push_str(&rest[..open]);
            let inner = &rest[open + 1..close];
            match find_unquoted(inner, ':') {
                Some(colon) => {
                    let lower = parse_bound(&inner[..colon], at)?.unwrap_or(0);
                    let upper = parse_bound(&inner[colon + 1..], at)?;
                    if upper.is_some_and(|upper| upper < lower) {
                        return Err(DeckError::InvalidSliceBound {
                            at: at.clone(),
                            fragment: inner.to_string(),
                        });
                    }
                    segments.push(Segment {
                        prefix: std::mem::take(&mut literal),
                        lower,
                        upper,
                    });
                }
                None => literal.push_str(&rest[open..=close]),
            }
            rest = &rest[close + 1..];
        }
        literal.push_str(rest);

        Ok(Self {
            segments,
            tail: literal,
        })
    }

    /// Check if this side has no slices at all.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        self.segments.is_empty()
    }

    /// Treat a bare name as the whole vector (`v` → `v[:]`).
    fn whole_vector(mut self) -> Self {
        if self.segments.is_empty() && !self.tail.contains('[') {
            self.segments.push(Segment {
                prefix: std::mem::take(&mut self.tail),
                lower: 0,
                upper: None,
            });
        }
        self
    }

    fn explicit_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.segments.iter().filter_map(Segment::len)
    }

    /// Fill in open upper bounds.
    ///
    /// An open bound takes the broadcast length when one is known, and the
    /// length of the existing vector otherwise.
    fn close_bounds<F>(&mut self, count: Option<usize>, existing_len: &F, at: &SourceLocation, text: &str) -> Result<()>
    where
        F: Fn(&str) -> Option<usize>,
    {
        for segment in self.segments.iter_mut().filter(|s| s.upper.is_none()) {
            let upper = match count {
                Some(count) => segment.lower.checked_add(count).ok_or_else(|| {
                    DeckError::InvalidSliceBound {
                        at: at.clone(),
                        fragment: text.to_string(),
                    }
                })?,
                None => segment
                    .vector_name()
                    .and_then(existing_len)
                    .filter(|&len| len >= segment.lower)
                    .ok_or_else(|| DeckError::MissingSliceUpperBound {
                        at: at.clone(),
                        fragment: text.to_string(),
                    })?,
            };
            segment.upper = Some(upper);
        }
        Ok(())
    }

    /// Close open bounds that read an already-defined vector. Bounds with no
    /// such vector stay open.
    fn close_from_existing<F>(&mut self, existing_len: &F)
    where
        F: Fn(&str) -> Option<usize>,
    {
        for segment in self.segments.iter_mut().filter(|s| s.upper.is_none()) {
            segment.upper = segment
                .vector_name()
                .and_then(existing_len)
                .filter(|&len| len >= segment.lower);
        }
    }

    /// Text of this side at broadcast index `k`.
    fn render(&self, k: usize) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            out.push_str(&segment.prefix);
            out.push('[');
            out.push_str(&(segment.lower + k).to_string());
            out.push(']');
        }
        out.push_str(&self.tail);
        out
    }
}

fn parse_bound(text: &str, at: &SourceLocation) -> Result<Option<usize>> {
    if text.is_empty() {
        return Ok(None);
    }
    text.parse().map(Some).map_err(|_| DeckError::InvalidSliceBound {
        at: at.clone(),
        fragment: text.to_string(),
    })
}

/// Right-hand side of a slice assignment.
enum Source {
    Pattern(SlicePattern),
    List(Vec<String>),
}

/// Expand a slice line into `(local name, value)` pairs.
///
/// `existing_len` reports the length of an already-defined vector. When no
/// side gives an explicit length, open bounds on both sides are closed from
/// it and the shortest of them becomes the broadcast length.
///
/// ```
/// use rummy::compiler::slice::expand;
/// use rummy::core::{SourceLocation, SuitPath};
///
/// let at = SourceLocation::new(1, SuitPath::root());
/// let pairs = expand("b[:]", "a[:3]*2", &at, |_| None).unwrap();
/// assert_eq!(
///     pairs,
///     vec![
///         ("b[0]".to_string(), "a[0]*2".to_string()),
///         ("b[1]".to_string(), "a[1]*2".to_string()),
///         ("b[2]".to_string(), "a[2]*2".to_string()),
///     ]
/// );
/// ```
pub fn expand<F>(name: &str, value: &str, at: &SourceLocation, existing_len: F) -> Result<Vec<(String, String)>>
where
    F: Fn(&str) -> Option<usize>,
{
    let mut lhs = SlicePattern::parse(name, at)?.whole_vector();
    let mut rhs = if is_bracketed_literal(value) {
        Source::List(list_items(&value[1..value.len() - 1]))
    } else if has_top_level(value, ',') {
        Source::List(list_items(value))
    } else {
        Source::Pattern(SlicePattern::parse(value, at)?)
    };

    let mut count = broadcast_len(&lhs, &rhs);
    if count.is_none() {
        // `d[:] = c[:]` takes its length from an existing `c`
        lhs.close_from_existing(&existing_len);
        if let Source::Pattern(pattern) = &mut rhs {
            pattern.close_from_existing(&existing_len);
        }
        count = broadcast_len(&lhs, &rhs);
    }

    lhs.close_bounds(count, &existing_len, at, name)?;
    if let Source::Pattern(pattern) = &mut rhs {
        pattern.close_bounds(count, &existing_len, at, value)?;
    }

    let count = broadcast_len(&lhs, &rhs);

    let names: Vec<String> = if lhs.is_scalar() {
        vec![lhs.render(0)]
    } else {
        (0..count.unwrap_or(0)).map(|k| lhs.render(k)).collect()
    };

    let values: Vec<String> = match &rhs {
        Source::List(items) => items.clone(),
        Source::Pattern(pattern) if pattern.is_scalar() => vec![pattern.render(0); names.len()],
        Source::Pattern(pattern) => (0..count.unwrap_or(0)).map(|k| pattern.render(k)).collect(),
    };

    if names.len() > values.len() {
        return Err(DeckError::SliceLengthMismatch {
            at: at.clone(),
            names: names.len(),
            values: values.len(),
        });
    }
    Ok(names.into_iter().zip(values).collect())
}

/// Shortest known length over both sides.
fn broadcast_len(lhs: &SlicePattern, rhs: &Source) -> Option<usize> {
    match rhs {
        Source::Pattern(pattern) => lhs.explicit_lengths().chain(pattern.explicit_lengths()).min(),
        Source::List(items) => lhs.explicit_lengths().chain([items.len()]).min(),
    }
}

fn list_items(text: &str) -> Vec<String> {
    split_top_level(text, ',')
        .into_iter()
        .map(str::to_string)
        .collect()
}
