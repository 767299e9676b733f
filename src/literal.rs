//! # Literal Conversion
//!
//! Converts the positional string arguments of a command URI into the typed
//! parameters an action declares. Literals use the same JSV conventions the
//! writer produces:
//!
//! - `"a,b"` is the string `a,b` (quotes stripped, `""` is an escaped quote)
//! - `[1,2,3]` or `1,2,3` is a list; items may be quoted
//! - the empty literal is `None` for `Option<T>`
//! - booleans accept `true`/`false` in any case, and `1`/`0`

use std::any::type_name;
use std::borrow::Cow;

/// A literal could not be converted to the requested type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot convert '{literal}' to {target}: {reason}")]
pub struct LiteralError {
    pub literal: String,
    pub target: &'static str,
    pub reason: String,
}

impl LiteralError {
    pub fn new<T: ?Sized>(literal: &str, reason: impl Into<String>) -> Self {
        Self {
            literal: literal.to_string(),
            target: type_name::<T>(),
            reason: reason.into(),
        }
    }
}

/// Types that can be parsed from a command argument.
pub trait FromLiteral: Sized {
    fn from_literal(literal: &str) -> Result<Self, LiteralError>;
}

/// Convert `literal` to `T`.
pub fn deserialize_from_string<T: FromLiteral>(literal: &str) -> Result<T, LiteralError> {
    T::from_literal(literal)
}

macro_rules! parse_literal {
    ($($ty:ty),* $(,)?) => {$(
        impl FromLiteral for $ty {
            fn from_literal(literal: &str) -> Result<Self, LiteralError> {
                unquote(literal)
                    .trim()
                    .parse::<$ty>()
                    .map_err(|e| LiteralError::new::<$ty>(literal, e.to_string()))
            }
        }
    )*};
}

parse_literal!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl FromLiteral for bool {
    fn from_literal(literal: &str) -> Result<Self, LiteralError> {
        let text = unquote(literal);
        let text = text.trim();
        if text.eq_ignore_ascii_case("true") || text == "1" {
            Ok(true)
        } else if text.eq_ignore_ascii_case("false") || text == "0" {
            Ok(false)
        } else {
            Err(LiteralError::new::<bool>(literal, "expected true or false"))
        }
    }
}

impl FromLiteral for char {
    fn from_literal(literal: &str) -> Result<Self, LiteralError> {
        let text = unquote(literal);
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(LiteralError::new::<char>(literal, "expected exactly one character")),
        }
    }
}

impl FromLiteral for String {
    fn from_literal(literal: &str) -> Result<Self, LiteralError> {
        Ok(unquote(literal).into_owned())
    }
}

impl<T: FromLiteral> FromLiteral for Option<T> {
    fn from_literal(literal: &str) -> Result<Self, LiteralError> {
        if literal.is_empty() {
            Ok(None)
        } else {
            T::from_literal(literal).map(Some)
        }
    }
}

impl<T: FromLiteral> FromLiteral for Vec<T> {
    fn from_literal(literal: &str) -> Result<Self, LiteralError> {
        let body = literal.trim();
        let body = body
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(body);
        if body.is_empty() {
            return Ok(Vec::new());
        }
        split_items(body)
            .map_err(|reason| LiteralError::new::<Vec<T>>(literal, reason))?
            .into_iter()
            .map(T::from_literal)
            .collect()
    }
}

/// Strip one level of JSV quoting.
#[must_use]
pub fn unquote(literal: &str) -> Cow<'_, str> {
    match literal
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(inner) if literal.len() >= 2 => Cow::Owned(inner.replace("\"\"", "\"")),
        _ => Cow::Borrowed(literal),
    }
}

/// Split a list body on top-level commas, honouring quotes and brackets.
fn split_items(body: &str) -> Result<Vec<&str>, &'static str> {
    let mut items = Vec::new();
    let mut depth = 0_usize;
    let mut in_quotes = false;
    let mut start = 0;

    for (i, c) in body.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '[' | '{' if !in_quotes => depth += 1,
            ']' | '}' if !in_quotes => {
                depth = depth.checked_sub(1).ok_or("unbalanced closing bracket")?;
            }
            ',' if !in_quotes && depth == 0 => {
                items.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    if in_quotes {
        return Err("unterminated quoted item");
    }
    if depth != 0 {
        return Err("unbalanced opening bracket");
    }
    items.push(&body[start..]);
    Ok(items)
}
