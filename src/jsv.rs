//! # JSV Text Writer
//!
//! The per-type writers the query-string layer delegates to. Output is a
//! compact JSV-style text form:
//!
//! | value | output |
//! |---|---|
//! | scalar | `Display` text (`true`, `42`, `1.5`) |
//! | sequence | `[a,b,c]` |
//! | dictionary / struct | `{k:v,k2:v2}` with null entries skipped |
//! | null | nothing |
//!
//! String escaping reads the sink's [`ModeState`](crate::mode::ModeState):
//!
//! - text containing `"` `,` `{` `}` `[` `]` or a leading/trailing space is
//!   wrapped in `"` with inner quotes doubled; while writing a key `:` also
//!   forces quoting;
//! - in query-string mode the (possibly quoted) result is percent-encoded so
//!   `&`, `=` and `%` cannot break the pair grammar;
//! - the empty string is `""` outside query-string mode.

use crate::mode::{Sink, WriteFn};
use crate::query_string::SerializeError;
use crate::value::{resolve, Entries, Items, QueryValue, Scalar, TypeShape, ValueView};
use std::borrow::Cow;

/// Generic value/sequence writer for a shape.
#[must_use]
pub fn writer_for(shape: TypeShape) -> WriteFn {
    match shape {
        TypeShape::Scalar => value_type_writer(),
        TypeShape::Sequence => write_sequence,
        TypeShape::Dictionary => write_map,
        TypeShape::Structured {
            iterable: false, ..
        } => write_object,
        TypeShape::Structured { iterable: true, .. } | TypeShape::Dynamic => write_any,
    }
}

/// Scalar-to-string writer.
#[must_use]
pub fn value_type_writer() -> WriteFn {
    write_scalar_value
}

/// Write any value by following its view.
pub fn write_any(sink: &mut Sink<'_>, value: &dyn QueryValue) -> Result<(), SerializeError> {
    match value.view() {
        ValueView::Null => Ok(()),
        ValueView::Scalar(scalar) => write_scalar(sink, scalar),
        ValueView::Sequence(items) => write_items(sink, items),
        ValueView::Dictionary(entries) => write_entries(sink, entries),
        ValueView::Structured(fields) => write_fields(sink, fields),
        ValueView::Dynamic(inner) => write_any(sink, inner),
    }
}

fn write_scalar_value(sink: &mut Sink<'_>, value: &dyn QueryValue) -> Result<(), SerializeError> {
    match value.view() {
        ValueView::Scalar(scalar) => write_scalar(sink, scalar),
        ValueView::Null => Ok(()),
        ValueView::Dynamic(inner) => write_any(sink, inner),
        other => Err(SerializeError::shape_mismatch("scalar", &other)),
    }
}

fn write_sequence(sink: &mut Sink<'_>, value: &dyn QueryValue) -> Result<(), SerializeError> {
    match value.view() {
        ValueView::Sequence(items) => write_items(sink, items),
        ValueView::Null => Ok(()),
        other => Err(SerializeError::shape_mismatch("sequence", &other)),
    }
}

fn write_map(sink: &mut Sink<'_>, value: &dyn QueryValue) -> Result<(), SerializeError> {
    match value.view() {
        ValueView::Dictionary(entries) => write_entries(sink, entries),
        ValueView::Null => Ok(()),
        other => Err(SerializeError::shape_mismatch("dictionary", &other)),
    }
}

fn write_object(sink: &mut Sink<'_>, value: &dyn QueryValue) -> Result<(), SerializeError> {
    match value.view() {
        ValueView::Structured(fields) => write_fields(sink, fields),
        ValueView::Null => Ok(()),
        other => Err(SerializeError::shape_mismatch("structured", &other)),
    }
}

fn write_scalar(sink: &mut Sink<'_>, scalar: Scalar<'_>) -> Result<(), SerializeError> {
    match scalar {
        Scalar::Bool(b) => sink.write_str(if b { "true" } else { "false" }),
        Scalar::Int(i) => write!(sink, "{i}"),
        Scalar::UInt(u) => write!(sink, "{u}"),
        Scalar::Float(f) => write!(sink, "{f}"),
        Scalar::Float32(f) => write!(sink, "{f}"),
        Scalar::Char(c) => write_string(sink, c.encode_utf8(&mut [0; 4])),
        Scalar::Str(s) => write_string(sink, s),
    }
}

fn write_items(sink: &mut Sink<'_>, items: Items<'_>) -> Result<(), SerializeError> {
    sink.write_char('[')?;
    for (i, item) in items.enumerate() {
        if i > 0 {
            sink.write_char(',')?;
        }
        write_any(sink, item)?;
    }
    sink.write_char(']')
}

fn write_entries(sink: &mut Sink<'_>, entries: Entries<'_>) -> Result<(), SerializeError> {
    sink.write_char('{')?;
    let mut first = true;
    for (key, value) in entries {
        let Some(value) = resolve(value) else {
            continue;
        };
        if !first {
            sink.write_char(',')?;
        }
        first = false;
        sink.write_key(|sink| write_any(sink, key))?;
        sink.write_char(':')?;
        sink.write_value(|sink| write_any(sink, value))?;
    }
    sink.write_char('}')
}

fn write_fields(
    sink: &mut Sink<'_>,
    fields: Vec<(&'static str, &dyn QueryValue)>,
) -> Result<(), SerializeError> {
    sink.write_char('{')?;
    let mut first = true;
    for (name, value) in fields {
        let Some(value) = resolve(value) else {
            continue;
        };
        if !first {
            sink.write_char(',')?;
        }
        first = false;
        sink.write_key(|sink| write_string(sink, name))?;
        sink.write_char(':')?;
        sink.write_value(|sink| write_any(sink, value))?;
    }
    sink.write_char('}')
}

/// Write a string token, escaping according to the current mode.
pub fn write_string(sink: &mut Sink<'_>, text: &str) -> Result<(), SerializeError> {
    let mode = sink.mode();
    let token: Cow<'_, str> = if needs_quoting(text, mode.is_writing_key()) {
        Cow::Owned(quote(text))
    } else if text.is_empty() && !mode.query_string_mode {
        Cow::Borrowed("\"\"")
    } else {
        Cow::Borrowed(text)
    };

    if mode.query_string_mode {
        sink.write_str(&urlencoding::encode(&token))
    } else {
        sink.write_str(&token)
    }
}

fn needs_quoting(text: &str, writing_key: bool) -> bool {
    text.starts_with(' ')
        || text.ends_with(' ')
        || text
            .chars()
            .any(|c| matches!(c, '"' | ',' | '{' | '}' | '[' | ']') || (writing_key && c == ':'))
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}
