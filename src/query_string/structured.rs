//! Structured writer: `field=value&field=value` over a type's named members.

use super::dictionary::{write_pair, LocalWriter};
use super::SerializeError;
use crate::jsv;
use crate::mode::Sink;
use crate::value::{resolve, QueryValue, ValueView};

/// Write a struct-like value as a query string. Null members are omitted.
pub fn write_structured(sink: &mut Sink<'_>, value: &dyn QueryValue) -> Result<(), SerializeError> {
    let fields = match value.view() {
        ValueView::Structured(fields) => fields,
        ValueView::Null => return Ok(()),
        other => return Err(SerializeError::shape_mismatch("structured", &other)),
    };

    sink.with_query_string_mode(|sink| {
        let mut value_writer = LocalWriter::default();
        let mut ran_once = false;
        for (name, member) in fields {
            let Some(member) = resolve(member) else {
                continue;
            };
            let write_value = value_writer.for_value(member);
            write_pair(
                sink,
                &mut ran_once,
                |sink| jsv::write_string(sink, name),
                |sink| write_value(sink, member),
            )?;
        }
        Ok(())
    })
}
