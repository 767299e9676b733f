//! Dictionary writer: `key=value&key=value` in the map's own iteration order.

use super::SerializeError;
use crate::jsv;
use crate::mode::{Sink, WriteFn};
use crate::value::{resolve, QueryValue, ValueView};
use std::any::TypeId;

/// Key or value writer remembered for the duration of one dictionary write.
///
/// The writer resolved for the first entry is reused for every entry of the
/// same runtime type. An entry of a different type gets its own writer
/// instead of being forced through the first one.
#[derive(Default)]
pub(super) struct LocalWriter {
    first: Option<(TypeId, WriteFn)>,
}

impl LocalWriter {
    pub(super) fn for_value(&mut self, value: &dyn QueryValue) -> WriteFn {
        let descriptor = value.descriptor();
        match self.first {
            Some((id, write)) if id == descriptor.id => write,
            Some(_) => jsv::writer_for(descriptor.shape),
            None => {
                let write = jsv::writer_for(descriptor.shape);
                self.first = Some((descriptor.id, write));
                write
            }
        }
    }
}

/// Emit one pair, preceded by `&` unless it is the first.
///
/// The key is written with the key depth raised and `is_writing_value`
/// cleared; the value with `is_writing_value` set.
pub(super) fn write_pair(
    sink: &mut Sink<'_>,
    ran_once: &mut bool,
    write_key: impl FnOnce(&mut Sink<'_>) -> Result<(), SerializeError>,
    write_value: impl FnOnce(&mut Sink<'_>) -> Result<(), SerializeError>,
) -> Result<(), SerializeError> {
    if *ran_once {
        sink.write_char('&')?;
    } else {
        *ran_once = true;
    }
    sink.write_key(write_key)?;
    sink.write_char('=')?;
    sink.write_value(write_value)
}

/// Write a dictionary as a query string. Entries whose value is null are
/// omitted entirely.
pub fn write_dictionary(sink: &mut Sink<'_>, value: &dyn QueryValue) -> Result<(), SerializeError> {
    let entries = match value.view() {
        ValueView::Dictionary(entries) => entries,
        ValueView::Null => return Ok(()),
        other => return Err(SerializeError::shape_mismatch("dictionary", &other)),
    };

    sink.with_query_string_mode(|sink| {
        let mut key_writer = LocalWriter::default();
        let mut value_writer = LocalWriter::default();
        let mut ran_once = false;

        for (key, entry_value) in entries {
            let Some(entry_value) = resolve(entry_value) else {
                continue;
            };
            let Some(key) = resolve(key) else {
                continue;
            };
            let write_key = key_writer.for_value(key);
            let write_value = value_writer.for_value(entry_value);

            write_pair(
                sink,
                &mut ran_once,
                |sink| write_key(sink, key),
                |sink| write_value(sink, entry_value),
            )?;
        }
        Ok(())
    })
}
