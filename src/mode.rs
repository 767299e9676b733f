//! # Serialization Mode State
//!
//! Writers vary their escaping depending on where they are in the output:
//! inside a query string, inside a dictionary key, or inside a value. Those
//! three flags live in a [`ModeState`] owned by the [`Sink`] of one
//! serialization call and are threaded through every write function, so two
//! threads serializing at once never observe each other's flags and a nested
//! dictionary cannot switch query-string mode off for its parent.
//!
//! Every scoped change goes through a `Sink` helper that restores the prior
//! value on every exit path, including when the inner write fails.

use crate::query_string::{SerializeError, WriteFnCache};
use crate::value::QueryValue;
use std::fmt;

/// A compiled write function for one runtime type.
pub type WriteFn = fn(&mut Sink<'_>, &dyn QueryValue) -> Result<(), SerializeError>;

/// Formatting flags read by per-type writers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeState {
    /// Output is a `key=value&...` query string
    pub query_string_mode: bool,
    /// Currently inside the value half of a pair
    pub is_writing_value: bool,
    /// Number of enclosing key writes
    pub writing_key_depth: u32,
}

impl ModeState {
    /// True while the key half of a pair is being written.
    #[inline]
    #[must_use]
    pub fn is_writing_key(&self) -> bool {
        self.writing_key_depth > 0 && !self.is_writing_value
    }
}

/// Output target plus the mode flags and cache of one serialization call.
pub struct Sink<'a> {
    out: &'a mut dyn fmt::Write,
    mode: ModeState,
    cache: &'a WriteFnCache,
}

impl<'a> Sink<'a> {
    #[must_use]
    pub fn new(out: &'a mut dyn fmt::Write, cache: &'a WriteFnCache) -> Self {
        Self {
            out,
            mode: ModeState::default(),
            cache,
        }
    }

    #[inline]
    #[must_use]
    pub fn mode(&self) -> ModeState {
        self.mode
    }

    /// Cache used for late-bound re-dispatch.
    #[inline]
    #[must_use]
    pub fn cache(&self) -> &'a WriteFnCache {
        self.cache
    }

    pub fn write_str(&mut self, s: &str) -> Result<(), SerializeError> {
        self.out.write_str(s).map_err(SerializeError::from)
    }

    pub fn write_char(&mut self, c: char) -> Result<(), SerializeError> {
        self.out.write_char(c).map_err(SerializeError::from)
    }

    pub fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<(), SerializeError> {
        self.out.write_fmt(args).map_err(SerializeError::from)
    }

    /// Run `f` with query-string mode switched on.
    pub fn with_query_string_mode<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, SerializeError>,
    ) -> Result<T, SerializeError> {
        let prior = self.mode.query_string_mode;
        self.mode.query_string_mode = true;
        let result = f(self);
        self.mode.query_string_mode = prior;
        result
    }

    /// Run `f` as the key half of a pair: key depth is incremented and
    /// `is_writing_value` cleared for the duration.
    pub fn write_key(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<(), SerializeError>,
    ) -> Result<(), SerializeError> {
        let prior_writing_value = self.mode.is_writing_value;
        self.mode.writing_key_depth += 1;
        self.mode.is_writing_value = false;
        let result = f(self);
        self.mode.writing_key_depth -= 1;
        self.mode.is_writing_value = prior_writing_value;
        result
    }

    /// Run `f` as the value half of a pair with `is_writing_value` set.
    pub fn write_value(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<(), SerializeError>,
    ) -> Result<(), SerializeError> {
        let prior = self.mode.is_writing_value;
        self.mode.is_writing_value = true;
        let result = f(self);
        self.mode.is_writing_value = prior;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scopes_restore_on_failure() {
        let cache = WriteFnCache::new();
        let mut out = String::new();
        let mut sink = Sink::new(&mut out, &cache);

        let result = sink.with_query_string_mode(|sink| {
            sink.write_key(|sink| {
                assert!(sink.mode().is_writing_key());
                assert_eq!(sink.mode().writing_key_depth, 1);
                Err(SerializeError::from(fmt::Error))
            })
        });

        assert!(result.is_err());
        assert_eq!(sink.mode(), ModeState::default());
    }

    #[test]
    fn test_nested_query_string_scope_keeps_outer_mode() {
        let cache = WriteFnCache::new();
        let mut out = String::new();
        let mut sink = Sink::new(&mut out, &cache);

        sink.with_query_string_mode(|outer| {
            outer.write_value(|value| {
                value.with_query_string_mode(|_| Ok(()))?;
                assert!(value.mode().query_string_mode);
                assert!(value.mode().is_writing_value);
                Ok(())
            })
        })
        .unwrap();

        assert!(!sink.mode().query_string_mode);
    }
}
