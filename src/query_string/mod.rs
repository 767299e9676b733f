//! # Query-String Serializer
//!
//! Renders any [`QueryValue`] into `key=value&key=value` form.
//!
//! ## Overview
//!
//! The first time a runtime type is written, a [`WriteStrategy`] is chosen for
//! it and the matching write function is memoized in a [`WriteFnCache`]:
//!
//! 1. **LateBound** - `Option<T>`, boxed values and `serde_json::Value` are
//!    re-dispatched on the runtime type of the value they wrap
//! 2. **Dictionary** - maps become `key=value` pairs joined with `&`
//! 3. **Structured** - structs with members become `field=value` pairs
//! 4. **Generic** - scalars and sequences use the [`jsv`](crate::jsv) writer
//!
//! Later writes of the same type skip straight to the cached function.
//!
//! ## Output Rules
//!
//! - Pairs appear in the source's own iteration order
//! - Entries whose value is null are omitted, not written as `key=`
//! - An empty map serializes to the empty string
//! - A null top-level value produces no output
//!
//! ## Usage
//!
//! ```rust
//! use commandwire::query_string::serialize_to_string;
//! use indexmap::IndexMap;
//!
//! let mut map = IndexMap::new();
//! map.insert("a", Some(1));
//! map.insert("c", None);
//! map.insert("b", Some(2));
//!
//! assert_eq!(serialize_to_string(&map).unwrap(), "a=1&b=2");
//! ```
//!
//! ## Thread Safety
//!
//! The cache is shared and lock-free; formatting flags belong to each call, so
//! any number of threads can serialize through one [`QueryStringSerializer`].

mod cache;
mod dictionary;
mod error;
mod structured;

#[cfg(test)]
mod tests;

pub use cache::{select_strategy, write_late_bound, CompiledWriter, WriteFnCache, WriteStrategy};
pub use dictionary::write_dictionary;
pub use error::SerializeError;
pub use structured::write_structured;

use crate::mode::Sink;
use crate::value::{QueryValue, TypeDescriptor};
use once_cell::sync::Lazy;
use std::fmt;

static DEFAULT_SERIALIZER: Lazy<QueryStringSerializer> = Lazy::new(QueryStringSerializer::new);

/// Serializer owning one write-function cache.
#[derive(Default)]
pub struct QueryStringSerializer {
    cache: WriteFnCache,
}

impl QueryStringSerializer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: WriteFnCache::new(),
        }
    }

    #[must_use]
    pub fn cache(&self) -> &WriteFnCache {
        &self.cache
    }

    /// Cached writer for a type, compiling it on first use.
    pub fn write_fn(&self, descriptor: &TypeDescriptor) -> CompiledWriter {
        self.cache.get_write_fn(descriptor)
    }

    /// Write `value` into any `fmt::Write` target.
    pub fn write_to(&self, out: &mut dyn fmt::Write, value: &dyn QueryValue) -> Result<(), SerializeError> {
        let writer = self.cache.get_write_fn(&value.descriptor());
        let mut sink = Sink::new(out, &self.cache);
        writer.write(&mut sink, value)
    }

    pub fn serialize_to_string(&self, value: &dyn QueryValue) -> Result<String, SerializeError> {
        let mut out = String::new();
        self.write_to(&mut out, value)?;
        Ok(out)
    }
}

/// Process-wide serializer used by the free functions in this module.
#[must_use]
pub fn default_serializer() -> &'static QueryStringSerializer {
    &DEFAULT_SERIALIZER
}

/// Serialize with the process-wide serializer.
pub fn serialize_to_string(value: &dyn QueryValue) -> Result<String, SerializeError> {
    default_serializer().serialize_to_string(value)
}
