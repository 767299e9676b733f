//! Write-function cache and per-type strategy selection.
//!
//! The cache maps a runtime [`TypeId`] to the [`CompiledWriter`] chosen for
//! it. Reads load the current snapshot without locking. A miss synthesizes a
//! writer and installs it with a copy-on-write compare-and-swap loop:
//!
//! 1. take a snapshot of the current map;
//! 2. build a new map equal to the snapshot plus the new entry;
//! 3. swap it in only if the cache still points at that snapshot;
//! 4. otherwise retry from the fresher snapshot.
//!
//! Entries published by other threads are never lost. Two threads may
//! synthesize the same type at once; synthesis has no side effects, and the
//! loser of the race returns the entry that was published first, so exactly
//! one writer per type survives. Nothing is ever evicted: the number of
//! distinct runtime types in a process is bounded.

use super::dictionary::write_dictionary;
use super::structured::write_structured;
use super::SerializeError;
use crate::jsv;
use crate::mode::{Sink, WriteFn};
use crate::value::{resolve, QueryValue, TypeDescriptor, TypeShape};
use arc_swap::{ArcSwap, Guard};
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// How values of one type are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStrategy {
    /// Re-dispatch on the wrapped value's runtime type at call time
    LateBound,
    /// `key=value&...` over dictionary entries
    Dictionary,
    /// `field=value&...` over named members
    Structured,
    /// Generic value/sequence writer of the text format
    Generic,
}

/// A strategy together with the function implementing it.
#[derive(Clone, Copy)]
pub struct CompiledWriter {
    pub strategy: WriteStrategy,
    pub write: WriteFn,
}

impl CompiledWriter {
    /// Write `value` through this writer.
    pub fn write(&self, sink: &mut Sink<'_>, value: &dyn QueryValue) -> Result<(), SerializeError> {
        (self.write)(sink, value)
    }
}

impl fmt::Debug for CompiledWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledWriter")
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

/// Pick the write strategy for a type.
///
/// Priority: dynamic wrappers, then dictionaries, then structured types that
/// have members and are not also sequences, then everything else.
#[must_use]
pub fn select_strategy(descriptor: &TypeDescriptor) -> WriteStrategy {
    match descriptor.shape {
        TypeShape::Dynamic => WriteStrategy::LateBound,
        TypeShape::Dictionary => WriteStrategy::Dictionary,
        TypeShape::Structured {
            fields,
            iterable: false,
        } if !fields.is_empty() => WriteStrategy::Structured,
        _ => WriteStrategy::Generic,
    }
}

fn synthesize(descriptor: &TypeDescriptor) -> CompiledWriter {
    let strategy = select_strategy(descriptor);
    let write: WriteFn = match strategy {
        WriteStrategy::LateBound => write_late_bound,
        WriteStrategy::Dictionary => write_dictionary,
        WriteStrategy::Structured => write_structured,
        WriteStrategy::Generic => jsv::writer_for(descriptor.shape),
    };
    CompiledWriter { strategy, write }
}

/// Write a value whose type is only known now: null writes nothing, anything
/// else is written by the cached writer for its runtime type.
pub fn write_late_bound(sink: &mut Sink<'_>, value: &dyn QueryValue) -> Result<(), SerializeError> {
    let Some(target) = resolve(value) else {
        return Ok(());
    };
    let descriptor = target.descriptor();
    if descriptor.shape == TypeShape::Dynamic {
        // A dynamic type presenting a concrete view; don't loop back here.
        return jsv::write_any(sink, target);
    }
    sink.cache().get_write_fn(&descriptor).write(sink, target)
}

/// Lock-free type → writer memoization.
pub struct WriteFnCache {
    entries: ArcSwap<HashMap<TypeId, CompiledWriter>>,
    synthesized: AtomicU64,
    cas_retries: AtomicU64,
}

impl Default for WriteFnCache {
    fn default() -> Self {
        Self::new()
    }
}

impl WriteFnCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: ArcSwap::from_pointee(HashMap::new()),
            synthesized: AtomicU64::new(0),
            cas_retries: AtomicU64::new(0),
        }
    }

    /// Get the writer for a type, synthesizing and installing it on first use.
    pub fn get_write_fn(&self, descriptor: &TypeDescriptor) -> CompiledWriter {
        // Fast path: current snapshot only
        if let Some(found) = self.entries.load().get(&descriptor.id) {
            debug!(
                type_name = descriptor.name,
                strategy = ?found.strategy,
                "Write function cache hit"
            );
            return *found;
        }

        let compiled = synthesize(descriptor);
        self.synthesized.fetch_add(1, Ordering::Relaxed);
        self.install(descriptor, compiled)
    }

    fn install(&self, descriptor: &TypeDescriptor, compiled: CompiledWriter) -> CompiledWriter {
        let mut snapshot = self.entries.load_full();
        loop {
            if let Some(existing) = snapshot.get(&descriptor.id) {
                debug!(
                    type_name = descriptor.name,
                    "Write function installed by another thread"
                );
                return *existing;
            }

            let mut next = HashMap::with_capacity(snapshot.len() + 1);
            next.extend(snapshot.iter().map(|(id, writer)| (*id, *writer)));
            next.insert(descriptor.id, compiled);
            let cache_size = next.len();

            let previous = self.entries.compare_and_swap(&snapshot, Arc::new(next));
            if Arc::ptr_eq(&*previous, &snapshot) {
                info!(
                    type_name = descriptor.name,
                    strategy = ?compiled.strategy,
                    cache_size = cache_size,
                    "Write function compiled and cached"
                );
                return compiled;
            }

            self.cas_retries.fetch_add(1, Ordering::Relaxed);
            debug!(
                type_name = descriptor.name,
                "Write function cache changed concurrently, retrying install"
            );
            snapshot = Guard::into_inner(previous);
        }
    }

    /// Number of cached types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.load().is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: TypeId) -> bool {
        self.entries.load().contains_key(&id)
    }

    /// Cached strategy for a type, if it has been seen.
    #[must_use]
    pub fn strategy_of(&self, id: TypeId) -> Option<WriteStrategy> {
        self.entries.load().get(&id).map(|writer| writer.strategy)
    }

    /// How many times a writer was synthesized, counting redundant races.
    #[must_use]
    pub fn synthesized(&self) -> u64 {
        self.synthesized.load(Ordering::Relaxed)
    }

    /// How many installs had to retry against a newer snapshot.
    #[must_use]
    pub fn cas_retries(&self) -> u64 {
        self.cas_retries.load(Ordering::Relaxed)
    }
}
