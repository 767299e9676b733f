//! Correlation ids for command invocations.

use std::fmt;
use ulid::Ulid;

/// Tags every log line of one [`invoke`](crate::CommandProcessor::invoke) call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InvocationId(Ulid);

impl InvocationId {
    pub(crate) fn generate() -> Self {
        Self(Ulid::new())
    }
}

impl fmt::Display for InvocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
