use crate::command::{ActionTable, Controller};
use crate::query_string;
use indexmap::IndexMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Demo controller that records what it was asked to do.
///
/// Actions: `Say/<text>`, `Add/<a>/<b>`, `Repeat/<text>/<times>`,
/// `Tags/<[a,b,...]>`, `Pair/<key>/<value>` and `Fail/<reason>`.
///
/// Clones share one transcript, so a caller can keep a handle to an instance
/// it hands to a processor.
#[derive(Debug, Default, Clone)]
pub struct Echo {
    transcript: Arc<Mutex<Vec<String>>>,
}

impl Echo {
    pub fn new() -> Self {
        Self::default()
    }

    fn lines(&self) -> MutexGuard<'_, Vec<String>> {
        // A poisoned transcript is still a valid list of lines.
        self.transcript
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn push(&self, line: String) {
        self.lines().push(line);
    }

    /// Lines recorded so far.
    pub fn transcript(&self) -> Vec<String> {
        self.lines().clone()
    }

    /// Take and clear the recorded lines.
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines())
    }

    pub fn say(&self, text: String) {
        self.push(text);
    }

    pub fn add(&self, a: i64, b: i64) -> anyhow::Result<()> {
        let sum = a
            .checked_add(b)
            .ok_or_else(|| anyhow::anyhow!("{a} + {b} overflows"))?;
        self.push(sum.to_string());
        Ok(())
    }

    pub fn repeat(&self, text: String, times: u32) {
        for _ in 0..times {
            self.push(text.clone());
        }
    }

    pub fn tags(&self, tags: Vec<String>) {
        self.push(tags.join(" "));
    }

    /// Record a single pair in query-string form.
    pub fn pair(&self, key: String, value: Option<String>) -> anyhow::Result<()> {
        let mut pair = IndexMap::new();
        pair.insert(key, value);
        self.push(query_string::serialize_to_string(&pair)?);
        Ok(())
    }

    pub fn fail(&self, reason: String) -> anyhow::Result<()> {
        anyhow::bail!("{reason}")
    }
}

impl Controller for Echo {
    fn register_actions(actions: &mut ActionTable<Self>) {
        actions
            .action("Say", Echo::say)
            .action("Add", Echo::add)
            .action("Repeat", Echo::repeat)
            .action("Tags", Echo::tags)
            .action("Pair", Echo::pair)
            .action("Fail", Echo::fail);
    }
}
