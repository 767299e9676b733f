#![allow(dead_code)]

pub mod controllers {
    use commandwire::command::{ActionTable, CommandProcessor, Controller};
    use commandwire::runtime_config::RuntimeConfig;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
    #[error("account {account} is frozen")]
    pub struct FrozenAccount {
        pub account: String,
    }

    /// Records every call; clones share the record.
    #[derive(Clone, Default)]
    pub struct Ledger {
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl Ledger {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn credit(&self, account: String, amount: i64) {
            self.record(format!("credit {account} {amount}"));
        }

        fn note(&self, text: String) {
            self.record(format!("note {text}"));
        }

        fn note_shadowed(&self, text: String) {
            self.record(format!("shadowed {text}"));
        }

        fn tag(&self, tags: Vec<String>, pinned: bool) {
            self.record(format!("tag {} {pinned}", tags.join("|")));
        }

        fn freeze(&self, account: String) -> Result<(), FrozenAccount> {
            Err(FrozenAccount { account })
        }

        fn audit(&self) {
            self.record("audit".to_string());
        }

        fn explode(&self) {
            panic!("ledger exploded");
        }

        fn six(&self, a: u8, b: u8, c: u8, d: u8, e: u8, f: u8) {
            self.record(format!("six {a}{b}{c}{d}{e}{f}"));
        }
    }

    impl Controller for Ledger {
        fn register_actions(actions: &mut ActionTable<Self>) {
            actions
                .action("Credit", Ledger::credit)
                .action("Note", Ledger::note)
                .action("Note", Ledger::note_shadowed)
                .action("Tag", Ledger::tag)
                .action("Freeze", Ledger::freeze)
                .action("Audit", Ledger::audit)
                .action("Explode", Ledger::explode)
                .action("Six", Ledger::six);
        }
    }

    /// Second controller registered under the name `Ledger`.
    #[derive(Clone, Default)]
    pub struct ReplacementLedger {
        pub inner: Ledger,
    }

    impl Controller for ReplacementLedger {
        fn controller_name(&self) -> String {
            "Ledger".to_string()
        }

        fn register_actions(actions: &mut ActionTable<Self>) {
            actions.action("Audit", |this: &ReplacementLedger| {
                this.inner.record("replacement audit".to_string())
            });
        }
    }

    pub fn processor_with(ledger: &Ledger) -> CommandProcessor {
        CommandProcessor::builder()
            .controller(ledger.clone())
            .config(RuntimeConfig::default())
            .build()
    }
}
