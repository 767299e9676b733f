//! # commandwire
//!
//! **commandwire** routes textual commands to registered controller objects and
//! renders arbitrary values as `key=value&key=value` query strings, memoizing
//! the write strategy chosen for each runtime type.
//!
//! ## Overview
//!
//! Two independent subsystems share one value model:
//!
//! - **Command routing** - `Echo://Add/2/3` is split into a controller name, an
//!   action name and positional arguments. The action is found by name and
//!   argument count in a table each controller declares once, the arguments are
//!   converted to the action's parameter types, and the action runs.
//! - **Query-string serialization** - a value is inspected once per runtime
//!   type to pick a write strategy (dictionary, structured, generic or
//!   late-bound); the compiled writer is cached in a lock-free map and reused.
//!
//! ## Architecture
//!
//! - **[`command`]** - controller registry, action table and [`CommandProcessor`]
//! - **[`path_info`]** - splits `Action/arg0/arg1?opt=v` into its parts
//! - **[`literal`]** - converts argument strings to typed parameters
//! - **[`query_string`]** - write-function cache, strategy selection and the
//!   dictionary and structured writers
//! - **[`value`]** - the [`QueryValue`] trait through which values describe
//!   their runtime type and structure
//! - **[`mode`]** - per-call formatting flags threaded through every writer
//! - **[`jsv`]** - the scalar and sequence text writers
//! - **[`telemetry`]** / **[`runtime_config`]** - logging and environment setup
//!
//! ### Invocation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Caller
//!     participant Proc as CommandProcessor
//!     participant Path as PathInfo
//!     participant Reg as ControllerRegistry
//!     participant Act as Action
//!
//!     Caller->>Proc: invoke("Echo://Add/2/3")
//!     Proc->>Proc: split on "://"
//!     Proc->>Path: parse("Add/2/3")
//!     Path-->>Proc: action "Add", args ["2", "3"]
//!     Proc->>Reg: controller "Echo"
//!     Reg-->>Proc: entry
//!     Proc->>Reg: resolve("Add", 2)
//!     Reg-->>Proc: bound action
//!     Proc->>Act: call(["2", "3"])
//!     Act->>Act: FromLiteral per parameter
//!     Act-->>Proc: Ok / Err
//!     Proc-->>Caller: Result<(), CommandError>
//! ```
//!
//! ### Serialization Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Caller
//!     participant Ser as QueryStringSerializer
//!     participant Cache as WriteFnCache
//!     participant W as Writer
//!
//!     Caller->>Ser: serialize_to_string(&map)
//!     Ser->>Cache: get_write_fn(descriptor)
//!     alt first use of the type
//!         Cache->>Cache: select_strategy + install (CAS loop)
//!     end
//!     Cache-->>Ser: CompiledWriter
//!     Ser->>W: write(sink, value)
//!     W-->>Caller: "a=1&b=2"
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use commandwire::command::{ActionTable, CommandProcessor, Controller};
//! use commandwire::runtime_config::RuntimeConfig;
//! use indexmap::IndexMap;
//!
//! struct Lights;
//!
//! impl Lights {
//!     fn dim(&self, room: String, percent: u8) {
//!         println!("{room} -> {percent}%");
//!     }
//! }
//!
//! impl Controller for Lights {
//!     fn register_actions(actions: &mut ActionTable<Self>) {
//!         actions.action("Dim", Lights::dim);
//!     }
//! }
//!
//! let processor = CommandProcessor::builder()
//!     .controller(Lights)
//!     .config(RuntimeConfig::default())
//!     .build();
//! processor.invoke("Lights://Dim/kitchen/40").unwrap();
//!
//! let mut query = IndexMap::new();
//! query.insert("room", "kitchen");
//! query.insert("percent", "40");
//! assert_eq!(
//!     commandwire::query_string::serialize_to_string(&query).unwrap(),
//!     "room=kitchen&percent=40"
//! );
//! ```
//!
//! ## Configuration
//!
//! | Variable | Default | Effect |
//! |---|---|---|
//! | `CMDW_CATCH_PANICS` | `true` | report action panics as invocation failures |
//! | `CMDW_LOG_LEVEL` | `info` | log level |
//! | `CMDW_LOG_FORMAT` | `json` | `json` or `pretty` |
//!
//! ## Thread Safety
//!
//! A built [`CommandProcessor`] is read-only and can be shared across threads.
//! The write-function cache accepts concurrent first use of any type without
//! losing entries, and formatting flags belong to each serialization call.

pub mod cli;
pub mod command;
pub mod echo;
pub mod ids;
pub mod jsv;
pub mod literal;
pub mod mode;
pub mod path_info;
pub mod query_string;
pub mod runtime_config;
pub mod telemetry;
pub mod value;

pub use command::{CommandError, CommandProcessor, Controller};
pub use echo::Echo;
pub use literal::{deserialize_from_string, FromLiteral};
pub use query_string::{serialize_to_string, QueryStringSerializer};
pub use value::QueryValue;
