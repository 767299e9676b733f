//! # Command Processor
//!
//! Routes textual commands of the form
//!
//! ```text
//! <ControllerName>://<ActionName>/<arg0>/<arg1>/...
//! ```
//!
//! to actions registered on controller instances.
//!
//! ## Resolution
//!
//! 1. The URI is split on `://`; exactly one separator is required
//! 2. The remainder is parsed by [`PathInfo`](crate::path_info::PathInfo)
//! 3. The controller is looked up by name
//! 4. The first declared action with the same name and argument count is
//!    selected
//! 5. Each argument is converted with [`FromLiteral`](crate::literal::FromLiteral)
//! 6. The action runs; a returned error or a panic becomes
//!    [`CommandError::InvocationFailure`] with the original as its source
//!
//! Actions are declared once per controller type through [`ActionTable`], so no
//! lookup work beyond two hash probes happens per call.
//!
//! ## Example
//!
//! ```rust
//! use commandwire::command::{ActionTable, CommandProcessor, Controller};
//! use commandwire::runtime_config::RuntimeConfig;
//! use std::sync::Mutex;
//!
//! #[derive(Default)]
//! struct Tally {
//!     total: Mutex<i64>,
//! }
//!
//! impl Tally {
//!     fn add(&self, a: i64, b: i64) {
//!         *self.total.lock().unwrap() += a + b;
//!     }
//! }
//!
//! impl Controller for Tally {
//!     fn register_actions(actions: &mut ActionTable<Self>) {
//!         actions.action("Add", Tally::add);
//!     }
//! }
//!
//! let processor = CommandProcessor::builder()
//!     .controller(Tally::default())
//!     .config(RuntimeConfig::default())
//!     .build();
//!
//! processor.invoke("Tally://Add/1/2").unwrap();
//! assert!(processor.invoke("Ghost://Add/1/2").is_err());
//! ```

mod action;
mod controller;
mod error;
mod processor;


pub use action::{Action, ActionError, ActionOutcome, ActionSignature, ActionTable};
pub use controller::{Controller, ControllerRegistry};
pub use error::{BoxError, CommandError, ErrorCategory, HandlerPanic};
pub use processor::{CommandProcessor, CommandProcessorBuilder};
