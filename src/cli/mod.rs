//! # CLI Module
//!
//! Command-line front end for trying commands and encodings by hand.
//!
//! ## Commands
//!
//! ### `invoke`
//!
//! Run one or more command URIs against the built-in
//! [`Echo`](crate::echo::Echo) controller and print what it recorded:
//!
//! ```bash
//! commandwire invoke 'Echo://Say/hello%20world' 'Echo://Add/2/3'
//! ```
//!
//! ### `actions`
//!
//! Print the registered actions as JSON:
//!
//! ```bash
//! commandwire actions
//! ```
//!
//! ### `encode`
//!
//! Print the query-string form of a JSON object or of `key=value` pairs:
//!
//! ```bash
//! commandwire encode --json '{"a":1,"b":[1,2]}'
//! commandwire encode --pair name=Rex --pair age=3 --explain
//! ```
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use commandwire::cli::run_cli;
//!
//! run_cli()?;
//! ```

mod commands;

pub use commands::{run, run_cli, Cli, Commands};

#[cfg(test)]
mod tests;
