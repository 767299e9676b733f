use crate::command::CommandProcessor;
use crate::echo::Echo;
use crate::query_string::QueryStringSerializer;
use crate::runtime_config::RuntimeConfig;
use crate::value::QueryValue;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indexmap::IndexMap;
use std::io::Write;

/// Command-line interface for commandwire
#[derive(Parser, Debug)]
#[command(name = "commandwire")]
#[command(about = "Route command URIs and encode query strings", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Invoke command URIs against the built-in Echo controller
    Invoke {
        /// Commands such as `Echo://Say/hello`
        #[arg(required = true, num_args = 1..)]
        uris: Vec<String>,

        /// Keep going after a failed command
        #[arg(long, default_value_t = false)]
        keep_going: bool,
    },
    /// List the actions of the built-in controllers as JSON
    Actions,
    /// Print the query-string encoding of a value
    Encode {
        /// A JSON value, usually an object
        #[arg(long, conflicts_with = "pair")]
        json: Option<String>,

        /// A `key=value` pair; repeat for more
        #[arg(long, value_parser = parse_pair)]
        pair: Vec<(String, String)>,

        /// Also print the write strategy chosen for the value's type
        #[arg(long, default_value_t = false)]
        explain: bool,
    },
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))
}

/// Parse the process arguments and run.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(cli, &mut out)
}

/// Run a parsed command, writing results to `out`.
pub fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    match cli.command {
        Commands::Invoke { uris, keep_going } => {
            let echo = Echo::new();
            let processor = CommandProcessor::builder()
                .controller(echo.clone())
                .config(RuntimeConfig::from_env())
                .build();

            let mut failures = 0_usize;
            for uri in &uris {
                match processor.invoke(uri) {
                    Ok(()) => {
                        for line in echo.drain() {
                            writeln!(out, "{line}")?;
                        }
                    }
                    Err(err) if keep_going => {
                        failures += 1;
                        writeln!(out, "error: {err}")?;
                    }
                    Err(err) => return Err(err).with_context(|| format!("command '{uri}' failed")),
                }
            }
            if failures > 0 {
                anyhow::bail!("{failures} of {} commands failed", uris.len());
            }
        }
        Commands::Actions => {
            let processor = CommandProcessor::builder()
                .controller(Echo::new())
                .config(RuntimeConfig::default())
                .build();
            let listing: IndexMap<&str, _> = processor
                .controllers()
                .into_iter()
                .map(|name| (name, processor.actions(name).unwrap_or_default()))
                .collect();
            writeln!(out, "{}", serde_json::to_string_pretty(&listing)?)?;
        }
        Commands::Encode {
            json,
            pair,
            explain,
        } => {
            let value: Box<dyn QueryValue> = match json {
                Some(raw) => Box::new(
                    serde_json::from_str::<serde_json::Value>(&raw).context("invalid --json value")?,
                ),
                None => Box::new(pair.into_iter().collect::<IndexMap<String, String>>()),
            };

            let serializer = QueryStringSerializer::new();
            writeln!(out, "{}", serializer.serialize_to_string(value.as_ref())?)?;
            if explain {
                let target = crate::value::resolve(value.as_ref()).unwrap_or(value.as_ref());
                let writer = serializer.write_fn(&target.descriptor());
                writeln!(out, "strategy: {:?}", writer.strategy)?;
            }
        }
    }
    Ok(())
}
