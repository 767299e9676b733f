//! Unit tests for CLI commands

use crate::cli::{run, Cli, Commands};
use clap::Parser;

fn run_args(args: &[&str]) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(args)?;
    let mut out = Vec::new();
    run(cli, &mut out)?;
    Ok(String::from_utf8(out)?)
}

#[test]
fn test_invoke_requires_a_uri() {
    assert!(Cli::try_parse_from(["commandwire", "invoke"]).is_err());
}

#[test]
fn test_encode_json_conflicts_with_pair() {
    let parsed = Cli::try_parse_from([
        "commandwire",
        "encode",
        "--json",
        "{}",
        "--pair",
        "a=1",
    ]);
    assert!(parsed.is_err());
}

#[test]
fn test_pair_must_contain_equals() {
    assert!(Cli::try_parse_from(["commandwire", "encode", "--pair", "novalue"]).is_err());

    let cli = Cli::try_parse_from(["commandwire", "encode", "--pair", "a=b=c"]).unwrap();
    match cli.command {
        Commands::Encode { pair, .. } => assert_eq!(pair, vec![("a".into(), "b=c".into())]),
        _ => panic!("Expected Encode command"),
    }
}

#[test]
fn test_invoke_prints_transcript() {
    let output = run_args(&[
        "commandwire",
        "invoke",
        "Echo://Say/hello%20world",
        "Echo://Add/2/3",
        "Echo://Tags/[x,y]",
    ])
    .unwrap();
    assert_eq!(output, "hello world\n5\nx y\n");
}

#[test]
fn test_invoke_stops_at_first_failure() {
    let err = run_args(&["commandwire", "invoke", "Ghost://Say/x", "Echo://Say/y"]).unwrap_err();
    assert!(err.to_string().contains("Ghost://Say/x"));
}

#[test]
fn test_invoke_keep_going_reports_each_failure() {
    let err = run_args(&[
        "commandwire",
        "invoke",
        "--keep-going",
        "Echo://Fail/nope",
        "Echo://Say/after",
    ])
    .unwrap_err();
    assert_eq!(err.to_string(), "1 of 2 commands failed");
}

#[test]
fn test_encode_pairs_and_json() {
    let output = run_args(&["commandwire", "encode", "--pair", "a=1", "--pair", "b=x y"]).unwrap();
    assert_eq!(output, "a=1&b=x%20y\n");

    let output = run_args(&[
        "commandwire",
        "encode",
        "--json",
        r#"{"a":1,"c":null,"b":[1,2]}"#,
        "--explain",
    ])
    .unwrap();
    assert_eq!(output, "a=1&b=[1,2]\nstrategy: Dictionary\n");
}

#[test]
fn test_actions_lists_echo() {
    let output = run_args(&["commandwire", "actions"]).unwrap();
    let listing: serde_json::Value = serde_json::from_str(&output).unwrap();
    let echo = listing["Echo"].as_array().unwrap();
    assert_eq!(echo[0]["name"], "Say");
    assert_eq!(echo[1]["arity"], 2);
}
