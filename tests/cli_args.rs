//! Integration tests for the pokedex binary
//!
//! Drives the binary through its flags and stdin with commands that never
//! reach the network.

use std::io::Write;
use std::process::{Command, Output, Stdio};

/// Helper to run the CLI with given args and stdin, capturing output
fn run_cli(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_pokedex"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute pokedex");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("Failed to write stdin");

    child.wait_with_output().expect("Failed to wait for pokedex")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"], "");
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("pokedex"), "Help should mention pokedex");
    assert!(stdout.contains("--cache-ttl"), "Help should mention --cache-ttl");
}

#[test]
fn test_zero_cache_ttl_prints_error_and_exits() {
    let output = run_cli(&["--cache-ttl", "0"], "");
    assert!(!output.status.success(), "Expected zero TTL to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("cache TTL"),
        "Should print error message about the TTL: {}",
        stderr
    );
}

#[test]
fn test_help_command_then_exit() {
    let output = run_cli(&[], "help\nexit\n");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Pokedex > "));
    assert!(stdout.contains("Welcome to the Pokedex!"));
    assert!(stdout.contains("catch: Attempt to catch a Pokémon"));
    assert!(stdout.contains("Closing the Pokedex... Goodbye!"));
}

#[test]
fn test_end_of_input_exits_cleanly() {
    let output = run_cli(&["--seed", "3"], "pokedex\nmapb\nwhatever\n");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Your Pokedex is empty."));
    assert!(stdout.contains("you're on the first page"));
    assert!(stdout.contains("Unknown command: whatever"));
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use pokedex::cli::{Cli, CliError, SessionConfig};
    use std::time::Duration;

    #[test]
    fn test_cli_no_args_gives_default_config() {
        let cli = Cli::parse_from(["pokedex"]);
        let config = SessionConfig::from_cli(&cli).unwrap();
        assert_eq!(config.cache_ttl, Duration::from_secs(5));
        assert_eq!(config.base_url, "https://pokeapi.co/api/v2");
    }

    #[test]
    fn test_cli_custom_ttl() {
        let cli = Cli::parse_from(["pokedex", "--cache-ttl", "120"]);
        let config = SessionConfig::from_cli(&cli).unwrap();
        assert_eq!(config.cache_ttl, Duration::from_secs(120));
    }

    #[test]
    fn test_cli_zero_ttl_is_rejected() {
        let cli = Cli::parse_from(["pokedex", "--cache-ttl", "0"]);
        assert!(matches!(
            SessionConfig::from_cli(&cli),
            Err(CliError::ZeroCacheTtl)
        ));
    }
}
