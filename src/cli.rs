//! Command-line interface parsing for the Pokedex
//!
//! This module handles parsing of CLI arguments using clap and turns them
//! into the `SessionConfig` used to build the cache, API client and REPL.

use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::api::{DEFAULT_TIMEOUT, POKEAPI_BASE_URL};

/// How long API responses stay cached unless overridden
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5);

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// A cache TTL of zero would expire every entry immediately
    #[error("Invalid cache TTL: must be at least 1 second")]
    ZeroCacheTtl,

    /// A zero timeout would fail every request
    #[error("Invalid timeout: must be at least 1 second")]
    ZeroTimeout,
}

/// Pokedex - explore the Pokémon world from your terminal
#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "Interactive Pokedex backed by PokeAPI")]
#[command(version)]
pub struct Cli {
    /// Seconds an API response stays in the in-memory cache
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_CACHE_TTL.as_secs())]
    pub cache_ttl: u64,

    /// PokeAPI base URL
    #[arg(long, value_name = "URL", default_value = POKEAPI_BASE_URL)]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Seed for catch rolls, for reproducible sessions
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,
}

/// Configuration derived from CLI arguments for a REPL session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Time-to-live for cached API responses
    pub cache_ttl: Duration,
    /// PokeAPI base URL
    pub base_url: String,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Seed for catch rolls; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_CACHE_TTL,
            base_url: POKEAPI_BASE_URL.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
            seed: None,
        }
    }
}

impl SessionConfig {
    /// Creates a SessionConfig from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(SessionConfig)` with the requested settings
    /// * `Err(CliError)` if a duration was zero
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if cli.cache_ttl == 0 {
            return Err(CliError::ZeroCacheTtl);
        }
        if cli.timeout == 0 {
            return Err(CliError::ZeroTimeout);
        }

        Ok(SessionConfig {
            cache_ttl: Duration::from_secs(cli.cache_ttl),
            base_url: cli.base_url.clone(),
            request_timeout: Duration::from_secs(cli.timeout),
            seed: cli.seed,
        })
    }
}
