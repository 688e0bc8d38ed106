//! Pokedex CLI - explore the Pokémon world from your terminal
//!
//! Reads commands from stdin, looks things up on PokeAPI through a shared
//! response cache and keeps track of the Pokémon you catch.

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use pokedex::api::PokeApiClient;
use pokedex::cache::TimedCache;
use pokedex::cli::{Cli, SessionConfig};
use pokedex::repl::{self, Session};

/// Initializes tracing on stderr so logs never mix with REPL output
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    init_tracing();

    let cli = Cli::parse();
    let config = match SessionConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(ExitCode::from(2));
        }
    };
    tracing::debug!(?config, "Starting Pokedex");

    let cache = Arc::new(TimedCache::new(config.cache_ttl));
    let client = PokeApiClient::with_base_url(
        Arc::clone(&cache),
        config.base_url.as_str(),
        config.request_timeout,
    )?;
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = Session::new(client, rng);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = io::stdout();
    let result = repl::run(&mut session, stdin, &mut stdout).await;

    cache.close();
    result?;
    Ok(ExitCode::SUCCESS)
}
