//! PokeAPI access
//!
//! This module contains the cached HTTP client and the domain types decoded
//! from PokeAPI responses.

mod client;
mod models;

pub use client::{ApiError, PokeApiClient, DEFAULT_TIMEOUT, POKEAPI_BASE_URL};
pub use models::{LocationArea, LocationPage, Pokemon, Stat};
