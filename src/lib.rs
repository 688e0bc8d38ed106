//! Pokedex CLI Library
//!
//! An interactive Pokedex backed by PokeAPI. Responses are held in a
//! time-expiring in-memory cache so repeated lookups skip the network.

pub mod api;
pub mod cache;
pub mod cli;
pub mod pokedex;
pub mod repl;
