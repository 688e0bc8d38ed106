//! Caught Pokémon and the catch roll
//!
//! The chance of catching a Pokémon falls as its base experience rises, but
//! never drops below [`MIN_CATCH_PROBABILITY`].

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use rand::Rng;

use crate::api::Pokemon;

/// Floor for the catch probability of very strong Pokémon
pub const MIN_CATCH_PROBABILITY: f64 = 0.2;

/// Probability of a successful catch for the given base experience
///
/// Computed as `200 / (base_experience + 50)`, floored at
/// [`MIN_CATCH_PROBABILITY`]. Values above 1.0 mean a guaranteed catch.
pub fn catch_probability(base_experience: u32) -> f64 {
    (200.0 / (f64::from(base_experience) + 50.0)).max(MIN_CATCH_PROBABILITY)
}

/// Rolls once against [`catch_probability`]
pub fn attempt_catch<R: Rng + ?Sized>(rng: &mut R, base_experience: u32) -> bool {
    rng.gen::<f64>() < catch_probability(base_experience)
}

/// A caught Pokémon
#[derive(Debug, Clone)]
pub struct PokedexEntry {
    pub pokemon: Pokemon,
    /// When the Pokémon was caught
    pub caught_at: DateTime<Local>,
}

/// The player's collection, keyed by Pokémon name
#[derive(Debug, Default)]
pub struct Pokedex {
    entries: BTreeMap<String, PokedexEntry>,
}

impl Pokedex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a Pokémon with this name has been caught
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&PokedexEntry> {
        self.entries.get(name)
    }

    /// Records a caught Pokémon, replacing any earlier entry with the same name
    pub fn record(&mut self, pokemon: Pokemon) -> &PokedexEntry {
        let name = pokemon.name.clone();
        let entry = PokedexEntry {
            pokemon,
            caught_at: Local::now(),
        };
        self.entries.insert(name.clone(), entry);
        &self.entries[&name]
    }

    /// Names of caught Pokémon in alphabetical order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
