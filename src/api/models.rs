//! PokeAPI response payloads and the domain types decoded from them

use serde::Deserialize;

/// A `{ "name": ..., "url": ... }` reference as PokeAPI returns it
#[derive(Debug, Deserialize)]
struct NamedResource {
    name: String,
}

/// Response from `/location-area`
#[derive(Debug, Deserialize)]
struct LocationAreaListResponse {
    results: Vec<NamedResource>,
    next: Option<String>,
    previous: Option<String>,
}

/// Response from `/location-area/{name}/`
#[derive(Debug, Deserialize)]
struct LocationAreaResponse {
    #[serde(default)]
    name: String,
    #[serde(default)]
    pokemon_encounters: Vec<PokemonEncounter>,
}

#[derive(Debug, Deserialize)]
struct PokemonEncounter {
    pokemon: NamedResource,
}

/// Response from `/pokemon/{name}`
#[derive(Debug, Deserialize)]
struct PokemonResponse {
    name: String,
    /// Null for a handful of alternate forms
    base_experience: Option<u32>,
    height: u32,
    weight: u32,
    #[serde(default)]
    stats: Vec<StatSlot>,
    #[serde(default)]
    types: Vec<TypeSlot>,
}

#[derive(Debug, Deserialize)]
struct StatSlot {
    base_stat: u32,
    stat: NamedResource,
}

#[derive(Debug, Deserialize)]
struct TypeSlot {
    #[serde(rename = "type")]
    kind: NamedResource,
}

/// One page of location-area names plus links to the neighbouring pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationPage {
    pub names: Vec<String>,
    /// Full URL of the next page, if any
    pub next: Option<String>,
    /// Full URL of the previous page, if any
    pub previous: Option<String>,
}

impl LocationPage {
    /// Decodes a `/location-area` response body
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        let response: LocationAreaListResponse = serde_json::from_slice(body)?;
        Ok(Self {
            names: response.results.into_iter().map(|r| r.name).collect(),
            next: response.next,
            previous: response.previous,
        })
    }
}

/// A location area and the Pokémon that can be encountered there
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationArea {
    pub name: String,
    pub pokemon: Vec<String>,
}

impl LocationArea {
    /// Decodes a `/location-area/{name}/` response body
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        let response: LocationAreaResponse = serde_json::from_slice(body)?;
        Ok(Self {
            name: response.name,
            pokemon: response
                .pokemon_encounters
                .into_iter()
                .map(|e| e.pokemon.name)
                .collect(),
        })
    }
}

/// A single base stat such as `hp` or `attack`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub name: String,
    pub base: u32,
}

/// The parts of a Pokémon record the Pokedex keeps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pokemon {
    pub name: String,
    pub base_experience: u32,
    /// Height in decimetres
    pub height: u32,
    /// Weight in hectograms
    pub weight: u32,
    /// Base stats in the order PokeAPI lists them
    pub stats: Vec<Stat>,
    pub types: Vec<String>,
}

impl Pokemon {
    /// Decodes a `/pokemon/{name}` response body
    ///
    /// A null `base_experience` is read as zero.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        let response: PokemonResponse = serde_json::from_slice(body)?;
        Ok(Self {
            name: response.name,
            base_experience: response.base_experience.unwrap_or(0),
            height: response.height,
            weight: response.weight,
            stats: response
                .stats
                .into_iter()
                .map(|s| Stat {
                    name: s.stat.name,
                    base: s.base_stat,
                })
                .collect(),
            types: response.types.into_iter().map(|t| t.kind.name).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_location_page_from_json() {
        let body = json!({
            "count": 1089,
            "next": "https://pokeapi.co/api/v2/location-area?offset=20&limit=20",
            "previous": null,
            "results": [
                { "name": "canalave-city-area", "url": "https://pokeapi.co/api/v2/location-area/1/" },
                { "name": "eterna-city-area", "url": "https://pokeapi.co/api/v2/location-area/2/" }
            ]
        });

        let page = LocationPage::from_json(body.to_string().as_bytes()).unwrap();

        assert_eq!(page.names, vec!["canalave-city-area", "eterna-city-area"]);
        assert_eq!(
            page.next.as_deref(),
            Some("https://pokeapi.co/api/v2/location-area?offset=20&limit=20")
        );
        assert!(page.previous.is_none());
    }

    #[test]
    fn test_location_area_from_json() {
        let body = json!({
            "id": 1,
            "name": "canalave-city-area",
            "pokemon_encounters": [
                { "pokemon": { "name": "tentacool", "url": "" }, "version_details": [] },
                { "pokemon": { "name": "tentacruel", "url": "" }, "version_details": [] }
            ]
        });

        let area = LocationArea::from_json(body.to_string().as_bytes()).unwrap();

        assert_eq!(area.name, "canalave-city-area");
        assert_eq!(area.pokemon, vec!["tentacool", "tentacruel"]);
    }

    #[test]
    fn test_location_area_without_encounters() {
        let area = LocationArea::from_json(br#"{"name": "empty-area"}"#).unwrap();
        assert!(area.pokemon.is_empty());
    }

    #[test]
    fn test_pokemon_from_json() {
        let body = json!({
            "name": "pikachu",
            "base_experience": 112,
            "height": 4,
            "weight": 60,
            "stats": [
                { "base_stat": 35, "effort": 0, "stat": { "name": "hp", "url": "" } },
                { "base_stat": 55, "effort": 0, "stat": { "name": "attack", "url": "" } }
            ],
            "types": [
                { "slot": 1, "type": { "name": "electric", "url": "" } }
            ]
        });

        let pokemon = Pokemon::from_json(body.to_string().as_bytes()).unwrap();

        assert_eq!(pokemon.name, "pikachu");
        assert_eq!(pokemon.base_experience, 112);
        assert_eq!(pokemon.height, 4);
        assert_eq!(pokemon.weight, 60);
        assert_eq!(
            pokemon.stats,
            vec![
                Stat { name: "hp".to_string(), base: 35 },
                Stat { name: "attack".to_string(), base: 55 },
            ]
        );
        assert_eq!(pokemon.types, vec!["electric"]);
    }

    #[test]
    fn test_pokemon_null_base_experience_reads_as_zero() {
        let body = br#"{"name": "pikachu-cosplay", "base_experience": null, "height": 4, "weight": 60}"#;
        let pokemon = Pokemon::from_json(body).unwrap();
        assert_eq!(pokemon.base_experience, 0);
    }

    #[test]
    fn test_malformed_body_is_an_error() {
        assert!(Pokemon::from_json(b"<html>not json</html>").is_err());
        assert!(LocationPage::from_json(b"{}").is_err());
    }
}
