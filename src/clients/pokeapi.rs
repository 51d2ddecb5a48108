use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

/// Raw wire shapes of the upstream catalog, limited to the fields we consume.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPokemon {
    pub id: i32,
    pub name: String,
    pub sprites: RawSprites,
    pub abilities: Vec<RawAbilitySlot>,
    pub types: Vec<RawTypeSlot>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSprites {
    pub front_default: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAbilitySlot {
    pub is_hidden: bool,
    pub slot: i32,
    pub ability: RawNamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTypeSlot {
    pub slot: i32,
    #[serde(rename = "type")]
    pub type_info: RawNamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawNamedResource {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTypeDetail {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub damage_relations: RawDamageRelations,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDamageRelations {
    #[serde(default)]
    pub double_damage_from: Vec<RawNamedResource>,
    #[serde(default)]
    pub double_damage_to: Vec<RawNamedResource>,
    #[serde(default)]
    pub half_damage_from: Vec<RawNamedResource>,
    #[serde(default)]
    pub half_damage_to: Vec<RawNamedResource>,
    #[serde(default)]
    pub no_damage_from: Vec<RawNamedResource>,
    #[serde(default)]
    pub no_damage_to: Vec<RawNamedResource>,
}

/// Failures talking to the upstream catalog. Transport, unexpected status
/// and malformed body are deliberately separate variants; callers map them
/// to one gateway-side error but logs keep the distinction.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct PokeApiClient {
    client: Client,
    base_url: String,
}

impl PokeApiClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Reuses a shared HTTP client so connection pools and timeouts are
    /// configured once at startup.
    #[must_use]
    pub fn with_shared_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Fetches a species record by name. Upstream 404 means the name does
    /// not exist in the catalog and is reported as `Ok(None)`.
    pub async fn fetch_pokemon(&self, name: &str) -> Result<Option<RawPokemon>, ClientError> {
        let url = format!("{}/pokemon/{}", self.base_url, urlencoding::encode(name));
        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }

        let body = response.text().await?;
        let raw: RawPokemon = serde_json::from_str(&body)?;
        Ok(Some(raw))
    }

    /// Fetches the extended detail of a type by its upstream numeric id.
    pub async fn fetch_type(&self, id: i64) -> Result<RawTypeDetail, ClientError> {
        let url = format!("{}/type/{}", self.base_url, id);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }

        let body = response.text().await?;
        let raw: RawTypeDetail = serde_json::from_str(&body)?;
        Ok(raw)
    }
}

/// Extracts the numeric id from an upstream resource URL, e.g.
/// `https://pokeapi.co/api/v2/type/13/` -> 13.
#[must_use]
pub fn id_from_resource_url(url: &str) -> Option<i64> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_from_resource_url_parses_trailing_segment() {
        assert_eq!(
            id_from_resource_url("https://pokeapi.co/api/v2/type/13/"),
            Some(13)
        );
        assert_eq!(
            id_from_resource_url("https://pokeapi.co/api/v2/ability/9"),
            Some(9)
        );
    }

    #[test]
    fn id_from_resource_url_rejects_non_numeric() {
        assert_eq!(id_from_resource_url("https://pokeapi.co/api/v2/type/"), None);
        assert_eq!(id_from_resource_url(""), None);
    }

    #[test]
    fn raw_pokemon_decodes_consumed_fields() {
        let body = r#"{
            "id": 25,
            "name": "pikachu",
            "base_experience": 112,
            "sprites": {"front_default": "url1", "back_default": "url2"},
            "abilities": [
                {"is_hidden": false, "slot": 1, "ability": {"name": "static", "url": "https://pokeapi.co/api/v2/ability/9/"}}
            ],
            "types": [
                {"slot": 1, "type": {"name": "electric", "url": "https://pokeapi.co/api/v2/type/13/"}}
            ]
        }"#;

        let raw: RawPokemon = serde_json::from_str(body).unwrap();
        assert_eq!(raw.id, 25);
        assert_eq!(raw.abilities[0].ability.name, "static");
        assert_eq!(raw.types[0].type_info.name, "electric");
        assert_eq!(raw.sprites.front_default.as_deref(), Some("url1"));
    }

    #[test]
    fn raw_type_detail_decodes_damage_relations() {
        let body = r#"{
            "id": 13,
            "name": "electric",
            "damage_relations": {
                "double_damage_from": [{"name": "ground", "url": "https://pokeapi.co/api/v2/type/5/"}],
                "double_damage_to": [{"name": "water", "url": "https://pokeapi.co/api/v2/type/11/"}],
                "half_damage_from": [],
                "half_damage_to": [],
                "no_damage_from": [],
                "no_damage_to": [{"name": "ground", "url": "https://pokeapi.co/api/v2/type/5/"}]
            }
        }"#;

        let raw: RawTypeDetail = serde_json::from_str(body).unwrap();
        assert_eq!(raw.name, "electric");
        assert_eq!(raw.damage_relations.double_damage_from[0].name, "ground");
        assert_eq!(raw.damage_relations.no_damage_to[0].name, "ground");
    }
}
