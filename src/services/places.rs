use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::IntegrationsConfig;

#[derive(Debug, Error)]
pub enum PlacesError {
    #[error("Google Places API key is not configured")]
    NotConfigured,

    #[error("Places request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Places API returned status {0}")]
    Upstream(String),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceSuggestion {
    pub place_id: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetails {
    pub place_id: String,
    pub name: Option<String>,
    pub formatted_address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub city: Option<String>,
    pub country: Option<String>,
}

#[derive(Deserialize)]
struct AutocompleteResponse {
    status: String,
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
struct Prediction {
    place_id: String,
    description: String,
}

#[derive(Deserialize)]
struct DetailsResponse {
    status: String,
    result: Option<DetailsResult>,
}

#[derive(Deserialize)]
struct DetailsResult {
    place_id: String,
    name: Option<String>,
    formatted_address: Option<String>,
    geometry: Option<Geometry>,
    #[serde(default)]
    address_components: Vec<AddressComponent>,
}

#[derive(Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct AddressComponent {
    long_name: String,
    #[serde(default)]
    types: Vec<String>,
}

fn component(components: &[AddressComponent], kind: &str) -> Option<String> {
    components
        .iter()
        .find(|c| c.types.iter().any(|t| t == kind))
        .map(|c| c.long_name.clone())
}

/// Thin proxy over the Google Places web service so the API key never
/// reaches the browser.
#[derive(Debug, Clone)]
pub struct PlacesClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl PlacesClient {
    pub fn new(config: &IntegrationsConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            base_url: config.google_places_base_url.trim_end_matches('/').to_string(),
            api_key: config.google_places_api_key.clone().filter(|k| !k.is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn key(&self) -> Result<&str, PlacesError> {
        self.api_key.as_deref().ok_or(PlacesError::NotConfigured)
    }

    pub async fn autocomplete(&self, input: &str) -> Result<Vec<PlaceSuggestion>, PlacesError> {
        let key = self.key()?;
        let url = format!("{}/autocomplete/json", self.base_url);

        let body: AutocompleteResponse = self
            .http
            .get(&url)
            .query(&[("input", input), ("key", key)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        match body.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(body
                .predictions
                .into_iter()
                .map(|p| PlaceSuggestion {
                    place_id: p.place_id,
                    description: p.description,
                })
                .collect()),
            other => Err(PlacesError::Upstream(other.to_string())),
        }
    }

    /// `None` when Google does not know the place id.
    pub async fn details(&self, place_id: &str) -> Result<Option<PlaceDetails>, PlacesError> {
        let key = self.key()?;
        let url = format!("{}/details/json", self.base_url);

        let body: DetailsResponse = self
            .http
            .get(&url)
            .query(&[
                ("place_id", place_id),
                ("fields", "place_id,name,formatted_address,geometry,address_component"),
                ("key", key),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        match body.status.as_str() {
            "OK" => Ok(body.result.map(|r| {
                let location = r.geometry.map(|g| g.location);
                PlaceDetails {
                    city: component(&r.address_components, "locality"),
                    country: component(&r.address_components, "country"),
                    latitude: location.as_ref().map(|l| l.lat),
                    longitude: location.as_ref().map(|l| l.lng),
                    place_id: r.place_id,
                    name: r.name,
                    formatted_address: r.formatted_address,
                }
            })),
            "NOT_FOUND" | "INVALID_REQUEST" | "ZERO_RESULTS" => Ok(None),
            other => Err(PlacesError::Upstream(other.to_string())),
        }
    }
}
