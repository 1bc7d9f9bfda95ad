use axum::extract::State;
use serde::Deserialize;

use crate::error::ApiError;
use crate::middleware::{found, ApiQuery, ApiResponse, ApiResult};
use crate::services::places::{PlaceDetails, PlaceSuggestion};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AutocompleteQuery {
    #[serde(default)]
    pub input: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsQuery {
    #[serde(default)]
    pub place_id: String,
}

/// GET /api/places/autocomplete?input=
pub async fn autocomplete(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<AutocompleteQuery>,
) -> ApiResult<Vec<PlaceSuggestion>> {
    let input = query.input.trim();
    if input.is_empty() {
        return Err(ApiError::bad_request("input is required"));
    }
    Ok(ApiResponse::success(state.places.autocomplete(input).await?))
}

/// GET /api/places/details?placeId=
pub async fn details(State(state): State<AppState>, ApiQuery(query): ApiQuery<DetailsQuery>) -> ApiResult<PlaceDetails> {
    let place_id = query.place_id.trim();
    if place_id.is_empty() {
        return Err(ApiError::bad_request("placeId is required"));
    }
    Ok(ApiResponse::success(found(state.places.details(place_id).await?, "Place")?))
}
