//! `GET /quote`: a short uplifting quote for the front end, proxied from `quote_url`.

use super::ApiError;
use crate::app::AppState;
use axum::extract::State;
use axum::Json;

pub async fn quote(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    match fetch_quote(&state.http, &state.config.quote_url).await {
        Ok(body) => Ok(Json(body)),
        Err(e) => {
            tracing::error!(target: "haven::gateway", error = %e, "quote fetch failed");
            Err(ApiError::Upstream("Failed to fetch quote".to_string()))
        }
    }
}

async fn fetch_quote(
    client: &reqwest::Client,
    url: &str,
) -> Result<serde_json::Value, reqwest::Error> {
    client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await
}
