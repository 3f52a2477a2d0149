//! `POST /classify`: classify text and cache the label on the session.

use super::{parse_turn, ApiError, TurnRequest};
use crate::app::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub emotion: String,
}

pub async fn classify(
    State(state): State<AppState>,
    payload: Result<Json<TurnRequest>, JsonRejection>,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let (text, session_id) = parse_turn(payload)?;
    let emotion = state.generator.classify_for_session(&session_id, &text).await;
    Ok(Json(ClassifyResponse { emotion }))
}
