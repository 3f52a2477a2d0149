//! `POST /chat`: one conversational turn.
//!
//! A language-model failure still answers 200 with the apology text and an empty action;
//! only malformed requests produce an error status.

use super::{parse_turn, ApiError, TurnRequest};
use crate::app::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use haven_core::SuggestedAction;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub action: SuggestedAction,
}

pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<TurnRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let (text, session_id) = parse_turn(payload)?;
    let outcome = state.generator.respond(&session_id, &text).await;
    Ok(Json(ChatResponse {
        response: outcome.reply,
        action: outcome.action,
    }))
}
