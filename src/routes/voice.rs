use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::FilterCriteria,
    services::voice,
    state::AppState,
    store::{Action, View},
};

#[derive(Debug, Deserialize)]
pub struct VoiceCommand {
    pub transcript: String,
}

#[derive(Debug, Serialize)]
pub struct VoiceResponse {
    pub transcript: String,
    /// Empty when the command was not understood
    pub actions: Vec<Action>,
    pub view: View,
    pub criteria: FilterCriteria,
}

/// Applies a transcript captured by the browser's speech recognition
pub async fn command(
    State(state): State<AppState>,
    Json(command): Json<VoiceCommand>,
) -> AppResult<Json<VoiceResponse>> {
    let transcript = command.transcript.trim().to_string();
    if transcript.is_empty() {
        return Err(AppError::InvalidInput("Transcript must not be empty".to_string()));
    }

    let actions = voice::interpret(&transcript);
    if actions.is_empty() {
        tracing::info!(transcript = %transcript, "Voice command not recognised");
    }

    let mut store = state.store.write().await;
    store.dispatch_all(actions.clone());

    Ok(Json(VoiceResponse {
        transcript,
        actions,
        view: store.current_view(),
        criteria: store.criteria().clone(),
    }))
}
