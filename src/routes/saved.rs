use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    state::AppState,
    store::{Action, View, ViewSnapshot},
};

#[derive(Debug, Serialize)]
pub struct SavedResponse {
    /// Every saved id, including ones whose record is not loaded
    pub ids: Vec<String>,
    pub snapshot: ViewSnapshot,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedState {
    pub id: String,
    pub is_saved: bool,
}

pub async fn list(State(state): State<AppState>) -> Json<SavedResponse> {
    let store = state.store.read().await;
    Json(SavedResponse {
        ids: store.saved().ids().map(str::to_string).collect(),
        snapshot: store.snapshot(View::Saved),
    })
}

pub async fn save(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<SavedState>> {
    apply(&state, &id, Action::Save).await
}

pub async fn unsave(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<SavedState>> {
    apply(&state, &id, Action::Unsave).await
}

/// The bookmark button: saves when absent, unsaves when present
pub async fn toggle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<SavedState>> {
    apply(&state, &id, Action::ToggleSaved).await
}

async fn apply(
    state: &AppState,
    id: &str,
    action: fn(String) -> Action,
) -> AppResult<Json<SavedState>> {
    let id = id.trim().to_string();
    if id.is_empty() {
        return Err(AppError::InvalidInput("Internship id must not be empty".to_string()));
    }

    let mut store = state.store.write().await;
    if store.session().is_none() {
        return Err(AppError::Unauthorized);
    }
    store.dispatch(action(id.clone()));

    Ok(Json(SavedState {
        is_saved: store.is_saved(&id),
        id,
    }))
}
