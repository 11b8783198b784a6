use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppResult,
    services::recommendations,
    state::AppState,
    store::{FetchOutcome, View, ViewSnapshot},
};

#[derive(Debug, Deserialize)]
pub struct RefreshQuery {
    #[serde(default)]
    view: View,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub view: View,
    /// `applied`, `failed` or `discarded`
    pub outcome: &'static str,
    pub snapshot: ViewSnapshot,
}

/// Re-runs the profile query for a view and returns what it now shows
///
/// A failed fetch is not an HTTP error: the previous list comes back with a
/// `failed` status carrying the notice.
pub async fn refresh(
    State(state): State<AppState>,
    Query(params): Query<RefreshQuery>,
) -> AppResult<Json<RefreshResponse>> {
    let outcome =
        recommendations::refresh(&state.store, state.provider.as_ref(), params.view).await?;

    let outcome = match outcome {
        FetchOutcome::Applied { .. } => "applied",
        FetchOutcome::Failed { .. } => "failed",
        FetchOutcome::Discarded => "discarded",
    };

    let snapshot = state.store.read().await.snapshot(params.view);
    Ok(Json(RefreshResponse {
        view: params.view,
        outcome,
        snapshot,
    }))
}
