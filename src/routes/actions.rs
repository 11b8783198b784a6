use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::FilterCriteria,
    state::AppState,
    store::{Action, View},
};

/// One action or the ordered actions of a single gesture
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ActionBatch {
    One(Action),
    Many(Vec<Action>),
}

impl ActionBatch {
    fn into_actions(self) -> Vec<Action> {
        match self {
            ActionBatch::One(action) => vec![action],
            ActionBatch::Many(actions) => actions,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DispatchResponse {
    pub changed: bool,
    pub view: View,
    pub criteria: FilterCriteria,
}

/// Applies store actions, publishing once for the whole batch
pub async fn dispatch(
    State(state): State<AppState>,
    Json(batch): Json<ActionBatch>,
) -> AppResult<Json<DispatchResponse>> {
    let actions = batch.into_actions();
    if actions.is_empty() {
        return Err(AppError::InvalidInput("No actions given".to_string()));
    }

    let mut store = state.store.write().await;
    let changed = store.dispatch_all(actions);

    Ok(Json(DispatchResponse {
        changed,
        view: store.current_view(),
        criteria: store.criteria().clone(),
    }))
}

pub async fn criteria(State(state): State<AppState>) -> Json<FilterCriteria> {
    Json(state.store.read().await.criteria().clone())
}

pub async fn replace_criteria(
    State(state): State<AppState>,
    Json(criteria): Json<FilterCriteria>,
) -> Json<FilterCriteria> {
    let mut store = state.store.write().await;
    store.dispatch(Action::SetCriteria(criteria));
    Json(store.criteria().clone())
}

/// Resets query, locations, sectors and type; the sort order is kept
pub async fn clear_filters(State(state): State<AppState>) -> Json<FilterCriteria> {
    let mut store = state.store.write().await;
    store.dispatch(Action::ClearFilters);
    Json(store.criteria().clone())
}
