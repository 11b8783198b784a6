use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    services::{
        map::HeatPoint,
        stats::{DashboardStats, Facets},
    },
    state::AppState,
    store::View,
};

#[derive(Debug, Deserialize)]
pub struct MapQuery {
    #[serde(default)]
    view: View,
}

pub async fn stats(State(state): State<AppState>) -> Json<DashboardStats> {
    Json(state.store.read().await.stats())
}

pub async fn facets(State(state): State<AppState>) -> Json<Facets> {
    Json(state.store.read().await.facets())
}

/// Heat map points for the records a view currently shows
pub async fn heat_map(
    State(state): State<AppState>,
    Query(params): Query<MapQuery>,
) -> Json<Vec<HeatPoint>> {
    Json(state.store.read().await.heat_points(params.view))
}
