use axum::{
    http::{header::CONTENT_TYPE, Method, StatusCode},
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::{make_span_with_request_id, request_id_middleware},
    state::AppState,
};

pub mod actions;
pub mod insights;
pub mod recommendations;
pub mod resume;
pub mod saved;
pub mod session;
pub mod views;
pub mod voice;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/session",
            get(session::current)
                .put(session::login)
                .patch(session::update_profile)
                .delete(session::logout),
        )
        .route("/resume", post(resume::upload))
        .route("/recommendations/refresh", post(recommendations::refresh))
        .route("/views/:view", get(views::snapshot))
        .route("/views/:view/stream", get(views::stream))
        .route("/actions", post(actions::dispatch))
        .route(
            "/filters",
            get(actions::criteria)
                .put(actions::replace_criteria)
                .delete(actions::clear_filters),
        )
        .route("/saved", get(saved::list))
        .route(
            "/saved/:id",
            put(saved::save).post(saved::toggle).delete(saved::unsave),
        )
        .route("/voice", post(voice::command))
        .route("/stats", get(insights::stats))
        .route("/facets", get(insights::facets))
        .route("/map", get(insights::heat_map))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
