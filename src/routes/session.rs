use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::{AppError, AppResult},
    models::{UserProfile, UserSession},
    services::session,
    state::AppState,
};

/// Returns the signed-in session
pub async fn current(State(state): State<AppState>) -> AppResult<Json<UserSession>> {
    let store = state.store.read().await;
    let session = store.session().cloned().ok_or(AppError::Unauthorized)?;
    Ok(Json(session))
}

pub async fn login(
    State(state): State<AppState>,
    Json(user): Json<UserSession>,
) -> AppResult<Json<UserSession>> {
    let session = session::sign_in(&state.store, state.sessions.as_ref(), user).await?;
    Ok(Json(session))
}

/// Completes onboarding with the submitted profile fields
pub async fn update_profile(
    State(state): State<AppState>,
    Json(profile): Json<UserProfile>,
) -> AppResult<Json<UserSession>> {
    let session =
        session::complete_onboarding(&state.store, state.sessions.as_ref(), profile).await?;
    Ok(Json(session))
}

pub async fn logout(State(state): State<AppState>) -> AppResult<StatusCode> {
    session::sign_out(&state.store, state.sessions.as_ref()).await?;
    Ok(StatusCode::NO_CONTENT)
}
