//! Session lifecycle with persistence.
//!
//! The store holds the live session; a [`SessionStore`] keeps a copy that
//! survives restarts until explicit logout.

use tokio::sync::RwLock;

use crate::{
    db::SessionStore,
    error::{AppError, AppResult},
    models::{UserProfile, UserSession},
    services::providers::CatalogProvider,
    store::AppStore,
};

/// Starts a session and persists it
pub async fn sign_in(
    store: &RwLock<AppStore>,
    sessions: &dyn SessionStore,
    session: UserSession,
) -> AppResult<UserSession> {
    if session.id.trim().is_empty() {
        return Err(AppError::InvalidInput("Session id must not be empty".to_string()));
    }

    sessions.save(&session).await?;
    store.write().await.login(session.clone());

    tracing::info!(user_id = %session.id, backend = sessions.name(), "Signed in");
    Ok(session)
}

/// Merges onboarding answers into the live session and persists the result
pub async fn complete_onboarding(
    store: &RwLock<AppStore>,
    sessions: &dyn SessionStore,
    profile: UserProfile,
) -> AppResult<UserSession> {
    let session = store.write().await.complete_onboarding(profile)?.clone();
    sessions.save(&session).await?;

    tracing::info!(user_id = %session.id, "Onboarding completed");
    Ok(session)
}

/// Ends the session everywhere; signing out twice is not an error
pub async fn sign_out(store: &RwLock<AppStore>, sessions: &dyn SessionStore) -> AppResult<()> {
    let ended = store.write().await.logout();
    sessions.clear().await?;

    if let Some(session) = ended {
        tracing::info!(user_id = %session.id, "Signed out");
    }
    Ok(())
}

/// Reloads a persisted session at startup
///
/// A session that cannot be read is logged and treated as absent so a
/// corrupt entry never prevents the app from starting.
pub async fn restore(
    store: &RwLock<AppStore>,
    sessions: &dyn SessionStore,
) -> Option<UserSession> {
    match sessions.load().await {
        Ok(Some(session)) => {
            tracing::info!(user_id = %session.id, backend = sessions.name(), "Session restored");
            store.write().await.login(session.clone());
            Some(session)
        }
        Ok(None) => {
            tracing::debug!(backend = sessions.name(), "No persisted session");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, backend = sessions.name(), "Could not restore session");
            None
        }
    }
}

/// Uploads a resume for the signed-in user and records where it was stored
pub async fn attach_resume(
    store: &RwLock<AppStore>,
    sessions: &dyn SessionStore,
    provider: &dyn CatalogProvider,
    file_name: &str,
    bytes: Vec<u8>,
) -> AppResult<UserSession> {
    let user_id = store
        .read()
        .await
        .session()
        .map(|s| s.id.clone())
        .ok_or(AppError::Unauthorized)?;

    let upload = provider.upload_resume(&user_id, file_name, bytes).await?;
    tracing::info!(user_id = %user_id, message = %upload.message, "Resume uploaded");

    let session = store.write().await.set_resume(upload.file_path)?.clone();
    sessions.save(&session).await?;
    Ok(session)
}
