use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::UserSession,
    services::session,
    state::AppState,
};

/// Form field carrying the file, as the recommendation API names it
const RESUME_FIELD: &str = "resumeFile";

/// Forwards an uploaded resume to the recommendation API
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<UserSession>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Malformed upload: {}", e)))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("resume").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Malformed upload: {}", e)))?;

        let session = session::attach_resume(
            &state.store,
            state.sessions.as_ref(),
            state.provider.as_ref(),
            &file_name,
            bytes.to_vec(),
        )
        .await?;
        return Ok(Json(session));
    }

    Err(AppError::InvalidInput(format!(
        "Missing `{}` file field",
        RESUME_FIELD
    )))
}
