use tokio::sync::RwLock;

use crate::{
    error::AppResult,
    services::providers::CatalogProvider,
    store::{AppStore, FetchOutcome, View},
};

/// Refreshes the catalog behind `view` from the recommendation service
///
/// The store lock is taken twice: once to mark the view as loading and read
/// the profile query, once to hand back the result. The network round trip
/// happens in between without holding it, so navigation or logout during the
/// fetch turns the result into [`FetchOutcome::Discarded`].
pub async fn refresh(
    store: &RwLock<AppStore>,
    provider: &dyn CatalogProvider,
    view: View,
) -> AppResult<FetchOutcome> {
    let (ticket, request) = store.write().await.begin_fetch(view)?;

    tracing::info!(
        provider = provider.name(),
        view = ?view,
        skills = request.skills.len(),
        "Fetching recommendations"
    );

    let result = provider.fetch_recommendations(&request).await;
    let outcome = store.write().await.complete_fetch(ticket, result);

    match &outcome {
        FetchOutcome::Applied { records } => {
            tracing::info!(view = ?view, records, "Recommendations loaded")
        }
        FetchOutcome::Failed { notice } => {
            tracing::warn!(view = ?view, notice = %notice, "Recommendations unavailable")
        }
        FetchOutcome::Discarded => tracing::debug!(view = ?view, "Recommendations discarded"),
    }

    Ok(outcome)
}
