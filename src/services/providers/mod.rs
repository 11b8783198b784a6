/// Recommendation catalog abstraction
///
/// The matching and scoring of internships happens on a remote service. This
/// module hides how it is reached so the store and its tests only see raw
/// records coming back from a profile query.
use crate::{
    error::AppResult,
    models::{RawInternship, RecommendationRequest, ResumeUpload},
};

pub mod recommend_api;

pub use recommend_api::RecommendApiProvider;

/// Trait for recommendation catalog providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Runs one profile-based recommendation query
    ///
    /// Records come back un-normalized, in the service's ranking order.
    async fn fetch_recommendations(
        &self,
        request: &RecommendationRequest,
    ) -> AppResult<Vec<RawInternship>>;

    /// Uploads a resume file for the given user
    async fn upload_resume(
        &self,
        user_id: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> AppResult<ResumeUpload>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
