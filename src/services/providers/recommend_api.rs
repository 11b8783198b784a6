/// Recommendation API provider
///
/// Talks to the recommendation service over HTTP:
/// 1. Recommendations: POST /recommend/ with the profile → JSON array of records
/// 2. Resume upload: POST /upload-resume/{user_id}/ as multipart, field `resumeFile`
///
/// The service serializes pandas frames, so bare `NaN`/`Infinity` literals can
/// show up in otherwise valid JSON; they are read as `null`.
use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{RawInternship, RecommendationRequest, ResumeUpload},
    services::providers::CatalogProvider,
};
use reqwest::{
    multipart::{Form, Part},
    Client as HttpClient, Response,
};
use serde_json::Value;
use std::borrow::Cow;
use std::time::Duration;

const RESUME_FIELD: &str = "resumeFile";

#[derive(Clone)]
pub struct RecommendApiProvider {
    http_client: HttpClient,
    api_url: String,
    /// Extra attempts after a transient failure
    retries: u32,
    backoff: Duration,
}

impl RecommendApiProvider {
    pub fn new(
        api_url: String,
        timeout: Duration,
        retries: u32,
        backoff: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
            retries,
            backoff,
        })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(
            config.recommend_api_url.clone(),
            config.request_timeout(),
            config.fetch_retries,
            config.retry_backoff(),
        )
    }

    fn recommend_url(&self) -> String {
        format!("{}/recommend/", self.api_url)
    }

    fn upload_url(&self, user_id: &str) -> String {
        format!("{}/upload-resume/{}/", self.api_url, user_id)
    }

    /// One round trip to /recommend/, no retries
    async fn fetch_once(&self, request: &RecommendationRequest) -> AppResult<Vec<RawInternship>> {
        let response = self
            .http_client
            .post(self.recommend_url())
            .json(request)
            .send()
            .await?;

        let body = ensure_success(response).await?.text().await?;
        parse_records(&body)
    }
}

#[async_trait::async_trait]
impl CatalogProvider for RecommendApiProvider {
    async fn fetch_recommendations(
        &self,
        request: &RecommendationRequest,
    ) -> AppResult<Vec<RawInternship>> {
        let mut attempt = 0;

        loop {
            match self.fetch_once(request).await {
                Ok(records) => {
                    tracing::info!(
                        skills = request.skills.len(),
                        results = records.len(),
                        attempt = attempt + 1,
                        provider = self.name(),
                        "Recommendations fetched"
                    );
                    return Ok(records);
                }
                Err(e) if e.is_transient() && attempt < self.retries => {
                    attempt += 1;
                    tracing::warn!(
                        error = %e,
                        attempt,
                        max_retries = self.retries,
                        "Transient recommendation fetch failure, retrying"
                    );
                    tokio::time::sleep(self.backoff).await;
                }
                Err(e) => {
                    tracing::error!(error = %e, attempts = attempt + 1, "Recommendation fetch failed");
                    return Err(e);
                }
            }
        }
    }

    async fn upload_resume(
        &self,
        user_id: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> AppResult<ResumeUpload> {
        if bytes.is_empty() {
            return Err(AppError::InvalidInput("No file provided.".to_string()));
        }

        let size = bytes.len();
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part(RESUME_FIELD, part);

        let response = self
            .http_client
            .post(self.upload_url(user_id))
            .multipart(form)
            .send()
            .await?;

        let upload: ResumeUpload = ensure_success(response).await?.json().await?;

        tracing::info!(
            user_id = %user_id,
            bytes = size,
            file_path = ?upload.file_path,
            "Resume uploaded"
        );

        Ok(upload)
    }

    fn name(&self) -> &'static str {
        "recommend_api"
    }
}

async fn ensure_success(response: Response) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(AppError::UpstreamStatus {
        status: status.as_u16(),
        body,
    })
}

/// Parses a /recommend/ body, skipping entries that are not records
fn parse_records(body: &str) -> AppResult<Vec<RawInternship>> {
    let payload: Value = serde_json::from_str(&replace_non_finite_literals(body))
        .map_err(|e| AppError::ExternalApi(format!("Failed to parse recommendations: {}", e)))?;

    let items = payload.as_array().ok_or_else(|| {
        AppError::ExternalApi("Invalid recommendation response format".to_string())
    })?;

    let records = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            serde_json::from_value::<RawInternship>(item.clone())
                .map_err(|e| {
                    tracing::warn!(index, error = %e, "Skipping malformed internship record");
                })
                .ok()
        })
        .collect();

    Ok(records)
}

/// Rewrites `NaN`, `Infinity` and `-Infinity` outside of strings as `null`
fn replace_non_finite_literals(body: &str) -> Cow<'_, str> {
    if !body.contains("NaN") && !body.contains("Infinity") {
        return Cow::Borrowed(body);
    }

    let mut out = String::with_capacity(body.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut rest = body;

    while let Some(c) = rest.chars().next() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
        } else if let Some(literal) = ["-Infinity", "Infinity", "NaN"]
            .into_iter()
            .find(|literal| rest.starts_with(literal))
        {
            out.push_str("null");
            rest = &rest[literal.len()..];
            continue;
        }

        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    Cow::Owned(out)
}
