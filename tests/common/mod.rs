#![allow(dead_code)]

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};
use tokio::net::TcpListener;

use internship_radar::services::providers::RecommendApiProvider;

/// Body served by the stub, in the shape pandas `to_dict("records")` produces
pub const RECOMMEND_BODY: &str = r#"[
    {"id": 1, "title": "Backend Intern", "company": "Acme", "location": "Bengaluru",
     "sector": "Technology", "duration": "3 months", "stipend": "₹15,000",
     "tags": "python, django", "lat": 12.97, "lng": 77.59, "postedDate": "2025-09-01"},
    {"id": 2, "title": "Design Intern", "company": "Studio", "location": "Remote",
     "sector": "Design", "duration": "2 months", "stipend": "Unpaid",
     "tags": ["figma"], "lat": NaN, "lng": NaN}
]"#;

/// Programmable stand-in for the recommendation API
#[derive(Clone, Default)]
pub struct Stub {
    /// Statuses answered before the stub starts succeeding
    pub failures: Arc<Mutex<Vec<StatusCode>>>,
    pub recommend_calls: Arc<AtomicUsize>,
    pub last_request: Arc<Mutex<Option<Value>>>,
    pub uploads: Arc<Mutex<Vec<(String, String, usize)>>>,
}

impl Stub {
    pub fn failing_with(statuses: Vec<StatusCode>) -> Self {
        Self {
            failures: Arc::new(Mutex::new(statuses)),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.recommend_calls.load(Ordering::SeqCst)
    }

    /// Serves the stub on an ephemeral port and returns its base URL
    pub async fn spawn(self) -> String {
        let app = Router::new()
            .route("/api/recommend/", post(recommend))
            .route("/api/upload-resume/:user_id/", post(upload_resume))
            .with_state(self);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}/api", address)
    }
}

async fn recommend(State(stub): State<Stub>, Json(body): Json<Value>) -> impl IntoResponse {
    stub.recommend_calls.fetch_add(1, Ordering::SeqCst);
    *stub.last_request.lock().unwrap() = Some(body);

    let failure = {
        let mut failures = stub.failures.lock().unwrap();
        (!failures.is_empty()).then(|| failures.remove(0))
    };

    match failure {
        Some(status) => (status, "stub failure".to_string()),
        None => (StatusCode::OK, RECOMMEND_BODY.to_string()),
    }
}

async fn upload_resume(
    State(stub): State<Stub>,
    Path(user_id): Path<String>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    while let Some(field) = multipart.next_field().await.unwrap() {
        if field.name() != Some("resumeFile") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.unwrap();
        stub.uploads
            .lock()
            .unwrap()
            .push((user_id, file_name.clone(), bytes.len()));

        return (
            StatusCode::CREATED,
            Json(json!({
                "message": "Resume uploaded successfully.",
                "filePath": format!("resumes/{}", file_name)
            })),
        );
    }

    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "No file provided." })),
    )
}

pub fn provider(base_url: String) -> RecommendApiProvider {
    RecommendApiProvider::new(
        base_url,
        Duration::from_secs(5),
        1,
        Duration::from_millis(10),
    )
    .unwrap()
}
