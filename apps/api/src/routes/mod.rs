pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::jobs::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route("/api/jobs/search", post(handlers::handle_search))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::jobs::pipeline::Pipeline;
    use crate::jobs::sources::{JobSource, ScrapeRequest, SourceFetchError};
    use crate::models::{JobListing, RawJobRecord, SearchCriteria};
    use crate::relevance::{FilterError, RelevanceFilter};

    struct StaticSource(Option<Vec<RawJobRecord>>);

    #[async_trait]
    impl JobSource for StaticSource {
        async fn scrape(&self, _: &ScrapeRequest) -> Result<Vec<RawJobRecord>, SourceFetchError> {
            self.0.clone().ok_or_else(|| SourceFetchError::Status {
                status: 502,
                message: "indeed timed out".to_string(),
            })
        }
    }

    struct KeepRemote;

    #[async_trait]
    impl RelevanceFilter for KeepRemote {
        fn name(&self) -> &str {
            "keep-remote"
        }

        async fn filter(
            &self,
            listings: &[JobListing],
            _: &SearchCriteria,
        ) -> Result<Vec<JobListing>, FilterError> {
            Ok(listings
                .iter()
                .filter(|l| l.job_nature == crate::models::JobNature::Remote)
                .cloned()
                .collect())
        }
    }

    fn app(records: Option<Vec<RawJobRecord>>) -> Router {
        let pipeline = Pipeline::new(
            Arc::new(StaticSource(records)),
            Arc::new(KeepRemote),
            Arc::new(KeepRemote),
        );
        build_router(AppState {
            pipeline: Arc::new(pipeline),
        })
    }

    fn search_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/jobs/search")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn criteria_body() -> Value {
        json!({
            "position": "Full Stack Engineer",
            "experience": "2 years",
            "salary": "70,000 PKR to 120,000 PKR",
            "jobNature": "onsite",
            "location": "Lahore, Pakistan",
            "skills": "MERN, Node.js"
        })
    }

    #[tokio::test]
    async fn test_root_returns_welcome_message() {
        let response = app(Some(Vec::new()))
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Welcome to Job Finder API");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_search_returns_relevant_jobs() {
        let records: Vec<RawJobRecord> = vec![
            serde_json::from_value(json!({"title": "Remote Dev", "is_remote": true, "min_amount": 1000, "currency": "USD"})).unwrap(),
            serde_json::from_value(json!({"title": "Office Dev", "is_remote": false})).unwrap(),
        ];

        let response = app(Some(records))
            .oneshot(search_request(criteria_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let jobs = body["relevant_jobs"].as_array().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0]["job_title"], "Remote Dev");
        assert_eq!(jobs[0]["jobNature"], "Remote");
        assert_eq!(jobs[0]["salary"], "1000 USD");
        assert_eq!(jobs[0]["experience"], "not found");
    }

    #[tokio::test]
    async fn test_source_failure_maps_to_500_with_message() {
        let response = app(None)
            .oneshot(search_request(criteria_body()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "SEARCH_FAILED");
        let message = body["error"]["message"].as_str().unwrap();
        assert!(message.starts_with("Error searching for jobs:"));
        assert!(message.contains("indeed timed out"));
    }

    #[tokio::test]
    async fn test_blank_position_is_rejected() {
        let mut body = criteria_body();
        body["position"] = json!("  ");
        let response = app(Some(Vec::new()))
            .oneshot(search_request(body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_required_field_is_rejected_by_extractor() {
        let response = app(Some(Vec::new()))
            .oneshot(search_request(json!({"position": "Dev"})))
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }
}
