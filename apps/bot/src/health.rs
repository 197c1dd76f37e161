//! Liveness endpoint for the host platform's uptime checks.

use std::time::Instant;

use axum::{Json, Router, extract::State, routing::get};
use serde_json::{Value, json};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub fn router() -> Router {
    let started = Instant::now();
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .with_state(started)
}

async fn root(State(started): State<Instant>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "uptime_seconds": started.elapsed().as_secs(),
    }))
}

async fn health() -> Json<Value> {
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".into());
    Json(json!({
        "status": "healthy",
        "timestamp": timestamp,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn get_json(path: &str) -> (StatusCode, Value) {
        let response = router()
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("collect")
            .to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn root_reports_status_and_uptime() {
        let (status, payload) = get_json("/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["status"], "ok");
        assert!(payload["uptime_seconds"].is_u64());
    }

    #[tokio::test]
    async fn health_reports_timestamp() {
        let (status, payload) = get_json("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["status"], "healthy");
        assert!(payload["timestamp"].as_str().unwrap().contains('T'));
    }
}
