pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::comparisons::handlers as comparisons;
use crate::generation::handlers as generation;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/generate-examples",
            post(generation::handle_generate_examples),
        )
        .route(
            "/api/comparisons",
            post(comparisons::handle_save_comparison).get(comparisons::handle_list_comparisons),
        )
        .route(
            "/api/comparisons/stats",
            get(comparisons::handle_comparison_stats),
        )
        .route(
            "/api/comparisons/:id",
            get(comparisons::handle_get_comparison)
                .patch(comparisons::handle_update_comparison)
                .delete(comparisons::handle_delete_comparison),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::comparisons::store::ComparisonStore;
    use crate::generation::criteria::{CriteriaDefaults, Studio};
    use crate::generation::generator::{Completion, Orchestrator};

    fn app() -> Router {
        build_router(AppState {
            orchestrator: Arc::new(Orchestrator::new(
                Completion::Unconfigured,
                CriteriaDefaults::default(),
            )),
            comparisons: Arc::new(ComparisonStore::new()),
        })
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["completionConfigured"], false);
    }

    #[tokio::test]
    async fn test_generate_examples_falls_back_with_200() {
        let (status, body) = send(
            &app(),
            "POST",
            "/api/generate-examples",
            Some(json!({"studio": "ES", "promptText": "Create a poster about the water cycle"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isMockData"], true);
        assert!(!body["apiError"].as_str().unwrap().is_empty());
        assert!(body["worldClass"]["text"].as_str().unwrap().contains("water cycle"));
        assert_eq!(body["criteriaAll"], json!(Studio::Elementary.criteria()));
        assert_eq!(body["worldClass"]["criteriaCovered"].as_array().unwrap().len(), 3);
        assert_eq!(body["notApproved"]["criteriaMissing"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_generate_examples_rejects_bad_requests() {
        let app = app();
        for body in [
            json!({"studio": "XX", "promptText": "hello"}),
            json!({"studio": "ES", "promptText": "   "}),
            json!({"promptText": "hello"}),
            json!({"studio": "MS"}),
        ] {
            let (status, response) = send(&app, "POST", "/api/generate-examples", Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(response["error"]["code"], "VALIDATION_ERROR");
        }
    }

    #[tokio::test]
    async fn test_unreadable_bodies_are_validation_errors() {
        let app = app();
        for body in [
            json!({"studio": 5, "promptText": "hello"}),
            json!({"studio": "ES", "promptText": 7}),
            json!("ES hello"),
        ] {
            let (status, response) = send(&app, "POST", "/api/generate-examples", Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(response["error"]["code"], "VALIDATION_ERROR");
        }

        // No body and no content type
        let (status, response) = send(&app, "POST", "/api/generate-examples", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"]["code"], "VALIDATION_ERROR");

        // Declared JSON that does not parse
        let request = Request::builder()
            .method("POST")
            .uri("/api/generate-examples")
            .header("content-type", "application/json")
            .body(Body::from("{\"studio\": \"ES\","))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_comparison_bodies_with_wrong_types_are_rejected() {
        let (status, response) = send(
            &app(),
            "POST",
            "/api/comparisons",
            Some(json!({"studio": "MS", "promptText": 3})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_comparison_lifecycle() {
        let app = app();
        let example = json!({
            "studio": "MS",
            "promptText": "Renewable energy impact",
            "worldClass": {"text": "Goal\nResearch energy.", "criteriaCovered": []},
            "notApproved": {"text": "Goal\nEnergy.", "criteriaMissing": []}
        });

        let (status, saved) = send(&app, "POST", "/api/comparisons", Some(example)).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = saved["id"].as_str().unwrap().to_string();

        let (status, fetched) = send(&app, "GET", &format!("/api/comparisons/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["title"], "Generated Example - MS");
        assert_eq!(fetched["createdByRole"], "Learner");

        let (status, listed) = send(&app, "GET", "/api/comparisons?studio=MS&search=energy", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let (_, none) = send(&app, "GET", "/api/comparisons?studio=LP", None).await;
        assert!(none.as_array().unwrap().is_empty());

        let (status, patched) = send(
            &app,
            "PATCH",
            &format!("/api/comparisons/{id}"),
            Some(json!({"title": "Energy Research"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(patched["title"], "Energy Research");

        let (_, stats) = send(&app, "GET", "/api/comparisons/stats", None).await;
        assert_eq!(stats["total"], 1);
        assert_eq!(stats["byStudio"]["MS"], 1);

        let (status, _) = send(&app, "DELETE", &format!("/api/comparisons/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, missing) = send(&app, "GET", &format!("/api/comparisons/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(missing["error"]["code"], "NOT_FOUND");
    }
}
