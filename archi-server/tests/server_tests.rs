use archi_artifact::InMemoryArtifactStore;
use archi_model::MockLlm;
use archi_server::{ApiErrorBody, ServerConfig, create_app};
use archi_workflow::{ProjectDesigner, WorkflowSettings};
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn stories() -> Value {
    json!({
        "stories": [{
            "function_name": "Browse catalog",
            "role": "shopper",
            "action": "browse books by genre",
            "value": "I find something to read",
            "acceptance_criteria": ["genres are listed", "books show a price"]
        }]
    })
}

fn data_model() -> Value {
    json!({
        "entities": [{
            "name": "Book",
            "title": "Book",
            "type": "table",
            "properties": [{
                "name": "isbn",
                "label": "ISBN",
                "type": "varchar",
                "length": 13,
                "accuracy": 0,
                "required": true,
                "is_primary_key": true,
                "is_associated": false
            }]
        }],
        "relationships": []
    })
}

fn system_design() -> Value {
    json!({
        "modules": [{
            "name": "Catalog",
            "description": "Book browsing",
            "key_features": ["genre listing"],
            "api_endpoints": [{"method": "GET", "path": "/api/books", "summary": "List books"}]
        }]
    })
}

fn app(mock: &MockLlm) -> Router {
    let designer = ProjectDesigner::new(
        Arc::new(InMemoryArtifactStore::new()),
        Arc::new(mock.clone()),
        WorkflowSettings::default(),
    );
    create_app(ServerConfig::new(Arc::new(designer)))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
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
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health_check() {
    let app = app(&MockLlm::new("mock"));
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_index_lists_artifacts() {
    let app = app(&MockLlm::new("mock"));
    let (status, body) = send(&app, Method::GET, "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["artifacts"][1]["path"], "/data-model");
}

#[tokio::test]
async fn test_generate_then_query_draft() {
    let mock = MockLlm::new("mock").with_text(stories().to_string());
    let app = app(&mock);

    let (status, body) = send(
        &app,
        Method::POST,
        "/user-stories/generate",
        Some(json!({"requirements": "an online bookstore"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["draft_saved"], true);
    assert_eq!(body["document"], stories());

    let (status, body) = send(&app, Method::GET, "/user-stories/draft", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, stories());
}

#[tokio::test]
async fn test_missing_draft_is_404() {
    let app = app(&MockLlm::new("mock"));
    let (status, body) = send(&app, Method::GET, "/data-model/draft", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: ApiErrorBody = serde_json::from_value(body).unwrap();
    assert_eq!(error.kind.as_str(), "not_found");
}

#[tokio::test]
async fn test_modify_without_draft_is_404() {
    let mock = MockLlm::new("mock");
    let app = app(&mock);
    let (status, _) = send(
        &app,
        Method::POST,
        "/user-stories/modify",
        Some(json!({"instructions": "add an admin story"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn test_nonconforming_model_output_is_422() {
    let mock = MockLlm::new("mock").with_text(json!({"stories": []}).to_string());
    let app = app(&mock);
    let (status, body) = send(
        &app,
        Method::POST,
        "/user-stories/generate",
        Some(json!({"requirements": "an online bookstore"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["kind"], "format");
    assert!(body["detail"].as_str().unwrap().contains("stories"));
}

#[tokio::test]
async fn test_model_failure_is_502() {
    let mock = MockLlm::new("mock").with_error("upstream down");
    let app = app(&mock);
    let (status, body) = send(
        &app,
        Method::POST,
        "/system-design/generate",
        Some(json!({"requirements": "an online bookstore"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["kind"], "service");
}

#[tokio::test]
async fn test_save_and_promote() {
    let app = app(&MockLlm::new("mock"));

    let (status, body) = send(
        &app,
        Method::POST,
        "/data-model/save",
        Some(json!({"save_as_result": true, "document": data_model()})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["action"], "save_as_result");
    assert_eq!(body["slot"], "result");

    let (status, body) = send(&app, Method::GET, "/data-model/result", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entities"][0]["name"], "Book");

    let (status, _) = send(&app, Method::GET, "/data-model/draft", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_conflicting_save_flags_are_400() {
    let app = app(&MockLlm::new("mock"));
    let (status, body) = send(
        &app,
        Method::POST,
        "/data-model/save",
        Some(json!({"save_as_draft": true, "save_as_result": true, "document": data_model()})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "configuration");

    let (status, _) = send(&app, Method::GET, "/data-model/draft", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_put_draft_reports_validation() {
    let app = app(&MockLlm::new("mock"));
    let (status, body) =
        send(&app, Method::PUT, "/system-design/draft", Some(json!({"modules": []}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], false);
    assert_eq!(body["violation"]["path"], "modules");

    let (_, body) = send(&app, Method::GET, "/system-design/draft", None).await;
    assert_eq!(body, json!({"modules": []}));
}

#[tokio::test]
async fn test_render_blank_length_cell() {
    let app = app(&MockLlm::new("mock"));
    let (status, body) = send(&app, Method::POST, "/data-model/render", Some(data_model())).await;

    assert_eq!(status, StatusCode::OK);
    let markdown = body["markdown"].as_str().unwrap();
    assert!(markdown.contains("| isbn | ISBN | varchar | 13 |  | True | True | False |  |"));
}

#[tokio::test]
async fn test_design_runs_full_chain() {
    let mock = MockLlm::new("mock")
        .with_text(stories().to_string())
        .with_text(data_model().to_string())
        .with_text(system_design().to_string());
    let app = app(&mock);

    let (status, body) = send(
        &app,
        Method::POST,
        "/design",
        Some(json!({"requirements": "an online bookstore"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["design"]["system_design"], system_design());
    assert!(body["markdown"].as_str().unwrap().starts_with("# Project Design"));

    let (status, _) = send(&app, Method::GET, "/system-design/draft", None).await;
    assert_eq!(status, StatusCode::OK);
}
