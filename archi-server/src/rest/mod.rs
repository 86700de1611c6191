pub mod controllers;

pub use controllers::{ArtifactController, DesignController};

use crate::ServerConfig;
use archi_core::ArtifactType;
use archi_workflow::{ArtifactBlueprint, ArtifactWorkflow};
use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, StatusCode, header},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if config.security.allowed_origins.is_empty() {
        cors.allow_origin(AllowOrigin::any())
    } else {
        let origins: Vec<HeaderValue> =
            config.security.allowed_origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(origins)
    }
}

/// The route set every artifact type shares.
fn artifact_router<D: ArtifactBlueprint>(workflow: Arc<ArtifactWorkflow<D>>) -> Router {
    use controllers::artifacts;

    Router::new()
        .route("/generate", post(artifacts::generate::<D>))
        .route("/modify", post(artifacts::modify::<D>))
        .route("/draft", get(artifacts::get_draft::<D>).put(artifacts::put_draft::<D>))
        .route("/result", get(artifacts::get_result::<D>))
        .route("/save", post(artifacts::save::<D>))
        .route("/render", post(artifacts::render::<D>))
        .with_state(ArtifactController::new(workflow))
}

fn route_prefix(artifact: ArtifactType) -> String {
    format!("/{}", artifact.as_str().replace('_', "-"))
}

pub fn create_app(config: ServerConfig) -> Router {
    let designer = config.designer.clone();

    let app = Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .nest(&route_prefix(ArtifactType::UserStories), artifact_router(designer.user_stories().clone()))
        .nest(&route_prefix(ArtifactType::DataModel), artifact_router(designer.data_model().clone()))
        .nest(
            &route_prefix(ArtifactType::SystemDesign),
            artifact_router(designer.system_design().clone()),
        )
        .merge(
            Router::new()
                .route("/design", post(controllers::design::design_project))
                .with_state(DesignController::new(designer)),
        );

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                config.security.request_timeout,
            ))
            .layer(DefaultBodyLimit::max(config.security.max_body_size))
            .layer(build_cors_layer(&config))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            )),
    )
}

async fn health_check() -> &'static str {
    "OK"
}

async fn index() -> Json<Value> {
    let artifacts: Vec<Value> = ArtifactType::ALL
        .iter()
        .map(|a| json!({"artifact": a.as_str(), "title": a.title(), "path": route_prefix(*a)}))
        .collect();
    Json(json!({
        "service": "llm-architect",
        "version": env!("CARGO_PKG_VERSION"),
        "artifacts": artifacts,
    }))
}
