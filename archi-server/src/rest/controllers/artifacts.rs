use crate::error::{ApiResult, err};
use archi_core::SaveDecision;
use archi_schema::Validation;
use archi_workflow::{
    ArtifactBlueprint, ArtifactWorkflow, Generated, GenerationRequest, ModificationRequest,
    SaveAck,
};
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Handlers for one artifact type.
pub struct ArtifactController<D: ArtifactBlueprint> {
    workflow: Arc<ArtifactWorkflow<D>>,
}

impl<D: ArtifactBlueprint> ArtifactController<D> {
    pub fn new(workflow: Arc<ArtifactWorkflow<D>>) -> Self {
        Self { workflow }
    }
}

impl<D: ArtifactBlueprint> Clone for ArtifactController<D> {
    fn clone(&self) -> Self {
        Self { workflow: self.workflow.clone() }
    }
}

/// Save request: the decision flags next to the document.
#[derive(Debug, Deserialize)]
pub struct SaveBody {
    #[serde(flatten)]
    pub decision: SaveDecision,
    pub document: Value,
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub markdown: String,
}

pub async fn generate<D: ArtifactBlueprint>(
    State(controller): State<ArtifactController<D>>,
    Json(request): Json<GenerationRequest<D::Context>>,
) -> ApiResult<Generated<D>> {
    controller.workflow.generate(request).await.map(Json).map_err(err)
}

pub async fn modify<D: ArtifactBlueprint>(
    State(controller): State<ArtifactController<D>>,
    Json(request): Json<ModificationRequest<D::Context>>,
) -> ApiResult<D> {
    controller.workflow.modify(request).await.map(Json).map_err(err)
}

pub async fn get_draft<D: ArtifactBlueprint>(
    State(controller): State<ArtifactController<D>>,
) -> ApiResult<Value> {
    controller.workflow.query_draft().await.map(Json).map_err(err)
}

pub async fn put_draft<D: ArtifactBlueprint>(
    State(controller): State<ArtifactController<D>>,
    Json(document): Json<Value>,
) -> ApiResult<Validation> {
    controller.workflow.overwrite_draft(&document).await.map(Json).map_err(err)
}

pub async fn get_result<D: ArtifactBlueprint>(
    State(controller): State<ArtifactController<D>>,
) -> ApiResult<Value> {
    controller.workflow.query_result().await.map(Json).map_err(err)
}

pub async fn save<D: ArtifactBlueprint>(
    State(controller): State<ArtifactController<D>>,
    Json(body): Json<SaveBody>,
) -> ApiResult<SaveAck> {
    controller.workflow.save(body.decision, &body.document).await.map(Json).map_err(err)
}

pub async fn render<D: ArtifactBlueprint>(
    State(controller): State<ArtifactController<D>>,
    Json(document): Json<Value>,
) -> ApiResult<RenderResponse> {
    let markdown = controller.workflow.render(&document).map_err(err)?;
    Ok(Json(RenderResponse { markdown }))
}
