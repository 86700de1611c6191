use crate::error::{ApiResult, err};
use archi_workflow::{FullProjectDesign, ProjectDesigner};
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Clone)]
pub struct DesignController {
    designer: Arc<ProjectDesigner>,
}

impl DesignController {
    pub fn new(designer: Arc<ProjectDesigner>) -> Self {
        Self { designer }
    }
}

#[derive(Debug, Deserialize)]
pub struct DesignBody {
    pub requirements: String,
}

#[derive(Debug, Serialize)]
pub struct DesignResponse {
    pub design: FullProjectDesign,
    pub markdown: String,
}

/// Runs the whole chain. Every document lands in its draft slot.
pub async fn design_project(
    State(controller): State<DesignController>,
    Json(body): Json<DesignBody>,
) -> ApiResult<DesignResponse> {
    let design = controller.designer.design(&body.requirements).await.map_err(err)?;
    let markdown = design.to_markdown();
    Ok(Json(DesignResponse { design, markdown }))
}
