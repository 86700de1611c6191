//! End-to-end design: user stories feed the data model, both feed the system design.

use crate::blueprint::{DataModelContext, SystemDesignContext};
use crate::generation::GenerationRequest;
use crate::render::{render_data_model, render_system_design, render_user_stories};
use crate::settings::WorkflowSettings;
use crate::workflow::ArtifactWorkflow;
use archi_artifact::ArtifactStore;
use archi_core::{ArchiError, Llm, Result};
use archi_schema::{DataModelDocument, SystemDesignDocument, UserStoryDocument};
use archi_telemetry::{Instrument, info, pipeline_span};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// All three documents of one design run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullProjectDesign {
    pub user_stories: UserStoryDocument,
    pub data_model: DataModelDocument,
    pub system_design: SystemDesignDocument,
    /// Draft-persistence warnings from the individual generations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl FullProjectDesign {
    pub fn to_markdown(&self) -> String {
        let sections = [
            render_user_stories(&self.user_stories),
            render_data_model(&self.data_model),
            render_system_design(&self.system_design),
        ];
        let mut out = String::from("# Project Design\n");
        for section in sections.iter().filter(|s| !s.is_empty()) {
            out.push('\n');
            out.push_str(section);
        }
        out
    }
}

pub struct ProjectDesigner {
    user_stories: Arc<ArtifactWorkflow<UserStoryDocument>>,
    data_model: Arc<ArtifactWorkflow<DataModelDocument>>,
    system_design: Arc<ArtifactWorkflow<SystemDesignDocument>>,
}

impl ProjectDesigner {
    pub fn new(
        store: Arc<dyn ArtifactStore>,
        llm: Arc<dyn Llm>,
        settings: WorkflowSettings,
    ) -> Self {
        Self {
            user_stories: Arc::new(ArtifactWorkflow::new(store.clone(), llm.clone(), settings.clone())),
            data_model: Arc::new(ArtifactWorkflow::new(store.clone(), llm.clone(), settings.clone())),
            system_design: Arc::new(ArtifactWorkflow::new(store, llm, settings)),
        }
    }

    pub fn from_workflows(
        user_stories: Arc<ArtifactWorkflow<UserStoryDocument>>,
        data_model: Arc<ArtifactWorkflow<DataModelDocument>>,
        system_design: Arc<ArtifactWorkflow<SystemDesignDocument>>,
    ) -> Self {
        Self { user_stories, data_model, system_design }
    }

    pub fn user_stories(&self) -> &Arc<ArtifactWorkflow<UserStoryDocument>> {
        &self.user_stories
    }

    pub fn data_model(&self) -> &Arc<ArtifactWorkflow<DataModelDocument>> {
        &self.data_model
    }

    pub fn system_design(&self) -> &Arc<ArtifactWorkflow<SystemDesignDocument>> {
        &self.system_design
    }

    /// Generates all three documents in order. Each lands in its draft slot;
    /// the first failing step aborts the run.
    pub async fn design(&self, requirements: &str) -> Result<FullProjectDesign> {
        let span = pipeline_span("design", "project");
        self.run(requirements).instrument(span).await
    }

    async fn run(&self, requirements: &str) -> Result<FullProjectDesign> {
        if requirements.trim().is_empty() {
            return Err(ArchiError::config("project requirements must not be empty"));
        }
        let mut warnings = Vec::new();

        let stories = self.user_stories.generate(GenerationRequest::new(requirements)).await?;
        warnings.extend(stories.warning);
        info!(stories = stories.document.stories.len(), "user stories ready");

        let data_model_request = GenerationRequest::<()>::new(requirements)
            .with_context(DataModelContext { user_stories: stories.document.clone() });
        let data_model = self.data_model.generate(data_model_request).await?;
        warnings.extend(data_model.warning);
        info!(entities = data_model.document.entities.len(), "data model ready");

        let design_request =
            GenerationRequest::<()>::new(requirements).with_context(SystemDesignContext {
                user_stories: stories.document.clone(),
                data_model: data_model.document.clone(),
            });
        let system_design = self.system_design.generate(design_request).await?;
        warnings.extend(system_design.warning);
        info!(modules = system_design.document.modules.len(), "system design ready");

        Ok(FullProjectDesign {
            user_stories: stories.document,
            data_model: data_model.document,
            system_design: system_design.document,
            warnings,
        })
    }
}
