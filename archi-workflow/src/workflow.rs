use crate::blueprint::ArtifactBlueprint;
use crate::generation::{Generated, GenerationPipeline, GenerationRequest};
use crate::modification::{ModificationPipeline, ModificationRequest};
use crate::render::{DocumentRenderer, MarkdownRenderer};
use crate::save::{SaveAck, SavePipeline};
use crate::settings::WorkflowSettings;
use crate::structured::StructuredGenerator;
use archi_artifact::{ArtifactSlots, ArtifactStore};
use archi_core::{ArchiError, ArtifactType, Llm, Result, SaveDecision, Slot};
use archi_schema::Validation;
use archi_telemetry::{info, warn};
use serde_json::Value;
use std::sync::Arc;

/// The full lifecycle of one artifact type: generate, modify, query, save, render.
pub struct ArtifactWorkflow<D: ArtifactBlueprint> {
    slots: ArtifactSlots,
    generation: GenerationPipeline<D>,
    modification: ModificationPipeline<D>,
    saving: SavePipeline<D>,
    renderer: Arc<dyn DocumentRenderer>,
}

impl<D: ArtifactBlueprint> ArtifactWorkflow<D> {
    pub fn new(
        store: Arc<dyn ArtifactStore>,
        llm: Arc<dyn Llm>,
        settings: WorkflowSettings,
    ) -> Self {
        let slots = ArtifactSlots::new(store, D::ARTIFACT_TYPE);
        let generator = StructuredGenerator::new(llm, settings);
        Self {
            generation: GenerationPipeline::new(slots.clone(), generator.clone()),
            modification: ModificationPipeline::new(slots.clone(), generator),
            saving: SavePipeline::new(slots.clone()),
            renderer: Arc::new(MarkdownRenderer),
            slots,
        }
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn DocumentRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn artifact(&self) -> ArtifactType {
        D::ARTIFACT_TYPE
    }

    pub async fn generate(&self, request: GenerationRequest<D::Context>) -> Result<Generated<D>> {
        self.generation.run(request).await
    }

    pub async fn modify(&self, request: ModificationRequest<D::Context>) -> Result<D> {
        self.modification.run(request).await
    }

    async fn query(&self, slot: Slot) -> Result<Value> {
        self.slots.read(slot).await?.ok_or_else(|| {
            ArchiError::not_found(format!("no {} {} has been saved", D::ARTIFACT_TYPE, slot))
        })
    }

    /// The stored draft exactly as written.
    pub async fn query_draft(&self) -> Result<Value> {
        self.query(Slot::Draft).await
    }

    pub async fn query_result(&self) -> Result<Value> {
        self.query(Slot::Result).await
    }

    /// The stored draft, re-validated and typed.
    pub async fn load_draft(&self) -> Result<D> {
        D::from_value(self.query_draft().await?)
    }

    pub async fn load_result(&self) -> Result<D> {
        D::from_value(self.query_result().await?)
    }

    /// Writes the draft slot unconditionally. A non-conforming document is
    /// still stored; the returned [`Validation`] tells the caller.
    pub async fn overwrite_draft(&self, document: &Value) -> Result<Validation> {
        let validation = D::validate_value(document)?;
        if !validation.ok {
            warn!(
                artifact = %D::ARTIFACT_TYPE,
                reason = %validation.message,
                "overwriting draft with a non-conforming document"
            );
        }
        self.slots.write(Slot::Draft, document).await?;
        info!(artifact = %D::ARTIFACT_TYPE, "draft overwritten");
        Ok(validation)
    }

    pub async fn save(&self, decision: SaveDecision, document: &Value) -> Result<SaveAck> {
        self.saving.run(decision, document).await
    }

    pub async fn save_document(&self, decision: SaveDecision, document: &D) -> Result<SaveAck> {
        self.saving.run(decision, &document.to_value()?).await
    }

    pub fn render(&self, document: &Value) -> Result<String> {
        let document = D::from_value(document.clone())?;
        Ok(self.renderer.render(&document.into()))
    }

    pub fn render_document(&self, document: &D) -> Result<String> {
        document.conform()?;
        Ok(self.renderer.render(&document.clone().into()))
    }
}
