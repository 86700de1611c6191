use crate::blueprint::{ArtifactBlueprint, base_vars};
use crate::structured::StructuredGenerator;
use archi_artifact::ArtifactSlots;
use archi_core::{ArchiError, Result, Slot};
use archi_telemetry::{Instrument, info, pipeline_span, warn};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModificationRequest<C> {
    pub instructions: String,
    #[serde(default)]
    pub context: C,
}

impl<C: Default> ModificationRequest<C> {
    pub fn new(instructions: impl Into<String>) -> Self {
        Self { instructions: instructions.into(), context: C::default() }
    }
}

impl<C> ModificationRequest<C> {
    pub fn with_context<T>(self, context: T) -> ModificationRequest<T> {
        ModificationRequest { instructions: self.instructions, context }
    }
}

/// Revises the stored draft. The revision is returned, never persisted.
pub struct ModificationPipeline<D> {
    slots: ArtifactSlots,
    generator: StructuredGenerator,
    _document: PhantomData<fn() -> D>,
}

impl<D: ArtifactBlueprint> ModificationPipeline<D> {
    pub fn new(slots: ArtifactSlots, generator: StructuredGenerator) -> Self {
        Self { slots, generator, _document: PhantomData }
    }

    pub async fn run(&self, request: ModificationRequest<D::Context>) -> Result<D> {
        let span = pipeline_span("modify", D::ARTIFACT_TYPE.as_str());
        self.execute(request).instrument(span).await
    }

    async fn execute(&self, request: ModificationRequest<D::Context>) -> Result<D> {
        let draft = self.slots.read(Slot::Draft).await?.ok_or_else(|| {
            ArchiError::not_found(format!("no {} draft to modify", D::ARTIFACT_TYPE))
        })?;

        let instructions = request.instructions.trim();
        if instructions.is_empty() {
            return Err(ArchiError::config("modification instructions must not be empty"));
        }

        let mut vars = base_vars::<D>(&self.generator.settings().output_language)?;
        vars.set("draft", serde_json::to_string_pretty(&draft)?);
        vars.set("instructions", instructions);
        D::context_vars(&request.context, &mut vars)?;
        let prompt = D::modification_prompt().render(&vars)?;

        info!("requesting revision from model");
        let value = self.generator.invoke(prompt, D::schema()).await?;

        let validation = D::validate_value(&value)?;
        if !validation.ok {
            warn!(reason = %validation.message, "revised document rejected");
            return Err(ArchiError::format(validation.message));
        }
        let document = D::from_value(value)?;
        info!("modification finished");
        Ok(document)
    }
}
