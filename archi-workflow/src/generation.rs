use crate::blueprint::{ArtifactBlueprint, base_vars};
use crate::prompts::NO_EXTRA_REQUIREMENTS;
use crate::structured::StructuredGenerator;
use archi_artifact::ArtifactSlots;
use archi_core::{ArchiError, Result, Slot};
use archi_telemetry::{Instrument, error, info, pipeline_span, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationRequest<C> {
    /// Free-text requirements.
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub context: C,
    /// Optional refinement from the user.
    #[serde(default)]
    pub note: Option<String>,
}

impl<C: Default> GenerationRequest<C> {
    pub fn new(requirements: impl Into<String>) -> Self {
        Self { requirements: requirements.into(), context: C::default(), note: None }
    }
}

impl<C> GenerationRequest<C> {
    pub fn with_context<T>(self, context: T) -> GenerationRequest<T> {
        GenerationRequest { requirements: self.requirements, context, note: self.note }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// A generated document plus the outcome of the best-effort draft write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Generated<D> {
    pub document: D,
    pub draft_saved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStage {
    Invoking,
    Validating,
    Persisting,
    Done,
}

impl fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Invoking => "invoking",
            Self::Validating => "validating",
            Self::Persisting => "persisting",
            Self::Done => "done",
        })
    }
}

/// Invoke → validate → persist draft → return.
///
/// A schema violation aborts before anything is written. A failed draft
/// write does not fail the call; it is logged and reported in
/// [`Generated::warning`].
pub struct GenerationPipeline<D> {
    slots: ArtifactSlots,
    generator: StructuredGenerator,
    _document: PhantomData<fn() -> D>,
}

impl<D: ArtifactBlueprint> GenerationPipeline<D> {
    pub fn new(slots: ArtifactSlots, generator: StructuredGenerator) -> Self {
        Self { slots, generator, _document: PhantomData }
    }

    pub async fn run(&self, request: GenerationRequest<D::Context>) -> Result<Generated<D>> {
        let span = pipeline_span("generate", D::ARTIFACT_TYPE.as_str());
        self.execute(request).instrument(span).await
    }

    async fn execute(&self, request: GenerationRequest<D::Context>) -> Result<Generated<D>> {
        let requirements = request.requirements.trim();
        if requirements.is_empty() && D::requires_requirements() {
            return Err(ArchiError::config(format!(
                "{} generation needs non-empty requirements",
                D::ARTIFACT_TYPE
            )));
        }

        let mut vars = base_vars::<D>(&self.generator.settings().output_language)?;
        let requirements =
            if requirements.is_empty() { NO_EXTRA_REQUIREMENTS } else { requirements };
        vars.set("requirements", requirements);
        let note = request.note.as_deref().map(str::trim).filter(|n| !n.is_empty());
        vars.set("note", note.unwrap_or(NO_EXTRA_REQUIREMENTS));
        D::context_vars(&request.context, &mut vars)?;
        let prompt = D::generation_prompt().render(&vars)?;

        info!(stage = %GenerationStage::Invoking, "requesting document from model");
        let value = self.generator.invoke(prompt, D::schema()).await?;

        let validation = D::validate_value(&value)?;
        if !validation.ok {
            warn!(
                stage = %GenerationStage::Validating,
                reason = %validation.message,
                "model output rejected"
            );
            return Err(ArchiError::format(validation.message));
        }
        let document = D::from_value(value)?;

        let stored = document.to_value()?;
        let (draft_saved, warning) = match self.slots.write(Slot::Draft, &stored).await {
            Ok(()) => (true, None),
            Err(e) => {
                error!(
                    stage = %GenerationStage::Persisting,
                    error = %e,
                    "failed to save draft; returning document anyway"
                );
                (false, Some(format!("draft was not saved: {e}")))
            }
        };

        info!(stage = %GenerationStage::Done, draft_saved, "generation finished");
        Ok(Generated { document, draft_saved, warning })
    }
}
