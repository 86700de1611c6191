use archi_artifact::ArtifactSlots;
use archi_core::{ArtifactType, Result, SaveAction, SaveDecision, Slot};
use archi_schema::Document;
use archi_telemetry::{Instrument, info, pipeline_span};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::marker::PhantomData;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveAck {
    pub artifact: ArtifactType,
    pub action: SaveAction,
    /// Slot written, absent for a discard.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<Slot>,
    pub message: String,
}

/// Applies a [`SaveDecision`]. The decision is checked before any storage access.
pub struct SavePipeline<D> {
    slots: ArtifactSlots,
    _document: PhantomData<fn() -> D>,
}

impl<D: Document> SavePipeline<D> {
    pub fn new(slots: ArtifactSlots) -> Self {
        Self { slots, _document: PhantomData }
    }

    pub async fn run(&self, decision: SaveDecision, document: &Value) -> Result<SaveAck> {
        let span = pipeline_span("save", D::ARTIFACT_TYPE.as_str());
        self.execute(decision, document).instrument(span).await
    }

    async fn execute(&self, decision: SaveDecision, document: &Value) -> Result<SaveAck> {
        let action = decision.resolve()?;
        let artifact = D::ARTIFACT_TYPE;

        let Some(slot) = action.target_slot() else {
            info!("document discarded");
            return Ok(SaveAck {
                artifact,
                action,
                slot: None,
                message: format!("{artifact} document discarded"),
            });
        };

        D::validate_value(document)?.into_result()?;
        self.slots.write(slot, document).await?;
        info!(slot = %slot, "document saved");
        Ok(SaveAck {
            artifact,
            action,
            slot: Some(slot),
            message: format!("{artifact} saved as {slot}"),
        })
    }
}
