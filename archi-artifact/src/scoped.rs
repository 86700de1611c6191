use crate::service::{ArtifactStore, SlotKey};
use archi_core::{ArtifactType, Result, Slot};
use archi_telemetry::{Instrument, store_span};
use serde_json::Value;
use std::sync::Arc;

/// The two slots of one artifact type over a shared store.
#[derive(Clone)]
pub struct ArtifactSlots {
    store: Arc<dyn ArtifactStore>,
    artifact: ArtifactType,
}

impl ArtifactSlots {
    pub fn new(store: Arc<dyn ArtifactStore>, artifact: ArtifactType) -> Self {
        Self { store, artifact }
    }

    pub fn artifact(&self) -> ArtifactType {
        self.artifact
    }

    pub fn store(&self) -> &Arc<dyn ArtifactStore> {
        &self.store
    }

    pub async fn read(&self, slot: Slot) -> Result<Option<Value>> {
        let span = store_span("read", self.artifact.as_str(), slot.as_str());
        self.store.read(SlotKey::new(self.artifact, slot)).instrument(span).await
    }

    pub async fn write(&self, slot: Slot, document: &Value) -> Result<()> {
        let span = store_span("write", self.artifact.as_str(), slot.as_str());
        self.store.write(SlotKey::new(self.artifact, slot), document).instrument(span).await
    }

    pub async fn exists(&self, slot: Slot) -> bool {
        self.store.exists(SlotKey::new(self.artifact, slot)).await
    }
}
