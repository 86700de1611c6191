use archi_core::{ArtifactType, Result, Slot};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

/// Address of one storage slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotKey {
    pub artifact: ArtifactType,
    pub slot: Slot,
}

impl SlotKey {
    pub fn new(artifact: ArtifactType, slot: Slot) -> Self {
        Self { artifact, slot }
    }

    pub fn draft(artifact: ArtifactType) -> Self {
        Self::new(artifact, Slot::Draft)
    }

    pub fn result(artifact: ArtifactType) -> Self {
        Self::new(artifact, Slot::Result)
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.artifact, self.slot)
    }
}

/// Whole-document slot storage.
///
/// `read` of a slot that was never written yields `Ok(None)`. `write`
/// replaces the slot atomically with respect to concurrent readers.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn read(&self, key: SlotKey) -> Result<Option<Value>>;
    async fn write(&self, key: SlotKey, document: &Value) -> Result<()>;
    async fn exists(&self, key: SlotKey) -> bool;
}
