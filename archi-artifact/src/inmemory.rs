use crate::service::{ArtifactStore, SlotKey};
use archi_core::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct InMemoryArtifactStore {
    slots: Arc<RwLock<HashMap<SlotKey, Value>>>,
}

impl InMemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.is_empty()
    }
}

#[async_trait]
impl ArtifactStore for InMemoryArtifactStore {
    async fn read(&self, key: SlotKey) -> Result<Option<Value>> {
        Ok(self.slots.read().await.get(&key).cloned())
    }

    async fn write(&self, key: SlotKey, document: &Value) -> Result<()> {
        self.slots.write().await.insert(key, document.clone());
        Ok(())
    }

    async fn exists(&self, key: SlotKey) -> bool {
        self.slots.read().await.contains_key(&key)
    }
}
