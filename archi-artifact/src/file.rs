use crate::service::{ArtifactStore, SlotKey};
use archi_core::{ArchiError, Result};
use archi_telemetry::{debug, warn};
use async_trait::async_trait;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// One pretty-printed JSON file per slot:
/// `{root}/{artifact dir}/{slot}/{artifact}_{slot}.json`.
#[derive(Debug, Clone)]
pub struct FileArtifactStore {
    root: PathBuf,
}

impl FileArtifactStore {
    /// Directories are created lazily on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn slot_path(&self, key: SlotKey) -> PathBuf {
        self.root
            .join(key.artifact.dir_name())
            .join(key.slot.as_str())
            .join(format!("{}_{}.json", key.artifact.as_str(), key.slot.as_str()))
    }

    async fn write_atomic(path: PathBuf, bytes: Vec<u8>) -> std::io::Result<()> {
        let dir = path.parent().ok_or_else(|| {
            std::io::Error::new(ErrorKind::InvalidInput, "slot path has no parent directory")
        })?;
        fs::create_dir_all(dir).await?;

        // unique name so concurrent writers never share a temp file
        let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("slot.json");
        let tmp_path = dir.join(format!(".{file_name}.{}.tmp", Uuid::new_v4()));

        let written = async {
            let mut file = fs::File::create(&tmp_path).await?;
            file.write_all(&bytes).await?;
            file.sync_all().await?;
            drop(file);
            fs::rename(&tmp_path, &path).await
        }
        .await;

        if written.is_err() {
            if let Err(e) = fs::remove_file(&tmp_path).await {
                if e.kind() != ErrorKind::NotFound {
                    warn!(path = %tmp_path.display(), error = %e, "failed to remove temp file");
                }
            }
        }
        written
    }
}

#[async_trait]
impl ArtifactStore for FileArtifactStore {
    async fn read(&self, key: SlotKey) -> Result<Option<Value>> {
        let path = self.slot_path(key);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ArchiError::Io(e)),
        };
        let document = serde_json::from_str(&content)?;
        debug!(slot = %key, path = %path.display(), "read slot");
        Ok(Some(document))
    }

    async fn write(&self, key: SlotKey, document: &Value) -> Result<()> {
        let path = self.slot_path(key);
        let mut content = serde_json::to_string_pretty(document)?;
        content.push('\n');
        let bytes = content.len();
        // spawned, so the write finishes even if this future is dropped
        tokio::spawn(Self::write_atomic(path.clone(), content.into_bytes()))
            .await
            .map_err(|e| std::io::Error::other(format!("slot write task failed: {e}")))??;
        debug!(slot = %key, path = %path.display(), bytes, "wrote slot");
        Ok(())
    }

    async fn exists(&self, key: SlotKey) -> bool {
        fs::try_exists(self.slot_path(key)).await.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archi_core::ArtifactType;

    #[test]
    fn test_slot_path_layout() {
        let store = FileArtifactStore::new("/data/outcomes");
        assert_eq!(
            store.slot_path(SlotKey::draft(ArtifactType::UserStories)),
            PathBuf::from("/data/outcomes/user_story/draft/user_stories_draft.json")
        );
        assert_eq!(
            store.slot_path(SlotKey::result(ArtifactType::DataModel)),
            PathBuf::from("/data/outcomes/data_model/result/data_model_result.json")
        );
    }
}
