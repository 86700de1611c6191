use crate::data_model::DataModelDocument;
use crate::schema::Schema;
use crate::system_design::SystemDesignDocument;
use crate::user_story::UserStoryDocument;
use crate::validator::{SchemaValidator, Validation};
use archi_core::{ArchiError, ArtifactType, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;

/// A typed design document bound to its artifact type and canonical schema.
pub trait Document:
    Serialize + DeserializeOwned + Clone + Debug + PartialEq + Send + Sync + 'static
{
    const ARTIFACT_TYPE: ArtifactType;

    fn schema() -> &'static Schema;

    /// [`Self::schema`] compiled once for the process.
    fn validator() -> Result<&'static SchemaValidator>;

    fn validate_value(value: &Value) -> Result<Validation> {
        Ok(Self::validator()?.validate(value))
    }

    /// Validates then deserializes. Any mismatch is a format error.
    fn from_value(value: Value) -> Result<Self> {
        Self::validate_value(&value)?.into_result()?;
        serde_json::from_value(value).map_err(|e| {
            ArchiError::format(format!("{} document is not well-formed: {e}", Self::ARTIFACT_TYPE))
        })
    }

    fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Serializes and checks the result against the schema.
    fn conform(&self) -> Result<Value> {
        let value = self.to_value()?;
        Self::validate_value(&value)?.into_result()?;
        Ok(value)
    }
}

/// A document tagged with its artifact type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "artifact_type", content = "document", rename_all = "snake_case")]
pub enum AnyDocument {
    UserStories(UserStoryDocument),
    DataModel(DataModelDocument),
    SystemDesign(SystemDesignDocument),
}

impl AnyDocument {
    pub fn artifact_type(&self) -> ArtifactType {
        match self {
            Self::UserStories(_) => ArtifactType::UserStories,
            Self::DataModel(_) => ArtifactType::DataModel,
            Self::SystemDesign(_) => ArtifactType::SystemDesign,
        }
    }

    /// Parses an untyped value as the given artifact type, validating first.
    pub fn from_value(artifact: ArtifactType, value: Value) -> Result<Self> {
        Ok(match artifact {
            ArtifactType::UserStories => Self::UserStories(UserStoryDocument::from_value(value)?),
            ArtifactType::DataModel => Self::DataModel(DataModelDocument::from_value(value)?),
            ArtifactType::SystemDesign => {
                Self::SystemDesign(SystemDesignDocument::from_value(value)?)
            }
        })
    }
}

impl From<UserStoryDocument> for AnyDocument {
    fn from(doc: UserStoryDocument) -> Self {
        Self::UserStories(doc)
    }
}

impl From<DataModelDocument> for AnyDocument {
    fn from(doc: DataModelDocument) -> Self {
        Self::DataModel(doc)
    }
}

impl From<SystemDesignDocument> for AnyDocument {
    fn from(doc: SystemDesignDocument) -> Self {
        Self::SystemDesign(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archi_core::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_from_value_reports_first_violation() {
        let err = UserStoryDocument::from_value(json!({"stories": [{"role": "x"}]})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(err.to_string().contains("stories.0.function_name"));
    }

    #[test]
    fn test_any_document_tagging() {
        let doc = AnyDocument::from_value(
            ArtifactType::SystemDesign,
            json!({"modules": [{
                "name": "auth", "description": "login", "key_features": [], "api_endpoints": []
            }]}),
        )
        .unwrap();
        assert_eq!(doc.artifact_type(), ArtifactType::SystemDesign);

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["artifact_type"], "system_design");
        assert_eq!(json["document"]["modules"][0]["name"], "auth");
    }
}
