use crate::document::Document;
use crate::schema::Schema;
use crate::validator::{SchemaValidator, cached_validator};
use archi_core::{ArtifactType, Result};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStoryDocument {
    pub stories: Vec<UserStory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStory {
    pub function_name: String,
    pub role: String,
    pub action: String,
    pub value: String,
    pub acceptance_criteria: Vec<String>,
}

impl Document for UserStoryDocument {
    const ARTIFACT_TYPE: ArtifactType = ArtifactType::UserStories;

    fn validator() -> Result<&'static SchemaValidator> {
        static VALIDATOR: OnceLock<Result<SchemaValidator>> = OnceLock::new();
        cached_validator(&VALIDATOR, Self::schema())
    }

    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            let story = Schema::object()
                .required("function_name", Schema::string(), "Short name of the feature")
                .required("role", Schema::string(), "Who wants the feature")
                .required("action", Schema::string(), "What they want to do")
                .required("value", Schema::string(), "Why it matters to them")
                .required(
                    "acceptance_criteria",
                    Schema::non_empty_array(Schema::string()),
                    "Verifiable conditions for the story to be done",
                )
                .deny_unknown()
                .build();

            Schema::object()
                .required("stories", Schema::non_empty_array(story), "User stories")
                .deny_unknown()
                .build()
        })
    }
}

impl UserStoryDocument {
    /// One line per story, used as context when prompting for later artifacts.
    pub fn summary(&self) -> String {
        self.stories
            .iter()
            .map(|s| {
                format!(
                    "- [{}] As a {}, I want {}, so that {}",
                    s.function_name, s.role, s.action, s.value
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
