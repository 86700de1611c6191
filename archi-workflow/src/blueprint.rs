//! Per-artifact prompt wiring.

use crate::prompts::{self, PromptTemplate, PromptVars};
use archi_core::Result;
use archi_schema::{AnyDocument, DataModelDocument, Document, SystemDesignDocument, UserStoryDocument};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Everything a pipeline needs to know about one artifact type beyond its schema.
pub trait ArtifactBlueprint: Document + Into<AnyDocument> {
    /// Other documents the prompts draw on.
    type Context: Serialize + DeserializeOwned + Clone + Default + Debug + Send + Sync + 'static;

    fn generation_prompt() -> &'static PromptTemplate;

    fn modification_prompt() -> &'static PromptTemplate;

    fn example() -> &'static str;

    /// Whether generation needs free-text requirements, or can run on context alone.
    fn requires_requirements() -> bool {
        true
    }

    fn context_vars(context: &Self::Context, vars: &mut PromptVars) -> Result<()>;
}

/// Context for data-model prompts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataModelContext {
    #[serde(default)]
    pub user_stories: UserStoryDocument,
}

/// Context for system-design prompts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemDesignContext {
    #[serde(default)]
    pub user_stories: UserStoryDocument,
    #[serde(default)]
    pub data_model: DataModelDocument,
}

fn context_json<T: Serialize>(value: &T, empty: bool, placeholder: &str) -> Result<String> {
    if empty {
        return Ok(placeholder.to_string());
    }
    Ok(serde_json::to_string_pretty(value)?)
}

impl ArtifactBlueprint for UserStoryDocument {
    type Context = ();

    fn generation_prompt() -> &'static PromptTemplate {
        &prompts::USER_STORY_GENERATION
    }

    fn modification_prompt() -> &'static PromptTemplate {
        &prompts::USER_STORY_MODIFICATION
    }

    fn example() -> &'static str {
        prompts::USER_STORY_EXAMPLE
    }

    fn context_vars(_context: &(), _vars: &mut PromptVars) -> Result<()> {
        Ok(())
    }
}

impl ArtifactBlueprint for DataModelDocument {
    type Context = DataModelContext;

    fn generation_prompt() -> &'static PromptTemplate {
        &prompts::DATA_MODEL_GENERATION
    }

    fn modification_prompt() -> &'static PromptTemplate {
        &prompts::DATA_MODEL_MODIFICATION
    }

    fn example() -> &'static str {
        prompts::DATA_MODEL_EXAMPLE
    }

    fn requires_requirements() -> bool {
        false
    }

    fn context_vars(context: &DataModelContext, vars: &mut PromptVars) -> Result<()> {
        let stories = &context.user_stories;
        vars.set(
            "user_stories",
            context_json(stories, stories.stories.is_empty(), "No user stories were provided.")?,
        );
        Ok(())
    }
}

impl ArtifactBlueprint for SystemDesignDocument {
    type Context = SystemDesignContext;

    fn generation_prompt() -> &'static PromptTemplate {
        &prompts::SYSTEM_DESIGN_GENERATION
    }

    fn modification_prompt() -> &'static PromptTemplate {
        &prompts::SYSTEM_DESIGN_MODIFICATION
    }

    fn example() -> &'static str {
        prompts::SYSTEM_DESIGN_EXAMPLE
    }

    fn requires_requirements() -> bool {
        false
    }

    fn context_vars(context: &SystemDesignContext, vars: &mut PromptVars) -> Result<()> {
        let stories = &context.user_stories;
        let model = &context.data_model;
        vars.set(
            "user_stories",
            context_json(stories, stories.stories.is_empty(), "No user stories were provided.")?,
        );
        vars.set(
            "data_model",
            context_json(model, model.entities.is_empty(), "No data model was provided.")?,
        );
        Ok(())
    }
}

/// Variables every template of `D` understands.
pub(crate) fn base_vars<D: ArtifactBlueprint>(language: &str) -> Result<PromptVars> {
    let schema = serde_json::to_string_pretty(&D::schema().to_json_schema())?;
    Ok(PromptVars::new()
        .with("schema", schema)
        .with("example", D::example())
        .with("language", language))
}
