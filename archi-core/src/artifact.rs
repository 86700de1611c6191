use crate::{ArchiError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of design document managed by the workflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactType {
    UserStories,
    DataModel,
    SystemDesign,
}

impl ArtifactType {
    pub const ALL: [ArtifactType; 3] = [Self::UserStories, Self::DataModel, Self::SystemDesign];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserStories => "user_stories",
            Self::DataModel => "data_model",
            Self::SystemDesign => "system_design",
        }
    }

    /// Directory grouping both slots of this artifact type.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::UserStories => "user_story",
            Self::DataModel => "data_model",
            Self::SystemDesign => "system_design",
        }
    }

    /// Human label used in rendered prose and log lines.
    pub fn title(&self) -> &'static str {
        match self {
            Self::UserStories => "User Stories",
            Self::DataModel => "Data Model",
            Self::SystemDesign => "System Design",
        }
    }
}

impl fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactType {
    type Err = ArchiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "user_stories" | "user_story" | "stories" => Ok(Self::UserStories),
            "data_model" | "datamodel" => Ok(Self::DataModel),
            "system_design" | "design" => Ok(Self::SystemDesign),
            other => Err(ArchiError::config(format!(
                "unknown artifact type '{other}', expected one of: user_stories, data_model, system_design"
            ))),
        }
    }
}

/// One of the two storage slots each artifact type owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Draft,
    Result,
}

impl Slot {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Result => "result",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller's choice of what to do with a document. Exactly one flag must be set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveDecision {
    #[serde(default)]
    pub save_as_draft: bool,
    #[serde(default)]
    pub save_as_result: bool,
    #[serde(default)]
    pub not_save: bool,
}

/// The single action a valid [`SaveDecision`] resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveAction {
    SaveAsDraft,
    SaveAsResult,
    Discard,
}

impl SaveDecision {
    pub fn draft() -> Self {
        Self { save_as_draft: true, ..Default::default() }
    }

    pub fn result() -> Self {
        Self { save_as_result: true, ..Default::default() }
    }

    pub fn discard() -> Self {
        Self { not_save: true, ..Default::default() }
    }

    pub fn resolve(&self) -> Result<SaveAction> {
        match (self.save_as_draft, self.save_as_result, self.not_save) {
            (true, false, false) => Ok(SaveAction::SaveAsDraft),
            (false, true, false) => Ok(SaveAction::SaveAsResult),
            (false, false, true) => Ok(SaveAction::Discard),
            _ => {
                let selected = [self.save_as_draft, self.save_as_result, self.not_save]
                    .iter()
                    .filter(|flag| **flag)
                    .count();
                Err(ArchiError::config(format!(
                    "exactly one of save_as_draft, save_as_result, not_save must be true ({selected} selected)"
                )))
            }
        }
    }
}

impl SaveAction {
    pub fn target_slot(&self) -> Option<Slot> {
        match self {
            Self::SaveAsDraft => Some(Slot::Draft),
            Self::SaveAsResult => Some(Slot::Result),
            Self::Discard => None,
        }
    }
}
