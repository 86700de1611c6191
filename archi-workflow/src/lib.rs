//! # archi-workflow
//!
//! The draft/result lifecycle for LLM-generated design documents.
//!
//! Each artifact type gets an [`ArtifactWorkflow`] built from three pipelines:
//!
//! - [`GenerationPipeline`] - prompt the model, validate, persist the draft (best effort)
//! - [`ModificationPipeline`] - revise the stored draft; the result is returned, not saved
//! - [`SavePipeline`] - save as draft, promote to result, or discard
//!
//! [`ProjectDesigner`] chains user stories, data model, and system design.
//!
//! ```rust,ignore
//! let workflow = ArtifactWorkflow::<UserStoryDocument>::new(store, llm, WorkflowSettings::default());
//! let generated = workflow.generate(GenerationRequest::new("An online bookstore")).await?;
//! workflow.save(SaveDecision::result(), &generated.document.to_value()?).await?;
//! ```

pub mod blueprint;
pub mod designer;
pub mod generation;
pub mod modification;
pub mod prompts;
pub mod render;
pub mod save;
pub mod settings;
pub mod structured;
pub mod workflow;

pub use blueprint::{ArtifactBlueprint, DataModelContext, SystemDesignContext};
pub use designer::{FullProjectDesign, ProjectDesigner};
pub use generation::{Generated, GenerationPipeline, GenerationRequest, GenerationStage};
pub use modification::{ModificationPipeline, ModificationRequest};
pub use prompts::{PromptTemplate, PromptVars, RenderedPrompt};
pub use render::{DocumentRenderer, MarkdownRenderer};
pub use save::{SaveAck, SavePipeline};
pub use settings::WorkflowSettings;
pub use structured::StructuredGenerator;
pub use workflow::ArtifactWorkflow;
