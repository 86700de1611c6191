//! One-shot commands. Each returns the text to print.

use anyhow::Result;
use archi_core::{
    ArchiError, ArtifactType, ErrorKind, Llm, LlmRequest, LlmResponseStream, SaveDecision,
};
use archi_telemetry::info;
use archi_workflow::{
    ArtifactBlueprint, ArtifactWorkflow, DataModelContext, Generated, GenerationRequest,
    ModificationRequest, ProjectDesigner, SystemDesignContext,
};
use async_trait::async_trait;
use colored::Colorize;

/// Model stand-in for commands that only read or move stored documents.
pub struct Offline;

#[async_trait]
impl Llm for Offline {
    fn name(&self) -> &str {
        "offline"
    }

    async fn generate_content(
        &self,
        _req: LlmRequest,
        _stream: bool,
    ) -> archi_core::Result<LlmResponseStream> {
        Err(ArchiError::config("this command does not call the model"))
    }
}

fn found<T>(stored: archi_core::Result<T>) -> archi_core::Result<Option<T>> {
    match stored {
        Ok(document) => Ok(Some(document)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// The most settled version of a document: the result if there is one, else the draft.
pub async fn latest<D: ArtifactBlueprint>(workflow: &ArtifactWorkflow<D>) -> Result<Option<D>> {
    if let Some(document) = found(workflow.load_result().await)? {
        return Ok(Some(document));
    }
    Ok(found(workflow.load_draft().await)?)
}

async fn data_model_context(designer: &ProjectDesigner) -> Result<DataModelContext> {
    let user_stories = latest(designer.user_stories()).await?.unwrap_or_default();
    Ok(DataModelContext { user_stories })
}

async fn system_design_context(designer: &ProjectDesigner) -> Result<SystemDesignContext> {
    let user_stories = latest(designer.user_stories()).await?.unwrap_or_default();
    let data_model = latest(designer.data_model()).await?.unwrap_or_default();
    Ok(SystemDesignContext { user_stories, data_model })
}

fn generated_report<D: ArtifactBlueprint>(
    workflow: &ArtifactWorkflow<D>,
    generated: &Generated<D>,
) -> Result<String> {
    let mut out = workflow.render_document(&generated.document)?;
    out.push('\n');
    match &generated.warning {
        Some(warning) => out.push_str(&format!("{} {warning}\n", "warning:".yellow().bold())),
        None => out.push_str(&format!("{} {} draft saved\n", "✓".green(), D::ARTIFACT_TYPE)),
    }
    Ok(out)
}

pub async fn generate(
    designer: &ProjectDesigner,
    artifact: ArtifactType,
    requirements: &str,
    note: Option<String>,
) -> Result<String> {
    info!(artifact = %artifact, "generate command");
    let base = GenerationRequest::<()> { requirements: requirements.to_string(), context: (), note };
    match artifact {
        ArtifactType::UserStories => {
            let generated = designer.user_stories().generate(base).await?;
            generated_report(designer.user_stories(), &generated)
        }
        ArtifactType::DataModel => {
            let request = base.with_context(data_model_context(designer).await?);
            let generated = designer.data_model().generate(request).await?;
            generated_report(designer.data_model(), &generated)
        }
        ArtifactType::SystemDesign => {
            let request = base.with_context(system_design_context(designer).await?);
            let generated = designer.system_design().generate(request).await?;
            generated_report(designer.system_design(), &generated)
        }
    }
}

async fn finish_modification<D: ArtifactBlueprint>(
    workflow: &ArtifactWorkflow<D>,
    revised: D,
    save: bool,
) -> Result<String> {
    let mut out = workflow.render_document(&revised)?;
    out.push('\n');
    if save {
        let ack = workflow.save_document(SaveDecision::draft(), &revised).await?;
        out.push_str(&format!("{} {}\n", "✓".green(), ack.message));
    } else {
        out.push_str("Revision not saved; rerun with --save to replace the draft.\n");
    }
    Ok(out)
}

pub async fn modify(
    designer: &ProjectDesigner,
    artifact: ArtifactType,
    instructions: &str,
    save: bool,
) -> Result<String> {
    info!(artifact = %artifact, save, "modify command");
    match artifact {
        ArtifactType::UserStories => {
            let workflow = designer.user_stories();
            let revised = workflow.modify(ModificationRequest::new(instructions)).await?;
            finish_modification(workflow, revised, save).await
        }
        ArtifactType::DataModel => {
            let workflow = designer.data_model();
            let request = ModificationRequest::<()>::new(instructions)
                .with_context(data_model_context(designer).await?);
            let revised = workflow.modify(request).await?;
            finish_modification(workflow, revised, save).await
        }
        ArtifactType::SystemDesign => {
            let workflow = designer.system_design();
            let request = ModificationRequest::<()>::new(instructions)
                .with_context(system_design_context(designer).await?);
            let revised = workflow.modify(request).await?;
            finish_modification(workflow, revised, save).await
        }
    }
}

async fn show_one<D: ArtifactBlueprint>(
    workflow: &ArtifactWorkflow<D>,
    result: bool,
    markdown: bool,
) -> Result<String> {
    let value = if result { workflow.query_result().await? } else { workflow.query_draft().await? };
    if markdown {
        Ok(workflow.render(&value)?)
    } else {
        Ok(format!("{}\n", serde_json::to_string_pretty(&value)?))
    }
}

pub async fn show(
    designer: &ProjectDesigner,
    artifact: ArtifactType,
    result: bool,
    markdown: bool,
) -> Result<String> {
    match artifact {
        ArtifactType::UserStories => show_one(designer.user_stories(), result, markdown).await,
        ArtifactType::DataModel => show_one(designer.data_model(), result, markdown).await,
        ArtifactType::SystemDesign => show_one(designer.system_design(), result, markdown).await,
    }
}

async fn promote_one<D: ArtifactBlueprint>(workflow: &ArtifactWorkflow<D>) -> Result<String> {
    let draft = workflow.query_draft().await?;
    let ack = workflow.save(SaveDecision::result(), &draft).await?;
    Ok(format!("{} {}\n", "✓".green(), ack.message))
}

/// Copies the draft into the result slot. The draft itself stays.
pub async fn promote(designer: &ProjectDesigner, artifact: ArtifactType) -> Result<String> {
    info!(artifact = %artifact, "promote command");
    match artifact {
        ArtifactType::UserStories => promote_one(designer.user_stories()).await,
        ArtifactType::DataModel => promote_one(designer.data_model()).await,
        ArtifactType::SystemDesign => promote_one(designer.system_design()).await,
    }
}

pub async fn design(designer: &ProjectDesigner, requirements: &str) -> Result<String> {
    let design = designer.design(requirements).await?;
    let mut out = design.to_markdown();
    out.push('\n');
    for warning in &design.warnings {
        out.push_str(&format!("{} {warning}\n", "warning:".yellow().bold()));
    }
    out.push_str(&format!(
        "{} {} stories, {} entities, {} modules saved as drafts\n",
        "✓".green(),
        design.user_stories.stories.len(),
        design.data_model.entities.len(),
        design.system_design.modules.len()
    ));
    Ok(out)
}
