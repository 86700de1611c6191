//! Deterministic prose rendering of validated documents.

use archi_schema::{
    AnyDocument, DataModelDocument, Entity, Property, Relationship, SystemDesignDocument,
    SystemModule, UserStoryDocument,
};
use std::fmt::Write;

/// Turns a typed document into prose. Implementations must be pure.
pub trait DocumentRenderer: Send + Sync {
    fn render(&self, document: &AnyDocument) -> String;
}

/// Markdown output. Empty collections produce no section at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl DocumentRenderer for MarkdownRenderer {
    fn render(&self, document: &AnyDocument) -> String {
        match document {
            AnyDocument::UserStories(doc) => render_user_stories(doc),
            AnyDocument::DataModel(doc) => render_data_model(doc),
            AnyDocument::SystemDesign(doc) => render_system_design(doc),
        }
    }
}

/// Table cells cannot contain pipes or line breaks.
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

fn flag(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

/// Zero means "not applicable" and renders as an empty cell.
fn measure(value: u32) -> String {
    if value == 0 { String::new() } else { value.to_string() }
}

pub fn render_user_stories(doc: &UserStoryDocument) -> String {
    if doc.stories.is_empty() {
        return String::new();
    }

    let mut out = String::from("## User Stories\n");
    for story in &doc.stories {
        let _ = writeln!(out, "\n### Feature: {}", story.function_name);
        let _ = writeln!(out, "### As a {}, I want {}, so that {}", story.role, story.action, story.value);
        for criterion in &story.acceptance_criteria {
            let _ = writeln!(out, "- {criterion}");
        }
    }
    out
}

fn property_row(property: &Property) -> String {
    format!(
        "| {} | {} | {} | {} | {} | {} | {} | {} | {} |",
        cell(&property.name),
        cell(&property.label),
        cell(&property.data_type),
        measure(property.length),
        measure(property.accuracy),
        flag(property.required),
        flag(property.is_primary_key),
        flag(property.is_associated),
        cell(property.description.as_deref().unwrap_or("")),
    )
}

fn render_entity(out: &mut String, entity: &Entity) {
    let heading = if entity.title.trim().is_empty() { &entity.name } else { &entity.title };
    let _ = writeln!(out, "\n#### {heading}");
    if entity.properties.is_empty() {
        return;
    }
    out.push('\n');
    out.push_str(
        "| Field | Label | Type | Length | Precision | Required | Primary Key | Associated | Description |\n",
    );
    out.push_str(
        "|-------|-------|------|--------|-----------|----------|-------------|------------|-------------|\n",
    );
    for property in &entity.properties {
        out.push_str(&property_row(property));
        out.push('\n');
    }
}

fn relationship_sentence(relationship: &Relationship) -> String {
    let mut sentence = format!(
        "`{}` and `{}` have a {} relationship.",
        relationship.entity,
        relationship.related_entity,
        relationship.cardinality.phrase()
    );
    if !relationship.relations.is_empty() {
        let links: Vec<String> = relationship
            .relations
            .iter()
            .map(|r| format!("`{}` ↔ `{}`", r.property, r.related_property))
            .collect();
        let _ = write!(sentence, " Linked via {}.", links.join(", "));
    }
    sentence
}

pub fn render_data_model(doc: &DataModelDocument) -> String {
    if doc.entities.is_empty() && doc.relationships.is_empty() {
        return String::new();
    }

    let mut out = String::from("## Data Model\n");
    if !doc.entities.is_empty() {
        out.push_str("\n### Entities\n");
        for entity in &doc.entities {
            render_entity(&mut out, entity);
        }
    }
    if !doc.relationships.is_empty() {
        out.push_str("\n### Relationships\n\n");
        for relationship in &doc.relationships {
            out.push_str(&relationship_sentence(relationship));
            out.push('\n');
        }
    }
    out
}

fn render_module(out: &mut String, module: &SystemModule) {
    let _ = writeln!(out, "\n#### {}", module.name);
    if !module.description.trim().is_empty() {
        let _ = writeln!(out, "\n{}", module.description.trim());
    }
    if !module.key_features.is_empty() {
        out.push('\n');
        for feature in &module.key_features {
            let _ = writeln!(out, "- {feature}");
        }
    }
    if !module.api_endpoints.is_empty() {
        out.push_str("\n| Method | Path | Summary |\n|--------|------|---------|\n");
        for endpoint in &module.api_endpoints {
            let _ = writeln!(
                out,
                "| {} | {} | {} |",
                cell(&endpoint.method),
                cell(&endpoint.path),
                cell(&endpoint.summary)
            );
        }
    }
}

pub fn render_system_design(doc: &SystemDesignDocument) -> String {
    if doc.modules.is_empty() {
        return String::new();
    }

    let mut out = String::from("## System Design\n");
    for module in &doc.modules {
        render_module(&mut out, module);
    }
    out
}
