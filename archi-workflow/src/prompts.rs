//! Prompt templates with `{placeholder}` substitution.

use archi_core::{ArchiError, Result};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Matches `{identifier}`. JSON braces in examples never match.
static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER_REGEX
        .get_or_init(|| Regex::new(r"\{([a-z][a-z0-9_]*)\}").expect("Invalid regex pattern"))
}

/// System and user message pair for one model call.
#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub system: &'static str,
    pub user: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    pub system: String,
    pub user: String,
}

#[derive(Debug, Clone, Default)]
pub struct PromptVars(BTreeMap<String, String>);

impl PromptVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

impl PromptTemplate {
    pub fn render(&self, vars: &PromptVars) -> Result<RenderedPrompt> {
        Ok(RenderedPrompt {
            system: self.fill(self.system, vars)?,
            user: self.fill(self.user, vars)?,
        })
    }

    /// Single pass: substituted values are never re-scanned.
    fn fill(&self, template: &str, vars: &PromptVars) -> Result<String> {
        let mut out = String::with_capacity(template.len());
        let mut last = 0;
        for captures in placeholder_regex().captures_iter(template) {
            let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else { continue };
            let value = vars.get(name.as_str()).ok_or_else(|| {
                ArchiError::config(format!(
                    "prompt '{}' references unknown placeholder '{}'",
                    self.name,
                    name.as_str()
                ))
            })?;
            out.push_str(&template[last..whole.start()]);
            out.push_str(value);
            last = whole.end();
        }
        out.push_str(&template[last..]);
        Ok(out)
    }
}

/// Used when a refinement note is blank.
pub const NO_EXTRA_REQUIREMENTS: &str = "The user has no additional requirements.";

pub const USER_STORY_GENERATION: PromptTemplate = PromptTemplate {
    name: "user_story_generation",
    system: r#"# User story protocol

You are an experienced product manager. Turn the raw requirements into structured user stories.

## Rules

1. Give every story a clear feature name (use-case name) in `function_name`.
2. Every story reads as "<feature>: As a <role>, I want <action>, so that <value>".
3. Break complex requirements down into elementary stories.
4. Include the supporting administration features the product needs (sign-in, user management and the like).
5. Give each story 2-4 clear, verifiable acceptance criteria.
6. Write role, action, value, feature names and criteria in {language}.

## Output format (JSON Schema)
{schema}

## Example output
{example}"#,
    user: "Requirements:\n{requirements}\n\nAdditional notes:\n{note}",
};

pub const USER_STORY_MODIFICATION: PromptTemplate = PromptTemplate {
    name: "user_story_modification",
    system: r#"# User story protocol

You are an experienced product manager. Revise the user story draft below according to the user's instructions, then output the revised draft together with any stories you added.

## Current draft
{draft}

## Rules

1. Give every story a clear feature name (use-case name) in `function_name`.
2. Every story reads as "<feature>: As a <role>, I want <action>, so that <value>".
3. Break complex requirements down into elementary stories.
4. Give each story 2-4 clear, verifiable acceptance criteria.
5. Keep stories the instructions do not touch unchanged.
6. Write role, action, value, feature names and criteria in {language}.

## Output format (JSON Schema)
{schema}

## Example output
{example}"#,
    user: "Modification instructions:\n{instructions}",
};

pub const DATA_MODEL_GENERATION: PromptTemplate = PromptTemplate {
    name: "data_model_generation",
    system: r#"You are a senior database architect. Design a robust data model (ER model) for the user stories below.

## Rules

1. Identify every entity the stories need.
2. Give each property an appropriate data type; use length and accuracy 0 when they do not apply.
3. Determine the relationships between entities (one_to_one, one_to_many, many_to_one, many_to_many) and the properties that link them.
4. Normalize the design to at least third normal form.
5. Use snake_case for property names and PascalCase for entity names.
6. Write titles, labels and descriptions in {language}.

## User stories
{user_stories}

## Output format (JSON Schema)
{schema}

## Example output
{example}"#,
    user: "User requirements:\n{requirements}\n\nAdditional notes:\n{note}\n\nDesign the data model for these stories.",
};

pub const DATA_MODEL_MODIFICATION: PromptTemplate = PromptTemplate {
    name: "data_model_modification",
    system: r#"You are a senior database architect. Revise the data model draft according to the user stories and the user's instructions.

## Rules

1. Identify every entity the stories need.
2. Give each property an appropriate data type; use length and accuracy 0 when they do not apply.
3. Determine the relationships between entities and the properties that link them.
4. Normalize the design to at least third normal form.
5. Use snake_case for property names and PascalCase for entity names.
6. Write titles, labels and descriptions in {language}.

## User stories
{user_stories}

## Current draft
{draft}

## Output format (JSON Schema)
{schema}

## Example output
{example}"#,
    user: "Modification instructions:\n{instructions}",
};

pub const SYSTEM_DESIGN_GENERATION: PromptTemplate = PromptTemplate {
    name: "system_design_generation",
    system: r#"You are an experienced software architect. Design the system modules and their API for the user stories and data model below.

## Rules

1. Group related functionality into cohesive modules (authentication, inventory, orders, ...).
2. Define the key RESTful endpoints of every module with standard HTTP methods (GET, POST, PUT, DELETE).
3. Make sure every user story is served by at least one module.
4. Write descriptions, features and summaries in {language}.

## User stories
{user_stories}

## Data model
{data_model}

## Output format (JSON Schema)
{schema}

## Example output
{example}"#,
    user: "Additional requirements:\n{requirements}\n\nAdditional notes:\n{note}\n\nDesign the system modules.",
};

pub const SYSTEM_DESIGN_MODIFICATION: PromptTemplate = PromptTemplate {
    name: "system_design_modification",
    system: r#"You are an experienced software architect. Revise the system design draft according to the user's instructions, keeping it consistent with the user stories and data model.

## User stories
{user_stories}

## Data model
{data_model}

## Current draft
{draft}

## Rules

1. Keep modules cohesive and endpoints RESTful.
2. Keep parts the instructions do not touch unchanged.
3. Write descriptions, features and summaries in {language}.

## Output format (JSON Schema)
{schema}

## Example output
{example}"#,
    user: "Modification instructions:\n{instructions}",
};

pub const USER_STORY_EXAMPLE: &str = r#"{
  "stories": [
    {
      "function_name": "Submit order",
      "role": "customer",
      "action": "submit an order online",
      "value": "I can buy products quickly",
      "acceptance_criteria": [
        "An order contains at least one product",
        "A confirmation email is sent after submission"
      ]
    }
  ]
}"#;

pub const DATA_MODEL_EXAMPLE: &str = r#"{
  "entities": [
    {
      "name": "Order",
      "title": "Order",
      "type": "table",
      "properties": [
        {"name": "id", "label": "Order ID", "type": "bigint", "length": 0, "accuracy": 0, "required": true, "description": null, "is_primary_key": true, "is_associated": false},
        {"name": "customer_id", "label": "Customer", "type": "bigint", "length": 0, "accuracy": 0, "required": true, "description": "Buyer", "is_primary_key": false, "is_associated": true},
        {"name": "total", "label": "Total", "type": "decimal", "length": 12, "accuracy": 2, "required": true, "description": null, "is_primary_key": false, "is_associated": false}
      ]
    }
  ],
  "relationships": [
    {
      "entity": "Order",
      "related_entity": "Customer",
      "cardinality": "many_to_one",
      "relations": [{"property": "customer_id", "related_property": "id"}]
    }
  ]
}"#;

pub const SYSTEM_DESIGN_EXAMPLE: &str = r#"{
  "modules": [
    {
      "name": "Order management",
      "description": "Creates and tracks customer orders",
      "key_features": ["Order submission", "Order status tracking"],
      "api_endpoints": [
        {"method": "POST", "path": "/api/orders", "summary": "Submit an order"},
        {"method": "GET", "path": "/api/orders/{id}", "summary": "Fetch one order"}
      ]
    }
  ]
}"#;
