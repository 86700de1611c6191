use archi_artifact::InMemoryArtifactStore;
use archi_core::ErrorKind;
use archi_model::MockLlm;
use archi_schema::{AnyDocument, DataModelDocument, Document};
use archi_workflow::{ArtifactWorkflow, DocumentRenderer, MarkdownRenderer, WorkflowSettings};
use serde_json::{Value, json};
use std::sync::Arc;

fn orders_model() -> Value {
    json!({
        "entities": [
            {
                "name": "Order",
                "title": "Customer order",
                "type": "table",
                "properties": [
                    {
                        "name": "id",
                        "label": "Order ID",
                        "type": "bigint",
                        "length": 0,
                        "accuracy": 0,
                        "required": true,
                        "description": null,
                        "is_primary_key": true,
                        "is_associated": false
                    },
                    {
                        "name": "total",
                        "label": "Total",
                        "type": "decimal",
                        "length": 10,
                        "accuracy": 2,
                        "required": true,
                        "description": "Sum of line items",
                        "is_primary_key": false,
                        "is_associated": false
                    },
                    {
                        "name": "customer_id",
                        "label": "Customer",
                        "type": "bigint",
                        "length": 0,
                        "accuracy": 0,
                        "required": false,
                        "is_primary_key": false,
                        "is_associated": true
                    }
                ]
            },
            {
                "name": "Customer",
                "title": "",
                "type": "table",
                "properties": []
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
    })
}

fn workflow() -> ArtifactWorkflow<DataModelDocument> {
    ArtifactWorkflow::new(
        Arc::new(InMemoryArtifactStore::new()),
        Arc::new(MockLlm::new("mock")),
        WorkflowSettings::default(),
    )
}

#[test]
fn test_zero_length_renders_blank_cell() {
    let markdown = workflow().render(&orders_model()).unwrap();

    assert!(
        markdown.contains("| id | Order ID | bigint |  |  | True | True | False |  |"),
        "{markdown}"
    );
    assert!(markdown.contains("| total | Total | decimal | 10 | 2 | True | False | False | Sum of line items |"));
    assert!(!markdown.contains("| 0 |"));
}

#[test]
fn test_data_model_sections() {
    let markdown = workflow().render(&orders_model()).unwrap();

    assert!(markdown.starts_with("## Data Model\n\n### Entities\n\n#### Customer order\n"));
    // empty title falls back to the entity name
    assert!(markdown.contains("\n#### Customer\n"));
    assert!(markdown.contains(
        "### Relationships\n\n`Order` and `Customer` have a many-to-one relationship. Linked via `customer_id` ↔ `id`.\n"
    ));
}

#[test]
fn test_render_is_deterministic() {
    let workflow = workflow();
    let first = workflow.render(&orders_model()).unwrap();
    let second = workflow.render(&orders_model()).unwrap();
    assert_eq!(first, second);

    let document = DataModelDocument::from_value(orders_model()).unwrap();
    assert_eq!(MarkdownRenderer.render(&AnyDocument::from(document.clone())), first);
    assert_eq!(workflow.render_document(&document).unwrap(), first);
}

#[test]
fn test_render_rejects_nonconforming_document() {
    let err = workflow().render(&json!({"entities": [{"name": "x"}]})).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

struct Plain;

impl DocumentRenderer for Plain {
    fn render(&self, document: &AnyDocument) -> String {
        document.artifact_type().to_string()
    }
}

#[test]
fn test_custom_renderer() {
    let workflow = workflow().with_renderer(Arc::new(Plain));
    assert_eq!(workflow.render(&orders_model()).unwrap(), "data_model");
}
