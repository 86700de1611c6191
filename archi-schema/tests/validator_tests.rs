use archi_schema::{
    DataModelDocument, Document, SystemDesignDocument, UserStoryDocument, ViolationKind, validate,
    validate_str,
};
use proptest::prelude::*;
use serde_json::{Value, json};

fn user_stories() -> Value {
    json!({
        "stories": [
            {
                "function_name": "Browse catalog",
                "role": "shopper",
                "action": "filter products by category",
                "value": "I find what I need quickly",
                "acceptance_criteria": ["filters combine", "empty result shows a hint"]
            },
            {
                "function_name": "Checkout",
                "role": "shopper",
                "action": "pay with a saved card",
                "value": "checkout takes one click",
                "acceptance_criteria": ["declined card shows the reason"]
            }
        ]
    })
}

#[test]
fn test_user_stories_accept_valid_document() {
    let result = validate(&user_stories(), UserStoryDocument::schema()).unwrap();
    assert!(result.ok, "{}", result.message);
}

#[test]
fn test_missing_acceptance_criteria_is_reported_with_index() {
    let mut doc = user_stories();
    doc["stories"][1].as_object_mut().unwrap().remove("acceptance_criteria");

    let result = validate(&doc, UserStoryDocument::schema()).unwrap();
    assert!(!result.ok);
    let violation = result.violation.unwrap();
    assert_eq!(violation.path, "stories.1.acceptance_criteria");
    assert_eq!(violation.kind, ViolationKind::MissingField);
}

#[test]
fn test_string_input_is_parsed() {
    let text = serde_json::to_string(&user_stories()).unwrap();
    assert!(validate_str(&text, UserStoryDocument::schema()).unwrap().ok);
}

#[test]
fn test_data_model_entity_type_outside_enumeration() {
    let doc = json!({
        "entities": [{"name": "t", "title": "T", "type": "index", "properties": []}],
        "relationships": []
    });
    let violation = validate(&doc, DataModelDocument::schema()).unwrap().violation.unwrap();
    assert_eq!(violation.path, "entities.0.type");
    assert!(matches!(violation.kind, ViolationKind::NotInEnum { .. }));
}

#[test]
fn test_system_design_wrong_type_at_root() {
    let result = validate(&json!("modules"), SystemDesignDocument::schema()).unwrap();
    assert_eq!(result.message, "field 'root': expected object, found string");
}

#[test]
fn test_json_schema_is_strict_object() {
    let schema = UserStoryDocument::schema().to_json_schema();
    assert_eq!(schema["additionalProperties"], false);
    assert_eq!(schema["properties"]["stories"]["minItems"], 1);
    assert_eq!(
        schema["properties"]["stories"]["items"]["required"],
        json!(["function_name", "role", "action", "value", "acceptance_criteria"])
    );
}

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|n| json!(n)),
        "[a-z_]{0,8}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::hash_map(
                prop_oneof![
                    Just("stories".to_string()),
                    Just("role".to_string()),
                    Just("acceptance_criteria".to_string()),
                    "[a-z]{1,6}",
                ],
                inner,
                0..5,
            )
            .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn prop_validation_is_deterministic(doc in arb_json()) {
        let first = validate(&doc, UserStoryDocument::schema()).unwrap();
        let second = validate(&doc.clone(), UserStoryDocument::schema()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_failure_always_names_a_path(doc in arb_json()) {
        let result = validate(&doc, DataModelDocument::schema()).unwrap();
        if !result.ok {
            let violation = result.violation.unwrap();
            prop_assert!(!violation.path.is_empty());
            prop_assert!(result.message.contains(&violation.path));
        }
    }
}
