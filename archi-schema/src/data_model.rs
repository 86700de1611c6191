use crate::document::Document;
use crate::schema::Schema;
use crate::validator::{SchemaValidator, cached_validator};
use archi_core::{ArtifactType, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataModelDocument {
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Table,
    View,
    Logical,
}

/// A column or attribute. `length` and `accuracy` use 0 for "not applicable".
///
/// Keys the schema does not declare are accepted on input and dropped here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub data_type: String,
    pub length: u32,
    pub accuracy: u32,
    pub required: bool,
    #[serde(default)]
    pub description: Option<String>,
    pub is_primary_key: bool,
    pub is_associated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub entity: String,
    pub related_entity: String,
    pub cardinality: Cardinality,
    pub relations: Vec<Relation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub property: String,
    pub related_property: String,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [Self::Table, Self::View, Self::Logical];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::View => "view",
            Self::Logical => "logical",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Cardinality {
    pub const ALL: [Cardinality; 4] =
        [Self::OneToOne, Self::OneToMany, Self::ManyToOne, Self::ManyToMany];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneToOne => "one_to_one",
            Self::OneToMany => "one_to_many",
            Self::ManyToOne => "many_to_one",
            Self::ManyToMany => "many_to_many",
        }
    }

    /// Reading form, e.g. "one-to-many".
    pub fn phrase(&self) -> &'static str {
        match self {
            Self::OneToOne => "one-to-one",
            Self::OneToMany => "one-to-many",
            Self::ManyToOne => "many-to-one",
            Self::ManyToMany => "many-to-many",
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-negative and no wider than the `u32` it deserializes into.
fn measure() -> Schema {
    Schema::bounded_integer(0, i64::from(u32::MAX))
}

impl Document for DataModelDocument {
    const ARTIFACT_TYPE: ArtifactType = ArtifactType::DataModel;

    fn validator() -> Result<&'static SchemaValidator> {
        static VALIDATOR: OnceLock<Result<SchemaValidator>> = OnceLock::new();
        cached_validator(&VALIDATOR, Self::schema())
    }

    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            let property = Schema::object()
                .required("name", Schema::string(), "Property identifier")
                .required("label", Schema::string(), "Display label")
                .required("type", Schema::string(), "Data type, e.g. varchar, int, decimal")
                .required("length", measure(), "Length, 0 when not applicable")
                .required("accuracy", measure(), "Precision, 0 when not applicable")
                .required("required", Schema::boolean(), "Whether a value is mandatory")
                .optional("description", Schema::nullable(Schema::string()), "Free-form notes")
                .required("is_primary_key", Schema::boolean(), "Part of the primary key")
                .required("is_associated", Schema::boolean(), "Participates in a relationship")
                .allow_unknown()
                .build();

            let entity = Schema::object()
                .required("name", Schema::string(), "Entity identifier")
                .required("title", Schema::string(), "Display title")
                .required(
                    "type",
                    Schema::enumeration(EntityKind::ALL.iter().map(EntityKind::as_str)),
                    "Entity kind",
                )
                .required("properties", Schema::array(property), "Entity properties")
                .allow_unknown()
                .build();

            let relation = Schema::object()
                .required("property", Schema::string(), "Property on the entity")
                .required("related_property", Schema::string(), "Property on the related entity")
                .allow_unknown()
                .build();

            let relationship = Schema::object()
                .required("entity", Schema::string(), "Source entity name")
                .required("related_entity", Schema::string(), "Target entity name")
                .required(
                    "cardinality",
                    Schema::enumeration(Cardinality::ALL.iter().map(Cardinality::as_str)),
                    "Relationship cardinality",
                )
                .required("relations", Schema::array(relation), "Linked property pairs")
                .allow_unknown()
                .build();

            Schema::object()
                .required("entities", Schema::array(entity), "Entities")
                .required("relationships", Schema::array(relationship), "Relationships")
                .allow_unknown()
                .build()
        })
    }
}

impl DataModelDocument {
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::validate;
    use serde_json::json;

    fn sample() -> DataModelDocument {
        DataModelDocument {
            entities: vec![Entity {
                name: "orders".into(),
                title: "Orders".into(),
                kind: EntityKind::Table,
                properties: vec![Property {
                    name: "id".into(),
                    label: "Order ID".into(),
                    data_type: "bigint".into(),
                    length: 0,
                    accuracy: 0,
                    required: true,
                    description: None,
                    is_primary_key: true,
                    is_associated: false,
                }],
            }],
            relationships: vec![Relationship {
                entity: "orders".into(),
                related_entity: "customers".into(),
                cardinality: Cardinality::ManyToOne,
                relations: vec![Relation {
                    property: "customer_id".into(),
                    related_property: "id".into(),
                }],
            }],
        }
    }

    #[test]
    fn test_typed_document_matches_schema() {
        let value = sample().to_value().unwrap();
        assert_eq!(value["entities"][0]["type"], "table");
        assert_eq!(value["relationships"][0]["cardinality"], "many_to_one");
        assert!(validate(&value, DataModelDocument::schema()).unwrap().ok);
    }

    #[test]
    fn test_description_may_be_absent() {
        let mut value = sample().to_value().unwrap();
        value["entities"][0]["properties"][0].as_object_mut().unwrap().remove("description");
        let doc = DataModelDocument::from_value(value).unwrap();
        assert_eq!(doc.entities[0].properties[0].description, None);
    }

    #[test]
    fn test_bad_cardinality() {
        let mut value = sample().to_value().unwrap();
        value["relationships"][0]["cardinality"] = json!("several");
        let err = DataModelDocument::from_value(value).unwrap_err();
        assert!(err.to_string().contains("relationships.0.cardinality"));
    }

    #[test]
    fn test_negative_length_rejected() {
        let mut value = sample().to_value().unwrap();
        value["entities"][0]["properties"][0]["length"] = json!(-4);
        let err = DataModelDocument::from_value(value).unwrap_err();
        assert!(err.to_string().contains("entities.0.properties.0.length"));
    }

    #[test]
    fn test_length_beyond_u32_names_the_field() {
        let mut value = sample().to_value().unwrap();
        value["entities"][0]["properties"][0]["length"] = json!(5_000_000_000u64);
        let result = DataModelDocument::validate_value(&value).unwrap();
        assert!(!result.ok);
        assert_eq!(result.violation.unwrap().path, "entities.0.properties.0.length");

        let err = DataModelDocument::from_value(value).unwrap_err();
        assert!(err.to_string().contains("entities.0.properties.0.length"));
    }

    #[test]
    fn test_largest_accuracy_loads() {
        let mut value = sample().to_value().unwrap();
        value["entities"][0]["properties"][0]["accuracy"] = json!(u32::MAX);
        let doc = DataModelDocument::from_value(value).unwrap();
        assert_eq!(doc.entities[0].properties[0].accuracy, u32::MAX);
    }

    #[test]
    fn test_extra_keys_accepted_and_dropped() {
        let mut value = sample().to_value().unwrap();
        value["entities"][0]["properties"][0]["default_value"] = json!("0");
        value["entities"][0]["comment"] = json!("legacy table");
        value["summary"] = json!("orders and customers");

        assert!(DataModelDocument::validate_value(&value).unwrap().ok);
        let doc = DataModelDocument::from_value(value).unwrap();
        assert_eq!(doc, sample());

        let stored = doc.to_value().unwrap();
        assert!(stored.get("summary").is_none());
        assert!(stored["entities"][0]["properties"][0].get("default_value").is_none());
    }

    #[test]
    fn test_entity_lookup() {
        assert!(sample().entity("orders").is_some());
        assert!(sample().entity("customers").is_none());
    }
}
