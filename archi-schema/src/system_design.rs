use crate::document::Document;
use crate::schema::Schema;
use crate::validator::{SchemaValidator, cached_validator};
use archi_core::{ArtifactType, Result};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemDesignDocument {
    pub modules: Vec<SystemModule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemModule {
    pub name: String,
    pub description: String,
    pub key_features: Vec<String>,
    pub api_endpoints: Vec<ApiEndpoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEndpoint {
    pub method: String,
    pub path: String,
    pub summary: String,
}

impl Document for SystemDesignDocument {
    const ARTIFACT_TYPE: ArtifactType = ArtifactType::SystemDesign;

    fn validator() -> Result<&'static SchemaValidator> {
        static VALIDATOR: OnceLock<Result<SchemaValidator>> = OnceLock::new();
        cached_validator(&VALIDATOR, Self::schema())
    }

    fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            let endpoint = Schema::object()
                .required("method", Schema::string(), "HTTP method")
                .required("path", Schema::string(), "Route path")
                .required("summary", Schema::string(), "What the endpoint does")
                .deny_unknown()
                .build();

            let module = Schema::object()
                .required("name", Schema::string(), "Module name")
                .required("description", Schema::string(), "Module responsibility")
                .required("key_features", Schema::array(Schema::string()), "Main capabilities")
                .required("api_endpoints", Schema::array(endpoint), "Endpoints the module exposes")
                .deny_unknown()
                .build();

            Schema::object()
                .required("modules", Schema::non_empty_array(module), "System modules")
                .deny_unknown()
                .build()
        })
    }
}

impl SystemDesignDocument {
    pub fn endpoint_count(&self) -> usize {
        self.modules.iter().map(|m| m.api_endpoints.len()).sum()
    }
}
