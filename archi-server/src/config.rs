use archi_workflow::ProjectDesigner;
use std::{sync::Arc, time::Duration};

/// Transport limits for the HTTP server.
#[derive(Clone, Debug)]
pub struct SecurityConfig {
    /// Allowed origins for CORS (empty = allow all)
    pub allowed_origins: Vec<String>,
    /// Maximum request body size in bytes (default: 2MB)
    pub max_body_size: usize,
    /// Request timeout. Generation waits on the model, so keep this generous.
    pub request_timeout: Duration,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            max_body_size: 2 * 1024 * 1024,
            request_timeout: Duration::from_secs(300),
        }
    }
}

#[derive(Clone)]
pub struct ServerConfig {
    pub designer: Arc<ProjectDesigner>,
    pub security: SecurityConfig,
}

impl ServerConfig {
    pub fn new(designer: Arc<ProjectDesigner>) -> Self {
        Self { designer, security: SecurityConfig::default() }
    }

    pub fn with_security(mut self, security: SecurityConfig) -> Self {
        self.security = security;
        self
    }

    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.security.allowed_origins = origins;
        self
    }

    pub fn with_max_body_size(mut self, size: usize) -> Self {
        self.security.max_body_size = size;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.security.request_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archi_artifact::InMemoryArtifactStore;
    use archi_model::MockLlm;
    use archi_workflow::WorkflowSettings;

    #[test]
    fn test_server_config_builder() {
        let designer = Arc::new(ProjectDesigner::new(
            Arc::new(InMemoryArtifactStore::new()),
            Arc::new(MockLlm::new("mock")),
            WorkflowSettings::default(),
        ));
        let config = ServerConfig::new(designer)
            .with_allowed_origins(vec!["https://example.com".to_string()])
            .with_max_body_size(1024)
            .with_request_timeout(Duration::from_secs(5));

        assert_eq!(config.security.allowed_origins, vec!["https://example.com"]);
        assert_eq!(config.security.max_body_size, 1024);
        assert_eq!(config.security.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_security_defaults() {
        let security = SecurityConfig::default();
        assert!(security.allowed_origins.is_empty());
        assert_eq!(security.max_body_size, 2 * 1024 * 1024);
        assert_eq!(security.request_timeout, Duration::from_secs(300));
    }
}
