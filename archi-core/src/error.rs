use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum ArchiError {
    #[error("Service error: {0}")]
    Service(String),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ArchiError>;

/// Machine-checkable error category carried by every surfaced error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Service,
    Format,
    NotFound,
    Configuration,
    Io,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::Format => "format",
            Self::NotFound => "not_found",
            Self::Configuration => "configuration",
            Self::Io => "io",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ArchiError {
    pub fn service(message: impl Into<String>) -> Self {
        Self::Service(message.into())
    }

    pub fn format(message: impl Into<String>) -> Self {
        Self::Format(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// A stored document that no longer parses is a storage failure, so
    /// serialization errors report as [`ErrorKind::Io`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Service(_) => ErrorKind::Service,
            Self::Format(_) => ErrorKind::Format,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Config(_) => ErrorKind::Configuration,
            Self::Io(_) | Self::Serde(_) => ErrorKind::Io,
        }
    }

    /// Human-readable detail without the kind prefix.
    pub fn detail(&self) -> String {
        match self {
            Self::Service(msg) | Self::Format(msg) | Self::NotFound(msg) | Self::Config(msg) => {
                msg.clone()
            }
            Self::Io(err) => err.to_string(),
            Self::Serde(err) => err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ArchiError::format("field 'stories.0.role': missing required field");
        assert_eq!(err.to_string(), "Format error: field 'stories.0.role': missing required field");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: ArchiError = io_err.into();
        assert!(matches!(err, ArchiError::Io(_)));
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(ArchiError::service("x").kind(), ErrorKind::Service);
        assert_eq!(ArchiError::not_found("x").kind(), ErrorKind::NotFound);
        assert_eq!(ArchiError::config("x").kind(), ErrorKind::Configuration);

        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(ArchiError::from(serde_err).kind(), ErrorKind::Io);
    }

    #[test]
    fn test_detail_strips_prefix() {
        assert_eq!(ArchiError::not_found("no draft").detail(), "no draft");
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::NotFound).unwrap();
        assert_eq!(json, "\"not_found\"");
        assert_eq!(ErrorKind::Configuration.to_string(), "configuration");
    }
}
