use archi_core::{ArchiError, ErrorKind};
use archi_telemetry::{error, warn};
use axum::{Json, http::StatusCode};
use serde::{Deserialize, Serialize};

/// Error response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub kind: ErrorKind,
    pub detail: String,
}

pub type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiErrorBody>)>;

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Service => StatusCode::BAD_GATEWAY,
        ErrorKind::Format => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Configuration => StatusCode::BAD_REQUEST,
        ErrorKind::Io => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn err(e: ArchiError) -> (StatusCode, Json<ApiErrorBody>) {
    let kind = e.kind();
    let status = status_for(kind);
    if status.is_server_error() {
        error!(kind = %kind, error = %e, "request failed");
    } else {
        warn!(kind = %kind, error = %e, "request rejected");
    }
    (status, Json(ApiErrorBody { kind, detail: e.detail() }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(ErrorKind::Service), StatusCode::BAD_GATEWAY);
        assert_eq!(status_for(ErrorKind::Format), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status_for(ErrorKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorKind::Configuration), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorKind::Io), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_body() {
        let (status, Json(body)) = err(ArchiError::not_found("no user_stories draft"));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.kind, ErrorKind::NotFound);
        assert_eq!(body.detail, "no user_stories draft");
    }
}
