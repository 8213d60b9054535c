use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

use crate::routes::table::RouteError;

/// Handler failure that is not a form redisplay.
#[derive(Debug)]
pub enum HttpError {
    /// 404 with an empty body.
    NotFound,
    /// 500; the message is logged, never sent.
    Internal(String),
}

impl From<ServiceError> for HttpError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::NotFound(_) => HttpError::NotFound,
            // handlers re-render the form for validation failures before reaching here
            ServiceError::Validation(errors) => HttpError::Internal(format!("unhandled validation failure: {errors:?}")),
            ServiceError::Storage(msg) => HttpError::Internal(msg),
        }
    }
}

impl From<RouteError> for HttpError {
    fn from(e: RouteError) -> Self {
        HttpError::Internal(e.to_string())
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        match self {
            HttpError::NotFound => StatusCode::NOT_FOUND.into_response(),
            HttpError::Internal(msg) => {
                error!(error = %msg, "request failed");
                let body = Json(serde_json::json!({"error": "Internal Server Error"}));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn service_errors_map_to_statuses() {
        let not_found = HttpError::from(ServiceError::not_found("user")).into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let storage = HttpError::from(ServiceError::Storage("disk full".into())).into_response();
        assert_eq!(storage.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn internal_error_body_hides_the_cause() -> anyhow::Result<()> {
        let cause = "/srv/data/users.json: expected value at line 1 column 1";
        let resp = HttpError::from(ServiceError::Storage(cause.into())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(resp.into_body(), usize::MAX).await?;
        let json: serde_json::Value = serde_json::from_slice(&body)?;
        assert_eq!(json, serde_json::json!({"error": "Internal Server Error"}));
        Ok(())
    }
}
