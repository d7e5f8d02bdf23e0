use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use scsn_types::api::ErrorResponse;

use crate::feed::FeedError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body was not a JSON object of the expected shape.
    #[error("invalid JSON body")]
    InvalidJson,

    #[error("unknown API endpoint")]
    UnknownEndpoint,

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidJson | ApiError::Feed(FeedError::BodyRequired) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::UnknownEndpoint => StatusCode::NOT_FOUND,
            ApiError::Feed(FeedError::ActorNotFound | FeedError::StoreUnavailable(_))
            | ApiError::Join(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message placed in the `error` field.
    pub fn message(&self) -> &'static str {
        match self {
            ApiError::InvalidJson => "Invalid JSON",
            ApiError::UnknownEndpoint => "Unknown API endpoint",
            ApiError::Feed(FeedError::BodyRequired) => "Body is required",
            ApiError::Feed(FeedError::ActorNotFound) => "No user found",
            // A blocking task only ever runs store work.
            ApiError::Feed(FeedError::StoreUnavailable(_)) | ApiError::Join(_) => {
                "Database unavailable"
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Feed(FeedError::StoreUnavailable(e)) => error!("Database unavailable: {:#}", e),
            other if status.is_server_error() => error!("Request failed: {}", other),
            _ => {}
        }

        (
            status,
            Json(ErrorResponse {
                error: self.message().to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_4xx() {
        assert_eq!(ApiError::InvalidJson.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidJson.message(), "Invalid JSON");
        assert_eq!(ApiError::UnknownEndpoint.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::UnknownEndpoint.message(), "Unknown API endpoint");

        let err = ApiError::from(FeedError::BodyRequired);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Body is required");
    }

    #[test]
    fn store_errors_map_to_500() {
        let err = ApiError::from(FeedError::ActorNotFound);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "No user found");

        let err = ApiError::from(FeedError::StoreUnavailable(anyhow::anyhow!("disk I/O error")));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Database unavailable");
    }

    #[tokio::test]
    async fn failed_blocking_task_reads_as_store_outage() {
        let join_err = tokio::task::spawn_blocking::<_, ()>(|| panic!("store worker died"))
            .await
            .unwrap_err();
        let err = ApiError::from(join_err);

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Database unavailable");

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
