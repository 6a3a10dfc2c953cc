use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::storage::StorageError;

pub type ServiceResult<T> = core::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Idea text is required")]
    EmptyIdeaText,

    #[error("Idea not found")]
    IdeaNotFound(String),

    #[error("Not enough ideas available. Please reset or add more ideas.")]
    InsufficientPool,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::EmptyIdeaText => StatusCode::BAD_REQUEST,
            AppError::IdeaNotFound(_) => StatusCode::NOT_FOUND,
            // The pick endpoint reports a too-small pool as a 500 with its
            // message, matching the wire contract.
            AppError::InsufficientPool => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Storage details go to the log, not the client.
        let message = match &self {
            AppError::Storage(err) => {
                tracing::error!("storage failure: {err}");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
