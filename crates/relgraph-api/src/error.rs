//! Error responses for the HTTP facade.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use relgraph_core::RelgraphError;
use relgraph_graph::GraphError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid or missing bearer token")]
    Unauthorized,

    #[error(transparent)]
    Validation(#[from] RelgraphError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Graph(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "ERR_BAD_REQUEST",
            ApiError::Validation(RelgraphError::InvalidLabel { .. }) => "ERR_INVALID_LABEL",
            ApiError::Validation(_) => "ERR_VALIDATION_ERROR",
            ApiError::Unauthorized => "ERR_UNAUTHORIZED",
            ApiError::Graph(_) => "ERR_INTERNAL_SERVER_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Engine messages stay in the logs.
        let message = match &self {
            ApiError::Graph(e) => {
                tracing::error!(error = %e, "Graph operation failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": message,
            "errorCode": self.code(),
        }));

        let mut response = (status, body).into_response();
        if matches!(self, ApiError::Unauthorized) {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
