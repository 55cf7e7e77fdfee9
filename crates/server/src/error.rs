//! API error mapping

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use iris_lib::{ErrorResponse, ModelError, ShapeError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{}", .0.body_text())]
    Body(#[from] JsonRejection),

    #[error("{0}")]
    Shape(#[from] ShapeError),

    #[error("{0}")]
    Model(#[from] ModelError),
}

impl ApiError {
    /// `client` for rejected input, `internal` for failures on our side
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Body(_)
            | ApiError::Shape(_)
            | ApiError::Model(ModelError::FeatureMismatch { .. }) => "client",
            ApiError::Model(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            "client" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(detail = %self, "Prediction failed");
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_errors_are_client_errors() {
        let err = ApiError::from(ShapeError::Empty);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "no samples provided");
    }

    #[test]
    fn test_feature_mismatch_is_client_error() {
        let err = ApiError::from(ModelError::FeatureMismatch {
            expected: 4,
            actual: 2,
        });
        assert_eq!(err.kind(), "client");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_model_failure_is_internal() {
        let err = ApiError::from(ModelError::NotFitted);
        assert_eq!(err.kind(), "internal");
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
