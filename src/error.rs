use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::metadata::MetadataError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Metadata(MetadataError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Metadata(MetadataError::Client(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Metadata(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Metadata(e) => {
                tracing::warn!(error = %e, status = status.as_u16(), "Metadata lookup failed");
                "Metadata service unavailable"
            }
        };

        (status, message).into_response()
    }
}
