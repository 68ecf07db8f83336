use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::{
    client::ClientError,
    export::ExportError,
    response::{ApiResponse, Meta},
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("Unauthorized {0}")]
    Unauthorized(String),

    #[error("Forbidden")]
    Forbidden,

    /// A newer request for the same view started before this one finished.
    #[error("Superseded by a newer request")]
    Superseded,

    #[error(transparent)]
    Upstream(#[from] ClientError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Superseded => StatusCode::CONFLICT,
            AppError::Upstream(ClientError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Upstream(ClientError::Rejected { status, .. }) => match status.as_u16() {
                400 | 403 | 409 | 422 => *status,
                401 => StatusCode::UNAUTHORIZED,
                _ => StatusCode::BAD_GATEWAY,
            },
            AppError::Upstream(ClientError::Transport(err)) if err.is_timeout() => {
                StatusCode::GATEWAY_TIMEOUT
            }
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = ApiResponse {
            message: status
                .canonical_reason()
                .unwrap_or("Error")
                .to_string(),
            data: Some(ErrorData {
                error: self.to_string(),
            }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_not_found_maps_to_404() {
        let err = AppError::from(ClientError::NotFound("/orders/9".into()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn upstream_server_error_maps_to_bad_gateway() {
        let err = AppError::from(ClientError::Rejected {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".into(),
        });
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn upstream_conflict_is_forwarded() {
        let err = AppError::from(ClientError::Rejected {
            status: StatusCode::CONFLICT,
            body: "already approved".into(),
        });
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn malformed_payload_maps_to_bad_gateway() {
        let json_err = serde_json::from_str::<i64>("{").unwrap_err();
        let err = AppError::from(ClientError::Malformed(json_err));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn upstream_body_is_not_echoed() {
        let err = AppError::from(ClientError::Rejected {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "<html>java.lang.NullPointerException</html>".into(),
        });
        let message = err.to_string();
        assert!(message.contains("500"));
        assert!(!message.contains("NullPointerException"));
    }
}
