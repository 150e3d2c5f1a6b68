use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use area_tutor_algo::TutorError;

#[derive(Debug, Serialize)]
pub struct SuccessResponse<T> {
    pub success: bool,
    pub data: T,
}

pub fn ok<T: Serialize>(data: T) -> Json<SuccessResponse<T>> {
    Json(SuccessResponse {
        success: true,
        data,
    })
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: String,
}

#[derive(Debug, Clone)]
pub struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
    is_operational: bool,
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::CONFLICT, "CONFLICT", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::BAD_REQUEST, "INVALID_INPUT", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL_ERROR",
            message: message.into(),
            is_operational: false,
        }
    }

    pub fn session_not_found() -> Self {
        Self::not_found("session not found or expired")
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    fn operational(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            is_operational: true,
        }
    }
}

impl From<TutorError> for AppError {
    fn from(err: TutorError) -> Self {
        match err {
            TutorError::InvalidInput(_) => Self::invalid_input(err.to_string()),
            TutorError::InvalidHintLevel(_) => {
                Self::operational(StatusCode::BAD_REQUEST, "INVALID_HINT_LEVEL", err.to_string())
            }
            TutorError::AlreadyAnswered => Self::conflict(err.to_string()),
            TutorError::InvalidProblem(_) => Self::internal(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if !self.is_operational {
            tracing::error!(code = self.code, error = %self.message, "request failed");
        }
        let message = if self.is_operational {
            self.message
        } else {
            "internal server error".to_string()
        };

        let body = ErrorResponse {
            success: false,
            error: message,
            code: self.code.to_string(),
        };

        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tutor_error_mapping() {
        let err = AppError::from(TutorError::InvalidInput("x".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "INVALID_INPUT");

        let err = AppError::from(TutorError::InvalidHintLevel(7));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "INVALID_HINT_LEVEL");

        let err = AppError::from(TutorError::AlreadyAnswered);
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let err = AppError::from(TutorError::InvalidProblem("bad".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_message_hidden() {
        let response = AppError::internal("secret detail").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
