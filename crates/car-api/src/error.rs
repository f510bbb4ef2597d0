//! 통합 API 에러 응답 타입.
//!
//! 모든 API 엔드포인트에서 일관된 에러 형식을 제공합니다.
//!
//! | 상태 | 코드 |
//! |------|------|
//! | 400 | `INVALID_INPUT`, `UNKNOWN_SORT_FIELD` |
//! | 401 | `UNAUTHORIZED` |
//! | 404 | `NOT_FOUND` |
//! | 409 | `CONFLICT` |
//! | 500 | `INTERNAL_ERROR` |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use car_core::PageError;

use crate::auth::{JwtError, PasswordError};
use crate::repository::RepoError;

/// 통합 API 에러 응답.
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "car 42 not found",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "INVALID_INPUT", "NOT_FOUND")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 에러 발생 타임스탬프 (Unix timestamp)
    pub timestamp: i64,
}

impl ApiErrorResponse {
    /// 현재 시각의 타임스탬프로 에러 생성.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

// ==================== ApiError ====================

/// 핸들러 에러.
///
/// 내부 원인은 로그로만 남기고 응답에는 노출하지 않습니다.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    UnknownSortField(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("internal server error")]
    Internal(String),
}

impl ApiError {
    /// HTTP 상태 코드.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::UnknownSortField(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 응답 에러 코드.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "INVALID_INPUT",
            ApiError::UnknownSortField(_) => "UNKNOWN_SORT_FIELD",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal(cause: impl std::fmt::Display) -> Self {
        ApiError::Internal(cause.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(cause) = &self {
            error!(error = %cause, "Request failed with internal error");
        }

        let body = ApiErrorResponse::new(self.code(), self.to_string());
        (self.status(), Json(body)).into_response()
    }
}

impl From<PageError> for ApiError {
    fn from(e: PageError) -> Self {
        match e {
            PageError::UnknownSortField(_) => ApiError::UnknownSortField(e.to_string()),
            PageError::InvalidNumber { .. } => ApiError::BadRequest(e.to_string()),
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(what) => ApiError::NotFound(format!("{} not found", what)),
            RepoError::Conflict(what) => ApiError::Conflict(format!("{} already exists", what)),
            RepoError::MissingReference(_) | RepoError::InvalidValue(_) => {
                ApiError::BadRequest(e.to_string())
            }
            RepoError::Database(_) | RepoError::Corrupt(_) => ApiError::internal(e),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(e: PasswordError) -> Self {
        ApiError::internal(e)
    }
}

impl From<JwtError> for ApiError {
    fn from(e: JwtError) -> Self {
        match e {
            JwtError::EncodingError(_) => ApiError::internal(e),
            _ => ApiError::Unauthorized("invalid token".to_string()),
        }
    }
}

// ==================== Result Type Alias ====================

/// API 핸들러 Result 타입 별칭.
///
/// ```ignore
/// async fn get_car(
///     State(state): State<Arc<AppState>>,
///     Path(id): Path<i64>,
/// ) -> ApiResult<Json<Car>> {
///     Ok(Json(CarRepository::get(&state.db_pool, id).await?))
/// }
/// ```
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_response_new() {
        let error = ApiErrorResponse::new("TEST_ERROR", "Test message");
        assert_eq!(error.code, "TEST_ERROR");
        assert_eq!(error.message, "Test message");
        assert!(error.timestamp > 0);
    }

    #[test]
    fn test_json_shape() {
        let error = ApiErrorResponse::new("NOT_FOUND", "Resource not found");
        let json = serde_json::to_value(&error).unwrap();

        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Resource not found");
        assert!(json["timestamp"].is_i64());
        assert_eq!(json.as_object().unwrap().len(), 3);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::bad_request("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::UnknownSortField("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("x".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::internal("boom").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_cause_hidden() {
        let error = ApiError::internal("connection refused on 10.0.0.5");
        assert_eq!(error.to_string(), "internal server error");
    }

    #[test]
    fn test_page_error_mapping() {
        let error: ApiError = PageError::UnknownSortField("price; DROP".into()).into();
        assert_eq!(error.code(), "UNKNOWN_SORT_FIELD");

        let error: ApiError = PageError::InvalidNumber {
            field: "page",
            value: "abc".into(),
        }
        .into();
        assert_eq!(error.code(), "INVALID_INPUT");
    }

    #[test]
    fn test_repo_error_mapping() {
        let error: ApiError = RepoError::NotFound("car 3".into()).into();
        assert_eq!(error.status(), StatusCode::NOT_FOUND);
        assert_eq!(error.to_string(), "car 3 not found");

        let error: ApiError = RepoError::Conflict("username".into()).into();
        assert_eq!(error.status(), StatusCode::CONFLICT);

        let error: ApiError = RepoError::InvalidValue("service_cost".into()).into();
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.code(), "INVALID_INPUT");
    }
}
