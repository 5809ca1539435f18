//! 통합 API 에러 응답 타입.
//!
//! 모든 API 엔드포인트에서 일관된 `{code, message}` 형식의 에러를 제공합니다.
//! 서버측 에러(DB 등)는 상세 내용을 로그로만 남기고
//! 응답 본문에는 일반화된 메시지만 노출합니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use sweetshop_core::ShopError;

/// 통합 API 에러 응답 본문.
///
/// # 예시
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "해당 상품을 찾을 수 없습니다"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "INVALID_INPUT", "NOT_FOUND")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
}

impl ApiErrorResponse {
    /// 에러 응답 생성.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// 핸들러에서 사용하는 API 에러.
///
/// `IntoResponse` 구현이 에러 분류를 HTTP 상태 코드로 매핑합니다.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    InsufficientStock(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// 상태 코드와 에러 코드 반환.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Conflict(_) => (StatusCode::BAD_REQUEST, "CONFLICT"),
            ApiError::InsufficientStock(_) => (StatusCode::BAD_REQUEST, "INSUFFICIENT_STOCK"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // 5xx는 상세 내용을 노출하지 않고 로그로만 남김
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "Internal error while handling request");
            "서버 내부 오류가 발생했습니다".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ApiErrorResponse::new(code, message))).into_response()
    }
}

impl From<ShopError> for ApiError {
    fn from(err: ShopError) -> Self {
        match err {
            ShopError::InvalidInput(m) => ApiError::InvalidInput(m),
            ShopError::Unauthorized(m) => ApiError::Unauthorized(m),
            ShopError::Forbidden(m) => ApiError::Forbidden(m),
            ShopError::NotFound(m) => ApiError::NotFound(m),
            ShopError::Conflict(m) => ApiError::Conflict(m),
            ShopError::InsufficientStock(m) => ApiError::InsufficientStock(m),
            ShopError::Database(m) | ShopError::Internal(m) => ApiError::Internal(m),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("x".into()), StatusCode::BAD_REQUEST),
            (
                ApiError::InsufficientStock("x".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let (status, _) = err.status_and_code();
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn test_internal_error_body_is_generic() {
        let err = ApiError::Internal("SELECT * FROM users WHERE ...".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_shop_error_conversion() {
        let api: ApiError = ShopError::InsufficientStock("재고 3".into()).into();
        assert!(matches!(api, ApiError::InsufficientStock(_)));

        let api: ApiError = ShopError::Database("boom".into()).into();
        assert!(matches!(api, ApiError::Internal(_)));
    }

    #[test]
    fn test_error_response_serialization() {
        let body = ApiErrorResponse::new("NOT_FOUND", "없음");
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains(r#""code":"NOT_FOUND""#));
        assert!(json.contains(r#""message":"없음""#));
    }
}
