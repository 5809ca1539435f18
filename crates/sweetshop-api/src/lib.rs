//! Sweet Shop REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API
//! - JWT 인증 및 역할 기반 접근 제어
//! - PostgreSQL 기반 상품 카탈로그 및 재고 관리
//! - 헬스 체크 엔드포인트
//! - Swagger UI (OpenAPI 3.0)
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`auth`]: JWT 인증 및 권한 관리
//! - [`repository`]: 데이터베이스 접근 계층
//! - [`error`]: 통합 에러 응답 타입
//! - [`openapi`]: OpenAPI 문서 및 Swagger UI

pub mod auth;
pub mod error;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod state;

pub use auth::{
    create_token, decode_token, hash_password, verify_password, AdminUser, AuthError, Claims,
    CurrentUser, JwtAuth, OptionalJwtAuth, Role,
};
pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use openapi::{swagger_ui_router, ApiDoc};
pub use routes::*;
pub use state::AppState;

#[cfg(any(test, feature = "test-utils"))]
pub use state::create_test_state;
