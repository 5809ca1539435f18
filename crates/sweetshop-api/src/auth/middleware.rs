//! Axum용 JWT 인증 미들웨어.
//!
//! 요청별 인증 상태 전이는 추출기 체인으로 표현됩니다:
//! 자격 증명 없음 → 토큰 제시([`JwtAuth`]) → 사용자 확인([`CurrentUser`])
//! → 관리자 게이트([`AdminUser`]).
//!
//! [`CurrentUser`]는 토큰에 포함된 사용자 이름으로 매 요청마다
//! 사용자 레코드를 다시 조회합니다. 세션 캐시는 없으며,
//! 삭제된 사용자의 기존 토큰은 조회 실패로 자연히 무효화됩니다.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::{decode_token, Claims};
use crate::error::ApiErrorResponse;
use crate::repository::{UserRecord, UserRepository};
use crate::state::AppState;

/// JWT 인증 에러.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("인증 토큰이 필요합니다")]
    MissingToken,
    #[error("잘못된 Authorization 헤더 형식")]
    InvalidAuthHeader,
    #[error("토큰이 만료되었습니다")]
    TokenExpired,
    #[error("유효하지 않은 토큰")]
    InvalidToken,
    #[error("관리자 권한이 필요합니다")]
    AdminRequired,
    #[error("사용자 조회 실패: {0}")]
    Database(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "MISSING_TOKEN"),
            AuthError::InvalidAuthHeader => (StatusCode::UNAUTHORIZED, "INVALID_AUTH_HEADER"),
            AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
            AuthError::AdminRequired => (StatusCode::FORBIDDEN, "ADMIN_REQUIRED"),
            AuthError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let message = if status.is_server_error() {
            tracing::error!(error = %self, "Auth middleware internal error");
            "서버 내부 오류가 발생했습니다".to_string()
        } else {
            self.to_string()
        };

        (status, Json(ApiErrorResponse::new(code, message))).into_response()
    }
}

/// JWT 인증 추출기.
///
/// Authorization 헤더의 Bearer 토큰을 검증하고 Claims를 추출합니다.
/// DB 조회는 하지 않습니다.
#[derive(Debug, Clone)]
pub struct JwtAuth(pub Claims);

impl FromRequestParts<Arc<AppState>> for JwtAuth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        // Authorization 헤더에서 토큰 추출
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        // Bearer 토큰 형식 확인
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidAuthHeader)?;

        // 토큰 검증 (서명 + 만료)
        let token_data =
            decode_token(token, &state.config.auth.jwt_secret).map_err(|e| match e {
                super::jwt::JwtError::TokenExpired => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })?;

        Ok(JwtAuth(token_data.claims))
    }
}

/// 선택적 JWT 인증 추출기.
///
/// 토큰이 있으면 검증하고, 없거나 무효하면 None을 반환합니다.
/// 카탈로그 공개 여부 설정에 따라 분기하는 핸들러에서 사용합니다.
#[derive(Debug, Clone)]
pub struct OptionalJwtAuth(pub Option<Claims>);

impl FromRequestParts<Arc<AppState>> for OptionalJwtAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match JwtAuth::from_request_parts(parts, state).await {
            Ok(JwtAuth(claims)) => Ok(OptionalJwtAuth(Some(claims))),
            Err(_) => Ok(OptionalJwtAuth(None)),
        }
    }
}

/// 인증된 사용자 추출기.
///
/// 토큰 검증 후 토큰의 사용자 이름으로 users 테이블을 조회합니다.
/// 사용자가 존재하지 않으면 무효 토큰과 동일하게 401로 거부됩니다.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserRecord);

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let JwtAuth(claims) = JwtAuth::from_request_parts(parts, state).await?;

        let user = UserRepository::find_by_username(&state.db_pool, &claims.sub)
            .await
            .map_err(|e| AuthError::Database(e.to_string()))?
            .ok_or(AuthError::InvalidToken)?;

        Ok(CurrentUser(user))
    }
}

/// 관리자 권한을 요구하는 추출기.
///
/// 인증 후 역할이 admin이 아니면 403으로 거부됩니다.
#[derive(Debug, Clone)]
pub struct AdminUser(pub UserRecord);

impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        require_admin(&user)?;
        Ok(AdminUser(user))
    }
}

/// 관리자 역할 확인.
pub fn require_admin(user: &UserRecord) -> Result<(), AuthError> {
    if user.role.is_admin() {
        Ok(())
    } else {
        Err(AuthError::AdminRequired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use chrono::Utc;
    use uuid::Uuid;

    fn make_user(role: Role) -> UserRecord {
        UserRecord {
            id: Uuid::new_v4(),
            username: "tester".to_string(),
            password_hash: "hash".to_string(),
            role,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&make_user(Role::Admin)).is_ok());
        assert!(matches!(
            require_admin(&make_user(Role::User)),
            Err(AuthError::AdminRequired)
        ));
    }

    #[test]
    fn test_auth_error_status_codes() {
        let unauthorized = [
            AuthError::MissingToken,
            AuthError::InvalidAuthHeader,
            AuthError::TokenExpired,
            AuthError::InvalidToken,
        ];
        for error in unauthorized {
            assert_eq!(error.into_response().status(), StatusCode::UNAUTHORIZED);
        }

        assert_eq!(
            AuthError::AdminRequired.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthError::Database("x".to_string()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
