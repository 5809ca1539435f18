//! 인증 라우트.
//!
//! 회원 가입 및 로그인 엔드포인트를 제공합니다.
//!
//! 로그인 실패 시 사용자 이름이 없는 경우와 비밀번호가 틀린 경우를
//! 구분할 수 없도록 동일한 401 응답을 반환합니다 (계정 열거 방지).

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::ToSchema;

use sweetshop_core::validation::{validate_password_strength, validate_username};

use crate::auth::{create_token, hash_password, verify_password, Claims, Role};
use crate::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::repository::{is_unique_violation, NewUser, UserRepository};
use crate::routes::MessageResponse;
use crate::state::AppState;

// ================================================================================================
// Request/Response Types
// ================================================================================================

/// 회원 가입 요청.
///
/// `role`은 의도적으로 enum이 아닌 문자열로 받습니다.
/// 알 수 없는 역할("superadmin" 등)을 역직렬화 단계의 422가 아니라
/// 다른 검증 실패와 동일한 400으로 거부하기 위함입니다.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// 사용자 이름 (고유)
    pub username: String,
    /// 비밀번호 (평문, 최소 8자)
    pub password: String,
    /// 역할 ("user" | "admin"), 생략 시 "user"
    #[serde(default)]
    pub role: Option<String>,
}

/// 로그인 요청.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// 로그인 성공 응답.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// JWT Access Token
    pub access_token: String,
    /// 토큰 유형 (항상 "bearer")
    pub token_type: String,
    /// 로그인한 사용자 이름
    pub username: String,
    /// 사용자 역할
    pub role: Role,
}

// ================================================================================================
// Handlers
// ================================================================================================

/// 회원 가입.
///
/// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "가입 성공", body = MessageResponse),
        (status = 400, description = "검증 실패 또는 중복 사용자 이름", body = ApiErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    validate_username(&request.username)?;
    validate_password_strength(&request.password)?;

    let role = match request.role.as_deref() {
        None | Some("") => Role::User,
        Some(raw) => Role::parse(raw).ok_or_else(|| {
            ApiError::InvalidInput("역할은 'user' 또는 'admin'만 가능합니다".to_string())
        })?,
    };

    // 친절한 에러 메시지를 위한 사전 조회.
    // 경쟁 조건으로 빠져나간 중복은 아래 unique 제약 위반으로 잡습니다.
    if UserRepository::find_by_username(&state.db_pool, &request.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(
            "이미 사용 중인 사용자 이름입니다".to_string(),
        ));
    }

    let password_hash = hash_password(&request.password)
        .map_err(|e| ApiError::Internal(format!("비밀번호 해싱 실패: {e}")))?;

    let new_user = NewUser {
        username: request.username.clone(),
        password_hash,
        role,
    };

    match UserRepository::insert(&state.db_pool, new_user).await {
        Ok(user) => {
            info!(username = %user.username, role = %user.role, "New user registered");
            Ok((
                StatusCode::CREATED,
                Json(MessageResponse {
                    message: "회원 가입이 완료되었습니다".to_string(),
                }),
            ))
        }
        Err(e) if is_unique_violation(&e) => Err(ApiError::Conflict(
            "이미 사용 중인 사용자 이름입니다".to_string(),
        )),
        Err(e) => Err(e.into()),
    }
}

/// 로그인.
///
/// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "로그인 성공", body = TokenResponse),
        (status = 401, description = "잘못된 자격 증명", body = ApiErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let invalid_credentials =
        || ApiError::Unauthorized("잘못된 사용자 이름 또는 비밀번호입니다".to_string());

    let user = UserRepository::find_by_username(&state.db_pool, &request.username)
        .await?
        .ok_or_else(invalid_credentials)?;

    if verify_password(&request.password, &user.password_hash).is_err() {
        warn!(username = %request.username, "Login failed: invalid password");
        return Err(invalid_credentials());
    }

    let claims = Claims::new(
        &user.username,
        user.role,
        state.config.auth.token_expires_minutes,
    );
    let token = create_token(&claims, &state.config.auth.jwt_secret)
        .map_err(|e| ApiError::Internal(format!("토큰 생성 실패: {e}")))?;

    info!(username = %user.username, "User logged in");

    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
        username: user.username,
        role: user.role,
    }))
}

/// 인증 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}
