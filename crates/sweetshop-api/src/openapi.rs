//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::Role;
use crate::error::ApiErrorResponse;
use crate::repository::{NewSweet, SweetRecord, UpdateSweet};
use crate::routes::{
    ComponentHealth, ComponentStatus, HealthResponse, LoginRequest, MessageResponse,
    QuantityRequest, RegisterRequest, TokenResponse,
};

/// Sweet Shop API 문서.
///
/// 모든 엔드포인트와 스키마를 포함하는 OpenAPI 3.0 스펙입니다.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sweet Shop API",
        version = "0.1.0",
        description = r#"
# Sweet Shop 재고 관리 REST API

사용자 인증과 상품 카탈로그 재고 관리를 위한 REST API입니다.

## 주요 기능

- **인증**: 회원 가입 / 로그인 (JWT 발급)
- **카탈로그**: 상품 CRUD 및 이름/카테고리/가격 검색
- **재고**: 구매(차감) / 재입고(증가), 재고는 음수가 되지 않음

## 인증

쓰기 엔드포인트는 JWT Bearer 토큰 인증이 필요합니다.
`Authorization: Bearer <token>` 헤더를 포함하세요.
생성/수정/삭제/재입고는 admin 역할이 필요합니다.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
        contact(name = "Sweet Shop Team")
    ),
    servers(
        (url = "http://localhost:3000", description = "로컬 개발 서버"),
    ),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "auth", description = "인증 - 회원 가입 및 로그인"),
        (name = "sweets", description = "상품 - 카탈로그 CRUD, 검색, 재고 관리")
    ),
    components(
        schemas(
            // ===== Health =====
            HealthResponse,
            ComponentHealth,
            ComponentStatus,

            // ===== Common =====
            ApiErrorResponse,
            MessageResponse,

            // ===== Auth =====
            RegisterRequest,
            LoginRequest,
            TokenResponse,
            Role,

            // ===== Sweets =====
            SweetRecord,
            NewSweet,
            UpdateSweet,
            QuantityRequest,
        )
    ),
    paths(
        crate::routes::health::health_check,
        crate::routes::health::health_ready,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::sweets::create_sweet,
        crate::routes::sweets::list_sweets,
        crate::routes::sweets::search_sweets,
        crate::routes::sweets::update_sweet,
        crate::routes::sweets::delete_sweet,
        crate::routes::sweets::purchase_sweet,
        crate::routes::sweets::restock_sweet,
    )
)]
pub struct ApiDoc;

/// Swagger UI 라우터 생성.
///
/// 다음 경로에 문서 UI를 마운트합니다:
/// - `/swagger-ui` - Swagger UI 대화형 문서
/// - `/api-docs/openapi.json` - OpenAPI JSON 스펙
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}
