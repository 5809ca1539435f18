//! 상품 카탈로그 라우트.
//!
//! 상품 CRUD, 검색, 구매/재입고 엔드포인트를 제공합니다.
//!
//! # 권한 모델
//!
//! - 생성/수정/삭제/재입고: 관리자 전용 ([`AdminUser`])
//! - 구매: 인증된 사용자 ([`CurrentUser`])
//! - 목록/검색: `CATALOG_PUBLIC` 설정에 따라 공개 또는 인증 필요
//!
//! # 재고 검증 순서
//!
//! 구매는 존재 확인 → 수량 양수 검증 → 재고 충분성 순서로 실패합니다.
//! 이 순서는 고정이며 테스트로 보장됩니다.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use sweetshop_core::validation::{
    check_purchase, validate_mutation_amount, validate_price, validate_quantity,
};

use crate::auth::{AdminUser, CurrentUser, OptionalJwtAuth};
use crate::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::repository::{
    NewSweet, PurchaseOutcome, SweetRecord, SweetRepository, SweetSearchFilter, UpdateSweet,
};
use crate::routes::MessageResponse;
use crate::state::AppState;

// ================================================================================================
// Request Types
// ================================================================================================

/// 구매/재입고 수량 요청.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct QuantityRequest {
    /// 변동 수량 (양수)
    pub quantity: i64,
}

// ================================================================================================
// Helpers
// ================================================================================================

/// 카탈로그 읽기 접근 확인.
///
/// 카탈로그가 비공개로 설정된 경우 유효한 토큰이 있어야 합니다.
/// 목록과 검색에 동일하게 적용됩니다.
fn check_catalog_access(state: &AppState, auth: &OptionalJwtAuth) -> Result<(), ApiError> {
    if state.config.catalog.public_read || auth.0.is_some() {
        Ok(())
    } else {
        Err(ApiError::Unauthorized(
            "카탈로그 조회에는 로그인이 필요합니다".to_string(),
        ))
    }
}

fn validate_new_sweet(input: &NewSweet) -> Result<(), ApiError> {
    if input.name.trim().is_empty() {
        return Err(ApiError::InvalidInput(
            "상품 이름은 비워둘 수 없습니다".to_string(),
        ));
    }
    if input.category.trim().is_empty() {
        return Err(ApiError::InvalidInput(
            "카테고리는 비워둘 수 없습니다".to_string(),
        ));
    }
    validate_price(input.price)?;
    validate_quantity(input.quantity)?;
    Ok(())
}

fn validate_update_sweet(input: &UpdateSweet) -> Result<(), ApiError> {
    if let Some(ref name) = input.name {
        if name.trim().is_empty() {
            return Err(ApiError::InvalidInput(
                "상품 이름은 비워둘 수 없습니다".to_string(),
            ));
        }
    }
    if let Some(price) = input.price {
        validate_price(price)?;
    }
    if let Some(quantity) = input.quantity {
        validate_quantity(quantity)?;
    }
    Ok(())
}

// ================================================================================================
// Handlers
// ================================================================================================

/// 상품 생성 (관리자 전용).
///
/// POST /api/sweets
#[utoipa::path(
    post,
    path = "/api/sweets",
    request_body = NewSweet,
    responses(
        (status = 201, description = "생성 성공", body = MessageResponse),
        (status = 400, description = "검증 실패", body = ApiErrorResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 403, description = "관리자 권한 필요", body = ApiErrorResponse)
    ),
    tag = "sweets"
)]
pub async fn create_sweet(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Json(input): Json<NewSweet>,
) -> ApiResult<impl IntoResponse> {
    validate_new_sweet(&input)?;

    let record = SweetRepository::insert(&state.db_pool, input).await?;
    info!(sweet_id = %record.id, name = %record.name, admin = %admin.username, "Sweet created");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "상품이 등록되었습니다".to_string(),
        }),
    ))
}

/// 전체 상품 목록 조회.
///
/// GET /api/sweets
#[utoipa::path(
    get,
    path = "/api/sweets",
    responses(
        (status = 200, description = "상품 목록", body = [SweetRecord]),
        (status = 401, description = "비공개 카탈로그 - 인증 필요", body = ApiErrorResponse)
    ),
    tag = "sweets"
)]
pub async fn list_sweets(
    State(state): State<Arc<AppState>>,
    auth: OptionalJwtAuth,
) -> ApiResult<Json<Vec<SweetRecord>>> {
    check_catalog_access(&state, &auth)?;

    let records = SweetRepository::list_all(&state.db_pool).await?;
    Ok(Json(records))
}

/// 상품 검색.
///
/// GET /api/sweets/search
#[utoipa::path(
    get,
    path = "/api/sweets/search",
    params(SweetSearchFilter),
    responses(
        (status = 200, description = "검색 결과", body = [SweetRecord]),
        (status = 401, description = "비공개 카탈로그 - 인증 필요", body = ApiErrorResponse)
    ),
    tag = "sweets"
)]
pub async fn search_sweets(
    State(state): State<Arc<AppState>>,
    auth: OptionalJwtAuth,
    Query(filter): Query<SweetSearchFilter>,
) -> ApiResult<Json<Vec<SweetRecord>>> {
    check_catalog_access(&state, &auth)?;

    // 가격 범위는 독립적인 AND 필터로 그대로 적용됩니다.
    // min > max 같은 조합도 거부하지 않으며, 그냥 빈 결과가 됩니다.
    let records = SweetRepository::search(&state.db_pool, &filter).await?;
    Ok(Json(records))
}

/// 상품 부분 수정 (관리자 전용).
///
/// PUT /api/sweets/{id}
#[utoipa::path(
    put,
    path = "/api/sweets/{id}",
    params(("id" = Uuid, Path, description = "상품 ID")),
    request_body = UpdateSweet,
    responses(
        (status = 200, description = "수정 성공", body = MessageResponse),
        (status = 400, description = "검증 실패", body = ApiErrorResponse),
        (status = 404, description = "상품 없음", body = ApiErrorResponse)
    ),
    tag = "sweets"
)]
pub async fn update_sweet(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateSweet>,
) -> ApiResult<Json<MessageResponse>> {
    validate_update_sweet(&input)?;

    let record = SweetRepository::update(&state.db_pool, id, input)
        .await?
        .ok_or_else(|| ApiError::NotFound("해당 상품을 찾을 수 없습니다".to_string()))?;

    info!(sweet_id = %record.id, admin = %admin.username, "Sweet updated");
    Ok(Json(MessageResponse {
        message: "상품이 수정되었습니다".to_string(),
    }))
}

/// 상품 삭제 (관리자 전용).
///
/// DELETE /api/sweets/{id}
#[utoipa::path(
    delete,
    path = "/api/sweets/{id}",
    params(("id" = Uuid, Path, description = "상품 ID")),
    responses(
        (status = 200, description = "삭제 성공", body = MessageResponse),
        (status = 404, description = "상품 없음", body = ApiErrorResponse)
    ),
    tag = "sweets"
)]
pub async fn delete_sweet(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let deleted = SweetRepository::delete(&state.db_pool, id).await?;
    if !deleted {
        return Err(ApiError::NotFound(
            "해당 상품을 찾을 수 없습니다".to_string(),
        ));
    }

    info!(sweet_id = %id, admin = %admin.username, "Sweet deleted");
    Ok(Json(MessageResponse {
        message: "상품이 삭제되었습니다".to_string(),
    }))
}

/// 상품 구매 (인증 필요).
///
/// 존재 확인 → 수량 양수 검증 → 재고 충분성 순서로 검증하며,
/// 실제 차감은 단일 조건부 UPDATE로 원자적으로 수행됩니다.
///
/// POST /api/sweets/{id}/purchase
#[utoipa::path(
    post,
    path = "/api/sweets/{id}/purchase",
    params(("id" = Uuid, Path, description = "상품 ID")),
    request_body = QuantityRequest,
    responses(
        (status = 200, description = "구매 성공", body = MessageResponse),
        (status = 400, description = "수량 오류 또는 재고 부족", body = ApiErrorResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse),
        (status = 404, description = "상품 없음", body = ApiErrorResponse)
    ),
    tag = "sweets"
)]
pub async fn purchase_sweet(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<QuantityRequest>,
) -> ApiResult<Json<MessageResponse>> {
    // 1. 존재 확인
    let sweet = SweetRepository::find_by_id(&state.db_pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("해당 상품을 찾을 수 없습니다".to_string()))?;

    // 2. 수량 양수 → 재고 충분성 순서로 검증
    check_purchase(sweet.quantity, request.quantity)?;

    // 3. 원자적 차감 (경쟁 요청에 대한 재고 충분성은 UPDATE 조건이 다시 보장)
    match SweetRepository::purchase(&state.db_pool, id, request.quantity).await? {
        PurchaseOutcome::Purchased(record) => {
            info!(
                sweet_id = %record.id,
                username = %user.username,
                amount = request.quantity,
                remaining = record.quantity,
                "Sweet purchased"
            );
            Ok(Json(MessageResponse {
                message: "구매가 완료되었습니다".to_string(),
            }))
        }
        // 확인과 차감 사이에 삭제된 경우
        PurchaseOutcome::NotFound => Err(ApiError::NotFound(
            "해당 상품을 찾을 수 없습니다".to_string(),
        )),
        PurchaseOutcome::InsufficientStock { available } => Err(ApiError::InsufficientStock(
            format!("재고가 부족합니다 (현재 재고: {available})"),
        )),
    }
}

/// 상품 재입고 (관리자 전용).
///
/// POST /api/sweets/{id}/restock
#[utoipa::path(
    post,
    path = "/api/sweets/{id}/restock",
    params(("id" = Uuid, Path, description = "상품 ID")),
    request_body = QuantityRequest,
    responses(
        (status = 200, description = "재입고 성공, 갱신된 상품 반환", body = SweetRecord),
        (status = 400, description = "수량 오류", body = ApiErrorResponse),
        (status = 403, description = "관리자 권한 필요", body = ApiErrorResponse),
        (status = 404, description = "상품 없음", body = ApiErrorResponse)
    ),
    tag = "sweets"
)]
pub async fn restock_sweet(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(request): Json<QuantityRequest>,
) -> ApiResult<Json<SweetRecord>> {
    SweetRepository::find_by_id(&state.db_pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("해당 상품을 찾을 수 없습니다".to_string()))?;

    validate_mutation_amount(request.quantity)?;

    let record = SweetRepository::restock(&state.db_pool, id, request.quantity)
        .await?
        .ok_or_else(|| ApiError::NotFound("해당 상품을 찾을 수 없습니다".to_string()))?;

    info!(
        sweet_id = %record.id,
        admin = %admin.username,
        amount = request.quantity,
        quantity = record.quantity,
        "Sweet restocked"
    );

    Ok(Json(record))
}

/// 상품 라우터 생성.
pub fn sweets_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_sweet).get(list_sweets))
        .route("/search", get(search_sweets))
        .route(
            "/{id}",
            axum::routing::put(update_sweet).delete(delete_sweet),
        )
        .route("/{id}/purchase", post(purchase_sweet))
        .route("/{id}/restock", post(restock_sweet))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::create_test_state;
    use axum::{
        body::Body,
        http::{header, Method, Request},
    };
    use rust_decimal_macros::dec;
    use tower::ServiceExt;

    fn test_app() -> Router {
        Router::new()
            .nest("/api/sweets", sweets_router())
            .with_state(Arc::new(create_test_state()))
    }

    async fn send(
        app: Router,
        method: Method,
        uri: &str,
        body: Option<&str>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        app.oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_sweet_requires_auth() {
        let response = send(
            test_app(),
            Method::POST,
            "/api/sweets",
            Some(r#"{"name": "Ladoo", "category": "indian", "price": "5.0", "quantity": 10}"#),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_purchase_requires_auth() {
        let id = Uuid::new_v4();
        let response = send(
            test_app(),
            Method::POST,
            &format!("/api/sweets/{id}/purchase"),
            Some(r#"{"quantity": 1}"#),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_restock_requires_auth() {
        let id = Uuid::new_v4();
        let response = send(
            test_app(),
            Method::POST,
            &format!("/api/sweets/{id}/restock"),
            Some(r#"{"quantity": 5}"#),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_delete_requires_auth() {
        let id = Uuid::new_v4();
        let response = send(
            test_app(),
            Method::DELETE,
            &format!("/api/sweets/{id}"),
            None,
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_search_min_above_max_is_not_rejected() {
        // 역전된 가격 범위도 필터로 그대로 전달되어 빈 결과가 될 뿐,
        // 입력 오류로 거부되지 않는다
        let response = send(
            test_app(),
            Method::GET,
            "/api/sweets/search?min_price=10&max_price=5",
            None,
        )
        .await;

        assert_ne!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_purchase_check_orders_positivity_before_sufficiency() {
        // 재고가 0이어도 0 이하 요청은 재고 부족이 아닌 잘못된 입력
        let err: ApiError = check_purchase(0, 0).unwrap_err().into();
        assert!(matches!(err, ApiError::InvalidInput(_)));

        let err: ApiError = check_purchase(23, 999).unwrap_err().into();
        assert!(matches!(err, ApiError::InsufficientStock(_)));

        assert!(check_purchase(23, 2).is_ok());
    }

    #[tokio::test]
    async fn test_catalog_access_public_by_default() {
        let state = create_test_state();
        let anonymous = OptionalJwtAuth(None);

        assert!(check_catalog_access(&state, &anonymous).is_ok());
    }

    #[tokio::test]
    async fn test_catalog_access_private_rejects_anonymous() {
        let mut state = create_test_state();
        state.config.catalog.public_read = false;
        let anonymous = OptionalJwtAuth(None);

        let result = check_catalog_access(&state, &anonymous);
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_catalog_access_private_allows_authenticated() {
        use crate::auth::{Claims, Role};

        let mut state = create_test_state();
        state.config.catalog.public_read = false;
        let authenticated = OptionalJwtAuth(Some(Claims::new("alice", Role::User, 60)));

        assert!(check_catalog_access(&state, &authenticated).is_ok());
    }

    #[test]
    fn test_validate_new_sweet_rejects_negative_price() {
        let input = NewSweet {
            name: "Barfi".to_string(),
            category: "indian".to_string(),
            price: dec!(-1.0),
            quantity: 5,
            image_url: None,
        };

        assert!(validate_new_sweet(&input).is_err());
    }

    #[test]
    fn test_validate_new_sweet_rejects_empty_name() {
        let input = NewSweet {
            name: "  ".to_string(),
            category: "indian".to_string(),
            price: dec!(1.0),
            quantity: 5,
            image_url: None,
        };

        assert!(validate_new_sweet(&input).is_err());
    }

    #[test]
    fn test_validate_update_sweet_accepts_partial_input() {
        let input = UpdateSweet {
            price: Some(dec!(3.5)),
            ..Default::default()
        };

        assert!(validate_update_sweet(&input).is_ok());
    }

    #[test]
    fn test_validate_update_sweet_rejects_negative_quantity() {
        let input = UpdateSweet {
            quantity: Some(-3),
            ..Default::default()
        };

        assert!(validate_update_sweet(&input).is_err());
    }
}
