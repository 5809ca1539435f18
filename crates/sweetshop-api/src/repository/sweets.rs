//! Sweet Repository
//!
//! 상품 카탈로그 관련 데이터베이스 연산을 담당합니다.
//!
//! 재고 변동(구매/재입고)은 읽기-수정-쓰기를 두 단계로 나누지 않고
//! 단일 조건부 UPDATE 문으로 수행하므로, 동시 구매 요청이 겹쳐도
//! 재고가 음수로 내려가지 않습니다.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

// ================================================================================================
// Types
// ================================================================================================

/// 상품 레코드.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SweetRecord {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub quantity: i64,
    #[sqlx(default)]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 새 상품 입력.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewSweet {
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub quantity: i64,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// 상품 부분 업데이트 입력.
///
/// 제공된 필드만 반영되고 나머지는 기존 값을 유지합니다.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateSweet {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// 상품 검색 필터.
///
/// 모든 필터는 선택적이며 AND로 결합됩니다.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct SweetSearchFilter {
    /// 이름 부분 일치 (대소문자 무시)
    pub name: Option<String>,
    /// 카테고리 정확 일치
    pub category: Option<String>,
    /// 최소 가격 (포함)
    pub min_price: Option<Decimal>,
    /// 최대 가격 (포함)
    pub max_price: Option<Decimal>,
}

/// 구매 시도 결과.
///
/// 조건부 UPDATE가 실패한 경우 존재 여부를 재확인하여
/// `NotFound`와 `InsufficientStock`을 구분합니다.
#[derive(Debug)]
pub enum PurchaseOutcome {
    /// 재고 차감 성공, 갱신된 레코드 반환
    Purchased(SweetRecord),
    /// 해당 id의 상품 없음
    NotFound,
    /// 재고 부족 (현재 재고 수량 포함)
    InsufficientStock { available: i64 },
}

// ================================================================================================
// Repository
// ================================================================================================

/// Sweet Repository
pub struct SweetRepository;

impl SweetRepository {
    /// 상품 생성.
    pub async fn insert(pool: &PgPool, input: NewSweet) -> Result<SweetRecord, sqlx::Error> {
        let record = sqlx::query_as::<_, SweetRecord>(
            r#"
            INSERT INTO sweets (name, category, price, quantity, image_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&input.name)
        .bind(&input.category)
        .bind(input.price)
        .bind(input.quantity)
        .bind(&input.image_url)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// 전체 상품 목록 조회.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<SweetRecord>, sqlx::Error> {
        let records = sqlx::query_as::<_, SweetRecord>(
            "SELECT * FROM sweets ORDER BY created_at, name",
        )
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// 상품 검색.
    ///
    /// 필터가 모두 비어 있으면 전체 목록과 동일한 결과를 반환합니다.
    pub async fn search(
        pool: &PgPool,
        filter: &SweetSearchFilter,
    ) -> Result<Vec<SweetRecord>, sqlx::Error> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM sweets WHERE 1=1");

        Self::add_filter_conditions(&mut builder, filter);

        builder.push(" ORDER BY created_at, name");

        let query = builder.build_query_as::<SweetRecord>();
        let records = query.fetch_all(pool).await?;

        Ok(records)
    }

    /// 동적 WHERE 조건 추가.
    fn add_filter_conditions(builder: &mut QueryBuilder<Postgres>, filter: &SweetSearchFilter) {
        if let Some(ref name) = filter.name {
            builder.push(" AND name ILIKE ");
            builder.push_bind(format!("%{}%", name));
        }

        if let Some(ref category) = filter.category {
            builder.push(" AND category = ");
            builder.push_bind(category.clone());
        }

        if let Some(min_price) = filter.min_price {
            builder.push(" AND price >= ");
            builder.push_bind(min_price);
        }

        if let Some(max_price) = filter.max_price {
            builder.push(" AND price <= ");
            builder.push_bind(max_price);
        }
    }

    /// id로 상품 조회.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<SweetRecord>, sqlx::Error> {
        let record = sqlx::query_as::<_, SweetRecord>("SELECT * FROM sweets WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(record)
    }

    /// 상품 부분 업데이트.
    ///
    /// 제공된 필드만 COALESCE로 반영합니다. id가 없으면 None 반환.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        input: UpdateSweet,
    ) -> Result<Option<SweetRecord>, sqlx::Error> {
        let record = sqlx::query_as::<_, SweetRecord>(
            r#"
            UPDATE sweets
            SET
                name = COALESCE($2, name),
                category = COALESCE($3, category),
                price = COALESCE($4, price),
                quantity = COALESCE($5, quantity),
                image_url = COALESCE($6, image_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.category)
        .bind(input.price)
        .bind(input.quantity)
        .bind(&input.image_url)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// 상품 영구 삭제.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sweets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 재고 차감 (구매).
    ///
    /// `quantity >= amount` 조건이 포함된 단일 UPDATE로 원자적으로 차감합니다.
    /// 마지막 재고를 두고 경쟁하는 요청 중 최대 하나만 성공합니다.
    /// 수량 양수 검증은 호출 전에 끝나 있어야 합니다.
    pub async fn purchase(
        pool: &PgPool,
        id: Uuid,
        amount: i64,
    ) -> Result<PurchaseOutcome, sqlx::Error> {
        let updated = sqlx::query_as::<_, SweetRecord>(
            r#"
            UPDATE sweets
            SET quantity = quantity - $2, updated_at = NOW()
            WHERE id = $1 AND quantity >= $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(amount)
        .fetch_optional(pool)
        .await?;

        if let Some(record) = updated {
            return Ok(PurchaseOutcome::Purchased(record));
        }

        // 차감 실패: 상품이 없는 것인지 재고가 부족한 것인지 구분
        match Self::find_by_id(pool, id).await? {
            None => Ok(PurchaseOutcome::NotFound),
            Some(record) => Ok(PurchaseOutcome::InsufficientStock {
                available: record.quantity,
            }),
        }
    }

    /// 재고 추가 (재입고).
    ///
    /// 단일 UPDATE로 원자적으로 증가시키고 갱신된 레코드를 반환합니다.
    /// id가 없으면 None 반환.
    pub async fn restock(
        pool: &PgPool,
        id: Uuid,
        amount: i64,
    ) -> Result<Option<SweetRecord>, sqlx::Error> {
        let record = sqlx::query_as::<_, SweetRecord>(
            r#"
            UPDATE sweets
            SET quantity = quantity + $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(amount)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn build_search_sql(filter: &SweetSearchFilter) -> String {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM sweets WHERE 1=1");
        SweetRepository::add_filter_conditions(&mut builder, filter);
        builder.sql().to_string()
    }

    #[test]
    fn test_empty_filter_builds_plain_query() {
        let sql = build_search_sql(&SweetSearchFilter::default());
        assert_eq!(sql, "SELECT * FROM sweets WHERE 1=1");
    }

    #[test]
    fn test_name_filter_uses_ilike() {
        let filter = SweetSearchFilter {
            name: Some("gulab".to_string()),
            ..Default::default()
        };
        let sql = build_search_sql(&filter);
        assert!(sql.contains("name ILIKE"));
    }

    #[test]
    fn test_all_filters_combined_with_and() {
        let filter = SweetSearchFilter {
            name: Some("jamun".to_string()),
            category: Some("indian".to_string()),
            min_price: Some(dec!(1.0)),
            max_price: Some(dec!(20.0)),
        };
        let sql = build_search_sql(&filter);
        assert!(sql.contains("name ILIKE"));
        assert!(sql.contains("category ="));
        assert!(sql.contains("price >="));
        assert!(sql.contains("price <="));
    }

    #[test]
    fn test_partial_update_deserializes_missing_fields_as_none() {
        let input: UpdateSweet = serde_json::from_str(r#"{"price": "12.5"}"#).unwrap();
        assert_eq!(input.price, Some(dec!(12.5)));
        assert!(input.name.is_none());
        assert!(input.quantity.is_none());
        assert!(input.image_url.is_none());
    }

    #[test]
    fn test_new_sweet_image_url_optional() {
        let input: NewSweet = serde_json::from_str(
            r#"{"name": "Gulab Jamun", "category": "indian", "price": "10.5", "quantity": 20}"#,
        )
        .unwrap();
        assert_eq!(input.quantity, 20);
        assert!(input.image_url.is_none());
    }
}
