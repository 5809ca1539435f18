//! User Repository
//!
//! 사용자 테이블 관련 데이터베이스 연산을 담당합니다.
//! 사용자는 가입 이후 수정/삭제되지 않습니다.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::auth::Role;

// ================================================================================================
// Types
// ================================================================================================

/// 사용자 레코드.
///
/// `password_hash`는 직렬화 대상에서 제외되어 응답에 노출되지 않습니다.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// 새 사용자 입력.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
}

// ================================================================================================
// Repository
// ================================================================================================

/// User Repository
pub struct UserRepository;

impl UserRepository {
    /// 사용자 생성.
    ///
    /// username 고유 제약 위반 시 `sqlx::Error::Database`가 반환되며,
    /// 호출자는 [`is_unique_violation`]으로 중복 여부를 판별합니다.
    pub async fn insert(pool: &PgPool, input: NewUser) -> Result<UserRecord, sqlx::Error> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (username, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&input.username)
        .bind(&input.password_hash)
        .bind(input.role)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// 사용자 이름으로 조회 (대소문자 구분).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<UserRecord>, sqlx::Error> {
        let record =
            sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE username = $1")
                .bind(username)
                .fetch_optional(pool)
                .await?;

        Ok(record)
    }
}

/// 고유 제약 위반(PostgreSQL 23505) 여부 판별.
///
/// 사전 중복 확인과 INSERT 사이의 레이스에서도 중복 가입을
/// `Conflict`로 일관되게 보고하기 위해 사용합니다.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505")
    )
}
