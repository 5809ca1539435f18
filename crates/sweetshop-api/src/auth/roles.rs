//! 역할 기반 접근 제어 (RBAC).
//!
//! 사용자 역할 정의. 시스템에는 두 가지 역할만 존재하며
//! 그 외의 값은 저장되지 않습니다.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 사용자 역할.
///
/// 시스템에서 사용자의 권한 수준을 정의합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum Role {
    /// 관리자 - 카탈로그 생성/수정/삭제/재입고 권한 보유
    Admin,
    /// 일반 사용자 - 조회 및 구매 권한
    User,
}

impl Role {
    /// 관리자 여부 확인.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// 문자열에서 역할 파싱.
    ///
    /// "user", "admin" 외의 값은 None을 반환합니다.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "user" => Some(Role::User),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Admin => "admin",
            Role::User => "user",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("user"), Some(Role::User));
        assert_eq!(Role::parse("superadmin"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn test_is_admin() {
        assert!(Role::Admin.is_admin());
        assert!(!Role::User.is_admin());
    }

    #[test]
    fn test_role_serialization() {
        let role = Role::Admin;
        let json = serde_json::to_string(&role).unwrap();
        assert_eq!(json, "\"admin\"");

        let parsed: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(parsed, Role::User);

        // 허용되지 않는 역할은 역직렬화 실패
        assert!(serde_json::from_str::<Role>("\"superadmin\"").is_err());
    }
}
