//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정 타입을 정의합니다.
//! 환경 변수에서의 로드는 API 크레이트의 부트스트랩 코드가 담당합니다.

use serde::{Deserialize, Serialize};

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 데이터베이스 설정
    pub database: DatabaseConfig,
    /// 인증 설정
    pub auth: AuthConfig,
    /// 카탈로그 노출 설정
    pub catalog: CatalogConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// `host:port` 형식의 소켓 주소 문자열 반환.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 데이터베이스 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 획득 타임아웃 (초)
    pub acquire_timeout_secs: u64,
    /// 유휴 타임아웃 (초)
    pub idle_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout_secs: 10,
            idle_timeout_secs: 300,
        }
    }
}

/// 인증 설정.
///
/// JWT 서명 비밀 키와 토큰 수명을 관리합니다.
/// 비밀 키는 하드코딩하지 않고 설정에서 주입받으며,
/// 키 교체 시 기존 토큰은 서명 불일치로 전부 무효화됩니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT 서명 비밀 키
    pub jwt_secret: String,
    /// Access Token 만료 시간 (분)
    pub token_expires_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "dev-secret-key-change-in-production".to_string(),
            token_expires_minutes: 60,
        }
    }
}

/// 카탈로그 노출 설정.
///
/// 목록 조회와 검색의 인증 요구 여부를 하나의 플래그로 일관되게 제어합니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// true면 목록/검색을 비인증 호출자에게 공개
    pub public_read: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self { public_read: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.auth.token_expires_minutes, 60);
        assert!(config.catalog.public_read);
    }

    #[test]
    fn test_server_addr() {
        let server = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
        };
        assert_eq!(server.addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.server.host, config.server.host);
        assert_eq!(parsed.auth.jwt_secret, config.auth.jwt_secret);
    }
}
