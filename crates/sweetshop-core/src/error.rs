//! 스위트샵 시스템의 에러 타입.
//!
//! 이 모듈은 시스템 전반에서 사용되는 에러 분류를 정의합니다.
//! HTTP 상태 코드 매핑은 API 크레이트에서 담당합니다.

use thiserror::Error;

/// 핵심 스위트샵 에러.
#[derive(Debug, Error)]
pub enum ShopError {
    /// 잘못된 입력 (범위 밖 값, 허용되지 않는 역할 등)
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 인증 실패 (자격 증명 없음/무효)
    #[error("인증 실패: {0}")]
    Unauthorized(String),

    /// 권한 부족 (인증은 되었으나 역할이 부족함)
    #[error("권한 부족: {0}")]
    Forbidden(String),

    /// 대상 엔티티 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 고유 키 중복
    #[error("중복 충돌: {0}")]
    Conflict(String),

    /// 재고 부족 (구매 수량이 현재 재고를 초과)
    #[error("재고 부족: {0}")]
    InsufficientStock(String),

    /// 데이터베이스 에러
    #[error("데이터베이스 에러: {0}")]
    Database(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 스위트샵 작업을 위한 Result 타입.
pub type ShopResult<T> = Result<T, ShopError>;

impl ShopError {
    /// 호출자 잘못으로 발생한 에러인지 확인합니다 (4xx 계열).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ShopError::Database(_) | ShopError::Internal(_))
    }

    /// 응답 본문에 상세 메시지를 노출해도 되는지 확인합니다.
    ///
    /// 서버측 에러는 쿼리문 등 내부 정보가 섞일 수 있으므로
    /// 일반화된 메시지로 대체해야 합니다.
    pub fn is_safe_to_expose(&self) -> bool {
        self.is_client_error()
    }
}
