//! # Sweetshop Core
//!
//! 스위트샵 백엔드의 핵심 도메인 규칙 및 타입을 제공합니다.
//!
//! 이 크레이트는 I/O 없이 순수하게 테스트 가능한 부분만 포함합니다:
//! - 에러 타입 정의
//! - 재고 및 상품 속성 검증 규칙
//! - 설정 타입
//! - 로깅 인프라

pub mod config;
pub mod error;
pub mod logging;
pub mod validation;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use validation::*;
