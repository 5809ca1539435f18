//! 인증 및 권한 부여.
//!
//! JWT 기반 인증 및 역할 기반 접근 제어(RBAC)를 제공합니다.
//!
//! # 구성 요소
//!
//! - [`Claims`]: JWT 페이로드 구조체
//! - [`Role`]: 사용자 역할 (Admin, User)
//! - [`JwtAuth`] / [`CurrentUser`] / [`AdminUser`]: Axum 인증 추출기
//! - 비밀번호 해싱/검증 및 토큰 생성/검증 함수
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! // 관리자 전용 라우트에서 AdminUser 추출기 사용
//! async fn admin_handler(
//!     AdminUser(user): AdminUser,
//! ) -> impl IntoResponse {
//!     format!("Hello, {}!", user.username)
//! }
//! ```

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod roles;

pub use jwt::{create_token, decode_token, Claims, JwtError};
pub use middleware::{
    require_admin, AdminUser, AuthError, CurrentUser, JwtAuth, OptionalJwtAuth,
};
pub use password::{hash_password, verify_password, PasswordError};
pub use roles::Role;
