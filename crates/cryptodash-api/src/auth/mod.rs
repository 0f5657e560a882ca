//! 인증.
//!
//! # 구성 요소
//!
//! - [`Claims`]: JWT 페이로드
//! - [`JwtKeys`]: 서명/검증 키와 검증 규칙 (시작 시 설정에서 생성)
//! - [`JwtAuth`]: 보호된 핸들러용 추출기
//! - 비밀번호 해싱/검증 함수
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! async fn protected_handler(auth: JwtAuth) -> impl IntoResponse {
//!     format!("Hello, {}!", auth.claims.name)
//! }
//! ```

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, JwtError, JwtKeys};
pub use middleware::{JwtAuth, JwtAuthError};
pub use password::{hash_password, verify_password, PasswordError};
