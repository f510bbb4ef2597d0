//! 인증.
//!
//! 무상태 JWT 기반 인증을 제공합니다.
//!
//! # 구성 요소
//!
//! - [`PasswordService`]: Argon2id 비밀번호 해싱/검증
//! - [`JwtKeys`]: HS256 토큰 발급/검증
//! - [`require_auth`]: 보호된 라우트의 인증 게이트 미들웨어
//! - [`CurrentUser`]: 인증된 사용자 추출기
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! async fn protected_handler(CurrentUser(user): CurrentUser) -> impl IntoResponse {
//!     format!("Hello, {}!", user.username)
//! }
//! ```

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, JwtError, JwtKeys, TOKEN_ALGORITHM};
pub use middleware::{bearer_token, require_auth, AuthRejection, CurrentUser, Identity};
pub use password::{PasswordError, PasswordService};
