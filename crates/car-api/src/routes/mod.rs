//! API 라우트.
//!
//! 공개 라우트(`/health`, `/user`)와 인증 게이트가 적용된 `/api` 트리로 구성됩니다.

pub mod auth;
pub mod cars;
pub mod health;
pub mod history;
pub mod ratings;

use std::sync::Arc;

use axum::{middleware, Router};

pub use auth::{user_router, CredentialsRequest, MessageResponse};
pub use cars::cars_router;
pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use history::{history_router, HistoryRequest};
pub use ratings::{ratings_router, CreateRatingRequest, UpdateRatingRequest};

use crate::auth::require_auth;
use crate::state::AppState;

/// 전체 API 라우터 생성.
///
/// `/api` 하위의 모든 라우트에 인증 게이트를 적용합니다.
pub fn create_api_router(state: &AppState) -> Router<Arc<AppState>> {
    let protected = Router::new()
        .nest("/cars", cars_router())
        .nest("/carhistory", history_router())
        .nest("/ratings", ratings_router())
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state.jwt),
            require_auth,
        ));

    Router::new()
        // 헬스 체크 엔드포인트
        .nest("/health", health_router())
        // 등록/로그인
        .nest("/user", user_router())
        // 보호된 리소스
        .nest("/api", protected)
}
