//! 차량 레지스트리 REST API 서버.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - Axum 기반 REST API (차량, 차량 이력, 평점)
//! - 사용자 등록/로그인 및 JWT 인증 게이트
//! - 페이지네이션 쿼리 빌더
//! - 헬스 체크 엔드포인트
//! - Prometheus 메트릭
//!
//! # 모듈 구성
//!
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`routes`]: REST API 엔드포인트
//! - [`auth`]: 비밀번호 해싱, JWT 발급/검증, 인증 게이트
//! - [`repository`]: PostgreSQL 저장소 및 목록 쿼리 빌더
//! - [`extract`]: 에러 형식을 통일한 요청 추출기
//! - [`metrics`]: Prometheus 메트릭 수집
//! - [`middleware`]: HTTP 미들웨어
//! - [`openapi`]: OpenAPI 문서 및 Swagger UI

pub mod auth;
pub mod error;
pub mod extract;
pub mod metrics;
pub mod middleware;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod state;

pub use auth::{
    bearer_token, require_auth, AuthRejection, Claims, CurrentUser, Identity, JwtError, JwtKeys,
    PasswordError, PasswordService,
};
pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use metrics::setup_metrics_recorder;
pub use middleware::metrics_layer;
pub use openapi::{swagger_ui_router, ApiDoc};
pub use routes::*;
pub use state::AppState;

#[cfg(any(test, feature = "test-utils"))]
pub use state::create_test_state;
