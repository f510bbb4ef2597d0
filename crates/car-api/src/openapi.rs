//! OpenAPI 문서화 설정.
//!
//! utoipa를 사용하여 REST API의 OpenAPI 3.0 스펙을 생성합니다.
//! Swagger UI는 `/swagger-ui` 경로에서 사용 가능합니다.
//!
//! 새로운 엔드포인트를 추가할 때:
//!
//! 1. 응답/요청 타입에 `#[derive(ToSchema)]` 추가
//! 2. 핸들러에 `#[utoipa::path(...)]` 어노테이션 추가
//! 3. 이 파일의 `components(schemas(...))` 및 `paths(...)` 섹션에 추가

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use car_core::{Car, CarHistory, HistoryKind, NewCar, Rating};

// ==================== 각 모듈에서 스키마 Import ====================

use crate::error::ApiErrorResponse;
use crate::routes::{
    ComponentHealth, ComponentStatus, CreateRatingRequest, CredentialsRequest, HealthResponse,
    HistoryRequest, MessageResponse, UpdateRatingRequest,
};

// ==================== OpenAPI 문서 정의 ====================

/// Car Registry API 문서.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Car Registry API",
        version = "0.1.0",
        description = r#"
# Car Registry REST API

차량 정보, 차량 이력(사고/정비), 사용자 평점을 관리하는 REST API입니다.

## 인증

`/api` 아래의 모든 엔드포인트는 JWT Bearer 토큰 인증이 필요합니다.
`POST /user/login`으로 토큰을 발급받아 `Authorization: Bearer <token>` 헤더에 포함하세요.
만료된 토큰은 `POST /user/activate`로 갱신할 수 있습니다.

## 목록 조회

목록 엔드포인트는 `page`, `limit`, `sortBy`, `filterBy` 쿼리 파라미터를 지원합니다.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "로컬 개발 서버"),
    ),
    tags(
        (name = "health", description = "헬스 체크 - 서버 상태 확인"),
        (name = "user", description = "사용자 - 등록, 로그인, 토큰 갱신"),
        (name = "cars", description = "차량 - 차량 정보 CRUD"),
        (name = "carhistory", description = "차량 이력 - 사고/정비 기록"),
        (name = "ratings", description = "평점 - 사용자 차량 평점")
    ),
    modifiers(&SecurityAddon),
    // ==================== 스키마 등록 ====================
    components(
        schemas(
            // ===== Common =====
            ApiErrorResponse,

            // ===== Health =====
            HealthResponse,
            ComponentHealth,
            ComponentStatus,

            // ===== User =====
            CredentialsRequest,
            MessageResponse,

            // ===== Cars =====
            Car,
            NewCar,

            // ===== Car History =====
            CarHistory,
            HistoryKind,
            HistoryRequest,

            // ===== Ratings =====
            Rating,
            CreateRatingRequest,
            UpdateRatingRequest,
        )
    ),
    // ==================== 경로 등록 ====================
    paths(
        // ===== Health =====
        crate::routes::health::health_check,
        crate::routes::health::health_ready,

        // ===== User =====
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::activate,

        // ===== Cars =====
        crate::routes::cars::create_car,
        crate::routes::cars::list_cars,
        crate::routes::cars::get_car,
        crate::routes::cars::update_car,
        crate::routes::cars::delete_car,

        // ===== Car History =====
        crate::routes::history::create_history,
        crate::routes::history::list_history,
        crate::routes::history::get_history,
        crate::routes::history::update_history,
        crate::routes::history::delete_history,

        // ===== Ratings =====
        crate::routes::ratings::create_rating,
        crate::routes::ratings::list_ratings,
        crate::routes::ratings::get_rating,
        crate::routes::ratings::update_rating,
        crate::routes::ratings::delete_rating,
    )
)]
pub struct ApiDoc;

/// `bearer_auth` 보안 스키마 등록.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

// ==================== Swagger UI 라우터 ====================

/// Swagger UI 라우터 생성.
///
/// - `/swagger-ui` - Swagger UI 대화형 문서
/// - `/api-docs/openapi.json` - OpenAPI JSON 스펙
pub fn swagger_ui_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

// ==================== 테스트 ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_valid() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&spec).unwrap();

        assert!(json.contains("Car Registry API"));

        // 태그
        assert!(json.contains("carhistory"));
        assert!(json.contains("ratings"));

        // 경로
        assert!(json.contains("/user/login"));
        assert!(json.contains("/user/activate"));
        assert!(json.contains("/api/cars/{id}"));
        assert!(json.contains("/api/carhistory"));
        assert!(json.contains("/api/ratings/{id}"));
        assert!(json.contains("/health/ready"));
    }

    #[test]
    fn test_openapi_contains_schemas() {
        let json = serde_json::to_string(&ApiDoc::openapi()).unwrap();

        assert!(json.contains("ApiErrorResponse"));
        assert!(json.contains("CredentialsRequest"));
        assert!(json.contains("HistoryRequest"));
        assert!(json.contains("CreateRatingRequest"));
    }

    #[test]
    fn test_bearer_security_scheme_registered() {
        let spec = ApiDoc::openapi();
        let components = spec.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }

    #[test]
    fn test_swagger_ui_router_creates() {
        let _router: Router<()> = swagger_ui_router();
    }
}
