//! Axum용 JWT 인증 게이트.
//!
//! 보호된 라우트 트리에 `route_layer`로 적용되는 미들웨어와,
//! 핸들러에서 인증된 사용자를 꺼내는 [`CurrentUser`] 추출기를 제공합니다.
//!
//! 거부 사유는 세 가지이며 응답 메시지로 그대로 전달됩니다:
//! - `authorization required`: Authorization 헤더 없음
//! - `invalid token format`: `Bearer <token>` 형식이 아님
//! - `invalid token`: 서명/알고리즘/만료/클레임 검증 실패

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{
        header::{AUTHORIZATION, WWW_AUTHENTICATE},
        request::Parts,
        HeaderValue, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use super::jwt::JwtKeys;
use crate::error::ApiErrorResponse;
use crate::metrics::record_auth_rejection;

/// 인증된 요청 주체.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
}

// 요청 extensions의 키. 외부 모듈은 CurrentUser로만 접근
#[derive(Clone)]
struct IdentityKey(Identity);

/// 인증 거부 사유.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthRejection {
    #[error("authorization required")]
    MissingHeader,
    #[error("invalid token format")]
    InvalidFormat,
    #[error("invalid token")]
    InvalidToken,
}

impl AuthRejection {
    /// 메트릭 라벨.
    pub fn label(&self) -> &'static str {
        match self {
            AuthRejection::MissingHeader => "missing_header",
            AuthRejection::InvalidFormat => "invalid_format",
            AuthRejection::InvalidToken => "invalid_token",
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = Json(ApiErrorResponse::new("UNAUTHORIZED", self.to_string()));
        let mut response = (StatusCode::UNAUTHORIZED, body).into_response();
        response
            .headers_mut()
            .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        response
    }
}

/// Authorization 헤더 값에서 Bearer 토큰 추출.
///
/// 공백 하나로 나눈 결과가 정확히 두 부분이고 첫 부분이 `Bearer`여야 합니다.
pub fn bearer_token(header: &str) -> Result<&str, AuthRejection> {
    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Ok(token),
        _ => Err(AuthRejection::InvalidFormat),
    }
}

/// 인증 게이트 미들웨어.
///
/// ```rust,ignore
/// let api = Router::new()
///     .nest("/cars", cars_router())
///     .route_layer(middleware::from_fn_with_state(state.jwt.clone(), require_auth));
/// ```
pub async fn require_auth(
    State(keys): State<Arc<JwtKeys>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    let identity = authenticate(&keys, req.headers().get(AUTHORIZATION)).inspect_err(|reason| {
        debug!(
            method = %req.method(),
            path = %req.uri().path(),
            reason = %reason,
            "Request rejected by auth gate"
        );
        record_auth_rejection(reason.label());
    })?;

    req.extensions_mut().insert(IdentityKey(identity));
    Ok(next.run(req).await)
}

fn authenticate(keys: &JwtKeys, header: Option<&HeaderValue>) -> Result<Identity, AuthRejection> {
    let header = header.ok_or(AuthRejection::MissingHeader)?;
    let header = header.to_str().map_err(|_| AuthRejection::InvalidFormat)?;
    let token = bearer_token(header)?;

    let claims = keys
        .verify(token)
        .map_err(|_| AuthRejection::InvalidToken)?;

    Ok(Identity {
        user_id: claims.user_id,
        username: claims.username,
    })
}

/// 인증된 사용자 추출기.
///
/// 게이트를 거치지 않은 요청에서는 401로 거부합니다.
///
/// ```rust,ignore
/// async fn create_rating(
///     CurrentUser(user): CurrentUser,
///     Json(body): Json<CreateRatingRequest>,
/// ) -> impl IntoResponse {
///     format!("rated by {}", user.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<IdentityKey>()
            .map(|key| CurrentUser(key.0.clone()))
            .ok_or(AuthRejection::MissingHeader)
    }
}
