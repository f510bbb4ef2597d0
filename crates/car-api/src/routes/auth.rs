//! 사용자 등록/로그인/토큰 갱신 endpoint.
//!
//! 인증 게이트 바깥의 공개 라우트입니다.
//!
//! - `POST /user/register`: 등록
//! - `POST /user/login`: 로그인, 응답 본문은 토큰 문자열
//! - `POST /user/activate`: 만료된 토큰 갱신 (`Expired-Token` 헤더)

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::extract::ValidatedJson;
use crate::metrics::record_login;
use crate::state::AppState;

/// 갱신 요청 시 만료 토큰을 담는 헤더.
pub const EXPIRED_TOKEN_HEADER: &str = "Expired-Token";

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// 등록/로그인 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CredentialsRequest {
    /// 사용자 이름
    #[validate(length(min = 1, max = 64, message = "username must be 1-64 characters"))]
    pub username: String,
    /// 평문 비밀번호
    #[validate(length(min = 1, max = 128, message = "password must be 1-128 characters"))]
    pub password: String,
}

/// 단순 메시지 응답.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// 사용자 등록.
///
/// POST /user/register
#[utoipa::path(
    post,
    path = "/user/register",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "등록 성공", body = MessageResponse),
        (status = 400, description = "잘못된 입력", body = ApiErrorResponse),
        (status = 409, description = "이미 존재하는 사용자 이름", body = ApiErrorResponse)
    ),
    tag = "user"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CredentialsRequest>,
) -> ApiResult<impl IntoResponse> {
    let hash = state.passwords.hash(request.password).await?;
    let credential = state
        .credentials
        .create_user(&request.username, &hash)
        .await?;

    info!(user_id = credential.id, username = %credential.username, "User registered");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "user registered".to_string(),
        }),
    ))
}

/// 로그인.
///
/// 알 수 없는 사용자와 잘못된 비밀번호는 같은 응답으로 거부합니다.
///
/// POST /user/login
#[utoipa::path(
    post,
    path = "/user/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Access Token", body = String, content_type = "text/plain"),
        (status = 400, description = "잘못된 입력", body = ApiErrorResponse),
        (status = 401, description = "인증 실패", body = ApiErrorResponse)
    ),
    tag = "user"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CredentialsRequest>,
) -> ApiResult<String> {
    let credential = state
        .credentials
        .find_by_username(&request.username)
        .await?;

    let Some(credential) = credential else {
        debug!(username = %request.username, "Login for unknown user");
        state.passwords.verify_dummy(request.password).await?;
        return Err(login_failed());
    };

    let matches = state
        .passwords
        .verify(request.password, credential.password_hash.clone())
        .await?;
    if !matches {
        debug!(user_id = credential.id, "Login with wrong password");
        return Err(login_failed());
    }

    let token = state.jwt.issue(credential.id, &credential.username)?;
    record_login("success");
    info!(user_id = credential.id, "User logged in");
    Ok(token)
}

fn login_failed() -> ApiError {
    record_login("failure");
    ApiError::Unauthorized(INVALID_CREDENTIALS.to_string())
}

/// 만료된 토큰으로 새 토큰 발급.
///
/// 서명과 클레임이 유효하고 만료 후 유예 기간 이내여야 합니다.
///
/// POST /user/activate
#[utoipa::path(
    post,
    path = "/user/activate",
    params(
        ("Expired-Token" = String, Header, description = "만료된 Access Token")
    ),
    responses(
        (status = 200, description = "새 Access Token", body = String, content_type = "text/plain"),
        (status = 400, description = "헤더 없음", body = ApiErrorResponse),
        (status = 401, description = "갱신 불가 토큰", body = ApiErrorResponse)
    ),
    tag = "user"
)]
pub async fn activate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<String> {
    let presented = headers
        .get(EXPIRED_TOKEN_HEADER)
        .ok_or_else(|| ApiError::bad_request("Expired-Token header required"))?
        .to_str()
        .map_err(|_| ApiError::Unauthorized("invalid token".to_string()))?;

    let claims = state.jwt.verify_for_renewal(presented)?;

    // 삭제된 사용자의 토큰은 갱신하지 않음
    let credential = state
        .credentials
        .find_by_id(claims.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("invalid token".to_string()))?;

    let token = state.jwt.issue(credential.id, &credential.username)?;
    info!(user_id = credential.id, "Token renewed");
    Ok(token)
}

/// 사용자 라우터 생성.
pub fn user_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/activate", post(activate))
}
