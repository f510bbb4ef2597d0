//! 차량 이력 endpoint.
//!
//! - `POST /api/carhistory`: 생성 (기록 시각은 서버가 설정)
//! - `GET /api/carhistory`: 페이지 목록
//! - `GET /api/carhistory/{id}`: 조회
//! - `PUT /api/carhistory/{id}`: 수정
//! - `DELETE /api/carhistory/{id}`: 삭제

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use car_core::{CarHistory, HistoryKind, ListParams, NewCarHistory, PageSpec};

use crate::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::extract::{ApiPath, ApiQuery, ValidatedJson};
use crate::repository::{CarRepository, HistoryRepository};
use crate::state::AppState;

/// `service_cost` 컬럼(NUMERIC(12, 2))의 정수부 상한.
const MAX_COST_INTEGER_DIGITS: u32 = 10;

/// 이력 생성/수정 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct HistoryRequest {
    /// 대상 차량 ID
    #[validate(range(min = 1, message = "car_id must be positive"))]
    pub car_id: i64,
    /// "accident" 또는 "service"
    #[serde(rename = "type")]
    pub kind: String,
    #[validate(length(max = 4000, message = "details must be at most 4000 characters"))]
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub service_type: Option<String>,
    #[serde(default)]
    pub service_cost: Option<Decimal>,
    #[serde(default)]
    pub service_notes: Option<String>,
}

impl TryFrom<HistoryRequest> for NewCarHistory {
    type Error = ApiError;

    fn try_from(request: HistoryRequest) -> Result<Self, Self::Error> {
        let kind: HistoryKind = request
            .kind
            .parse()
            .map_err(|_| ApiError::bad_request("type must be \"accident\" or \"service\""))?;

        if let Some(cost) = request.service_cost {
            if cost.is_sign_negative() {
                return Err(ApiError::bad_request("service_cost must not be negative"));
            }
            if cost.trunc() >= Decimal::from(10i64.pow(MAX_COST_INTEGER_DIGITS)) {
                return Err(ApiError::bad_request(format!(
                    "service_cost must have at most {} integer digits",
                    MAX_COST_INTEGER_DIGITS
                )));
            }
        }

        Ok(NewCarHistory {
            car_id: request.car_id,
            kind,
            details: request.details,
            service_type: request.service_type,
            service_cost: request.service_cost,
            service_notes: request.service_notes,
        })
    }
}

async fn ensure_car_exists(state: &AppState, car_id: i64) -> ApiResult<()> {
    if !CarRepository::exists(&state.db_pool, car_id).await? {
        return Err(ApiError::bad_request(format!("car {} does not exist", car_id)));
    }
    Ok(())
}

/// 이력 생성.
///
/// POST /api/carhistory
#[utoipa::path(
    post,
    path = "/api/carhistory",
    request_body = HistoryRequest,
    responses(
        (status = 201, description = "생성됨", body = CarHistory),
        (status = 400, description = "잘못된 입력 또는 존재하지 않는 차량", body = ApiErrorResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "carhistory"
)]
pub async fn create_history(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<HistoryRequest>,
) -> ApiResult<(StatusCode, Json<CarHistory>)> {
    let input = NewCarHistory::try_from(request)?;
    ensure_car_exists(&state, input.car_id).await?;

    let history = HistoryRepository::create(&state.db_pool, &input).await?;
    Ok((StatusCode::CREATED, Json(history)))
}

/// 이력 목록.
///
/// GET /api/carhistory
#[utoipa::path(
    get,
    path = "/api/carhistory",
    params(
        ("page" = Option<i64>, Query, description = "페이지 번호 (기본 1)"),
        ("limit" = Option<i64>, Query, description = "페이지 크기 (기본 10, 최대 100)"),
        ("sortBy" = Option<String>, Query, description = "정렬 컬럼"),
        ("filterBy" = Option<String>, Query, description = "type/details/service 부분 문자열")
    ),
    responses(
        (status = 200, description = "이력 목록", body = Vec<CarHistory>),
        (status = 400, description = "잘못된 파라미터", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "carhistory"
)]
pub async fn list_history(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> ApiResult<Json<Vec<CarHistory>>> {
    let spec = PageSpec::parse::<CarHistory>(&params)?;
    Ok(Json(HistoryRepository::list(&state.db_pool, &spec).await?))
}

/// 이력 조회.
///
/// GET /api/carhistory/{id}
#[utoipa::path(
    get,
    path = "/api/carhistory/{id}",
    params(("id" = i64, Path, description = "이력 ID")),
    responses(
        (status = 200, description = "이력", body = CarHistory),
        (status = 404, description = "없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "carhistory"
)]
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<CarHistory>> {
    Ok(Json(HistoryRepository::get(&state.db_pool, id).await?))
}

/// 이력 수정. 대상 ID는 경로에서만 받습니다.
///
/// PUT /api/carhistory/{id}
#[utoipa::path(
    put,
    path = "/api/carhistory/{id}",
    params(("id" = i64, Path, description = "이력 ID")),
    request_body = HistoryRequest,
    responses(
        (status = 200, description = "수정됨", body = CarHistory),
        (status = 400, description = "잘못된 입력", body = ApiErrorResponse),
        (status = 404, description = "없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "carhistory"
)]
pub async fn update_history(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(request): ValidatedJson<HistoryRequest>,
) -> ApiResult<Json<CarHistory>> {
    let input = NewCarHistory::try_from(request)?;
    ensure_car_exists(&state, input.car_id).await?;

    Ok(Json(HistoryRepository::update(&state.db_pool, id, &input).await?))
}

/// 이력 삭제.
///
/// DELETE /api/carhistory/{id}
#[utoipa::path(
    delete,
    path = "/api/carhistory/{id}",
    params(("id" = i64, Path, description = "이력 ID")),
    responses(
        (status = 204, description = "삭제됨"),
        (status = 404, description = "없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "carhistory"
)]
pub async fn delete_history(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    HistoryRepository::delete(&state.db_pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 차량 이력 라우터 생성.
pub fn history_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_history).post(create_history))
        .route(
            "/{id}",
            get(get_history).put(update_history).delete(delete_history),
        )
}
