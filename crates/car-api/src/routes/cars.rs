//! 차량 관리 endpoint.
//!
//! - `POST /api/cars`: 생성
//! - `GET /api/cars`: 페이지 목록 (`page`, `limit`, `sortBy`, `filterBy`)
//! - `GET /api/cars/{id}`: 조회
//! - `PUT /api/cars/{id}`: 수정
//! - `DELETE /api/cars/{id}`: 삭제

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use car_core::{Car, ListParams, NewCar, PageSpec};

use crate::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::repository::CarRepository;
use crate::state::AppState;

/// 필수 텍스트 필드 검사.
fn check_car(input: &NewCar) -> ApiResult<()> {
    if input.brand.trim().is_empty() {
        return Err(ApiError::bad_request("brand must not be empty"));
    }
    if input.model.trim().is_empty() {
        return Err(ApiError::bad_request("model must not be empty"));
    }
    Ok(())
}

/// 차량 생성.
///
/// POST /api/cars
#[utoipa::path(
    post,
    path = "/api/cars",
    request_body = NewCar,
    responses(
        (status = 201, description = "생성됨", body = Car),
        (status = 400, description = "잘못된 입력", body = ApiErrorResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "cars"
)]
pub async fn create_car(
    State(state): State<Arc<AppState>>,
    ApiJson(input): ApiJson<NewCar>,
) -> ApiResult<(StatusCode, Json<Car>)> {
    check_car(&input)?;
    let car = CarRepository::create(&state.db_pool, &input).await?;
    Ok((StatusCode::CREATED, Json(car)))
}

/// 차량 목록.
///
/// GET /api/cars
#[utoipa::path(
    get,
    path = "/api/cars",
    params(
        ("page" = Option<i64>, Query, description = "페이지 번호 (기본 1)"),
        ("limit" = Option<i64>, Query, description = "페이지 크기 (기본 10, 최대 100)"),
        ("sortBy" = Option<String>, Query, description = "정렬 컬럼"),
        ("filterBy" = Option<String>, Query, description = "brand/model 부분 문자열")
    ),
    responses(
        (status = 200, description = "차량 목록", body = Vec<Car>),
        (status = 400, description = "잘못된 파라미터", body = ApiErrorResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "cars"
)]
pub async fn list_cars(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> ApiResult<Json<Vec<Car>>> {
    let spec = PageSpec::parse::<Car>(&params)?;
    let cars = CarRepository::list(&state.db_pool, &spec).await?;
    Ok(Json(cars))
}

/// 차량 조회.
///
/// GET /api/cars/{id}
#[utoipa::path(
    get,
    path = "/api/cars/{id}",
    params(("id" = i64, Path, description = "차량 ID")),
    responses(
        (status = 200, description = "차량", body = Car),
        (status = 404, description = "없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "cars"
)]
pub async fn get_car(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Car>> {
    Ok(Json(CarRepository::get(&state.db_pool, id).await?))
}

/// 차량 수정.
///
/// PUT /api/cars/{id}
#[utoipa::path(
    put,
    path = "/api/cars/{id}",
    params(("id" = i64, Path, description = "차량 ID")),
    request_body = NewCar,
    responses(
        (status = 200, description = "수정됨", body = Car),
        (status = 400, description = "잘못된 입력", body = ApiErrorResponse),
        (status = 404, description = "없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "cars"
)]
pub async fn update_car(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<NewCar>,
) -> ApiResult<Json<Car>> {
    check_car(&input)?;
    Ok(Json(CarRepository::update(&state.db_pool, id, &input).await?))
}

/// 차량 삭제.
///
/// DELETE /api/cars/{id}
#[utoipa::path(
    delete,
    path = "/api/cars/{id}",
    params(("id" = i64, Path, description = "차량 ID")),
    responses(
        (status = 204, description = "삭제됨"),
        (status = 404, description = "없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "cars"
)]
pub async fn delete_car(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    CarRepository::delete(&state.db_pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 차량 라우터 생성.
pub fn cars_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_cars).post(create_car))
        .route("/{id}", get(get_car).put(update_car).delete(delete_car))
}
