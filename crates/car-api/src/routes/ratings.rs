//! 평점 endpoint.
//!
//! 작성자는 항상 인증된 사용자이며 요청 본문에서 받지 않습니다.
//! 수정/삭제는 작성자 본인만 가능하고, 그 외에는 404로 응답합니다.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use car_core::{ListParams, NewRating, PageSpec, Rating};

use crate::auth::CurrentUser;
use crate::error::{ApiErrorResponse, ApiResult};
use crate::extract::{ApiPath, ApiQuery, ValidatedJson};
use crate::repository::RatingRepository;
use crate::state::AppState;

/// 평점 생성 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRatingRequest {
    #[validate(range(min = 1, message = "car_id must be positive"))]
    pub car_id: i64,
    #[validate(range(min = 1, max = 5, message = "stars must be between 1 and 5"))]
    pub stars: i32,
    #[validate(length(max = 2000, message = "comment must be at most 2000 characters"))]
    #[serde(default)]
    pub comment: String,
}

/// 평점 수정 요청.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRatingRequest {
    #[validate(range(min = 1, max = 5, message = "stars must be between 1 and 5"))]
    pub stars: i32,
    #[validate(length(max = 2000, message = "comment must be at most 2000 characters"))]
    #[serde(default)]
    pub comment: String,
}

/// 평점 생성.
///
/// POST /api/ratings
#[utoipa::path(
    post,
    path = "/api/ratings",
    request_body = CreateRatingRequest,
    responses(
        (status = 201, description = "생성됨", body = Rating),
        (status = 400, description = "잘못된 입력 또는 존재하지 않는 차량", body = ApiErrorResponse),
        (status = 401, description = "인증 필요", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "ratings"
)]
pub async fn create_rating(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(request): ValidatedJson<CreateRatingRequest>,
) -> ApiResult<(StatusCode, Json<Rating>)> {
    let input = NewRating {
        car_id: request.car_id,
        user_id: user.user_id,
        stars: request.stars,
        comment: request.comment,
    };

    let rating = RatingRepository::create(&state.db_pool, &input).await?;
    Ok((StatusCode::CREATED, Json(rating)))
}

/// 평점 목록.
///
/// GET /api/ratings
#[utoipa::path(
    get,
    path = "/api/ratings",
    params(
        ("page" = Option<i64>, Query, description = "페이지 번호 (기본 1)"),
        ("limit" = Option<i64>, Query, description = "페이지 크기 (기본 10, 최대 100)"),
        ("sortBy" = Option<String>, Query, description = "정렬 컬럼"),
        ("filterBy" = Option<String>, Query, description = "comment 부분 문자열")
    ),
    responses(
        (status = 200, description = "평점 목록", body = Vec<Rating>),
        (status = 400, description = "잘못된 파라미터", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "ratings"
)]
pub async fn list_ratings(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> ApiResult<Json<Vec<Rating>>> {
    let spec = PageSpec::parse::<Rating>(&params)?;
    Ok(Json(RatingRepository::list(&state.db_pool, &spec).await?))
}

/// 평점 조회.
///
/// GET /api/ratings/{id}
#[utoipa::path(
    get,
    path = "/api/ratings/{id}",
    params(("id" = i64, Path, description = "평점 ID")),
    responses(
        (status = 200, description = "평점", body = Rating),
        (status = 404, description = "없음", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "ratings"
)]
pub async fn get_rating(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Rating>> {
    Ok(Json(RatingRepository::get(&state.db_pool, id).await?))
}

/// 평점 수정 (작성자 본인).
///
/// PUT /api/ratings/{id}
#[utoipa::path(
    put,
    path = "/api/ratings/{id}",
    params(("id" = i64, Path, description = "평점 ID")),
    request_body = UpdateRatingRequest,
    responses(
        (status = 200, description = "수정됨", body = Rating),
        (status = 404, description = "없음 또는 본인 평점 아님", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "ratings"
)]
pub async fn update_rating(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(request): ValidatedJson<UpdateRatingRequest>,
) -> ApiResult<Json<Rating>> {
    let rating = RatingRepository::update_owned(
        &state.db_pool,
        id,
        user.user_id,
        request.stars,
        &request.comment,
    )
    .await?;
    Ok(Json(rating))
}

/// 평점 삭제 (작성자 본인).
///
/// DELETE /api/ratings/{id}
#[utoipa::path(
    delete,
    path = "/api/ratings/{id}",
    params(("id" = i64, Path, description = "평점 ID")),
    responses(
        (status = 204, description = "삭제됨"),
        (status = 404, description = "없음 또는 본인 평점 아님", body = ApiErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "ratings"
)]
pub async fn delete_rating(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<StatusCode> {
    RatingRepository::delete_owned(&state.db_pool, id, user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// 평점 라우터 생성.
pub fn ratings_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_ratings).post(create_rating))
        .route(
            "/{id}",
            get(get_rating).put(update_rating).delete(delete_rating),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stars_out_of_range_fail_validation() {
        let request: CreateRatingRequest =
            serde_json::from_str(r#"{"car_id":1,"stars":6,"comment":"great"}"#).unwrap();
        assert!(request.validate().is_err());

        let request: CreateRatingRequest =
            serde_json::from_str(r#"{"car_id":1,"stars":0}"#).unwrap();
        assert!(request.validate().is_err());

        let request: CreateRatingRequest =
            serde_json::from_str(r#"{"car_id":1,"stars":5}"#).unwrap();
        assert!(request.validate().is_ok());
        assert!(request.comment.is_empty());
    }

    #[test]
    fn test_validation_matches_domain_range() {
        for stars in -2..=8 {
            let request = UpdateRatingRequest {
                stars,
                comment: String::new(),
            };
            assert_eq!(request.validate().is_ok(), Rating::stars_in_range(stars));
        }
    }

    #[test]
    fn test_body_user_id_is_ignored() {
        let request: CreateRatingRequest =
            serde_json::from_str(r#"{"car_id":1,"stars":4,"user_id":999}"#).unwrap();
        assert_eq!(request.car_id, 1);
        assert_eq!(request.stars, 4);
    }
}
