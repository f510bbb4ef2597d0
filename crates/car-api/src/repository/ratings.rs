//! 평점 Repository.

use sqlx::PgPool;
use tracing::info;

use car_core::{NewRating, PageSpec, Rating};

use super::{fetch_page, RepoError};

/// 평점 Repository.
pub struct RatingRepository;

impl RatingRepository {
    /// 평점 생성.
    pub async fn create(pool: &PgPool, input: &NewRating) -> Result<Rating, RepoError> {
        let rating = sqlx::query_as::<_, Rating>(
            r#"
            INSERT INTO ratings (car_id, user_id, stars, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING id, car_id, user_id, stars, comment
            "#,
        )
        .bind(input.car_id)
        .bind(input.user_id)
        .bind(input.stars)
        .bind(&input.comment)
        .fetch_one(pool)
        .await
        .map_err(|e| RepoError::from_write(e, "rating", "car"))?;

        info!(
            rating_id = rating.id,
            car_id = rating.car_id,
            user_id = rating.user_id,
            stars = rating.stars,
            "Rating created"
        );
        Ok(rating)
    }

    /// ID로 조회.
    pub async fn get(pool: &PgPool, id: i64) -> Result<Rating, RepoError> {
        sqlx::query_as::<_, Rating>(
            "SELECT id, car_id, user_id, stars, comment FROM ratings WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("rating {}", id)))
    }

    /// 페이지 목록.
    pub async fn list(pool: &PgPool, spec: &PageSpec) -> Result<Vec<Rating>, RepoError> {
        fetch_page::<Rating, Rating>(pool, spec).await
    }

    /// 작성자 본인의 평점 수정 (별점, 코멘트).
    ///
    /// 다른 사용자의 평점은 존재하지 않는 것과 같이 `NotFound`입니다.
    pub async fn update_owned(
        pool: &PgPool,
        id: i64,
        user_id: i64,
        stars: i32,
        comment: &str,
    ) -> Result<Rating, RepoError> {
        let rating = sqlx::query_as::<_, Rating>(
            r#"
            UPDATE ratings SET stars = $3, comment = $4
            WHERE id = $1 AND user_id = $2
            RETURNING id, car_id, user_id, stars, comment
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(stars)
        .bind(comment)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("rating {}", id)))?;

        info!(rating_id = id, user_id, stars, "Rating updated");
        Ok(rating)
    }

    /// 작성자 본인의 평점 삭제.
    ///
    /// 존재하지 않는 평점과 다른 사용자의 평점을 구분하지 않고 `NotFound`를 반환합니다.
    pub async fn delete_owned(pool: &PgPool, id: i64, user_id: i64) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM ratings WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound(format!("rating {}", id)));
        }

        info!(rating_id = id, user_id, "Rating deleted");
        Ok(())
    }
}
