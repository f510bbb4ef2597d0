//! 차량 Repository.

use sqlx::PgPool;
use tracing::info;

use car_core::{Car, NewCar, PageSpec};

use super::{fetch_page, RepoError};

/// 차량 Repository.
pub struct CarRepository;

impl CarRepository {
    /// 차량 생성.
    pub async fn create(pool: &PgPool, input: &NewCar) -> Result<Car, RepoError> {
        let car = sqlx::query_as::<_, Car>(
            r#"
            INSERT INTO cars (
                brand, model, year, color, body_style, engine_size, weight,
                base_price, fuel_capacity, horsepower, torque, acceleration, top_speed
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id, brand, model, year, color, body_style, engine_size, weight,
                      base_price, fuel_capacity, horsepower, torque, acceleration, top_speed
            "#,
        )
        .bind(&input.brand)
        .bind(&input.model)
        .bind(input.year)
        .bind(&input.color)
        .bind(&input.body_style)
        .bind(input.engine_size)
        .bind(input.weight)
        .bind(input.base_price)
        .bind(input.fuel_capacity)
        .bind(input.horsepower)
        .bind(input.torque)
        .bind(input.acceleration)
        .bind(input.top_speed)
        .fetch_one(pool)
        .await?;

        info!(car_id = car.id, brand = %car.brand, model = %car.model, "Car created");
        Ok(car)
    }

    /// ID로 조회.
    pub async fn get(pool: &PgPool, id: i64) -> Result<Car, RepoError> {
        sqlx::query_as::<_, Car>(
            r#"
            SELECT id, brand, model, year, color, body_style, engine_size, weight,
                   base_price, fuel_capacity, horsepower, torque, acceleration, top_speed
            FROM cars
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("car {}", id)))
    }

    /// 존재 여부.
    pub async fn exists(pool: &PgPool, id: i64) -> Result<bool, RepoError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM cars WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(exists)
    }

    /// 페이지 목록.
    pub async fn list(pool: &PgPool, spec: &PageSpec) -> Result<Vec<Car>, RepoError> {
        fetch_page::<Car, Car>(pool, spec).await
    }

    /// 전체 필드 수정.
    pub async fn update(pool: &PgPool, id: i64, input: &NewCar) -> Result<Car, RepoError> {
        let car = sqlx::query_as::<_, Car>(
            r#"
            UPDATE cars SET
                brand = $2, model = $3, year = $4, color = $5, body_style = $6,
                engine_size = $7, weight = $8, base_price = $9, fuel_capacity = $10,
                horsepower = $11, torque = $12, acceleration = $13, top_speed = $14
            WHERE id = $1
            RETURNING id, brand, model, year, color, body_style, engine_size, weight,
                      base_price, fuel_capacity, horsepower, torque, acceleration, top_speed
            "#,
        )
        .bind(id)
        .bind(&input.brand)
        .bind(&input.model)
        .bind(input.year)
        .bind(&input.color)
        .bind(&input.body_style)
        .bind(input.engine_size)
        .bind(input.weight)
        .bind(input.base_price)
        .bind(input.fuel_capacity)
        .bind(input.horsepower)
        .bind(input.torque)
        .bind(input.acceleration)
        .bind(input.top_speed)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("car {}", id)))?;

        info!(car_id = id, "Car updated");
        Ok(car)
    }

    /// 삭제. 연결된 이력과 평점은 FK `ON DELETE CASCADE`로 함께 삭제됩니다.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound(format!("car {}", id)));
        }

        info!(car_id = id, "Car deleted");
        Ok(())
    }
}
