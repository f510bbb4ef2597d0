//! 차량 이력 Repository.
//!
//! `type` 컬럼은 TEXT로 저장되므로 DB 레코드를 거쳐 도메인 타입으로 변환합니다.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use tracing::info;

use car_core::{CarHistory, NewCarHistory, PageSpec};

use super::{fetch_page, RepoError};

const RETURNING: &str =
    "RETURNING id, car_id, date, type, details, service_type, service_cost, service_notes";

// ==================== DB 레코드 ====================

/// 차량 이력 DB 레코드.
#[derive(Debug, Clone, FromRow)]
pub struct CarHistoryRecord {
    pub id: i64,
    pub car_id: i64,
    pub date: DateTime<Utc>,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub details: String,
    pub service_type: Option<String>,
    pub service_cost: Option<Decimal>,
    pub service_notes: Option<String>,
}

impl TryFrom<CarHistoryRecord> for CarHistory {
    type Error = RepoError;

    fn try_from(record: CarHistoryRecord) -> Result<Self, Self::Error> {
        let kind = record
            .kind
            .parse()
            .map_err(|e| RepoError::Corrupt(format!("car_history {}: {}", record.id, e)))?;

        Ok(CarHistory {
            id: record.id,
            car_id: record.car_id,
            date: record.date,
            kind,
            details: record.details,
            service_type: record.service_type,
            service_cost: record.service_cost,
            service_notes: record.service_notes,
        })
    }
}

// ==================== Repository ====================

/// 차량 이력 Repository.
pub struct HistoryRepository;

impl HistoryRepository {
    /// 이력 생성. `date`는 현재 시각으로 설정됩니다.
    pub async fn create(pool: &PgPool, input: &NewCarHistory) -> Result<CarHistory, RepoError> {
        let sql = format!(
            "INSERT INTO car_history \
             (car_id, date, type, details, service_type, service_cost, service_notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) {}",
            RETURNING
        );

        let record = sqlx::query_as::<_, CarHistoryRecord>(&sql)
            .bind(input.car_id)
            .bind(Utc::now())
            .bind(input.kind.as_str())
            .bind(&input.details)
            .bind(&input.service_type)
            .bind(input.service_cost)
            .bind(&input.service_notes)
            .fetch_one(pool)
            .await
            .map_err(|e| RepoError::from_write(e, "car history", "car"))?;

        info!(history_id = record.id, car_id = record.car_id, kind = %record.kind, "Car history created");
        record.try_into()
    }

    /// ID로 조회.
    pub async fn get(pool: &PgPool, id: i64) -> Result<CarHistory, RepoError> {
        sqlx::query_as::<_, CarHistoryRecord>(
            r#"
            SELECT id, car_id, date, type, details, service_type, service_cost, service_notes
            FROM car_history
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("car history {}", id)))?
        .try_into()
    }

    /// 페이지 목록.
    pub async fn list(pool: &PgPool, spec: &PageSpec) -> Result<Vec<CarHistory>, RepoError> {
        fetch_page::<CarHistory, CarHistoryRecord>(pool, spec)
            .await?
            .into_iter()
            .map(CarHistory::try_from)
            .collect()
    }

    /// 수정. 기록 시각(`date`)은 유지됩니다.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        input: &NewCarHistory,
    ) -> Result<CarHistory, RepoError> {
        let sql = format!(
            "UPDATE car_history SET \
             car_id = $2, type = $3, details = $4, \
             service_type = $5, service_cost = $6, service_notes = $7 \
             WHERE id = $1 {}",
            RETURNING
        );

        let record = sqlx::query_as::<_, CarHistoryRecord>(&sql)
            .bind(id)
            .bind(input.car_id)
            .bind(input.kind.as_str())
            .bind(&input.details)
            .bind(&input.service_type)
            .bind(input.service_cost)
            .bind(&input.service_notes)
            .fetch_optional(pool)
            .await
            .map_err(|e| RepoError::from_write(e, "car history", "car"))?
            .ok_or_else(|| RepoError::NotFound(format!("car history {}", id)))?;

        info!(history_id = id, "Car history updated");
        record.try_into()
    }

    /// 삭제.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM car_history WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound(format!("car history {}", id)));
        }

        info!(history_id = id, "Car history deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use car_core::HistoryKind;
    use rust_decimal_macros::dec;

    fn record(kind: &str) -> CarHistoryRecord {
        CarHistoryRecord {
            id: 5,
            car_id: 2,
            date: Utc::now(),
            kind: kind.to_string(),
            details: "brake pads".to_string(),
            service_type: Some("repair".to_string()),
            service_cost: Some(dec!(120.50)),
            service_notes: None,
        }
    }

    #[test]
    fn test_record_to_domain() {
        let history = CarHistory::try_from(record("service")).unwrap();
        assert_eq!(history.kind, HistoryKind::Service);
        assert_eq!(history.service_cost, Some(dec!(120.50)));
    }

    #[test]
    fn test_unknown_kind_is_corrupt() {
        let result = CarHistory::try_from(record("recall"));
        assert!(matches!(result, Err(RepoError::Corrupt(_))));
    }
}
