//! 차량 이력 (사고/정비).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::page::Listable;

/// 이력 이벤트 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub enum HistoryKind {
    /// 사고
    Accident,
    /// 정비
    Service,
}

/// 알 수 없는 이력 종류 문자열.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown history type: {0}")]
pub struct ParseHistoryKindError(pub String);

impl HistoryKind {
    /// DB/JSON 표현.
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryKind::Accident => "accident",
            HistoryKind::Service => "service",
        }
    }
}

impl std::fmt::Display for HistoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HistoryKind {
    type Err = ParseHistoryKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accident" => Ok(HistoryKind::Accident),
            "service" => Ok(HistoryKind::Service),
            other => Err(ParseHistoryKindError(other.to_string())),
        }
    }
}

/// 저장된 차량 이력.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct CarHistory {
    pub id: i64,
    pub car_id: i64,
    /// 기록 시각 (서버가 생성 시 설정)
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: HistoryKind,
    pub details: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_cost: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_notes: Option<String>,
}

/// 이력 생성/수정 입력.
///
/// `date`는 입력받지 않습니다.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCarHistory {
    pub car_id: i64,
    pub kind: HistoryKind,
    pub details: String,
    pub service_type: Option<String>,
    pub service_cost: Option<Decimal>,
    pub service_notes: Option<String>,
}

impl Listable for CarHistory {
    const TABLE: &'static str = "car_history";
    const COLUMNS: &'static str =
        "id, car_id, date, type, details, service_type, service_cost, service_notes";
    const SORTABLE: &'static [&'static str] = &[
        "id",
        "car_id",
        "date",
        "type",
        "service_type",
        "service_cost",
    ];
    const SEARCHABLE: &'static [&'static str] =
        &["type", "details", "service_type", "service_notes"];
}
