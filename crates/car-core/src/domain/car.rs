//! 차량 레코드.

use serde::{Deserialize, Serialize};

use crate::page::Listable;

/// 저장된 차량.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Car {
    pub id: i64,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub body_style: String,
    /// 배기량 (L)
    pub engine_size: f64,
    /// 공차 중량 (kg)
    pub weight: f64,
    pub base_price: i64,
    pub fuel_capacity: i32,
    pub horsepower: i32,
    pub torque: i32,
    /// 0-100km/h 가속 (초)
    pub acceleration: i32,
    pub top_speed: i32,
}

/// 차량 생성/수정 입력.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct NewCar {
    pub brand: String,
    pub model: String,
    pub year: i32,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub body_style: String,
    #[serde(default)]
    pub engine_size: f64,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub base_price: i64,
    #[serde(default)]
    pub fuel_capacity: i32,
    #[serde(default)]
    pub horsepower: i32,
    #[serde(default)]
    pub torque: i32,
    #[serde(default)]
    pub acceleration: i32,
    #[serde(default)]
    pub top_speed: i32,
}

impl Listable for Car {
    const TABLE: &'static str = "cars";
    const COLUMNS: &'static str = "id, brand, model, year, color, body_style, engine_size, weight, \
         base_price, fuel_capacity, horsepower, torque, acceleration, top_speed";
    const SORTABLE: &'static [&'static str] = &[
        "id",
        "brand",
        "model",
        "year",
        "color",
        "body_style",
        "engine_size",
        "weight",
        "base_price",
        "fuel_capacity",
        "horsepower",
        "torque",
        "acceleration",
        "top_speed",
    ];
    const SEARCHABLE: &'static [&'static str] = &["brand", "model"];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_car_optional_fields_default() {
        let car: NewCar =
            serde_json::from_str(r#"{"brand":"Volvo","model":"XC60","year":2021}"#).unwrap();
        assert_eq!(car.brand, "Volvo");
        assert_eq!(car.horsepower, 0);
        assert!(car.color.is_empty());
    }

    #[test]
    fn test_sortable_columns_are_selected() {
        for column in Car::SORTABLE {
            assert!(Car::COLUMNS.contains(column), "{} not selected", column);
        }
    }
}
