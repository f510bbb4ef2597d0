//! 도메인 리소스에 대한 페이지 스펙 통합 테스트
//!
//! 실제 리소스 메타데이터(Car, CarHistory, Rating)로 쿼리 파라미터를 해석합니다.

use chrono::{TimeZone, Utc};
use rust_decimal_macros::dec;

use car_core::{
    Car, CarHistory, HistoryKind, ListParams, Listable, PageError, PageSpec, Rating, MAX_LIMIT,
};

fn query(json: &str) -> ListParams {
    serde_json::from_str(json).unwrap()
}

#[test]
fn query_keys_use_camel_case() {
    let params = query(r#"{"page":"3","limit":"20","sortBy":"year","filterBy":"Volvo"}"#);
    let spec = PageSpec::parse::<Car>(&params).unwrap();

    assert_eq!(spec.page(), 3);
    assert_eq!(spec.limit(), 20);
    assert_eq!(spec.offset(), 40);
    assert_eq!(spec.sort_column(), Some("year"));
    assert_eq!(spec.filter_text(), Some("Volvo"));
}

#[test]
fn sortable_columns_differ_per_resource() {
    let by_stars = query(r#"{"sortBy":"stars"}"#);
    assert!(PageSpec::parse::<Rating>(&by_stars).is_ok());
    assert_eq!(
        PageSpec::parse::<Car>(&by_stars).unwrap_err(),
        PageError::UnknownSortField("stars".to_string())
    );

    let by_date = query(r#"{"sortBy":"date"}"#);
    assert!(PageSpec::parse::<CarHistory>(&by_date).is_ok());
    assert!(PageSpec::parse::<Rating>(&by_date).is_err());
}

#[test]
fn every_resource_can_sort_by_id() {
    let params = query(r#"{"sortBy":"id"}"#);
    assert!(PageSpec::parse::<Car>(&params).is_ok());
    assert!(PageSpec::parse::<CarHistory>(&params).is_ok());
    assert!(PageSpec::parse::<Rating>(&params).is_ok());
}

#[test]
fn searchable_columns_are_selected() {
    fn check<R: Listable>() {
        for column in R::SEARCHABLE {
            assert!(R::COLUMNS.contains(column), "{}.{}", R::TABLE, column);
        }
    }
    check::<Car>();
    check::<CarHistory>();
    check::<Rating>();
}

#[test]
fn oversized_limit_is_capped() {
    let spec = PageSpec::parse::<Car>(&query(r#"{"limit":"5000"}"#)).unwrap();
    assert_eq!(spec.limit(), MAX_LIMIT);
}

#[test]
fn non_numeric_limit_is_rejected() {
    let err = PageSpec::parse::<Car>(&query(r#"{"limit":"ten"}"#)).unwrap_err();
    assert!(matches!(err, PageError::InvalidNumber { field: "limit", .. }));
}

#[test]
fn history_serializes_type_field() {
    let history = CarHistory {
        id: 1,
        car_id: 7,
        date: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
        kind: HistoryKind::Service,
        details: "oil change".to_string(),
        service_type: Some("maintenance".to_string()),
        service_cost: Some(dec!(120.50)),
        service_notes: None,
    };

    let json = serde_json::to_value(&history).unwrap();
    assert_eq!(json["type"], "service");
    assert_eq!(json["car_id"], 7);
    assert_eq!(json["service_cost"], "120.50");
    assert!(json.get("service_notes").is_none());
    assert!(json.get("kind").is_none());
}
