//! 목록 조회용 페이지 스펙.
//!
//! 모든 목록 엔드포인트(차량, 이력, 평점)는 `page`, `limit`, `sortBy`, `filterBy`
//! 쿼리 파라미터를 받습니다. 이 모듈은 원시 파라미터를 정규화된 [`PageSpec`]으로
//! 변환합니다.
//!
//! - `page` < 1 또는 미지정 → 1
//! - `limit` ≤ 0 또는 미지정 → 10, 최대 [`MAX_LIMIT`]
//! - `sortBy`는 리소스별 허용 목록([`Listable::SORTABLE`])에 있는 컬럼만 허용
//! - `filterBy`는 값으로만 사용되며 쿼리 텍스트에 절대 삽입되지 않음

use serde::Deserialize;
use thiserror::Error;

/// 기본 페이지 번호.
pub const DEFAULT_PAGE: i64 = 1;
/// 기본 페이지 크기.
pub const DEFAULT_LIMIT: i64 = 10;
/// 한 번에 조회할 수 있는 최대 행 수.
pub const MAX_LIMIT: i64 = 100;

/// 페이지 단위로 조회 가능한 리소스.
///
/// 테이블 이름, 조회 컬럼, 정렬 허용 컬럼, 검색 대상 컬럼을 정적으로 선언합니다.
/// 쿼리에 삽입되는 식별자는 모두 여기에서 나온 `'static` 문자열입니다.
pub trait Listable {
    /// 테이블 이름
    const TABLE: &'static str;
    /// SELECT 컬럼 목록
    const COLUMNS: &'static str;
    /// 정렬 가능한 컬럼
    const SORTABLE: &'static [&'static str];
    /// `filterBy` 부분 문자열 검색 대상 컬럼
    const SEARCHABLE: &'static [&'static str];
}

/// 목록 쿼리 파라미터 (원시 문자열).
///
/// 숫자 파싱은 [`PageSpec::parse`]에서 수행하여 빈 문자열을 "미지정"으로 취급합니다.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    /// 페이지 번호 (1부터)
    #[serde(default)]
    pub page: Option<String>,
    /// 페이지 크기
    #[serde(default)]
    pub limit: Option<String>,
    /// 정렬 컬럼
    #[serde(default, rename = "sortBy")]
    pub sort_by: Option<String>,
    /// 부분 문자열 필터
    #[serde(default, rename = "filterBy")]
    pub filter_by: Option<String>,
}

/// 페이지 스펙 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    /// 숫자가 아닌 page/limit
    #[error("{field} must be an integer, got {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    /// 허용 목록에 없는 정렬 컬럼
    #[error("unknown sort field: {0}")]
    UnknownSortField(String),
}

/// 정규화된 페이지 스펙.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSpec {
    page: i64,
    limit: i64,
    sort_column: Option<&'static str>,
    filter_text: Option<String>,
}

impl Default for PageSpec {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_LIMIT)
    }
}

impl PageSpec {
    /// 정규화된 스펙 생성 (정렬/필터 없음).
    pub fn new(page: i64, limit: i64) -> Self {
        let page = if page < 1 { DEFAULT_PAGE } else { page };
        let limit = if limit <= 0 {
            DEFAULT_LIMIT
        } else {
            limit.min(MAX_LIMIT)
        };

        Self {
            page,
            limit,
            sort_column: None,
            filter_text: None,
        }
    }

    /// 쿼리 파라미터를 리소스 `R` 기준으로 파싱합니다.
    pub fn parse<R: Listable>(params: &ListParams) -> Result<Self, PageError> {
        let page = parse_number("page", params.page.as_deref())?.unwrap_or(DEFAULT_PAGE);
        let limit = parse_number("limit", params.limit.as_deref())?.unwrap_or(DEFAULT_LIMIT);

        let mut spec = Self::new(page, limit);
        if let Some(field) = non_empty(params.sort_by.as_deref()) {
            spec = spec.sorted_by::<R>(field)?;
        }
        if let Some(text) = non_empty(params.filter_by.as_deref()) {
            spec = spec.filtered_by(text);
        }
        Ok(spec)
    }

    /// 정렬 컬럼 지정. 허용 목록에 없으면 거부합니다.
    pub fn sorted_by<R: Listable>(mut self, field: &str) -> Result<Self, PageError> {
        let column = R::SORTABLE
            .iter()
            .copied()
            .find(|c| *c == field)
            .ok_or_else(|| PageError::UnknownSortField(field.to_string()))?;
        self.sort_column = Some(column);
        Ok(self)
    }

    /// 부분 문자열 필터 지정.
    pub fn filtered_by(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.filter_text = if text.is_empty() { None } else { Some(text) };
        self
    }

    /// 페이지 번호 (1부터).
    pub fn page(&self) -> i64 {
        self.page
    }

    /// 페이지 크기.
    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// 건너뛸 행 수: `(page - 1) × limit`.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// 검증된 정렬 컬럼.
    pub fn sort_column(&self) -> Option<&'static str> {
        self.sort_column
    }

    /// 필터 텍스트.
    pub fn filter_text(&self) -> Option<&str> {
        self.filter_text.as_deref()
    }

    /// LIKE 패턴 (`%text%`). 와일드카드 문자는 이스케이프하여 리터럴로 비교합니다.
    pub fn like_pattern(&self) -> Option<String> {
        self.filter_text.as_deref().map(|text| {
            let mut pattern = String::with_capacity(text.len() + 2);
            pattern.push('%');
            for ch in text.chars() {
                if matches!(ch, '%' | '_' | '\\') {
                    pattern.push('\\');
                }
                pattern.push(ch);
            }
            pattern.push('%');
            pattern
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_number(field: &'static str, raw: Option<&str>) -> Result<Option<i64>, PageError> {
    match non_empty(raw) {
        None => Ok(None),
        Some(v) => v.parse::<i64>().map(Some).map_err(|_| PageError::InvalidNumber {
            field,
            value: v.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct Widgets;

    impl Listable for Widgets {
        const TABLE: &'static str = "widgets";
        const COLUMNS: &'static str = "id, name, size";
        const SORTABLE: &'static [&'static str] = &["id", "name", "size"];
        const SEARCHABLE: &'static [&'static str] = &["name"];
    }

    fn params(page: &str, limit: &str, sort: &str, filter: &str) -> ListParams {
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
        ListParams {
            page: opt(page),
            limit: opt(limit),
            sort_by: opt(sort),
            filter_by: opt(filter),
        }
    }

    #[test]
    fn test_defaults_when_unspecified() {
        let spec = PageSpec::parse::<Widgets>(&ListParams::default()).unwrap();
        assert_eq!(spec.page(), 1);
        assert_eq!(spec.limit(), 10);
        assert_eq!(spec.offset(), 0);
        assert!(spec.sort_column().is_none());
        assert!(spec.filter_text().is_none());
    }

    #[test]
    fn test_zero_and_negative_fall_back_to_defaults() {
        let spec = PageSpec::parse::<Widgets>(&params("0", "0", "", "")).unwrap();
        assert_eq!((spec.page(), spec.limit()), (1, 10));

        let spec = PageSpec::parse::<Widgets>(&params("-3", "-1", "", "")).unwrap();
        assert_eq!((spec.page(), spec.limit()), (1, 10));
    }

    #[test]
    fn test_offset_for_second_page() {
        let spec = PageSpec::parse::<Widgets>(&params("2", "5", "size", "")).unwrap();
        assert_eq!(spec.offset(), 5);
        assert_eq!(spec.limit(), 5);
        assert_eq!(spec.sort_column(), Some("size"));
    }

    #[test]
    fn test_limit_is_capped() {
        let spec = PageSpec::new(1, 10_000);
        assert_eq!(spec.limit(), MAX_LIMIT);
    }

    #[test]
    fn test_non_numeric_page_rejected() {
        let err = PageSpec::parse::<Widgets>(&params("two", "", "", "")).unwrap_err();
        assert_eq!(
            err,
            PageError::InvalidNumber {
                field: "page",
                value: "two".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_sort_field_rejected() {
        let err = PageSpec::parse::<Widgets>(&params("", "", "drop table cars", "")).unwrap_err();
        assert_eq!(err, PageError::UnknownSortField("drop table cars".to_string()));
    }

    #[test]
    fn test_sort_field_is_case_sensitive() {
        assert!(PageSpec::default().sorted_by::<Widgets>("NAME").is_err());
    }

    #[test]
    fn test_blank_sort_and_filter_are_ignored() {
        let spec = PageSpec::parse::<Widgets>(&params("", "", "   ", "  ")).unwrap();
        assert!(spec.sort_column().is_none());
        assert!(spec.filter_text().is_none());
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        let spec = PageSpec::default().filtered_by("50%_off\\");
        assert_eq!(spec.like_pattern().as_deref(), Some("%50\\%\\_off\\\\%"));

        let spec = PageSpec::default().filtered_by("Volvo");
        assert_eq!(spec.like_pattern().as_deref(), Some("%Volvo%"));
    }

    #[test]
    fn test_filter_with_quotes_is_kept_verbatim() {
        let spec = PageSpec::default().filtered_by("' OR 1=1 --");
        assert_eq!(spec.filter_text(), Some("' OR 1=1 --"));
    }

    proptest! {
        #[test]
        fn prop_normalized_spec_is_bounded(page in any::<i64>(), limit in any::<i64>()) {
            let spec = PageSpec::new(page, limit);
            prop_assert!(spec.page() >= 1);
            prop_assert!(spec.limit() >= 1 && spec.limit() <= MAX_LIMIT);
            prop_assert!(spec.offset() >= 0);
        }

        #[test]
        fn prop_offset_matches_formula(page in 1i64..100_000, limit in 1i64..=MAX_LIMIT) {
            let spec = PageSpec::new(page, limit);
            prop_assert_eq!(spec.offset(), (page - 1) * limit);
        }

        #[test]
        fn prop_only_allowed_columns_accepted(field in "[a-z_ ]{0,16}") {
            let result = PageSpec::default().sorted_by::<Widgets>(&field);
            prop_assert_eq!(result.is_ok(), Widgets::SORTABLE.contains(&field.as_str()));
        }
    }
}
