//! 사용자 평점.

use serde::{Deserialize, Serialize};

use crate::page::Listable;

/// 최소 별점.
pub const MIN_STARS: i32 = 1;
/// 최대 별점.
pub const MAX_STARS: i32 = 5;

/// 저장된 평점.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Rating {
    pub id: i64,
    pub car_id: i64,
    /// 작성자 (토큰의 subject)
    pub user_id: i64,
    pub stars: i32,
    pub comment: String,
}

/// 평점 생성 입력.
///
/// 작성자는 인증된 사용자로 고정되므로 입력에 포함하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRating {
    pub car_id: i64,
    pub user_id: i64,
    pub stars: i32,
    pub comment: String,
}

impl Rating {
    /// 별점 범위 검사.
    pub fn stars_in_range(stars: i32) -> bool {
        (MIN_STARS..=MAX_STARS).contains(&stars)
    }
}

impl Listable for Rating {
    const TABLE: &'static str = "ratings";
    const COLUMNS: &'static str = "id, car_id, user_id, stars, comment";
    const SORTABLE: &'static [&'static str] = &["id", "car_id", "user_id", "stars"];
    const SEARCHABLE: &'static [&'static str] = &["comment"];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stars_range() {
        assert!(!Rating::stars_in_range(0));
        assert!(Rating::stars_in_range(1));
        assert!(Rating::stars_in_range(5));
        assert!(!Rating::stars_in_range(6));
    }
}
