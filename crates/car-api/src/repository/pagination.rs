//! 페이지 단위 목록 쿼리 빌더.
//!
//! [`PageSpec`]을 리소스 테이블 하나에 대한 SELECT 문으로 변환합니다.
//! 쿼리 텍스트에 들어가는 식별자는 [`Listable`]의 정적 상수뿐이며,
//! 사용자 입력(필터 텍스트, limit, offset)은 모두 바인딩 파라미터입니다.

use sqlx::{postgres::PgRow, FromRow, PgPool, Postgres, QueryBuilder};
use tracing::debug;

use car_core::{Listable, PageSpec};

use super::RepoError;

/// 목록 쿼리 생성.
///
/// ```sql
/// SELECT {COLUMNS} FROM {TABLE}
/// [WHERE (c1 LIKE $1 OR c2 LIKE $2 ...)]
/// [ORDER BY {sort} ASC, id ASC]
/// LIMIT $n OFFSET $m
/// ```
pub fn build_page_query<R: Listable>(spec: &PageSpec) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT ");
    builder.push(R::COLUMNS);
    builder.push(" FROM ");
    builder.push(R::TABLE);

    if let Some(pattern) = spec.like_pattern() {
        if !R::SEARCHABLE.is_empty() {
            builder.push(" WHERE (");
            for (i, column) in R::SEARCHABLE.iter().enumerate() {
                if i > 0 {
                    builder.push(" OR ");
                }
                builder.push(*column);
                builder.push(" LIKE ");
                builder.push_bind(pattern.clone());
            }
            builder.push(")");
        }
    }

    if let Some(column) = spec.sort_column() {
        builder.push(" ORDER BY ");
        builder.push(column);
        builder.push(" ASC");
        if column != "id" {
            builder.push(", id ASC");
        }
    }

    builder.push(" LIMIT ");
    builder.push_bind(spec.limit());
    builder.push(" OFFSET ");
    builder.push_bind(spec.offset());

    builder
}

/// 한 페이지 조회.
///
/// `L`은 테이블 메타데이터, `T`는 행 매핑 타입입니다.
pub async fn fetch_page<L, T>(pool: &PgPool, spec: &PageSpec) -> Result<Vec<T>, RepoError>
where
    L: Listable,
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let mut builder = build_page_query::<L>(spec);
    debug!(
        table = L::TABLE,
        page = spec.page(),
        limit = spec.limit(),
        sort = ?spec.sort_column(),
        filtered = spec.filter_text().is_some(),
        "Fetching page"
    );

    let rows = builder.build_query_as::<T>().fetch_all(pool).await?;
    Ok(rows)
}
