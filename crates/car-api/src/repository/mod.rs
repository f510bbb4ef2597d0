//! Repository pattern for database operations.
//!
//! 데이터베이스 접근 로직을 라우트 핸들러에서 분리하여 관리합니다.
//! 리소스 Repository는 static methods 패턴을 사용하고,
//! 자격 증명 저장소만 주입 가능한 trait 객체([`CredentialStore`])로 제공합니다.

pub mod cars;
pub mod history;
pub mod pagination;
pub mod ratings;
pub mod users;

pub use cars::CarRepository;
pub use history::{CarHistoryRecord, HistoryRepository};
pub use pagination::{build_page_query, fetch_page};
pub use ratings::RatingRepository;
pub use users::{Credential, CredentialStore, PgCredentialStore};

#[cfg(any(test, feature = "test-utils"))]
pub use users::MemoryCredentialStore;

/// PostgreSQL unique_violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL foreign_key_violation SQLSTATE.
const FOREIGN_KEY_VIOLATION: &str = "23503";
/// PostgreSQL string_data_right_truncation SQLSTATE.
const STRING_TOO_LONG: &str = "22001";
/// PostgreSQL numeric_value_out_of_range SQLSTATE.
const NUMERIC_OUT_OF_RANGE: &str = "22003";

/// 저장소 에러.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// 중복 (유니크 제약 위반)
    #[error("{0} already exists")]
    Conflict(String),

    /// 대상 행 없음
    #[error("{0} not found")]
    NotFound(String),

    /// 참조 대상 행 없음 (외래 키 위반)
    #[error("referenced {0} does not exist")]
    MissingReference(String),

    /// 컬럼 범위를 벗어난 값
    #[error("value out of range: {0}")]
    InvalidValue(String),

    /// DB 접근 실패
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// 저장된 값이 도메인 규칙에 맞지 않음
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

impl RepoError {
    /// 쓰기 실패 분류.
    ///
    /// 유니크 제약 위반은 `Conflict(unique)`, 외래 키 위반은
    /// `MissingReference(reference)`, 숫자/문자열 범위 초과는 `InvalidValue`,
    /// 그 외에는 `Database`.
    pub(crate) fn from_write(e: sqlx::Error, unique: &str, reference: &str) -> Self {
        let (code, message) = match &e {
            sqlx::Error::Database(db) => (
                db.code().map(|c| c.into_owned()),
                db.message().to_string(),
            ),
            _ => (None, String::new()),
        };
        match code.as_deref() {
            Some(UNIQUE_VIOLATION) => RepoError::Conflict(unique.to_string()),
            Some(FOREIGN_KEY_VIOLATION) => RepoError::MissingReference(reference.to_string()),
            Some(STRING_TOO_LONG | NUMERIC_OUT_OF_RANGE) => RepoError::InvalidValue(message),
            _ => RepoError::Database(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use std::error::Error as StdError;

    /// 지정한 SQLSTATE를 가진 DB 에러.
    #[derive(Debug)]
    struct SqlState(&'static str);

    impl std::fmt::Display for SqlState {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "sqlstate {}", self.0)
        }
    }

    impl StdError for SqlState {}

    impl sqlx::error::DatabaseError for SqlState {
        fn message(&self) -> &str {
            "numeric field overflow"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.0))
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::Other
        }
    }

    fn classify(code: &'static str) -> RepoError {
        RepoError::from_write(
            sqlx::Error::Database(Box::new(SqlState(code))),
            "username",
            "car",
        )
    }

    #[test]
    fn test_from_write_classifies_sqlstate() {
        assert!(matches!(classify(UNIQUE_VIOLATION), RepoError::Conflict(w) if w == "username"));
        assert!(matches!(
            classify(FOREIGN_KEY_VIOLATION),
            RepoError::MissingReference(w) if w == "car"
        ));
        assert!(matches!(classify("40001"), RepoError::Database(_)));
    }

    #[test]
    fn test_out_of_range_values_are_client_errors() {
        for code in [NUMERIC_OUT_OF_RANGE, STRING_TOO_LONG] {
            assert!(matches!(
                classify(code),
                RepoError::InvalidValue(m) if m == "numeric field overflow"
            ));
        }
    }

    #[test]
    fn test_non_database_errors_pass_through() {
        let error = RepoError::from_write(sqlx::Error::RowNotFound, "username", "car");
        assert!(matches!(error, RepoError::Database(sqlx::Error::RowNotFound)));
    }
}
