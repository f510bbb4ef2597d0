//! 자격 증명 저장소.
//!
//! 사용자 이름과 솔트된 비밀번호 해시를 보관합니다.
//! 핸들러는 [`CredentialStore`] trait 객체를 통해서만 접근하므로
//! 테스트에서는 인메모리 구현으로 교체할 수 있습니다.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::{debug, info};

use super::RepoError;

/// 저장된 자격 증명.
///
/// `password_hash`는 PHC 형식 문자열이며 평문은 저장하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Credential {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

/// 자격 증명 저장소 인터페이스.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// 새 사용자 생성. 이미 존재하는 이름이면 `RepoError::Conflict`.
    async fn create_user(&self, username: &str, password_hash: &str)
        -> Result<Credential, RepoError>;

    /// 이름으로 조회.
    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>, RepoError>;

    /// ID로 조회.
    async fn find_by_id(&self, id: i64) -> Result<Option<Credential>, RepoError>;
}

// ==================== PostgreSQL ====================

/// PostgreSQL 자격 증명 저장소.
#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<Credential, RepoError> {
        let credential = sqlx::query_as::<_, Credential>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepoError::from_write(e, "username", "user"))?;

        info!(user_id = credential.id, username = %credential.username, "User created");
        Ok(credential)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>, RepoError> {
        let credential = sqlx::query_as::<_, Credential>(
            "SELECT id, username, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        debug!(username = %username, found = credential.is_some(), "Credential lookup");
        Ok(credential)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Credential>, RepoError> {
        let credential = sqlx::query_as::<_, Credential>(
            "SELECT id, username, password_hash FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(credential)
    }
}

// ==================== In-memory (테스트용) ====================

#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryCredentialStore;

#[cfg(any(test, feature = "test-utils"))]
mod memory {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::{Credential, CredentialStore, RepoError};

    /// 인메모리 자격 증명 저장소.
    #[derive(Debug, Default)]
    pub struct MemoryCredentialStore {
        users: Mutex<Vec<Credential>>,
    }

    impl MemoryCredentialStore {
        pub fn new() -> Self {
            Self::default()
        }

        fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Credential>> {
            self.users.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
        }
    }

    #[async_trait]
    impl CredentialStore for MemoryCredentialStore {
        async fn create_user(
            &self,
            username: &str,
            password_hash: &str,
        ) -> Result<Credential, RepoError> {
            let mut users = self.lock();
            if users.iter().any(|c| c.username == username) {
                return Err(RepoError::Conflict("username".to_string()));
            }

            let credential = Credential {
                id: users.len() as i64 + 1,
                username: username.to_string(),
                password_hash: password_hash.to_string(),
            };
            users.push(credential.clone());
            Ok(credential)
        }

        async fn find_by_username(
            &self,
            username: &str,
        ) -> Result<Option<Credential>, RepoError> {
            Ok(self.lock().iter().find(|c| c.username == username).cloned())
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<Credential>, RepoError> {
            Ok(self.lock().iter().find(|c| c.id == id).cloned())
        }
    }
}
