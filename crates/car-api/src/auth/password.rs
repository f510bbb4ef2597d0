//! 비밀번호 해싱 유틸리티.
//!
//! Argon2id 기반 비밀번호 해싱 및 검증.
//! 해싱은 CPU 집약적이므로 blocking 스레드풀에서 실행하고,
//! 세마포어로 동시 실행 수를 제한합니다.

use std::sync::Arc;

use argon2::{
    password_hash::{
        self, rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use tokio::sync::Semaphore;

use car_core::CoreError;

/// Argon2 메모리 비용 (KiB).
pub const ARGON2_MEMORY_KIB: u32 = 19_456;
/// Argon2 반복 횟수.
pub const ARGON2_ITERATIONS: u32 = 2;
/// Argon2 병렬도.
pub const ARGON2_PARALLELISM: u32 = 1;

/// 존재하지 않는 사용자 검증에 쓰는 고정 입력.
const DUMMY_PASSWORD: &str = "car-registry-dummy-password";

/// 비밀번호 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("비밀번호 해싱 실패")]
    HashingFailed,
    #[error("잘못된 해시 형식")]
    InvalidHashFormat,
    #[error("해싱 작업 실행 실패")]
    TaskFailed,
}

/// 비밀번호 해싱 서비스.
///
/// 복제 비용이 작으며 모든 복제본이 같은 세마포어를 공유합니다.
#[derive(Clone)]
pub struct PasswordService {
    argon2: Argon2<'static>,
    permits: Arc<Semaphore>,
    /// 같은 파라미터로 만든 PHC 해시 (생성 시 한 번 계산)
    dummy_hash: Arc<str>,
}

impl std::fmt::Debug for PasswordService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordService")
            .field("available_permits", &self.permits.available_permits())
            .finish()
    }
}

impl PasswordService {
    /// 고정 파라미터로 서비스 생성.
    ///
    /// `concurrency`는 동시에 실행 가능한 해싱/검증 작업 수입니다.
    pub fn new(concurrency: usize) -> Result<Self, CoreError> {
        if concurrency == 0 {
            return Err(CoreError::invalid("auth.hash_concurrency", "must be at least 1"));
        }

        let params = Params::new(ARGON2_MEMORY_KIB, ARGON2_ITERATIONS, ARGON2_PARALLELISM, None)
            .map_err(|e| CoreError::invalid("argon2.params", e.to_string()))?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let salt = SaltString::generate(&mut OsRng);
        let dummy_hash = argon2
            .hash_password(DUMMY_PASSWORD.as_bytes(), &salt)
            .map_err(|e| CoreError::invalid("argon2.params", e.to_string()))?
            .to_string();

        Ok(Self {
            argon2,
            permits: Arc::new(Semaphore::new(concurrency)),
            dummy_hash: Arc::from(dummy_hash),
        })
    }

    /// 비밀번호 해싱.
    ///
    /// 매 호출마다 새 솔트를 생성하므로 같은 입력이라도 결과가 다릅니다.
    /// 반환값은 PHC 형식 문자열입니다 (`$argon2id$v=19$m=19456,t=2,p=1$...`).
    pub async fn hash(&self, password: String) -> Result<String, PasswordError> {
        let _permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| PasswordError::TaskFailed)?;
        let argon2 = self.argon2.clone();

        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|_| PasswordError::HashingFailed)
        })
        .await
        .map_err(|_| PasswordError::TaskFailed)?
    }

    /// 비밀번호 검증.
    ///
    /// 불일치는 `Ok(false)`, 저장된 해시가 손상된 경우만 에러입니다.
    /// 해시에 기록된 파라미터로 검증하므로 이전 파라미터의 해시도 검증됩니다.
    pub async fn verify(&self, password: String, hash: String) -> Result<bool, PasswordError> {
        let _permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| PasswordError::TaskFailed)?;
        let argon2 = self.argon2.clone();

        tokio::task::spawn_blocking(move || {
            let parsed = PasswordHash::new(&hash).map_err(|_| PasswordError::InvalidHashFormat)?;
            match argon2.verify_password(password.as_bytes(), &parsed) {
                Ok(()) => Ok(true),
                Err(password_hash::Error::Password) => Ok(false),
                Err(_) => Err(PasswordError::InvalidHashFormat),
            }
        })
        .await
        .map_err(|_| PasswordError::TaskFailed)?
    }

    /// 고정 해시에 대해 검증하고 결과는 버립니다.
    ///
    /// 사용자가 없는 로그인 시도도 실제 검증과 같은 Argon2 비용을 치르게 합니다.
    pub async fn verify_dummy(&self, password: String) -> Result<(), PasswordError> {
        self.verify(password, self.dummy_hash.to_string())
            .await
            .map(|_| ())
    }

    #[cfg(test)]
    pub(crate) fn permits(&self) -> &Arc<Semaphore> {
        &self.permits
    }
}
