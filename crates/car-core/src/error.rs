//! 설정 및 도메인 공통 에러 타입.

use thiserror::Error;

/// 핵심 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 설정 소스 로드/역직렬화 실패
    #[error("설정 에러: {0}")]
    Config(#[from] config::ConfigError),

    /// 필수 설정 누락
    #[error("필수 설정이 없습니다: {0}")]
    MissingSetting(&'static str),

    /// 설정 값이 유효하지 않음
    #[error("설정 값이 유효하지 않습니다 ({key}): {reason}")]
    InvalidSetting {
        key: &'static str,
        reason: String,
    },
}

/// 코어 작업을 위한 Result 타입.
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// 잘못된 설정 값 에러 생성.
    pub fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        CoreError::InvalidSetting {
            key,
            reason: reason.into(),
        }
    }
}
