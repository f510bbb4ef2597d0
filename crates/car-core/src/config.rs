//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//!
//! 로드 순서 (뒤쪽이 우선):
//! 1. 코드 기본값
//! 2. `config/default.toml` (선택)
//! 3. `CAR__SECTION__KEY` 형식의 환경 변수
//! 4. `DATABASE_URL`, `JWT_SECRET` 환경 변수
//!
//! JWT 시크릿과 데이터베이스 URL에는 기본값이 없습니다.
//! 둘 중 하나라도 없으면 [`AppConfig::validate`]가 실패하고 서버는 시작되지 않습니다.

use config::builder::DefaultState;
use config::ConfigBuilder;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use std::path::Path;

use crate::error::{CoreError, CoreResult};

/// HS256 서명 키 최소 길이 (바이트).
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// 애플리케이션 설정.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 데이터베이스 설정
    pub database: DatabaseConfig,
    /// 인증 설정
    pub auth: AuthConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 30,
        }
    }
}

/// 데이터베이스 설정.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// PostgreSQL 연결 URL
    #[serde(deserialize_with = "deserialize_secret")]
    pub url: Option<SecretString>,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 획득 타임아웃 (초)
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            acquire_timeout_secs: 10,
        }
    }
}

/// 인증 설정.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 서명용 공유 시크릿
    #[serde(deserialize_with = "deserialize_secret")]
    pub jwt_secret: Option<SecretString>,
    /// Access token 유효 시간 (시간)
    pub token_ttl_hours: i64,
    /// 만료된 토큰을 갱신할 수 있는 유예 기간 (시간)
    pub renew_grace_hours: i64,
    /// 동시에 실행할 수 있는 비밀번호 해싱 작업 수
    pub hash_concurrency: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_hours: 72,
            renew_grace_hours: 168,
            hash_concurrency: 4,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "car_api=info,tower_http=info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()).map(SecretString::from))
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드하고 검증합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let builder = config::Config::builder()
            // 파일에서 로드 (없어도 됨)
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("CAR")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("auth.jwt_secret", std::env::var("JWT_SECRET").ok())?;

        let config = Self::from_builder(builder)?;
        config.validate()?;
        Ok(config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> CoreResult<Self> {
        Self::load("config/default.toml")
    }

    /// 이미 구성된 builder에서 설정을 역직렬화합니다 (검증 없음).
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> CoreResult<Self> {
        Ok(builder.build()?.try_deserialize()?)
    }

    /// 시작 전에 반드시 충족해야 하는 조건을 검사합니다.
    pub fn validate(&self) -> CoreResult<()> {
        let secret = self
            .auth
            .jwt_secret
            .as_ref()
            .ok_or(CoreError::MissingSetting("auth.jwt_secret"))?;
        if secret.expose_secret().len() < MIN_JWT_SECRET_LEN {
            return Err(CoreError::invalid(
                "auth.jwt_secret",
                format!("at least {} bytes required", MIN_JWT_SECRET_LEN),
            ));
        }

        if self.database.url.is_none() {
            return Err(CoreError::MissingSetting("database.url"));
        }

        if self.auth.token_ttl_hours <= 0 {
            return Err(CoreError::invalid("auth.token_ttl_hours", "must be positive"));
        }
        if self.auth.renew_grace_hours < 0 {
            return Err(CoreError::invalid(
                "auth.renew_grace_hours",
                "must not be negative",
            ));
        }
        if self.auth.hash_concurrency == 0 {
            return Err(CoreError::invalid("auth.hash_concurrency", "must be at least 1"));
        }

        Ok(())
    }

    /// 소켓 주소 문자열 (`host:port`).
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
