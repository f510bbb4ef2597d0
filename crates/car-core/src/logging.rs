//! tracing 기반 로깅 초기화.
//!
//! [`LoggingConfig`]의 `format` 값에 따라 출력 레이어를 고릅니다:
//! - `pretty`: 개발용 여러 줄 출력
//! - `json`: 로그 수집기용 한 줄 JSON
//! - `compact`: 한 줄 텍스트
//!
//! `RUST_LOG`가 설정되어 있으면 `level`보다 우선합니다.

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::config::LoggingConfig;

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("pretty") {
            Ok(LogFormat::Pretty)
        } else if s.eq_ignore_ascii_case("json") {
            Ok(LogFormat::Json)
        } else if s.eq_ignore_ascii_case("compact") {
            Ok(LogFormat::Compact)
        } else {
            Err(format!("Unknown log format: {}", s))
        }
    }
}

/// 해석된 로깅 설정.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// EnvFilter 지시문 (예: `car_api=debug,tower_http=info`)
    pub level: String,
    pub format: LogFormat,
}

impl From<&LoggingConfig> for LogConfig {
    fn from(config: &LoggingConfig) -> Self {
        // 알 수 없는 형식은 pretty로 대체
        Self {
            level: config.level.clone(),
            format: config.format.parse().unwrap_or_default(),
        }
    }
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn output_layer(format: LogFormat) -> BoxedLayer {
    match format {
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
        LogFormat::Json => fmt::layer().json().with_current_span(true).boxed(),
        LogFormat::Compact => fmt::layer().compact().boxed(),
    }
}

/// 전역 subscriber 설치.
///
/// 프로세스당 한 번만 호출할 수 있으며, 두 번째 호출은 에러를 반환합니다.
///
/// ```no_run
/// use car_core::logging::{init_logging, LogConfig, LogFormat};
///
/// init_logging(LogConfig {
///     level: "car_api=debug".to_string(),
///     format: LogFormat::Json,
/// })
/// .unwrap();
/// ```
pub fn init_logging(config: LogConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?;

    tracing_subscriber::registry()
        .with(output_layer(config.format))
        .with(filter)
        .try_init()?;

    tracing::info!(format = ?config.format, level = %config.level, "Logging initialized");
    Ok(())
}
