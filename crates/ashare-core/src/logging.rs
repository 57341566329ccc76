//! tracing을 사용한 로깅 초기화.
//!
//! 출력 형식:
//! - **pretty**: 터미널에서 읽기 쉬운 형식 (기본값)
//! - **json**: 수집 결과를 로그 수집기로 보낼 때
//! - **compact**: 전 종목 수집처럼 로그가 많을 때

use std::env;
use std::str::FromStr;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{CoreError, CoreResult};

/// 출력 형식을 지정하는 환경 변수.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

impl FromStr for LogFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            other => Err(CoreError::Config(format!(
                "알 수 없는 로그 형식: {} (pretty, json, compact)",
                other
            ))),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 필터 (예: "info", "ashare_data=debug")
    pub level: String,
    pub format: LogFormat,
    /// 파일명과 줄 번호 포함 여부
    pub with_file: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            with_file: false,
        }
    }
}

impl LogConfig {
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Default::default()
        }
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_file(mut self, enabled: bool) -> Self {
        self.with_file = enabled;
        self
    }

    /// 환경 변수에서 생성합니다.
    ///
    /// `RUST_LOG`가 없으면 `info`, `LOG_FORMAT`이 없으면 `pretty`.
    /// `LOG_FORMAT` 값이 잘못되면 에러를 반환합니다.
    pub fn from_env() -> CoreResult<Self> {
        Self::from_env_values(env::var("RUST_LOG").ok(), env::var(LOG_FORMAT_ENV).ok())
    }

    fn from_env_values(level: Option<String>, format: Option<String>) -> CoreResult<Self> {
        let mut config = Self::default();
        if let Some(level) = level.filter(|l| !l.trim().is_empty()) {
            config.level = level;
        }
        if let Some(format) = format.filter(|f| !f.trim().is_empty()) {
            config.format = format.parse()?;
        }
        Ok(config)
    }

    /// `[logging]` 설정 섹션에서 생성합니다.
    ///
    /// 형식 우선순위: `format_override`(CLI `--log-format`) > `LOG_FORMAT` > 설정 파일.
    /// 레벨은 설정 파일 값을 쓰고, `RUST_LOG`는 `init_logging`에서 우선 적용됩니다.
    pub fn from_settings(settings: &LoggingConfig, format_override: Option<&str>) -> CoreResult<Self> {
        Self::layered(settings, format_override, env::var(LOG_FORMAT_ENV).ok().as_deref())
    }

    fn layered(
        settings: &LoggingConfig,
        format_override: Option<&str>,
        env_format: Option<&str>,
    ) -> CoreResult<Self> {
        let format = format_override
            .or(env_format.filter(|f| !f.trim().is_empty()))
            .unwrap_or(settings.format.as_str())
            .parse()?;
        Ok(Self::new(settings.level.clone()).with_format(format))
    }
}

/// 로깅을 초기화합니다.
///
/// `RUST_LOG`가 설정되어 있으면 그 필터가 `level`보다 우선합니다.
/// 이미 초기화된 경우 에러를 반환합니다.
///
/// ```no_run
/// use ashare_core::logging::{init_logging, LogConfig, LogFormat};
///
/// let config = LogConfig::new("ashare_data=debug").with_format(LogFormat::Compact);
/// init_logging(config).ok();
/// ```
pub fn init_logging(config: LogConfig) -> CoreResult<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| CoreError::Config(format!("잘못된 로그 레벨 '{}': {}", config.level, e)))?,
    };

    let pretty = (config.format == LogFormat::Pretty).then(|| {
        fmt::layer()
            .pretty()
            .with_file(config.with_file)
            .with_line_number(config.with_file)
    });
    let json = (config.format == LogFormat::Json).then(|| {
        fmt::layer()
            .json()
            .with_file(config.with_file)
            .with_line_number(config.with_file)
    });
    let compact = (config.format == LogFormat::Compact).then(|| {
        fmt::layer()
            .compact()
            .with_target(false)
            .with_file(config.with_file)
            .with_line_number(config.with_file)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(pretty)
        .with(json)
        .with(compact)
        .try_init()
        .map_err(|e| CoreError::Config(format!("로깅 초기화 실패: {}", e)))?;

    tracing::debug!(format = ?config.format, level = %config.level, "Logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert_eq!(" JSON ".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!(matches!("xml".parse::<LogFormat>(), Err(CoreError::Config(_))));
    }

    #[test]
    fn test_from_settings_override() {
        let settings = LoggingConfig {
            level: "debug".to_string(),
            format: "json".to_string(),
        };

        let config = LogConfig::layered(&settings, None, None).unwrap();
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Json);

        let config = LogConfig::layered(&settings, Some("compact"), Some("pretty")).unwrap();
        assert_eq!(config.format, LogFormat::Compact);

        assert!(LogConfig::layered(&settings, Some("yaml"), None).is_err());
    }

    #[test]
    fn test_env_format_overrides_settings() {
        let settings = LoggingConfig {
            level: "info".to_string(),
            format: "pretty".to_string(),
        };

        let config = LogConfig::layered(&settings, None, Some("json")).unwrap();
        assert_eq!(config.format, LogFormat::Json);

        // 빈 값은 무시
        let config = LogConfig::layered(&settings, None, Some("")).unwrap();
        assert_eq!(config.format, LogFormat::Pretty);

        assert!(LogConfig::layered(&settings, None, Some("xml")).is_err());
    }

    #[test]
    fn test_from_env_values() {
        let config =
            LogConfig::from_env_values(Some("ashare_data=debug".to_string()), Some("json".to_string()))
                .unwrap();
        assert_eq!(config.level, "ashare_data=debug");
        assert_eq!(config.format, LogFormat::Json);

        let config = LogConfig::from_env_values(None, None).unwrap();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Pretty);

        let err = LogConfig::from_env_values(None, Some("xml".to_string())).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }
}
