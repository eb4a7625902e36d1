//! 데몬 운영 설정 — logroute.toml 파싱 및 런타임 설정
//!
//! [`Settings`]는 데몬 자체의 운영 설정(로깅, PID 파일, 라우팅 설정 파일
//! 경로)을 담습니다. 출력/컨텍스트를 기술하는 라우팅 설정 파일과는
//! 별개의 파일이며, 그 파일의 파싱은 `logroute-routing`이 담당합니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선, 데몬에서 적용)
//! 2. 환경변수 (`LOGROUTE_GENERAL_LOG_LEVEL=debug` 형식)
//! 3. 설정 파일 (`logroute.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), logroute_core::error::LogrouteError> {
//! use logroute_core::settings::Settings;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let settings = Settings::load("/etc/logroute/logroute.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let settings = Settings::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LogrouteError, SettingsError};

/// logroute 데몬 설정
///
/// `logroute.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralSettings,
    /// 라우팅 설정
    #[serde(default)]
    pub routing: RoutingSettings,
}

impl Settings {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, LogrouteError> {
        let mut settings = Self::from_file(path).await?;
        settings.apply_env_overrides();
        settings.validate()?;
        Ok(settings)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, LogrouteError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LogrouteError::Settings(SettingsError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                LogrouteError::Io(e)
            }
        })?;
        let settings = Self::parse(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, LogrouteError> {
        toml::from_str(toml_str).map_err(|e| {
            LogrouteError::Settings(SettingsError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `LOGROUTE_{SECTION}_{FIELD}`
    /// 예: `LOGROUTE_ROUTING_CONF_FILE=/tmp/test.conf`
    pub fn apply_env_overrides(&mut self) {
        override_string(&mut self.general.log_level, "LOGROUTE_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "LOGROUTE_GENERAL_LOG_FORMAT");
        override_string(&mut self.general.pid_file, "LOGROUTE_GENERAL_PID_FILE");

        override_string(&mut self.routing.conf_file, "LOGROUTE_ROUTING_CONF_FILE");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LogrouteError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(SettingsError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(SettingsError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.routing.conf_file.is_empty() {
            return Err(SettingsError::InvalidValue {
                field: "routing.conf_file".to_owned(),
                reason: "conf_file must not be empty".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
    /// PID 파일 경로 (빈 문자열이면 PID 파일을 쓰지 않음)
    pub pid_file: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
            pid_file: "/var/run/logroute.pid".to_owned(),
        }
    }
}

/// 라우팅 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingSettings {
    /// 라우팅 설정 파일 경로 (출력/컨텍스트 정의)
    pub conf_file: String,
}

impl Default for RoutingSettings {
    fn default() -> Self {
        Self {
            conf_file: "/etc/logroute/logroute.conf".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        tracing::debug!(env_key, value = val.as_str(), "applying environment override");
        *target = val;
    }
}
