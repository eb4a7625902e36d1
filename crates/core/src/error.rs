//! 에러 타입 — 도메인별 에러 정의

/// logroute 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum LogrouteError {
    /// 데몬 설정 관련 에러
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),

    /// 라우팅 테이블 구성 에러
    #[error("table error: {0}")]
    Table(#[from] TableError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 데몬 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// 설정 파일을 찾을 수 없음
    #[error("settings file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse settings: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid settings value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 라우팅 테이블 구성 에러
///
/// 설정 파일 로딩이 실패하면 `logroute-routing`의 도메인 에러가
/// 이 타입으로 변환되어 상위 레이어로 전파됩니다.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// 테이블 로딩 실패
    #[error("table load failed: {0}")]
    LoadFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_error_display() {
        let err = LogrouteError::Settings(SettingsError::InvalidValue {
            field: "general.log_level".to_owned(),
            reason: "must be one of: trace, debug, info, warn, error".to_owned(),
        });
        let msg = err.to_string();
        assert!(msg.contains("log_level"));
        assert!(msg.contains("trace"));
    }

    #[test]
    fn table_error_display() {
        let err = LogrouteError::Table(TableError::LoadFailed(
            "unknown output 'errlog'".to_owned(),
        ));
        assert!(err.to_string().contains("errlog"));
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: LogrouteError = io.into();
        assert!(matches!(err, LogrouteError::Io(_)));
    }
}
