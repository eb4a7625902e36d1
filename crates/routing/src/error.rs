//! 라우팅 설정 도메인 에러 타입
//!
//! [`ConfError`]는 설정 파일 로딩 과정에서 발생하는 모든 에러를 표현합니다.
//! `From<ConfError> for LogrouteError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.
//!
//! 범위를 벗어난 크기/회전 수는 에러가 아니라 경고 후 클램핑 대상이므로
//! 이 타입에 변형이 없습니다 (해당 로직은 `output` 모듈 참조).

use logroute_core::error::{LogrouteError, TableError};

/// 라우팅 설정 도메인 에러
///
/// 모든 변형은 문제가 된 그룹/키/값을 함께 담아, 사용자가 설정 파일의
/// 해당 줄을 바로 찾을 수 있도록 합니다.
#[derive(Debug, thiserror::Error)]
pub enum ConfError {
    /// 필터 표현식 또는 값 구문 오류
    #[error("syntax error in [{group}] {key}: {reason}")]
    Syntax {
        /// 그룹 이름
        group: String,
        /// 키 이름
        key: String,
        /// 오류 사유
        reason: String,
    },

    /// 정의되지 않은 출력 참조
    #[error("unknown output '{name}' referenced in [{group}] {key}")]
    Reference {
        /// 그룹 이름
        group: String,
        /// 키 이름
        key: String,
        /// 참조된 출력 이름
        name: String,
    },

    /// 레지스트리 용량 초과
    #[error("too many {what} definitions (max: {max})")]
    Capacity {
        /// 초과한 대상 (outputs 등)
        what: &'static str,
        /// 허용 최대 개수
        max: usize,
    },

    /// 구조 불변식 위반 (첫 출력/첫 컨텍스트 이름)
    #[error("expected {expected} definition, found '{found}'")]
    Structural {
        /// 기대한 이름
        expected: &'static str,
        /// 실제 이름
        found: String,
    },

    /// 필수 키 누락
    #[error("[{group}] missing required key '{key}'")]
    MissingKey {
        /// 그룹 이름
        group: String,
        /// 키 이름
        key: String,
    },

    /// 유효하지 않은 이름 (길이 초과, 빈 이름 등)
    #[error("invalid name '{name}': {reason}")]
    InvalidName {
        /// 문제가 된 이름
        name: String,
        /// 사유
        reason: String,
    },

    /// 설정 파일 형식 오류 (그룹 밖의 키, `=` 누락 등)
    #[error("key file error at line {line}: {reason}")]
    KeyFile {
        /// 1부터 시작하는 줄 번호
        line: usize,
        /// 오류 사유
        reason: String,
    },

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ConfError> for LogrouteError {
    fn from(err: ConfError) -> Self {
        LogrouteError::Table(TableError::LoadFailed(err.to_string()))
    }
}
