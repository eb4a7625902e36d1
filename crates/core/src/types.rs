//! 도메인 타입 — syslog 스타일 분류 체계와 로그 레코드
//!
//! 라우팅 규칙과 링 버퍼가 공유하는 데이터 구조를 정의합니다.
//! facility/level 코드 값은 syslog 규약을 그대로 따릅니다.

use std::fmt;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// syslog 심각도 레벨
///
/// 코드 값이 낮을수록 더 심각합니다 (`Emergency` = 0, `Debug` = 7).
/// `Ord` 구현으로 심각도 비교가 가능합니다 (`Emergency < Debug`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// 시스템 사용 불가
    Emergency = 0,
    /// 즉시 조치 필요
    Alert = 1,
    /// 치명적 상태
    Critical = 2,
    /// 에러
    Error = 3,
    /// 경고
    Warning = 4,
    /// 정상이지만 주목할 상태
    Notice = 5,
    /// 정보성
    Info = 6,
    /// 디버그
    Debug = 7,
}

impl LogLevel {
    /// 설정 파일에서 사용하는 레벨 이름으로 파싱합니다.
    ///
    /// 대소문자를 구분하지 않습니다. 알 수 없는 이름은 `None`입니다.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "emerg" => Some(Self::Emergency),
            "alert" => Some(Self::Alert),
            "crit" => Some(Self::Critical),
            "err" => Some(Self::Error),
            "warning" => Some(Self::Warning),
            "notice" => Some(Self::Notice),
            "info" => Some(Self::Info),
            "debug" => Some(Self::Debug),
            _ => None,
        }
    }

    /// syslog 숫자 코드를 반환합니다.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// syslog 숫자 코드에서 레벨을 복원합니다.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Emergency),
            1 => Some(Self::Alert),
            2 => Some(Self::Critical),
            3 => Some(Self::Error),
            4 => Some(Self::Warning),
            5 => Some(Self::Notice),
            6 => Some(Self::Info),
            7 => Some(Self::Debug),
            _ => None,
        }
    }

    /// 설정 파일 표기용 이름을 반환합니다.
    pub fn name(self) -> &'static str {
        match self {
            Self::Emergency => "emerg",
            Self::Alert => "alert",
            Self::Critical => "crit",
            Self::Error => "err",
            Self::Warning => "warning",
            Self::Notice => "notice",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// syslog facility
///
/// 로그 레코드를 발생시킨 서브시스템 분류입니다.
/// 코드 12~15 (ntp, security, console, solaris-cron)는
/// 설정 파일 어휘에 포함되지 않으므로 정의하지 않습니다.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Facility {
    /// 커널 메시지
    Kern = 0,
    /// 사용자 프로세스
    User = 1,
    /// 메일 시스템
    Mail = 2,
    /// 시스템 데몬
    Daemon = 3,
    /// 인증
    Auth = 4,
    /// syslog 내부
    Syslog = 5,
    /// 프린터
    Lpr = 6,
    /// 뉴스
    News = 7,
    /// UUCP
    Uucp = 8,
    /// cron
    Cron = 9,
    /// 비공개 인증
    Authpriv = 10,
    /// FTP
    Ftp = 11,
    /// 로컬 0
    Local0 = 16,
    /// 로컬 1
    Local1 = 17,
    /// 로컬 2
    Local2 = 18,
    /// 로컬 3
    Local3 = 19,
    /// 로컬 4
    Local4 = 20,
    /// 로컬 5
    Local5 = 21,
    /// 로컬 6
    Local6 = 22,
    /// 로컬 7
    Local7 = 23,
}

impl Facility {
    /// 설정 파일에서 사용하는 facility 이름으로 파싱합니다.
    ///
    /// 대소문자를 구분하지 않습니다. 알 수 없는 이름은 `None`입니다.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "kern" => Some(Self::Kern),
            "user" => Some(Self::User),
            "mail" => Some(Self::Mail),
            "daemon" => Some(Self::Daemon),
            "auth" => Some(Self::Auth),
            "syslog" => Some(Self::Syslog),
            "lpr" => Some(Self::Lpr),
            "news" => Some(Self::News),
            "uucp" => Some(Self::Uucp),
            "cron" => Some(Self::Cron),
            "authpriv" => Some(Self::Authpriv),
            "ftp" => Some(Self::Ftp),
            "local0" => Some(Self::Local0),
            "local1" => Some(Self::Local1),
            "local2" => Some(Self::Local2),
            "local3" => Some(Self::Local3),
            "local4" => Some(Self::Local4),
            "local5" => Some(Self::Local5),
            "local6" => Some(Self::Local6),
            "local7" => Some(Self::Local7),
            _ => None,
        }
    }

    /// syslog 숫자 코드를 반환합니다.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// syslog 숫자 코드에서 facility를 복원합니다.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Kern),
            1 => Some(Self::User),
            2 => Some(Self::Mail),
            3 => Some(Self::Daemon),
            4 => Some(Self::Auth),
            5 => Some(Self::Syslog),
            6 => Some(Self::Lpr),
            7 => Some(Self::News),
            8 => Some(Self::Uucp),
            9 => Some(Self::Cron),
            10 => Some(Self::Authpriv),
            11 => Some(Self::Ftp),
            16 => Some(Self::Local0),
            17 => Some(Self::Local1),
            18 => Some(Self::Local2),
            19 => Some(Self::Local3),
            20 => Some(Self::Local4),
            21 => Some(Self::Local5),
            22 => Some(Self::Local6),
            23 => Some(Self::Local7),
            _ => None,
        }
    }

    /// 설정 파일 표기용 이름을 반환합니다.
    pub fn name(self) -> &'static str {
        match self {
            Self::Kern => "kern",
            Self::User => "user",
            Self::Mail => "mail",
            Self::Daemon => "daemon",
            Self::Auth => "auth",
            Self::Syslog => "syslog",
            Self::Lpr => "lpr",
            Self::News => "news",
            Self::Uucp => "uucp",
            Self::Cron => "cron",
            Self::Authpriv => "authpriv",
            Self::Ftp => "ftp",
            Self::Local0 => "local0",
            Self::Local1 => "local1",
            Self::Local2 => "local2",
            Self::Local3 => "local3",
            Self::Local4 => "local4",
            Self::Local5 => "local5",
            Self::Local6 => "local6",
            Self::Local7 => "local7",
        }
    }
}

impl fmt::Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 로그 레코드
///
/// 라우팅 테이블이 출력 대상을 결정할 때 참조하는 단위입니다.
/// 수신/파싱 계층은 이 크레이트 범위 밖이며, 레코드는 이미
/// facility/level/program이 분리된 상태로 전달됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    /// 발생 서브시스템
    pub facility: Facility,
    /// 심각도
    pub level: LogLevel,
    /// 발생 프로그램명 (비어 있을 수 있음)
    pub program: String,
    /// 로그 메시지
    pub message: String,
    /// 발생 시각
    pub timestamp: SystemTime,
}

impl LogRecord {
    /// 새 레코드를 생성합니다. 시각은 호출 시점으로 설정됩니다.
    pub fn new(
        facility: Facility,
        level: LogLevel,
        program: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            facility,
            level,
            program: program.into(),
            message: message.into(),
            timestamp: SystemTime::now(),
        }
    }

    /// syslog PRI 값을 반환합니다 (`facility * 8 + level`).
    pub fn pri(&self) -> u8 {
        self.facility.code() * 8 + self.level.code()
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}.{}] {}: {}",
            self.facility, self.level, self.program, self.message,
        )
    }
}
