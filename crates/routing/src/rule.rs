//! 라우팅 규칙 — 필터 표현식 컴파일 및 레코드 매칭
//!
//! 규칙 표현식 문법:
//!
//! ```text
//! facility['.' ['!'] level ['.' program]] ',' ['-'] output
//! ```
//!
//! - `facility`: syslog facility 이름 또는 `*` (모든 facility)
//! - `level`: 심각도 이름, `*` 또는 `none` (모든 레벨); 앞의 `!`는 매칭 반전
//! - `program`: 프로그램명 정확 일치, 생략하거나 비우면 모든 프로그램
//! - `output`: 이미 정의된 출력 이름; 앞의 `-`는 포함 대신 제외
//!
//! 예: `kern.err.klogd,kernlog`, `*.*,stdlog`, `auth.!info,-stdlog`

use std::fmt;

use serde::Serialize;

use logroute_core::types::{Facility, LogLevel, LogRecord};

use crate::output::OutputRegistry;

/// 규칙의 프로그램 선택자 최대 길이 (바이트)
pub const MAX_PROGRAM_LEN: usize = 63;

/// 필터 표현식 컴파일 실패
///
/// 그룹/키 문맥은 로더가 [`ConfError`](crate::error::ConfError)로
/// 변환하면서 덧붙입니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// 문법 오류
    Syntax(String),
    /// 정의되지 않은 출력 참조
    UnknownOutput(String),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax(reason) => write!(f, "{reason}"),
            Self::UnknownOutput(name) => write!(f, "output not recognized: '{name}'"),
        }
    }
}

/// 컴파일된 라우팅 규칙
///
/// 선택자의 `None`은 "모두 매칭"을 뜻합니다. `output_index`는 같은
/// 테이블의 출력 레지스트리에 대해서만 유효합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    /// facility 선택자 (`None` = 모든 facility)
    pub facility: Option<Facility>,
    /// 레벨 선택자 (`None` = 모든 레벨)
    pub level: Option<LogLevel>,
    /// 레벨 매칭 반전 (`!level`)
    pub level_invert: bool,
    /// 프로그램 선택자 (`None` = 모든 프로그램)
    pub program: Option<String>,
    /// 대상 출력 인덱스
    pub output_index: usize,
    /// true면 매칭 레코드를 해당 출력에서 제외
    pub omit: bool,
}

impl Rule {
    /// 모든 레코드를 지정 출력으로 보내는 규칙을 생성합니다.
    pub fn catch_all(output_index: usize) -> Self {
        Self {
            facility: None,
            level: None,
            level_invert: false,
            program: None,
            output_index,
            omit: false,
        }
    }

    /// 필터 표현식을 컴파일합니다.
    ///
    /// 출력 이름은 `outputs`에 대해 즉시 해석되므로, 아직 정의되지 않은
    /// 출력에 대한 전방 참조는 실패합니다.
    pub fn compile(expr: &str, outputs: &OutputRegistry) -> Result<Self, CompileError> {
        let mut cursor = Cursor::new(expr);

        // facility (필수)
        let (token, mut sep) = cursor.next_token();
        let facility = parse_facility_selector(token)?;

        // level (선택, '.' 뒤에서만)
        let mut level = None;
        let mut level_invert = false;
        if sep == Some('.') {
            level_invert = cursor.strip('!');
            let (token, next_sep) = cursor.next_token();
            level = parse_level_selector(token)?;
            sep = next_sep;
        }

        // program (선택, 두 번째 '.' 뒤에서만; 빈 토큰은 "모두")
        let mut program = None;
        if sep == Some('.') {
            let (token, next_sep) = cursor.next_token();
            if token.len() > MAX_PROGRAM_LEN {
                return Err(CompileError::Syntax(format!(
                    "program name must not exceed {MAX_PROGRAM_LEN} bytes"
                )));
            }
            if !token.is_empty() {
                program = Some(token.to_owned());
            }
            sep = next_sep;
        }

        // 필터와 출력 사이에는 ','가 있어야 함
        if sep != Some(',') {
            return Err(CompileError::Syntax(
                "expected ',' after filter".to_owned(),
            ));
        }

        let omit = cursor.strip('-');

        let (token, sep) = cursor.next_token();
        let Some((output_index, _)) = outputs.find(token) else {
            return Err(CompileError::UnknownOutput(token.to_owned()));
        };

        if sep.is_some() {
            return Err(CompileError::Syntax(
                "unexpected data after output".to_owned(),
            ));
        }

        Ok(Self {
            facility,
            level,
            level_invert,
            program,
            output_index,
            omit,
        })
    }

    /// 레코드가 이 규칙의 필터에 매칭되는지 확인합니다.
    ///
    /// 레벨 선택자는 정확 일치이며 `level_invert`로 반전됩니다.
    /// `None` 선택자는 항상 매칭됩니다 (반전 무시).
    pub fn matches(&self, record: &LogRecord) -> bool {
        if let Some(facility) = self.facility {
            if record.facility != facility {
                return false;
            }
        }

        if let Some(level) = self.level {
            if (record.level == level) == self.level_invert {
                return false;
            }
        }

        if let Some(program) = &self.program {
            if record.program != *program {
                return false;
            }
        }

        true
    }
}

/// facility 토큰을 선택자로 해석합니다. `*`는 "모든 facility"입니다.
fn parse_facility_selector(token: &str) -> Result<Option<Facility>, CompileError> {
    if token == "*" {
        return Ok(None);
    }
    match Facility::from_name(token) {
        Some(facility) => Ok(Some(facility)),
        None => Err(CompileError::Syntax(format!(
            "facility not recognized: '{token}'"
        ))),
    }
}

/// level 토큰을 선택자로 해석합니다. `*`와 `none`은 "모든 레벨"입니다.
fn parse_level_selector(token: &str) -> Result<Option<LogLevel>, CompileError> {
    if token == "*" || token.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    match LogLevel::from_name(token) {
        Some(level) => Ok(Some(level)),
        None => Err(CompileError::Syntax(format!(
            "level not recognized: '{token}'"
        ))),
    }
}

/// 구분자(`.`/`,`) 단위 토큰 커서
///
/// 문자열 끝은 항상 유효한 토큰 종결로 취급합니다 (`sep = None`).
struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(expr: &'a str) -> Self {
        Self { rest: expr }
    }

    /// 다음 `.`/`,` 까지의 토큰과 그 구분자를 반환하고 커서를 전진합니다.
    fn next_token(&mut self) -> (&'a str, Option<char>) {
        match self.rest.find(['.', ',']) {
            Some(idx) => {
                let token = &self.rest[..idx];
                let sep = self.rest[idx..].chars().next();
                self.rest = &self.rest[idx + 1..];
                (token, sep)
            }
            None => {
                let token = self.rest;
                self.rest = "";
                (token, None)
            }
        }
    }

    /// 커서 위치의 문자가 `ch`면 소비하고 true를 반환합니다.
    fn strip(&mut self, ch: char) -> bool {
        match self.rest.strip_prefix(ch) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }
}
