//! 그룹 key-value 설정 파일 리더
//!
//! 라우팅 설정 파일은 `[그룹]` 헤더와 `Key=Value` 줄로 구성된 텍스트입니다:
//!
//! ```text
//! # 주석
//! [OUTPUT=stdlog]
//! File=/var/log/messages
//! MaxSize=100K
//!
//! [CONTEXT=<global>]
//! Rule1=*.*,stdlog
//! ```
//!
//! 로더는 구체 타입이 아니라 [`GroupSource`] trait을 통해 그룹을 읽으므로
//! 테스트에서 인메모리 소스를 바로 사용할 수 있습니다.

use std::collections::HashMap;
use std::path::Path;

use crate::error::ConfError;
use crate::parse::split_key_value;

/// 그룹 key-value 소스
///
/// 로더가 설정 데이터를 읽는 통로입니다. 그룹 순서는 정의 순서를
/// 보존해야 합니다. 첫 출력/첫 컨텍스트 불변식이 순서에 의존합니다.
pub trait GroupSource {
    /// 정의 순서대로 그룹 이름을 반환합니다.
    fn groups(&self) -> Vec<&str>;

    /// 그룹 내 키의 값을 반환합니다. 그룹 또는 키가 없으면 `None`입니다.
    fn get(&self, group: &str, key: &str) -> Option<&str>;
}

/// 파싱된 그룹 하나
#[derive(Debug, Clone)]
struct Group {
    name: String,
    entries: HashMap<String, String>,
}

/// 그룹 key-value 파일
///
/// 같은 이름의 그룹이 여러 번 나타나면 첫 그룹에 병합되고,
/// 같은 키가 중복되면 나중 값이 우선합니다.
#[derive(Debug, Clone, Default)]
pub struct KeyFile {
    groups: Vec<Group>,
}

impl KeyFile {
    /// 텍스트를 파싱하여 `KeyFile`을 생성합니다.
    ///
    /// - 빈 줄과 `#`/`;` 주석 줄은 무시합니다.
    /// - `[이름]` 줄은 그룹 헤더입니다. 이름은 비어 있을 수 없습니다.
    /// - 그 외 줄은 `Key=Value`여야 하며, 그룹 밖에 나타나면 에러입니다.
    pub fn parse(text: &str) -> Result<Self, ConfError> {
        let mut groups: Vec<Group> = Vec::new();
        let mut current: Option<usize> = None;

        for (idx, raw_line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw_line.trim();

            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(header) = line.strip_prefix('[') {
                let Some(name) = header.strip_suffix(']') else {
                    return Err(ConfError::KeyFile {
                        line: line_no,
                        reason: "unterminated group header, expected ']'".to_owned(),
                    });
                };
                if name.is_empty() {
                    return Err(ConfError::KeyFile {
                        line: line_no,
                        reason: "empty group name".to_owned(),
                    });
                }

                // 같은 이름의 그룹은 첫 그룹에 병합
                let pos = match groups.iter().position(|g| g.name == name) {
                    Some(pos) => pos,
                    None => {
                        groups.push(Group {
                            name: name.to_owned(),
                            entries: HashMap::new(),
                        });
                        groups.len() - 1
                    }
                };
                current = Some(pos);
                continue;
            }

            let Some(pos) = current else {
                return Err(ConfError::KeyFile {
                    line: line_no,
                    reason: format!("key-value pair outside of any group: '{line}'"),
                });
            };

            let Some((key, value)) = split_key_value(line) else {
                return Err(ConfError::KeyFile {
                    line: line_no,
                    reason: format!("expected KEY=VALUE, got '{line}'"),
                });
            };

            // 중복 키는 나중 값이 우선
            groups[pos]
                .entries
                .insert(key.to_owned(), value.to_owned());
        }

        Ok(Self { groups })
    }

    /// 파일을 읽어 파싱합니다.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await?;
        Self::parse(&content)
    }

    /// 그룹 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// 그룹이 하나도 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl GroupSource for KeyFile {
    fn groups(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.name.as_str()).collect()
    }

    fn get(&self, group: &str, key: &str) -> Option<&str> {
        self.groups
            .iter()
            .find(|g| g.name == group)?
            .entries
            .get(key)
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_basic_groups() {
        let text = "\
[OUTPUT=stdlog]
File=/var/log/messages
MaxSize=100K

[CONTEXT=<global>]
Rule1=*.*,stdlog
";
        let kf = KeyFile::parse(text).unwrap();
        assert_eq!(kf.groups(), vec!["OUTPUT=stdlog", "CONTEXT=<global>"]);
        assert_eq!(kf.get("OUTPUT=stdlog", "File"), Some("/var/log/messages"));
        assert_eq!(kf.get("CONTEXT=<global>", "Rule1"), Some("*.*,stdlog"));
        assert_eq!(kf.get("OUTPUT=stdlog", "Rotations"), None);
        assert_eq!(kf.get("OUTPUT=missing", "File"), None);
    }

    #[test]
    fn comments_and_blank_lines_ignored() {
        let text = "\
# 주석
; 주석

[OUTPUT=stdlog]
# 또 주석
File=/var/log/messages
";
        let kf = KeyFile::parse(text).unwrap();
        assert_eq!(kf.len(), 1);
        assert_eq!(kf.get("OUTPUT=stdlog", "File"), Some("/var/log/messages"));
    }

    #[test]
    fn duplicate_group_merges_into_first() {
        let text = "\
[OUTPUT=stdlog]
File=/var/log/messages

[OUTPUT=kernlog]
File=/var/log/kern.log

[OUTPUT=stdlog]
MaxSize=4K
";
        let kf = KeyFile::parse(text).unwrap();
        // 그룹 순서는 최초 등장 순서를 유지
        assert_eq!(kf.groups(), vec!["OUTPUT=stdlog", "OUTPUT=kernlog"]);
        assert_eq!(kf.get("OUTPUT=stdlog", "File"), Some("/var/log/messages"));
        assert_eq!(kf.get("OUTPUT=stdlog", "MaxSize"), Some("4K"));
    }

    #[test]
    fn duplicate_key_last_wins() {
        let text = "\
[OUTPUT=stdlog]
File=/var/log/a
File=/var/log/b
";
        let kf = KeyFile::parse(text).unwrap();
        assert_eq!(kf.get("OUTPUT=stdlog", "File"), Some("/var/log/b"));
    }

    #[test]
    fn value_may_contain_equals() {
        let text = "[CONTEXT=<global>]\nRule1=kern.err,stdlog\nNote=a=b\n";
        let kf = KeyFile::parse(text).unwrap();
        assert_eq!(kf.get("CONTEXT=<global>", "Note"), Some("a=b"));
    }

    #[test]
    fn key_outside_group_is_error() {
        let err = KeyFile::parse("File=/var/log/messages\n").unwrap_err();
        assert!(matches!(err, ConfError::KeyFile { line: 1, .. }));
    }

    #[test]
    fn line_without_equals_is_error() {
        let text = "[OUTPUT=stdlog]\nFile /var/log/messages\n";
        let err = KeyFile::parse(text).unwrap_err();
        assert!(matches!(err, ConfError::KeyFile { line: 2, .. }));
    }

    #[test]
    fn unterminated_header_is_error() {
        let err = KeyFile::parse("[OUTPUT=stdlog\n").unwrap_err();
        assert!(matches!(err, ConfError::KeyFile { line: 1, .. }));
    }

    #[test]
    fn empty_group_name_is_error() {
        let err = KeyFile::parse("[]\n").unwrap_err();
        assert!(matches!(err, ConfError::KeyFile { line: 1, .. }));
    }

    #[test]
    fn empty_input_yields_empty_keyfile() {
        let kf = KeyFile::parse("").unwrap();
        assert!(kf.is_empty());
    }

    #[tokio::test]
    async fn from_file_nonexistent_is_io_error() {
        let result = KeyFile::from_file("/nonexistent/logroute.conf").await;
        assert!(matches!(result, Err(ConfError::Io(_))));
    }
}
