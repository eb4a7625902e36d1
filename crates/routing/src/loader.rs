//! 설정 로더 — 그룹 순회와 테이블 구성 오케스트레이션
//!
//! 그룹 이름 접두어로 `OUTPUT=` / `CONTEXT=` 그룹을 분류하여 빈
//! 테이블에 순서대로 반영합니다. 로드는 전체가 성공하거나 전체가
//! 실패합니다. 실패 시 부분적으로 구성된 테이블은 버려지고, 호출자가
//! 이미 공개한 테이블은 영향을 받지 않습니다.
//!
//! # 실패 정책
//! - 필수 키 누락, 규칙 컴파일 실패, 구조 불변식 위반, 레지스트리
//!   용량 초과, `BufferSize`/`FlushLevel` 파싱 실패는 로드를 중단합니다.
//! - `MaxSize`/`Rotations`의 파싱 실패와 범위 초과는 경고 후
//!   기본값/클램핑으로 복구합니다.
//! - 알 수 없는 그룹은 경고 후 건너뜁니다.

use std::path::Path;

use logroute_core::metrics::{CONF_LOADS_TOTAL, LABEL_RESULT};
use logroute_core::types::LogLevel;

use crate::context::{Context, GLOBAL_CONTEXT, MAX_RULES_PER_CONTEXT};
use crate::error::ConfError;
use crate::keyfile::{GroupSource, KeyFile};
use crate::output::{MAX_NAME_LEN, ParsedOutput, STDLOG_OUTPUT};
use crate::parse::{parse_int, parse_size};
use crate::rule::{CompileError, Rule};
use crate::table::RoutingTable;

const OUTPUT_PREFIX: &str = "OUTPUT=";
const CONTEXT_PREFIX: &str = "CONTEXT=";

/// 설정 로더
pub struct ConfLoader;

impl ConfLoader {
    /// 그룹 소스에서 새 라우팅 테이블을 구성합니다.
    pub fn load_source(source: &impl GroupSource) -> Result<RoutingTable, ConfError> {
        match Self::build_table(source) {
            Ok(table) => {
                metrics::counter!(CONF_LOADS_TOTAL, LABEL_RESULT => "success").increment(1);
                tracing::info!(
                    outputs = table.outputs().len(),
                    contexts = table.context_count(),
                    rules = table.rule_count(),
                    "routing configuration loaded"
                );
                Ok(table)
            }
            Err(err) => {
                metrics::counter!(CONF_LOADS_TOTAL, LABEL_RESULT => "failure").increment(1);
                tracing::error!(error = %err, "routing configuration load failed");
                Err(err)
            }
        }
    }

    /// 설정 파일을 읽어 새 라우팅 테이블을 구성합니다.
    pub async fn load_file(path: impl AsRef<Path>) -> Result<RoutingTable, ConfError> {
        let keyfile = KeyFile::from_file(path).await?;
        Self::load_source(&keyfile)
    }

    fn build_table(source: &impl GroupSource) -> Result<RoutingTable, ConfError> {
        let mut table = RoutingTable::new();

        for group in source.groups() {
            if let Some(name) = group.strip_prefix(OUTPUT_PREFIX) {
                Self::load_output_group(&mut table, source, group, name)?;
            } else if let Some(name) = group.strip_prefix(CONTEXT_PREFIX) {
                Self::load_context_group(&mut table, source, group, name)?;
            } else {
                tracing::warn!(group, "unrecognized group, skipping");
            }
        }

        Ok(table)
    }

    /// `OUTPUT=<이름>` 그룹 하나를 테이블에 반영합니다.
    fn load_output_group(
        table: &mut RoutingTable,
        source: &impl GroupSource,
        group: &str,
        name: &str,
    ) -> Result<(), ConfError> {
        // 새 테이블의 첫 출력은 stdlog여야 함
        if table.outputs.is_empty() && name != STDLOG_OUTPUT {
            return Err(ConfError::Structural {
                expected: "stdlog output",
                found: name.to_owned(),
            });
        }

        let Some(file) = source.get(group, "File") else {
            return Err(ConfError::MissingKey {
                group: group.to_owned(),
                key: "File".to_owned(),
            });
        };

        let max_size = match source.get(group, "MaxSize") {
            None => None,
            Some(value) => match parse_size(value) {
                Some(size) => Some(size),
                None => {
                    tracing::warn!(
                        group,
                        value,
                        "unrecognized MaxSize format, using default"
                    );
                    None
                }
            },
        };

        let rotations = match source.get(group, "Rotations") {
            None => None,
            Some(value) => match parse_int(value) {
                Some(count) => Some(count),
                None => {
                    tracing::warn!(
                        group,
                        value,
                        "unrecognized Rotations format, using default"
                    );
                    None
                }
            },
        };

        table.outputs.upsert(ParsedOutput {
            name: name.to_owned(),
            file: file.to_owned(),
            max_size,
            rotations,
        })?;

        Ok(())
    }

    /// `CONTEXT=<이름>` 그룹 하나를 테이블에 반영합니다.
    fn load_context_group(
        table: &mut RoutingTable,
        source: &impl GroupSource,
        group: &str,
        name: &str,
    ) -> Result<(), ConfError> {
        // 새 테이블의 첫 컨텍스트는 <global>이어야 함
        if table.contexts.is_empty() && name != GLOBAL_CONTEXT {
            return Err(ConfError::Structural {
                expected: "<global> context",
                found: name.to_owned(),
            });
        }

        if name.is_empty() {
            return Err(ConfError::InvalidName {
                name: name.to_owned(),
                reason: "context name must not be empty".to_owned(),
            });
        }
        if name.len() > MAX_NAME_LEN {
            return Err(ConfError::InvalidName {
                name: name.to_owned(),
                reason: format!("context name must not exceed {MAX_NAME_LEN} bytes"),
            });
        }

        // Rule1부터 빠진 번호가 나올 때까지 스캔
        let mut rules = Vec::new();
        for index in 1..=MAX_RULES_PER_CONTEXT {
            let key = format!("Rule{index}");
            let Some(expr) = source.get(group, &key) else {
                break;
            };
            let rule = Rule::compile(expr, &table.outputs).map_err(|e| match e {
                CompileError::Syntax(reason) => ConfError::Syntax {
                    group: group.to_owned(),
                    key: key.clone(),
                    reason,
                },
                CompileError::UnknownOutput(output) => ConfError::Reference {
                    group: group.to_owned(),
                    key: key.clone(),
                    name: output,
                },
            })?;
            rules.push(rule);
        }

        // 한도를 넘는 규칙 키는 무시하되 보고
        if rules.len() == MAX_RULES_PER_CONTEXT {
            let overflow = format!("Rule{}", MAX_RULES_PER_CONTEXT + 1);
            if source.get(group, &overflow).is_some() {
                tracing::warn!(
                    context = name,
                    max = MAX_RULES_PER_CONTEXT,
                    "rules beyond the per-context bound are ignored"
                );
            }
        }

        let buffer_size = match source.get(group, "BufferSize") {
            None => 0,
            Some(value) => {
                let size = parse_size(value).ok_or_else(|| ConfError::Syntax {
                    group: group.to_owned(),
                    key: "BufferSize".to_owned(),
                    reason: format!("unrecognized size '{value}'"),
                })?;
                usize::try_from(size).map_err(|_| ConfError::Syntax {
                    group: group.to_owned(),
                    key: "BufferSize".to_owned(),
                    reason: format!("size must not be negative, got '{value}'"),
                })?
            }
        };

        let flush_level = match source.get(group, "FlushLevel") {
            // 키가 없으면 가장 심각한 레벨에서만 플러시
            None => Some(LogLevel::Emergency),
            Some(value) => {
                if value.eq_ignore_ascii_case("none") {
                    None
                } else {
                    Some(LogLevel::from_name(value).ok_or_else(|| ConfError::Syntax {
                        group: group.to_owned(),
                        key: "FlushLevel".to_owned(),
                        reason: format!("level not recognized: '{value}'"),
                    })?)
                }
            }
        };

        let context = table
            .contexts
            .entry(name.to_owned())
            .or_insert_with(|| Context::new(name));
        context.set_rules(rules)?;
        context.rebuild_buffer(buffer_size, flush_level);

        Ok(())
    }
}
