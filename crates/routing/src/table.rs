//! 라우팅 테이블 — 출력 레지스트리와 컨텍스트 레지스트리의 집합체
//!
//! 테이블은 항상 통째로 만들어집니다. 로드는 빈 테이블에서 시작해
//! 완전히 구성된 값을 반환하고, 호출자는 [`SharedTable`]로 원자적으로
//! 교체합니다. 진행 중인 로드가 실패해도 이미 공개된 테이블은 영향을
//! 받지 않습니다.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use logroute_core::metrics::{TABLE_CONTEXTS, TABLE_OUTPUTS, TABLE_RULES};
use logroute_core::types::LogRecord;

use crate::context::{Context, GLOBAL_CONTEXT};
use crate::output::{OutputRegistry, OutputTarget, ParsedOutput, STDLOG_OUTPUT};
use crate::rule::Rule;

/// 기본 테이블의 stdlog 출력이 가리키는 경로
pub const DEFAULT_LOG_PATH: &str = "/var/log/messages";

/// 라우팅 테이블
///
/// 컨텍스트는 이름 순서로 보관합니다. 컨텍스트 간 순서는 의미가 없고,
/// 규칙 순서는 각 컨텍스트 내부에서만 유지됩니다.
#[derive(Debug, Default)]
pub struct RoutingTable {
    pub(crate) outputs: OutputRegistry,
    pub(crate) contexts: BTreeMap<String, Context>,
}

impl RoutingTable {
    /// 빈 테이블을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 내장 기본 테이블을 생성합니다.
    ///
    /// stdlog 출력 하나(기본 크기/회전 수)와, 모든 레코드를 stdlog로
    /// 보내는 규칙 하나를 가진 `<global>` 컨텍스트로 구성됩니다.
    /// 설정 파일 로드가 실패했을 때의 안전한 폴백입니다.
    pub fn default_table() -> Self {
        let mut table = Self::new();

        table
            .outputs
            .upsert(ParsedOutput {
                name: STDLOG_OUTPUT.to_owned(),
                file: DEFAULT_LOG_PATH.to_owned(),
                max_size: None,
                rotations: None,
            })
            .expect("built-in stdlog definition is valid");

        let mut global = Context::new(GLOBAL_CONTEXT);
        global
            .set_rules(vec![Rule::catch_all(0)])
            .expect("single catch-all rule is within bounds");
        table.contexts.insert(GLOBAL_CONTEXT.to_owned(), global);

        table
    }

    /// 출력 레지스트리를 반환합니다.
    pub fn outputs(&self) -> &OutputRegistry {
        &self.outputs
    }

    /// 인덱스로 출력을 반환합니다.
    pub fn output(&self, index: usize) -> Option<&OutputTarget> {
        self.outputs.get(index)
    }

    /// 이름으로 출력을 찾습니다.
    pub fn find_output(&self, name: &str) -> Option<(usize, &OutputTarget)> {
        self.outputs.find(name)
    }

    /// 이름으로 컨텍스트를 반환합니다.
    pub fn context(&self, name: &str) -> Option<&Context> {
        self.contexts.get(name)
    }

    /// 모든 컨텍스트를 이름 순서로 순회합니다.
    pub fn contexts(&self) -> impl Iterator<Item = &Context> {
        self.contexts.values()
    }

    /// 컨텍스트 수를 반환합니다.
    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }

    /// 전체 규칙 수를 반환합니다.
    pub fn rule_count(&self) -> usize {
        self.contexts.values().map(|c| c.rules().len()).sum()
    }

    /// 레코드가 전달될 출력 인덱스 집합을 계산합니다.
    ///
    /// `context_name`의 컨텍스트가 없으면 `<global>` 컨텍스트로
    /// 폴백합니다. 그마저 없으면 (비정상 테이블) 빈 집합입니다.
    pub fn route(&self, context_name: &str, record: &LogRecord) -> Vec<usize> {
        self.contexts
            .get(context_name)
            .or_else(|| self.contexts.get(GLOBAL_CONTEXT))
            .map(|context| context.route(record))
            .unwrap_or_default()
    }
}

/// 공개된 라우팅 테이블 핸들
///
/// 로더가 새 테이블을 완성한 뒤 [`publish`](Self::publish)로 교체하면,
/// 동시 조회자는 항상 이전 테이블 또는 새 테이블 중 하나의 완전한
/// 스냅샷만 관찰합니다.
#[derive(Debug)]
pub struct SharedTable {
    inner: RwLock<Arc<RoutingTable>>,
}

impl SharedTable {
    /// 초기 테이블로 핸들을 생성합니다.
    pub fn new(table: RoutingTable) -> Self {
        let shared = Self {
            inner: RwLock::new(Arc::new(table)),
        };
        shared.record_gauges();
        shared
    }

    /// 현재 공개된 테이블의 스냅샷을 반환합니다.
    pub fn load(&self) -> Arc<RoutingTable> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 새 테이블을 공개하고 이전 테이블을 반환합니다.
    pub fn publish(&self, table: RoutingTable) -> Arc<RoutingTable> {
        let next = Arc::new(table);
        let previous = {
            let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *guard, next)
        };
        self.record_gauges();
        previous
    }

    /// 현재 테이블의 규모를 게이지 메트릭으로 기록합니다.
    fn record_gauges(&self) {
        let table = self.load();
        metrics::gauge!(TABLE_OUTPUTS).set(table.outputs().len() as f64);
        metrics::gauge!(TABLE_CONTEXTS).set(table.context_count() as f64);
        metrics::gauge!(TABLE_RULES).set(table.rule_count() as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logroute_core::types::{Facility, LogLevel};

    #[test]
    fn empty_table_has_nothing() {
        let table = RoutingTable::new();
        assert!(table.outputs().is_empty());
        assert_eq!(table.context_count(), 0);
        assert_eq!(table.rule_count(), 0);
    }

    #[test]
    fn default_table_shape() {
        let table = RoutingTable::default_table();

        // 출력은 stdlog 하나
        assert_eq!(table.outputs().len(), 1);
        let (index, output) = table.find_output(STDLOG_OUTPUT).unwrap();
        assert_eq!(index, 0);
        assert_eq!(output.path(), std::path::Path::new(DEFAULT_LOG_PATH));

        // 컨텍스트는 <global> 하나, 규칙은 catch-all 하나
        assert_eq!(table.context_count(), 1);
        let global = table.context(GLOBAL_CONTEXT).unwrap();
        assert_eq!(global.rules().len(), 1);
        let rule = &global.rules()[0];
        assert_eq!(rule.facility, None);
        assert_eq!(rule.level, None);
        assert_eq!(rule.program, None);
        assert_eq!(rule.output_index, 0);
        assert!(!rule.omit);
    }

    #[test]
    fn default_table_routes_everything_to_stdlog() {
        let table = RoutingTable::default_table();
        let record = LogRecord::new(Facility::Local3, LogLevel::Debug, "any", "msg");
        assert_eq!(table.route(GLOBAL_CONTEXT, &record), vec![0]);
    }

    #[test]
    fn route_falls_back_to_global_for_unknown_context() {
        let table = RoutingTable::default_table();
        let record = LogRecord::new(Facility::User, LogLevel::Info, "p", "msg");
        assert_eq!(table.route("no-such-context", &record), vec![0]);
    }

    #[test]
    fn shared_table_swaps_atomically() {
        let shared = SharedTable::new(RoutingTable::default_table());
        let before = shared.load();
        assert_eq!(before.outputs().len(), 1);

        let previous = shared.publish(RoutingTable::new());
        // 이전 스냅샷은 교체 후에도 유효
        assert_eq!(previous.outputs().len(), 1);
        assert_eq!(before.outputs().len(), 1);
        assert!(shared.load().outputs().is_empty());
    }
}
