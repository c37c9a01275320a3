//! 수집 파이프라인
//!
//! [`Collector::collect`]는 스크레이프마다 한 번 호출되어 커널 객체 그래프를 순회하고,
//! 필터와 매퍼를 적용해 [`MetricSink`]로 관측값을 내보냅니다.
//!
//! # 순회 순서
//! 1. 테이블 목록 (실패 시 이번 패스 전체 중단)
//! 2. 테이블별: 메타데이터 → 명명된 카운터 → 셋/맵
//! 3. 체인 목록 (실패 시 중단, 테이블 단계 관측값은 유지)
//! 4. 체인별: 메타데이터 → 규칙 수 → 규칙별 카운터
//!
//! 하위 자원 조회 실패는 해당 부모의 관측값만 건너뛰고 형제 객체는 계속 처리합니다.
//! 재시도는 하지 않습니다.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

use crate::error::ProviderError;
use crate::extract::{rule_comment, rule_counter};
use crate::filter::Filters;
use crate::labels::{
    family_label, flag_mask_label, hook_label, ismap_label, policy_label, priority_label,
};
use crate::model::{Chain, Object, Rule, Set, Table};
use crate::provider::KernelStateProvider;
use crate::sink::{Metric, MetricSink, Sample};
use crate::stats::{CollectionStats, IneligibleKind, Reason};

/// 수집 파이프라인
///
/// 프로바이더는 뮤텍스 뒤에 있어 겹치는 `collect` 호출이 직렬화됩니다.
pub struct Collector<P> {
    provider: Mutex<P>,
    filters: Filters,
    stats: Arc<CollectionStats>,
}

impl<P: KernelStateProvider> Collector<P> {
    /// 컬렉터와 그 제외/실패 카운터 핸들을 생성합니다.
    pub fn new(provider: P, filters: Filters) -> (Self, Arc<CollectionStats>) {
        let stats = Arc::new(CollectionStats::new());
        let collector = Self {
            provider: Mutex::new(provider),
            filters,
            stats: Arc::clone(&stats),
        };
        (collector, stats)
    }

    /// 제외/실패 카운터
    pub fn stats(&self) -> &Arc<CollectionStats> {
        &self.stats
    }

    /// 프로바이더에 접근 가능한지 확인합니다 (시작 시 프로브).
    pub fn probe(&self) -> Result<usize, ProviderError> {
        let provider = self.provider.lock().unwrap_or_else(PoisonError::into_inner);
        provider.list_tables().map(|tables| tables.len())
    }

    /// 수집 패스 한 번을 실행합니다.
    pub fn collect(&self, sink: &mut dyn MetricSink) {
        let provider = self.provider.lock().unwrap_or_else(PoisonError::into_inner);
        let pass = Pass {
            provider: &*provider,
            filters: &self.filters,
            stats: &self.stats,
        };
        pass.run(sink);
    }
}

impl<P> std::fmt::Debug for Collector<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collector")
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

/// 잠금을 잡은 상태의 수집 패스 하나
struct Pass<'a, P> {
    provider: &'a P,
    filters: &'a Filters,
    stats: &'a CollectionStats,
}

impl<P: KernelStateProvider> Pass<'_, P> {
    fn run(&self, sink: &mut dyn MetricSink) {
        let tables = match self.provider.list_tables() {
            Ok(tables) => tables,
            Err(e) => {
                warn!(error = %e, "failed to list tables");
                self.stats.record_failure();
                return;
            }
        };

        for table in &tables {
            self.collect_table(table, sink);
        }

        let chains = match self.provider.list_chains() {
            Ok(chains) => chains,
            Err(e) => {
                warn!(error = %e, "failed to list chains");
                self.stats.record_failure();
                return;
            }
        };

        for chain in &chains {
            self.collect_chain(chain, sink);
        }
    }

    fn collect_table(&self, table: &Table, sink: &mut dyn MetricSink) {
        let family = family_label(table.family);

        sink.emit(Sample::new(
            Metric::TableMetadata,
            vec![
                family.clone(),
                table.name.clone(),
                flag_mask_label(table.flags),
            ],
            1,
        ));

        let objects = match self.provider.get_objects(table) {
            Ok(objects) => objects,
            Err(e) => {
                warn!(%family, table = %table.name, error = %e, "failed to list objects");
                self.stats.record_failure();
                return;
            }
        };

        for object in &objects {
            self.collect_object(&family, table, object, sink);
        }

        let sets = match self.provider.get_sets(table) {
            Ok(sets) => sets,
            Err(e) => {
                warn!(%family, table = %table.name, error = %e, "failed to list sets");
                self.stats.record_failure();
                return;
            }
        };

        for set in &sets {
            self.collect_set(&family, table, set, sink);
        }
    }

    fn collect_object(&self, family: &str, table: &Table, object: &Object, sink: &mut dyn MetricSink) {
        let Object::Counter { name, counter } = object else {
            return;
        };

        if !self.filters.counter_names.matches(name) {
            debug!(%family, table = %table.name, counter = %name, "counter filtered out");
            self.stats.record_ineligible(
                IneligibleKind::Counter,
                family,
                &table.name,
                Reason::CommentFilter,
            );
            return;
        }

        let labels = vec![family.to_owned(), table.name.clone(), name.clone()];
        sink.emit(Sample::new(
            Metric::CounterPacketCount,
            labels.clone(),
            counter.packets,
        ));
        sink.emit(Sample::new(Metric::CounterByteCount, labels, counter.bytes));
    }

    fn collect_set(&self, family: &str, table: &Table, set: &Set, sink: &mut dyn MetricSink) {
        if !self.filters.set_names.matches(&set.name) {
            debug!(%family, table = %table.name, set = %set.name, "set filtered out");
            self.stats.record_ineligible(
                IneligibleKind::Set,
                family,
                &table.name,
                Reason::NameFilter,
            );
            return;
        }

        sink.emit(Sample::new(
            Metric::SetMetadata,
            vec![
                family.to_owned(),
                table.name.clone(),
                set.name.clone(),
                ismap_label(set.is_map).to_owned(),
                set.key_type.clone(),
                set.data_type.clone().unwrap_or_default(),
            ],
            1,
        ));

        match self.provider.get_set_elements(set) {
            Ok(elements) => sink.emit(Sample::new(
                Metric::SetSize,
                vec![family.to_owned(), table.name.clone(), set.name.clone()],
                elements.len() as u64,
            )),
            Err(e) => {
                warn!(
                    %family,
                    table = %table.name,
                    set = %set.name,
                    error = %e,
                    "failed to list set elements"
                );
                self.stats.record_ineligible(
                    IneligibleKind::Set,
                    family,
                    &table.name,
                    Reason::ElementsError,
                );
                self.stats.record_failure();
            }
        }
    }

    fn collect_chain(&self, chain: &Chain, sink: &mut dyn MetricSink) {
        let table = &chain.table;
        let family = family_label(table.family);

        sink.emit(Sample::new(
            Metric::ChainMetadata,
            vec![
                family.clone(),
                table.name.clone(),
                chain.name.clone(),
                hook_label(table.family, chain.hook),
                policy_label(chain.policy),
                priority_label(chain.priority),
            ],
            1,
        ));

        let rules = match self.provider.get_rules(table, chain) {
            Ok(rules) => rules,
            Err(e) => {
                warn!(
                    %family,
                    table = %table.name,
                    chain = %chain.name,
                    error = %e,
                    "failed to list rules"
                );
                self.stats.record_failure();
                return;
            }
        };

        sink.emit(Sample::new(
            Metric::ChainRuleCount,
            vec![family.clone(), table.name.clone(), chain.name.clone()],
            rules.len() as u64,
        ));

        for rule in &rules {
            self.collect_rule(&family, chain, rule, sink);
        }
    }

    fn collect_rule(&self, family: &str, chain: &Chain, rule: &Rule, sink: &mut dyn MetricSink) {
        let table = &chain.table.name;
        let ineligible = |reason: Reason| {
            debug!(
                %family,
                %table,
                chain = %chain.name,
                handle = rule.handle,
                %reason,
                "rule not exported"
            );
            self.stats
                .record_ineligible(IneligibleKind::Rule, family, table, reason);
        };

        let comment = match rule_comment(rule) {
            Ok(Some(comment)) => comment,
            Ok(None) => return ineligible(Reason::NoComment),
            Err(_) => return ineligible(Reason::CommentError),
        };

        if !self.filters.rule_comments.matches(&comment) {
            return ineligible(Reason::CommentFilter);
        }

        let Some(counter) = rule_counter(rule) else {
            return ineligible(Reason::NoCounter);
        };

        // 같은 체인에서 코멘트가 같은 규칙들은 같은 레이블 셋으로 합쳐진다
        let labels = vec![
            family.to_owned(),
            table.clone(),
            chain.name.clone(),
            comment,
        ];
        sink.emit(Sample::new(
            Metric::RulePacketCount,
            labels.clone(),
            counter.packets,
        ));
        sink.emit(Sample::new(Metric::RuleByteCount, labels, counter.bytes));
    }
}
