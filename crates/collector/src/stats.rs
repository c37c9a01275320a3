//! 수집 실패 / 제외 카운터
//!
//! 프로세스 수명 동안 단조 증가하는 유일한 상태입니다.
//! [`Collector::new`](crate::Collector::new)가 생성해 핸들을 함께 반환하므로
//! 전역 레지스트리 없이 노출 계층이 직접 읽습니다.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::sink::{Metric, MetricSink, Sample};

/// 제외 대상 객체 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IneligibleKind {
    Rule,
    Counter,
    Set,
}

impl IneligibleKind {
    pub fn metric(self) -> Metric {
        match self {
            Self::Rule => Metric::IneligibleRules,
            Self::Counter => Metric::IneligibleCounters,
            Self::Set => Metric::IneligibleSets,
        }
    }
}

/// 제외 사유 (`reason` 레이블 값)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Reason {
    /// 규칙 udata 디코딩 실패
    CommentError,
    /// 규칙에 코멘트가 없거나 빈 문자열
    NoComment,
    /// 코멘트(또는 카운터 이름)가 필터에 걸림
    CommentFilter,
    /// 규칙에 카운터 표현식이 없음
    NoCounter,
    /// 셋 이름이 필터에 걸림
    NameFilter,
    /// 셋 원소 조회 실패
    ElementsError,
}

impl Reason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CommentError => "comment-error",
            Self::NoComment => "no-comment",
            Self::CommentFilter => "comment-filter",
            Self::NoCounter => "no-counter",
            Self::NameFilter => "name-filter",
            Self::ElementsError => "elements-error",
        }
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct IneligibleKey {
    kind: IneligibleKind,
    family: String,
    table: String,
    reason: Reason,
}

/// 수집 실패 및 제외 카운터
#[derive(Debug, Default)]
pub struct CollectionStats {
    failures: AtomicU64,
    ineligible: Mutex<BTreeMap<IneligibleKey, u64>>,
}

impl CollectionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// 수집 실패를 한 건 기록합니다.
    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// 제외를 한 건 기록합니다.
    pub fn record_ineligible(&self, kind: IneligibleKind, family: &str, table: &str, reason: Reason) {
        let key = IneligibleKey {
            kind,
            family: family.to_owned(),
            table: table.to_owned(),
            reason,
        };
        let mut map = self.ineligible.lock().unwrap_or_else(PoisonError::into_inner);
        *map.entry(key).or_insert(0) += 1;
    }

    /// 누적 수집 실패 수
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// 특정 레이블 조합의 누적 제외 수
    pub fn ineligible(&self, kind: IneligibleKind, family: &str, table: &str, reason: Reason) -> u64 {
        let key = IneligibleKey {
            kind,
            family: family.to_owned(),
            table: table.to_owned(),
            reason,
        };
        let map = self.ineligible.lock().unwrap_or_else(PoisonError::into_inner);
        map.get(&key).copied().unwrap_or(0)
    }

    /// 종류별 누적 제외 수 합계
    pub fn ineligible_total(&self, kind: IneligibleKind) -> u64 {
        let map = self.ineligible.lock().unwrap_or_else(PoisonError::into_inner);
        map.iter()
            .filter(|(k, _)| k.kind == kind)
            .map(|(_, v)| *v)
            .sum()
    }

    /// 현재 값을 싱크로 내보냅니다.
    ///
    /// `collection_failures`는 0이어도 항상 내보냅니다.
    pub fn emit(&self, sink: &mut dyn MetricSink) {
        sink.emit(Sample::new(
            Metric::CollectionFailures,
            Vec::new(),
            self.failures(),
        ));

        let map = self.ineligible.lock().unwrap_or_else(PoisonError::into_inner);
        for (key, count) in map.iter() {
            sink.emit(Sample::new(
                key.kind.metric(),
                vec![
                    key.family.clone(),
                    key.table.clone(),
                    key.reason.as_str().to_owned(),
                ],
                *count,
            ));
        }
    }
}
