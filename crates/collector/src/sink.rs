//! 수집 결과 싱크
//!
//! 컬렉터는 관측값을 [`MetricSink`]로 내보낼 뿐 직렬화 형식을 알지 못합니다.
//! 데몬은 Prometheus 레코더로, 테스트는 `Vec<Sample>`로 받습니다.

use nftwatch_core::metrics as m;

/// 메트릭 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Gauge,
    Counter,
}

/// 노출되는 메트릭 패밀리
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    TableMetadata,
    ChainMetadata,
    SetMetadata,
    ChainRuleCount,
    RulePacketCount,
    RuleByteCount,
    CounterPacketCount,
    CounterByteCount,
    SetSize,
    CollectionFailures,
    IneligibleRules,
    IneligibleCounters,
    IneligibleSets,
}

const FAMILY_TABLE_REASON: &[&str] = &[m::LABEL_FAMILY, m::LABEL_TABLE, m::LABEL_REASON];

impl Metric {
    pub const ALL: [Metric; 13] = [
        Metric::TableMetadata,
        Metric::ChainMetadata,
        Metric::SetMetadata,
        Metric::ChainRuleCount,
        Metric::RulePacketCount,
        Metric::RuleByteCount,
        Metric::CounterPacketCount,
        Metric::CounterByteCount,
        Metric::SetSize,
        Metric::CollectionFailures,
        Metric::IneligibleRules,
        Metric::IneligibleCounters,
        Metric::IneligibleSets,
    ];

    /// Prometheus 메트릭 이름
    pub fn name(self) -> &'static str {
        match self {
            Self::TableMetadata => m::TABLE_METADATA,
            Self::ChainMetadata => m::CHAIN_METADATA,
            Self::SetMetadata => m::SET_METADATA,
            Self::ChainRuleCount => m::CHAIN_RULE_COUNT,
            Self::RulePacketCount => m::RULE_PACKET_COUNT,
            Self::RuleByteCount => m::RULE_BYTE_COUNT,
            Self::CounterPacketCount => m::COUNTER_PACKET_COUNT,
            Self::CounterByteCount => m::COUNTER_BYTE_COUNT,
            Self::SetSize => m::SET_SIZE,
            Self::CollectionFailures => m::COLLECTION_FAILURES,
            Self::IneligibleRules => m::INELIGIBLE_RULES,
            Self::IneligibleCounters => m::INELIGIBLE_COUNTERS,
            Self::IneligibleSets => m::INELIGIBLE_SETS,
        }
    }

    pub fn kind(self) -> MetricKind {
        match self {
            Self::TableMetadata
            | Self::ChainMetadata
            | Self::SetMetadata
            | Self::ChainRuleCount
            | Self::SetSize => MetricKind::Gauge,
            Self::RulePacketCount
            | Self::RuleByteCount
            | Self::CounterPacketCount
            | Self::CounterByteCount
            | Self::CollectionFailures
            | Self::IneligibleRules
            | Self::IneligibleCounters
            | Self::IneligibleSets => MetricKind::Counter,
        }
    }

    /// 레이블 키 (샘플의 레이블 값과 같은 순서)
    pub fn label_keys(self) -> &'static [&'static str] {
        match self {
            Self::TableMetadata => &[m::LABEL_FAMILY, m::LABEL_TABLE, m::LABEL_FLAGS],
            Self::ChainMetadata => &[
                m::LABEL_FAMILY,
                m::LABEL_TABLE,
                m::LABEL_CHAIN,
                m::LABEL_HOOK,
                m::LABEL_POLICY,
                m::LABEL_PRIORITY,
            ],
            Self::SetMetadata => &[
                m::LABEL_FAMILY,
                m::LABEL_TABLE,
                m::LABEL_SET,
                m::LABEL_ISMAP,
                m::LABEL_KEYTYPE,
                m::LABEL_DATATYPE,
            ],
            Self::ChainRuleCount => &[m::LABEL_FAMILY, m::LABEL_TABLE, m::LABEL_CHAIN],
            Self::RulePacketCount | Self::RuleByteCount => &[
                m::LABEL_FAMILY,
                m::LABEL_TABLE,
                m::LABEL_CHAIN,
                m::LABEL_COMMENT,
            ],
            Self::CounterPacketCount | Self::CounterByteCount => {
                &[m::LABEL_FAMILY, m::LABEL_TABLE, m::LABEL_COUNTER]
            }
            Self::SetSize => &[m::LABEL_FAMILY, m::LABEL_TABLE, m::LABEL_SET],
            Self::CollectionFailures => &[],
            Self::IneligibleRules | Self::IneligibleCounters | Self::IneligibleSets => {
                FAMILY_TABLE_REASON
            }
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 관측값 하나
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub metric: Metric,
    /// [`Metric::label_keys`] 순서의 레이블 값
    pub label_values: Vec<String>,
    pub value: u64,
}

impl Sample {
    pub fn new(metric: Metric, label_values: Vec<String>, value: u64) -> Self {
        debug_assert_eq!(metric.label_keys().len(), label_values.len());
        Self {
            metric,
            label_values,
            value,
        }
    }

    /// 레이블 키로 값을 찾습니다.
    pub fn label(&self, key: &str) -> Option<&str> {
        self.metric
            .label_keys()
            .iter()
            .position(|k| *k == key)
            .and_then(|i| self.label_values.get(i))
            .map(String::as_str)
    }

    /// (키, 값) 쌍 반복자
    pub fn labels(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.metric
            .label_keys()
            .iter()
            .copied()
            .zip(self.label_values.iter().map(String::as_str))
    }
}

/// 관측값 수신자
pub trait MetricSink {
    fn emit(&mut self, sample: Sample);
}

impl MetricSink for Vec<Sample> {
    fn emit(&mut self, sample: Sample) {
        self.push(sample);
    }
}
