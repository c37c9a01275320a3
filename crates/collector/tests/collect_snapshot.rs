//! 룰셋 스냅샷 기반 수집 통합 테스트

use nftwatch_collector::{
    Chain, Collector, Filters, IneligibleKind, KernelStateProvider, Metric, Object, ProviderError,
    Reason, Rule, RulesetSnapshot, Sample, Set, SetElement, Table,
};

const RULESET: &str = include_str!("fixtures/ruleset.json");

fn collect_with(filters: Filters) -> (Vec<Sample>, std::sync::Arc<nftwatch_collector::CollectionStats>) {
    let snapshot = RulesetSnapshot::parse(RULESET).unwrap();
    let (collector, stats) = Collector::new(snapshot, filters);
    let mut samples: Vec<Sample> = Vec::new();
    collector.collect(&mut samples);
    (samples, stats)
}

fn labels(samples: &[Sample], metric: Metric) -> Vec<(Vec<String>, u64)> {
    samples
        .iter()
        .filter(|s| s.metric == metric)
        .map(|s| (s.label_values.clone(), s.value))
        .collect()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_owned()).collect()
}

#[test]
fn full_ruleset_observations() {
    let (samples, stats) = collect_with(Filters::match_all());

    assert_eq!(
        labels(&samples, Metric::TableMetadata),
        vec![
            (strings(&["inet", "table1", ""]), 1),
            (strings(&["inet", "table2", "dormant"]), 1),
        ]
    );
    assert_eq!(
        labels(&samples, Metric::ChainMetadata),
        vec![
            (strings(&["inet", "table1", "chain1", "prerouting", "accept", "0"]), 1),
            (strings(&["inet", "table1", "chain2", "input", "drop", "42"]), 1),
        ]
    );
    assert_eq!(
        labels(&samples, Metric::ChainRuleCount),
        vec![
            (strings(&["inet", "table1", "chain1"]), 2),
            (strings(&["inet", "table1", "chain2"]), 0),
        ]
    );
    assert_eq!(
        labels(&samples, Metric::RulePacketCount),
        vec![(strings(&["inet", "table1", "chain1", "test comment"]), 4)]
    );
    assert_eq!(
        labels(&samples, Metric::RuleByteCount),
        vec![(strings(&["inet", "table1", "chain1", "test comment"]), 2)]
    );
    assert_eq!(
        labels(&samples, Metric::CounterPacketCount),
        vec![(strings(&["inet", "table1", "counter1"]), 42)]
    );
    assert_eq!(
        labels(&samples, Metric::CounterByteCount),
        vec![(strings(&["inet", "table1", "counter1"]), 4711)]
    );
    assert_eq!(
        labels(&samples, Metric::SetMetadata),
        vec![
            (strings(&["inet", "table1", "set1", "0", "ipv4_addr", ""]), 1),
            (strings(&["inet", "table1", "map1", "1", "ipv4_addr", "string"]), 1),
        ]
    );
    assert_eq!(
        labels(&samples, Metric::SetSize),
        vec![
            (strings(&["inet", "table1", "set1"]), 2),
            (strings(&["inet", "table1", "map1"]), 0),
        ]
    );

    assert_eq!(stats.failures(), 0);
    assert_eq!(
        stats.ineligible(IneligibleKind::Rule, "inet", "table1", Reason::NoComment),
        1
    );
}

#[test]
fn regex_filters_from_config() {
    let config = nftwatch_core::FilterConfig {
        rule_comments: "other.*".to_owned(),
        counter_names: "counter[0-9]".to_owned(),
        set_names: "map.*".to_owned(),
    };
    let (samples, stats) = collect_with(Filters::from_config(&config).unwrap());

    assert!(labels(&samples, Metric::RulePacketCount).is_empty());
    assert_eq!(labels(&samples, Metric::CounterPacketCount).len(), 1);
    let sets = labels(&samples, Metric::SetMetadata);
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0].0[2], "map1");

    assert_eq!(
        stats.ineligible(IneligibleKind::Rule, "inet", "table1", Reason::CommentFilter),
        1
    );
    assert_eq!(
        stats.ineligible(IneligibleKind::Set, "inet", "table1", Reason::NameFilter),
        1
    );
    assert_eq!(stats.ineligible_total(IneligibleKind::Counter), 0);
}

#[test]
fn stats_emit_after_collect() {
    let (_, stats) = collect_with(Filters::match_all());
    let mut samples: Vec<Sample> = Vec::new();
    stats.emit(&mut samples);

    assert_eq!(samples[0].metric, Metric::CollectionFailures);
    assert_eq!(samples[0].value, 0);
    let rules = labels(&samples, Metric::IneligibleRules);
    assert_eq!(rules, vec![(strings(&["inet", "table1", "no-comment"]), 1)]);
}

/// 특정 셋의 원소 조회만 실패시키는 래퍼
struct BrokenElements {
    inner: RulesetSnapshot,
    set: &'static str,
}

impl KernelStateProvider for BrokenElements {
    fn list_tables(&self) -> Result<Vec<Table>, ProviderError> {
        self.inner.list_tables()
    }

    fn list_chains(&self) -> Result<Vec<Chain>, ProviderError> {
        self.inner.list_chains()
    }

    fn get_objects(&self, table: &Table) -> Result<Vec<Object>, ProviderError> {
        self.inner.get_objects(table)
    }

    fn get_rules(&self, table: &Table, chain: &Chain) -> Result<Vec<Rule>, ProviderError> {
        self.inner.get_rules(table, chain)
    }

    fn get_sets(&self, table: &Table) -> Result<Vec<Set>, ProviderError> {
        self.inner.get_sets(table)
    }

    fn get_set_elements(&self, set: &Set) -> Result<Vec<SetElement>, ProviderError> {
        if set.name == self.set {
            return Err(ProviderError::Other("permission denied".to_owned()));
        }
        self.inner.get_set_elements(set)
    }
}

#[test]
fn element_failure_is_isolated() {
    let provider = BrokenElements {
        inner: RulesetSnapshot::parse(RULESET).unwrap(),
        set: "set1",
    };
    let (collector, stats) = Collector::new(provider, Filters::match_all());
    let mut samples: Vec<Sample> = Vec::new();
    collector.collect(&mut samples);

    assert_eq!(labels(&samples, Metric::SetMetadata).len(), 2);
    assert_eq!(
        labels(&samples, Metric::SetSize),
        vec![(strings(&["inet", "table1", "map1"]), 0)]
    );
    // 다른 단계는 영향을 받지 않는다
    assert_eq!(labels(&samples, Metric::RulePacketCount).len(), 1);
    assert_eq!(stats.failures(), 1);
    assert_eq!(
        stats.ineligible(IneligibleKind::Set, "inet", "table1", Reason::ElementsError),
        1
    );
}

#[test]
fn boxed_provider_collects() {
    let provider: Box<dyn KernelStateProvider> =
        Box::new(RulesetSnapshot::parse(RULESET).unwrap());
    let (collector, _) = Collector::new(provider, Filters::default());
    assert_eq!(collector.probe().unwrap(), 2);

    let mut samples: Vec<Sample> = Vec::new();
    collector.collect(&mut samples);
    assert!(!samples.is_empty());
}
