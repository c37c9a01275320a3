//! 수집 패스 벤치마크
//!
//! 규칙 수에 따른 수집 패스 처리량과 nft JSON 해석 비용을 측정합니다.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use nftwatch_collector::nft::parse_document;
use nftwatch_collector::{Collector, Filters, RulesetSnapshot, Sample};
use serde_json::json;

fn ruleset(rules: usize) -> String {
    let mut entries = vec![
        json!({ "table": { "family": "inet", "name": "filter", "handle": 1 } }),
        json!({ "chain": { "family": "inet", "table": "filter", "name": "input",
                           "type": "filter", "hook": "input", "prio": 0, "policy": "drop" } }),
    ];
    for i in 0..rules {
        // 네 번째 규칙마다 코멘트 없음
        let mut rule = json!({
            "family": "inet", "table": "filter", "chain": "input", "handle": i,
            "expr": [{ "counter": { "packets": i, "bytes": i * 60 } }]
        });
        if i % 4 != 0 {
            rule["comment"] = json!(format!("rule {i}"));
        }
        entries.push(json!({ "rule": rule }));
    }
    json!({ "nftables": entries }).to_string()
}

fn bench_collect(c: &mut Criterion) {
    let mut group = c.benchmark_group("collect");

    for rules in [10usize, 100, 1000] {
        let snapshot = RulesetSnapshot::parse(&ruleset(rules)).unwrap();
        let (collector, _) = Collector::new(snapshot, Filters::match_all());
        group.throughput(Throughput::Elements(rules as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rules), &collector, |b, collector| {
            b.iter(|| {
                let mut sink: Vec<Sample> = Vec::with_capacity(rules * 2);
                collector.collect(black_box(&mut sink));
                sink
            })
        });
    }

    group.finish();
}

fn bench_filters(c: &mut Criterion) {
    let config = nftwatch_core::FilterConfig {
        rule_comments: "rule [0-9]*[02468]".to_owned(),
        counter_names: ".*".to_owned(),
        set_names: ".*".to_owned(),
    };
    let snapshot = RulesetSnapshot::parse(&ruleset(1000)).unwrap();
    let (collector, _) = Collector::new(snapshot, Filters::from_config(&config).unwrap());

    let mut group = c.benchmark_group("collect_filtered");
    group.throughput(Throughput::Elements(1000));
    group.bench_function("half_rejected", |b| {
        b.iter(|| {
            let mut sink: Vec<Sample> = Vec::new();
            collector.collect(&mut sink);
            sink
        })
    });
    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let text = ruleset(1000);

    let mut group = c.benchmark_group("nft_json");
    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_function("parse_1000_rules", |b| {
        b.iter(|| parse_document(black_box(&text)).unwrap())
    });
    group.finish();
}

criterion_group!(benches, bench_collect, bench_filters, bench_parse);
criterion_main!(benches);
