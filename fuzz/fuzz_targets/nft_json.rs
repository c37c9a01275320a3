#![no_main]

use libfuzzer_sys::fuzz_target;
use nftwatch_collector::nft::{parse_document, RulesetSnapshot};
use nftwatch_collector::{Collector, Filters, Sample};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if parse_document(text).is_err() {
        return;
    }

    // 해석에 성공한 룰셋은 수집 패스도 패닉 없이 끝나야 한다
    if let Ok(snapshot) = RulesetSnapshot::parse(text) {
        let (collector, stats) = Collector::new(snapshot, Filters::match_all());
        let mut sink: Vec<Sample> = Vec::new();
        collector.collect(&mut sink);
        stats.emit(&mut sink);
    }
});
