#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use nftwatch_collector::{AnchoredPattern, NameFilter};

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    pattern: String,
    names: Vec<String>,
}

fuzz_target!(|input: FuzzInput| {
    let Ok(filter) = AnchoredPattern::new(&input.pattern) else {
        return;
    };
    for name in input.names.iter().take(16) {
        // 같은 입력에는 항상 같은 결과
        assert_eq!(filter.matches(name), filter.matches(name));
    }
});
