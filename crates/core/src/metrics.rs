//! 메트릭 상수 및 설명 등록
//!
//! 노출되는 모든 Prometheus 메트릭의 이름, 레이블 키, 설명을 중앙에서 정의합니다.
//! 이름과 레이블 구성은 기존 대시보드와의 호환을 위해 고정되어 있습니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `nftables_`
//! - 메타데이터 게이지는 `_metadata` 접미어, 값은 항상 1
//! - 카운터는 `_count` 접미어 (커널 누적값을 그대로 노출)
//!
//! # 사용 예시
//!
//! ```ignore
//! use nftwatch_core::metrics as m;
//!
//! metrics::gauge!(m::TABLE_METADATA, m::LABEL_FAMILY => "inet").set(1.0);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 주소 패밀리 레이블 키 (inet, ip, ip6, arp, netdev, bridge)
pub const LABEL_FAMILY: &str = "family";

/// 테이블 이름 레이블 키
pub const LABEL_TABLE: &str = "table";

/// 체인 이름 레이블 키
pub const LABEL_CHAIN: &str = "chain";

/// 셋/맵 이름 레이블 키
pub const LABEL_SET: &str = "set";

/// 명명된 카운터 이름 레이블 키
pub const LABEL_COUNTER: &str = "counter";

/// 규칙 코멘트 레이블 키
pub const LABEL_COMMENT: &str = "comment";

/// 테이블 플래그 레이블 키 (쉼표 구분)
pub const LABEL_FLAGS: &str = "flags";

/// 체인 훅 레이블 키
pub const LABEL_HOOK: &str = "hook";

/// 체인 정책 레이블 키
pub const LABEL_POLICY: &str = "policy";

/// 체인 우선순위 레이블 키
pub const LABEL_PRIORITY: &str = "priority";

/// 맵 여부 레이블 키 ("0" / "1")
pub const LABEL_ISMAP: &str = "ismap";

/// 셋 키 타입 레이블 키
pub const LABEL_KEYTYPE: &str = "keytype";

/// 맵 값 타입 레이블 키
pub const LABEL_DATATYPE: &str = "datatype";

/// 제외 사유 레이블 키
pub const LABEL_REASON: &str = "reason";

// ─── 메타데이터 메트릭 ──────────────────────────────────────────────

/// 테이블 메타데이터 (gauge, 항상 1)
pub const TABLE_METADATA: &str = "nftables_table_metadata";

/// 체인 메타데이터 (gauge, 항상 1)
pub const CHAIN_METADATA: &str = "nftables_chain_metadata";

/// 셋 메타데이터 (gauge, 항상 1)
pub const SET_METADATA: &str = "nftables_set_metadata";

// ─── 통계 메트릭 ────────────────────────────────────────────────────

/// 체인의 전체 규칙 수 (gauge)
pub const CHAIN_RULE_COUNT: &str = "nftables_chain_rule_count";

/// 규칙에 매칭된 패킷 수 (counter)
pub const RULE_PACKET_COUNT: &str = "nftables_rule_packet_count";

/// 규칙에 매칭된 바이트 수 (counter)
pub const RULE_BYTE_COUNT: &str = "nftables_rule_byte_count";

/// 명명된 카운터의 패킷 수 (counter)
pub const COUNTER_PACKET_COUNT: &str = "nftables_counter_packet_count";

/// 명명된 카운터의 바이트 수 (counter)
pub const COUNTER_BYTE_COUNT: &str = "nftables_counter_byte_count";

/// 셋 원소 수 (gauge)
pub const SET_SIZE: &str = "nftables_set_size";

// ─── 수집 상태 메트릭 ───────────────────────────────────────────────

/// 수집 실패 횟수 (counter, 레이블 없음)
pub const COLLECTION_FAILURES: &str = "nftables_collection_failures";

/// 내보내지 않은 규칙 수 (counter, labels: family, table, reason)
pub const INELIGIBLE_RULES: &str = "nftables_ineligible_rules";

/// 내보내지 않은 카운터 수 (counter, labels: family, table, reason)
pub const INELIGIBLE_COUNTERS: &str = "nftables_ineligible_counters";

/// 내보내지 않은 셋 수 (counter, labels: family, table, reason)
pub const INELIGIBLE_SETS: &str = "nftables_ineligible_sets";

// ─── 설명 ───────────────────────────────────────────────────────────

pub const TABLE_METADATA_HELP: &str = "Metadata about each table. Value is always 1.";
pub const CHAIN_METADATA_HELP: &str = "Metadata about each chain. Value is always 1.";
pub const SET_METADATA_HELP: &str = "Metadata about each set. Value is always 1.";
pub const CHAIN_RULE_COUNT_HELP: &str = "Total rule count in chain.";
pub const RULE_PACKET_COUNT_HELP: &str = "Number of packets matching the rule.";
pub const RULE_BYTE_COUNT_HELP: &str = "Number of bytes matching the rule.";
pub const COUNTER_PACKET_COUNT_HELP: &str = "Number of packets triggering the counter.";
pub const COUNTER_BYTE_COUNT_HELP: &str = "Number of bytes triggering the counter.";
pub const SET_SIZE_HELP: &str = "Number of elements in the set.";
pub const COLLECTION_FAILURES_HELP: &str = "Collection failures while reading from nftables.";
pub const INELIGIBLE_RULES_HELP: &str = "Number of rules that were not exported for some reason.";
pub const INELIGIBLE_COUNTERS_HELP: &str =
    "Number of counters that were not exported for some reason.";
pub const INELIGIBLE_SETS_HELP: &str = "Number of sets that were not exported for some reason.";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// `metrics::describe_counter!()`, `describe_gauge!()`를 호출하여
/// Prometheus HELP 텍스트를 설정합니다.
///
/// 현재 활성화된 레코더(전역 또는 `with_local_recorder` 범위)에 등록됩니다.
/// 데몬은 스크레이프마다 새 레코더를 만들고 그 범위 안에서 호출합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_gauge};

    // 메타데이터
    describe_gauge!(TABLE_METADATA, TABLE_METADATA_HELP);
    describe_gauge!(CHAIN_METADATA, CHAIN_METADATA_HELP);
    describe_gauge!(SET_METADATA, SET_METADATA_HELP);

    // 통계
    describe_gauge!(CHAIN_RULE_COUNT, CHAIN_RULE_COUNT_HELP);
    describe_counter!(RULE_PACKET_COUNT, RULE_PACKET_COUNT_HELP);
    describe_counter!(RULE_BYTE_COUNT, RULE_BYTE_COUNT_HELP);
    describe_counter!(COUNTER_PACKET_COUNT, COUNTER_PACKET_COUNT_HELP);
    describe_counter!(COUNTER_BYTE_COUNT, COUNTER_BYTE_COUNT_HELP);
    describe_gauge!(SET_SIZE, SET_SIZE_HELP);

    // 수집 상태
    describe_counter!(COLLECTION_FAILURES, COLLECTION_FAILURES_HELP);
    describe_counter!(INELIGIBLE_RULES, INELIGIBLE_RULES_HELP);
    describe_counter!(INELIGIBLE_COUNTERS, INELIGIBLE_COUNTERS_HELP);
    describe_counter!(INELIGIBLE_SETS, INELIGIBLE_SETS_HELP);
}
