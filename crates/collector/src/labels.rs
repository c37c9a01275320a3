//! 커널 열거형 → 레이블 문자열 매퍼
//!
//! 모든 매퍼는 전함수(total function)입니다. 알려진 상수는 고정된 소문자 레이블로,
//! 알 수 없는 값은 `unknown(N)`으로 바뀌며 실패하지 않습니다.
//! 비트 플래그의 fallback은 비트 값이 아니라 비트 번호를 출력합니다.

use crate::model::{ChainHook, ChainPolicy, Table, TableFamily};

fn unknown(value: impl std::fmt::Display) -> String {
    format!("unknown({value})")
}

/// 주소 패밀리 레이블
pub fn family_label(family: TableFamily) -> String {
    match family.name() {
        Some(name) => name.to_owned(),
        None => unknown(family.0),
    }
}

/// 체인 정책 레이블
///
/// 정책이 없으면 커널 관례대로 `accept`입니다.
pub fn policy_label(policy: Option<ChainPolicy>) -> String {
    match policy {
        None | Some(ChainPolicy::ACCEPT) => "accept".to_owned(),
        Some(ChainPolicy::DROP) => "drop".to_owned(),
        Some(ChainPolicy(other)) => unknown(other),
    }
}

/// 체인 훅 레이블 (패밀리에 따라 해석이 다름)
pub fn hook_label(family: TableFamily, hook: ChainHook) -> String {
    let known = match family {
        TableFamily::INET | TableFamily::IPV4 | TableFamily::IPV6 => match hook {
            ChainHook::PREROUTING => Some("prerouting"),
            ChainHook::INPUT => Some("input"),
            ChainHook::FORWARD => Some("forward"),
            ChainHook::OUTPUT => Some("output"),
            ChainHook::POSTROUTING => Some("postrouting"),
            _ => None,
        },
        TableFamily::NETDEV => match hook {
            ChainHook::INGRESS => Some("ingress"),
            _ => None,
        },
        _ => None,
    };

    match known {
        Some(label) => label.to_owned(),
        None => unknown(hook.0),
    }
}

/// 테이블 플래그 하나의 레이블
///
/// 0은 `none`입니다. 마스크 매퍼와 달리 빈 문자열이 아닙니다.
pub fn flag_label(flag: u32) -> String {
    match flag {
        0 => "none".to_owned(),
        Table::FLAG_DORMANT => "dormant".to_owned(),
        Table::FLAG_OWNER => "owner".to_owned(),
        Table::FLAG_PERSIST => "persist".to_owned(),
        other => unknown(other.trailing_zeros()),
    }
}

/// 테이블 플래그 마스크 레이블
///
/// 낮은 비트부터 쉼표로 연결합니다. 마스크 0은 빈 문자열입니다.
pub fn flag_mask_label(mask: u32) -> String {
    (0..u32::BITS)
        .map(|bit| 1u32 << bit)
        .filter(|flag| mask & flag != 0)
        .map(flag_label)
        .collect::<Vec<_>>()
        .join(",")
}

/// 체인 우선순위 레이블 (부호 있는 10진수)
pub fn priority_label(priority: i32) -> String {
    priority.to_string()
}

/// 맵 여부 레이블
pub fn ismap_label(is_map: bool) -> &'static str {
    if is_map { "1" } else { "0" }
}
