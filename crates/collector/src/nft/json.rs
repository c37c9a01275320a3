//! `nft --json` 출력 해석
//!
//! libnftables JSON 스키마(`{"nftables": [{"table": {...}}, {"chain": {...}}, ...]}`)를
//! 커널 객체 모델로 되돌립니다. 이름으로 표현된 패밀리/훅/정책/플래그는 커널 상수로,
//! 규칙 코멘트는 커널과 같은 udata TLV 블롭으로 다시 인코딩합니다.
//!
//! 알 수 없는 최상위 항목(`metainfo` 등)은 무시합니다.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use nftwatch_udata::{comment_attr, consts};

use crate::error::ProviderError;
use crate::model::{
    Chain, ChainHook, ChainPolicy, Counter, Expr, Object, Rule, Set, SetElement, Table,
    TableFamily,
};

/// 커널에 없는 훅 이름을 표현하는 값. 레이블 매퍼에서 `unknown(N)`이 됩니다.
pub const UNKNOWN_HOOK: ChainHook = ChainHook(u32::MAX);

/// 커널에 없는 정책 이름을 표현하는 값.
pub const UNKNOWN_POLICY: ChainPolicy = ChainPolicy(u32::MAX);

/// 카운터 외에 테이블이 가질 수 있는 상태 객체 종류
const OTHER_OBJECT_KINDS: &[&str] = &[
    "quota",
    "limit",
    "ct helper",
    "ct timeout",
    "ct expectation",
    "secmark",
    "synproxy",
];

/// 최상위 항목 하나
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NftObject {
    Table(Table),
    /// `chain.table`은 이름과 패밀리만 채워져 있습니다.
    Chain(Chain),
    Rule {
        family: TableFamily,
        table: String,
        chain: String,
        rule: Rule,
    },
    /// 셋/맵과 함께 출력된 원소
    Set { set: Set, elements: Vec<SetElement> },
    Object {
        family: TableFamily,
        table: String,
        object: Object,
    },
}

/// `nft --json` 출력 전체를 해석합니다.
pub fn parse_document(text: &str) -> Result<Vec<NftObject>, ProviderError> {
    let json: Value = serde_json::from_str(text)
        .map_err(|e| ProviderError::Malformed(format!("invalid JSON: {e}")))?;

    let entries = json
        .get("nftables")
        .and_then(Value::as_array)
        .ok_or_else(|| ProviderError::Malformed("missing nftables array".to_owned()))?;

    let mut objects = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some((kind, body)) = entry.as_object().and_then(|o| o.iter().next()) else {
            return Err(ProviderError::Malformed(format!(
                "expected single-key object, got {entry}"
            )));
        };
        if let Some(object) = parse_entry(kind, body)? {
            objects.push(object);
        }
    }
    Ok(objects)
}

fn parse_entry(kind: &str, body: &Value) -> Result<Option<NftObject>, ProviderError> {
    let obj = body
        .as_object()
        .ok_or_else(|| ProviderError::Malformed(format!("{kind}: expected object")))?;

    let parsed = match kind {
        "table" => NftObject::Table(parse_table(obj)?),
        "chain" => NftObject::Chain(parse_chain(obj)?),
        "rule" => parse_rule(obj)?,
        "set" | "map" => parse_set(obj)?,
        "counter" => NftObject::Object {
            family: family_field(obj)?,
            table: str_field(obj, "table")?.to_owned(),
            object: Object::Counter {
                name: str_field(obj, "name")?.to_owned(),
                counter: Counter {
                    packets: u64_field(obj, "packets"),
                    bytes: u64_field(obj, "bytes"),
                },
            },
        },
        k if OTHER_OBJECT_KINDS.contains(&k) => NftObject::Object {
            family: family_field(obj)?,
            table: str_field(obj, "table")?.to_owned(),
            object: Object::Other {
                kind: k.to_owned(),
                name: str_field(obj, "name")?.to_owned(),
            },
        },
        other => {
            debug!(kind = other, "ignoring nft JSON entry");
            return Ok(None);
        }
    };
    Ok(Some(parsed))
}

fn parse_table(obj: &Map<String, Value>) -> Result<Table, ProviderError> {
    let table = Table::new(str_field(obj, "name")?, family_field(obj)?);
    let flags = string_list(obj.get("flags"))
        .iter()
        .fold(0, |mask, name| mask | table_flag(name));
    Ok(table.with_flags(flags))
}

fn table_flag(name: &str) -> u32 {
    match name {
        "dormant" => Table::FLAG_DORMANT,
        "owner" => Table::FLAG_OWNER,
        "persist" => Table::FLAG_PERSIST,
        other => {
            debug!(flag = other, "unknown table flag");
            0
        }
    }
}

fn parse_chain(obj: &Map<String, Value>) -> Result<Chain, ProviderError> {
    let family = family_field(obj)?;
    let table = Table::new(str_field(obj, "table")?, family);
    let mut chain = Chain::new(str_field(obj, "name")?, table);

    // 기본 체인만 hook/prio/policy를 가진다
    if let Some(hook) = obj.get("hook").and_then(Value::as_str) {
        let prio = obj.get("prio").and_then(Value::as_i64).unwrap_or(0);
        let prio = i32::try_from(prio)
            .map_err(|_| ProviderError::Malformed(format!("chain priority out of range: {prio}")))?;
        chain = chain.with_hook(hook_from_name(family, hook), prio);

        if let Some(policy) = obj.get("policy").and_then(Value::as_str) {
            chain = chain.with_policy(policy_from_name(policy));
        }
    }
    Ok(chain)
}

/// 패밀리별 훅 이름을 커널 훅 번호로 바꿉니다.
pub fn hook_from_name(family: TableFamily, name: &str) -> ChainHook {
    let hook = match family {
        TableFamily::INET | TableFamily::IPV4 | TableFamily::IPV6 | TableFamily::BRIDGE => {
            match name {
                "prerouting" => Some(ChainHook::PREROUTING),
                "input" => Some(ChainHook::INPUT),
                "forward" => Some(ChainHook::FORWARD),
                "output" => Some(ChainHook::OUTPUT),
                "postrouting" => Some(ChainHook::POSTROUTING),
                "ingress" if family == TableFamily::INET => Some(ChainHook::INET_INGRESS),
                _ => None,
            }
        }
        TableFamily::NETDEV => match name {
            "ingress" => Some(ChainHook::INGRESS),
            "egress" => Some(ChainHook::EGRESS),
            _ => None,
        },
        TableFamily::ARP => match name {
            "input" => Some(ChainHook::ARP_IN),
            "output" => Some(ChainHook::ARP_OUT),
            "forward" => Some(ChainHook::ARP_FORWARD),
            _ => None,
        },
        _ => None,
    };
    hook.unwrap_or_else(|| {
        debug!(family = family.0, hook = name, "unknown chain hook");
        UNKNOWN_HOOK
    })
}

fn policy_from_name(name: &str) -> ChainPolicy {
    match name {
        "accept" => ChainPolicy::ACCEPT,
        "drop" => ChainPolicy::DROP,
        other => {
            debug!(policy = other, "unknown chain policy");
            UNKNOWN_POLICY
        }
    }
}

fn parse_rule(obj: &Map<String, Value>) -> Result<NftObject, ProviderError> {
    let family = family_field(obj)?;
    let table = str_field(obj, "table")?.to_owned();
    let chain = str_field(obj, "chain")?.to_owned();

    let user_data = match obj.get("comment").and_then(Value::as_str) {
        Some(comment) => match comment_attr(consts::rule::COMMENT, comment) {
            Ok(blob) => Some(blob),
            Err(e) => {
                warn!(%table, %chain, error = %e, "dropping rule comment");
                None
            }
        },
        None => None,
    };

    let exprs: Vec<Expr> = obj
        .get("expr")
        .and_then(Value::as_array)
        .map(|exprs| exprs.iter().map(parse_expr).collect())
        .unwrap_or_default();

    Ok(NftObject::Rule {
        family,
        table,
        chain,
        rule: Rule {
            handle: u64_field(obj, "handle"),
            user_data,
            exprs,
        },
    })
}

fn parse_expr(expr: &Value) -> Expr {
    let Some((kind, body)) = expr.as_object().and_then(|o| o.iter().next()) else {
        return Expr::Other(String::new());
    };
    match (kind.as_str(), body.as_object()) {
        // 문자열 형태의 counter는 명명된 카운터 참조
        ("counter", Some(counter)) => Expr::Counter(Counter {
            packets: u64_field(counter, "packets"),
            bytes: u64_field(counter, "bytes"),
        }),
        _ => Expr::Other(kind.clone()),
    }
}

fn parse_set(obj: &Map<String, Value>) -> Result<NftObject, ProviderError> {
    let family = family_field(obj)?;
    let table = Table::new(str_field(obj, "table")?, family);
    let data_type = obj.get("map").map(|v| type_name(Some(v)));

    let set = Set {
        name: str_field(obj, "name")?.to_owned(),
        table,
        is_map: data_type.is_some(),
        key_type: type_name(obj.get("type")),
        data_type,
    };

    let elements: Vec<SetElement> = obj
        .get("elem")
        .and_then(Value::as_array)
        .map(|elems| elems.iter().map(parse_element).collect())
        .unwrap_or_default();

    Ok(NftObject::Set { set, elements })
}

static NULL: Value = Value::Null;

fn parse_element(elem: &Value) -> SetElement {
    // 맵 원소는 [key, value] 쌍, 카운터 등이 붙은 원소는 {"elem": {"val": ...}}
    let key = match elem {
        Value::Array(pair) => pair.first().unwrap_or(&NULL),
        Value::Object(o) => o
            .get("elem")
            .and_then(|e| e.get("val"))
            .unwrap_or(elem),
        _ => elem,
    };
    SetElement {
        key: match key {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        },
    }
}

/// 연결(concatenation) 타입은 배열로 오며 ` . `로 잇습니다.
fn type_name(value: Option<&Value>) -> String {
    string_list(value).join(" . ")
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_owned)
            .collect(),
        _ => Vec::new(),
    }
}

fn str_field<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<&'a str, ProviderError> {
    obj.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| ProviderError::Malformed(format!("missing string field '{key}'")))
}

fn u64_field(obj: &Map<String, Value>, key: &str) -> u64 {
    obj.get(key).and_then(Value::as_u64).unwrap_or(0)
}

fn family_field(obj: &Map<String, Value>) -> Result<TableFamily, ProviderError> {
    let name = str_field(obj, "family")?;
    Ok(TableFamily::from_name(name).unwrap_or_else(|| {
        debug!(family = name, "unknown address family");
        TableFamily::UNSPEC
    }))
}
