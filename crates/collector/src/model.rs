//! 커널 객체 모델
//!
//! 프로바이더가 채워 넘겨주는 읽기 전용 구조체입니다.
//! 컬렉터는 한 번의 수집 패스 동안만 참조하며 스크레이프 사이에 보관하지 않습니다.
//!
//! 열거형 값은 커널 상수 그대로의 숫자 newtype으로 표현합니다.
//! 문자열 레이블 변환은 [`crate::labels`]의 책임입니다.

/// 주소 패밀리 (`NFPROTO_*`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TableFamily(pub u8);

impl TableFamily {
    pub const UNSPEC: Self = Self(0);
    pub const INET: Self = Self(1);
    pub const IPV4: Self = Self(2);
    pub const ARP: Self = Self(3);
    pub const NETDEV: Self = Self(5);
    pub const BRIDGE: Self = Self(7);
    pub const IPV6: Self = Self(10);

    /// nft 문법의 패밀리 이름 (`ip`, `ip6`, `inet` 등)
    pub fn name(self) -> Option<&'static str> {
        match self {
            Self::INET => Some("inet"),
            Self::IPV4 => Some("ip"),
            Self::IPV6 => Some("ip6"),
            Self::ARP => Some("arp"),
            Self::NETDEV => Some("netdev"),
            Self::BRIDGE => Some("bridge"),
            _ => None,
        }
    }

    /// nft 문법의 패밀리 이름을 해석합니다.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "inet" => Some(Self::INET),
            "ip" => Some(Self::IPV4),
            "ip6" => Some(Self::IPV6),
            "arp" => Some(Self::ARP),
            "netdev" => Some(Self::NETDEV),
            "bridge" => Some(Self::BRIDGE),
            _ => None,
        }
    }
}

/// 체인 훅 번호. 의미는 테이블 패밀리에 따라 다릅니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChainHook(pub u32);

impl ChainHook {
    // NF_INET_* (inet, ip, ip6, bridge)
    pub const PREROUTING: Self = Self(0);
    pub const INPUT: Self = Self(1);
    pub const FORWARD: Self = Self(2);
    pub const OUTPUT: Self = Self(3);
    pub const POSTROUTING: Self = Self(4);
    /// inet 패밀리의 ingress 훅 (`NF_INET_INGRESS`)
    pub const INET_INGRESS: Self = Self(5);

    // NF_NETDEV_*
    pub const INGRESS: Self = Self(0);
    pub const EGRESS: Self = Self(1);

    // NF_ARP_*
    pub const ARP_IN: Self = Self(0);
    pub const ARP_OUT: Self = Self(1);
    pub const ARP_FORWARD: Self = Self(2);
}

/// 체인 기본 정책 (`NF_DROP`, `NF_ACCEPT`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainPolicy(pub u32);

impl ChainPolicy {
    pub const DROP: Self = Self(0);
    pub const ACCEPT: Self = Self(1);
}

/// 테이블
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub name: String,
    pub family: TableFamily,
    /// `NFT_TABLE_F_*` 비트마스크
    pub flags: u32,
}

impl Table {
    pub const FLAG_DORMANT: u32 = 0x1;
    pub const FLAG_OWNER: u32 = 0x2;
    pub const FLAG_PERSIST: u32 = 0x4;

    pub fn new(name: impl Into<String>, family: TableFamily) -> Self {
        Self {
            name: name.into(),
            family,
            flags: 0,
        }
    }

    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }
}

/// 체인
///
/// 기본 체인이 아닌 일반 체인은 훅 0, 정책 없음, 우선순위 0으로 표현됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Chain {
    pub name: String,
    /// 소속 테이블
    pub table: Table,
    pub hook: ChainHook,
    /// `None`이면 커널 기본값(accept)
    pub policy: Option<ChainPolicy>,
    pub priority: i32,
}

impl Chain {
    pub fn new(name: impl Into<String>, table: Table) -> Self {
        Self {
            name: name.into(),
            table,
            ..Self::default()
        }
    }

    pub fn with_hook(mut self, hook: ChainHook, priority: i32) -> Self {
        self.hook = hook;
        self.priority = priority;
        self
    }

    pub fn with_policy(mut self, policy: ChainPolicy) -> Self {
        self.policy = Some(policy);
        self
    }
}

/// 패킷/바이트 누적값
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counter {
    pub packets: u64,
    pub bytes: u64,
}

/// 규칙 표현식
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// 익명 카운터 표현식
    Counter(Counter),
    /// 그 외 매치/액션 표현식 (종류 이름만 보존)
    Other(String),
}

/// 규칙
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Rule {
    pub handle: u64,
    /// udata TLV 블롭 (코멘트 등)
    pub user_data: Option<Vec<u8>>,
    pub exprs: Vec<Expr>,
}

/// 테이블 범위의 상태 객체
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    /// 명명된 카운터
    Counter { name: String, counter: Counter },
    /// 그 외 객체 (quota, limit, ct helper 등)
    Other { kind: String, name: String },
}

/// 셋 또는 맵
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Set {
    pub name: String,
    /// 소속 테이블
    pub table: Table,
    pub is_map: bool,
    /// 키 타입 이름 (`ipv4_addr`, 연결 타입은 `ipv4_addr . inet_service`)
    pub key_type: String,
    /// 맵의 값 타입 이름. 셋이면 `None`
    pub data_type: Option<String>,
}

/// 셋 원소. 컬렉터는 개수만 사용합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetElement {
    pub key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_names_round_trip() {
        for family in [
            TableFamily::INET,
            TableFamily::IPV4,
            TableFamily::IPV6,
            TableFamily::ARP,
            TableFamily::NETDEV,
            TableFamily::BRIDGE,
        ] {
            let name = family.name().unwrap();
            assert_eq!(TableFamily::from_name(name), Some(family));
        }
    }

    #[test]
    fn unknown_family_has_no_name() {
        assert_eq!(TableFamily::UNSPEC.name(), None);
        assert_eq!(TableFamily(42).name(), None);
        assert_eq!(TableFamily::from_name("decnet"), None);
    }

    #[test]
    fn default_chain_is_regular_chain() {
        let chain = Chain::new("c", Table::new("t", TableFamily::INET));
        assert_eq!(chain.hook, ChainHook::PREROUTING);
        assert_eq!(chain.policy, None);
        assert_eq!(chain.priority, 0);
    }
}
