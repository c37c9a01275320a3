//! 객체 종류별 udata 속성 타입 번호
//!
//! libnftnl의 `udata.h` 번호 체계를 따릅니다.
//! 같은 번호라도 객체 종류에 따라 의미가 다르므로 종류별 모듈로 나눕니다.

/// 테이블 속성
pub mod table {
    pub const COMMENT: u8 = 0;
}

/// 체인 속성
pub mod chain {
    pub const COMMENT: u8 = 0;
}

/// 규칙 속성
pub mod rule {
    pub const COMMENT: u8 = 0;
    /// ebtables 호환 정책
    pub const EBTABLES_POLICY: u8 = 1;
}

/// 상태 객체(counter, quota 등) 속성
pub mod object {
    pub const COMMENT: u8 = 0;
}

/// 셋/맵 속성
pub mod set {
    pub const KEY_BYTEORDER: u8 = 0;
    pub const DATA_BYTEORDER: u8 = 1;
    pub const MERGE_ELEMENTS: u8 = 2;
    pub const KEY_TYPEOF: u8 = 3;
    pub const DATA_TYPEOF: u8 = 4;
    pub const EXPR: u8 = 5;
    pub const DATA_INTERVAL: u8 = 6;
    pub const COMMENT: u8 = 7;

    /// `KEY_TYPEOF` / `DATA_TYPEOF` 내부 중첩 속성
    pub mod typeof_attr {
        pub const EXPR: u8 = 0;
        pub const DATA: u8 = 1;
    }
}

/// 셋 원소 속성
pub mod set_elem {
    pub const COMMENT: u8 = 0;
    pub const FLAGS: u8 = 1;

    /// `FLAGS` 속성 값의 비트
    pub const FLAG_INTERVAL_OPEN: u8 = 0x01;
}
