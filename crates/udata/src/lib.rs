//! nftwatch-udata — nftables 사용자 데이터(udata) 속성 코덱
//!
//! 커널 객체(테이블, 체인, 규칙, 객체, 셋)에 붙는 불투명 바이트 블롭을
//! 타입-길이-값(TLV) 레코드 스트림으로 해석합니다.
//!
//! # 바이너리 레이아웃
//! ```text
//! +------+--------+-------------------+------+--------+-----
//! | type | len(L) | payload (L bytes) | type | len(L) | ...
//! +------+--------+-------------------+------+--------+-----
//! ```
//!
//! 디코더는 엄격하며 복구하지 않습니다. 잘못된 레코드 하나가 블롭 전체의
//! 디코딩을 중단시키고, 그 이전까지 디코딩된 속성은 에러와 함께 반환됩니다.
//!
//! # 사용 예시
//! ```
//! use nftwatch_udata::{comment_attr, find_comment, rule_attr, unmarshal};
//! use nftwatch_udata::consts::rule;
//!
//! let blob = comment_attr(rule::COMMENT, "allow ssh").unwrap();
//! let attrs = unmarshal(&blob, rule_attr).unwrap();
//! assert_eq!(find_comment(&attrs), Some("allow ssh"));
//! ```

pub mod attr;
pub mod consts;
pub mod error;
pub mod marshal;
pub mod unmarshal;

pub use attr::{
    Attr, chain_attr, find_comment, object_attr, rule_attr, set_attr, table_attr,
};
pub use error::{DecodeFailure, UdataError};
pub use marshal::{Marshaller, comment_attr};
pub use unmarshal::{Record, Unmarshaller, unmarshal};
