//! 디코딩된 속성과 객체 종류별 해석기
//!
//! 해석기(interpreter)는 `(타입 번호, 페이로드)`를 받아 [`Attr`]를 돌려주는 함수입니다.
//! 알 수 없는 타입은 버리지 않고 [`Attr::Unknown`]으로 보존하여
//! "코멘트 없음"과 "데이터 손상"을 호출자가 구분할 수 있게 합니다.

use crate::consts;
use crate::error::UdataError;

/// 디코딩된 udata 속성
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attr {
    /// 사람이 작성한 코멘트 (NUL 종료자 제거됨)
    Comment(String),
    /// 해석기가 알지 못하는 속성 (원본 그대로 보존)
    Unknown {
        /// 속성 타입 번호
        kind: u8,
        /// 원본 페이로드
        body: Vec<u8>,
    },
}

impl Attr {
    /// 코멘트 속성이면 문자열을 반환합니다.
    pub fn as_comment(&self) -> Option<&str> {
        match self {
            Self::Comment(s) => Some(s),
            Self::Unknown { .. } => None,
        }
    }

    fn unknown(kind: u8, body: &[u8]) -> Self {
        Self::Unknown {
            kind,
            body: body.to_vec(),
        }
    }
}

/// 속성 목록에서 첫 번째 코멘트를 찾습니다.
pub fn find_comment(attrs: &[Attr]) -> Option<&str> {
    attrs.iter().find_map(Attr::as_comment)
}

/// 테이블 udata 해석기
pub fn table_attr(kind: u8, body: &[u8]) -> Result<Attr, UdataError> {
    match kind {
        consts::table::COMMENT => comment(body),
        _ => Ok(Attr::unknown(kind, body)),
    }
}

/// 체인 udata 해석기
pub fn chain_attr(kind: u8, body: &[u8]) -> Result<Attr, UdataError> {
    match kind {
        consts::chain::COMMENT => comment(body),
        _ => Ok(Attr::unknown(kind, body)),
    }
}

/// 규칙 udata 해석기
pub fn rule_attr(kind: u8, body: &[u8]) -> Result<Attr, UdataError> {
    match kind {
        consts::rule::COMMENT => comment(body),
        _ => Ok(Attr::unknown(kind, body)),
    }
}

/// 상태 객체 udata 해석기
pub fn object_attr(kind: u8, body: &[u8]) -> Result<Attr, UdataError> {
    match kind {
        consts::object::COMMENT => comment(body),
        _ => Ok(Attr::unknown(kind, body)),
    }
}

/// 셋/맵 udata 해석기
///
/// 바이트 오더, typeof 표현식 등은 [`Attr::Unknown`]으로 남깁니다.
pub fn set_attr(kind: u8, body: &[u8]) -> Result<Attr, UdataError> {
    match kind {
        consts::set::COMMENT => comment(body),
        _ => Ok(Attr::unknown(kind, body)),
    }
}

/// NUL 종료 문자열 페이로드를 디코딩합니다.
///
/// 정확히 마지막 NUL 한 바이트만 제거합니다. UTF-8이 아닌 바이트는 대체 문자로 바뀝니다.
fn comment(body: &[u8]) -> Result<Attr, UdataError> {
    match body.split_last() {
        Some((&0, text)) => Ok(Attr::Comment(String::from_utf8_lossy(text).into_owned())),
        _ => Err(UdataError::IncompleteString),
    }
}
