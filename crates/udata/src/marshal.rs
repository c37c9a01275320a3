//! TLV 인코더
//!
//! nft 도구가 보고한 코멘트를 커널과 같은 udata 블롭으로 다시 만들 때 사용합니다.

use crate::error::UdataError;
use crate::unmarshal::record_len;

/// 레코드 하나가 담을 수 있는 최대 페이로드 길이
pub const MAX_ATTR_LEN: usize = u8::MAX as usize;

/// udata 블롭 빌더
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Marshaller {
    buf: Vec<u8>,
}

impl Marshaller {
    pub fn new() -> Self {
        Self::default()
    }

    /// 원시 레코드를 추가합니다.
    pub fn put(&mut self, kind: u8, body: &[u8]) -> Result<&mut Self, UdataError> {
        let len = u8::try_from(body.len())
            .map_err(|_| UdataError::AttributeTooLong { len: body.len() })?;

        self.buf.reserve(record_len(body.len()));
        self.buf.push(kind);
        self.buf.push(len);
        self.buf.extend_from_slice(body);
        Ok(self)
    }

    /// NUL 종료 문자열 레코드를 추가합니다.
    pub fn put_string(&mut self, kind: u8, value: &str) -> Result<&mut Self, UdataError> {
        let mut body = Vec::with_capacity(value.len() + 1);
        body.extend_from_slice(value.as_bytes());
        body.push(0);
        self.put(kind, &body)
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// 코멘트 하나만 담은 블롭을 만듭니다.
///
/// `kind`는 객체 종류별 코멘트 번호입니다 (예: [`crate::consts::rule::COMMENT`]).
pub fn comment_attr(kind: u8, comment: &str) -> Result<Vec<u8>, UdataError> {
    let mut m = Marshaller::new();
    m.put_string(kind, comment)?;
    Ok(m.into_bytes())
}
