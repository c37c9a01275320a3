//! TLV 레코드 분리기와 블롭 디코더

use crate::attr::Attr;
use crate::error::{DecodeFailure, UdataError};

/// 레코드 헤더 크기 (type 1바이트 + length 1바이트)
const HEADER_LEN: usize = 2;

/// 해석 전 원시 레코드
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    /// 속성 타입 번호
    pub kind: u8,
    /// 페이로드 (길이 필드만큼)
    pub body: &'a [u8],
}

/// udata 바이트를 레코드 스트림으로 분리하는 반복자
///
/// 에러를 만나면 해당 에러를 한 번 내보낸 뒤 종료합니다.
///
/// ```
/// use nftwatch_udata::Unmarshaller;
///
/// let mut it = Unmarshaller::new(&[1, 3, b'o', b'n', b'e', 2, 3, b't', b'w', b'o']);
/// let first = it.next().unwrap().unwrap();
/// assert_eq!((first.kind, first.body), (1, &b"one"[..]));
/// let second = it.next().unwrap().unwrap();
/// assert_eq!((second.kind, second.body), (2, &b"two"[..]));
/// assert!(it.next().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Unmarshaller<'a> {
    tail: &'a [u8],
    failed: bool,
}

impl<'a> Unmarshaller<'a> {
    /// 주어진 바이트를 읽는 분리기를 생성합니다.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            tail: bytes,
            failed: false,
        }
    }

    /// 아직 읽지 않은 바이트 수
    pub fn remaining(&self) -> usize {
        self.tail.len()
    }

    fn fail(&mut self, err: UdataError) -> Option<Result<Record<'a>, UdataError>> {
        self.failed = true;
        Some(Err(err))
    }
}

impl<'a> Iterator for Unmarshaller<'a> {
    type Item = Result<Record<'a>, UdataError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        match self.tail {
            [] => None,
            [_] => self.fail(UdataError::TruncatedHeader { remaining: 1 }),
            [kind, len, rest @ ..] => {
                let want = usize::from(*len);
                if rest.len() < want {
                    return self.fail(UdataError::TruncatedAttribute {
                        got: rest.len(),
                        want,
                    });
                }

                let kind = *kind;
                let (body, tail) = rest.split_at(want);
                self.tail = tail;
                Some(Ok(Record { kind, body }))
            }
        }
    }
}

/// 블롭 전체를 해석기로 디코딩합니다.
///
/// 첫 에러(레코드 분리 실패 또는 해석기 에러)에서 중단하며,
/// 그 이전까지 디코딩된 속성은 [`DecodeFailure::decoded`]에 담깁니다.
pub fn unmarshal<F>(bytes: &[u8], mut interpret: F) -> Result<Vec<Attr>, DecodeFailure>
where
    F: FnMut(u8, &[u8]) -> Result<Attr, UdataError>,
{
    let mut decoded = Vec::new();

    for record in Unmarshaller::new(bytes) {
        let attr = record
            .and_then(|r| interpret(r.kind, r.body))
            .map_err(|error| DecodeFailure {
                decoded: std::mem::take(&mut decoded),
                error,
            })?;
        decoded.push(attr);
    }

    Ok(decoded)
}

/// 헤더를 포함한 레코드 전체 길이
pub(crate) const fn record_len(body_len: usize) -> usize {
    HEADER_LEN + body_len
}
