//! udata 에러 타입

use crate::attr::Attr;

/// udata 디코딩/인코딩 에러
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UdataError {
    /// 레코드 헤더(2바이트)를 읽기 전에 데이터가 끝남
    #[error("incomplete udata attribute header: {remaining} bytes")]
    TruncatedHeader {
        /// 남은 바이트 수
        remaining: usize,
    },

    /// 헤더가 선언한 길이보다 페이로드가 짧음
    #[error("incomplete udata attribute: got {got} bytes, want {want} bytes")]
    TruncatedAttribute {
        /// 실제로 남은 페이로드 바이트 수
        got: usize,
        /// 헤더가 선언한 페이로드 길이
        want: usize,
    },

    /// 문자열 페이로드가 비어 있거나 NUL로 끝나지 않음
    #[error("incomplete string data")]
    IncompleteString,

    /// 인코딩 시 페이로드가 1바이트 길이 필드로 표현할 수 없을 만큼 김
    #[error("udata attribute too long: {len} bytes (max {max})", max = u8::MAX)]
    AttributeTooLong {
        /// 페이로드 길이
        len: usize,
    },
}

/// 블롭 디코딩 실패
///
/// 실패한 레코드 이전까지 디코딩된 속성을 에러와 함께 보존합니다.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{error} (after {} decoded attributes)", .decoded.len())]
pub struct DecodeFailure {
    /// 실패 이전에 디코딩된 속성 (원래 순서)
    pub decoded: Vec<Attr>,
    /// 디코딩을 중단시킨 에러
    pub error: UdataError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_attribute_display() {
        let err = UdataError::TruncatedAttribute { got: 1, want: 2 };
        assert_eq!(
            err.to_string(),
            "incomplete udata attribute: got 1 bytes, want 2 bytes"
        );
    }

    #[test]
    fn too_long_display_mentions_limit() {
        let err = UdataError::AttributeTooLong { len: 300 };
        assert!(err.to_string().contains("max 255"));
    }

    #[test]
    fn decode_failure_display_counts_decoded() {
        let failure = DecodeFailure {
            decoded: vec![Attr::Comment("a".to_owned())],
            error: UdataError::TruncatedHeader { remaining: 1 },
        };
        let msg = failure.to_string();
        assert!(msg.contains("header"));
        assert!(msg.contains("after 1 decoded"));
    }
}
