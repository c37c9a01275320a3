//! 컬렉터 에러 타입
//!
//! - [`ProviderError`]: 커널 상태 조회 실패. 수집 중에는 로그와 실패 카운터로만 보고됩니다.
//! - [`CollectorError`]: 컬렉터 구성(필터 컴파일, 시작 프로브) 실패.

/// 커널 상태 프로바이더 에러
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// nft 프로세스 실행 실패
    #[error("failed to run '{binary}': {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    /// nft가 0이 아닌 상태로 종료
    #[error("'{command}' failed ({status}): {stderr}")]
    Command {
        command: String,
        status: String,
        stderr: String,
    },

    /// nft JSON 출력 형식 오류
    #[error("malformed nft output: {0}")]
    Malformed(String),

    /// 요청한 객체가 없음
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    /// 룰셋 파일 읽기 실패
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 기타 실패
    #[error("{0}")]
    Other(String),
}

/// 컬렉터 구성 에러
#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    /// 필터 패턴 컴파일 실패
    #[error("invalid {filter} pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// 필터 이름 (rule-comments, counter-names, set-names)
        filter: &'static str,
        pattern: String,
        reason: String,
    },

    /// 커널 상태 접근 실패
    #[error("unable to access nftables: {0}")]
    Provider(#[from] ProviderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_error_display() {
        let err = ProviderError::Command {
            command: "nft --json list tables".to_owned(),
            status: "exit status: 1".to_owned(),
            stderr: "Operation not permitted".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "'nft --json list tables' failed (exit status: 1): Operation not permitted"
        );
    }

    #[test]
    fn invalid_pattern_display() {
        let err = CollectorError::InvalidPattern {
            filter: "set-names",
            pattern: "(".to_owned(),
            reason: "unclosed group".to_owned(),
        };
        assert!(err.to_string().contains("set-names"));
        assert!(err.to_string().contains("'('"));
    }

    #[test]
    fn provider_error_converts() {
        let err: CollectorError = ProviderError::Other("denied".to_owned()).into();
        assert!(matches!(err, CollectorError::Provider(_)));
        assert_eq!(err.to_string(), "unable to access nftables: denied");
    }
}
