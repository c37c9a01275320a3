//! 설정 관리 — nftwatch.toml 파싱 및 런타임 설정
//!
//! [`NftwatchConfig`]는 익스포터 전체 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선, 데몬에서 적용)
//! 2. 환경변수 (`NFTWATCH_FILTERS_RULE_COMMENTS=ssh-.*` 형식)
//! 3. 설정 파일 (`nftwatch.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), nftwatch_core::error::NftwatchError> {
//! use nftwatch_core::config::NftwatchConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = NftwatchConfig::load("nftwatch.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = NftwatchConfig::parse("[filters]\nset_names = \"blocklist.*\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, NftwatchError};

/// 지원하는 로그 레벨
const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// 지원하는 로그 형식
const VALID_LOG_FORMATS: [&str; 2] = ["json", "pretty"];

/// 현재 지원하는 유일한 스크레이프 경로
pub const METRICS_ENDPOINT: &str = "/metrics";

/// nftwatch 통합 설정
///
/// `nftwatch.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NftwatchConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// HTTP 노출 설정
    #[serde(default)]
    pub http: HttpConfig,
    /// 객체 필터 설정
    #[serde(default)]
    pub filters: FilterConfig,
    /// nft 바이너리 설정
    #[serde(default)]
    pub nft: NftConfig,
}

impl NftwatchConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, NftwatchError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    ///
    /// 검증은 오버라이드를 모두 적용한 뒤 호출자가 수행합니다.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, NftwatchError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                NftwatchError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                NftwatchError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, NftwatchError> {
        toml::from_str(toml_str).map_err(|e| {
            NftwatchError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `NFTWATCH_{SECTION}_{FIELD}`
    /// 예: `NFTWATCH_HTTP_LISTEN_ADDR=0.0.0.0:9630`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "NFTWATCH_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "NFTWATCH_GENERAL_LOG_FORMAT");

        // HTTP
        override_string(&mut self.http.listen_addr, "NFTWATCH_HTTP_LISTEN_ADDR");
        override_string(&mut self.http.endpoint, "NFTWATCH_HTTP_ENDPOINT");
        override_u64(
            &mut self.http.shutdown_timeout_secs,
            "NFTWATCH_HTTP_SHUTDOWN_TIMEOUT_SECS",
        );

        // Filters
        override_string(
            &mut self.filters.rule_comments,
            "NFTWATCH_FILTERS_RULE_COMMENTS",
        );
        override_string(
            &mut self.filters.counter_names,
            "NFTWATCH_FILTERS_COUNTER_NAMES",
        );
        override_string(&mut self.filters.set_names, "NFTWATCH_FILTERS_SET_NAMES");

        // nft
        override_string(&mut self.nft.binary, "NFTWATCH_NFT_BINARY");
    }

    /// 설정값의 유효성을 검증합니다.
    ///
    /// 필터 패턴의 정규식 문법은 여기서 검사하지 않습니다.
    /// 컬렉터가 필터를 컴파일할 때 검증합니다.
    pub fn validate(&self) -> Result<(), NftwatchError> {
        if !VALID_LOG_LEVELS.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", VALID_LOG_LEVELS.join(", ")),
            }
            .into());
        }

        if !VALID_LOG_FORMATS.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", VALID_LOG_FORMATS.join(", ")),
            }
            .into());
        }

        if self.http.listen_addr.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "http.listen_addr".to_owned(),
                reason: "must not be empty".to_owned(),
            }
            .into());
        }

        if self.http.endpoint != METRICS_ENDPOINT {
            return Err(ConfigError::InvalidValue {
                field: "http.endpoint".to_owned(),
                reason: format!("only '{METRICS_ENDPOINT}' is currently supported"),
            }
            .into());
        }

        if self.http.shutdown_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "http.shutdown_timeout_secs".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        if self.nft.binary.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "nft.binary".to_owned(),
                reason: "must not be empty".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// HTTP 노출 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// 수신 주소 (`host:port`, 호스트명 허용)
    pub listen_addr: String,
    /// 스크레이프 경로
    pub endpoint: String,
    /// 종료 시그널 이후 진행 중인 스크레이프를 기다리는 최대 시간 (초)
    pub shutdown_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:9630".to_owned(),
            endpoint: METRICS_ENDPOINT.to_owned(),
            shutdown_timeout_secs: 5,
        }
    }
}

/// 객체 필터 설정
///
/// 각 패턴은 `^(pattern)$` 형태로 완전 앵커링되어 컴파일됩니다.
/// 부분 일치는 통과하지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// 내보낼 규칙 코멘트 패턴
    pub rule_comments: String,
    /// 내보낼 명명된 카운터 이름 패턴
    pub counter_names: String,
    /// 내보낼 셋/맵 이름 패턴
    pub set_names: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            rule_comments: ".*".to_owned(),
            counter_names: ".*".to_owned(),
            set_names: ".*".to_owned(),
        }
    }
}

/// nft 바이너리 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NftConfig {
    /// nft 실행 파일 경로 (PATH 검색 허용)
    pub binary: String,
}

impl Default for NftConfig {
    fn default() -> Self {
        Self {
            binary: "nft".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}
