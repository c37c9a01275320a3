//! nftwatch 공통 크레이트
//!
//! 설정 로딩, 최상위 에러 타입, 노출 메트릭의 이름/레이블/설명 상수를 제공합니다.
//! 다른 워크스페이스 크레이트는 이 크레이트의 상수만 사용하여 메트릭 표면을 고정합니다.

pub mod config;
pub mod error;
pub mod metrics;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ConfigError, NftwatchError};

// 설정
pub use config::{FilterConfig, GeneralConfig, HttpConfig, NftConfig, NftwatchConfig};
