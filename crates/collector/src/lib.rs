//! nftwatch-collector -- nftables 커널 상태 수집 파이프라인
//!
//! 프로바이더에서 테이블/체인/규칙/카운터/셋을 읽어 필터와 레이블 매퍼를 거쳐
//! 메트릭 관측값([`Sample`])으로 바꿉니다. 노출 형식은 알지 못합니다.
//!
//! # 구성 요소
//! - [`model`]: 커널 객체 모델
//! - [`provider`]: 커널 상태 조회 trait
//! - [`nft`]: `nft --json` 기반 프로바이더와 룰셋 스냅샷
//! - [`labels`]: 커널 열거형 → 레이블 매퍼
//! - [`filter`]: 앵커링 정규식 필터
//! - [`extract`]: 규칙 코멘트/카운터 추출
//! - [`stats`]: 제외/실패 카운터
//! - [`collector`]: 수집 패스

pub mod collector;
pub mod error;
pub mod extract;
pub mod filter;
pub mod labels;
pub mod model;
pub mod nft;
pub mod provider;
pub mod sink;
pub mod stats;

pub use collector::Collector;
pub use error::{CollectorError, ProviderError};
pub use filter::{AnchoredPattern, Filters, NameFilter};
pub use model::{
    Chain, ChainHook, ChainPolicy, Counter, Expr, Object, Rule, Set, SetElement, Table,
    TableFamily,
};
pub use nft::{NftCli, RulesetSnapshot};
pub use provider::KernelStateProvider;
pub use sink::{Metric, MetricKind, MetricSink, Sample};
pub use stats::{CollectionStats, IneligibleKind, Reason};
