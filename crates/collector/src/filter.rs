//! 객체 필터 -- 규칙 코멘트, 카운터 이름, 셋 이름
//!
//! 필터는 문자열 하나에 대한 순수 함수입니다. 클로저도 [`NameFilter`]를 구현하므로
//! 테스트에서 정규식 없이 바로 주입할 수 있습니다.
//! 설정 기반 필터는 `^(pattern)$`로 완전 앵커링된 정규식이며,
//! 로딩 시 한 번만 컴파일합니다.

use regex::Regex;

use nftwatch_core::config::FilterConfig;

use crate::error::CollectorError;

/// 모든 이름을 통과시키는 기본 패턴
pub const MATCH_ALL: &str = ".*";

/// 이름 필터
pub trait NameFilter: Send + Sync {
    /// 내보낼 대상이면 true
    fn matches(&self, name: &str) -> bool;
}

impl<F> NameFilter for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn matches(&self, name: &str) -> bool {
        self(name)
    }
}

/// 완전 앵커링된 정규식 필터
#[derive(Debug, Clone)]
pub struct AnchoredPattern {
    pattern: String,
    regex: Regex,
}

impl AnchoredPattern {
    /// 패턴을 `^(pattern)$`로 감싸 컴파일합니다.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^({pattern})$"))?;
        Ok(Self {
            pattern: pattern.to_owned(),
            regex,
        })
    }

    /// 사용자가 지정한 원래 패턴
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl NameFilter for AnchoredPattern {
    fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

/// 컬렉터에 주입되는 세 필터 묶음
pub struct Filters {
    pub rule_comments: Box<dyn NameFilter>,
    pub counter_names: Box<dyn NameFilter>,
    pub set_names: Box<dyn NameFilter>,
}

impl Filters {
    /// 모든 객체를 통과시키는 필터
    pub fn match_all() -> Self {
        Self {
            rule_comments: Box::new(|_: &str| true),
            counter_names: Box::new(|_: &str| true),
            set_names: Box::new(|_: &str| true),
        }
    }

    /// 설정의 패턴을 컴파일합니다.
    pub fn from_config(config: &FilterConfig) -> Result<Self, CollectorError> {
        Ok(Self {
            rule_comments: Box::new(compile("rule-comments", &config.rule_comments)?),
            counter_names: Box::new(compile("counter-names", &config.counter_names)?),
            set_names: Box::new(compile("set-names", &config.set_names)?),
        })
    }

    pub fn with_rule_comments(mut self, filter: impl NameFilter + 'static) -> Self {
        self.rule_comments = Box::new(filter);
        self
    }

    pub fn with_counter_names(mut self, filter: impl NameFilter + 'static) -> Self {
        self.counter_names = Box::new(filter);
        self
    }

    pub fn with_set_names(mut self, filter: impl NameFilter + 'static) -> Self {
        self.set_names = Box::new(filter);
        self
    }
}

impl Default for Filters {
    fn default() -> Self {
        Self::match_all()
    }
}

impl std::fmt::Debug for Filters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filters").finish_non_exhaustive()
    }
}

fn compile(filter: &'static str, pattern: &str) -> Result<AnchoredPattern, CollectorError> {
    AnchoredPattern::new(pattern).map_err(|e| CollectorError::InvalidPattern {
        filter,
        pattern: pattern.to_owned(),
        reason: e.to_string(),
    })
}
