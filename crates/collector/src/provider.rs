//! 커널 상태 프로바이더 추상화
//!
//! [`KernelStateProvider`]는 컬렉터가 소비하는 유일한 외부 경계입니다.
//! 운영 환경에서는 [`NftCli`](crate::nft::NftCli)가, 오프라인 내보내기와 테스트에서는
//! [`RulesetSnapshot`](crate::nft::RulesetSnapshot)이나 mock이 구현합니다.
//!
//! ```text
//! ┌───────────┐
//! │ Collector │
//! └─────┬─────┘
//!       ▼
//! ┌─────────────────────┐
//! │ KernelStateProvider │ (trait)
//! └─────────────────────┘
//!     │        │       │
//!     ▼        ▼       ▼
//!  NftCli  Snapshot   Mock
//! ```
//!
//! 모든 호출은 동기식이며 재시도하지 않습니다. 동시 호출 직렬화는 컬렉터가 담당합니다.

use crate::error::ProviderError;
use crate::model::{Chain, Object, Rule, Set, SetElement, Table};

/// 커널 상태 조회 능력
pub trait KernelStateProvider: Send {
    /// 모든 테이블을 나열합니다.
    fn list_tables(&self) -> Result<Vec<Table>, ProviderError>;

    /// 모든 테이블의 모든 체인을 나열합니다.
    fn list_chains(&self) -> Result<Vec<Chain>, ProviderError>;

    /// 테이블의 상태 객체(카운터 등)를 조회합니다.
    fn get_objects(&self, table: &Table) -> Result<Vec<Object>, ProviderError>;

    /// 체인의 규칙을 순서대로 조회합니다.
    fn get_rules(&self, table: &Table, chain: &Chain) -> Result<Vec<Rule>, ProviderError>;

    /// 테이블의 셋/맵을 조회합니다.
    fn get_sets(&self, table: &Table) -> Result<Vec<Set>, ProviderError>;

    /// 셋의 원소를 조회합니다.
    fn get_set_elements(&self, set: &Set) -> Result<Vec<SetElement>, ProviderError>;
}

impl<P: KernelStateProvider + ?Sized> KernelStateProvider for Box<P> {
    fn list_tables(&self) -> Result<Vec<Table>, ProviderError> {
        (**self).list_tables()
    }

    fn list_chains(&self) -> Result<Vec<Chain>, ProviderError> {
        (**self).list_chains()
    }

    fn get_objects(&self, table: &Table) -> Result<Vec<Object>, ProviderError> {
        (**self).get_objects(table)
    }

    fn get_rules(&self, table: &Table, chain: &Chain) -> Result<Vec<Rule>, ProviderError> {
        (**self).get_rules(table, chain)
    }

    fn get_sets(&self, table: &Table) -> Result<Vec<Set>, ProviderError> {
        (**self).get_sets(table)
    }

    fn get_set_elements(&self, set: &Set) -> Result<Vec<SetElement>, ProviderError> {
        (**self).get_set_elements(set)
    }
}

/// 테스트용 Mock 프로바이더
///
/// 테이블 이름(`"table"`)이나 `"table/chain"`, `"table/set"` 키로 응답을 설정하고,
/// 같은 키로 실패를 주입할 수 있습니다.
#[cfg(test)]
#[derive(Default)]
pub struct MockProvider {
    pub tables: Vec<Table>,
    pub chains: Vec<Chain>,
    pub objects: std::collections::HashMap<String, Vec<Object>>,
    pub rules: std::collections::HashMap<String, Vec<Rule>>,
    pub sets: std::collections::HashMap<String, Vec<Set>>,
    pub elements: std::collections::HashMap<String, Vec<SetElement>>,
    /// 실패시킬 호출: `"list_tables"`, `"objects:table"`, `"rules:table/chain"` 등
    pub failing: std::collections::HashSet<String>,
    /// 호출 횟수
    pub calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tables(mut self, tables: Vec<Table>) -> Self {
        self.tables = tables;
        self
    }

    pub fn with_chains(mut self, chains: Vec<Chain>) -> Self {
        self.chains = chains;
        self
    }

    pub fn with_objects(mut self, table: &str, objects: Vec<Object>) -> Self {
        self.objects.insert(table.to_owned(), objects);
        self
    }

    pub fn with_rules(mut self, table: &str, chain: &str, rules: Vec<Rule>) -> Self {
        self.rules.insert(format!("{table}/{chain}"), rules);
        self
    }

    pub fn with_sets(mut self, table: &str, sets: Vec<Set>) -> Self {
        self.sets.insert(table.to_owned(), sets);
        self
    }

    pub fn with_elements(mut self, table: &str, set: &str, count: usize) -> Self {
        let elements = (0..count)
            .map(|i| SetElement {
                key: i.to_string(),
            })
            .collect();
        self.elements.insert(format!("{table}/{set}"), elements);
        self
    }

    /// 주어진 호출을 실패하도록 설정합니다.
    pub fn failing(mut self, call: &str) -> Self {
        self.failing.insert(call.to_owned());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::Relaxed)
    }

    fn check(&self, call: String) -> Result<(), ProviderError> {
        self.calls
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        if self.failing.contains(&call) {
            return Err(ProviderError::Other(format!("mock failure: {call}")));
        }
        Ok(())
    }
}

#[cfg(test)]
impl KernelStateProvider for MockProvider {
    fn list_tables(&self) -> Result<Vec<Table>, ProviderError> {
        self.check("list_tables".to_owned())?;
        Ok(self.tables.clone())
    }

    fn list_chains(&self) -> Result<Vec<Chain>, ProviderError> {
        self.check("list_chains".to_owned())?;
        Ok(self.chains.clone())
    }

    fn get_objects(&self, table: &Table) -> Result<Vec<Object>, ProviderError> {
        self.check(format!("objects:{}", table.name))?;
        Ok(self.objects.get(&table.name).cloned().unwrap_or_default())
    }

    fn get_rules(&self, table: &Table, chain: &Chain) -> Result<Vec<Rule>, ProviderError> {
        let key = format!("{}/{}", table.name, chain.name);
        self.check(format!("rules:{key}"))?;
        Ok(self.rules.get(&key).cloned().unwrap_or_default())
    }

    fn get_sets(&self, table: &Table) -> Result<Vec<Set>, ProviderError> {
        self.check(format!("sets:{}", table.name))?;
        Ok(self.sets.get(&table.name).cloned().unwrap_or_default())
    }

    fn get_set_elements(&self, set: &Set) -> Result<Vec<SetElement>, ProviderError> {
        let key = format!("{}/{}", set.table.name, set.name);
        self.check(format!("elements:{key}"))?;
        Ok(self.elements.get(&key).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TableFamily;

    #[test]
    fn mock_returns_configured_tables() {
        let mock = MockProvider::new().with_tables(vec![Table::new("t", TableFamily::INET)]);
        let tables = mock.list_tables().unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn mock_injects_failures() {
        let mock = MockProvider::new().failing("objects:t");
        let table = Table::new("t", TableFamily::INET);
        assert!(mock.get_objects(&table).is_err());
        assert!(mock.get_sets(&table).unwrap().is_empty());
    }

    #[test]
    fn boxed_provider_delegates() {
        let boxed: Box<dyn KernelStateProvider> = Box::new(
            MockProvider::new().with_tables(vec![Table::new("t", TableFamily::IPV4)]),
        );
        assert_eq!(boxed.list_tables().unwrap()[0].family, TableFamily::IPV4);
        assert!(boxed.list_chains().unwrap().is_empty());
    }
}
