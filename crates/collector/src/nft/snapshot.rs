//! 정적 룰셋 스냅샷 프로바이더
//!
//! `nft --json list ruleset` 출력을 메모리에 색인해 두고 조회에 응답합니다.
//! 오프라인 내보내기(`--ruleset-file`)와 통합 테스트 fixture로 사용합니다.

use std::collections::HashMap;
use std::path::Path;

use crate::error::ProviderError;
use crate::model::{Chain, Object, Rule, Set, SetElement, Table, TableFamily};
use crate::nft::json::{NftObject, parse_document};
use crate::provider::KernelStateProvider;

type TableKey = (TableFamily, String);

/// 메모리 내 룰셋
#[derive(Debug, Clone, Default)]
pub struct RulesetSnapshot {
    tables: Vec<Table>,
    chains: Vec<Chain>,
    objects: HashMap<TableKey, Vec<Object>>,
    rules: HashMap<(TableKey, String), Vec<Rule>>,
    sets: HashMap<TableKey, Vec<Set>>,
    elements: HashMap<(TableKey, String), Vec<SetElement>>,
}

impl RulesetSnapshot {
    /// JSON 문자열에서 스냅샷을 만듭니다.
    pub fn parse(text: &str) -> Result<Self, ProviderError> {
        Ok(Self::from_objects(parse_document(text)?))
    }

    /// 파일에서 스냅샷을 읽습니다.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ProviderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    /// 해석된 항목들을 테이블 기준으로 색인합니다.
    pub fn from_objects(objects: Vec<NftObject>) -> Self {
        let mut snapshot = Self::default();

        for object in objects {
            match object {
                NftObject::Table(table) => {
                    let key = (table.family, table.name.clone());
                    snapshot.objects.entry(key.clone()).or_default();
                    snapshot.sets.entry(key).or_default();
                    snapshot.tables.push(table);
                }
                NftObject::Chain(chain) => {
                    let key = (key_of(&chain.table), chain.name.clone());
                    snapshot.rules.entry(key).or_default();
                    snapshot.chains.push(chain);
                }
                NftObject::Rule {
                    family,
                    table,
                    chain,
                    rule,
                } => {
                    snapshot
                        .rules
                        .entry(((family, table), chain))
                        .or_default()
                        .push(rule);
                }
                NftObject::Set { set, elements } => {
                    let table = key_of(&set.table);
                    snapshot
                        .elements
                        .insert((table.clone(), set.name.clone()), elements);
                    snapshot.sets.entry(table).or_default().push(set);
                }
                NftObject::Object {
                    family,
                    table,
                    object,
                } => {
                    snapshot
                        .objects
                        .entry((family, table))
                        .or_default()
                        .push(object);
                }
            }
        }

        // 체인/셋의 소속 테이블에 플래그를 채운다
        let flags: HashMap<TableKey, u32> = snapshot
            .tables
            .iter()
            .map(|t| (key_of(t), t.flags))
            .collect();
        for chain in &mut snapshot.chains {
            if let Some(f) = flags.get(&key_of(&chain.table)) {
                chain.table.flags = *f;
            }
        }
        for set in snapshot.sets.values_mut().flatten() {
            if let Some(f) = flags.get(&key_of(&set.table)) {
                set.table.flags = *f;
            }
        }

        snapshot
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}

fn key_of(table: &Table) -> TableKey {
    (table.family, table.name.clone())
}

fn not_found(kind: &'static str, name: String) -> ProviderError {
    ProviderError::NotFound { kind, name }
}

impl KernelStateProvider for RulesetSnapshot {
    fn list_tables(&self) -> Result<Vec<Table>, ProviderError> {
        Ok(self.tables.clone())
    }

    fn list_chains(&self) -> Result<Vec<Chain>, ProviderError> {
        Ok(self.chains.clone())
    }

    fn get_objects(&self, table: &Table) -> Result<Vec<Object>, ProviderError> {
        self.objects
            .get(&key_of(table))
            .cloned()
            .ok_or_else(|| not_found("table", table.name.clone()))
    }

    fn get_rules(&self, table: &Table, chain: &Chain) -> Result<Vec<Rule>, ProviderError> {
        self.rules
            .get(&(key_of(table), chain.name.clone()))
            .cloned()
            .ok_or_else(|| not_found("chain", format!("{}/{}", table.name, chain.name)))
    }

    fn get_sets(&self, table: &Table) -> Result<Vec<Set>, ProviderError> {
        self.sets
            .get(&key_of(table))
            .cloned()
            .ok_or_else(|| not_found("table", table.name.clone()))
    }

    fn get_set_elements(&self, set: &Set) -> Result<Vec<SetElement>, ProviderError> {
        self.elements
            .get(&(key_of(&set.table), set.name.clone()))
            .cloned()
            .ok_or_else(|| not_found("set", format!("{}/{}", set.table.name, set.name)))
    }
}
