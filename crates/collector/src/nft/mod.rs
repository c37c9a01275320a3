//! nft 명령 기반 프로바이더
//!
//! [`NftCli`]는 `nft --json list ...`를 실행해 출력을 [`json`] 모듈로 해석합니다.
//! 명령 실행은 [`NftRunner`] 뒤에 있어 테스트에서 프로세스 없이 대체할 수 있습니다.

pub mod json;
pub mod snapshot;

use std::process::Command;

use tracing::{debug, trace};

use crate::error::ProviderError;
use crate::model::{Chain, Object, Rule, Set, SetElement, Table, TableFamily};
use crate::provider::KernelStateProvider;

pub use json::{NftObject, parse_document};
pub use snapshot::RulesetSnapshot;

/// nft 실행기
pub trait NftRunner: Send {
    /// `nft --json <args>`를 실행하고 표준 출력을 반환합니다.
    fn run(&self, args: &[&str]) -> Result<String, ProviderError>;
}

/// 실제 nft 바이너리를 실행하는 실행기
#[derive(Debug, Clone)]
pub struct CommandRunner {
    binary: String,
}

impl CommandRunner {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }
}

impl NftRunner for CommandRunner {
    fn run(&self, args: &[&str]) -> Result<String, ProviderError> {
        let command = format!("{} --json {}", self.binary, args.join(" "));
        trace!(%command, "running nft");

        let output = Command::new(&self.binary)
            .arg("--json")
            .args(args)
            .output()
            .map_err(|source| ProviderError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ProviderError::Command {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        String::from_utf8(output.stdout)
            .map_err(|e| ProviderError::Malformed(format!("nft output is not UTF-8: {e}")))
    }
}

/// nft 명령 기반 커널 상태 프로바이더
#[derive(Debug, Clone)]
pub struct NftCli<R = CommandRunner> {
    runner: R,
}

impl NftCli<CommandRunner> {
    /// 주어진 nft 바이너리로 프로바이더를 만듭니다.
    pub fn new(binary: impl Into<String>) -> Self {
        Self::with_runner(CommandRunner::new(binary))
    }
}

impl<R: NftRunner> NftCli<R> {
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    fn list(&self, args: &[&str]) -> Result<Vec<NftObject>, ProviderError> {
        let output = self.runner.run(args)?;
        let objects = parse_document(&output)?;
        debug!(args = ?args, objects = objects.len(), "nft listing parsed");
        Ok(objects)
    }

    /// 전체 룰셋을 한 번에 읽어 스냅샷으로 만듭니다.
    pub fn snapshot(&self) -> Result<RulesetSnapshot, ProviderError> {
        Ok(RulesetSnapshot::from_objects(self.list(&["list", "ruleset"])?))
    }

    fn list_table(&self, table: &Table) -> Result<Vec<NftObject>, ProviderError> {
        let family = family_arg(table.family)?;
        self.list(&["list", "table", family, &table.name])
    }
}

fn family_arg(family: TableFamily) -> Result<&'static str, ProviderError> {
    family
        .name()
        .ok_or_else(|| ProviderError::Other(format!("unsupported address family {}", family.0)))
}

impl<R: NftRunner> KernelStateProvider for NftCli<R> {
    fn list_tables(&self) -> Result<Vec<Table>, ProviderError> {
        Ok(self
            .list(&["list", "tables"])?
            .into_iter()
            .filter_map(|o| match o {
                NftObject::Table(t) => Some(t),
                _ => None,
            })
            .collect())
    }

    fn list_chains(&self) -> Result<Vec<Chain>, ProviderError> {
        Ok(self
            .list(&["list", "chains"])?
            .into_iter()
            .filter_map(|o| match o {
                NftObject::Chain(c) => Some(c),
                _ => None,
            })
            .collect())
    }

    fn get_objects(&self, table: &Table) -> Result<Vec<Object>, ProviderError> {
        Ok(self
            .list_table(table)?
            .into_iter()
            .filter_map(|o| match o {
                NftObject::Object { object, .. } => Some(object),
                _ => None,
            })
            .collect())
    }

    fn get_rules(&self, table: &Table, chain: &Chain) -> Result<Vec<Rule>, ProviderError> {
        let family = family_arg(table.family)?;
        Ok(self
            .list(&["list", "chain", family, &table.name, &chain.name])?
            .into_iter()
            .filter_map(|o| match o {
                NftObject::Rule { rule, .. } => Some(rule),
                _ => None,
            })
            .collect())
    }

    fn get_sets(&self, table: &Table) -> Result<Vec<Set>, ProviderError> {
        Ok(self
            .list_table(table)?
            .into_iter()
            .filter_map(|o| match o {
                NftObject::Set { mut set, .. } => {
                    set.table.flags = table.flags;
                    Some(set)
                }
                _ => None,
            })
            .collect())
    }

    fn get_set_elements(&self, set: &Set) -> Result<Vec<SetElement>, ProviderError> {
        let family = family_arg(set.table.family)?;
        let kind = if set.is_map { "map" } else { "set" };
        self.list(&["list", kind, family, &set.table.name, &set.name])?
            .into_iter()
            .find_map(|o| match o {
                NftObject::Set { elements, .. } => Some(elements),
                _ => None,
            })
            .ok_or_else(|| ProviderError::NotFound {
                kind,
                name: format!("{}/{}", set.table.name, set.name),
            })
    }
}
