//! Collector assembly from configuration.
//!
//! Compiles the filters, picks the kernel state provider (live `nft` or a
//! static ruleset dump) and probes it once so that an unusable provider is
//! a startup error rather than a stream of failed scrapes.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use nftwatch_collector::{
    Collector, CollectorError, Filters, KernelStateProvider, NftCli, RulesetSnapshot,
};
use nftwatch_core::config::NftwatchConfig;

use crate::server::SharedCollector;

/// Compile the configured filter patterns.
pub fn build_filters(config: &NftwatchConfig) -> Result<Filters> {
    Filters::from_config(&config.filters).map_err(|e| anyhow::anyhow!("{}", e))
}

/// Create the kernel state provider.
pub fn build_provider(
    config: &NftwatchConfig,
    ruleset_file: Option<&Path>,
) -> Result<Box<dyn KernelStateProvider>> {
    match ruleset_file {
        Some(path) => {
            let snapshot = RulesetSnapshot::from_file(path)
                .map_err(|e| anyhow::anyhow!("failed to load ruleset: {}", e))?;
            tracing::info!(
                path = %path.display(),
                tables = snapshot.table_count(),
                "serving static ruleset"
            );
            Ok(Box::new(snapshot))
        }
        None => {
            tracing::info!(binary = %config.nft.binary, "reading live ruleset via nft");
            Ok(Box::new(NftCli::new(config.nft.binary.clone())))
        }
    }
}

/// Build the collector and verify that the provider is reachable.
pub fn build_collector(
    config: &NftwatchConfig,
    ruleset_file: Option<&Path>,
) -> Result<SharedCollector> {
    let filters = build_filters(config)?;
    let provider = build_provider(config, ruleset_file)?;
    let (collector, _stats) = Collector::new(provider, filters);

    let tables = collector
        .probe()
        .map_err(|e| anyhow::anyhow!("{}", CollectorError::from(e)))?;
    tracing::info!(tables, "nftables reachable");

    Ok(Arc::new(collector))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_filter_is_startup_error() {
        let mut config = NftwatchConfig::default();
        config.filters.rule_comments = "(".to_owned();
        let err = build_filters(&config).unwrap_err();
        assert!(err.to_string().contains("rule-comments"));
    }

    #[test]
    fn missing_ruleset_file_is_startup_error() {
        let config = NftwatchConfig::default();
        let result = build_provider(&config, Some(Path::new("/nonexistent/ruleset.json")));
        assert!(result.is_err());
    }

    #[test]
    fn unreachable_nft_fails_probe() {
        let mut config = NftwatchConfig::default();
        config.nft.binary = "/nonexistent/nft".to_owned();
        let err = build_collector(&config, None).unwrap_err();
        assert!(err.to_string().contains("unable to access nftables"));
    }
}
