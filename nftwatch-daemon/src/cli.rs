//! CLI argument definitions for nftwatch.
//!
//! Uses `clap` v4 derive macros to parse command-line arguments.
//! Every flag that maps onto a configuration field takes precedence over
//! the config file and environment variables.

use std::path::PathBuf;

use clap::Parser;

use nftwatch_core::config::NftwatchConfig;

/// Prometheus exporter for nftables.
///
/// Exposes rule, named counter and set statistics read from the kernel
/// (or from a static ruleset snapshot) on an HTTP metrics endpoint.
#[derive(Parser, Debug)]
#[command(name = "nftwatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to nftwatch.toml configuration file.
    ///
    /// Without this flag the built-in defaults are used.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Only export rules whose comment fully matches this pattern.
    #[arg(long, value_name = "REGEX")]
    pub rule_comments: Option<String>,

    /// Only export named counters whose name fully matches this pattern.
    #[arg(long, value_name = "REGEX")]
    pub counter_names: Option<String>,

    /// Only export sets and maps whose name fully matches this pattern.
    #[arg(long, value_name = "REGEX")]
    pub set_names: Option<String>,

    /// Listen address for the HTTP server (host:port).
    #[arg(long, value_name = "ADDR")]
    pub http_addr: Option<String>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override log format (json, pretty).
    #[arg(long)]
    pub log_format: Option<String>,

    /// Path to the nft binary.
    #[arg(long, value_name = "PATH")]
    pub nft: Option<String>,

    /// Serve a static `nft --json list ruleset` dump instead of the live kernel.
    #[arg(long, value_name = "PATH")]
    pub ruleset_file: Option<PathBuf>,

    /// Validate configuration and filter patterns, then exit.
    #[arg(long)]
    pub validate: bool,

    /// Run a single collection, print the exposition to stdout and exit.
    #[arg(long, conflicts_with = "validate")]
    pub once: bool,
}

impl Cli {
    /// Load the configuration file (or defaults), then apply environment
    /// and command-line overrides in that order.
    pub async fn load_config(&self) -> anyhow::Result<NftwatchConfig> {
        let mut config = match &self.config {
            Some(path) => NftwatchConfig::from_file(path)
                .await
                .map_err(|e| anyhow::anyhow!("failed to load config: {}", e))?,
            None => NftwatchConfig::default(),
        };
        config.apply_env_overrides();
        self.apply_overrides(&mut config);
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("config validation failed: {}", e))?;
        Ok(config)
    }

    /// Apply command-line overrides onto an already loaded configuration.
    pub fn apply_overrides(&self, config: &mut NftwatchConfig) {
        let overrides = [
            (&self.rule_comments, &mut config.filters.rule_comments),
            (&self.counter_names, &mut config.filters.counter_names),
            (&self.set_names, &mut config.filters.set_names),
            (&self.http_addr, &mut config.http.listen_addr),
            (&self.log_level, &mut config.general.log_level),
            (&self.log_format, &mut config.general.log_format),
            (&self.nft, &mut config.nft.binary),
        ];
        for (value, field) in overrides {
            if let Some(value) = value {
                field.clone_from(value);
            }
        }
    }
}
