//! Configuration precedence tests: command line > environment > file > defaults.

use std::io::Write;

use clap::Parser;
use serial_test::serial;

use nftwatch_daemon::cli::Cli;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

/// Run `f` with `key` set, restoring the previous value afterwards.
fn with_env<T>(key: &str, value: &str, f: impl FnOnce() -> T) -> T {
    let previous = std::env::var(key).ok();
    // SAFETY: serialized via #[serial]; no other thread reads the environment.
    unsafe { std::env::set_var(key, value) };
    let result = f();
    match previous {
        // SAFETY: see above
        Some(v) => unsafe { std::env::set_var(key, v) },
        None => unsafe { std::env::remove_var(key) },
    }
    result
}

#[tokio::test]
#[serial]
async fn defaults_without_config_file() {
    let cli = Cli::try_parse_from(["nftwatch"]).unwrap();
    let config = cli.load_config().await.unwrap();
    assert_eq!(config.http.listen_addr, "127.0.0.1:9630");
    assert_eq!(config.filters.set_names, ".*");
}

#[tokio::test]
#[serial]
async fn file_values_are_loaded() {
    let file = write_config("[filters]\nset_names = \"block.*\"\n");
    let path = file.path().to_str().unwrap().to_owned();
    let cli = Cli::try_parse_from(["nftwatch", "--config", &path]).unwrap();

    let config = cli.load_config().await.unwrap();
    assert_eq!(config.filters.set_names, "block.*");
    assert_eq!(config.filters.rule_comments, ".*");
}

#[test]
#[serial]
fn env_overrides_file_and_cli_overrides_env() {
    let file = write_config("[filters]\nset_names = \"from-file\"\ncounter_names = \"from-file\"\n");
    let path = file.path().to_str().unwrap().to_owned();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    with_env("NFTWATCH_FILTERS_SET_NAMES", "from-env", || {
        with_env("NFTWATCH_FILTERS_COUNTER_NAMES", "from-env", || {
            let cli = Cli::try_parse_from([
                "nftwatch",
                "--config",
                &path,
                "--counter-names",
                "from-cli",
            ])
            .unwrap();
            let config = runtime.block_on(cli.load_config()).unwrap();

            assert_eq!(config.filters.set_names, "from-env");
            assert_eq!(config.filters.counter_names, "from-cli");
        })
    });
}

#[tokio::test]
#[serial]
async fn cli_override_replaces_invalid_file_value() {
    let file = write_config("[general]\nlog_level = \"verbose\"\n");
    let path = file.path().to_str().unwrap().to_owned();
    let cli =
        Cli::try_parse_from(["nftwatch", "--config", &path, "--log-level", "debug"]).unwrap();

    let config = cli.load_config().await.unwrap();
    assert_eq!(config.general.log_level, "debug");
}

#[test]
#[serial]
fn env_override_replaces_invalid_file_value() {
    let file = write_config("[general]\nlog_format = \"xml\"\n");
    let path = file.path().to_str().unwrap().to_owned();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    with_env("NFTWATCH_GENERAL_LOG_FORMAT", "pretty", || {
        let cli = Cli::try_parse_from(["nftwatch", "--config", &path]).unwrap();
        let config = runtime.block_on(cli.load_config()).unwrap();
        assert_eq!(config.general.log_format, "pretty");
    });
}

#[tokio::test]
#[serial]
async fn invalid_file_value_without_override_fails_validation() {
    let file = write_config("[general]\nlog_level = \"verbose\"\n");
    let path = file.path().to_str().unwrap().to_owned();
    let cli = Cli::try_parse_from(["nftwatch", "--config", &path]).unwrap();

    let err = cli.load_config().await.unwrap_err();
    assert!(err.to_string().contains("config validation failed"));
}

#[tokio::test]
#[serial]
async fn missing_config_file_is_error() {
    let cli = Cli::try_parse_from(["nftwatch", "--config", "/nonexistent/nftwatch.toml"]).unwrap();
    let err = cli.load_config().await.unwrap_err();
    assert!(err.to_string().contains("failed to load config"));
}

#[tokio::test]
#[serial]
async fn invalid_cli_override_fails_validation() {
    let cli = Cli::try_parse_from(["nftwatch", "--log-level", "verbose"]).unwrap();
    let err = cli.load_config().await.unwrap_err();
    assert!(err.to_string().contains("general.log_level"));
}
