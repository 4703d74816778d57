use clap::Parser;
use diagnotify::cli::Cli;
use diagnotify::config::Config;
use diagnotify::notification::Importance;
use serial_test::serial;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::NamedTempFile;

/// A helper function to run a test with a temporary config file.
fn with_config_file<F>(toml_content: &str, test_fn: F)
where
    F: FnOnce(PathBuf),
{
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", toml_content).unwrap();
    let path = file.path().to_path_buf();
    test_fn(path);
}

fn cli(args: &[&str]) -> Cli {
    let mut argv = vec!["diagnotify"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

#[test]
#[serial]
fn test_load_full_valid_config() {
    let toml_content = r#"
        log_level = "debug"
        [notifier]
        debounce_ms = 250
        notification_id = 7
        title = "Network"
        max_line_length = 32
        tap_payload = "myapp://diagnostics"
        clear_on_stop = false
        ongoing = false
        [notifier.channel]
        id = "myapp_network"
        name = "Network"
        description = "Request statistics"
        importance = "High"
        [collector]
        capacity = 50
    "#;

    with_config_file(toml_content, |path| {
        let cli = cli(&["--config", path.to_str().unwrap()]);
        let config = Config::load(&cli).unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.notifier.debounce, Duration::from_millis(250));
        assert_eq!(config.notifier.notification_id, 7);
        assert_eq!(config.notifier.title, "Network");
        assert_eq!(config.notifier.max_line_length, 32);
        assert_eq!(config.notifier.tap_payload, "myapp://diagnostics");
        assert!(!config.notifier.clear_on_stop);
        assert!(!config.notifier.ongoing);
        assert_eq!(config.notifier.channel.id, "myapp_network");
        assert_eq!(config.notifier.channel.importance, Importance::High);
        assert_eq!(config.collector.capacity, 50);
    });
}

#[test]
#[serial]
fn test_partial_file_keeps_defaults() {
    let toml_content = r#"
        [notifier]
        title = "Checkout"
    "#;

    with_config_file(toml_content, |path| {
        let config = Config::load(&cli(&["--config", path.to_str().unwrap()])).unwrap();
        assert_eq!(config.notifier.title, "Checkout");
        assert_eq!(config.notifier.debounce, Duration::from_millis(750));
        assert_eq!(config.notifier.channel.id, "diagnotify_stats");
        assert_eq!(config.collector.capacity, 1000);
    });
}

#[test]
#[serial]
fn test_cli_overrides_file() {
    let toml_content = r#"
        log_level = "warn"
        [notifier]
        debounce_ms = 1000
        max_line_length = 80
    "#;

    with_config_file(toml_content, |path| {
        let cli = cli(&[
            "--config",
            path.to_str().unwrap(),
            "--debounce-ms",
            "0",
            "--title",
            "Override",
            "--log-level",
            "trace",
        ]);
        let config = Config::load(&cli).unwrap();

        assert_eq!(config.notifier.debounce, Duration::ZERO);
        assert_eq!(config.notifier.title, "Override");
        assert_eq!(config.log_level, "trace");
        // Not given on the command line, so the file wins.
        assert_eq!(config.notifier.max_line_length, 80);
    });
}

#[test]
#[serial]
fn test_env_overrides_file_but_not_cli() {
    let toml_content = r#"
        [notifier]
        debounce_ms = 1000
        title = "File"
    "#;

    with_config_file(toml_content, |path| {
        std::env::set_var("DIAGNOTIFY_NOTIFIER__DEBOUNCE_MS", "125");
        std::env::set_var("DIAGNOTIFY_NOTIFIER__TITLE", "Env");

        let config = Config::load(&cli(&["--config", path.to_str().unwrap(), "--title", "Cli"]));

        std::env::remove_var("DIAGNOTIFY_NOTIFIER__DEBOUNCE_MS");
        std::env::remove_var("DIAGNOTIFY_NOTIFIER__TITLE");

        let config = config.unwrap();
        assert_eq!(config.notifier.debounce, Duration::from_millis(125));
        assert_eq!(config.notifier.title, "Cli");
    });
}

#[test]
#[serial]
fn test_invalid_values_are_rejected() {
    let toml_content = r#"
        [collector]
        capacity = 0
    "#;

    with_config_file(toml_content, |path| {
        let err = Config::load(&cli(&["--config", path.to_str().unwrap()])).unwrap_err();
        assert!(err.to_string().contains("collector.capacity"));
    });

    let err = Config::load(&cli(&["--max-line-length", "0"])).unwrap_err();
    assert!(err.to_string().contains("max_line_length"));
}

#[test]
#[serial]
fn test_unknown_importance_fails_to_load() {
    let toml_content = r#"
        [notifier.channel]
        importance = "Urgent"
    "#;

    with_config_file(toml_content, |path| {
        assert!(Config::load(&cli(&["--config", path.to_str().unwrap()])).is_err());
    });
}
