use hoopoe_domain::config::{ConfigError, LogFormat};
use hoopoe_domain::{Config, LoadBalanceType, UpstreamServer};
use std::time::Duration;

fn valid_config() -> Config {
    let mut config = Config::default();
    config.upstream.servers = vec![UpstreamServer::new("8.8.8.8:53")];
    config.rules.proxy_rules = vec!["ALLOW SUFFIX example.com.".to_string()];
    config
}

#[test]
fn test_config_default_values() {
    let config = Config::default();

    assert_eq!(config.server.address, "127.0.0.1:53");
    assert_eq!(config.upstream.lb_type, LoadBalanceType::ByOrder);
    assert_eq!(config.upstream.timeout, "5s");
    assert!(config.upstream.servers.is_empty());
    assert!(config.rules.scan_all);
    assert!(config.rules.proxy_rules.is_empty());
    assert_eq!(config.client_map_file, "/etc/hoopoe/client_map.yml");
    assert!(!config.telemetry.enabled);
    assert_eq!(config.telemetry.address, "127.0.0.1:8080");
    assert!(config.access_log.enabled);
    assert_eq!(config.access_log.path, "/var/log/hoopoe/access.log");
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, LogFormat::Text);
}

#[test]
fn test_config_parses_full_toml() {
    let toml_str = r#"
        client_map_file = "/tmp/regions.yml"

        [server]
        address = "0.0.0.0:5353"

        [upstream]
        lb_type = "RoundRobin"
        timeout = "750ms"

        [[upstream.servers]]
        address = "10.0.0.1:53"
        annotations = { region = "eu" }

        [[upstream.servers]]
        address = "10.0.0.2:53"

        [rules]
        scan_all = false
        proxy_rules = [
            "PASS SUBSTRING health.check.",
            "A SUFFIX example.com.",
        ]

        [logging]
        format = "json"
    "#;

    let config = Config::from_toml_str(toml_str).unwrap();

    assert_eq!(config.server.address, "0.0.0.0:5353");
    assert_eq!(config.upstream.lb_type, LoadBalanceType::RoundRobin);
    assert_eq!(
        config.upstream.timeout_duration().unwrap(),
        Duration::from_millis(750)
    );
    assert_eq!(config.upstream.servers.len(), 2);
    assert_eq!(config.upstream.servers[0].region(), Some("eu"));
    assert_eq!(config.upstream.servers[1].region(), None);
    assert!(!config.rules.scan_all);
    assert_eq!(config.client_map_file, "/tmp/regions.yml");
    assert_eq!(config.logging.format, LogFormat::Json);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_lb_type_accepts_snake_case() {
    let config = Config::from_toml_str("[upstream]\nlb_type = \"round_robin\"\n").unwrap();
    assert_eq!(config.upstream.lb_type, LoadBalanceType::RoundRobin);
}

#[test]
fn test_config_rejects_malformed_toml() {
    let result = Config::from_toml_str("[server\naddress = ");
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_validate_requires_upstream_servers() {
    let mut config = valid_config();
    config.upstream.servers.clear();

    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("No upstream servers"));
}

#[test]
fn test_validate_rejects_bad_timeout() {
    let mut config = valid_config();
    config.upstream.timeout = "soon".to_string();
    assert!(config.validate().is_err());

    config.upstream.timeout = "0s".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_bad_listen_address() {
    let mut config = valid_config();
    config.server.address = "localhost".to_string();
    assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
}

#[test]
fn test_empty_allow_list_is_not_a_config_error() {
    let mut config = valid_config();
    config.rules.proxy_rules = vec!["PASS SUFFIX local.".to_string()];

    assert!(config.validate().is_ok());
    assert!(config.warnings().is_empty());
}

#[test]
fn test_access_log_without_path_is_a_warning() {
    let mut config = valid_config();
    config.access_log.enabled = true;
    config.access_log.path = "  ".to_string();

    let warnings = config.warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("Access log"));
}

#[test]
fn test_load_from_explicit_path_with_cli_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hoopoe.toml");
    std::fs::write(
        &path,
        "[server]\naddress = \"127.0.0.1:1053\"\n[[upstream.servers]]\naddress = \"1.1.1.1:53\"\n",
    )
    .unwrap();

    let overrides = hoopoe_domain::CliOverrides {
        address: Some("127.0.0.1:2053".to_string()),
        log_level: Some("debug".to_string()),
        log_format: Some(LogFormat::Json),
    };
    let config = Config::load(path.to_str(), overrides).unwrap();

    assert_eq!(config.server.address, "127.0.0.1:2053");
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.upstream.servers[0].address, "1.1.1.1:53");
}

#[test]
fn test_load_missing_explicit_path_fails() {
    let result = Config::load(
        Some("/nonexistent/hoopoe.toml"),
        hoopoe_domain::CliOverrides::default(),
    );
    assert!(matches!(result, Err(ConfigError::FileRead(_, _))));
}
