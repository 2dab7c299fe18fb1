/// Configuration loading tests. They touch process environment variables,
/// so they run serially.
use sensor_relay_api::{AppError, Config};
use serial_test::serial;
use std::path::PathBuf;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let file = tempfile::NamedTempFile::new().expect("Failed to create temp config");
    std::fs::write(file.path(), contents).expect("Failed to write temp config");
    file
}

#[test]
#[serial]
fn test_config_loading_from_yaml() {
    let file = write_config(
        r#"
server:
  host: "127.0.0.1"
  port: 8081

dashboard:
  static_dir: "public"
"#,
    );

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8081);
    assert_eq!(config.dashboard.static_dir, PathBuf::from("public"));
}

#[test]
#[serial]
fn test_config_placeholder_expansion() {
    std::env::set_var("RELAY_STATIC_DIR", "/srv/dashboard");

    let file = write_config(
        r#"
dashboard:
  static_dir: "$(RELAY_STATIC_DIR)"
"#,
    );

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.dashboard.static_dir, PathBuf::from("/srv/dashboard"));

    std::env::remove_var("RELAY_STATIC_DIR");
}

#[test]
#[serial]
fn test_config_env_port_override() {
    std::env::set_var("SERVER_PORT", "5000");

    let file = write_config("server:\n  port: 3000\n");
    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.server.port, 5000);

    std::env::remove_var("SERVER_PORT");
}

#[test]
#[serial]
fn test_config_invalid_env_port() {
    std::env::set_var("SERVER_PORT", "not-a-port");

    let file = write_config("{}");
    let result = Config::load(file.path());
    assert!(matches!(result, Err(AppError::Config(_))));

    std::env::remove_var("SERVER_PORT");
}

#[test]
#[serial]
fn test_missing_file_falls_back_to_defaults() {
    let config = Config::load_or_default("/nonexistent/relay/config.yaml").unwrap();
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 3000);
}

#[test]
#[serial]
fn test_malformed_yaml_is_an_error() {
    let file = write_config("server: [unterminated");
    let result = Config::load(file.path());
    assert!(matches!(result, Err(AppError::Yaml(_))));
}
