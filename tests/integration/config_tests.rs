use crate::common::mount_robots;
use robots_warden::config::load_config;
use robots_warden::{ComplianceEngine, ConfigError, WardenError};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;
use wiremock::{MockServer, ResponseTemplate};

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write config");
    file.flush().expect("Failed to flush config");
    file
}

#[tokio::test]
async fn test_engine_from_config_file_uses_default_delay() {
    let file = write_config(
        r#"
[user-agent]
crawler-name = "ConfigBot"
crawler-version = "2.0"
contact-url = "https://example.com/bot"
contact-email = "bot@example.com"

[robots]
request-timeout = 2000
default-crawl-delay = 2500
"#,
    );

    let config = load_config(file.path()).expect("Failed to load config");
    let engine = ComplianceEngine::from_config(&config).expect("Failed to build engine");

    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, ResponseTemplate::new(404), 1).await;

    let url = format!("{}/page", mock_server.uri());
    assert!(engine.is_url_allowed(&url).await);
    assert_eq!(engine.crawl_delay(&url).await, Duration::from_millis(2500));
}

#[test]
fn test_invalid_config_file_is_rejected() {
    let file = write_config(
        r#"
[user-agent]
crawler-name = "Bad Name"
crawler-version = "1.0"
contact-url = "https://example.com/bot"
contact-email = "bot@example.com"
"#,
    );

    assert!(load_config(file.path()).is_err());
}

#[test]
fn test_engine_from_invalid_config_file_reports_config_error() {
    let file = write_config(
        r#"
[user-agent]
crawler-name = "ConfigBot"
crawler-version = "2.0"
contact-url = "https://example.com/bot"
contact-email = "bot@example.com"

[robots]
request-timeout = 5
"#,
    );

    match ComplianceEngine::from_config_file(file.path()) {
        Err(WardenError::Config(ConfigError::Validation(_))) => {}
        other => panic!("Expected validation error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_engine_built_directly_from_file() {
    let file = write_config(
        r#"
[user-agent]
crawler-name = "ConfigBot"
crawler-version = "2.0"
contact-url = "https://example.com/bot"
contact-email = "bot@example.com"
"#,
    );

    let engine = ComplianceEngine::from_config_file(file.path()).expect("Failed to build engine");

    let mock_server = MockServer::start().await;
    mount_robots(
        &mock_server,
        ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private"),
        1,
    )
    .await;

    let policy = engine
        .policy_for(&format!("{}/index.html", mock_server.uri()))
        .await
        .expect("Failed to resolve policy");
    assert_eq!(policy.disallow_rules(), ["/private"]);
    assert!(matches!(
        engine.policy_for("no scheme here").await,
        Err(WardenError::UrlError(_))
    ));
}
