use robots_warden::config::{Config, RobotsConfig, UserAgentConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with a short request timeout
pub fn create_test_config(request_timeout: u64) -> Config {
    Config {
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        robots: RobotsConfig {
            request_timeout,
            ..RobotsConfig::default()
        },
    }
}

/// Mounts a robots.txt response that must be requested exactly `times` times
pub async fn mount_robots(server: &MockServer, response: ResponseTemplate, times: u64) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

/// Returns an origin on localhost where nothing is listening
pub fn refused_origin() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind port");
    let port = listener.local_addr().expect("No local address").port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}
