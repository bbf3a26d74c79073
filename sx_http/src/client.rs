use std::time::Duration;

use reqwest::Client;
use reqwest::ClientBuilder;

use crate::errors::Result;

const DEFAULT_USER_AGENT: &str = concat!("sx_top_questions/", env!("CARGO_PKG_VERSION"));

/// Configuration for HTTP client.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Maximum idle connections per host (default: 4)
    pub pool_max_idle_per_host: usize,

    /// Idle timeout for connections (default: 90s)
    pub pool_idle_timeout: Duration,

    /// Connection establishment timeout (default: 10s)
    pub connect_timeout: Duration,

    /// Total request timeout (default: 30s)
    pub request_timeout: Duration,

    /// TCP keepalive interval (default: 60s)
    pub tcp_keepalive: Duration,

    /// Enable TCP_NODELAY (default: true)
    pub tcp_nodelay: bool,

    /// HTTP/2 adaptive window sizing (default: true)
    pub http2_adaptive_window: bool,

    /// Enable Hickory DNS for async resolution (default: true)
    pub hickory_dns: bool,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            pool_max_idle_per_host: 4,
            pool_idle_timeout: Duration::from_secs(90),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            tcp_keepalive: Duration::from_secs(60),
            tcp_nodelay: true,
            http2_adaptive_window: true,
            hickory_dns: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HttpClientConfig {
    /// Default configuration with custom connect and request timeouts
    pub fn with_timeouts(connect_timeout: Duration, request_timeout: Duration) -> Self {
        Self { connect_timeout, request_timeout, ..Default::default() }
    }
}

/// Pooled reqwest client that negotiates and transparently decompresses
/// gzip and brotli responses.
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .user_agent(config.user_agent.as_str())
            // Connection pooling
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(config.pool_idle_timeout)
            // TCP
            .tcp_nodelay(config.tcp_nodelay)
            .tcp_keepalive(Some(config.tcp_keepalive))
            // Timeouts
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            // TLS with rustls
            .use_rustls_tls()
            .min_tls_version(reqwest::tls::Version::TLS_1_2)
            .http2_adaptive_window(config.http2_adaptive_window)
            .hickory_dns(config.hickory_dns)
            // Compression: sets Accept-Encoding and decodes the body
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }

    /// Create a GET request builder
    pub fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client.get(url)
    }
}
