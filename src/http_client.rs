use reqwest::{Client, ClientBuilder};
use std::time::Duration;

use crate::error::HunterError;

const USER_AGENT: &str = concat!("collection-hunter/", env!("CARGO_PKG_VERSION"));

/// Shared client for all probes, pooled so concurrent probes reuse connections.
pub fn build_client(timeout_secs: u64, max_idle_connections: usize) -> Result<Client, HunterError> {
    ClientBuilder::new()
        // Connection pooling - one idle connection per concurrent probe
        .pool_max_idle_per_host(max_idle_connections)
        .pool_idle_timeout(Some(Duration::from_secs(90)))
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .tcp_nodelay(true)

        // Timeouts
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(5))

        .gzip(true)
        .use_rustls_tls()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| HunterError::config(format!("failed to build HTTP client: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        assert!(build_client(10, 10).is_ok());
    }
}
