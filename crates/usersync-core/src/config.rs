// ── Runtime connection configuration ──
//
// Describes *where* the user API lives and how to talk to it. Never
// touches disk: the CLI (through usersync-config) builds a `ClientConfig`
// and hands it in.

use std::time::Duration;

use url::Url;
use usersync_api::{ApiClient, ResourcePaths, TransportConfig, UserService};

use crate::error::CoreError;

/// Configuration for talking to one deployment of the user API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root (e.g., `http://localhost:8080/api`).
    pub base_url: Url,
    /// Fixed per-request timeout.
    pub timeout: Duration,
    /// `Content-Type` sent with every request.
    pub content_type: String,
    /// Resource layout of the deployment.
    pub paths: ResourcePaths,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let transport = TransportConfig::default();
        Self {
            base_url: transport.base_url,
            timeout: transport.timeout,
            content_type: transport.content_type,
            paths: ResourcePaths::default(),
        }
    }
}

impl ClientConfig {
    /// Config for `base_url` with every other setting at its default.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            ..Self::default()
        }
    }

    /// Transport settings derived from this config.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            content_type: self.content_type.clone(),
            ..TransportConfig::new(self.base_url.clone()).with_timeout(self.timeout)
        }
    }

    /// Build the entity service this config describes.
    pub fn build_service(&self) -> Result<UserService, CoreError> {
        let transport = self.transport();
        transport.validate()?;
        let client = ApiClient::new(&transport)?;
        Ok(UserService::new(client, self.paths.clone()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn transport_carries_timeout_and_content_type() {
        let config = ClientConfig {
            timeout: Duration::from_secs(3),
            content_type: "application/json".into(),
            ..ClientConfig::new("http://users.internal/api".parse().unwrap())
        };
        let transport = config.transport();
        assert_eq!(transport.timeout, Duration::from_secs(3));
        assert_eq!(transport.content_type, "application/json");
        assert_eq!(transport.base_url.as_str(), "http://users.internal/api");
    }

    #[test]
    fn default_matches_transport_default() {
        let config = ClientConfig::default();
        let transport = TransportConfig::default();
        assert_eq!(config.base_url, transport.base_url);
        assert_eq!(config.timeout, transport.timeout);
        assert_eq!(config.content_type, transport.content_type);
        assert_eq!(config.transport().base_url.as_str(), "http://localhost:8080/api");
    }

    #[test]
    fn build_service_rejects_non_http_urls() {
        let config = ClientConfig::new("ftp://users.internal/api".parse().unwrap());
        let err = config.build_service().unwrap_err();
        assert!(matches!(err, CoreError::Config { .. }));
    }

    #[test]
    fn build_service_keeps_resource_paths() {
        let config = ClientConfig {
            paths: ResourcePaths::singular(),
            ..ClientConfig::default()
        };
        let service = config.build_service().unwrap();
        assert_eq!(service.paths().collection, "user");
    }
}
