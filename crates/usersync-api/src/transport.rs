// Shared transport configuration for building reqwest::Client instances.
//
// The base URL, timeout, and default content type live here so every
// client built for a deployment talks to the API the same way.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use url::Url;

use crate::error::Error;

/// Base URL used when a deployment does not configure one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Upper bound on a single request, after which it fails as a transport error.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Content type sent with every request.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json;charset=UTF-8";

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Absolute API root, e.g. `http://localhost:8080/api`.
    pub base_url: Url,
    pub timeout: Duration,
    pub content_type: String,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            timeout: DEFAULT_TIMEOUT,
            content_type: DEFAULT_CONTENT_TYPE.into(),
            user_agent: concat!("usersync/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl TransportConfig {
    /// Config for `base_url` with every other setting at its default.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            ..Self::default()
        }
    }

    /// Parse `base_url` and build a config around it.
    pub fn from_base(base_url: &str) -> Result<Self, Error> {
        Ok(Self::new(Url::parse(base_url)?))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reject base URLs that cannot anchor API paths.
    ///
    /// Only absolute `http`/`https` URLs are accepted; `file:` or
    /// `data:` style roots would make requests depend on where the
    /// caller happens to be loaded from.
    pub fn validate(&self) -> Result<(), Error> {
        match self.base_url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(Error::InvalidBaseUrl {
                    url: self.base_url.to_string(),
                    reason: format!("unsupported scheme '{other}'"),
                });
            }
        }
        if self.base_url.cannot_be_a_base() || self.base_url.host().is_none() {
            return Err(Error::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "URL has no host".into(),
            });
        }
        Ok(())
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        self.validate()?;

        let content_type = HeaderValue::from_str(&self.content_type).map_err(|e| {
            Error::ClientBuild(format!("invalid content type {:?}: {e}", self.content_type))
        })?;
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, content_type);

        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str())
            .default_headers(headers)
            .build()
            .map_err(|e| Error::ClientBuild(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_deployment() {
        let cfg = TransportConfig::default();
        assert_eq!(cfg.base_url.as_str(), "http://localhost:8080/api");
        assert_eq!(cfg.timeout, Duration::from_secs(15));
        assert_eq!(cfg.content_type, "application/json;charset=UTF-8");
    }

    #[test]
    fn https_base_is_valid() {
        let cfg = TransportConfig::from_base("https://users.example.com/api").unwrap();
        assert!(cfg.validate().is_ok());
        assert!(cfg.build_client().is_ok());
    }

    #[test]
    fn file_base_is_rejected() {
        let cfg = TransportConfig::from_base("file:///srv/app/index.html").unwrap();
        assert!(matches!(
            cfg.validate(),
            Err(Error::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn bad_content_type_fails_client_build() {
        let mut cfg = TransportConfig::default();
        cfg.content_type = "application/json\n".into();
        assert!(matches!(cfg.build_client(), Err(Error::ClientBuild(_))));
    }
}
