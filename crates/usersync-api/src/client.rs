// User API HTTP client
//
// Wraps `reqwest::Client` with base-URL path construction, the request
// interceptor hook, and envelope unwrapping. Endpoint methods live in
// `users.rs` so this module stays focused on transport mechanics.

use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::interceptor::{Passthrough, RequestInterceptor};
use crate::models::{Envelope, RawEnvelope, SUCCESS_CODE};
use crate::transport::TransportConfig;

/// Message used when a rejected envelope carries none of its own.
const FALLBACK_MESSAGE: &str = "Error";

/// Longest body excerpt kept in deserialization error messages.
const BODY_PREVIEW_LEN: usize = 200;

/// Raw HTTP client for the enveloped user API.
///
/// Handles the `{ code, message, data }` envelope and path construction
/// under the configured base URL. All methods return the full envelope of
/// a successful response; failures come back as [`Error`] and have already
/// been logged.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    interceptor: Arc<dyn RequestInterceptor>,
}

impl ApiClient {
    /// Create a client from a `TransportConfig`, with a passthrough
    /// request interceptor.
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url: transport.base_url.clone(),
            interceptor: Arc::new(Passthrough),
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// The caller is responsible for the timeout and default headers the
    /// prebuilt client carries.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Result<Self, Error> {
        TransportConfig::new(base_url.clone()).validate()?;
        Ok(Self {
            http,
            base_url,
            interceptor: Arc::new(Passthrough),
        })
    }

    /// Replace the request interceptor.
    pub fn with_interceptor(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
        self.interceptor = Arc::new(interceptor);
        self
    }

    /// The API root all paths are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL under the base URL.
    ///
    /// `path` is a fixed resource path and may contain `/`; each entry of
    /// `params` becomes exactly one percent-encoded segment, so an id or an
    /// email can never escape its position.
    pub(crate) fn endpoint(&self, path: &str, params: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| Error::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot carry a path".into(),
            })?;
            segments
                .pop_if_empty()
                .extend(path.split('/').filter(|part| !part.is_empty()))
                .extend(params);
        }
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and unwrap the envelope.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<Envelope<T>, Error> {
        self.send(Method::GET, url, query, None::<&()>).await
    }

    /// Send a POST request with JSON body and unwrap the envelope.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<Envelope<T>, Error> {
        self.send(Method::POST, url, &[], Some(body)).await
    }

    /// Send a PUT request with JSON body and unwrap the envelope.
    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<Envelope<T>, Error> {
        self.send(Method::PUT, url, &[], Some(body)).await
    }

    /// Send a DELETE request and unwrap the envelope.
    pub(crate) async fn delete<T: DeserializeOwned>(&self, url: Url) -> Result<Envelope<T>, Error> {
        self.send(Method::DELETE, url, &[], None::<&()>).await
    }

    /// Run one request through the pipeline and log any failure before
    /// handing it back.
    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        query: &[(&str, String)],
        body: Option<&(impl Serialize + Sync)>,
    ) -> Result<Envelope<T>, Error> {
        debug!(%method, %url, "sending request");

        let result = self.dispatch(method.clone(), url.clone(), query, body).await;
        if let Err(ref err) = result {
            warn!(%method, %url, error = %err, "request failed");
        }
        result
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        query: &[(&str, String)],
        body: Option<&(impl Serialize + Sync)>,
    ) -> Result<Envelope<T>, Error> {
        let mut builder = self.http.request(method, url);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            // Serialized by hand so the transport's configured content type
            // is the one that goes out.
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let resp = self.interceptor.intercept(builder).send().await?;
        self.parse_envelope(resp).await
    }

    /// Parse the `{ code, message, data }` envelope, returning it whole on
    /// success or an `Error::Rejected` if `code != 200` or the body is not
    /// an envelope.
    ///
    /// Non-2xx HTTP statuses are transport failures and surface as the
    /// reqwest status error, untouched.
    async fn parse_envelope<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<Envelope<T>, Error> {
        let resp = resp.error_for_status()?;
        let body = resp.text().await?;

        // Not an envelope at all (empty body, proxy HTML): no code.
        let raw: RawEnvelope = match serde_json::from_str(&body) {
            Ok(raw) => raw,
            Err(e) => {
                let preview: String = body.chars().take(BODY_PREVIEW_LEN).collect();
                debug!(error = %e, body = %preview, "response is not an envelope");
                return Err(Error::Rejected {
                    code: None,
                    message: FALLBACK_MESSAGE.into(),
                });
            }
        };

        let code = match raw.code {
            Some(SUCCESS_CODE) => SUCCESS_CODE,
            other => {
                return Err(Error::Rejected {
                    code: other,
                    message: raw
                        .message
                        .filter(|m| !m.is_empty())
                        .unwrap_or_else(|| FALLBACK_MESSAGE.into()),
                });
            }
        };

        let data: T = serde_json::from_value(raw.data).map_err(|e| deserialization_error(&e, &body))?;

        Ok(Envelope {
            code,
            message: raw.message.unwrap_or_default(),
            data,
            timestamp: raw.timestamp,
        })
    }
}

fn deserialization_error(err: &serde_json::Error, body: &str) -> Error {
    let preview: String = body.chars().take(BODY_PREVIEW_LEN).collect();
    Error::Deserialization {
        message: format!("{err} (body preview: {preview:?})"),
        body: body.to_owned(),
    }
}
