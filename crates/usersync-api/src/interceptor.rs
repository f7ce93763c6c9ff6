// Outgoing request hook
//
// Every request built by `ApiClient` passes through a `RequestInterceptor`
// right before it is sent. The default does nothing; deployments that need
// cross-cutting headers (tracing ids, credentials) plug in their own.

use std::fmt;

use reqwest::RequestBuilder;

/// Hook applied to every outgoing request.
///
/// Implementations may attach headers or extensions. They must not change
/// the request's target URL or body: the entity service owns both.
pub trait RequestInterceptor: Send + Sync + fmt::Debug {
    fn intercept(&self, request: RequestBuilder) -> RequestBuilder;
}

/// Interceptor that forwards requests untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl RequestInterceptor for Passthrough {
    fn intercept(&self, request: RequestBuilder) -> RequestBuilder {
        request
    }
}

/// Interceptor that adds a fixed set of headers to every request.
#[derive(Debug, Clone, Default)]
pub struct StaticHeaders {
    headers: reqwest::header::HeaderMap,
}

impl StaticHeaders {
    pub fn new(headers: reqwest::header::HeaderMap) -> Self {
        Self { headers }
    }
}

impl RequestInterceptor for StaticHeaders {
    fn intercept(&self, request: RequestBuilder) -> RequestBuilder {
        request.headers(self.headers.clone())
    }
}
