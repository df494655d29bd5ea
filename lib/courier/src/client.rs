//! HTTP transport implementation using hyper-util.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector},
    rt::TokioExecutor,
};
use tower::Layer;
use tower::util::BoxCloneService;
use tower_service::Service;

use crate::{
    Error, Request, Response, Result,
    config::{ClientConfig, ClientConfigBuilder},
    connector::https_connector,
};

#[cfg(feature = "middleware-bearer-auth")]
use crate::middleware::BearerAuthLayer;
#[cfg(feature = "middleware-logging")]
use crate::middleware::LoggingLayer;
#[cfg(feature = "middleware-concurrency")]
use tower::limit::ConcurrencyLimitLayer;

// ============================================================================
// Type-Erased Service for Middleware Composition
// ============================================================================

/// Type-erased transport service, as seen by middleware layers.
pub type BoxedService = BoxCloneService<Request<Bytes>, Response<Bytes>, Error>;

/// Future type for the Tower Service implementation.
pub type ServiceFuture = Pin<Box<dyn Future<Output = Result<Response<Bytes>>> + Send + 'static>>;

/// `BoxCloneService` is not `Sync`; this makes it shareable by cloning per call.
#[derive(Clone)]
struct SyncService {
    inner: Arc<Mutex<BoxedService>>,
}

impl SyncService {
    fn new(service: BoxedService) -> Self {
        Self {
            inner: Arc::new(Mutex::new(service)),
        }
    }

    fn call(&self, request: Request<Bytes>) -> ServiceFuture {
        let mut service = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();

        Box::pin(async move {
            std::future::poll_fn(|cx| service.poll_ready(cx)).await?;
            service.call(request).await
        })
    }
}

// ============================================================================
// Raw Client
// ============================================================================

#[derive(Clone)]
struct RawHyperClient {
    inner: Client<HttpsConnector<HttpConnector>, Full<Bytes>>,
    config: ClientConfig,
}

impl RawHyperClient {
    fn new(config: ClientConfig) -> Self {
        let connector = https_connector(config.connect_timeout);

        let inner = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_idle_per_host)
            .build(connector);

        Self { inner, config }
    }

    fn build_hyper_request(request: Request<Bytes>) -> Result<http::Request<Full<Bytes>>> {
        let (method, url, headers, body) = request.into_parts();

        let mut builder = http::Request::builder()
            .method(http::Method::from(method))
            .uri(url.as_str());

        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let body = body.map_or_else(Full::default, Full::new);
        builder
            .body(body)
            .map_err(|e| Error::invalid_request(e.to_string()))
    }

    /// Headers whose value is not valid UTF-8 are dropped.
    fn extract_headers(headers: &http::HeaderMap) -> HashMap<String, String> {
        headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.to_string(), v.to_string()))
            })
            .collect()
    }

    async fn execute(&self, request: Request<Bytes>) -> Result<Response<Bytes>> {
        let hyper_request = Self::build_hyper_request(request)?;

        tokio::time::timeout(self.config.timeout, self.send(hyper_request))
            .await
            .map_err(|_| Error::Timeout)?
    }

    async fn send(&self, request: http::Request<Full<Bytes>>) -> Result<Response<Bytes>> {
        let response = self
            .inner
            .request(request)
            .await
            .map_err(Self::map_hyper_error)?;

        let status = response.status().as_u16();
        let headers = Self::extract_headers(response.headers());

        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| Error::connection(e.to_string()))?
            .to_bytes();

        Ok(Response::new(status, headers, body))
    }

    #[allow(clippy::needless_pass_by_value)]
    fn map_hyper_error(err: hyper_util::client::legacy::Error) -> Error {
        let msg = err.to_string();
        let detail = std::error::Error::source(&err)
            .map(ToString::to_string)
            .unwrap_or_default();

        if [&msg, &detail]
            .iter()
            .any(|m| m.contains("ssl") || m.contains("tls") || m.contains("certificate"))
        {
            return Error::tls(msg);
        }

        if detail.is_empty() {
            Error::connection(msg)
        } else {
            Error::connection(format!("{msg}: {detail}"))
        }
    }
}

impl Service<Request<Bytes>> for RawHyperClient {
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        let client = self.clone();
        Box::pin(async move { client.execute(request).await })
    }
}

// ============================================================================
// Public Client
// ============================================================================

/// HTTP transport over hyper-util, with connection pooling, TLS and tower
/// middleware.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
///
/// use courier::HyperClient;
///
/// let client = HyperClient::builder()
///     .timeout(Duration::from_secs(5))
///     .with_logging()
///     .with_bearer_auth("secret")
///     .build();
/// ```
#[derive(Clone)]
pub struct HyperClient {
    service: SyncService,
    config: ClientConfig,
}

impl std::fmt::Debug for HyperClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HyperClient {
    /// Create a client with the default configuration and no middleware.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with a custom configuration and no middleware.
    #[must_use]
    pub fn with_config(config: ClientConfig) -> Self {
        let raw = RawHyperClient::new(config.clone());
        Self::with_service(BoxCloneService::new(raw), config)
    }

    fn with_service(service: BoxedService, config: ClientConfig) -> Self {
        Self {
            service: SyncService::new(service),
            config,
        }
    }

    /// Create a new client builder.
    #[must_use]
    pub fn builder() -> HyperClientBuilder {
        HyperClientBuilder::default()
    }

    /// The client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl Default for HyperClient {
    fn default() -> Self {
        Self::new()
    }
}

impl courier_core::HttpClient for HyperClient {
    async fn execute(&self, request: Request<Bytes>) -> Result<Response<Bytes>> {
        self.service.call(request).await
    }
}

impl Service<Request<Bytes>> for HyperClient {
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = ServiceFuture;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        self.service.call(request)
    }
}

/// Builder for [`HyperClient`].
///
/// Layers wrap the transport in the order they are added: the last one added
/// is the outermost, and sees requests first.
#[derive(Default)]
pub struct HyperClientBuilder {
    config: ClientConfigBuilder,
    layers: Vec<Arc<dyn Fn(BoxedService) -> BoxedService + Send + Sync>>,
}

impl std::fmt::Debug for HyperClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperClientBuilder")
            .field("config", &self.config)
            .field("layers_count", &self.layers.len())
            .finish()
    }
}

impl HyperClientBuilder {
    /// Set the request timeout. Expiry fails the call with [`Error::Timeout`].
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.timeout(timeout);
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.connect_timeout(timeout);
        self
    }

    /// Set the maximum idle connections per host.
    #[must_use]
    pub fn pool_idle_per_host(mut self, count: usize) -> Self {
        self.config = self.config.pool_idle_per_host(count);
        self
    }

    /// Set the idle connection timeout.
    #[must_use]
    pub fn pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.pool_idle_timeout(timeout);
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, config: &ClientConfig) -> Self {
        self.config = ClientConfig::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_per_host(config.pool_idle_per_host)
            .pool_idle_timeout(config.pool_idle_timeout);
        self
    }

    /// Add a Tower layer around the transport.
    #[must_use]
    pub fn layer<L>(mut self, layer: L) -> Self
    where
        L: Layer<BoxedService> + Send + Sync + 'static,
        L::Service: Service<Request<Bytes>, Response = Response<Bytes>, Error = Error>
            + Clone
            + Send
            + 'static,
        <L::Service as Service<Request<Bytes>>>::Future: Send,
    {
        self.layers.push(Arc::new(move |service| {
            BoxCloneService::new(layer.layer(service))
        }));
        self
    }

    /// Add bearer token authentication.
    #[cfg(feature = "middleware-bearer-auth")]
    #[must_use]
    pub fn with_bearer_auth(self, token: impl Into<String>) -> Self {
        self.layer(BearerAuthLayer::new(token))
    }

    /// Add request/response logging at info level.
    #[cfg(feature = "middleware-logging")]
    #[must_use]
    pub fn with_logging(self) -> Self {
        self.layer(LoggingLayer::new())
    }

    /// Add request/response logging at debug level, with headers.
    #[cfg(feature = "middleware-logging")]
    #[must_use]
    pub fn with_debug_logging(self) -> Self {
        self.layer(LoggingLayer::debug())
    }

    /// Limit the number of requests in flight.
    #[cfg(feature = "middleware-concurrency")]
    #[must_use]
    pub fn with_concurrency_limit(self, max: usize) -> Self {
        self.layer(ConcurrencyLimitLayer::new(max))
    }

    /// Build the client.
    #[must_use]
    pub fn build(self) -> HyperClient {
        let config = self.config.build();
        let raw = RawHyperClient::new(config.clone());

        let service = self
            .layers
            .into_iter()
            .fold(BoxCloneService::new(raw), |service, layer_fn| {
                layer_fn(service)
            });

        HyperClient::with_service(service, config)
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;
    use crate::Method;

    #[test]
    fn client_default() {
        let client = HyperClient::new();

        check!(client.config().timeout == Duration::from_secs(30));
    }

    #[test]
    fn client_builder() {
        let client = HyperClient::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(3))
            .pool_idle_per_host(16)
            .build();

        check!(client.config().timeout == Duration::from_secs(60));
        check!(client.config().connect_timeout == Duration::from_secs(3));
        check!(client.config().pool_idle_per_host == 16);
    }

    #[test]
    fn builder_takes_whole_config() {
        let config = ClientConfig::builder().timeout(Duration::from_secs(1)).build();

        let client = HyperClient::builder().config(&config).build();

        check!(client.config() == &config);
    }

    #[test]
    fn client_is_debug() {
        let debug = format!("{:?}", HyperClient::new());

        check!(debug.contains("HyperClient"));
    }

    #[test]
    fn hyper_request_carries_method_headers_and_body() {
        let url = url::Url::parse("https://api.example.com/items?page=2").expect("valid URL");
        let request = Request::builder(Method::Post, url)
            .header("X-Trace", "abc")
            .body(Bytes::from_static(b"{}"))
            .build();

        let_assert!(Ok(hyper_request) = RawHyperClient::build_hyper_request(request));

        check!(hyper_request.method() == http::Method::POST);
        check!(hyper_request.uri() == "https://api.example.com/items?page=2");
        check!(hyper_request.headers().get("x-trace").is_some_and(|v| v == "abc"));
    }

    #[test]
    fn invalid_header_is_invalid_request() {
        let url = url::Url::parse("https://api.example.com").expect("valid URL");
        let request = Request::<Bytes>::builder(Method::Get, url)
            .header("bad header", "value")
            .build();

        let_assert!(Err(err) = RawHyperClient::build_hyper_request(request));
        check!(matches!(err, Error::InvalidRequest(_)));
    }
}
