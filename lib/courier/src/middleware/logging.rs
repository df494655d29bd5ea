//! Transport-level request/response logging with `tracing`.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use bytes::Bytes;
use tower::{Layer, Service};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::{Error, Request, Response, Result};

/// How much detail [`LoggingLayer`] records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Method, URL and request headers at debug level.
    Debug,
    /// Method and URL at info level.
    #[default]
    Info,
}

/// Layer logging every exchange: the request, then its status (or
/// transport error) and how long it took.
///
/// Non-2xx statuses and transport errors are logged at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer {
    level: LogLevel,
}

impl LoggingLayer {
    /// Log at info level.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Log at debug level, including request headers.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            level: LogLevel::Debug,
        }
    }

    /// The configured level.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            level: self.level,
        }
    }
}

/// Service produced by [`LoggingLayer`].
#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
    level: LogLevel,
}

impl<S> Service<Request<Bytes>> for Logging<S>
where
    S: Service<Request<Bytes>, Response = Response<Bytes>, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response<Bytes>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Bytes>) -> Self::Future {
        let method = request.method();
        let url = request.url().to_string();
        let span = info_span!("http_request", %method, %url);

        match self.level {
            LogLevel::Debug => {
                span.in_scope(|| debug!(headers = ?request.headers(), "sending request"));
            }
            LogLevel::Info => span.in_scope(|| info!("sending request")),
        }

        // the ready service must be the one called
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(
            async move {
                let start = Instant::now();
                let result = inner.call(request).await;
                let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

                match &result {
                    Ok(response) if response.is_success() => {
                        info!(status = response.status(), elapsed_ms, "request completed");
                    }
                    Ok(response) => {
                        warn!(
                            status = response.status(),
                            elapsed_ms,
                            "request completed with HTTP error"
                        );
                    }
                    Err(error) => warn!(%error, elapsed_ms, "request failed"),
                }
                result
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert2::{check, let_assert};
    use tower::{ServiceExt, service_fn};

    use super::*;
    use crate::Method;

    fn request() -> Request<Bytes> {
        let url = url::Url::parse("https://api.example.com/health").expect("valid URL");
        Request::builder(Method::Get, url).build()
    }

    #[test]
    fn levels() {
        check!(LoggingLayer::new().level() == LogLevel::Info);
        check!(LoggingLayer::debug().level() == LogLevel::Debug);
    }

    #[tokio::test]
    async fn passes_responses_through() {
        let service = LoggingLayer::debug().layer(service_fn(|_request: Request<Bytes>| async {
            Ok::<_, Error>(Response::new(503, HashMap::new(), Bytes::from_static(b"down")))
        }));

        let_assert!(Ok(response) = service.oneshot(request()).await);
        check!(response.status() == 503);
        check!(response.body().as_ref() == b"down");
    }

    #[tokio::test]
    async fn passes_errors_through() {
        let service = LoggingLayer::new().layer(service_fn(|_request: Request<Bytes>| async {
            Err::<Response<Bytes>, _>(Error::Timeout)
        }));

        let_assert!(Err(Error::Timeout) = service.oneshot(request()).await);
    }
}
