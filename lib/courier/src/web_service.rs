//! Web services: a server, a transport and a response pipeline.

use std::sync::Arc;

use url::Url;

use crate::{Error, Pipeline, Resource, Result};

/// Entry point for declaring requests against one server.
///
/// Holds the transport, the server URL and the [`Pipeline`] every response
/// goes through. Cloning is cheap; clones share transport and pipeline.
///
/// An invalid server URL is not an error here: resources obtained from
/// [`server`](Self::server) are predisposed with [`Error::InvalidBaseUrl`]
/// and fail when loaded.
///
/// # Example
///
/// ```no_run
/// use courier::{HyperClient, Pipeline, StatusValidationInterceptor, WebService};
///
/// # async fn run() {
/// let api = WebService::new(HyperClient::new(), "https://api.example.com/v1")
///     .with_pipeline(Pipeline::standard().with_first(StatusValidationInterceptor::new()));
///
/// let response = api.server().path("status").json().load().await;
/// if let Some(error) = response.error() {
///     eprintln!("status check failed: {error}");
/// }
/// # }
/// ```
pub struct WebService<C> {
    client: Arc<C>,
    server_url: String,
    base: Result<Url>,
    pipeline: Arc<Pipeline>,
}

impl<C> Clone for WebService<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            server_url: self.server_url.clone(),
            base: self.base.clone(),
            pipeline: Arc::clone(&self.pipeline),
        }
    }
}

impl<C> std::fmt::Debug for WebService<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebService")
            .field("server_url", &self.server_url)
            .field("valid", &self.base.is_ok())
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}

impl<C> WebService<C> {
    /// Create a service for `server_url`, using the standard pipeline.
    pub fn new(client: C, server_url: impl Into<String>) -> Self {
        Self::with_shared_client(Arc::new(client), server_url)
    }

    /// Like [`new`](Self::new), sharing a transport with other services.
    pub fn with_shared_client(client: Arc<C>, server_url: impl Into<String>) -> Self {
        let server_url = server_url.into();
        let base = parse_base_url(&server_url).map_err(|reason| {
            Error::invalid_base_url(format!(
                "invalid server URL {server_url:?}: {reason}; \
                 specify an http or https scheme and a valid path"
            ))
        });
        Self {
            client,
            server_url,
            base,
            pipeline: Arc::new(Pipeline::standard()),
        }
    }

    /// Replace the response pipeline.
    #[must_use]
    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = Arc::new(pipeline);
        self
    }

    /// The server URL, as given.
    #[must_use]
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// The response pipeline.
    #[must_use]
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// The transport.
    #[must_use]
    pub fn client(&self) -> &C {
        &self.client
    }

    /// A resource rooted at the server URL.
    #[must_use]
    pub fn server(&self) -> Resource<C> {
        Resource::new(
            Arc::clone(&self.client),
            Arc::clone(&self.pipeline),
            self.base.clone(),
        )
    }

    /// A resource rooted at `base_url` instead of the server URL.
    ///
    /// The transport and pipeline are the service's own.
    #[must_use]
    pub fn custom_resource(&self, base_url: &str) -> Resource<C> {
        let base = parse_base_url(base_url).map_err(|reason| {
            Error::invalid_base_url(format!(
                "invalid custom resource URL {base_url:?}: {reason}; \
                 specify an http or https scheme and a valid path"
            ))
        });
        Resource::new(Arc::clone(&self.client), Arc::clone(&self.pipeline), base)
    }
}

/// Only absolute `http`/`https` URLs can root a resource.
fn parse_base_url(raw: &str) -> std::result::Result<Url, String> {
    let url = Url::parse(raw.trim()).map_err(|err| err.to_string())?;
    match url.scheme() {
        "http" | "https" if !url.cannot_be_a_base() => Ok(url),
        scheme => Err(format!("unsupported scheme {scheme:?}")),
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;
    use crate::StatusValidationInterceptor;

    #[test]
    fn valid_server_url() {
        let service = WebService::new((), "https://api.example.com/v1");

        let resource = service.server();

        check!(resource.predisposition().is_none());
        let_assert!(Ok(request) = resource.build_request());
        check!(request.url().as_str() == "https://api.example.com/v1");
    }

    #[test]
    fn invalid_server_url_predisposes() {
        let service = WebService::new((), "not a url");
        let resource = service.server();

        let_assert!(Some(Error::InvalidBaseUrl(reason)) = resource.predisposition());
        check!(reason.contains("not a url"));
    }

    #[test]
    fn unsupported_scheme_predisposes() {
        let service = WebService::new((), "ftp://files.example.com");
        let resource = service.server();

        let_assert!(Some(Error::InvalidBaseUrl(reason)) = resource.predisposition());
        check!(reason.contains("ftp"));
    }

    #[test]
    fn custom_resource_uses_its_own_base() {
        let service = WebService::new((), "not a url");

        let resource = service.custom_resource("http://localhost:8080");

        let_assert!(Ok(request) = resource.build_request());
        check!(request.url().as_str() == "http://localhost:8080/");
    }

    #[test]
    fn invalid_custom_resource_predisposes() {
        let service = WebService::new((), "https://api.example.com");

        let resource = service.custom_resource("::");

        let_assert!(Some(err) = resource.predisposition());
        check!(matches!(err, Error::InvalidBaseUrl(_)));
    }

    #[test]
    fn pipeline_is_shared_with_resources() {
        let service = WebService::new((), "https://api.example.com")
            .with_pipeline(Pipeline::standard().with_first(StatusValidationInterceptor::new()));

        check!(service.pipeline().stage_names() == ["status-validation", "parsing"]);
        check!(format!("{:?}", service.server()).contains("status-validation"));
    }

    #[test]
    fn clones_share_transport() {
        let service = WebService::new(String::from("transport"), "https://api.example.com");
        let cloned = service.clone();

        check!(std::ptr::eq(service.client(), cloned.client()));
    }
}
