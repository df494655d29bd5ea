//! Resources: declarative descriptions of a single request.
//!
//! A [`Resource`] is obtained from a [`WebService`](crate::WebService) and
//! refined with builder methods until it describes one call: method, path,
//! query, headers, body and the parser for the response. [`Resource::load`]
//! then sends it and runs the service's response pipeline.
//!
//! Building never fails. A step that cannot be honoured (an invalid base URL,
//! a body that does not serialize) *predisposes* the resource instead: the
//! first such error is kept, later steps are no-ops, and loading yields a
//! failed [`NetworkResponse`] without touching the transport.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::{
    ContentType, Error, HttpClient, JsonParser, JsonReadingOptions, Method, NetworkResponse,
    Pipeline, Request, ResponseParser, Result, TextParser, to_json,
};

/// Everything needed to assemble the request.
#[derive(Debug, Clone)]
struct Target {
    method: Method,
    url: Url,
    headers: HashMap<String, String>,
    body: Option<Bytes>,
}

/// A request waiting to be loaded.
///
/// # Example
///
/// ```no_run
/// use courier::{HyperClient, WebService};
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize)]
/// struct Repo {
///     name: String,
/// }
///
/// # async fn run() -> courier::Result<()> {
/// let github = WebService::new(HyperClient::new(), "https://api.github.com");
///
/// let repos: Vec<Repo> = github
///     .server()
///     .path("users/octocat/repos")
///     .query("per_page", "5")
///     .json()
///     .load_json()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct Resource<C> {
    client: Arc<C>,
    pipeline: Arc<Pipeline>,
    target: std::result::Result<Target, Error>,
    parser: Option<Arc<dyn ResponseParser>>,
}

impl<C> Clone for Resource<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            pipeline: Arc::clone(&self.pipeline),
            target: self.target.clone(),
            parser: self.parser.clone(),
        }
    }
}

impl<C> std::fmt::Debug for Resource<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct("Resource");
        match &self.target {
            Ok(target) => debug
                .field("method", &target.method)
                .field("url", &target.url.as_str()),
            Err(error) => debug.field("predisposition", error),
        };
        debug
            .field("parser", &self.parser.as_ref().map(|parser| parser.name()))
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}

impl<C> Resource<C> {
    pub(crate) fn new(client: Arc<C>, pipeline: Arc<Pipeline>, base: Result<Url>) -> Self {
        let target = base.map(|url| Target {
            method: Method::default(),
            url,
            headers: HashMap::new(),
            body: None,
        });
        Self {
            client,
            pipeline,
            target,
            parser: None,
        }
    }

    fn map_target(mut self, f: impl FnOnce(Target) -> Result<Target>) -> Self {
        self.target = self.target.and_then(f);
        self
    }

    /// The error this resource is bound to fail with, if any.
    #[must_use]
    pub fn predisposition(&self) -> Option<&Error> {
        self.target.as_ref().err()
    }

    /// Appends path segments to the URL.
    ///
    /// Leading, trailing and repeated slashes are ignored; each segment is
    /// percent-encoded.
    #[must_use]
    pub fn path(self, path: &str) -> Self {
        self.map_target(|mut target| {
            if target.url.cannot_be_a_base() {
                return Err(Error::invalid_base_url(format!(
                    "{} cannot have path segments",
                    target.url
                )));
            }
            if let Ok(mut segments) = target.url.path_segments_mut() {
                segments
                    .pop_if_empty()
                    .extend(path.split('/').filter(|segment| !segment.is_empty()));
            }
            Ok(target)
        })
    }

    /// Sets the HTTP method. Resources default to `GET`.
    #[must_use]
    pub fn method(self, method: Method) -> Self {
        self.map_target(|mut target| {
            target.method = method;
            Ok(target)
        })
    }

    /// Shorthand for `method(Method::Get)`.
    #[must_use]
    pub fn get(self) -> Self {
        self.method(Method::Get)
    }

    /// Shorthand for `method(Method::Post)`.
    #[must_use]
    pub fn post(self) -> Self {
        self.method(Method::Post)
    }

    /// Shorthand for `method(Method::Put)`.
    #[must_use]
    pub fn put(self) -> Self {
        self.method(Method::Put)
    }

    /// Shorthand for `method(Method::Patch)`.
    #[must_use]
    pub fn patch(self) -> Self {
        self.method(Method::Patch)
    }

    /// Shorthand for `method(Method::Delete)`.
    #[must_use]
    pub fn delete(self) -> Self {
        self.method(Method::Delete)
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn query(self, name: &str, value: &str) -> Self {
        self.map_target(|mut target| {
            target.url.query_pairs_mut().append_pair(name, value);
            Ok(target)
        })
    }

    /// Sets a header, replacing any previous value for `name`.
    #[must_use]
    pub fn header(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let (name, value) = (name.into(), value.into());
        self.map_target(|mut target| {
            target
                .headers
                .retain(|key, _| !key.eq_ignore_ascii_case(&name));
            target.headers.insert(name, value);
            Ok(target)
        })
    }

    /// Sets a raw body with its content type.
    #[must_use]
    pub fn body(self, body: impl Into<Bytes>, content_type: ContentType) -> Self {
        let body = body.into();
        self.header("Content-Type", content_type.as_str())
            .map_target(|mut target| {
                target.body = Some(body);
                Ok(target)
            })
    }

    /// Serializes `value` as the JSON body.
    ///
    /// A serialization failure predisposes the resource.
    #[must_use]
    pub fn json_body<T: Serialize>(self, value: &T) -> Self {
        match to_json(value) {
            Ok(body) => self.body(body, ContentType::Json),
            Err(error) => self.predispose(error),
        }
    }

    /// Decodes the response as JSON, with default reading options.
    #[must_use]
    pub fn json(self) -> Self {
        self.json_with(JsonReadingOptions::default())
    }

    /// Decodes the response as JSON with the given options.
    #[must_use]
    pub fn json_with(self, options: JsonReadingOptions) -> Self {
        self.header("Accept", ContentType::Json.as_str())
            .parser(Arc::new(JsonParser::with_options(options)))
    }

    /// Decodes the response as UTF-8 text.
    #[must_use]
    pub fn text(self) -> Self {
        self.parser(Arc::new(TextParser))
    }

    /// Sets the parser attached to the response.
    #[must_use]
    pub fn parser(mut self, parser: Arc<dyn ResponseParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Binds the resource to fail with `error`, unless it already is.
    #[must_use]
    pub fn predispose(self, error: Error) -> Self {
        self.map_target(|_| Err(error))
    }

    /// Assembles the request this resource describes.
    ///
    /// # Errors
    ///
    /// Returns the predisposition, if any.
    pub fn build_request(&self) -> Result<Request<Bytes>> {
        let target = self.target.as_ref().map_err(Clone::clone)?;

        let builder = Request::builder(target.method, target.url.clone())
            .headers(target.headers.clone());
        Ok(match &target.body {
            Some(body) => builder.body(body.clone()),
            None => builder,
        }
        .build())
    }
}

impl<C: HttpClient> Resource<C> {
    /// Sends the request and runs the response pipeline.
    ///
    /// Never fails: transport errors and predispositions end up on the
    /// returned response, which still goes through every pipeline stage.
    pub async fn load(&self) -> NetworkResponse {
        let response = match self.build_request() {
            Ok(request) => {
                debug!(method = %request.method(), url = %request.url(), "loading resource");
                NetworkResponse::from_transport(self.client.execute(request).await)
            }
            Err(error) => {
                warn!(%error, "resource is predisposed to fail, request not sent");
                NetworkResponse::failed(error)
            }
        };

        let response = match &self.parser {
            Some(parser) => response.with_parser(Arc::clone(parser)),
            None => response,
        };
        self.pipeline.run(response)
    }

    /// Loads the resource and decodes the result into `T`.
    ///
    /// Responses are decoded as JSON unless another parser is attached.
    ///
    /// # Errors
    ///
    /// Returns the error recorded on the response, or
    /// [`Error::JsonDeserialization`] if the result does not match `T`.
    pub async fn load_json<T: DeserializeOwned>(&self) -> Result<T> {
        if self.parser.is_some() {
            self.load().await.decode()
        } else {
            self.clone().json().load().await.decode()
        }
    }
}
