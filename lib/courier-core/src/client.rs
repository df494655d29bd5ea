//! Transport trait.
//!
//! A transport turns an assembled [`Request`] into a completed [`Response`]
//! or a transport-level [`Error`](crate::Error). It owns all network I/O; the
//! response pipeline only ever sees what it produced.
//!
//! `courier` ships a hyper-based transport. Implement [`HttpClient`] directly
//! for custom networking stacks or for tests.

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;

use crate::{Request, Response, Result};

/// Core HTTP transport trait.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
///
/// use bytes::Bytes;
/// use courier_core::{HttpClient, Request, Response, Result};
///
/// /// Answers every request with the same canned body.
/// #[derive(Clone)]
/// struct Canned(&'static str);
///
/// impl HttpClient for Canned {
///     async fn execute(&self, _request: Request<Bytes>) -> Result<Response<Bytes>> {
///         Ok(Response::new(200, HashMap::new(), Bytes::from_static(self.0.as_bytes())))
///     }
/// }
/// ```
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// Non-2xx statuses are not errors at this level.
    ///
    /// # Errors
    ///
    /// Returns an error if the call could not complete:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send;
}

impl<C: HttpClient> HttpClient for Arc<C> {
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send {
        C::execute(self, request)
    }
}
