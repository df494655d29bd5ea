//! Response interceptors: the stages of a [`Pipeline`](crate::Pipeline).
//!
//! An interceptor takes a [`NetworkResponse`] and hands back a response,
//! usually the same one, mutated. Interceptors never fail: whatever goes wrong
//! inside a stage is recorded on the response with
//! [`NetworkResponse::fail`], so the pipeline itself stays failure-agnostic.
//!
//! Each interceptor decides for itself whether to act on a response that has
//! already failed. The built-in ones leave such responses untouched.

use std::ops::Range;

use tracing::debug;

use crate::{Error, NetworkResponse};

/// A single stage of the response pipeline.
pub trait ResponseInterceptor: Send + Sync {
    /// Process the response and return it.
    fn intercept(&self, response: NetworkResponse) -> NetworkResponse;

    /// Name used in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Runs a response through the parser attached to it.
///
/// Without a parser the response passes through unchanged. A parser failure
/// is recorded on the response; since [`JsonParser`](crate::JsonParser)
/// re-raises an existing error rather than parsing, a transport failure is
/// never masked by a parsing error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParsingInterceptor;

impl ResponseInterceptor for ParsingInterceptor {
    fn intercept(&self, mut response: NetworkResponse) -> NetworkResponse {
        let Some(parser) = response.parser().cloned() else {
            return response;
        };

        if let Err(error) = parser.parse(&mut response) {
            debug!(parser = parser.name(), %error, "response parsing failed");
            response.fail(error);
        }
        response
    }

    fn name(&self) -> &'static str {
        "parsing"
    }
}

// ============================================================================
// Status validation
// ============================================================================

/// Fails responses whose status code is outside an acceptable range.
///
/// Responses that already failed, or that carry no status, pass through.
/// Register it ahead of [`ParsingInterceptor`] so error bodies are not parsed
/// as results.
#[derive(Debug, Clone)]
pub struct StatusValidationInterceptor {
    acceptable: Range<u16>,
}

impl Default for StatusValidationInterceptor {
    fn default() -> Self {
        Self { acceptable: 200..300 }
    }
}

impl StatusValidationInterceptor {
    /// Accept 2xx statuses only.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept the given range of statuses.
    #[must_use]
    pub const fn accepting(acceptable: Range<u16>) -> Self {
        Self { acceptable }
    }
}

impl ResponseInterceptor for StatusValidationInterceptor {
    fn intercept(&self, mut response: NetworkResponse) -> NetworkResponse {
        if response.is_failure() {
            return response;
        }
        if let Some(status) = response.status()
            && !self.acceptable.contains(&status)
        {
            debug!(status, "unacceptable status code");
            response.fail(Error::response_validation(format!(
                "Unacceptable Status Code: {status}"
            )));
        }
        response
    }

    fn name(&self) -> &'static str {
        "status-validation"
    }
}

// ============================================================================
// Closures
// ============================================================================

/// Interceptor built from a closure, see [`interceptor_fn`].
#[derive(Clone, Copy)]
pub struct InterceptorFn<F> {
    name: &'static str,
    f: F,
}

impl<F> std::fmt::Debug for InterceptorFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptorFn")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Turn a closure into a named [`ResponseInterceptor`].
///
/// # Example
///
/// ```
/// use courier_core::{NetworkResponse, Pipeline, interceptor_fn};
///
/// let pipeline = Pipeline::new().with(interceptor_fn("tag", |mut response: NetworkResponse| {
///     response.extensions_mut().insert("seen");
///     response
/// }));
///
/// let response = pipeline.run(NetworkResponse::new());
/// assert_eq!(response.extensions().get::<&str>(), Some(&"seen"));
/// ```
pub fn interceptor_fn<F>(name: &'static str, f: F) -> InterceptorFn<F>
where
    F: Fn(NetworkResponse) -> NetworkResponse + Send + Sync,
{
    InterceptorFn { name, f }
}

impl<F> ResponseInterceptor for InterceptorFn<F>
where
    F: Fn(NetworkResponse) -> NetworkResponse + Send + Sync,
{
    fn intercept(&self, response: NetworkResponse) -> NetworkResponse {
        (self.f)(response)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
