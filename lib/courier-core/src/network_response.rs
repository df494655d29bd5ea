//! The record threaded through the response pipeline.
//!
//! A [`NetworkResponse`] is created once per request, when the transport
//! finishes (successfully or not). It is then moved through every
//! [`ResponseInterceptor`](crate::ResponseInterceptor) of a
//! [`Pipeline`](crate::Pipeline), each stage mutating it and handing it on,
//! and is finally consumed by the caller.
//!
//! Invariants kept by the mutators:
//! - `error` and `result` are never both set;
//! - `result` is only stored while no error is set, and at most once;
//! - the first error wins, unless replaced explicitly with
//!   [`NetworkResponse::replace_error`].

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use serde_json::Value;

use crate::{Error, ResponseParser, Result};

/// Reason used when a response finishes the pipeline with neither a result nor an error.
pub const NO_RESULT_REASON: &str = "No Result Produced";

/// A single request/response round trip as seen by the response pipeline.
#[derive(Default)]
pub struct NetworkResponse {
    data: Option<Bytes>,
    status: Option<u16>,
    headers: HashMap<String, String>,
    parser: Option<Arc<dyn ResponseParser>>,
    error: Option<Error>,
    result: Option<Value>,
    extensions: http::Extensions,
}

impl std::fmt::Debug for NetworkResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkResponse")
            .field("status", &self.status)
            .field("data_len", &self.data.as_ref().map(Bytes::len))
            .field("parser", &self.parser.as_ref().map(|parser| parser.name()))
            .field("error", &self.error)
            .field("result", &self.result)
            .finish_non_exhaustive()
    }
}

impl NetworkResponse {
    /// Creates an empty response: no data, no metadata, no parser.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a response that already failed, e.g. before reaching the transport.
    #[must_use]
    pub fn failed(error: Error) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    /// Wraps the outcome of a transport call.
    ///
    /// A transport failure becomes the response's error; a completed call
    /// provides status, headers and body.
    #[must_use]
    pub fn from_transport(outcome: Result<crate::Response<Bytes>>) -> Self {
        match outcome {
            Ok(response) => {
                let (status, headers, body) = response.into_parts();
                Self {
                    data: Some(body),
                    status: Some(status),
                    headers,
                    ..Self::default()
                }
            }
            Err(error) => Self::failed(error),
        }
    }

    /// Sets the raw body.
    #[must_use]
    pub fn with_data(mut self, data: impl Into<Bytes>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Sets the HTTP status code.
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Adds a response header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Attaches the parser the response should be run through.
    #[must_use]
    pub fn with_parser(mut self, parser: Arc<dyn ResponseParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Sets the error, following the same first-error-wins rule as [`Self::fail`].
    #[must_use]
    pub fn with_error(mut self, error: Error) -> Self {
        self.fail(error);
        self
    }

    /// Replaces the attached parser, returning the previous one.
    pub fn set_parser(
        &mut self,
        parser: Option<Arc<dyn ResponseParser>>,
    ) -> Option<Arc<dyn ResponseParser>> {
        std::mem::replace(&mut self.parser, parser)
    }

    /// Raw body, if the transport received one.
    #[must_use]
    pub const fn data(&self) -> Option<&Bytes> {
        self.data.as_ref()
    }

    /// HTTP status code, if the transport received one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        self.status
    }

    /// Response headers.
    #[must_use]
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Single header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The parser this response should be run through.
    #[must_use]
    pub fn parser(&self) -> Option<&Arc<dyn ResponseParser>> {
        self.parser.as_ref()
    }

    /// The error, if the response has failed.
    #[must_use]
    pub const fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// The decoded value, if a parser succeeded.
    #[must_use]
    pub const fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    /// Per-response state owned by interceptors.
    #[must_use]
    pub const fn extensions(&self) -> &http::Extensions {
        &self.extensions
    }

    /// Mutable per-response state owned by interceptors.
    pub fn extensions_mut(&mut self) -> &mut http::Extensions {
        &mut self.extensions
    }

    /// Returns `true` if an error is set.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    /// Stores the decoded value. Meant for [`ResponseParser`] implementations.
    ///
    /// Ignored when the response has already failed or already holds a
    /// result. Returns whether the value was stored.
    pub fn set_result(&mut self, value: Value) -> bool {
        if self.error.is_some() || self.result.is_some() {
            return false;
        }
        self.result = Some(value);
        true
    }

    /// Marks the response as failed.
    ///
    /// The first error wins: if an error is already set, `error` is dropped
    /// and `false` is returned. Otherwise any decoded result is discarded.
    pub fn fail(&mut self, error: Error) -> bool {
        if self.error.is_some() {
            return false;
        }
        self.result = None;
        self.error = Some(error);
        true
    }

    /// Replaces the current error, returning the previous one.
    ///
    /// For interceptors that deliberately re-derive an error (adding context
    /// to a transport failure, for instance). Any decoded result is discarded.
    pub fn replace_error(&mut self, error: Error) -> Option<Error> {
        self.result = None;
        self.error.replace(error)
    }

    /// Consumes the response into its decoded value or its error.
    ///
    /// # Errors
    ///
    /// Returns the stored error, or a [`Error::ResponseValidation`] with
    /// [`NO_RESULT_REASON`] when nothing decoded the body.
    pub fn into_result(self) -> Result<Value> {
        match (self.error, self.result) {
            (Some(error), _) => Err(error),
            (None, Some(value)) => Ok(value),
            (None, None) => Err(Error::response_validation(NO_RESULT_REASON)),
        }
    }

    /// Consumes the response and decodes its value into `T`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::into_result`], plus [`Error::JsonDeserialization`] when
    /// the decoded value does not match `T`.
    pub fn decode<T: serde::de::DeserializeOwned>(self) -> Result<T> {
        crate::from_value(self.into_result()?)
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use serde_json::json;

    use super::*;

    #[test]
    fn from_transport_success() {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        let raw = crate::Response::new(201, headers, Bytes::from_static(b"{}"));

        let response = NetworkResponse::from_transport(Ok(raw));

        check!(response.status() == Some(201));
        check!(response.header("content-type") == Some("application/json"));
        check!(response.data().map(Bytes::len) == Some(2));
        check!(response.error().is_none());
        check!(response.result().is_none());
    }

    #[test]
    fn from_transport_failure() {
        let response = NetworkResponse::from_transport(Err(Error::Timeout));

        check!(response.data().is_none());
        check!(response.status().is_none());
        let_assert!(Some(Error::Timeout) = response.error());
    }

    #[test]
    fn first_error_wins() {
        let mut response = NetworkResponse::failed(Error::connection("refused"));

        check!(!response.fail(Error::Timeout));
        let_assert!(Some(Error::Connection(message)) = response.error());
        check!(message == "refused");
    }

    #[test]
    fn replace_error_is_explicit() {
        let mut response = NetworkResponse::failed(Error::Timeout);

        let previous = response.replace_error(Error::connection("gave up"));

        let_assert!(Some(Error::Timeout) = previous);
        let_assert!(Some(Error::Connection(_)) = response.error());
    }

    #[test]
    fn result_ignored_after_failure() {
        let mut response = NetworkResponse::failed(Error::Timeout);

        check!(!response.set_result(json!({"a": 1})));
        check!(response.result().is_none());
    }

    #[test]
    fn result_is_written_once() {
        let mut response = NetworkResponse::new();

        check!(response.set_result(json!(1)));
        check!(!response.set_result(json!(2)));
        check!(response.result() == Some(&json!(1)));
    }

    #[test]
    fn failing_discards_result() {
        let mut response = NetworkResponse::new();
        check!(response.set_result(json!([1, 2])));

        check!(response.fail(Error::response_validation("late rejection")));
        check!(response.result().is_none());
        check!(response.error().is_some());
    }

    #[test]
    fn into_result_variants() {
        let mut ok = NetworkResponse::new();
        ok.set_result(json!("done"));
        check!(ok.into_result().expect("value") == json!("done"));

        let_assert!(Err(Error::Timeout) = NetworkResponse::failed(Error::Timeout).into_result());

        let_assert!(Err(err) = NetworkResponse::new().into_result());
        check!(err.validation_reason() == Some(NO_RESULT_REASON));
    }

    #[test]
    fn decode_typed() {
        #[derive(Debug, PartialEq, serde::Deserialize)]
        struct Counter {
            a: u32,
        }

        let mut response = NetworkResponse::new();
        response.set_result(json!({"a": 7}));

        let counter: Counter = response.decode().expect("decode");
        check!(counter == Counter { a: 7 });
    }

    #[test]
    fn debug_omits_body() {
        let response = NetworkResponse::new()
            .with_status(200)
            .with_data("secret payload");

        let debug = format!("{response:?}");
        check!(debug.contains("NetworkResponse"));
        check!(debug.contains("data_len: Some(14)"));
        check!(!debug.contains("secret"));
    }
}
