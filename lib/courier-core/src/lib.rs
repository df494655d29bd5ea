//! Core types and traits for the courier declarative HTTP client.
//!
//! The heart of this crate is the response pipeline:
//! - [`NetworkResponse`] - The record threaded through the pipeline
//! - [`ResponseParser`] - Decodes raw bytes into a result ([`JsonParser`], [`TextParser`])
//! - [`ResponseInterceptor`] - A pipeline stage ([`ParsingInterceptor`],
//!   [`StatusValidationInterceptor`], [`interceptor_fn`])
//! - [`Pipeline`] - Applies interceptors in order
//!
//! Around it:
//! - [`HttpClient`] - Transport trait
//! - [`Method`], [`Request`], [`RequestBuilder`] - Assembled requests
//! - [`Response`] - Raw transport responses
//! - [`Error`] and [`Result`] - Error handling
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use courier_core::{JsonParser, NetworkResponse, Pipeline};
//!
//! let response = NetworkResponse::new()
//!     .with_status(200)
//!     .with_data(r#"{"a":1}"#)
//!     .with_parser(Arc::new(JsonParser::new()));
//!
//! let response = Pipeline::standard().run(response);
//! assert_eq!(response.into_result().unwrap(), serde_json::json!({"a": 1}));
//! ```

mod body;
mod client;
mod error;
mod interceptor;
mod method;
mod network_response;
mod parser;
pub mod pipeline;
pub mod prelude;
mod request;
mod response;

pub use body::{ContentType, from_value, to_json};
pub use client::HttpClient;
pub use error::{Error, Result};
pub use interceptor::{
    InterceptorFn, ParsingInterceptor, ResponseInterceptor, StatusValidationInterceptor,
    interceptor_fn,
};
pub use method::Method;
pub use network_response::{NO_RESULT_REASON, NetworkResponse};
pub use parser::{EMPTY_DATA_REASON, JsonParser, JsonReadingOptions, ResponseParser, TextParser};
pub use pipeline::Pipeline;
pub use request::{Request, RequestBuilder};
pub use response::Response;

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
