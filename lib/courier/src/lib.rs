//! Declarative HTTP client for Rust with a composable response pipeline.
//!
//! Describe requests as [`Resource`]s of a [`WebService`], load them over a
//! [`HyperClient`] (or any [`HttpClient`]), and let the [`Pipeline`] turn raw
//! bytes into a decoded result or an error.
//!
//! # Example
//!
//! ```no_run
//! use courier::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! pub struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! # async fn run() -> courier::Result<()> {
//! let api = WebService::new(HyperClient::builder().with_logging().build(), "https://api.example.com");
//!
//! let user: User = api.server().path("users/42").load_json().await?;
//!
//! // Or keep the whole response, and look at it before decoding.
//! let response = api.server().path("users/42").json().load().await;
//! if response.is_failure() {
//!     tracing::warn!(error = ?response.error(), "lookup failed");
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod connector;
pub mod middleware;
pub mod prelude;
mod resource;
mod web_service;

pub use client::{BoxedService, HyperClient, HyperClientBuilder, ServiceFuture};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use resource::Resource;
pub use web_service::WebService;

// Re-export tower for middleware composition
pub use tower;

pub use courier_core::{
    ContentType, EMPTY_DATA_REASON, Error, HttpClient, InterceptorFn, JsonParser,
    JsonReadingOptions, Method, NO_RESULT_REASON, NetworkResponse, ParsingInterceptor, Pipeline,
    Request, RequestBuilder, Response, ResponseInterceptor, ResponseParser, Result,
    StatusValidationInterceptor, TextParser, from_value, interceptor_fn, pipeline, to_json,
};

pub use courier_core::{StatusCode, header};

pub use url;
