//! Tower middleware wrapping the transport.
//!
//! These layers see [`Request`](crate::Request)s before they are sent and raw
//! [`Response`](crate::Response)s before the response pipeline runs. Add them
//! with [`HyperClientBuilder::layer`](crate::HyperClientBuilder::layer) or the
//! feature-gated helpers:
//!
//! | Feature | Helper |
//! |---------|--------|
//! | `middleware-logging` | `.with_logging()`, `.with_debug_logging()` |
//! | `middleware-bearer-auth` | `.with_bearer_auth()` |
//! | `middleware-concurrency` | `.with_concurrency_limit()` |
//!
//! # Example
//!
//! ```no_run
//! use courier::HyperClient;
//! use courier::middleware::{BearerAuthLayer, LoggingLayer};
//!
//! let client = HyperClient::builder()
//!     .layer(BearerAuthLayer::new("my-token"))
//!     .layer(LoggingLayer::debug())
//!     .build();
//! ```

mod bearer_auth;
mod logging;

pub use bearer_auth::{BearerAuth, BearerAuthLayer};
pub use logging::{LogLevel, Logging, LoggingLayer};

pub use tower::limit::ConcurrencyLimitLayer;
pub use tower::{Layer, ServiceBuilder};
