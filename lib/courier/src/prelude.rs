//! Prelude module for convenient imports.
//!
//! ```
//! use courier::prelude::*;
//! ```

pub use crate::{
    ClientConfig, ContentType, Error, HttpClient, HyperClient, JsonParser, JsonReadingOptions,
    Method, NetworkResponse, Pipeline, Resource, ResponseInterceptor, ResponseParser, Result,
    StatusValidationInterceptor, TextParser, WebService, interceptor_fn,
};
pub use serde::{Deserialize, Serialize};
