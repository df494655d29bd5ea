//! Prelude module for convenient imports.
//!
//! ```
//! use courier_core::prelude::*;
//! ```

pub use crate::{
    ContentType, Error, HttpClient, JsonParser, JsonReadingOptions, Method, NetworkResponse,
    ParsingInterceptor, Pipeline, Request, RequestBuilder, Response, ResponseInterceptor,
    ResponseParser, Result, StatusValidationInterceptor, TextParser, interceptor_fn, to_json,
};
