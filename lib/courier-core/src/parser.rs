//! Response parsers: decoding raw bytes into a result.
//!
//! A [`ResponseParser`] is attached to a [`NetworkResponse`] by the request
//! builder and invoked by the [`ParsingInterceptor`](crate::ParsingInterceptor).
//! On success it stores the decoded value with
//! [`NetworkResponse::set_result`]; on failure it returns the error and leaves
//! it to the calling interceptor to record.
//!
//! Built-in parsers:
//! - [`JsonParser`] - JSON documents, with [`JsonReadingOptions`]
//! - [`TextParser`] - UTF-8 text, stored as a JSON string

use serde_json::Value;

use crate::{Error, NetworkResponse, Result};

/// Reason reported when a body was required but none was received.
pub const EMPTY_DATA_REASON: &str = "Empty Data Received";

/// Decodes the raw body of a [`NetworkResponse`].
///
/// # Example
///
/// ```
/// use courier_core::{NetworkResponse, ResponseParser, Result};
///
/// struct LineCount;
///
/// impl ResponseParser for LineCount {
///     fn parse(&self, response: &mut NetworkResponse) -> Result<()> {
///         if let Some(error) = response.error() {
///             return Err(error.clone());
///         }
///         let lines = response.data().map_or(0, |data| data.split(|b| *b == b'\n').count());
///         response.set_result(lines.into());
///         Ok(())
///     }
/// }
/// ```
pub trait ResponseParser: Send + Sync {
    /// Decode the response body, storing the value on success.
    ///
    /// # Errors
    ///
    /// Returns the reason the body could not be decoded. Parsers must not
    /// write the error onto the response themselves.
    fn parse(&self, response: &mut NetworkResponse) -> Result<()>;

    /// Name used in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

// ============================================================================
// JSON
// ============================================================================

/// Strictness settings for [`JsonParser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonReadingOptions {
    allow_fragments: bool,
    max_depth: Option<usize>,
}

impl Default for JsonReadingOptions {
    fn default() -> Self {
        Self {
            allow_fragments: true,
            max_depth: None,
        }
    }
}

impl JsonReadingOptions {
    /// Only objects and arrays are accepted at the top level.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            allow_fragments: false,
            max_depth: None,
        }
    }

    /// Accept (or reject) scalars such as `"text"` or `42` at the top level.
    #[must_use]
    pub const fn allow_fragments(mut self, allow: bool) -> Self {
        self.allow_fragments = allow;
        self
    }

    /// Reject documents nested deeper than `depth` containers.
    #[must_use]
    pub const fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Whether top-level scalars are accepted.
    #[must_use]
    pub const fn allows_fragments(&self) -> bool {
        self.allow_fragments
    }

    fn check(&self, value: &Value) -> std::result::Result<(), serde_json::Error> {
        use serde::de::Error as _;

        if !self.allow_fragments && !(value.is_object() || value.is_array()) {
            return Err(serde_json::Error::custom(
                "top-level JSON value must be an object or an array",
            ));
        }
        if let Some(limit) = self.max_depth {
            let depth = nesting_depth(value);
            if depth > limit {
                return Err(serde_json::Error::custom(format!(
                    "JSON nesting depth {depth} exceeds the limit of {limit}"
                )));
            }
        }
        Ok(())
    }
}

/// Number of nested containers; scalars have depth 0.
fn nesting_depth(value: &Value) -> usize {
    let mut deepest = 0;
    let mut stack = vec![(value, 0_usize)];
    while let Some((value, depth)) = stack.pop() {
        match value {
            Value::Array(items) => {
                deepest = deepest.max(depth + 1);
                stack.extend(items.iter().map(|item| (item, depth + 1)));
            }
            Value::Object(fields) => {
                deepest = deepest.max(depth + 1);
                stack.extend(fields.values().map(|field| (field, depth + 1)));
            }
            _ => {}
        }
    }
    deepest
}

/// Decodes the body as a JSON document into a [`serde_json::Value`].
///
/// - a response that already failed is never parsed: its error is returned as is;
/// - an absent or empty body fails with [`EMPTY_DATA_REASON`], even for
///   statuses such as `204 No Content`;
/// - malformed JSON fails with [`Error::JsonParsing`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser {
    options: JsonReadingOptions,
}

impl JsonParser {
    /// Create a JSON parser with default options (fragments allowed).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a JSON parser with custom options.
    #[must_use]
    pub const fn with_options(options: JsonReadingOptions) -> Self {
        Self { options }
    }

    /// Reading options in use.
    #[must_use]
    pub const fn options(&self) -> JsonReadingOptions {
        self.options
    }

    fn decode(&self, data: &[u8]) -> Result<Value> {
        let value = serde_json::from_slice::<Value>(data).map_err(Error::json_parsing)?;
        self.options.check(&value).map_err(Error::json_parsing)?;
        Ok(value)
    }
}

impl ResponseParser for JsonParser {
    fn parse(&self, response: &mut NetworkResponse) -> Result<()> {
        if let Some(error) = response.error() {
            return Err(error.clone());
        }

        let value = match response.data() {
            Some(data) if !data.is_empty() => self.decode(data)?,
            _ => return Err(Error::response_validation(EMPTY_DATA_REASON)),
        };
        response.set_result(value);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "json"
    }
}

// ============================================================================
// Text
// ============================================================================

/// Decodes the body as UTF-8 text into a [`Value::String`].
///
/// Unlike [`JsonParser`], an empty or absent body yields an empty string.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextParser;

impl ResponseParser for TextParser {
    fn parse(&self, response: &mut NetworkResponse) -> Result<()> {
        if let Some(error) = response.error() {
            return Err(error.clone());
        }

        let text = match response.data() {
            Some(data) => std::str::from_utf8(data)
                .map_err(Error::TextDecoding)?
                .to_owned(),
            None => String::new(),
        };
        response.set_result(Value::String(text));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "text"
    }
}
