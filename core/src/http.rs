//! HTTP request and response types, described as plain data.
//!
//! # Design
//! `ApiClient` builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network; a `Transport` performs the actual round
//! trip in between. Keeping the two halves as data makes every request the
//! client would send inspectable in tests.

use url::form_urlencoded;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// An HTTP request described as plain data.
///
/// `url` never carries a query string; query parameters live in `query` in
/// the order they were declared and are encoded by `full_url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// `url` followed by the URL-encoded query, if there is one.
    pub fn full_url(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }
        format!("{}?{}", self.url, self.query_string())
    }

    /// The encoded query string alone, empty when there are no parameters.
    pub fn query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish()
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A value that may appear in a query string.
///
/// Returns `None` for absent and falsy values (`0`, `false`, `""`) so the
/// parameter is left out instead of being sent empty.
pub trait QueryValue {
    fn to_query_value(&self) -> Option<String>;
}

macro_rules! numeric_query_value {
    ($($ty:ty),*) => {
        $(
            impl QueryValue for $ty {
                fn to_query_value(&self) -> Option<String> {
                    (*self != 0).then(|| self.to_string())
                }
            }
        )*
    };
}

numeric_query_value!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl QueryValue for bool {
    fn to_query_value(&self) -> Option<String> {
        self.then(|| "true".to_string())
    }
}

impl QueryValue for str {
    fn to_query_value(&self) -> Option<String> {
        (!self.is_empty()).then(|| self.to_string())
    }
}

impl QueryValue for &str {
    fn to_query_value(&self) -> Option<String> {
        (**self).to_query_value()
    }
}

impl QueryValue for String {
    fn to_query_value(&self) -> Option<String> {
        self.as_str().to_query_value()
    }
}

impl<T: QueryValue> QueryValue for Option<T> {
    fn to_query_value(&self) -> Option<String> {
        self.as_ref().and_then(QueryValue::to_query_value)
    }
}

/// Ordered query parameters for a GET request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `key` unless `value` is absent or falsy.
    pub fn param(mut self, key: &str, value: impl QueryValue) -> Self {
        if let Some(value) = value.to_query_value() {
            self.pairs.push((key.to_string(), value));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.pairs
    }
}
