//! HTTP request described as plain data, for the host-does-IO pattern.
//!
//! # Design
//! The core never touches the network. `FormClient` builds `HttpRequest`
//! values and the caller executes them with whatever transport it owns.
//! Header values and bodies are bytes because text is encoded with the
//! request's charset before it gets here.

use crate::charset::Charset;
use crate::cookie::cookie_header;
use crate::items::Items;

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
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, Vec<u8>)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// First value of the header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&[u8]> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_slice())
    }

    /// Attach a `cookie` header built from `items`. Empty items add nothing.
    pub fn with_cookies(mut self, items: impl Into<Items>, charset: Charset) -> Self {
        let value = cookie_header(items, charset);
        if !value.is_empty() {
            self.headers.push(("cookie".to_string(), value));
        }
        self
    }
}
