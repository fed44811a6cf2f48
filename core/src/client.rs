//! Stateless request builder for form-style APIs.
//!
//! # Design
//! `FormClient` holds a base URL and the charset text values are encoded
//! with. It carries no other state: choosing the charset (a fixed default,
//! or whatever the previous response declared) is the transport's job, and a
//! transport that wants to switch simply builds a new client with
//! [`FormClient::with_charset`].

use crate::charset::Charset;
use crate::form::urlencode;
use crate::host::normalize_url;
use crate::http::{HttpMethod, HttpRequest};
use crate::items::Items;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Builds `HttpRequest` values with urlencoded queries and bodies.
#[derive(Debug, Clone)]
pub struct FormClient {
    base_url: String,
    charset: Charset,
}

impl FormClient {
    /// The host of `base_url` is IDNA-encoded if needed and a trailing `/`
    /// is dropped.
    pub fn new(base_url: &str, charset: Charset) -> Self {
        Self {
            base_url: normalize_url(base_url).trim_end_matches('/').to_string(),
            charset,
        }
    }

    pub fn with_charset(&self, charset: Charset) -> Self {
        Self {
            base_url: self.base_url.clone(),
            charset,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    pub fn build_get(&self, path: &str, query: impl Into<Items>) -> HttpRequest {
        let mut url = self.url_for(path);
        let query = urlencode(query, self.charset);
        if !query.is_empty() {
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&query);
        }
        HttpRequest {
            method: HttpMethod::Get,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_post_form(&self, path: &str, items: impl Into<Items>) -> HttpRequest {
        let body = urlencode(items, self.charset);
        HttpRequest {
            method: HttpMethod::Post,
            url: self.url_for(path),
            headers: vec![("content-type".to_string(), FORM_CONTENT_TYPE.as_bytes().to_vec())],
            body: Some(body.into_bytes()),
        }
    }

    fn url_for(&self, path: &str) -> String {
        if path.is_empty() || path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}
