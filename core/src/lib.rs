//! Value normalization for outbound HTTP requests.
//!
//! # Overview
//! Turns loosely-typed key/value data (text, raw bytes, absent values, file
//! uploads) into the bytes that go on the wire as an urlencoded body or query
//! string, or as a `Cookie` header, and makes URLs with internationalized
//! host names safe to send.
//!
//! # Design
//! - Every value is first normalized to bytes with an explicit [`Charset`];
//!   text the charset cannot represent loses those characters rather than
//!   failing. Only [`normalize_text`] can fail, and only on non-text input.
//! - Maps and pair lists are both collected into [`Items`] before encoding.
//!   Pair lists keep their order and duplicates; maps use their own order.
//! - Form and cookie encoding escape differently: form encoding escapes
//!   everything outside the unreserved set, cookie encoding only space, tab,
//!   `;` and `,`.
//! - Nothing here does I/O or keeps state. [`FormClient`] builds
//!   [`HttpRequest`] values the caller executes.

pub mod charset;
pub mod client;
pub mod cookie;
pub mod error;
pub mod form;
pub mod host;
pub mod http;
pub mod items;
pub mod upload;
pub mod value;

pub use charset::Charset;
pub use client::FormClient;
pub use cookie::{cookie_header, cookie_tokens, encode_cookies, CookieHeader};
pub use error::EncodeError;
pub use form::{quote, urlencode};
pub use host::{normalize_url, split_url, UrlParts};
pub use http::{HttpMethod, HttpRequest};
pub use items::{normalize_items, Items, NormalizedItem};
pub use upload::{UploadContent, UploadField, UploadFile, UploadPayload, UploadSource};
pub use value::{normalize_text, normalize_value, Key, NormalizedValue, Value};
