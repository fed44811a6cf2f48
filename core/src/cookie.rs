//! `Cookie` header serialization.
//!
//! # Design
//! Cookie values only forbid a handful of characters, so the escaping here
//! is much narrower than form encoding: space, tab, `;` and `,` are
//! percent-encoded and every other byte, non-ASCII included, is written as
//! is. The `percent-encoding` crate always escapes non-ASCII bytes, which is
//! why the replacement is done by hand.

use crate::charset::Charset;
use crate::items::{normalize_items, Items};
use crate::value::NormalizedValue;

const SEPARATOR: &[u8] = b"; ";

/// Encoded cookies, either as one header value or as separate tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieHeader {
    /// Tokens joined with `"; "`.
    Joined(Vec<u8>),
    /// One `key=value` token per item, in item order.
    Tokens(Vec<Vec<u8>>),
}

impl CookieHeader {
    /// The joined header value, joining the tokens if necessary.
    pub fn into_joined(self) -> Vec<u8> {
        match self {
            CookieHeader::Joined(bytes) => bytes,
            CookieHeader::Tokens(tokens) => tokens.join(SEPARATOR),
        }
    }

    /// The individual tokens, splitting the joined value if necessary.
    pub fn into_tokens(self) -> Vec<Vec<u8>> {
        match self {
            CookieHeader::Tokens(tokens) => tokens,
            CookieHeader::Joined(bytes) if bytes.is_empty() => Vec::new(),
            CookieHeader::Joined(bytes) => split_joined(&bytes),
        }
    }
}

/// Serialize items for a `Cookie` header. With `join` the tokens are joined
/// with `"; "`, otherwise they are returned separately.
///
/// Uploads cannot be sent as cookies; those pairs are skipped with a warning.
pub fn encode_cookies(items: impl Into<Items>, join: bool, charset: Charset) -> CookieHeader {
    let tokens = cookie_tokens(items, charset);
    if join {
        CookieHeader::Joined(tokens.join(SEPARATOR))
    } else {
        CookieHeader::Tokens(tokens)
    }
}

/// Shorthand for `encode_cookies(items, true, charset).into_joined()`.
pub fn cookie_header(items: impl Into<Items>, charset: Charset) -> Vec<u8> {
    encode_cookies(items, true, charset).into_joined()
}

/// One escaped `key=value` token per item.
pub fn cookie_tokens(items: impl Into<Items>, charset: Charset) -> Vec<Vec<u8>> {
    normalize_items(items, charset)
        .into_iter()
        .filter_map(|(key, value)| match value {
            NormalizedValue::Bytes(value) => {
                let mut token = escape(&key);
                token.push(b'=');
                token.extend(escape(&value));
                Some(token)
            }
            NormalizedValue::Upload(field) => {
                tracing::warn!(
                    key = %String::from_utf8_lossy(&key),
                    filename = ?field.filename,
                    "upload values cannot be sent as cookies, skipping"
                );
                None
            }
        })
        .collect()
}

/// Percent-encode the four bytes a cookie value cannot contain.
pub fn escape(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    for &byte in data {
        match byte {
            b' ' => out.extend_from_slice(b"%20"),
            b'\t' => out.extend_from_slice(b"%09"),
            b';' => out.extend_from_slice(b"%3B"),
            b',' => out.extend_from_slice(b"%2C"),
            other => out.push(other),
        }
    }
    out
}

// Escaped tokens never contain "; ", so splitting on it is exact.
fn split_joined(bytes: &[u8]) -> Vec<Vec<u8>> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i + SEPARATOR.len() <= bytes.len() {
        if &bytes[i..i + SEPARATOR.len()] == SEPARATOR {
            tokens.push(bytes[start..i].to_vec());
            i += SEPARATOR.len();
            start = i;
        } else {
            i += 1;
        }
    }
    tokens.push(bytes[start..].to_vec());
    tokens
}
