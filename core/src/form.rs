//! `application/x-www-form-urlencoded` serialization.

use percent_encoding::{percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::charset::Charset;
use crate::items::{normalize_items, Items};
use crate::value::NormalizedValue;

/// Everything except `[A-Za-z0-9_.-]` is escaped. Space is handled apart,
/// as `+`.
const FORM: &AsciiSet = &NON_ALPHANUMERIC.remove(b'_').remove(b'.').remove(b'-');

/// Serialize items as `key=value&key=value`, for a POST body or a query
/// string.
///
/// Bytes outside `[A-Za-z0-9_.-]` are percent-encoded and a space becomes
/// `+`. Keys and values are normalized with `charset` first, so the escapes
/// describe bytes in that charset.
///
/// Uploads have no urlencoded form; they belong in a multipart body. Any
/// pair whose value is an upload is left out and a warning is logged.
pub fn urlencode(items: impl Into<Items>, charset: Charset) -> String {
    let mut out = String::new();
    for (key, value) in normalize_items(items, charset) {
        let value = match value {
            NormalizedValue::Bytes(bytes) => bytes,
            NormalizedValue::Upload(field) => {
                tracing::warn!(
                    key = %String::from_utf8_lossy(&key),
                    filename = ?field.filename,
                    "upload values cannot be urlencoded, skipping"
                );
                continue;
            }
        };
        if !out.is_empty() {
            out.push('&');
        }
        quote_into(&key, &mut out);
        out.push('=');
        quote_into(&value, &mut out);
    }
    out
}

/// Quote a single component the way [`urlencode`] does, space as `+`.
pub fn quote(data: impl AsRef<[u8]>) -> String {
    let mut out = String::new();
    quote_into(data.as_ref(), &mut out);
    out
}

fn quote_into(data: &[u8], out: &mut String) {
    for (i, chunk) in data.split(|&b| b == b' ').enumerate() {
        if i > 0 {
            out.push('+');
        }
        out.extend(percent_encode(chunk, FORM));
    }
}
