//! Host-name normalization for URLs with internationalized domains.
//!
//! # Design
//! Only the host is rewritten. The URL is split just far enough to find the
//! authority; if the host has to be IDNA-encoded, the encoded host is spliced
//! back into the original string, so every other byte of the URL, including
//! userinfo and port, survives exactly. A URL that needs nothing is returned
//! borrowed.

use std::borrow::Cow;
use std::ops::Range;

/// The five components of a URL, `scheme://netloc/path?query#fragment`.
///
/// Delimiters are not included: `scheme` has no `:`, `query` no `?` and
/// `fragment` no `#`. Missing components are empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlParts<'a> {
    pub scheme: &'a str,
    pub netloc: &'a str,
    pub path: &'a str,
    pub query: &'a str,
    pub fragment: &'a str,
}

/// Split a URL into its five components without validating it.
pub fn split_url(url: &str) -> UrlParts<'_> {
    let spans = Spans::of(url);
    UrlParts {
        scheme: &url[spans.scheme],
        netloc: &url[spans.netloc],
        path: &url[spans.path],
        query: &url[spans.query],
        fragment: &url[spans.fragment],
    }
}

/// Return `url` with its host converted to ASCII-compatible form.
///
/// The host is encoded when the authority contains anything outside
/// `[-.A-Za-z0-9]` and the host itself is not plain ASCII. If IDNA rejects
/// the host the URL is returned unchanged and a warning is logged.
pub fn normalize_url(url: &str) -> Cow<'_, str> {
    let netloc = Spans::of(url).netloc;
    if url[netloc.clone()].bytes().all(is_host_safe) {
        return Cow::Borrowed(url);
    }

    let host = host_span(&url[netloc.clone()]);
    let host = netloc.start + host.start..netloc.start + host.end;
    if url[host.clone()].is_ascii() {
        return Cow::Borrowed(url);
    }

    match idna::domain_to_ascii(&url[host.clone()]) {
        Ok(encoded) => {
            tracing::debug!(host = &url[host.clone()], %encoded, "encoded internationalized host");
            let mut out = String::with_capacity(url.len() + encoded.len());
            out.push_str(&url[..host.start]);
            out.push_str(&encoded);
            out.push_str(&url[host.end..]);
            Cow::Owned(out)
        }
        Err(err) => {
            tracing::warn!(url, error = ?err, "host cannot be IDNA-encoded, leaving url unchanged");
            Cow::Borrowed(url)
        }
    }
}

fn is_host_safe(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'.'
}

fn is_scheme_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'+' | b'-' | b'.')
}

/// Byte ranges of the five components inside the original string.
struct Spans {
    scheme: Range<usize>,
    netloc: Range<usize>,
    path: Range<usize>,
    query: Range<usize>,
    fragment: Range<usize>,
}

impl Spans {
    fn of(url: &str) -> Self {
        let bytes = url.as_bytes();
        let len = bytes.len();

        let scheme_end = bytes
            .iter()
            .position(|&b| matches!(b, b':' | b'/' | b'?' | b'#'))
            .filter(|&i| {
                bytes[i] == b':'
                    && i > 0
                    && bytes[0].is_ascii_alphabetic()
                    && bytes[..i].iter().all(|&b| is_scheme_char(b))
            });
        let (scheme, mut pos) = match scheme_end {
            Some(i) => (0..i, i + 1),
            None => (0..0, 0),
        };

        let netloc = if url[pos..].starts_with("//") {
            let start = pos + 2;
            let end = bytes[start..]
                .iter()
                .position(|&b| matches!(b, b'/' | b'?' | b'#'))
                .map_or(len, |i| start + i);
            pos = end;
            start..end
        } else {
            pos..pos
        };

        let fragment_mark = bytes[pos..].iter().position(|&b| b == b'#').map(|i| pos + i);
        let fragment = fragment_mark.map_or(len..len, |i| i + 1..len);
        let before_fragment = fragment_mark.unwrap_or(len);

        let query_mark = bytes[pos..before_fragment]
            .iter()
            .position(|&b| b == b'?')
            .map(|i| pos + i);
        let query = query_mark.map_or(before_fragment..before_fragment, |i| i + 1..before_fragment);
        let path = pos..query_mark.unwrap_or(before_fragment);

        Spans {
            scheme,
            netloc,
            path,
            query,
            fragment,
        }
    }
}

/// Range of the host inside `[userinfo@]host[:port]`.
fn host_span(netloc: &str) -> Range<usize> {
    let start = netloc.rfind('@').map_or(0, |i| i + 1);
    let host_port = &netloc[start..];

    if host_port.starts_with('[') {
        let end = host_port.find(']').map_or(host_port.len(), |i| i + 1);
        return start..start + end;
    }

    let end = match host_port.rfind(':') {
        Some(i) if host_port[i + 1..].bytes().all(|b| b.is_ascii_digit()) => i,
        _ => host_port.len(),
    };
    start..start + end
}
