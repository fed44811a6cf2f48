//! Text encodings used to turn text values into bytes.
//!
//! # Design
//! `Charset` is `Copy` and is passed by value into every encoder. The crate
//! never remembers a charset between calls: a transport that wants "the
//! charset of the previous response" resolves it itself and hands the result
//! in.
//!
//! Most labels resolve through `encoding_rs`. The WHATWG label table folds
//! the ASCII and ISO-8859-1 families into windows-1252, which would let
//! characters those charsets cannot hold slip through, so both families are
//! handled here by code point instead.
//!
//! Encoding is deliberately lossy. Characters the target encoding cannot
//! represent are dropped, not replaced with `?` or numeric character
//! references, and no error is raised. Callers that need to detect loss can
//! check [`Charset::is_lossless`] first.

use std::fmt;

use encoding_rs::{Encoding, EncoderResult, UTF_8};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

const ASCII_LABELS: &[&str] = &[
    "ascii",
    "us-ascii",
    "us",
    "646",
    "ansi_x3.4-1968",
    "ansi_x3.4-1986",
    "iso646-us",
    "iso-ir-6",
    "cp367",
    "ibm367",
    "csascii",
];

const LATIN1_LABELS: &[&str] = &[
    "latin1",
    "latin-1",
    "l1",
    "8859",
    "iso-8859-1",
    "iso8859-1",
    "iso_8859-1",
    "iso88591",
    "iso_8859-1:1987",
    "iso-ir-100",
    "cp819",
    "ibm819",
    "csisolatin1",
];

/// A named text encoding.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Charset(Kind);

#[derive(Clone, Copy, PartialEq, Eq)]
enum Kind {
    /// Code points below 0x80.
    Ascii,
    /// Code points below 0x100, one byte each.
    Latin1,
    Whatwg(&'static Encoding),
}

/// Outcome of looking a label up.
enum Lookup {
    Found(Charset),
    /// A known encoding that has no encoder (UTF-16, `replacement`).
    DecodeOnly(&'static Encoding),
    Unknown,
}

impl Charset {
    /// The default charset.
    pub fn utf8() -> Self {
        Charset(Kind::Whatwg(UTF_8))
    }

    /// Look up a charset by label (`"utf-8"`, `"cp1251"`, `"latin1"`,
    /// `"ascii"`, ...). Labels are matched case-insensitively.
    ///
    /// Encodings that can only be decoded (UTF-16 variants, `replacement`)
    /// are not charsets text can be written in and yield `None`.
    pub fn for_label(label: &str) -> Option<Self> {
        match lookup(label) {
            Lookup::Found(charset) => Some(charset),
            Lookup::DecodeOnly(_) | Lookup::Unknown => None,
        }
    }

    /// Resolve an optional label supplied by a transport. A missing, unknown
    /// or decode-only label falls back to UTF-8.
    pub fn resolve(label: Option<&str>) -> Self {
        let Some(label) = label else {
            return Self::utf8();
        };
        match lookup(label) {
            Lookup::Found(charset) => charset,
            Lookup::DecodeOnly(encoding) => {
                tracing::warn!(
                    label,
                    encoding = encoding.name(),
                    "charset cannot be used for encoding, falling back to utf-8"
                );
                Self::utf8()
            }
            Lookup::Unknown => {
                tracing::warn!(label, "unknown charset label, falling back to utf-8");
                Self::utf8()
            }
        }
    }

    /// Canonical name of the encoding, e.g. `"UTF-8"`, `"ISO-8859-1"` or
    /// `"windows-1251"`.
    pub fn name(self) -> &'static str {
        match self.0 {
            Kind::Ascii => "US-ASCII",
            Kind::Latin1 => "ISO-8859-1",
            Kind::Whatwg(encoding) => encoding.name(),
        }
    }

    /// Encode `text`, silently dropping every character this charset cannot
    /// represent.
    pub fn encode(self, text: &str) -> Vec<u8> {
        let (bytes, dropped) = self.encode_counting(text);
        if dropped > 0 {
            tracing::debug!(charset = self.name(), dropped, "dropped unrepresentable characters");
        }
        bytes
    }

    /// Whether every character of `text` can be represented in this charset.
    pub fn is_lossless(self, text: &str) -> bool {
        self.encode_counting(text).1 == 0
    }

    /// Decode bytes produced by this charset back into text. Malformed
    /// sequences become U+FFFD.
    pub fn decode(self, bytes: &[u8]) -> String {
        match self.0 {
            Kind::Ascii => bytes
                .iter()
                .map(|&b| if b.is_ascii() { char::from(b) } else { char::REPLACEMENT_CHARACTER })
                .collect(),
            Kind::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
            Kind::Whatwg(encoding) => encoding.decode_without_bom_handling(bytes).0.into_owned(),
        }
    }

    fn encode_counting(self, text: &str) -> (Vec<u8>, usize) {
        match self.0 {
            Kind::Ascii => encode_below(text, 0x80),
            Kind::Latin1 => encode_below(text, 0x100),
            Kind::Whatwg(encoding) if encoding == UTF_8 => (text.as_bytes().to_vec(), 0),
            Kind::Whatwg(encoding) => encode_with(encoding, text),
        }
    }
}

fn lookup(label: &str) -> Lookup {
    let label = label.trim();
    if ASCII_LABELS.iter().any(|known| known.eq_ignore_ascii_case(label)) {
        return Lookup::Found(Charset(Kind::Ascii));
    }
    if LATIN1_LABELS.iter().any(|known| known.eq_ignore_ascii_case(label)) {
        return Lookup::Found(Charset(Kind::Latin1));
    }
    match Encoding::for_label(label.as_bytes()) {
        Some(encoding) if encoding.output_encoding() == encoding => {
            Lookup::Found(Charset(Kind::Whatwg(encoding)))
        }
        Some(encoding) => Lookup::DecodeOnly(encoding),
        None => Lookup::Unknown,
    }
}

/// Single-byte charsets whose bytes equal the first `limit` code points.
fn encode_below(text: &str, limit: u32) -> (Vec<u8>, usize) {
    let mut out = Vec::with_capacity(text.len());
    let mut dropped = 0;
    for c in text.chars() {
        match u8::try_from(u32::from(c)) {
            Ok(byte) if u32::from(byte) < limit => out.push(byte),
            _ => dropped += 1,
        }
    }
    (out, dropped)
}

fn encode_with(encoding: &'static Encoding, text: &str) -> (Vec<u8>, usize) {
    let mut encoder = encoding.new_encoder();
    let mut out = Vec::new();
    let mut remaining = text;
    let mut dropped = 0;
    loop {
        out.reserve(
            encoder
                .max_buffer_length_from_utf8_without_replacement(remaining.len())
                .unwrap_or(remaining.len().saturating_mul(4))
                .max(16),
        );
        let (result, read) =
            encoder.encode_from_utf8_to_vec_without_replacement(remaining, &mut out, true);
        remaining = &remaining[read..];
        match result {
            EncoderResult::InputEmpty => return (out, dropped),
            EncoderResult::OutputFull => {}
            // The unmappable character counts as read; skipping it is the drop.
            EncoderResult::Unmappable(_) => dropped += 1,
        }
    }
}

impl Default for Charset {
    fn default() -> Self {
        Self::utf8()
    }
}

impl fmt::Debug for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Charset").field(&self.name()).finish()
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Charset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Charset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Charset::for_label(&label)
            .ok_or_else(|| de::Error::custom(format!("unknown charset label: {label}")))
    }
}
