//! Value normalization: every key and value becomes bytes (or an upload).
//!
//! # Design
//! The kinds of value a request can carry form a closed enum, so every
//! encoder matches exhaustively and there is no "unknown kind" case.
//!
//! | input            | normalized                          |
//! |------------------|-------------------------------------|
//! | `Value::Bytes`   | unchanged                           |
//! | `Value::Text`    | encoded with the charset, lossy     |
//! | `Value::Absent`  | empty bytes                         |
//! | `Value::Upload`  | the payload's `UploadField`         |

use std::sync::Arc;

use crate::charset::Charset;
use crate::error::EncodeError;
use crate::upload::{UploadContent, UploadField, UploadFile, UploadPayload};

/// A field name. Keys are never absent and never uploads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Bytes(Vec<u8>),
    Text(String),
}

/// A field value as supplied by the caller.
#[derive(Debug, Clone)]
pub enum Value {
    Bytes(Vec<u8>),
    Text(String),
    /// Renders as an empty value.
    Absent,
    Upload(Arc<dyn UploadPayload>),
}

/// A value after normalization; no text remains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedValue {
    Bytes(Vec<u8>),
    Upload(UploadField),
}

impl NormalizedValue {
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            NormalizedValue::Bytes(bytes) => Some(bytes),
            NormalizedValue::Upload(_) => None,
        }
    }
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bytes(_) => "bytes",
            Value::Text(_) => "text",
            Value::Absent => "absent",
            Value::Upload(_) => "upload",
        }
    }
}

/// Normalize a single value. Never fails: text the charset cannot fully
/// represent loses the offending characters.
pub fn normalize_value(value: &Value, charset: Charset) -> NormalizedValue {
    match value {
        Value::Bytes(bytes) => NormalizedValue::Bytes(bytes.clone()),
        Value::Text(text) => NormalizedValue::Bytes(charset.encode(text)),
        Value::Absent => NormalizedValue::Bytes(Vec::new()),
        Value::Upload(payload) => NormalizedValue::Upload(payload.field_tuple()),
    }
}

/// Normalize a key. Byte keys pass through, text keys are encoded.
pub fn normalize_key(key: &Key, charset: Charset) -> Vec<u8> {
    match key {
        Key::Bytes(bytes) => bytes.clone(),
        Key::Text(text) => charset.encode(text),
    }
}

/// Strict variant of [`normalize_value`] for contexts that must be handed
/// text. Any other kind of value, byte strings included, is rejected.
pub fn normalize_text(value: &Value, charset: Charset) -> Result<Vec<u8>, EncodeError> {
    match value {
        Value::Text(text) => Ok(charset.encode(text)),
        other => Err(EncodeError::InvalidArgument {
            function: "normalize_text",
            expected: "text",
            actual: other.kind(),
        }),
    }
}

impl From<&str> for Key {
    fn from(text: &str) -> Self {
        Key::Text(text.to_string())
    }
}

impl From<String> for Key {
    fn from(text: String) -> Self {
        Key::Text(text)
    }
}

impl From<&String> for Key {
    fn from(text: &String) -> Self {
        Key::Text(text.clone())
    }
}

impl From<Vec<u8>> for Key {
    fn from(bytes: Vec<u8>) -> Self {
        Key::Bytes(bytes)
    }
}

impl From<&[u8]> for Key {
    fn from(bytes: &[u8]) -> Self {
        Key::Bytes(bytes.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Key {
    fn from(bytes: &[u8; N]) -> Self {
        Key::Bytes(bytes.to_vec())
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<&String> for Value {
    fn from(text: &String) -> Self {
        Value::Text(text.clone())
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Bytes(bytes)
    }
}

impl From<&[u8]> for Value {
    fn from(bytes: &[u8]) -> Self {
        Value::Bytes(bytes.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Value {
    fn from(bytes: &[u8; N]) -> Self {
        Value::Bytes(bytes.to_vec())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Absent, Into::into)
    }
}

impl From<UploadContent> for Value {
    fn from(upload: UploadContent) -> Self {
        Value::Upload(Arc::new(upload))
    }
}

impl From<UploadFile> for Value {
    fn from(upload: UploadFile) -> Self {
        Value::Upload(Arc::new(upload))
    }
}

impl From<Arc<dyn UploadPayload>> for Value {
    fn from(upload: Arc<dyn UploadPayload>) -> Self {
        Value::Upload(upload)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::upload::UploadSource;

    fn cp1251() -> Charset {
        Charset::for_label("cp1251").unwrap()
    }

    #[derive(Debug, Default)]
    struct CountingUpload {
        calls: AtomicUsize,
    }

    impl UploadPayload for CountingUpload {
        fn field_tuple(&self) -> UploadField {
            self.calls.fetch_add(1, Ordering::SeqCst);
            UploadField {
                source: UploadSource::Content(b"payload".to_vec()),
                filename: Some("payload.bin".to_string()),
                content_type: None,
            }
        }
    }

    #[test]
    fn bytes_pass_through() {
        let value = Value::from(vec![0xFF, 0x00, b'a']);
        assert_eq!(
            normalize_value(&value, cp1251()),
            NormalizedValue::Bytes(vec![0xFF, 0x00, b'a'])
        );
    }

    #[test]
    fn text_is_encoded_with_charset() {
        let value = Value::from("мир");
        assert_eq!(normalize_value(&value, cp1251()), NormalizedValue::Bytes(vec![0xEC, 0xE8, 0xF0]));
        assert_eq!(
            normalize_value(&value, Charset::utf8()),
            NormalizedValue::Bytes("мир".as_bytes().to_vec())
        );
    }

    #[test]
    fn representable_text_round_trips() {
        for text in ["", "plain", "привет, мир", "Ёж № 5"] {
            let bytes = normalize_value(&Value::from(text), cp1251());
            assert_eq!(cp1251().decode(bytes.as_bytes().unwrap()), text);
        }
    }

    #[test]
    fn unrepresentable_text_is_dropped_not_rejected() {
        let full = normalize_value(&Value::from("мир"), cp1251());
        let lossy = normalize_value(&Value::from("м例иえр"), cp1251());
        assert_eq!(lossy, full);
        assert!(lossy.as_bytes().unwrap().len() <= Charset::utf8().encode("м例иえр").len());
    }

    #[test]
    fn absent_is_empty_for_any_charset() {
        for charset in [Charset::utf8(), cp1251(), Charset::for_label("shift_jis").unwrap()] {
            assert_eq!(normalize_value(&Value::Absent, charset), NormalizedValue::Bytes(Vec::new()));
        }
        assert!(matches!(Value::from(None::<&str>), Value::Absent));
        assert!(matches!(Value::from(Some("x")), Value::Text(_)));
    }

    #[test]
    fn upload_is_canonicalized_once() {
        let upload = Arc::new(CountingUpload::default());
        let value = Value::Upload(upload.clone());
        let normalized = normalize_value(&value, Charset::utf8());
        assert_eq!(upload.calls.load(Ordering::SeqCst), 1);
        match normalized {
            NormalizedValue::Upload(field) => assert_eq!(field.filename.as_deref(), Some("payload.bin")),
            other => panic!("expected upload, got {other:?}"),
        }
        assert_eq!(
            normalize_value(&Value::from(UploadContent::new("x")), Charset::utf8()).as_bytes(),
            None
        );
    }

    #[test]
    fn keys_normalize_like_text() {
        assert_eq!(normalize_key(&Key::from("ключ"), cp1251()), vec![0xEA, 0xEB, 0xFE, 0xF7]);
        assert_eq!(normalize_key(&Key::from(b"raw\xff"), cp1251()), b"raw\xff".to_vec());
    }

    #[test]
    fn normalize_text_accepts_text() {
        assert_eq!(normalize_text(&Value::from("abc"), cp1251()).unwrap(), b"abc".to_vec());
        assert_eq!(normalize_text(&Value::from("a例"), cp1251()).unwrap(), b"a".to_vec());
    }

    #[test]
    fn normalize_text_rejects_everything_else() {
        let rejected = [
            Value::from(b"abc"),
            Value::Absent,
            Value::from(UploadContent::new("x")),
        ];
        for value in &rejected {
            for _ in 0..2 {
                let err = normalize_text(value, Charset::utf8()).unwrap_err();
                assert!(matches!(err, EncodeError::InvalidArgument { function: "normalize_text", .. }));
            }
        }
        assert_eq!(
            normalize_text(&Value::from(b"abc"), Charset::utf8()).unwrap_err().to_string(),
            "normalize_text accepts only text values, got bytes"
        );
    }
}
