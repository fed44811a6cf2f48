//! File-upload payloads.
//!
//! # Design
//! An upload is owned by whoever builds the request. Normalization never
//! looks inside it: it calls [`UploadPayload::field_tuple`] once and passes
//! the resulting [`UploadField`] through untouched, for a multipart encoder
//! further down the line to consume.

use std::fmt;
use std::path::{Path, PathBuf};

/// Canonical form of an upload, as produced by [`UploadPayload::field_tuple`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadField {
    pub source: UploadSource,
    pub filename: Option<String>,
    pub content_type: Option<String>,
}

/// Where the bytes of an upload come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadSource {
    /// Bytes held in memory.
    Content(Vec<u8>),
    /// A file read by the transport at send time.
    File(PathBuf),
}

/// Anything that can be sent as a file field.
pub trait UploadPayload: fmt::Debug + Send + Sync {
    fn field_tuple(&self) -> UploadField;
}

/// An in-memory upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadContent {
    content: Vec<u8>,
    filename: Option<String>,
    content_type: Option<String>,
}

impl UploadContent {
    pub fn new(content: impl Into<Vec<u8>>) -> Self {
        Self {
            content: content.into(),
            filename: None,
            content_type: None,
        }
    }

    /// Set the file name. Unless a content type was set explicitly, it is
    /// guessed from the name's extension.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

impl UploadPayload for UploadContent {
    fn field_tuple(&self) -> UploadField {
        let content_type = self
            .content_type
            .clone()
            .or_else(|| self.filename.as_deref().and_then(guess_content_type));
        UploadField {
            source: UploadSource::Content(self.content.clone()),
            filename: self.filename.clone(),
            content_type,
        }
    }
}

/// An upload read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    path: PathBuf,
    filename: Option<String>,
    content_type: Option<String>,
}

impl UploadFile {
    /// The file name defaults to the last component of `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let filename = path.file_name().map(|name| name.to_string_lossy().into_owned());
        Self {
            path,
            filename,
            content_type: None,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl UploadPayload for UploadFile {
    fn field_tuple(&self) -> UploadField {
        let content_type = self
            .content_type
            .clone()
            .or_else(|| self.filename.as_deref().and_then(guess_content_type));
        UploadField {
            source: UploadSource::File(self.path.clone()),
            filename: self.filename.clone(),
            content_type,
        }
    }
}

fn guess_content_type(filename: &str) -> Option<String> {
    mime_guess::from_path(filename).first_raw().map(str::to_string)
}
