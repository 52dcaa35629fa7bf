//! The uploaded file handed to one render cycle.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use crate::error::PreviewResult;
use crate::ingestion::FileFormat;

/// An immutable uploaded file: name, size, declared MIME type and content.
///
/// Created by the host for each cycle and consumed by [`crate::preview::process_upload`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    name: String,
    size: u64,
    declared_type: Option<String>,
    bytes: Vec<u8>,
}

impl UploadedFile {
    /// Wrap uploaded bytes. `size` is taken from the content length.
    pub fn new(name: impl Into<String>, declared_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            declared_type: declared_type.filter(|t| !t.trim().is_empty()),
            bytes,
        }
    }

    /// Read a file from disk as if it had been uploaded.
    ///
    /// The declared type is guessed from the extension.
    pub fn from_path(path: impl AsRef<Path>) -> PreviewResult<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let declared_type = FileFormat::from_file_name(&name)
            .map(|f| f.mime_type(&name).to_string());
        Ok(Self::new(name, declared_type, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn declared_type(&self) -> Option<&str> {
        self.declared_type.as_deref()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// A fresh reader positioned at offset 0.
    pub fn reader(&self) -> Cursor<&[u8]> {
        Cursor::new(self.bytes.as_slice())
    }
}
