use campusfeed_common::model::post::MediaType;
use std::{fmt::Debug, path::Path, sync::Arc};

/// A photo or video picked for upload, held in memory until it is sent.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct MediaFile {
    name: String,
    content_type: String,
    bytes: Arc<[u8]>,
}

impl MediaFile {
    #[must_use]
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads a file from disk, guessing its content type from the extension.
    pub async fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map_or_else(|| "upload".to_owned(), |name| name.to_string_lossy().into_owned());
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_owned();

        Ok(Self::new(name, content_type, bytes))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The `resource_type` sent along with the upload.
    #[must_use]
    pub fn media_type(&self) -> MediaType {
        MediaType::from_content_type(&self.content_type)
    }

    /// `photo.jpg (12 KB)`, with the size rounded to the nearest KiB.
    #[must_use]
    pub fn label(&self) -> String {
        let kib = (self.len() + 512) / 1024;
        format!("{} ({kib} KB)", self.name)
    }
}

impl Debug for MediaFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("len", &self.len())
            .finish()
    }
}
