use std::path::Path;

use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::error::{Error, Result};

pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024; // 5MB

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
    Webp,
}

impl ImageKind {
    /// Detects the format from the file's magic bytes.
    #[must_use]
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0x89, 0x50, 0x4E, 0x47, ..] => Some(Self::Png),
            [0xFF, 0xD8, 0xFF, ..] => Some(Self::Jpeg),
            [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Some(Self::Webp),
            _ => None,
        }
    }

    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }

    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Webp => "webp",
        }
    }
}

fn too_large() -> Error {
    Error::validation("Image must be under 5MB")
}

/// A newly attached image, checked for size and type when attached.
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    file_name: String,
    kind: ImageKind,
    bytes: Bytes,
}

impl ImageAttachment {
    pub fn from_bytes(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Result<Self> {
        let bytes = bytes.into();
        if bytes.len() as u64 > MAX_IMAGE_BYTES {
            return Err(too_large());
        }
        let kind = ImageKind::sniff(&bytes)
            .ok_or_else(|| Error::validation("Image must be a PNG, JPEG, or WEBP file"))?;
        Ok(Self {
            file_name: file_name.into(),
            kind,
            bytes,
        })
    }

    /// Reads an image from disk. Oversized files are rejected before they are read.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let metadata = tokio::fs::metadata(path).await?;
        if metadata.len() > MAX_IMAGE_BYTES {
            return Err(too_large());
        }
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_bytes(file_name, bytes)
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn kind(&self) -> ImageKind {
        self.kind
    }

    #[must_use]
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// The original file's extension, or the detected format's when it has none.
    #[must_use]
    pub fn extension(&self) -> &str {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty() && !ext.contains(['/', '\\']))
            .unwrap_or(self.kind.extension())
    }

    /// Storage object name: upload time in milliseconds plus the extension.
    #[must_use]
    pub fn upload_name(&self, now: DateTime<Utc>) -> String {
        format!("{}.{}", now.timestamp_millis(), self.extension())
    }
}

/// Parses an attached workflow definition. The shape is never inspected.
pub fn parse_workflow_document(text: &str) -> Result<serde_json::Value> {
    Ok(serde_json::from_str(text)?)
}
