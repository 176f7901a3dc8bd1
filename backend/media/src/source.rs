//! Image sources: file selections and in-memory frames.

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use haute_core::{AcquisitionError, ImageHandle, ImageSource};
use tracing::{info, warn};

use crate::mime_detect::{is_image, resolve_mime_type, sniff_mime_type};

/// Reads an image the user picked from disk.
pub struct FileImageSource {
    path: PathBuf,
}

impl FileImageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ImageSource for FileImageSource {
    fn name(&self) -> &str {
        "file"
    }

    async fn acquire(&self) -> Result<ImageHandle, AcquisitionError> {
        let data = tokio::fs::read(&self.path).await.map_err(|e| {
            warn!(path = %self.path.display(), error = %e, "Failed to read image file");
            AcquisitionError::Unreadable(format!("{}: {}", self.path.display(), e))
        })?;

        let mime_type = resolve_mime_type(&self.path, &data);
        if !is_image(mime_type) {
            warn!(path = %self.path.display(), mime = mime_type, "Rejected non-image file");
            return Err(AcquisitionError::InvalidFileType {
                mime_type: mime_type.to_string(),
            });
        }

        info!(path = %self.path.display(), mime = mime_type, bytes = data.len(), "Acquired image file");
        Ok(ImageHandle::new(mime_type, data))
    }
}

/// Wraps an already-captured frame (e.g., a camera snapshot).
pub struct FrameImageSource {
    declared_mime: Option<String>,
    data: Bytes,
}

impl FrameImageSource {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            declared_mime: None,
            data: data.into(),
        }
    }

    /// Trust a MIME type reported by the capture device instead of sniffing.
    pub fn with_mime_type(mut self, mime: impl Into<String>) -> Self {
        self.declared_mime = Some(mime.into());
        self
    }
}

#[async_trait]
impl ImageSource for FrameImageSource {
    fn name(&self) -> &str {
        "frame"
    }

    async fn acquire(&self) -> Result<ImageHandle, AcquisitionError> {
        if self.data.is_empty() {
            return Err(AcquisitionError::Unreadable("empty frame".into()));
        }
        let mime_type = match &self.declared_mime {
            Some(mime) => mime.clone(),
            None => sniff_mime_type(&self.data)
                .unwrap_or("application/octet-stream")
                .to_string(),
        };
        if !is_image(&mime_type) {
            return Err(AcquisitionError::InvalidFileType { mime_type });
        }
        Ok(ImageHandle::new(mime_type, self.data.clone()))
    }
}
