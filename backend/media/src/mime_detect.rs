//! MIME type detection for acquired images.
//!
//! File pickers report an extension; camera frames and pasted data only carry bytes,
//! so both paths are covered.

use std::path::Path;

const OCTET_STREAM: &str = "application/octet-stream";

/// Known extensions. Non-image entries exist so rejections can name the type.
const EXTENSIONS: &[(&[&str], &str)] = &[
    (&["jpg", "jpeg", "jfif"], "image/jpeg"),
    (&["png"], "image/png"),
    (&["gif"], "image/gif"),
    (&["webp"], "image/webp"),
    (&["avif"], "image/avif"),
    (&["bmp"], "image/bmp"),
    (&["heic", "heif"], "image/heic"),
    (&["tif", "tiff"], "image/tiff"),
    (&["pdf"], "application/pdf"),
    (&["txt"], "text/plain"),
];

/// MIME type implied by the file extension, case-insensitively.
pub fn detect_mime_type(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return OCTET_STREAM;
    };
    let ext = ext.to_ascii_lowercase();
    EXTENSIONS
        .iter()
        .find(|(exts, _)| exts.iter().any(|e| *e == ext))
        .map_or(OCTET_STREAM, |(_, mime)| *mime)
}

/// Detect MIME type from leading magic bytes.
pub fn sniff_mime_type(data: &[u8]) -> Option<&'static str> {
    match data {
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some("image/png"),
        [b'G', b'I', b'F', b'8', ..] => Some("image/gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        [b'B', b'M', ..] => Some("image/bmp"),
        [b'%', b'P', b'D', b'F', ..] => Some("application/pdf"),
        _ => None,
    }
}

/// Resolve the MIME type of a file, preferring content over the extension.
pub fn resolve_mime_type(path: &Path, data: &[u8]) -> &'static str {
    sniff_mime_type(data).unwrap_or_else(|| detect_mime_type(path))
}

/// Whether a MIME type is for an image.
pub fn is_image(mime: &str) -> bool {
    mime.starts_with("image/")
}
