//! Image acquisition for the Haute session: file selections and captured frames.

pub mod mime_detect;
pub mod source;

pub use mime_detect::{detect_mime_type, is_image, resolve_mime_type, sniff_mime_type};
pub use source::{FileImageSource, FrameImageSource};
