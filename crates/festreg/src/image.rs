//! University ID photo handling.
//!
//! Photos are stored as opaque bytes. This module only reads them from disk
//! (behind the same extension filter the registration desk has always used),
//! recognizes common formats by their magic bytes, and writes them back out.

use std::fmt;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

/// Image extensions accepted by default.
pub const DEFAULT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp"];

/// Image formats recognizable from their leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// JPEG / JFIF.
    Jpeg,
    /// PNG.
    Png,
    /// GIF87a or GIF89a.
    Gif,
    /// Windows bitmap.
    Bmp,
}

impl ImageFormat {
    /// Identify the format of an image from its first bytes.
    #[must_use]
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(Self::Png)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(Self::Gif)
        } else if bytes.starts_with(b"BM") {
            Some(Self::Bmp)
        } else {
            None
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jpeg => write!(f, "jpeg"),
            Self::Png => write!(f, "png"),
            Self::Gif => write!(f, "gif"),
            Self::Bmp => write!(f, "bmp"),
        }
    }
}

/// Read an ID photo from disk.
///
/// The extension is matched case-insensitively against `allowed_extensions`.
/// File contents are not inspected and no size limit applies.
///
/// # Errors
///
/// Returns [`Error::ImageType`] for a disallowed extension or
/// [`Error::ImageRead`] if the file cannot be read.
pub fn read_image<S: AsRef<str>>(path: &Path, allowed_extensions: &[S]) -> Result<Vec<u8>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();

    if !allowed_extensions
        .iter()
        .any(|allowed| allowed.as_ref().eq_ignore_ascii_case(extension))
    {
        return Err(Error::ImageType {
            path: path.to_path_buf(),
            extension: extension.to_string(),
        });
    }

    let bytes = std::fs::read(path).map_err(|source| Error::ImageRead {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Read {} image bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

/// Write a stored ID photo to disk, replacing any existing file.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be written.
pub fn write_image(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes)?;
    debug!("Wrote {} image bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// One-line description of a stored photo, e.g. `png, 2048 bytes`.
#[must_use]
pub fn describe(bytes: &[u8]) -> String {
    match ImageFormat::detect(bytes) {
        Some(format) => format!("{format}, {} bytes", bytes.len()),
        None => format!("unknown format, {} bytes", bytes.len()),
    }
}
