//! Turning picked or dropped files into uploads.

use crate::error::Result;
use crate::platform::Platform;
use base64::{engine::general_purpose::STANDARD, Engine};
use image::{ImageFormat, RgbaImage};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Bytes of a file the user handed over, with the media type it was recognised as.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Upload {
    pub path: PathBuf,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn preview(&self) -> Preview {
        Preview {
            media_type: self.media_type.clone(),
            bytes: self.bytes.clone(),
        }
    }

    /// Renders the upload onto a surface of its natural pixel size.
    pub fn render(&self) -> Result<RgbaImage> {
        Ok(image::load_from_memory(&self.bytes)?.to_rgba8())
    }
}

/// What the user sees of an upload, regardless of whether decoding worked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Preview {
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl Preview {
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, STANDARD.encode(&self.bytes))
    }
}

/// Media type implied by the file extension, as a browser would report it.
pub fn media_type_of(path: &Path) -> Option<&'static str> {
    ImageFormat::from_path(path).ok().map(|f| f.to_mime_type())
}

pub fn is_image(path: &Path) -> bool {
    media_type_of(path).is_some_and(|m| m.starts_with("image/"))
}

/// Accepts a file chosen through a picker. The media type falls back to sniffing the content.
pub fn from_picker<P: Platform + ?Sized>(platform: &P, path: &Path) -> Result<Upload> {
    let bytes = platform.read_file(path)?;
    let media_type = media_type_of(path)
        .or_else(|| image::guess_format(&bytes).ok().map(|f| f.to_mime_type()))
        .unwrap_or("application/octet-stream");

    debug!(path = %path.display(), media_type, bytes = bytes.len(), "picked file");
    Ok(Upload {
        path: path.to_path_buf(),
        media_type: media_type.to_string(),
        bytes,
    })
}

/// Accepts the first dropped file if it is an image. Anything else is ignored without error.
pub fn from_drop<P: Platform + ?Sized>(platform: &P, paths: &[PathBuf]) -> Result<Option<Upload>> {
    let Some(first) = paths.first() else {
        return Ok(None);
    };
    let Some(media_type) = media_type_of(first).filter(|m| m.starts_with("image/")) else {
        debug!(path = %first.display(), "ignoring non-image drop");
        return Ok(None);
    };

    let bytes = platform.read_file(first)?;
    debug!(path = %first.display(), media_type, bytes = bytes.len(), "dropped file");
    Ok(Some(Upload {
        path: first.clone(),
        media_type: media_type.to_string(),
        bytes,
    }))
}
