use crate::error::Result;
use crate::platform::Platform;
use chrono::{DateTime, Utc};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::info;

/// What gets written out by a download.
pub enum ExportSource<'a> {
    /// A locally flattened surface, encoded to PNG without touching the network.
    Composite(&'a RgbaImage),
    /// A remote image whose raw bytes are fetched again and saved as is.
    Remote(&'a str),
}

pub fn download_file_name(now: DateTime<Utc>) -> String {
    format!("qrcode-{}.png", now.timestamp_millis())
}

pub fn encode_png(surface: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Cursor::new(Vec::new());
    surface.write_to(&mut bytes, ImageFormat::Png)?;
    Ok(bytes.into_inner())
}

pub fn export<P: Platform + ?Sized>(
    platform: &P,
    source: ExportSource<'_>,
    dir: &Path,
    now: DateTime<Utc>,
) -> Result<PathBuf> {
    let bytes = match source {
        ExportSource::Composite(surface) => encode_png(surface)?,
        ExportSource::Remote(url) => platform.fetch(url)?,
    };

    let path = platform.save_file(dir, &download_file_name(now), &bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "exported QR image");
    Ok(path)
}
