use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QrError {
    #[error("request to {url} failed: {reason}")]
    Fetch { url: String, reason: String },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("{0} returned an empty body")]
    EmptyBody(String),

    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("failed to encode QR symbol: {0}")]
    Symbol(#[from] qrcode::types::QrError),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("symbol needs {modules} modules per side but only {room} pixels are left inside the margin")]
    SymbolTooLarge { modules: u32, room: u32 },

    #[error("failed to set up the HTTP client: {0}")]
    Client(String),

    #[error("invalid hex color {0:?}")]
    Color(String),

    #[error("no generated image to export")]
    NothingToExport,
}

impl QrError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = QrError> = std::result::Result<T, E>;
