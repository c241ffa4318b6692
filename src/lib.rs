//! Generate QR codes through a remote renderer and read them back from images.
//!
//! Symbol encoding is delegated to a [`source::QrImageSource`] (the qrserver HTTP API
//! or an in-process renderer), and detection to a [`decoder::QrDecoder`]. This crate
//! owns everything around them: request construction, compositing, exports, file
//! intake and the state of the two views.

pub mod composite;
pub mod decoder;
pub mod editor;
pub mod encoder;
pub mod error;
pub mod export;
pub mod generator;
pub mod intake;
pub mod messages;
pub mod options;
pub mod platform;
pub mod source;
pub mod viewer;

pub use error::{QrError, Result};
