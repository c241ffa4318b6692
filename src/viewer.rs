//! State of the "check" view: the preview of the last upload and what decoding it produced.

use crate::decoder::QrDecoder;
use crate::generator::Resolution;
use crate::intake::{Preview, Upload};
use crate::messages::Locale;
use tracing::{debug, info};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DecodeState {
    #[default]
    Idle,
    Decoded(String),
    NotFound(&'static str),
    Unreadable(&'static str),
}

/// What one decode attempt produced, before it is applied to a [`Viewer`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeOutcome {
    Found(String),
    NotFound,
    Unreadable,
}

#[derive(Debug)]
pub struct DecodeTicket {
    seq: u64,
}

/// Renders `upload` at its natural size and hands the pixels to `decoder`.
pub fn run_decode<D: QrDecoder + ?Sized>(upload: &Upload, decoder: &D) -> DecodeOutcome {
    let surface = match upload.render() {
        Ok(surface) => surface,
        Err(e) => {
            debug!(path = %upload.path.display(), error = %e, "upload is not a readable image");
            return DecodeOutcome::Unreadable;
        }
    };

    let (width, height) = surface.dimensions();
    match decoder.decode(surface.as_raw(), width, height) {
        Some(text) if !text.is_empty() => DecodeOutcome::Found(text),
        _ => DecodeOutcome::NotFound,
    }
}

#[derive(Debug, Default)]
pub struct Viewer {
    locale: Locale,
    seq: u64,
    preview: Option<Preview>,
    state: DecodeState,
}

impl Viewer {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            ..Default::default()
        }
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn state(&self) -> &DecodeState {
        &self.state
    }

    pub fn decoded_text(&self) -> Option<&str> {
        match &self.state {
            DecodeState::Decoded(text) => Some(text),
            _ => None,
        }
    }

    /// Installs the preview of `upload` and clears the previous result.
    pub fn begin(&mut self, upload: &Upload) -> DecodeTicket {
        self.seq += 1;
        self.state = DecodeState::Idle;
        self.preview = Some(upload.preview());
        debug!(seq = self.seq, path = %upload.path.display(), "decode started");
        DecodeTicket { seq: self.seq }
    }

    /// Applies `outcome` unless a newer upload has started since `ticket` was issued.
    pub fn finish(&mut self, ticket: DecodeTicket, outcome: DecodeOutcome) -> Resolution {
        if ticket.seq != self.seq {
            debug!(stale = ticket.seq, current = self.seq, "dropping superseded decode");
            return Resolution::Stale;
        }

        self.state = match outcome {
            DecodeOutcome::Found(text) => {
                info!(chars = text.chars().count(), "QR code decoded");
                DecodeState::Decoded(text)
            }
            DecodeOutcome::NotFound => DecodeState::NotFound(self.locale.not_found()),
            DecodeOutcome::Unreadable => DecodeState::Unreadable(self.locale.unreadable()),
        };
        Resolution::Applied
    }

    pub fn process<D: QrDecoder + ?Sized>(&mut self, upload: &Upload, decoder: &D) -> Resolution {
        let ticket = self.begin(upload);
        let outcome = run_decode(upload, decoder);
        self.finish(ticket, outcome)
    }
}
