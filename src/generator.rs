//! State of the "create" view: the options being edited, the in-flight request and the
//! last symbol that loaded successfully.

use crate::composite::{CompositeCache, Layout};
use crate::error::{QrError, Result};
use crate::export::{export, ExportSource};
use crate::messages::Locale;
use crate::options::{GenerationRequest, GeneratorOptions, Strategy};
use crate::platform::Platform;
use crate::source::{Origin, QrImageSource, ReadyImage};
use chrono::{DateTime, Utc};
use image::RgbaImage;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Handle for one generation attempt. Only the most recently issued ticket may change state.
#[derive(Debug)]
pub struct Ticket {
    seq: u64,
    request: GenerationRequest,
}

impl Ticket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn request(&self) -> &GenerationRequest {
        &self.request
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    /// A newer ticket was issued meanwhile; the result was dropped.
    Stale,
}

#[derive(Debug)]
pub struct Generated {
    pub request: GenerationRequest,
    pub image: ReadyImage,
}

#[derive(Debug)]
pub struct Generator {
    options: GeneratorOptions,
    strategy: Strategy,
    locale: Locale,
    seq: u64,
    loading: bool,
    current: Option<Generated>,
    composite: CompositeCache,
    notice: Option<&'static str>,
}

impl Generator {
    pub fn new(options: GeneratorOptions, strategy: Strategy, locale: Locale) -> Self {
        Self {
            options: accept(options),
            strategy,
            locale,
            seq: 0,
            loading: false,
            current: None,
            composite: CompositeCache::default(),
            notice: None,
        }
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Replaces the edited options. Under [`Strategy::Composite`] size, margin and background
    /// take effect on the next [`Generator::surface`] call without a new request.
    pub fn set_options(&mut self, options: GeneratorOptions) {
        self.options = accept(options);
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn current(&self) -> Option<&Generated> {
        self.current.as_ref()
    }

    /// Last user-visible failure, cleared when a new attempt starts.
    pub fn notice(&self) -> Option<&'static str> {
        self.notice
    }

    /// Starts an attempt for `text`. Blank text is ignored and yields `None`.
    pub fn begin(&mut self, text: &str) -> Option<Ticket> {
        let Some(request) = GenerationRequest::new(text, self.options) else {
            debug!("ignoring blank generation input");
            return None;
        };

        self.seq += 1;
        self.loading = true;
        self.notice = None;
        debug!(seq = self.seq, "generation started");
        Some(Ticket {
            seq: self.seq,
            request,
        })
    }

    /// Applies the outcome of `ticket` unless a newer attempt superseded it.
    ///
    /// A failed load clears the loading flag and keeps whatever was displayed before.
    pub fn resolve(&mut self, ticket: Ticket, result: Result<ReadyImage>) -> Resolution {
        if ticket.seq != self.seq {
            debug!(stale = ticket.seq, current = self.seq, "dropping superseded result");
            return Resolution::Stale;
        }

        self.loading = false;
        match result {
            Ok(image) => {
                info!(seq = ticket.seq, image_id = image.id(), "QR image ready");
                self.composite.clear();
                self.current = Some(Generated {
                    request: ticket.request,
                    image,
                });
            }
            Err(e) => {
                warn!(seq = ticket.seq, error = %e, "QR image failed to load");
                self.notice = Some(self.locale.load_failed());
            }
        }
        Resolution::Applied
    }

    /// Runs a whole attempt against `source`. Returns `None` for blank input.
    pub fn generate<S: QrImageSource + ?Sized>(
        &mut self,
        text: &str,
        source: &S,
    ) -> Option<Resolution> {
        let ticket = self.begin(text)?;
        let result = source.load(ticket.request(), self.strategy);
        Some(self.resolve(ticket, result))
    }

    /// The image to show for the current result, rebuilt if any input changed since last time.
    pub fn surface(&mut self) -> Option<&RgbaImage> {
        let generated = self.current.as_ref()?;
        let layout = match self.strategy {
            Strategy::Composite => Layout::Padded {
                size: self.options.size,
                margin: self.options.margin,
            },
            Strategy::Remote => Layout::AsFetched,
        };
        Some(
            self.composite
                .get_or_compose(&generated.image, layout, self.options.background),
        )
    }

    /// Saves the current result into `dir` as `qrcode-<millis>.png`.
    ///
    /// Remote results shown as fetched are downloaded again; everything else is encoded locally.
    pub fn download<P: Platform + ?Sized>(
        &mut self,
        platform: &P,
        dir: &Path,
        now: DateTime<Utc>,
    ) -> Result<PathBuf> {
        let result = self.try_download(platform, dir, now);
        if let Err(e) = &result {
            warn!(error = %e, "download failed");
            self.notice = Some(self.locale.download_failed());
        }
        result
    }

    fn try_download<P: Platform + ?Sized>(
        &mut self,
        platform: &P,
        dir: &Path,
        now: DateTime<Utc>,
    ) -> Result<PathBuf> {
        let current = self.current.as_ref().ok_or(QrError::NothingToExport)?;
        let remote_url = match (self.strategy, current.image.origin()) {
            (Strategy::Remote, Origin::Remote(url)) => Some(url.clone()),
            _ => None,
        };

        match remote_url {
            Some(url) => export(platform, ExportSource::Remote(&url), dir, now),
            None => {
                let surface = self.surface().ok_or(QrError::NothingToExport)?;
                export(platform, ExportSource::Composite(surface), dir, now)
            }
        }
    }
}

/// Clamps edited options into range, warning once when anything had to change.
/// Requests built from the result are already in range.
fn accept(options: GeneratorOptions) -> GeneratorOptions {
    let clamped = options.clamped();
    if clamped != options {
        warn!(
            requested_size = options.size,
            requested_margin = options.margin,
            size = clamped.size,
            margin = clamped.margin,
            "clamped generator options"
        );
    }
    clamped
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(GeneratorOptions::default(), Strategy::default(), Locale::default())
    }
}
